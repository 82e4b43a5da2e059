//! Latest-post discovery for the `last` command.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

/// Return the most recently modified `*.md` file directly inside `posts_dir`.
///
/// A missing directory, an empty directory and any listing or metadata error
/// all map to `None`; discovery never fails hard, the caller decides how to
/// report "no post".
pub fn get_latest_post(posts_dir: &Path) -> Option<PathBuf> {
    if !posts_dir.exists() {
        return None;
    }

    let entries = match fs::read_dir(posts_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(error = %e, dir = %posts_dir.display(), "Failed to list posts directory");
            return None;
        }
    };

    let mut posts: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(time) => time,
            Err(e) => {
                debug!(error = %e, file = %path.display(), "Failed to read mtime");
                return None;
            }
        };
        posts.push((modified, path));
    }

    posts.sort_by(|a, b| b.0.cmp(&a.0));
    posts.into_iter().next().map(|(_, path)| path)
}
