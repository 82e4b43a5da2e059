//! Runtime configuration for the `last` command: built-in defaults merged
//! with the first `.pulsewriter.yaml` found. This is the only place where
//! untrusted YAML is parsed.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = ".pulsewriter.yaml";

/// Effective configuration after defaults and file override are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub posts_dir: PathBuf,
    pub out_dir: PathBuf,
    pub default_platforms: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("./_posts"),
            out_dir: PathBuf::from("./out"),
            default_platforms: vec![
                "blog".to_string(),
                "linkedin".to_string(),
                "x".to_string(),
                "devto".to_string(),
            ],
        }
    }
}

/// File-side schema: every key optional. A key present in the file overrides
/// the default for that key even when the value is falsy (e.g. an empty
/// platform list); absent keys fall back.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub posts_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub default_platforms: Option<Vec<String>>,
}

impl RuntimeConfig {
    fn merge(mut self, file: FileConfig) -> Self {
        if let Some(posts_dir) = file.posts_dir {
            self.posts_dir = posts_dir;
        }
        if let Some(out_dir) = file.out_dir {
            self.out_dir = out_dir;
        }
        if let Some(platforms) = file.default_platforms {
            self.default_platforms = platforms;
        }
        self
    }
}

/// Candidate config locations in priority order: current working directory,
/// then the home directory. Only the first existing file is consulted.
fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(CONFIG_FILE_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(CONFIG_FILE_NAME));
    }
    candidates
}

/// Resolve the effective runtime config. A missing config file is not an
/// error; a found-but-unparsable one is fatal.
pub fn load_runtime_config() -> Result<RuntimeConfig> {
    for path in candidate_paths() {
        if !path.exists() {
            continue;
        }
        info!(config_path = %path.display(), "Loading configuration from file");
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let file: FileConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        return Ok(RuntimeConfig::default().merge(file));
    }
    debug!("No config file found, using defaults");
    Ok(RuntimeConfig::default())
}
