//! Bounded textual revision of existing drafts. Not a regeneration: the only
//! transformations are first-line truncation and an instruction marker.

use tracing::debug;

use crate::transform::DraftSet;

const FIRST_LINE_MAX_CHARS: usize = 120;

/// Apply the revision pass to every recognized draft in `drafts`.
///
/// Recognized keys end in `_md` or `_thread`; anything else is dropped from
/// the result rather than passed through. The first line of each recognized
/// draft is truncated to 120 characters and the instructions are appended
/// verbatim inside an HTML comment marker.
pub fn revise(drafts: &DraftSet, instructions: &str) -> DraftSet {
    let mut revised = DraftSet::new();
    for (key, text) in drafts {
        if !(key.ends_with("_md") || key.ends_with("_thread")) {
            debug!(key = %key, "Dropping unrecognized draft key");
            continue;
        }

        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if let Some(first) = lines.first_mut() {
            if first.chars().count() > FIRST_LINE_MAX_CHARS {
                *first = first.chars().take(FIRST_LINE_MAX_CHARS).collect();
            }
        }

        revised.insert(
            key.clone(),
            format!("{}\n\n<!-- Revised: {} -->", lines.join("\n"), instructions),
        );
    }
    revised
}
