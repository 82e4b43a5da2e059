//! Draft generation: one markdown source in, one draft per platform out.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::platform::Platform;
use crate::render::{RenderContext, RenderError, Renderer};

/// Mapping of output key to rendered draft text. Insertion order follows the
/// order platforms were requested, which callers rely on for file naming.
pub type DraftSet = IndexMap<String, String>;

/// Knobs shared by every platform template.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    pub tone: String,
    pub persona: String,
    pub word_target: u32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            tone: "practical".to_string(),
            persona: "action-oriented".to_string(),
            word_target: 600,
        }
    }
}

/// First `max_lines` non-blank lines, each trimmed, joined by newlines.
/// A fixed heuristic, not a summarizer.
fn summarize(text: &str, max_lines: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one draft per requested platform, in request order.
///
/// Platforms arrive already parsed into the closed enum, so an unknown
/// identifier is rejected before this function runs and no partial draft set
/// is ever produced.
pub fn generate(
    renderer: &Renderer,
    base_text: &str,
    platforms: &[Platform],
    config: &TransformConfig,
) -> Result<DraftSet, RenderError> {
    info!(platforms = platforms.len(), "Generating platform drafts");

    let context = RenderContext {
        summary: summarize(base_text, 5),
        body: base_text.to_string(),
        tone: config.tone.clone(),
        persona: config.persona.clone(),
        word_target: config.word_target,
    };

    let mut outputs = DraftSet::new();
    for platform in platforms {
        let rendered = renderer.render(platform.template_id(), &context)?;
        debug!(platform = %platform, key = platform.output_key(), "Rendered draft");
        outputs.insert(platform.output_key().to_string(), rendered);
    }

    info!(drafts = outputs.len(), "Generation complete");
    Ok(outputs)
}
