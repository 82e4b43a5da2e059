//! Template rendering over embedded handlebars assets.
//!
//! The [`Renderer`] is constructed once per process and shared by reference;
//! there is no hidden global template cache. All templates are compiled into
//! the binary, so rendering is a pure function of the context.

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use crate::platform::Platform;

/// Context supplied to every platform template.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub summary: String,
    pub body: String,
    pub tone: String,
    pub persona: String,
    pub word_target: u32,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Failed to register template: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("Failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Renders platform drafts from the embedded template set.
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    /// Build a renderer with all platform templates registered.
    ///
    /// Escaping is disabled: output is markdown/plain text and context values
    /// must appear verbatim, not HTML-entity-encoded.
    pub fn new() -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        for platform in Platform::ALL {
            handlebars.register_template_string(platform.template_id(), template_source(platform))?;
        }

        Ok(Self { handlebars })
    }

    /// Render one template by id.
    pub fn render(&self, template_id: &str, context: &RenderContext) -> Result<String, RenderError> {
        if !self.handlebars.has_template(template_id) {
            return Err(RenderError::TemplateNotFound(template_id.to_string()));
        }
        Ok(self.handlebars.render(template_id, context)?)
    }

    pub fn has_template(&self, template_id: &str) -> bool {
        self.handlebars.has_template(template_id)
    }
}

fn template_source(platform: Platform) -> &'static str {
    match platform {
        Platform::Blog => include_str!("../templates/blog.hbs"),
        Platform::Linkedin => include_str!("../templates/linkedin.hbs"),
        Platform::X => include_str!("../templates/x_thread.hbs"),
        Platform::Devto => include_str!("../templates/devto.hbs"),
    }
}
