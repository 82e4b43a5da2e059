use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of publishing targets. Adding a platform means adding a
/// variant here and extending the mapping tables below; the compiler flags
/// every `match` that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Blog,
    Linkedin,
    X,
    Devto,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatformError(pub String);

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Blog,
        Platform::Linkedin,
        Platform::X,
        Platform::Devto,
    ];

    /// The identifier used in CLI arguments, config files and API requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Blog => "blog",
            Platform::Linkedin => "linkedin",
            Platform::X => "x",
            Platform::Devto => "devto",
        }
    }

    /// Name of the embedded template rendered for this platform.
    pub fn template_id(&self) -> &'static str {
        match self {
            Platform::Blog => "blog",
            Platform::Linkedin => "linkedin",
            Platform::X => "x_thread",
            Platform::Devto => "devto",
        }
    }

    /// Key identifying this platform's draft in a [`crate::DraftSet`].
    pub fn output_key(&self) -> &'static str {
        match self {
            Platform::Blog => "blog_md",
            Platform::Linkedin => "linkedin_md",
            Platform::X => "x_thread",
            Platform::Devto => "devto_md",
        }
    }

    /// File extension for drafts written to disk. Keys ending in `_md` are
    /// markdown, everything else is plain text.
    pub fn file_extension(&self) -> &'static str {
        if self.output_key().ends_with("_md") {
            ".md"
        } else {
            ".txt"
        }
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(Platform::Blog),
            "linkedin" => Ok(Platform::Linkedin),
            "x" => Ok(Platform::X),
            "devto" => Ok(Platform::Devto),
            other => Err(UnknownPlatformError(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a whole request's platform identifiers up front.
///
/// Validating before any rendering starts makes generation atomic: a request
/// containing an invalid identifier produces no drafts at all.
pub fn parse_platforms<S: AsRef<str>>(
    identifiers: &[S],
) -> Result<Vec<Platform>, UnknownPlatformError> {
    identifiers
        .iter()
        .map(|s| s.as_ref().parse())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_round_trips() {
        for platform in Platform::ALL {
            let parsed: Platform = platform.as_str().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let err = "mastodon".parse::<Platform>().unwrap_err();
        assert_eq!(err, UnknownPlatformError("mastodon".to_string()));
        assert_eq!(err.to_string(), "Unknown platform: mastodon");
    }

    #[test]
    fn output_keys_and_extensions() {
        assert_eq!(Platform::Blog.output_key(), "blog_md");
        assert_eq!(Platform::Linkedin.output_key(), "linkedin_md");
        assert_eq!(Platform::X.output_key(), "x_thread");
        assert_eq!(Platform::Devto.output_key(), "devto_md");
        assert_eq!(Platform::X.file_extension(), ".txt");
        assert_eq!(Platform::Devto.file_extension(), ".md");
    }

    #[test]
    fn parse_platforms_preserves_order() {
        let parsed = parse_platforms(&["x", "blog"]).unwrap();
        assert_eq!(parsed, vec![Platform::X, Platform::Blog]);
    }

    #[test]
    fn parse_platforms_fails_on_first_invalid() {
        let err = parse_platforms(&["blog", "threads", "x"]).unwrap_err();
        assert_eq!(err.0, "threads");
    }

    #[test]
    fn serde_uses_lowercase_identifiers() {
        let json = serde_json::to_string(&Platform::Devto).unwrap();
        assert_eq!(json, "\"devto\"");
        let back: Platform = serde_json::from_str("\"linkedin\"").unwrap();
        assert_eq!(back, Platform::Linkedin);
    }
}
