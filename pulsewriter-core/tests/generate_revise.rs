//! Pipeline tests over the public crate API: parse -> generate -> revise.

use pulsewriter_core::{
    generate, parse_platforms, revise, Platform, Renderer, TransformConfig,
};

const POST: &str = "\
# Shipping in small steps

Big launches hide risk.

Small steps surface it early.
";

#[test]
fn full_pipeline_generates_then_revises_every_draft() {
    let renderer = Renderer::new().expect("embedded templates register");
    let platforms = parse_platforms(&["blog", "linkedin", "x", "devto"]).unwrap();

    let drafts = generate(&renderer, POST, &platforms, &TransformConfig::default()).unwrap();
    assert_eq!(drafts.len(), 4);
    for text in drafts.values() {
        assert!(text.contains("Big launches hide risk."));
    }

    let revised = revise(&drafts, "punchier opening");
    assert_eq!(revised.len(), 4, "all generated keys are recognized suffixes");
    for text in revised.values() {
        assert!(text.ends_with("<!-- Revised: punchier opening -->"));
    }
}

#[test]
fn invalid_identifier_fails_before_any_rendering() {
    // Parsing rejects the whole request, so a caller never holds a partial
    // draft set for a request containing an unknown platform.
    let err = parse_platforms(&["blog", "substack"]).unwrap_err();
    assert_eq!(err.to_string(), "Unknown platform: substack");
}

#[test]
fn summary_is_identity_on_short_blank_free_input() {
    let renderer = Renderer::new().unwrap();
    let text = "line a\nline b\nline c";
    let drafts = generate(
        &renderer,
        text,
        &[Platform::Linkedin],
        &TransformConfig::default(),
    )
    .unwrap();
    // The linkedin template opens with the summary block.
    assert!(drafts["linkedin_md"].starts_with("line a\nline b\nline c"));
}

#[test]
fn word_target_is_a_hint_passed_through_not_enforced() {
    let renderer = Renderer::new().unwrap();
    let config = TransformConfig {
        word_target: 12,
        ..TransformConfig::default()
    };
    let drafts = generate(&renderer, POST, &[Platform::Blog], &config).unwrap();
    assert!(drafts["blog_md"].contains("12"));
    assert!(drafts["blog_md"].contains("Small steps surface it early."));
}
