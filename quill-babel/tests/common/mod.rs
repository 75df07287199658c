//! Tests for the frontmatter normalizer.

use proptest::prelude::*;
use quill_babel::normalize_frontmatter as normalize;

#[test]
fn test_dotted_closer_is_rewritten_with_crlf() {
    assert_eq!(
        normalize("---\r\nkey: 1\r\n...\r\nbody"),
        "---\r\nkey: 1\r\n---\r\nbody"
    );
}

#[test]
fn test_dash_closer_wins_over_later_dots() {
    let source = "---\ntitle: x\n---\n...\n";
    assert_eq!(normalize(source), source);
}

#[test]
fn test_unterminated_block_passes_through() {
    let source = "---\ntitle: x\nno closer here\n";
    assert_eq!(normalize(source), source);
}

#[test]
fn test_only_leading_block_is_considered() {
    let source = "intro\n---\nkey: 1\n...\n";
    assert_eq!(normalize(source), source);
}

#[test]
fn test_fixture_offsets_survive_normalization() {
    let source = include_str!("../fixtures/kitchensink.md");
    let normalized = normalize(source);
    assert_eq!(normalized.len(), source.len());
    assert!(normalized.starts_with("---\ntitle: Kitchen Sink\ntags: [markdown, html]\n---\n"));
}

fn frontmatter_like() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just("---".to_string()),
        Just("...".to_string()),
        Just("".to_string()),
        "[a-z: 0-9.-]{0,12}",
    ];
    let eol = prop_oneof![Just("\n"), Just("\r\n"), Just("\n\r")];
    (prop::collection::vec(line, 0..8), eol).prop_map(|(lines, eol)| lines.join(eol))
}

proptest! {
    #[test]
    fn normalize_is_idempotent(source in frontmatter_like()) {
        let once = normalize(&source).into_owned();
        let twice = normalize(&once).into_owned();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn normalize_preserves_length(source in frontmatter_like()) {
        prop_assert_eq!(normalize(&source).len(), source.len());
    }

    #[test]
    fn normalize_ignores_sources_without_opener(source in "[^-][a-z\\n.-]{0,40}") {
        prop_assert_eq!(normalize(&source), source.as_str());
    }
}
