use super::api::{ParsedPath, PathParser};
use super::api::Rule;

use pest::consumes_to;
use pest::parses_to;

#[test]
fn test_plain_segment() {
    parses_to! {
        parser: PathParser,
        input: "name",
        rule: Rule::segment,
        tokens: [
            segment(0, 4, [
                name(0, 4)
            ])
        ]
    };
}

#[test]
fn test_attribute_segment() {
    parses_to! {
        parser: PathParser,
        input: "@currency",
        rule: Rule::segment,
        tokens: [
            segment(0, 9, [
                attribute(0, 1),
                name(1, 9)
            ])
        ]
    };
}

#[test]
fn test_indexed_segment() {
    parses_to! {
        parser: PathParser,
        input: "items[3]",
        rule: Rule::segment,
        tokens: [
            segment(0, 8, [
                name(0, 5),
                index(5, 8, [
                    index_token(6, 7)
                ])
            ])
        ]
    };
}

#[test]
fn test_index_token_keeps_dots() {
    let path = ParsedPath::parse("scores[a.b].value").unwrap();
    assert_eq!(path.name(), "scores");
    assert_eq!(path.index(), Some("a.b"));
    assert_eq!(path.child().map(|c| c.name()), Some("value"));
}

#[test]
fn test_nested_path() {
    let path = ParsedPath::parse("@address.lines[2].text").unwrap();
    assert!(path.is_attribute());
    assert_eq!(path.name(), "address");
    assert_eq!(path.index(), None);

    let lines = path.child().unwrap();
    assert!(!lines.is_attribute());
    assert_eq!(lines.name(), "lines");
    assert_eq!(lines.index(), Some("2"));

    let text = lines.child().unwrap();
    assert_eq!(text.name(), "text");
    assert!(text.child().is_none());
}

#[test]
fn test_display_round_trips_source() {
    for source in &["name", "@id", "friends[0].address.street", "scores[x]"] {
        assert_eq!(ParsedPath::parse(source).unwrap().to_string(), *source);
    }
}

#[test]
fn test_rejects_malformed_paths() {
    for source in &["", "items[]", "a..b", "a.", "items[1", "@", "a]"] {
        assert!(
            ParsedPath::parse(source).is_err(),
            "expected '{}' to be rejected",
            source
        );
    }
}
