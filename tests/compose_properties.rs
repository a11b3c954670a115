//! Property-based tests for tag flattening and composition.

use folio::{compose, flatten_tags, Highlight, InnerTag, Position, TagKind, Unit};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeMap;
mod proptest_config;

fn kind_strategy() -> impl Strategy<Value = TagKind> {
    prop_oneof![
        Just(TagKind::Bold),
        Just(TagKind::Italic),
        Just(TagKind::Underline),
        Just(TagKind::Code),
        Just(TagKind::Link),
        Just(TagKind::Math),
        Just(TagKind::DisplayMath),
        Just(TagKind::Reference),
        Just(TagKind::Footnote),
    ]
}

fn leaf_tag_strategy() -> impl Strategy<Value = InnerTag> {
    (kind_strategy(), 0usize..64, 0usize..64).prop_map(|(kind, a, b)| InnerTag {
        id: "t".to_string(),
        kind,
        metadata: BTreeMap::new(),
        position: Position::new(a, b),
        children: Vec::new(),
    })
}

fn tag_tree_strategy() -> impl Strategy<Value = InnerTag> {
    leaf_tag_strategy().prop_recursive(3, 12, 4, |inner| {
        (kind_strategy(), 0usize..64, 0usize..64, vec(inner, 0..4)).prop_map(
            |(kind, a, b, children)| InnerTag {
                id: "t".to_string(),
                kind,
                metadata: BTreeMap::new(),
                position: Position::new(a, b),
                children,
            },
        )
    })
}

fn count_tags(tags: &[InnerTag]) -> usize {
    tags.iter().map(|tag| 1 + count_tags(&tag.children)).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn test_flatten_preserves_tag_count(tags in vec(tag_tree_strategy(), 0..5)) {
        let flat = flatten_tags(&tags);
        prop_assert_eq!(flat.len(), count_tags(&tags));
        prop_assert!(flat.iter().all(|tag| tag.children.is_empty()));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn test_flatten_offsets_accumulate_ancestor_starts(
        outer_start in 0usize..32,
        outer_len in 0usize..32,
        child_start in 0usize..32,
        child_len in 0usize..32,
    ) {
        let tags = vec![InnerTag {
            id: "outer".to_string(),
            kind: TagKind::Bold,
            metadata: BTreeMap::new(),
            position: Position::new(outer_start, outer_start + outer_len),
            children: vec![InnerTag {
                id: "child".to_string(),
                kind: TagKind::Italic,
                metadata: BTreeMap::new(),
                position: Position::new(child_start, child_start + child_len),
                children: Vec::new(),
            }],
        }];
        let flat = flatten_tags(&tags);
        prop_assert_eq!(flat[1].position.start, outer_start + child_start);
        prop_assert_eq!(flat[1].position.end, outer_start + child_start + child_len);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn test_compose_is_bounds_safe_for_arbitrary_tags(
        text in "[a-z ]{0,24}",
        tags in vec(tag_tree_strategy(), 0..6),
        highlight_ranges in vec((0usize..80, 0usize..80), 0..4),
    ) {
        let flat = flatten_tags(&tags);
        let highlights: Vec<Highlight> = highlight_ranges
            .into_iter()
            .map(|(a, b)| Highlight {
                color: "yellow".to_string(),
                span_id: "s".to_string(),
                position: Some(Position::new(a, b)),
                answer_id: None,
            })
            .collect();
        let refs: Vec<&Highlight> = highlights.iter().collect();
        let composition = compose(&text, &flat, &refs);

        let len = text.chars().count();
        let mut covered = 0usize;
        for unit in &composition.units {
            match unit {
                Unit::Glyph { index, .. } => {
                    prop_assert!(*index < len);
                    covered += 1;
                }
                Unit::Equation { range, text, .. } => {
                    prop_assert!(range.start < len && range.end <= len);
                    covered += range.len();
                    prop_assert_eq!(text.chars().count(), range.len());
                }
                Unit::Marker { tag } => {
                    prop_assert!(tag.position.start <= len);
                }
            }
        }
        // Every character is rendered exactly once, as a glyph or inside
        // an equation run.
        prop_assert_eq!(covered, len);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn test_plain_spans_compose_to_bare_glyphs(text in "[a-z ]{0,32}") {
        let composition = compose(&text, &[], &[]);
        prop_assert!(composition.is_plain());
        prop_assert_eq!(composition.units.len(), text.chars().count());
    }
}
