//! Per-character formatting and highlight composition.
//!
//! Given a span's text, its flattened tags, and the highlights collected
//! from every store that targets the span, this module computes one merged
//! rendering decision per character and coalesces the result into a flat
//! unit stream the rendering layer can paint directly.

use crate::doc::{Highlight, InnerTag, Position, TagKind};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

pub mod flatten;

pub use flatten::flatten_tags;

/// How the compositor treats a tag kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagRole {
    /// Marks its character range with formatting.
    Formatting,
    /// Marks its range, and contiguous runs of the same kind render as one
    /// equation unit.
    Math { display: bool },
    /// Renders no characters; contributes an interactive marker anchored at
    /// its start offset.
    Insertion,
}

fn tag_role(kind: TagKind) -> TagRole {
    match kind {
        TagKind::Bold
        | TagKind::Italic
        | TagKind::Strong
        | TagKind::Emphasis
        | TagKind::Underline
        | TagKind::Concept
        | TagKind::Link
        | TagKind::Code => TagRole::Formatting,
        TagKind::Math => TagRole::Math { display: false },
        TagKind::DisplayMath => TagRole::Math { display: true },
        TagKind::Reference | TagKind::SpanReference | TagKind::Footnote => TagRole::Insertion,
    }
}

/// Merged decision for a single character: the active tags (at most one per
/// kind, earliest processed wins) and the active highlights, in processing
/// order.
#[derive(Debug, Clone, Default)]
pub struct CharCell<'a> {
    pub tags: Vec<&'a InnerTag>,
    pub highlights: Vec<&'a Highlight>,
}

impl<'a> CharCell<'a> {
    pub fn kinds(&self) -> impl Iterator<Item = TagKind> + '_ {
        self.tags.iter().map(|tag| tag.kind)
    }

    pub fn has_kind(&self, kind: TagKind) -> bool {
        self.tags.iter().any(|tag| tag.kind == kind)
    }

    pub fn is_plain(&self) -> bool {
        self.tags.is_empty() && self.highlights.is_empty()
    }

    fn math_kind(&self) -> Option<TagKind> {
        self.kinds()
            .find(|kind| matches!(tag_role(*kind), TagRole::Math { .. }))
    }
}

/// One renderable piece of a composed span.
#[derive(Debug, Clone)]
pub enum Unit<'a> {
    /// Interactive marker (citation badge, footnote marker) inserted into
    /// the character stream at its anchor offset.
    Marker { tag: &'a InnerTag },
    /// A single character with its merged decision.
    Glyph {
        index: usize,
        text: &'a str,
        cell: CharCell<'a>,
    },
    /// A maximal contiguous run of one math kind, rendered as a single
    /// equation. The cell is the decision at the run's first character.
    Equation {
        range: Position,
        text: String,
        display: bool,
        cell: CharCell<'a>,
    },
}

/// Result of composing one span.
#[derive(Debug, Clone, Default)]
pub struct Composition<'a> {
    pub units: Vec<Unit<'a>>,
}

impl<'a> Composition<'a> {
    /// True when every unit is an unformatted, unhighlighted character.
    pub fn is_plain(&self) -> bool {
        self.units.iter().all(|unit| match unit {
            Unit::Glyph { cell, .. } => cell.is_plain(),
            _ => false,
        })
    }

    pub fn glyph_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit, Unit::Glyph { .. }))
            .count()
    }
}

/// Composes a span's text with its flattened tags and highlights.
///
/// `tags` must already be in absolute offsets (see [`flatten_tags`]);
/// out-of-range intervals are clipped, never an error. A highlight without
/// a position covers the whole span. Insertions at an index are emitted
/// before the character or equation starting there; an insertion at the
/// end-of-text offset is appended after the last character.
pub fn compose<'a>(
    text: &'a str,
    tags: &'a [InnerTag],
    highlights: &[&'a Highlight],
) -> Composition<'a> {
    let glyphs: Vec<&'a str> = text.graphemes(true).collect();
    let len = glyphs.len();

    // Plain fast path: nothing to merge, one bare unit per character.
    if tags.is_empty() && highlights.is_empty() {
        let units = glyphs
            .into_iter()
            .enumerate()
            .map(|(index, text)| Unit::Glyph {
                index,
                text,
                cell: CharCell::default(),
            })
            .collect();
        return Composition { units };
    }

    let mut cells: Vec<CharCell<'a>> = vec![CharCell::default(); len];
    let mut insertions: BTreeMap<usize, Vec<&'a InnerTag>> = BTreeMap::new();

    for tag in tags {
        match tag_role(tag.kind) {
            TagRole::Insertion => {
                // Valid anchors are [0, len]; len means "after the last
                // character". Anything further out is dropped.
                if tag.position.start <= len {
                    insertions.entry(tag.position.start).or_default().push(tag);
                }
            }
            TagRole::Formatting | TagRole::Math { .. } => {
                for index in tag.position.start..tag.position.end {
                    if index >= len {
                        break;
                    }
                    let cell = &mut cells[index];
                    if !cell.has_kind(tag.kind) {
                        cell.tags.push(tag);
                    }
                }
            }
        }
    }

    for &highlight in highlights {
        let (start, end) = match highlight.position {
            Some(position) => (position.start, position.end),
            None => (0, len),
        };
        for index in start..end {
            if index >= len {
                break;
            }
            cells[index].highlights.push(highlight);
        }
    }

    let mut units = Vec::with_capacity(len);
    let mut index = 0;
    while index < len {
        if let Some(pending) = insertions.remove(&index) {
            units.extend(pending.into_iter().map(|tag| Unit::Marker { tag }));
        }
        if let Some(math_kind) = cells[index].math_kind() {
            let mut end = index + 1;
            while end < len && cells[end].math_kind() == Some(math_kind) {
                end += 1;
            }
            units.push(Unit::Equation {
                range: Position::new(index, end),
                text: glyphs[index..end].concat(),
                display: math_kind == TagKind::DisplayMath,
                cell: std::mem::take(&mut cells[index]),
            });
            // Insertions anchored strictly inside the run must not split
            // the equation; they surface right after it.
            for interior in index + 1..end {
                if let Some(pending) = insertions.remove(&interior) {
                    units.extend(pending.into_iter().map(|tag| Unit::Marker { tag }));
                }
            }
            index = end;
        } else {
            units.push(Unit::Glyph {
                index,
                text: glyphs[index],
                cell: std::mem::take(&mut cells[index]),
            });
            index += 1;
        }
    }
    for (_, pending) in std::mem::take(&mut insertions) {
        units.extend(pending.into_iter().map(|tag| Unit::Marker { tag }));
    }

    Composition { units }
}
