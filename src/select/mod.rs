//! Selection resolution.
//!
//! Maps a raw text selection (a start/end boundary pair over the rendered
//! tree) back into span ids and grapheme offsets. The resolver operates on
//! a synthetic [`RenderTree`] mirroring the rendering convention — one
//! plain-span glyph element per character inside each span-rendering unit,
//! with marker elements interleaved at their insertion points — so the
//! offset arithmetic is testable without a live browser tree.
//!
//! The resolver is stateless and purely functional; it is safe to call on
//! every selection-change notification.

use crate::doc::{Position, SpanId};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Generic block container.
    Container,
    /// Custom element rendering one document span.
    SpanUnit { span_id: SpanId },
    /// Plain-span element holding one rendered character.
    Glyph { text: String },
    /// Non-character inline element (citation badge, footnote marker).
    Marker,
    /// Any other plain inline `span` wrapper.
    Anchor,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena model of the rendered document tree.
#[derive(Debug, Clone, Default)]
pub struct RenderTree {
    nodes: Vec<Node>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.push(id);
        }
        id
    }

    /// Appends a span-rendering unit with one glyph child per grapheme.
    pub fn push_span_unit(&mut self, parent: Option<NodeId>, span_id: &str, text: &str) -> NodeId {
        let unit = self.push(
            parent,
            NodeKind::SpanUnit {
                span_id: span_id.to_string(),
            },
        );
        self.push_glyphs(unit, text);
        unit
    }

    /// Appends one glyph child per grapheme of `text`.
    pub fn push_glyphs(&mut self, parent: NodeId, text: &str) {
        use unicode_segmentation::UnicodeSegmentation;
        for grapheme in text.graphemes(true) {
            self.push(
                Some(parent),
                NodeKind::Glyph {
                    text: grapheme.to_string(),
                },
            );
        }
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of glyph children of a unit, i.e. its text length.
    pub fn glyph_count(&self, unit: NodeId) -> usize {
        self.children(unit)
            .iter()
            .filter(|child| matches!(self.kind(**child), Some(NodeKind::Glyph { .. })))
            .count()
    }

    /// First glyph child of a unit, counting in text space.
    pub fn glyph_at(&self, unit: NodeId, text_index: usize) -> Option<NodeId> {
        self.children(unit)
            .iter()
            .copied()
            .filter(|child| matches!(self.kind(*child), Some(NodeKind::Glyph { .. })))
            .nth(text_index)
    }

    fn ancestor_or_self(
        &self,
        id: NodeId,
        matches: impl Fn(&NodeKind) -> bool,
    ) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            let kind = self.kind(node)?;
            if matches(kind) {
                return Some(node);
            }
            cursor = self.parent(node);
        }
        None
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|sibling| *sibling == id)?;
        siblings.get(index + 1).copied()
    }

    /// Text-space offset of a boundary within its unit: the index of the
    /// boundary's direct-child container among the unit's children, minus
    /// the marker elements preceding it.
    fn text_offset(&self, unit: NodeId, boundary: NodeId) -> Option<usize> {
        let mut container = boundary;
        while self.parent(container)? != unit {
            container = self.parent(container)?;
        }
        let children = self.children(unit);
        let rendered_index = children.iter().position(|child| *child == container)?;
        let markers_before = children[..rendered_index]
            .iter()
            .filter(|child| matches!(self.kind(**child), Some(NodeKind::Marker)))
            .count();
        Some(rendered_index - markers_before)
    }

    fn span_id_of(&self, unit: NodeId) -> Option<&str> {
        match self.kind(unit)? {
            NodeKind::SpanUnit { span_id } => Some(span_id.as_str()),
            _ => None,
        }
    }
}

/// Raw selection input: the stringified selected text plus the boundary
/// nodes, absent when the host reports no active range.
#[derive(Debug, Clone, Default)]
pub struct RawSelection {
    pub text: String,
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
}

impl RawSelection {
    pub fn new(text: impl Into<String>, start: NodeId, end: NodeId) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            end: Some(end),
        }
    }
}

/// Which sub-range of which span a selection covered. The range is
/// half-open in grapheme space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRange {
    pub span_id: SpanId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// The plain selected text as reported by the host.
    pub text: String,
    /// Nearest plain-span element of the start boundary, for positioning
    /// follow-up UI.
    pub anchor: NodeId,
    /// Selected sub-ranges in document order.
    pub ranges: Vec<SpanRange>,
}

fn is_named_unit(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::SpanUnit { span_id } if !span_id.is_empty())
}

fn is_plain_span(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Glyph { .. } | NodeKind::Anchor)
}

/// Resolves a raw selection to span ids and offsets, or `None` when the
/// selection is unusable (empty text, missing boundary, no identifiable
/// span-rendering unit or anchor element, units not flat siblings).
/// Callers treat `None` as "do nothing".
pub fn resolve_selection(tree: &RenderTree, selection: &RawSelection) -> Option<SelectionResult> {
    if selection.text.trim().is_empty() {
        return None;
    }
    let start = selection.start?;
    let end = selection.end?;
    let start_unit = tree.ancestor_or_self(start, is_named_unit)?;
    let end_unit = tree.ancestor_or_self(end, is_named_unit)?;
    let anchor = tree.ancestor_or_self(start, is_plain_span)?;

    let start_offset = tree.text_offset(start_unit, start)?;
    let mut ranges = Vec::new();
    if start_unit == end_unit {
        let end_offset = tree.text_offset(end_unit, end)?;
        ranges.push(SpanRange {
            span_id: tree.span_id_of(start_unit)?.to_string(),
            position: Position::new(start_offset, end_offset + 1),
        });
    } else {
        ranges.push(SpanRange {
            span_id: tree.span_id_of(start_unit)?.to_string(),
            position: Position::new(start_offset, tree.glyph_count(start_unit) + 1),
        });
        let mut cursor = start_unit;
        loop {
            cursor = tree.next_sibling(cursor)?;
            if cursor == end_unit {
                let end_offset = tree.text_offset(end_unit, end)?;
                ranges.push(SpanRange {
                    span_id: tree.span_id_of(end_unit)?.to_string(),
                    position: Position::new(0, end_offset + 1),
                });
                break;
            }
            if !tree.kind(cursor).is_some_and(is_named_unit) {
                continue;
            }
            ranges.push(SpanRange {
                span_id: tree.span_id_of(cursor)?.to_string(),
                position: Position::new(0, tree.glyph_count(cursor) + 1),
            });
        }
    }

    Some(SelectionResult {
        text: selection.text.clone(),
        anchor,
        ranges,
    })
}
