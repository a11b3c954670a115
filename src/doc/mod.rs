//! Structured document model.
//!
//! This module provides the immutable tree a reading session operates on:
//! an optional abstract, an ordered list of sections (each with recursively
//! nested subsections), and flat lists of references, footnotes, and
//! concepts. The atomic addressable unit is the [`Span`]; every span id is
//! unique across the whole document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

pub mod index;

pub type SpanId = String;
pub type SectionId = String;

/// Half-open grapheme range `[start, end)` within a span's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "startIndex")]
    pub start: usize,
    #[serde(rename = "endIndex")]
    pub end: usize,
}

impl Position {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub markdown: String,
    #[serde(default, rename = "abstract")]
    pub abstract_content: Option<Abstract>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub footnotes: Vec<Footnote>,
    #[serde(default)]
    pub summaries: Option<Summaries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Abstract {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub heading: Heading,
    pub contents: Vec<Content>,
    #[serde(default)]
    pub sub_sections: Vec<Section>,
}

/// Heading level is 1-6; the text may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    pub heading_level: u8,
    pub text: String,
}

/// A block of section content. Exactly one variant is populated at a time,
/// which the enum encodes directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    #[serde(flatten)]
    pub kind: ContentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "textContent")]
    Text(TextContent),
    #[serde(rename = "listContent")]
    List(ListContent),
    #[serde(rename = "imageContent")]
    Image(ImageContent),
    #[serde(rename = "figureContent")]
    Figure(FigureContent),
    #[serde(rename = "htmlFigureContent")]
    HtmlFigure(HtmlFigureContent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub tag_name: BlockTag,
    pub spans: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockTag {
    #[serde(rename = "p")]
    Paragraph,
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "pre")]
    Preformatted,
    #[serde(rename = "caption")]
    Caption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContent {
    pub list_items: Vec<ListItem>,
    #[serde(default)]
    pub is_ordered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub spans: Vec<Span>,
    #[serde(default)]
    pub sub_list_content: Option<ListContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub storage_path: String,
    #[serde(default)]
    pub latex_path: String,
    #[serde(default)]
    pub alt_text: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub caption: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureContent {
    pub images: Vec<ImageContent>,
    #[serde(default)]
    pub caption: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlFigureContent {
    pub html: String,
    #[serde(default)]
    pub caption: Option<Span>,
}

/// Atomic addressable unit of text. The text is immutable once constructed;
/// inner tags annotate sub-ranges of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub id: SpanId,
    pub text: String,
    #[serde(default)]
    pub inner_tags: Vec<InnerTag>,
}

impl Span {
    /// Length of the span text in extended grapheme clusters, the unit all
    /// [`Position`] offsets are expressed in.
    pub fn grapheme_len(&self) -> usize {
        self.text.graphemes(true).count()
    }
}

/// Annotation over a sub-range of a span's text.
///
/// Offsets of `children` are relative to this tag's own start. A child range
/// falling outside its parent's range is tolerated; downstream consumers
/// clip defensively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnerTag {
    pub id: String,
    #[serde(rename = "tagName")]
    pub kind: TagKind,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub position: Position,
    #[serde(default)]
    pub children: Vec<InnerTag>,
}

/// Closed set of tag kinds. The compositor matches on this exhaustively, so
/// adding a kind is a compile-time decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagKind {
    #[serde(rename = "b")]
    Bold,
    #[serde(rename = "i")]
    Italic,
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Emphasis,
    #[serde(rename = "u")]
    Underline,
    #[serde(rename = "math")]
    Math,
    #[serde(rename = "math_display")]
    DisplayMath,
    #[serde(rename = "ref")]
    Reference,
    #[serde(rename = "spanref")]
    SpanReference,
    #[serde(rename = "concept")]
    Concept,
    #[serde(rename = "a")]
    Link,
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "footnote")]
    Footnote,
}

/// Colored interval (or whole-span marker when `position` is absent)
/// overlaid on a span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub color: String,
    pub span_id: SpanId,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub answer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub id: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footnote {
    pub id: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contents: Vec<ConceptContent>,
    #[serde(default)]
    pub in_text_citations: Vec<Label>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptContent {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summaries {
    #[serde(default)]
    pub section_summaries: Vec<Summary>,
    #[serde(default)]
    pub content_summaries: Vec<Summary>,
    #[serde(default)]
    pub span_summaries: Vec<Summary>,
    #[serde(default)]
    pub abstract_excerpt_span_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: String,
    pub summary: Span,
}

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("malformed document JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Document {
    /// Deserializes a document produced by the import pipeline.
    pub fn from_json(json: &str) -> Result<Self, DocError> {
        Ok(serde_json::from_str(json)?)
    }
}
