//! folio: span-addressed document model and annotation overlay engine.
//!
//! This crate is the framework-independent core of a reading application
//! that overlays AI-generated annotations onto structured academic
//! documents. It includes:
//!
//! - **Document model** - Immutable section/span/tag tree with its JSON shape
//! - **Document index** - Span and section lookups built once per load
//! - **Compositor** - Per-character merge of formatting tags and highlights
//! - **Highlight stores** - User, answer-derived, and image overlays
//! - **Selection resolver** - Raw text selections back to span offsets
//! - **Session state** - Document lifecycle, answer history, view state
//!
//! # Quick Start
//!
//! ```rust
//! use folio::{compose, flatten_tags, Document, DocumentIndex};
//!
//! let json = r#"{
//!     "sections": [{
//!         "id": "sec1",
//!         "heading": { "headingLevel": 1, "text": "Intro" },
//!         "contents": [{
//!             "id": "c1",
//!             "textContent": {
//!                 "tagName": "p",
//!                 "spans": [{ "id": "s1", "text": "Hello world" }]
//!             }
//!         }]
//!     }]
//! }"#;
//!
//! let doc = Document::from_json(json).unwrap();
//! let index = DocumentIndex::build(&doc);
//!
//! let span = index.span("s1").unwrap();
//! let tags = flatten_tags(&span.inner_tags);
//! let composition = compose(&span.text, &tags, &[]);
//! assert_eq!(composition.glyph_count(), 11);
//! ```

// Document model and index
pub mod doc;

// Formatting/highlight composition
pub mod compose;

// Highlight stores and the answer model
pub mod overlay;

// Selection resolution over the rendered tree
pub mod select;

// Session-level state
pub mod session;

// Re-export model types
pub use doc::{
    Abstract, BlockTag, Concept, ConceptContent, Content, ContentKind, DocError, Document,
    FigureContent, Footnote, Heading, Highlight, HtmlFigureContent, ImageContent, InnerTag, Label,
    ListContent, ListItem, Position, Reference, Section, SectionId, Span, SpanId, Summaries,
    Summary, TagKind, TextContent,
};

// Re-export the index
pub use doc::index::DocumentIndex;

// Re-export composition types
pub use compose::{compose, flatten_tags, CharCell, Composition, Unit};

// Re-export overlay stores and the answer model
pub use overlay::{
    Answer, AnswerHighlightStore, AnswerRequest, HighlightSelection, ImageHighlightStore,
    ImageInfo, SpanHighlightMap, UserHighlightStore, ANSWER_HIGHLIGHT_COLOR,
};

// Re-export selection types
pub use select::{
    resolve_selection, NodeId, NodeKind, RawSelection, RenderTree, SelectionResult, SpanRange,
};

// Re-export session types
pub use session::{ReaderSession, SidebarTab, ViewState};
