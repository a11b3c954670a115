//! Q&A answer model.
//!
//! Answers arrive from the backend answering pipeline; each carries the
//! request that produced it, including the span selections the question was
//! asked about. The answer store derives highlights from those selections.

use crate::doc::{Content, Position, SpanId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub request: AnswerRequest,
    pub response_content: Vec<Content>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub highlighted_spans: Option<Vec<HighlightSelection>>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
}

/// A highlighted sub-range of a span in an answer request. An absent
/// position means the whole span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSelection {
    pub span_id: SpanId,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub image_storage_path: String,
    #[serde(default)]
    pub caption: Option<String>,
}
