//! Highlight overlay stores.
//!
//! Two independent span-keyed collections feed the compositor: ad-hoc user
//! highlights and highlights derived from the answer history. A third,
//! simpler store tracks whole-image highlight membership. None of the
//! stores are internally synchronized; a single-threaded event-driven host
//! is assumed, and multi-threaded hosts must serialize access per store.

use crate::doc::{Highlight, SpanId};
use std::collections::{HashMap, HashSet};

pub mod answers;

pub use answers::{Answer, AnswerRequest, HighlightSelection, ImageInfo};

/// Color applied to every answer-derived highlight.
pub const ANSWER_HIGHLIGHT_COLOR: &str = "purple";

/// Span-keyed highlight collection; the contract shared by both stores.
///
/// Query of an unknown span returns an empty slice, removal of an unknown
/// span is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SpanHighlightMap {
    by_span: HashMap<SpanId, Vec<Highlight>>,
}

impl SpanHighlightMap {
    /// Appends highlights to the per-span lists; existing entries are never
    /// overwritten.
    pub fn add(&mut self, highlights: impl IntoIterator<Item = Highlight>) {
        for highlight in highlights {
            self.by_span
                .entry(highlight.span_id.clone())
                .or_default()
                .push(highlight);
        }
    }

    /// Deletes every highlight for the span.
    pub fn remove_span(&mut self, span_id: &str) {
        self.by_span.remove(span_id);
    }

    pub fn clear(&mut self) {
        self.by_span.clear();
    }

    pub fn for_span(&self, span_id: &str) -> &[Highlight] {
        self.by_span.get(span_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn span_ids(&self) -> impl Iterator<Item = &str> {
        self.by_span.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_span.is_empty()
    }

    /// Total highlight count across all spans.
    pub fn len(&self) -> usize {
        self.by_span.values().map(Vec::len).sum()
    }
}

/// Ad-hoc highlights created by direct user action.
#[derive(Debug, Clone, Default)]
pub struct UserHighlightStore {
    highlights: SpanHighlightMap,
}

impl UserHighlightStore {
    pub fn add(&mut self, highlights: impl IntoIterator<Item = Highlight>) {
        self.highlights.add(highlights);
    }

    pub fn remove_span(&mut self, span_id: &str) {
        self.highlights.remove_span(span_id);
    }

    pub fn clear(&mut self) {
        self.highlights.clear();
    }

    pub fn for_span(&self, span_id: &str) -> &[Highlight] {
        self.highlights.for_span(span_id)
    }

    pub fn span_ids(&self) -> impl Iterator<Item = &str> {
        self.highlights.span_ids()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }
}

/// Highlights derived from the answer history; rebuilt wholesale whenever
/// the history changes.
#[derive(Debug, Clone, Default)]
pub struct AnswerHighlightStore {
    highlights: SpanHighlightMap,
}

impl AnswerHighlightStore {
    pub fn add(&mut self, highlights: impl IntoIterator<Item = Highlight>) {
        self.highlights.add(highlights);
    }

    pub fn remove_span(&mut self, span_id: &str) {
        self.highlights.remove_span(span_id);
    }

    pub fn clear(&mut self) {
        self.highlights.clear();
    }

    pub fn for_span(&self, span_id: &str) -> &[Highlight] {
        self.highlights.for_span(span_id)
    }

    pub fn span_ids(&self) -> impl Iterator<Item = &str> {
        self.highlights.span_ids()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    /// Clears the store, then appends one highlight per highlighted-span
    /// descriptor of every answer's originating request, in answer order
    /// then descriptor order. That processing order is what fixes the
    /// stable ordering of accumulated highlights on a shared span.
    pub fn populate(&mut self, answers: &[Answer]) {
        self.highlights.clear();
        for answer in answers {
            let Some(selections) = &answer.request.highlighted_spans else {
                continue;
            };
            for selection in selections {
                self.highlights.add([Highlight {
                    color: ANSWER_HIGHLIGHT_COLOR.to_string(),
                    span_id: selection.span_id.clone(),
                    position: selection.position,
                    answer_id: Some(answer.id.clone()),
                }]);
            }
        }
    }
}

/// Whole-image highlight membership, keyed by storage path. No interval
/// data at this granularity.
#[derive(Debug, Clone, Default)]
pub struct ImageHighlightStore {
    paths: HashSet<String>,
}

impl ImageHighlightStore {
    pub fn add(&mut self, storage_path: impl Into<String>) {
        self.paths.insert(storage_path.into());
    }

    pub fn remove(&mut self, storage_path: &str) {
        self.paths.remove(storage_path);
    }

    pub fn contains(&self, storage_path: &str) -> bool {
        self.paths.contains(storage_path)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}
