//! Reading session state.
//!
//! Owns the loaded document, the highlight stores, the answer history, and
//! the per-document view state. Loading a new document discards the old
//! index space wholesale: stores and view state are cleared, and a fresh
//! [`DocumentIndex`] is built over the new tree.

use crate::doc::index::DocumentIndex;
use crate::doc::Document;
use crate::overlay::{
    Answer, AnswerHighlightStore, AnswerRequest, ImageHighlightStore, UserHighlightStore,
};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Sidebar panel selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SidebarTab {
    #[default]
    Outline,
    Answers,
    Concepts,
}

/// Per-document UI state: which sections and answers are collapsed and
/// which sidebar tab is active. Holds no text algorithms; structural
/// validity comes from the [`DocumentIndex`] where an operation needs it.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    collapsed_sections: HashSet<String>,
    collapsed_answers: HashSet<String>,
    tab: SidebarTab,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_section_collapsed(&mut self, section_id: &str, collapsed: bool) {
        if collapsed {
            self.collapsed_sections.insert(section_id.to_string());
        } else {
            self.collapsed_sections.remove(section_id);
        }
    }

    /// Flips a section's collapse state and returns the new value.
    pub fn toggle_section(&mut self, section_id: &str) -> bool {
        let collapsed = !self.is_section_collapsed(section_id);
        self.set_section_collapsed(section_id, collapsed);
        collapsed
    }

    pub fn is_section_collapsed(&self, section_id: &str) -> bool {
        self.collapsed_sections.contains(section_id)
    }

    /// Collapses every section known to the index, dropping any stale ids.
    pub fn collapse_all_sections(&mut self, index: &DocumentIndex<'_>) {
        self.collapsed_sections = index.section_ids().map(str::to_string).collect();
    }

    pub fn expand_all_sections(&mut self) {
        self.collapsed_sections.clear();
    }

    pub fn set_answer_collapsed(&mut self, answer_id: &str, collapsed: bool) {
        if collapsed {
            self.collapsed_answers.insert(answer_id.to_string());
        } else {
            self.collapsed_answers.remove(answer_id);
        }
    }

    pub fn toggle_answer(&mut self, answer_id: &str) -> bool {
        let collapsed = !self.is_answer_collapsed(answer_id);
        self.set_answer_collapsed(answer_id, collapsed);
        collapsed
    }

    pub fn is_answer_collapsed(&self, answer_id: &str) -> bool {
        self.collapsed_answers.contains(answer_id)
    }

    pub fn set_tab(&mut self, tab: SidebarTab) {
        self.tab = tab;
    }

    pub fn tab(&self) -> SidebarTab {
        self.tab
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Top-level session state for one reader.
#[derive(Debug, Default)]
pub struct ReaderSession {
    doc: Option<Document>,
    pub user_highlights: UserHighlightStore,
    pub answer_highlights: AnswerHighlightStore,
    pub image_highlights: ImageHighlightStore,
    answers: Vec<Answer>,
    pub view: ViewState,
}

impl ReaderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the loaded document. All stores, the answer history, and
    /// the view state belong to the old id space and are cleared.
    pub fn load_document(&mut self, doc: Document) {
        let index = DocumentIndex::build(&doc);
        let (spans, sections) = (index.span_count(), index.section_count());
        tracing::info!(spans, sections, "document loaded");
        self.doc = Some(doc);
        self.user_highlights.clear();
        self.answer_highlights.clear();
        self.image_highlights.clear();
        self.answers.clear();
        self.view.reset();
    }

    pub fn clear_document(&mut self) {
        self.doc = None;
        self.user_highlights.clear();
        self.answer_highlights.clear();
        self.image_highlights.clear();
        self.answers.clear();
        self.view.reset();
    }

    pub fn document(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    /// Builds the index over the loaded document. Built once per load by
    /// the hosting view; queries borrow the session's document.
    pub fn index(&self) -> Option<DocumentIndex<'_>> {
        self.doc.as_ref().map(DocumentIndex::build)
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Records a locally produced answer: mints an id and timestamp,
    /// appends to the history, and rebuilds the answer highlights.
    /// Returns the minted answer id.
    pub fn record_answer(
        &mut self,
        request: AnswerRequest,
        response_content: Vec<crate::doc::Content>,
    ) -> String {
        let answer = Answer {
            id: Uuid::new_v4().to_string(),
            request,
            response_content,
            timestamp: epoch_seconds(),
        };
        let id = answer.id.clone();
        tracing::debug!(answer_id = %id, "answer recorded");
        self.answers.push(answer);
        self.answer_highlights.populate(&self.answers);
        id
    }

    /// Bulk-replaces the answer history (e.g. restored from persistence)
    /// and rebuilds the answer highlights.
    pub fn set_answers(&mut self, answers: Vec<Answer>) {
        self.answers = answers;
        self.answer_highlights.populate(&self.answers);
        tracing::debug!(count = self.answers.len(), "answer history replaced");
    }
}

fn epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{
        Abstract, BlockTag, Content, ContentKind, Heading, Highlight, Section, Span, TextContent,
    };
    use crate::overlay::HighlightSelection;

    fn doc_with_one_span(span_id: &str) -> Document {
        Document {
            markdown: String::new(),
            abstract_content: Some(Abstract {
                contents: Vec::new(),
            }),
            sections: vec![Section {
                id: "sec1".to_string(),
                heading: Heading {
                    heading_level: 1,
                    text: "One".to_string(),
                },
                contents: vec![Content {
                    id: "c1".to_string(),
                    kind: ContentKind::Text(TextContent {
                        tag_name: BlockTag::Paragraph,
                        spans: vec![Span {
                            id: span_id.to_string(),
                            text: "text".to_string(),
                            inner_tags: Vec::new(),
                        }],
                    }),
                }],
                sub_sections: Vec::new(),
            }],
            concepts: Vec::new(),
            references: Vec::new(),
            footnotes: Vec::new(),
            summaries: None,
        }
    }

    #[test]
    fn test_load_document_clears_previous_state() {
        let mut session = ReaderSession::new();
        session.load_document(doc_with_one_span("s1"));
        session.user_highlights.add([Highlight {
            color: "yellow".to_string(),
            span_id: "s1".to_string(),
            position: None,
            answer_id: None,
        }]);
        session.image_highlights.add("images/a.png");
        session.view.set_section_collapsed("sec1", true);
        session.record_answer(
            AnswerRequest {
                highlighted_spans: Some(vec![HighlightSelection {
                    span_id: "s1".to_string(),
                    position: None,
                }]),
                ..AnswerRequest::default()
            },
            Vec::new(),
        );
        assert_eq!(session.answer_highlights.len(), 1);

        session.load_document(doc_with_one_span("s2"));
        assert!(session.user_highlights.is_empty());
        assert!(session.answer_highlights.is_empty());
        assert!(session.image_highlights.is_empty());
        assert!(session.answers().is_empty());
        assert!(!session.view.is_section_collapsed("sec1"));
        assert!(session.index().unwrap().contains_span("s2"));
    }

    #[test]
    fn test_record_answer_populates_answer_store() {
        let mut session = ReaderSession::new();
        session.load_document(doc_with_one_span("s1"));
        let request = AnswerRequest {
            query: Some("why".to_string()),
            highlighted_spans: Some(vec![HighlightSelection {
                span_id: "s1".to_string(),
                position: None,
            }]),
            ..AnswerRequest::default()
        };
        let id = session.record_answer(request, Vec::new());
        assert!(!id.is_empty());
        let derived = session.answer_highlights.for_span("s1");
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].answer_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_set_answers_rebuilds_store() {
        let mut session = ReaderSession::new();
        session.load_document(doc_with_one_span("s1"));
        session.record_answer(
            AnswerRequest {
                highlighted_spans: Some(vec![HighlightSelection {
                    span_id: "s1".to_string(),
                    position: None,
                }]),
                ..AnswerRequest::default()
            },
            Vec::new(),
        );
        session.set_answers(Vec::new());
        assert!(session.answers().is_empty());
        assert!(session.answer_highlights.is_empty());
    }

    #[test]
    fn test_view_state_collapse_round_trip() {
        let mut view = ViewState::new();
        assert!(!view.is_section_collapsed("sec1"));
        assert!(view.toggle_section("sec1"));
        assert!(view.is_section_collapsed("sec1"));
        assert!(!view.toggle_section("sec1"));
        view.set_answer_collapsed("a1", true);
        assert!(view.is_answer_collapsed("a1"));
        view.set_tab(SidebarTab::Answers);
        assert_eq!(view.tab(), SidebarTab::Answers);
        view.reset();
        assert_eq!(view.tab(), SidebarTab::Outline);
        assert!(!view.is_answer_collapsed("a1"));
    }

    #[test]
    fn test_collapse_all_uses_index_sections() {
        let mut session = ReaderSession::new();
        session.load_document(doc_with_one_span("s1"));
        let doc = session.document().cloned().unwrap();
        let index = DocumentIndex::build(&doc);
        let mut view = ViewState::new();
        view.set_section_collapsed("stale", true);
        view.collapse_all_sections(&index);
        assert!(view.is_section_collapsed("sec1"));
        assert!(!view.is_section_collapsed("stale"));
    }

    #[test]
    fn test_session_without_document() {
        let session = ReaderSession::new();
        assert!(session.document().is_none());
        assert!(session.index().is_none());
    }
}
