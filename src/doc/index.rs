//! Precomputed lookup over a loaded document.
//!
//! Built in one pass when a document loads and discarded wholesale on the
//! next load; it is never patched incrementally. The index borrows the
//! document tree, it does not copy spans.

use super::{Content, ContentKind, Document, ListContent, Section, Span};
use std::collections::HashMap;

/// Flat lookup from span and section ids to their nodes.
///
/// Abstract, reference, and footnote spans are indexed but owned by no
/// section. A span nested inside subsections is owned by the nearest
/// ancestor section, i.e. the section whose own content list contains it.
#[derive(Debug, Default)]
pub struct DocumentIndex<'d> {
    spans: HashMap<&'d str, &'d Span>,
    owners: HashMap<&'d str, &'d Section>,
    sections: HashMap<&'d str, &'d Section>,
    parents: HashMap<&'d str, &'d Section>,
}

impl<'d> DocumentIndex<'d> {
    pub fn build(doc: &'d Document) -> Self {
        let mut index = Self::default();
        if let Some(abstract_content) = &doc.abstract_content {
            for content in &abstract_content.contents {
                index.walk_content(content, None);
            }
        }
        for section in &doc.sections {
            index.walk_section(section, None);
        }
        for reference in &doc.references {
            index.insert_span(&reference.span, None);
        }
        for footnote in &doc.footnotes {
            index.insert_span(&footnote.span, None);
        }
        index
    }

    /// Looks up a span by id.
    pub fn span(&self, id: &str) -> Option<&'d Span> {
        self.spans.get(id).copied()
    }

    /// Returns the section owning a span, or `None` for abstract, reference,
    /// and footnote spans as well as unknown ids.
    pub fn section_for_span(&self, id: &str) -> Option<&'d Section> {
        self.owners.get(id).copied()
    }

    /// Looks up a section by id, at any nesting depth.
    pub fn section(&self, id: &str) -> Option<&'d Section> {
        self.sections.get(id).copied()
    }

    /// Returns a section's parent section, or `None` for top-level sections
    /// and unknown ids.
    pub fn parent_section(&self, id: &str) -> Option<&'d Section> {
        self.parents.get(id).copied()
    }

    pub fn contains_span(&self, id: &str) -> bool {
        self.spans.contains_key(id)
    }

    pub fn span_ids(&self) -> impl Iterator<Item = &'d str> + '_ {
        self.spans.keys().copied()
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &'d str> + '_ {
        self.sections.keys().copied()
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn walk_section(&mut self, section: &'d Section, parent: Option<&'d Section>) {
        self.sections.insert(section.id.as_str(), section);
        if let Some(parent) = parent {
            self.parents.insert(section.id.as_str(), parent);
        }
        for content in &section.contents {
            self.walk_content(content, Some(section));
        }
        for sub in &section.sub_sections {
            self.walk_section(sub, Some(section));
        }
    }

    fn walk_content(&mut self, content: &'d Content, owner: Option<&'d Section>) {
        match &content.kind {
            ContentKind::Text(text) => {
                for span in &text.spans {
                    self.insert_span(span, owner);
                }
            }
            ContentKind::List(list) => self.walk_list(list, owner),
            ContentKind::Image(image) => {
                if let Some(caption) = &image.caption {
                    self.insert_span(caption, owner);
                }
            }
            ContentKind::Figure(figure) => {
                for image in &figure.images {
                    if let Some(caption) = &image.caption {
                        self.insert_span(caption, owner);
                    }
                }
                if let Some(caption) = &figure.caption {
                    self.insert_span(caption, owner);
                }
            }
            ContentKind::HtmlFigure(html) => {
                if let Some(caption) = &html.caption {
                    self.insert_span(caption, owner);
                }
            }
        }
    }

    fn walk_list(&mut self, list: &'d ListContent, owner: Option<&'d Section>) {
        for item in &list.list_items {
            for span in &item.spans {
                self.insert_span(span, owner);
            }
            if let Some(sub) = &item.sub_list_content {
                self.walk_list(sub, owner);
            }
        }
    }

    fn insert_span(&mut self, span: &'d Span, owner: Option<&'d Section>) {
        self.spans.insert(span.id.as_str(), span);
        if let Some(owner) = owner {
            self.owners.insert(span.id.as_str(), owner);
        }
    }
}
