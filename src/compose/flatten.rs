//! Inner tag flattening.
//!
//! Nested tags carry offsets relative to their parent's start. The
//! compositor wants one flat list in the span's own coordinate space, so
//! this pass rebases every tag and strips the nesting.

use crate::doc::{InnerTag, Position};

/// Flattens a span's tag tree into absolute-offset tags, depth-first: each
/// tag is emitted (children cleared) immediately before its own subtree,
/// then its siblings. Offsets are not validated; out-of-range input flows
/// through and downstream consumers clip.
pub fn flatten_tags(tags: &[InnerTag]) -> Vec<InnerTag> {
    let mut flat = Vec::new();
    push_rebased(tags, 0, &mut flat);
    flat
}

fn push_rebased(tags: &[InnerTag], base: usize, flat: &mut Vec<InnerTag>) {
    for tag in tags {
        let start = base + tag.position.start;
        let end = base + tag.position.end;
        flat.push(InnerTag {
            id: tag.id.clone(),
            kind: tag.kind,
            metadata: tag.metadata.clone(),
            position: Position::new(start, end),
            children: Vec::new(),
        });
        push_rebased(&tag.children, start, flat);
    }
}
