//! Identifier rewriting.

use rustc_hash::FxHashMap;

use super::refs::{ReferenceMode, rewrite_references};
use crate::document::{Document, Element};
use crate::prefix::Prefix;

pub const ID_ATTR: &str = "id";

/// Counts from one identifier pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IdStats {
    /// `id` attributes renamed.
    pub ids: usize,
    /// Reference attributes updated to follow a rename.
    pub references: usize,
}

#[inline]
fn non_empty_id(elem: &Element) -> Option<&str> {
    elem.attr(ID_ATTR).filter(|id| !id.is_empty())
}

/// Prefix every non-empty `id`, then repoint the references to it.
///
/// Identifiers are handled one at a time in document order: rename the
/// n-th one, then rescan the whole document for references to its old
/// value before moving on. Two elements sharing an id end up sharing the
/// new id too.
pub fn rewrite_ids(doc: &mut Document, prefix: &Prefix, mode: ReferenceMode) -> IdStats {
    let mut originals = Vec::new();
    doc.walk(&mut |elem| {
        if let Some(id) = non_empty_id(elem) {
            originals.push(id.to_string());
        }
    });

    let mut stats = IdStats::default();
    for (nth, old_id) in originals.iter().enumerate() {
        let new_id = prefix.qualify(old_id);
        set_nth_id(doc, nth, &new_id);
        stats.ids += 1;
        stats.references += rewrite_references(doc, old_id, &new_id, mode);
    }
    stats
}

/// Overwrite the `id` of the n-th element (document order) that has one.
fn set_nth_id(doc: &mut Document, nth: usize, new_id: &str) {
    let mut seen = 0;
    doc.walk_mut(&mut |elem| {
        if non_empty_id(elem).is_none() {
            return;
        }
        if seen == nth {
            elem.set_attr(ID_ATTR, new_id);
        }
        seen += 1;
    });
}

/// Identifiers that occur on more than one element, in first-seen order.
///
/// Prefixing is injective within a file, so anything reported here was
/// already duplicated in the input.
pub fn find_duplicate_ids(doc: &Document) -> Vec<String> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut order = Vec::new();
    doc.walk(&mut |elem| {
        if let Some(id) = non_empty_id(elem) {
            let count = counts.entry(id).or_insert(0);
            if *count == 0 {
                order.push(id);
            }
            *count += 1;
        }
    });

    order
        .into_iter()
        .filter(|id| counts.get(id).is_some_and(|&n| n > 1))
        .map(str::to_string)
        .collect()
}
