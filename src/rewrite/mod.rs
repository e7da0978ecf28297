//! Namespace rewriting for one document.
//!
//! # Order
//!
//! ```text
//! Document
//!    │
//!    ▼
//! ┌──────┐  per id   ┌──────┐
//! │ ids  │ ────────► │ refs │   rename, then repoint references
//! └──┬───┘ ◄──────── └──────┘
//!    │
//!    ▼
//! ┌───────┐
//! │ class │                     prefix class tokens
//! └───────┘
//! ```
//!
//! Rewriting is not idempotent: running it twice over the same file
//! prefixes everything twice.

mod class;
mod ids;
mod refs;

pub use class::rewrite_classes;
pub use ids::{IdStats, find_duplicate_ids, rewrite_ids};
pub use refs::ReferenceMode;

use crate::document::Document;
use crate::prefix::Prefix;

/// Counts from rewriting one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RewriteStats {
    pub ids: usize,
    pub references: usize,
    pub classes: usize,
    /// Identifiers present on more than one element after rewriting.
    pub duplicate_ids: Vec<String>,
}

/// Rewrite identifiers, their references, then class tokens.
pub fn rewrite_document(doc: &mut Document, prefix: &Prefix, mode: ReferenceMode) -> RewriteStats {
    let IdStats { ids, references } = rewrite_ids(doc, prefix, mode);
    let classes = rewrite_classes(doc, prefix);

    RewriteStats {
        ids,
        references,
        classes,
        duplicate_ids: find_duplicate_ids(doc),
    }
}
