//! Class list rewriting.
//!
//! Selectors inside `<style>` are not touched; only the `class` attributes.

use crate::document::Document;
use crate::prefix::Prefix;

pub const CLASS_ATTR: &str = "class";

/// Prefix every token of every `class` attribute.
///
/// Returns the number of tokens rewritten.
pub fn rewrite_classes(doc: &mut Document, prefix: &Prefix) -> usize {
    let mut tokens = 0;
    doc.walk_mut(&mut |elem| {
        let Some(value) = elem.attr(CLASS_ATTR) else {
            return;
        };
        if let Some((rewritten, count)) = prefix_class_list(value, prefix) {
            elem.set_attr(CLASS_ATTR, rewritten);
            tokens += count;
        }
    });
    tokens
}

/// `"a  b"` -> `"<p>-a <p>-b"`. `None` when there is no token at all.
fn prefix_class_list(value: &str, prefix: &Prefix) -> Option<(String, usize)> {
    let tokens: Vec<String> = value
        .split_whitespace()
        .map(|token| prefix.qualify(token))
        .collect();
    if tokens.is_empty() {
        return None;
    }
    let count = tokens.len();
    Some((tokens.join(" "), count))
}
