//! Reference rewriting.
//!
//! After an `id` is renamed, every attribute that points at it has to follow,
//! otherwise gradients, clip paths and filters silently stop resolving.
//!
//! Only a closed set of attributes is considered, and only exact values:
//!
//! | Attribute              | Form                                    |
//! |------------------------|-----------------------------------------|
//! | `clip-path`, `fill`, `filter` | `url(#id)`                       |
//! | `href`, `xlink:href`   | `url(#id)`, plus `#id` in `direct` mode |
//!
//! `url(#id) extra` or a value with surrounding whitespace is not a match.

use serde::Deserialize;

use crate::document::{Document, Element};

/// Hyperlink-style reference attributes.
pub const HYPERLINK_ATTRS: [&str; 2] = ["href", "xlink:href"];

/// Functional (`url(#…)`) reference attributes.
pub const FUNCTIONAL_ATTRS: [&str; 3] = ["clip-path", "fill", "filter"];

/// Which value forms count as a reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// `url(#id)` everywhere, and `#id` on `href`/`xlink:href`.
    #[default]
    Direct,
    /// `url(#id)` only. Direct hyperlink references are left pointing at the
    /// old name.
    Functional,
}

impl ReferenceMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Functional => "functional",
        }
    }
}

/// Old and new spellings of one renamed identifier.
struct Renamed {
    old_direct: String,
    old_functional: String,
    new_direct: String,
    new_functional: String,
}

impl Renamed {
    fn new(old_id: &str, new_id: &str) -> Self {
        Self {
            old_direct: format!("#{old_id}"),
            old_functional: format!("url(#{old_id})"),
            new_direct: format!("#{new_id}"),
            new_functional: format!("url(#{new_id})"),
        }
    }
}

#[inline]
fn is_hyperlink(name: &str) -> bool {
    HYPERLINK_ATTRS.contains(&name)
}

#[inline]
fn is_functional(name: &str) -> bool {
    FUNCTIONAL_ATTRS.contains(&name)
}

/// Point every exact reference to `old_id` at `new_id`.
///
/// Scans the whole document. Returns the number of attributes changed; zero
/// is not an error.
pub fn rewrite_references(
    doc: &mut Document,
    old_id: &str,
    new_id: &str,
    mode: ReferenceMode,
) -> usize {
    let renamed = Renamed::new(old_id, new_id);
    let mut changed = 0;
    doc.walk_mut(&mut |elem| changed += rewrite_element(elem, &renamed, mode));
    changed
}

fn rewrite_element(elem: &mut Element, renamed: &Renamed, mode: ReferenceMode) -> usize {
    let mut changed = 0;
    for attr in &mut elem.attrs {
        let hyperlink = is_hyperlink(&attr.name);
        if !hyperlink && !is_functional(&attr.name) {
            continue;
        }

        // `fill="#abc"` is a color: the direct form only applies to hyperlinks
        if attr.value == renamed.old_functional {
            attr.value.clone_from(&renamed.new_functional);
            changed += 1;
        } else if hyperlink && mode == ReferenceMode::Direct && attr.value == renamed.old_direct {
            attr.value.clone_from(&renamed.new_direct);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(text: &str, mode: ReferenceMode) -> (String, usize) {
        let mut doc = Document::parse(text).unwrap();
        let changed = rewrite_references(&mut doc, "g1", "p-g1", mode);
        (doc.to_xml().unwrap(), changed)
    }

    #[test]
    fn test_functional_attributes() {
        for attr in FUNCTIONAL_ATTRS {
            let input = format!(r#"<svg><rect {attr}="url(#g1)"/></svg>"#);
            let (out, changed) = rewrite(&input, ReferenceMode::Direct);
            assert_eq!(out, format!(r#"<svg><rect {attr}="url(#p-g1)"/></svg>"#));
            assert_eq!(changed, 1);
        }
    }

    #[test]
    fn test_exact_match_only() {
        let inputs = [
            r#"<svg><rect fill="url(#g1) extra"/></svg>"#,
            r#"<svg><rect fill="url(#g1) "/></svg>"#,
            r#"<svg><rect fill="url(#g10)"/></svg>"#,
            r#"<svg><rect fill="url('#g1')"/></svg>"#,
        ];
        for input in inputs {
            let (out, changed) = rewrite(input, ReferenceMode::Direct);
            assert_eq!(out, input);
            assert_eq!(changed, 0);
        }
    }

    #[test]
    fn test_attributes_outside_the_set_are_ignored() {
        let input = r#"<svg><rect stroke="url(#g1)" mask="url(#g1)"/></svg>"#;
        let (out, changed) = rewrite(input, ReferenceMode::Direct);
        assert_eq!(out, input);
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_direct_hyperlink_references() {
        let input = r##"<svg><use href="#g1"/><use xlink:href="#g1"/></svg>"##;

        let (out, changed) = rewrite(input, ReferenceMode::Direct);
        assert_eq!(out, r##"<svg><use href="#p-g1"/><use xlink:href="#p-g1"/></svg>"##);
        assert_eq!(changed, 2);

        let (out, changed) = rewrite(input, ReferenceMode::Functional);
        assert_eq!(out, input);
        assert_eq!(changed, 0);
    }

    #[test]
    fn test_hyperlink_functional_form_matches_in_both_modes() {
        let input = r#"<svg><use href="url(#g1)"/></svg>"#;
        for mode in [ReferenceMode::Direct, ReferenceMode::Functional] {
            let (out, _) = rewrite(input, mode);
            assert_eq!(out, r#"<svg><use href="url(#p-g1)"/></svg>"#);
        }
    }

    #[test]
    fn test_fill_color_is_not_a_direct_reference() {
        let mut doc = Document::parse(r##"<svg><rect fill="#abc"/></svg>"##).unwrap();
        assert_eq!(
            rewrite_references(&mut doc, "abc", "p-abc", ReferenceMode::Direct),
            0
        );
        assert_eq!(doc.to_xml().unwrap(), r##"<svg><rect fill="#abc"/></svg>"##);
    }

    #[test]
    fn test_every_matching_attribute_on_an_element() {
        let (out, changed) = rewrite(
            r#"<svg><rect clip-path="url(#g1)" fill="url(#g1)" filter="url(#g1)"/></svg>"#,
            ReferenceMode::Direct,
        );
        assert_eq!(
            out,
            r#"<svg><rect clip-path="url(#p-g1)" fill="url(#p-g1)" filter="url(#p-g1)"/></svg>"#
        );
        assert_eq!(changed, 3);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ReferenceMode::default(), ReferenceMode::Direct);
        assert_eq!(ReferenceMode::Functional.as_str(), "functional");
    }
}
