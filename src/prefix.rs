//! Per-file namespace prefixes.
//!
//! Every SVG file gets a short token derived from its path. The token is
//! prepended to each `id` and `class` in that file, so two files that both
//! define `#g1` no longer clash once they are inlined into the same page.
//!
//! ```ignore
//! let prefix = derive_prefix(Path::new("dist/icons/a.svg"));
//! assert_eq!(prefix.as_str().len(), 8);
//! assert!(prefix.qualify("g1").ends_with("-g1"));
//! ```

use std::fmt;
use std::path::{Component, Path};

/// Number of hex characters kept from the path hash.
pub const PREFIX_LEN: usize = 8;

/// Joins the prefix and the original name.
pub const SEPARATOR: char = '-';

/// Deterministic namespace token for one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    /// Get the raw token.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualify a name with this prefix: `name` -> `<prefix>-name`.
    pub fn qualify(&self, name: &str) -> String {
        let mut out = String::with_capacity(PREFIX_LEN + 1 + name.len());
        out.push_str(&self.0);
        out.push(SEPARATOR);
        out.push_str(name);
        out
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the prefix for a file path.
///
/// Hashes the path string (not the file content) with blake3 and keeps the
/// first 8 hex chars. The path is normalized first (`.` components dropped,
/// `/` separators), so a tree produces the same prefixes on every platform.
pub fn derive_prefix(path: &Path) -> Prefix {
    derive_prefix_str(&normalize_path(path))
}

/// Derive the prefix for an already normalized path string.
pub fn derive_prefix_str(path: &str) -> Prefix {
    let hash = blake3::hash(path.as_bytes());
    Prefix(hex::encode(&hash.as_bytes()[..PREFIX_LEN / 2]))
}

fn normalize_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_prefix_is_deterministic() {
        let a = derive_prefix(Path::new("dist/icons/a.svg"));
        let b = derive_prefix(Path::new("dist/icons/a.svg"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_prefix_shape() {
        let prefix = derive_prefix(Path::new("dist/icons/a.svg"));
        assert_eq!(prefix.as_str().len(), PREFIX_LEN);
        assert!(
            prefix
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_prefix_matches_blake3_hex() {
        let hex = blake3::hash(b"dist/icons/a.svg").to_hex();
        assert_eq!(
            derive_prefix(Path::new("dist/icons/a.svg")).as_str(),
            &hex[..PREFIX_LEN]
        );
    }

    #[test]
    fn test_prefix_distinct_over_corpus() {
        let paths = [
            "dist/a.svg",
            "dist/b.svg",
            "dist/icons/a.svg",
            "dist/icons/b.svg",
            "dist/icons/arrow-left.svg",
            "dist/icons/arrow-right.svg",
            "dist/logo/mark.svg",
            "dist/logo/wordmark.svg",
            "dist/illust/hero.svg",
            "dist/illust/footer.svg",
            "icons/a.svg",
            "a.svg",
        ];
        let prefixes: FxHashSet<_> = paths.iter().map(|p| derive_prefix_str(p)).collect();
        assert_eq!(prefixes.len(), paths.len());
    }

    #[test]
    fn test_prefix_ignores_current_dir_components() {
        assert_eq!(
            derive_prefix(Path::new("./dist/./icons/a.svg")),
            derive_prefix_str("dist/icons/a.svg")
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("dist/icons/a.svg")), "dist/icons/a.svg");
        assert_eq!(normalize_path(Path::new("/srv/dist/a.svg")), "/srv/dist/a.svg");
        assert_eq!(normalize_path(Path::new("../dist/a.svg")), "../dist/a.svg");
    }

    #[test]
    fn test_qualify() {
        let prefix = Prefix("3f2a9c1d".to_string());
        assert_eq!(prefix.qualify("g1"), "3f2a9c1d-g1");
        assert_eq!(prefix.to_string(), "3f2a9c1d");
    }
}
