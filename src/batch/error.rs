//! Per-file errors of a batch run.

use std::path::PathBuf;
use thiserror::Error;

use crate::document::DocumentError;

/// Why a file (or the walk itself) failed.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse `{0}`")]
    Parse(PathBuf, #[source] DocumentError),

    #[error("failed to walk `{0}`")]
    Walk(PathBuf, #[source] jwalk::Error),
}

impl RewriteError {
    /// Error message including the source chain, on one line.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_rewrite_error_display() {
        let err = RewriteError::Io(
            PathBuf::from("dist/a.svg"),
            Error::new(ErrorKind::PermissionDenied, "permission denied"),
        );
        assert!(err.to_string().contains("dist/a.svg"));
        assert!(err.chain().ends_with("permission denied"));
    }

    #[test]
    fn test_parse_error_chain() {
        let err = RewriteError::Parse(PathBuf::from("b.svg"), DocumentError::NoRoot);
        assert_eq!(
            err.chain(),
            "failed to parse `b.svg`: document has no root element"
        );
    }
}
