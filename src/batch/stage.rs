//! Staging: mirror a source tree of SVG files into the output tree.
//!
//! `src/icons/a.svg` is copied to `dist/icons/a.svg`. No optimization
//! happens here; the rewrite phase only starts once staging is done.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RewriteError, collect_svg_files};
use crate::debug;

/// Copy every `.svg` under `source` to the same relative path under
/// `output`. Returns the written paths in sorted order.
pub fn stage_tree(source: &Path, output: &Path) -> Result<Vec<PathBuf>, RewriteError> {
    let files = collect_svg_files(source)?;
    let mut staged = Vec::with_capacity(files.len());

    for file in &files {
        let Ok(relative) = file.strip_prefix(source) else {
            continue;
        };
        let dest = output.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| RewriteError::Io(parent.to_path_buf(), e))?;
        }
        fs::copy(file, &dest).map_err(|e| RewriteError::Io(file.clone(), e))?;
        debug!("stage"; "{}", relative.display());
        staged.push(dest);
    }

    Ok(staged)
}
