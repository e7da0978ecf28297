//! The prefix command: show the prefix a path would receive.

use std::path::{Path, PathBuf};

use crate::batch::prefix_key;
use crate::config::SvgnsConfig;
use crate::prefix::{Prefix, derive_prefix};

/// Prefix for `path` (relative to `cwd`) within the project at `config.base`.
pub fn prefix_for(config: &SvgnsConfig, cwd: &Path, path: &Path) -> (PathBuf, Prefix) {
    let key = prefix_key(&cwd.join(path), &config.base);
    let prefix = derive_prefix(&key);
    (key, prefix)
}

/// Print `<prefix>  <key>` for each path.
pub fn print_prefixes(config: &SvgnsConfig, cwd: &Path, paths: &[PathBuf]) {
    for path in paths {
        let (key, prefix) = prefix_for(config, cwd, path);
        println!("{}  {}", prefix, key.display());
    }
}
