//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start` (usually the cwd)
///
/// Returns the path to the nearest `config_name` file, if any
///
/// # Example
/// ```text
/// /home/user/site/dist/icons/   ← start
/// /home/user/site/svgns.toml    ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================
