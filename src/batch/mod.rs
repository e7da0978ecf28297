//! Batch rewriting of an output tree.
//!
//! # Flow
//!
//! ```text
//! root/
//!   │  collect_svg_files (jwalk, sorted)
//!   ▼
//! [a.svg, icons/b.svg, ...]
//!   │  rewrite_file, one file at a time (or on rayon)
//!   ▼
//! read -> parse -> ids+refs -> classes -> serialize -> overwrite
//! ```
//!
//! Files never share state: the prefix is a pure function of the path, and
//! each document is owned by the call that parsed it.

mod error;
pub mod stage;


pub use error::RewriteError;

use jwalk::WalkDir;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::document::{Document, DocumentError};
use crate::logger::ProgressLine;
use crate::prefix::{Prefix, derive_prefix};
use crate::rewrite::{ReferenceMode, RewriteStats, rewrite_document};
use crate::{debug, log};

/// Extension of the files a batch run picks up.
pub const SVG_EXTENSION: &str = "svg";

/// What to do when one file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing file.
    #[default]
    Abort,
    /// Attempt every file and report failures at the end.
    Continue,
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Prefixes are derived from file paths relative to this directory
    /// (when the file lives under it).
    pub base: PathBuf,
    pub references: ReferenceMode,
    pub on_error: FailurePolicy,
    pub parallel: bool,
}

impl BatchOptions {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            references: ReferenceMode::default(),
            on_error: FailurePolicy::default(),
            parallel: false,
        }
    }
}

/// Outcome of rewriting one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub prefix: Prefix,
    pub stats: RewriteStats,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// Only filled under [`FailurePolicy::Continue`].
    pub failures: Vec<RewriteError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> RewriteStats {
        let mut total = RewriteStats::default();
        for file in &self.files {
            total.ids += file.stats.ids;
            total.references += file.stats.references;
            total.classes += file.stats.classes;
        }
        total
    }
}

/// Collect every `.svg` file under `root`, at any depth, in sorted order.
pub fn collect_svg_files(root: &Path) -> Result<Vec<PathBuf>, RewriteError> {
    let meta = fs::metadata(root).map_err(|e| RewriteError::Io(root.to_path_buf(), e))?;
    if !meta.is_dir() {
        return Err(RewriteError::Io(
            root.to_path_buf(),
            io::Error::other("not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort(true) {
        let entry = entry.map_err(|e| RewriteError::Walk(root.to_path_buf(), e))?;
        let path = entry.path();
        if entry.file_type().is_file() && is_svg(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

#[inline]
fn is_svg(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SVG_EXTENSION)
}

/// Path the prefix is derived from.
///
/// Relative to `base` when possible, so `dist/icons/a.svg` hashes the same
/// whether the root was given as `dist`, `src/../dist` or an absolute path.
/// Both paths are normalized lexically first; symlinks are not followed.
pub fn prefix_key(path: &Path, base: &Path) -> PathBuf {
    let path = normalize_lexically(path);
    let base = normalize_lexically(base);
    match path.strip_prefix(&base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    }
}

/// Drop `.` and fold `name/..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let after_name = matches!(out.components().next_back(), Some(Component::Normal(_)));
                let at_root = out.has_root() && out.parent().is_none();
                if after_name {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Rewrite document text for the file at `key`.
pub fn rewrite_text(
    key: &Path,
    text: &str,
    mode: ReferenceMode,
) -> Result<(String, Prefix, RewriteStats), DocumentError> {
    let prefix = derive_prefix(key);
    let mut doc = Document::parse(text)?;
    let stats = rewrite_document(&mut doc, &prefix, mode);
    Ok((doc.to_xml()?, prefix, stats))
}

/// Read, rewrite and overwrite one file.
pub fn rewrite_file(path: &Path, options: &BatchOptions) -> Result<FileReport, RewriteError> {
    let io_err = |e| RewriteError::Io(path.to_path_buf(), e);

    let text = fs::read_to_string(path).map_err(io_err)?;
    let key = prefix_key(path, &options.base);
    let (output, prefix, stats) = rewrite_text(&key, &text, options.references)
        .map_err(|e| RewriteError::Parse(path.to_path_buf(), e))?;
    fs::write(path, output).map_err(io_err)?;

    debug!("rewrite"; "{} ({}): {} ids, {} refs, {} classes",
        key.display(), prefix, stats.ids, stats.references, stats.classes);
    for id in &stats.duplicate_ids {
        log!("warning"; "{}: id `{}` is used by more than one element", key.display(), id);
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        prefix,
        stats,
    })
}

/// Rewrite every `.svg` file under `root`.
///
/// Under [`FailurePolicy::Abort`] the first error is returned (files already
/// written stay written). Under [`FailurePolicy::Continue`] errors are
/// collected into the report; only a failed walk is returned as `Err`.
pub fn run_batch(
    root: &Path,
    options: &BatchOptions,
    show_progress: bool,
) -> Result<BatchReport, RewriteError> {
    let files = collect_svg_files(root)?;
    if !show_progress || files.is_empty() {
        return run_files(&files, options, None);
    }

    let progress = ProgressLine::new("rewrite", &[("svg", files.len())]);
    let report = run_files(&files, options, Some(&progress));
    if report.is_ok() {
        progress.finish();
    }
    report
}

/// Same as [`run_batch`] over an explicit file list.
pub fn run_files(
    files: &[PathBuf],
    options: &BatchOptions,
    progress: Option<&ProgressLine>,
) -> Result<BatchReport, RewriteError> {
    let process = |path: &PathBuf| {
        let result = rewrite_file(path, options);
        if let Some(progress) = progress {
            progress.inc("svg");
        }
        result
    };

    match (options.on_error, options.parallel) {
        (FailurePolicy::Abort, false) => {
            let files = files.iter().map(process).collect::<Result<Vec<_>, _>>()?;
            Ok(BatchReport {
                files,
                failures: Vec::new(),
            })
        }
        (FailurePolicy::Abort, true) => {
            let files = files.par_iter().map(process).collect::<Result<Vec<_>, _>>()?;
            Ok(BatchReport {
                files,
                failures: Vec::new(),
            })
        }
        (FailurePolicy::Continue, false) => {
            Ok(partition(files.iter().map(process).collect()))
        }
        (FailurePolicy::Continue, true) => {
            Ok(partition(files.par_iter().map(process).collect()))
        }
    }
}

fn partition(results: Vec<Result<FileReport, RewriteError>>) -> BatchReport {
    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(file) => report.files.push(file),
            Err(e) => report.failures.push(e),
        }
    }
    report
}
