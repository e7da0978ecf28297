//! Project configuration from `svgns.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[rewrite]` | Output root, staging source, failure policy, ... |
//!
//! The file is optional. When present it is found by walking upward from
//! the current directory, and relative paths inside it are resolved against
//! the directory holding it. That directory is also the base that prefix
//! keys are computed from, so a project rewrites identically no matter
//! which subdirectory the command runs in.

mod error;
mod util;

pub use error::ConfigError;
pub use util::find_config_file;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::{BatchOptions, FailurePolicy};
use crate::cli::RewriteArgs;
use crate::log;
use crate::rewrite::ReferenceMode;

/// Default output tree, relative to the project base.
pub const DEFAULT_ROOT: &str = "dist";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgns.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SvgnsConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project base: the config file's directory, or the cwd
    #[serde(skip)]
    pub base: PathBuf,

    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// `[rewrite]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Output tree to rewrite in place
    pub root: PathBuf,

    /// Tree whose `.svg` files are staged into `root` first
    pub source: Option<PathBuf>,

    /// Rewrite files on the rayon pool
    pub parallel: bool,

    pub on_error: FailurePolicy,

    pub references: ReferenceMode,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            source: None,
            parallel: false,
            on_error: FailurePolicy::default(),
            references: ReferenceMode::default(),
        }
    }
}

impl SvgnsConfig {
    /// Load configuration, searching upward from `cwd`.
    ///
    /// A missing file is not an error: defaults apply with `cwd` as base.
    pub fn load_from(cwd: &Path, config_name: &Path) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(cwd, config_name) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.base = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf());
                config.config_path = path;
                config
            }
            None => Self {
                base: cwd.to_path_buf(),
                ..Self::default()
            },
        };

        config.validate_paths()?;
        config.normalize_paths();
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        for field in &ignored {
            log!("warning"; "ignoring unknown field `{}` in {}", field, path.display());
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Validate raw paths before they are joined with the base.
    fn validate_paths(&self) -> Result<(), ConfigError> {
        if self.rewrite.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation("`rewrite.root` is empty".into()));
        }
        if self
            .rewrite
            .source
            .as_ref()
            .is_some_and(|source| source.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation("`rewrite.source` is empty".into()));
        }
        Ok(())
    }

    /// Resolve configured paths against the base.
    fn normalize_paths(&mut self) {
        self.rewrite.root = self.base.join(&self.rewrite.root);
        self.rewrite.source = self.rewrite.source.as_ref().map(|s| self.base.join(s));
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply `rewrite` arguments. CLI paths are relative to `cwd`.
    pub fn apply_rewrite_args(&mut self, args: &RewriteArgs, cwd: &Path) {
        Self::update_path(&mut self.rewrite.root, args.root.as_ref(), cwd);
        if let Some(source) = &args.source {
            self.rewrite.source = Some(cwd.join(source));
        }
        if args.parallel {
            self.rewrite.parallel = true;
        }
        if args.keep_going {
            self.rewrite.on_error = FailurePolicy::Continue;
        }
        Self::update_option(&mut self.rewrite.references, args.references.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn update_path(config_path: &mut PathBuf, cli_path: Option<&PathBuf>, cwd: &Path) {
        if let Some(path) = cli_path {
            *config_path = cwd.join(path);
        }
    }

    /// Validate the final configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rewrite = &self.rewrite;
        if rewrite.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation("`rewrite.root` is empty".into()));
        }
        if let Some(source) = &rewrite.source
            && same_path(source, &rewrite.root)
        {
            return Err(ConfigError::Validation(format!(
                "`rewrite.source` and `rewrite.root` are both `{}`",
                rewrite.root.display()
            )));
        }
        Ok(())
    }

    /// Options for a batch run over `rewrite.root`.
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            references: self.rewrite.references,
            on_error: self.rewrite.on_error,
            parallel: self.rewrite.parallel,
            ..BatchOptions::new(&self.base)
        }
    }
}

/// Compare paths, canonicalizing when both exist.
fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.components().eq(b.components()),
    }
}

// ============================================================================
// tests
// ============================================================================
