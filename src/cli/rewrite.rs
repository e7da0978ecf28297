//! The rewrite command.
//!
//! Phases:
//! - **Stage** - mirror `source/**/*.svg` into the output tree (optional)
//! - **Collect** - gather every `.svg` under the output tree
//! - **Rewrite** - namespace ids, references and classes per file
//! - **Report** - totals, then every failure

use anyhow::{Context, Result, bail};

use super::plural_count;
use crate::batch::{self, BatchReport, stage::stage_tree};
use crate::config::SvgnsConfig;
use crate::{debug, log};

/// Run a full batch over `config.rewrite.root`.
pub fn rewrite_tree(config: &SvgnsConfig) -> Result<BatchReport> {
    let root = &config.rewrite.root;

    if let Some(source) = &config.rewrite.source {
        let staged = stage_tree(source, root)
            .with_context(|| format!("failed to stage `{}`", source.display()))?;
        log!("stage"; "{} from {}", plural_count(staged.len(), "file"), source.display());
    }

    let options = config.batch_options();
    debug!("rewrite"; "{} (references: {}, on error: {:?}, parallel: {})",
        root.display(), options.references.as_str(), options.on_error, options.parallel);

    let report = batch::run_batch(root, &options, true)?;
    let attempted = report.files.len() + report.failures.len();
    if attempted == 0 {
        log!("rewrite"; "no svg files under {}", root.display());
        return Ok(report);
    }

    for file in &report.files {
        debug!("prefix"; "{}  {}", file.prefix, file.path.display());
    }

    let total = report.total();
    log!("rewrite"; "{}: {}, {}, {}",
        plural_count(report.files.len(), "file"),
        plural_count(total.ids, "id"),
        plural_count(total.references, "reference"),
        plural_count(total.classes, "class token"));

    if !report.is_success() {
        for failure in &report.failures {
            log!("error"; "{}", failure.chain());
        }
        bail!(
            "{} of {} failed",
            plural_count(report.failures.len(), "file"),
            attempted
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FailurePolicy;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const ICON: &str = r#"<svg><clipPath id="c"/><g clip-path="url(#c)" class="icon"/></svg>"#;

    fn config_in(temp: &TempDir) -> SvgnsConfig {
        SvgnsConfig::load_from(temp.path(), Path::new("svgns-missing.toml")).unwrap()
    }

    #[test]
    fn test_rewrite_tree_with_staging() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("icons")).unwrap();
        fs::write(src.join("icons/a.svg"), ICON).unwrap();

        let mut config = config_in(&temp);
        config.rewrite.source = Some(src);
        let report = rewrite_tree(&config).unwrap();

        assert_eq!(report.files.len(), 1);
        let prefix = &report.files[0].prefix;
        let out = fs::read_to_string(temp.path().join("dist/icons/a.svg")).unwrap();
        assert_eq!(
            out,
            format!(
                r#"<svg><clipPath id="{prefix}-c"/><g clip-path="url(#{prefix}-c)" class="{prefix}-icon"/></svg>"#
            )
        );
    }

    #[test]
    fn test_rewrite_tree_empty_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dist")).unwrap();

        let report = rewrite_tree(&config_in(&temp)).unwrap();
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_rewrite_tree_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        assert!(rewrite_tree(&config_in(&temp)).is_err());
    }

    #[test]
    fn test_rewrite_tree_keep_going_still_fails() {
        let temp = TempDir::new().unwrap();
        let dist = temp.path().join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("a.svg"), ICON).unwrap();
        fs::write(dist.join("b.svg"), "<svg>").unwrap();

        let mut config = config_in(&temp);
        config.rewrite.on_error = FailurePolicy::Continue;
        let err = rewrite_tree(&config).unwrap_err();
        assert!(err.to_string().contains("1 file of 2 failed"));
        assert_ne!(fs::read_to_string(dist.join("a.svg")).unwrap(), ICON);
    }
}
