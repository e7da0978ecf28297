//! svgns - namespace the ids and classes of svg files so that many of them
//! can be inlined into one HTML page without colliding.

mod batch;
mod cli;
mod config;
mod document;
mod logger;
mod prefix;
mod rewrite;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SvgnsConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.is_verbose());

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let mut config = SvgnsConfig::load_from(&cwd, &cli.config)?;
    if !config.config_path.as_os_str().is_empty() {
        debug!("config"; "using {}", config.config_path.display());
    }

    match &cli.command {
        Commands::Rewrite { args } => {
            config.apply_rewrite_args(args, &cwd);
            config.validate()?;
            cli::rewrite::rewrite_tree(&config).map(|_| ())
        }
        Commands::Prefix { paths } => {
            cli::prefix::print_prefixes(&config, &cwd, paths);
            Ok(())
        }
    }
}
