//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::rewrite::ReferenceMode;

/// Namespace ids and classes of svg files so they can be inlined side by side
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: svgns.toml)
    #[arg(short = 'C', long, global = true, default_value = "svgns.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite every svg file under the output tree in place
    #[command(visible_alias = "r")]
    Rewrite {
        #[command(flatten)]
        args: RewriteArgs,
    },

    /// Print the prefix each path would be namespaced with
    #[command(visible_alias = "p")]
    Prefix {
        /// Paths of svg files (need not exist)
        #[arg(required = true, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
        paths: Vec<PathBuf>,
    },
}

/// Arguments of the rewrite command
#[derive(clap::Args, Debug, Clone)]
pub struct RewriteArgs {
    /// Output tree to rewrite (default: `rewrite.root`, or `dist`)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Stage svg files from this tree into the output tree first
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Rewrite files in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Keep going after a file fails and report all failures at the end
    #[arg(short, long)]
    pub keep_going: bool,

    /// Which attribute values count as references
    #[arg(short, long, value_enum)]
    pub references: Option<ReferenceMode>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        match &self.command {
            Commands::Rewrite { args } => args.verbose,
            Commands::Prefix { .. } => false,
        }
    }
}
