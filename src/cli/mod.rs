//! Command-line interface module.

mod args;
pub mod prefix;
pub mod rewrite;

pub use args::{Cli, Commands, RewriteArgs};

/// `"1 file"`, `"3 files"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}
