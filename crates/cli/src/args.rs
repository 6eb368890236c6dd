use clap::{Args as ClapArgs, Parser, Subcommand};
use loader::TargetMode;
use std::path::PathBuf;

use crate::output::Format;

fn parse_target(s: &str) -> Result<TargetMode, String> {
    s.parse().map_err(|e: loader::ConfigError| e.to_string())
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("threads must be greater than 0".into())
    } else {
        Ok(v)
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Rewrites insecure java.io.File.createTempFile usages to java.nio.file.Files",
    long_about = "tempguard reads Java compilation units exported as JSON syntax trees and
replaces File.createTempFile calls with Files.createTempFile(..).toFile().
Where a temp file is created, deleted and recreated as a directory, the
sequence collapses into a single Files.createTempDirectory(..).toFile().

Examples:
  tempguard rewrite units/                      # Rewrite every unit in place
  tempguard rewrite units/ --out fixed/         # Write rewritten units elsewhere
  tempguard rewrite units/ --dry-run            # Print the rewritten Java
  tempguard rules verify rules/                 # Validate rule files",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite compilation units
    Rewrite(RewriteArgs),
    /// Manage rule configuration files
    #[command(subcommand, alias = "rule")]
    Rules(RulesCmd),
}

#[derive(ClapArgs)]
pub struct RewriteArgs {
    /// Unit JSON file or directory of unit files
    pub path: PathBuf,
    /// Rule file or directory of rule files
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Sources to rewrite; overrides any rule file
    #[arg(long, value_parser = parse_target)]
    pub target: Option<TargetMode>,
    /// Directory receiving the rewritten units (default: rewrite in place)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Number of parallel threads
    #[arg(long, default_value_t = default_threads(), value_parser = parse_threads)]
    pub threads: usize,
    /// Fold `if` statements left with a constant condition
    #[arg(long = "simplify-branches")]
    pub simplify_branches: bool,
    /// Print the rewritten Java instead of writing files
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Format of the run summary
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum RulesCmd {
    /// Verify that rule files load and their options are valid
    Verify {
        /// Path to the rules directory or file
        path: PathBuf,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
