//! CLI interface using clap
//!
//! Provides the command-line interface for hookdoc

mod commands;

pub use commands::*;

use clap::Parser;
use std::path::PathBuf;

/// hookdoc - Extract documented WordPress hooks into JSON
#[derive(Parser, Debug)]
#[command(name = "hookdoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory of the PHP codebase to scan
    #[arg(short, long, env = "HOOKDOC_INPUT")]
    pub input: PathBuf,

    /// JSON file to write
    #[arg(short, long, env = "HOOKDOC_OUTPUT")]
    pub output: PathBuf,

    /// Skip files whose path contains this fragment (repeatable; replaces
    /// the configured list)
    #[arg(short, long, value_name = "FRAGMENT")]
    pub exclude: Vec<String>,

    /// Keep hooks documented as "This filter is documented in ..."
    #[arg(long)]
    pub keep_reused: bool,

    /// Write absolute file paths instead of paths relative to the input
    #[arg(long)]
    pub absolute_paths: bool,

    /// Scan configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
