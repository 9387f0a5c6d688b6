//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Extensions Index checks - validate extension description files
#[derive(Parser, Debug)]
#[command(name = "extcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Flat console listing
    Console,
    /// Structured markdown breakdown
    Markdown,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate extension description files
    ///
    /// Examples:
    ///   extcheck validate SlicerDemo.json
    ///   extcheck validate *.json --corpus . --format markdown --output report.md
    ///   extcheck validate SlicerDemo.json --with-repository
    Validate {
        /// Extension description files (.json) to validate
        files: Vec<PathBuf>,

        /// Directory holding the full corpus; enables the dependency
        /// consistency check and the index layout scan
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// Report output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,

        /// Write the markdown report to this file (must end in .md)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Clone each extension repository and check its contents
        #[arg(long)]
        with_repository: bool,

        /// Timeout in seconds for the shallow clone
        #[arg(long, default_value_t = 30)]
        clone_timeout: u64,

        /// Timeout in seconds for the pinned revision checkout
        #[arg(long, default_value_t = 120)]
        checkout_timeout: u64,

        /// Number of parallel validation workers
        #[arg(short, long, default_value_t = ext_core::DEFAULT_POOL_SIZE)]
        jobs: usize,

        /// Exit with 0/1 instead of the total failure count
        #[arg(long)]
        binary_exit: bool,
    },

    /// Scan an index directory for unexpected files
    Layout {
        /// Index root directory to scan
        dir: PathBuf,
    },
}
