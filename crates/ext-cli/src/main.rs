//! Extensions Index checks CLI
//!
//! Validates extension description files, cross-checks the dependency
//! graph, and polices the index layout. The exit status of `validate` is
//! the total failure count (0 = clean), or 0/1 with `--binary-exit`.

mod cli;
mod commands;
mod error;
mod render;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Validate {
            files,
            corpus,
            format,
            output,
            with_repository,
            clone_timeout,
            checkout_timeout,
            jobs,
            binary_exit,
        } => commands::run_validate(commands::ValidateOptions {
            files,
            corpus,
            format,
            output,
            with_repository,
            clone_timeout,
            checkout_timeout,
            jobs,
            binary_exit,
        }),
        Commands::Layout { dir } => commands::run_layout(&dir),
    }
}
