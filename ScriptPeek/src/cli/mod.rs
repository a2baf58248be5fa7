//! ScriptPeek CLI - Command-line interface for payload decoding and scanning

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::{Commands, RunArgs};

#[derive(Parser)]
#[command(name = "scriptpeek")]
#[command(version)]
#[command(about = "ScriptPeek: decode packed script payloads and look for Lua bytecode", long_about = None)]
struct Cli {
    /// Show per-token and per-chunk detail
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Subcommand (defaults to `run` on test.lua)
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Run the `ScriptPeek` CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));
    command.execute(cli.quiet)?;

    Ok(())
}
