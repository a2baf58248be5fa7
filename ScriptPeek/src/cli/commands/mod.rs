//! Subcommand definitions for the CLI

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::compression::DEFAULT_PROGRESS_INTERVAL;
use crate::pipeline::{DEFAULT_BYTECODE_OUTPUT, DEFAULT_DECODED_OUTPUT, DEFAULT_INPUT, Strategy};

pub mod decode;
pub mod execute;
pub mod report;
pub mod run;
pub mod scan;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, decode and scan the payload of a script (the default)
    Run(RunArgs),

    /// Decode a payload without scanning it
    Decode {
        /// Token string, or a file containing an O('...') literal
        payload: String,

        /// Decoding strategy (lzw, chunked)
        #[arg(short, long, default_value = "lzw")]
        strategy: Strategy,

        /// Write the decoded bytes to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hex-decode the output before writing it
        #[arg(long)]
        hex: bool,

        /// Printable runs to list
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Scan a binary file for Lua headers and size-prefixed strings
    Scan {
        /// Binary file to scan
        path: PathBuf,

        /// Candidate strings to show
        #[arg(short = 'n', long, default_value_t = 10)]
        max_candidates: usize,

        /// Write the report as JSON (prints to CLI if omitted)
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

/// Options for the `run` command.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Source file containing the O('...') literal
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Decoding strategy (lzw, chunked)
    #[arg(short, long, default_value = "lzw")]
    pub strategy: Strategy,

    /// Output for the hex-decoded decoder output
    #[arg(long, default_value = DEFAULT_DECODED_OUTPUT)]
    pub decoded_output: PathBuf,

    /// Output for the scanned buffer
    #[arg(long, default_value = DEFAULT_BYTECODE_OUTPUT)]
    pub bytecode_output: PathBuf,

    /// Put both artifacts in this directory instead
    #[arg(long, conflicts_with_all = ["decoded_output", "bytecode_output"])]
    pub output_dir: Option<PathBuf>,

    /// Don't write any artifacts
    #[arg(long)]
    pub no_artifacts: bool,

    /// Candidate strings to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_candidates: usize,

    /// Extra marker string to search for in decoded output (repeatable)
    #[arg(short, long)]
    pub marker: Vec<String>,

    /// Log progress every N decoded entries (0 disables)
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: usize,

    /// Also write the summary as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            strategy: Strategy::default(),
            decoded_output: PathBuf::from(DEFAULT_DECODED_OUTPUT),
            bytecode_output: PathBuf::from(DEFAULT_BYTECODE_OUTPUT),
            output_dir: None,
            no_artifacts: false,
            max_candidates: 10,
            marker: Vec::new(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            json: None,
        }
    }
}
