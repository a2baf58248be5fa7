//! Command execution implementations

use super::Commands;
use super::{decode, run, scan};

impl Commands {
    /// Execute the selected command. `quiet` mirrors the `-q` flag.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self, quiet: bool) -> anyhow::Result<()> {
        match self {
            Commands::Run(args) => run::execute(args, quiet),
            Commands::Decode {
                payload,
                strategy,
                output,
                hex,
                limit,
            } => decode::execute(payload, *strategy, output.as_deref(), *hex, *limit),
            Commands::Scan {
                path,
                max_candidates,
                json,
            } => scan::execute(path, *max_candidates, json.as_deref()),
        }
    }
}
