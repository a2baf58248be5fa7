//! Options for an analysis run
//!
//! Everything defaults to the fixed-input workflow: read `test.lua`, decode
//! with the LZW decoder, write `decoded_output.bin` and `bytecode.bin` next
//! to the working directory.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::compression::DecompressOptions;
use crate::error::Error;
use crate::formats::lua::ScanOptions;

/// Default source file.
pub const DEFAULT_INPUT: &str = "test.lua";
/// Default path for the hex-decoded decoder output.
pub const DEFAULT_DECODED_OUTPUT: &str = "decoded_output.bin";
/// Default path for the scanned buffer.
pub const DEFAULT_BYTECODE_OUTPUT: &str = "bytecode.bin";

/// How the payload literal is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum Strategy {
    /// Base-36 LZW token stream.
    #[default]
    Lzw,
    /// Control sequences with letter-substituted chunks.
    Chunked,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lzw" | "lzw36" | "base36" => Ok(Strategy::Lzw),
            "chunked" | "chunks" | "control" => Ok(Strategy::Chunked),
            _ => Err(Error::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Lzw => write!(f, "lzw"),
            Strategy::Chunked => write!(f, "chunked"),
        }
    }
}

/// Options for [`super::analyze`].
///
/// # Example
///
/// ```no_run
/// use scriptpeek::pipeline::{AnalysisOptions, Strategy};
///
/// let options = AnalysisOptions::new()
///     .with_input("sample.lua")
///     .with_strategy(Strategy::Chunked)
///     .with_max_candidates(25);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Source file containing the `O('...')` literal.
    pub input: PathBuf,

    /// Where the hex-decoded decoder output is written (only when the
    /// output is valid hex).
    pub decoded_output: PathBuf,

    /// Where the scanned buffer is written.
    pub bytecode_output: PathBuf,

    /// Skip writing artifacts entirely.
    pub write_artifacts: bool,

    pub strategy: Strategy,
    pub decompress: DecompressOptions,
    pub scan: ScanOptions,
}

impl AnalysisOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            decoded_output: PathBuf::from(DEFAULT_DECODED_OUTPUT),
            bytecode_output: PathBuf::from(DEFAULT_BYTECODE_OUTPUT),
            write_artifacts: true,
            strategy: Strategy::default(),
            decompress: DecompressOptions::default(),
            scan: ScanOptions::default(),
        }
    }

    #[must_use]
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    #[must_use]
    pub fn with_decoded_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.decoded_output = path.into();
        self
    }

    #[must_use]
    pub fn with_bytecode_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.bytecode_output = path.into();
        self
    }

    /// Put both artifacts under `dir`, keeping their default file names.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.decoded_output = dir.join(DEFAULT_DECODED_OUTPUT);
        self.bytecode_output = dir.join(DEFAULT_BYTECODE_OUTPUT);
        self
    }

    #[must_use]
    pub fn with_write_artifacts(mut self, write: bool) -> Self {
        self.write_artifacts = write;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_decompress_options(mut self, options: DecompressOptions) -> Self {
        self.decompress = options;
        self
    }

    #[must_use]
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan = options;
        self
    }

    /// Shortcut for `scan.max_candidates`.
    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.scan.max_candidates = max;
        self
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new()
    }
}
