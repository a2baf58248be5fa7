//! # ScriptPeek
//!
//! Exploratory tooling for packed script payloads: a decoder for
//! base-36 LZW token streams and heuristics for spotting Lua bytecode in
//! the result.
//!
//! Output is a set of hints for an analyst, not a verified decode. Malformed
//! tokens fall back to index 0, and the string scanner reports every
//! plausible size-prefixed run, overlaps included.
//!
//! ## Quick Start
//!
//! ### Decoding a Token Stream
//!
//! ```
//! use scriptpeek::compression::decompress;
//!
//! // "21t" is one token: two base-36 digits, "1t" = 65 = 'A'
//! let result = decompress("21t")?;
//! assert_eq!(result.output, b"A");
//! # Ok::<(), scriptpeek::Error>(())
//! ```
//!
//! ### Scanning a Buffer
//!
//! ```
//! use scriptpeek::formats::lua::{scan, LuaVersion, ScanOptions};
//!
//! let report = scan(b"\x1bLua\x51\x00\x05hello", &ScanOptions::default());
//! assert_eq!(report.header, Some(LuaVersion::Lua51));
//! ```
//!
//! ### Running the Whole Pipeline
//!
//! ```no_run
//! use scriptpeek::pipeline::{AnalysisOptions, run};
//!
//! // Reads test.lua, writes decoded_output.bin / bytecode.bin, scans
//! if let Some(outcome) = run(&AnalysisOptions::default()) {
//!     println!("{:?}", outcome.report.header);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `scriptpeek` command-line binary

pub mod compression;
pub mod error;
pub mod formats;
pub mod payload;
pub mod pipeline;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::compression::{DecompressOptions, Decompressed, decompress, decompress_with_options};
    pub use crate::error::{Error, Result};
    pub use crate::formats::chunked::{ChunkedPayload, decode_chunked};
    pub use crate::formats::lua::{CandidateString, LuaVersion, ScanOptions, ScanReport, scan};
    pub use crate::payload::{decode_hex_text, extract_payload};
    pub use crate::pipeline::{AnalysisOptions, AnalysisOutcome, Strategy, analyze, run};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
