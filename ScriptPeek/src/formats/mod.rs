//! Format handlers for decoded payloads
//!
//! - [`lua`] looks for bytecode headers and size-prefixed strings in a
//!   binary buffer.
//! - [`chunked`] reads a payload as control sequences followed by
//!   letter-substituted text chunks.

pub mod chunked;
pub mod lua;

// Re-export the scanner entry points
pub use chunked::{Chunk, ChunkedPayload, decode_chunked};
pub use lua::{CandidateString, LuaVersion, ScanOptions, ScanReport, scan};
