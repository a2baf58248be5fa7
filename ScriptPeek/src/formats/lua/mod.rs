//! Lua bytecode heuristics
//!
//! Header detection and size-prefixed string scanning for buffers that are
//! suspected to hold precompiled Lua chunks.

pub mod inspect;
pub mod signature;
pub mod strings;

pub use inspect::{InstructionWord, ScanOptions, ScanReport, instruction_preview, scan};
pub use signature::{LuaVersion, SIGNATURES, detect_header};
pub use strings::{CandidateString, candidate_at, find_candidate_strings, is_printable};
