//! Decompression for packed script payloads
//!
//! Payloads are an LZW index stream written as length-prefixed base-36
//! tokens. [`lzw36`] drives the decode; [`symbol_table`] and [`token`] hold
//! the dictionary and the cursor.

pub mod lzw36;
pub mod symbol_table;
pub mod token;

pub use lzw36::{
    DEFAULT_MARKER, DEFAULT_PROGRESS_INTERVAL, DecompressOptions, Decompressed, MarkerHit,
    PrintableRun, decompress, decompress_with_options,
};
pub use symbol_table::{Lookup, SymbolTable};
pub use token::{MalformedKind, MalformedToken, TokenReader};
