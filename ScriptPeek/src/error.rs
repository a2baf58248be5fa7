//! Error types for `ScriptPeek`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ScriptPeek` operations.
///
/// Malformed tokens inside an encoded payload are not errors: the decoder
/// records them and keeps going. These variants cover the cases where there
/// is nothing useful left to report.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// An output artifact could not be written.
    #[error("failed to write artifact {path}: {source}")]
    ArtifactWriteFailed {
        /// The artifact path.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Payload Errors ====================
    /// The encoded payload is empty.
    #[error("encoded payload is empty")]
    EmptyPayload,

    /// No `O('...')` payload was found in the source text.
    #[error("no O('...') payload found in source text")]
    PayloadNotFound,

    /// The payload contains a character that has no single-byte form.
    #[error("character {ch:?} at offset {offset} is outside Latin-1")]
    NotLatin1 {
        /// The offending character.
        ch: char,
        /// Character offset in the payload.
        offset: usize,
    },

    // ==================== Decoding Errors ====================
    /// Decoded text is not a valid hex string.
    #[error("decoded text is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Unknown decoding strategy name.
    #[error("unknown decoding strategy: {0} (expected lzw or chunked)")]
    InvalidStrategy(String),
}

/// A specialized Result type for `ScriptPeek` operations.
pub type Result<T> = std::result::Result<T, Error>;
