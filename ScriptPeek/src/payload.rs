//! Payload extraction and byte conversions
//!
//! Scripts carry their packed payload as a call like `O('21t21u...')`.
//! These helpers pull the literal out of the surrounding source and convert
//! decoder output into raw bytes.

use regex::Regex;

use crate::error::{Error, Result};

lazy_static::lazy_static! {
    static ref PAYLOAD_PATTERN: Regex =
        Regex::new(r"O\('([^']+)'\)").expect("payload pattern is valid");
}

/// Find the first `O('...')` literal in `source`.
#[must_use]
pub fn extract_payload(source: &str) -> Option<&str> {
    PAYLOAD_PATTERN
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Like [`extract_payload`], but missing payloads are an error.
///
/// # Errors
/// Returns [`Error::PayloadNotFound`] if there is no `O('...')` literal.
pub fn require_payload(source: &str) -> Result<&str> {
    extract_payload(source).ok_or(Error::PayloadNotFound)
}

/// Decode hex text, ignoring ASCII whitespace between digits.
///
/// # Errors
/// Returns [`Error::InvalidHex`] on odd length or non-hex characters.
pub fn decode_hex_text(text: &[u8]) -> Result<Vec<u8>> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(hex::decode(compact)?)
}

/// Convert text to one byte per char.
///
/// # Errors
/// Returns [`Error::NotLatin1`] for the first char above U+00FF.
pub fn latin1_bytes(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(offset, ch)| u8::try_from(ch).map_err(|_| Error::NotLatin1 { ch, offset }))
        .collect()
}

/// Space-separated lowercase hex, for console previews.
#[must_use]
pub fn hex_preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
