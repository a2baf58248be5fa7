//! End-to-end payload analysis
//!
//! Source text -> payload literal -> decoder -> (hex decode) -> scan.
//!
//! The `run` and `decode_payload` entry points never fail: errors are logged
//! and turn into `None`, since the caller is an analyst at a terminal who
//! wants whatever partial result there is.

mod artifacts;
mod options;

pub use artifacts::write_artifact;
pub use options::{
    AnalysisOptions, DEFAULT_BYTECODE_OUTPUT, DEFAULT_DECODED_OUTPUT, DEFAULT_INPUT, Strategy,
};

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::compression::{Decompressed, decompress_with_options};
use crate::error::{Error, Result};
use crate::formats::chunked::{ChunkedPayload, decode_chunked};
use crate::formats::lua::{ScanOptions, ScanReport, scan};
use crate::payload::{decode_hex_text, extract_payload};

/// Strategy-specific decoder output.
#[derive(Debug, Clone)]
pub enum DecodeDetail {
    Lzw(Decompressed),
    Chunked(ChunkedPayload),
}

/// A decoded payload.
#[derive(Debug, Clone)]
pub struct DecodedPayload {
    /// Decoder output as bytes (chunked text is UTF-8 encoded).
    pub text: Vec<u8>,
    pub detail: DecodeDetail,
}

impl DecodedPayload {
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self.detail {
            DecodeDetail::Lzw(_) => Strategy::Lzw,
            DecodeDetail::Chunked(_) => Strategy::Chunked,
        }
    }
}

/// Everything a finished analysis produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Length of the payload literal in bytes.
    pub payload_len: usize,
    pub decoded: DecodedPayload,
    /// Whether the decoder output was valid hex.
    pub hex_decoded: bool,
    /// Path of `decoded_output.bin`, if it was written.
    pub decoded_artifact: Option<PathBuf>,
    /// Path of `bytecode.bin`, if it was written.
    pub bytecode_artifact: Option<PathBuf>,
    /// The bytes that were scanned.
    pub buffer: Vec<u8>,
    pub report: ScanReport,
}

/// Decode a payload literal with the configured strategy.
///
/// # Errors
/// Returns an error if the payload is empty (LZW) or not Latin-1 (chunked).
pub fn decode_with(payload: &str, options: &AnalysisOptions) -> Result<DecodedPayload> {
    info!("Decoding {} byte payload with {} strategy", payload.len(), options.strategy);
    match options.strategy {
        Strategy::Lzw => {
            let decompressed = decompress_with_options(payload, &options.decompress)?;
            Ok(DecodedPayload {
                text: decompressed.output.clone(),
                detail: DecodeDetail::Lzw(decompressed),
            })
        }
        Strategy::Chunked => {
            let chunked = decode_chunked(payload)?;
            Ok(DecodedPayload {
                text: chunked.text().into_bytes(),
                detail: DecodeDetail::Chunked(chunked),
            })
        }
    }
}

/// [`decode_with`], logging failures instead of returning them.
pub fn decode_payload(payload: &str, options: &AnalysisOptions) -> Option<DecodedPayload> {
    decode_with(payload, options)
        .inspect_err(|e| error!("Error during decoding: {e}"))
        .ok()
}

/// Scan a buffer that is already in memory.
#[must_use]
pub fn analyze_bytes(data: &[u8], options: &ScanOptions) -> ScanReport {
    scan(data, options)
}

/// Analyze source text that contains a payload literal.
///
/// Returns `Ok(None)` when the source has no `O('...')` literal or the
/// decoder produces nothing; no artifacts are written in either case.
///
/// # Errors
/// Returns an error if decoding fails outright.
pub fn analyze_source(source: &str, options: &AnalysisOptions) -> Result<Option<AnalysisOutcome>> {
    let Some(payload) = extract_payload(source) else {
        warn!("Encoded string not found in source");
        return Ok(None);
    };
    info!("Found encoded string, length: {}", payload.len());

    let decoded = decode_with(payload, options)?;
    if decoded.text.is_empty() {
        warn!("Decoder produced no output, nothing to scan");
        return Ok(None);
    }

    let (hex_decoded, buffer) = match decode_hex_text(&decoded.text) {
        Ok(bytes) => (true, bytes),
        Err(e) => {
            debug!("Decoder output is not hex ({e}), scanning it as raw bytes");
            (false, decoded.text.clone())
        }
    };

    let mut decoded_artifact = None;
    let mut bytecode_artifact = None;
    if options.write_artifacts {
        if hex_decoded {
            decoded_artifact = try_write(&options.decoded_output, &buffer);
        }
        bytecode_artifact = try_write(&options.bytecode_output, &buffer);
    }

    let report = scan(&buffer, &options.scan);

    Ok(Some(AnalysisOutcome {
        payload_len: payload.len(),
        decoded,
        hex_decoded,
        decoded_artifact,
        bytecode_artifact,
        buffer,
        report,
    }))
}

/// Read `options.input` and analyze it.
///
/// # Errors
/// Returns an error if the input cannot be read or decoding fails.
pub fn analyze(options: &AnalysisOptions) -> Result<Option<AnalysisOutcome>> {
    let source = std::fs::read_to_string(&options.input).map_err(|source| Error::ReadFailed {
        path: options.input.clone(),
        source,
    })?;
    analyze_source(&source, options)
}

/// [`analyze`], logging failures instead of returning them.
pub fn run(options: &AnalysisOptions) -> Option<AnalysisOutcome> {
    match analyze(options) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error during analysis: {e}");
            None
        }
    }
}

fn try_write(path: &std::path::Path, bytes: &[u8]) -> Option<PathBuf> {
    match write_artifact(path, bytes) {
        Ok(()) => {
            info!("Saved {} bytes to {}", bytes.len(), path.display());
            Some(path.to_path_buf())
        }
        Err(e) => {
            error!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lzw_tokens(bytes: &[u8]) -> String {
        // Single-byte literals only; every index is < 256 so two base-36
        // digits are enough.
        bytes
            .iter()
            .map(|&b| {
                let hi = char::from_digit(u32::from(b) / 36, 36).unwrap();
                let lo = char::from_digit(u32::from(b) % 36, 36).unwrap();
                format!("2{hi}{lo}")
            })
            .collect()
    }

    #[test]
    fn test_missing_payload_is_none() {
        let options = AnalysisOptions::new().with_write_artifacts(false);
        assert!(analyze_source("print('nothing here')", &options).unwrap().is_none());
    }

    #[test]
    fn test_hex_output_is_decoded_before_scan() {
        let source = format!("return O('{}')", lzw_tokens(b"1b4c7561"));
        let options = AnalysisOptions::new().with_write_artifacts(false);
        let outcome = analyze_source(&source, &options).unwrap().unwrap();

        assert!(outcome.hex_decoded);
        assert_eq!(outcome.buffer, vec![0x1B, 0x4C, 0x75, 0x61]);
        assert_eq!(outcome.report.header, Some(crate::formats::LuaVersion::Lua51));
        assert_eq!(outcome.decoded.strategy(), Strategy::Lzw);
    }

    #[test]
    fn test_non_hex_output_is_scanned_raw() {
        let source = format!("O('{}')", lzw_tokens(b"\x05hello"));
        let options = AnalysisOptions::new().with_write_artifacts(false);
        let outcome = analyze_source(&source, &options).unwrap().unwrap();

        assert!(!outcome.hex_decoded);
        assert_eq!(outcome.buffer, b"\x05hello".to_vec());
        assert_eq!(outcome.report.candidates[0].text, "hello");
        assert!(outcome.decoded_artifact.is_none());
    }

    #[test]
    fn test_chunked_strategy() {
        let payload: String = ['\u{2}', 'x', 'x', 'x', 'x', 'F', 'd']
            .iter()
            .collect();
        let options = AnalysisOptions::new().with_strategy(Strategy::Chunked);
        let decoded = decode_payload(&payload, &options).unwrap();
        assert_eq!(decoded.text, b"Ge".to_vec());
        assert_eq!(decoded.strategy(), Strategy::Chunked);
    }

    #[test]
    fn test_empty_decoder_output_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options = AnalysisOptions::new()
            .with_strategy(Strategy::Chunked)
            .with_output_dir(dir.path());

        // No control bytes, so the chunked decoder finds no chunks.
        assert!(analyze_source("O('zzzz')", &options).unwrap().is_none());
        assert!(!dir.path().join(DEFAULT_DECODED_OUTPUT).exists());
        assert!(!dir.path().join(DEFAULT_BYTECODE_OUTPUT).exists());
    }

    #[test]
    fn test_decode_payload_swallows_errors() {
        let options = AnalysisOptions::new();
        assert!(decode_payload("", &options).is_none());
    }

    #[test]
    fn test_unreadable_input_names_the_path() {
        let options = AnalysisOptions::new().with_input("/nonexistent/dir/test.lua");
        let err = analyze(&options).unwrap_err();
        assert!(matches!(err, Error::ReadFailed { .. }));
        assert!(err.to_string().contains("/nonexistent/dir/test.lua"));
    }

    #[test]
    fn test_run_with_missing_input_is_none() {
        let options = AnalysisOptions::new()
            .with_input("/nonexistent/dir/test.lua")
            .with_write_artifacts(false);
        assert!(run(&options).is_none());
    }
}
