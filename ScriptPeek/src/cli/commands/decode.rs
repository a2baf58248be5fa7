//! Decode-only command

use std::path::Path;

use crate::payload::{decode_hex_text, extract_payload};
use crate::pipeline::{AnalysisOptions, Strategy, decode_with, write_artifact};

use super::report::print_decode_detail;

/// Resolve the `payload` argument: a readable file is searched for an
/// `O('...')` literal (falling back to its trimmed contents), anything else
/// is taken as the token string itself.
pub fn resolve_payload(arg: &str) -> anyhow::Result<String> {
    let path = Path::new(arg);
    if !path.is_file() {
        return Ok(arg.to_string());
    }
    let source = std::fs::read_to_string(path)?;
    Ok(extract_payload(&source)
        .map_or_else(|| source.trim().to_string(), str::to_string))
}

/// Decode a payload and optionally write the result.
pub fn execute(
    payload: &str,
    strategy: Strategy,
    output: Option<&Path>,
    hex: bool,
    limit: usize,
) -> anyhow::Result<()> {
    let payload = resolve_payload(payload)?;
    let options = AnalysisOptions::new().with_strategy(strategy);

    let decoded = match decode_with(&payload, &options) {
        Ok(decoded) => decoded,
        Err(e) => {
            println!("Error decoding: {e}");
            return Ok(());
        }
    };

    println!("Payload: {} bytes, strategy: {strategy}", payload.len());
    print_decode_detail(&decoded.detail, limit);

    let Some(output) = output else {
        return Ok(());
    };

    let bytes = if hex {
        match decode_hex_text(&decoded.text) {
            Ok(bytes) => bytes,
            Err(e) => {
                println!("Cannot hex-decode output: {e}");
                return Ok(());
            }
        }
    } else {
        decoded.text
    };

    write_artifact(output, &bytes)?;
    println!();
    println!("Decoded output saved to {}", output.display());
    Ok(())
}
