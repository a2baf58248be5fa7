//! Console rendering for decode and scan results

use console::style;

use crate::compression::Decompressed;
use crate::formats::chunked::ChunkedPayload;
use crate::formats::lua::ScanReport;
use crate::payload::hex_preview;
use crate::pipeline::DecodeDetail;

use crate::cli::progress::print_heading;

/// Bytes of decoded output shown in previews.
const PREVIEW_LEN: usize = 64;

/// Print a scan report the way an analyst reads it: header verdict first,
/// then the fallback dump, then string candidates.
pub fn print_scan_report(report: &ScanReport) {
    print_heading("Bytecode Analysis");
    println!("Buffer size: {} bytes", report.size);

    match report.header {
        Some(version) => {
            println!("{}", style(format!("Found {version} bytecode header")).green());
        }
        None => {
            println!("{}", style("No standard Lua bytecode header found").yellow());
            if let Some(leading) = &report.leading_bytes {
                println!("First {} bytes: {}", leading.len(), hex::encode(leading));
            }
            for word in &report.instructions {
                println!(
                    "  Potential instruction at offset {:3}: {}  (opcode {:02x})",
                    word.offset,
                    hex::encode(word.bytes),
                    word.opcode()
                );
            }
        }
    }

    if report.candidates.is_empty() {
        println!();
        println!("No size-prefixed strings found");
        return;
    }

    println!();
    println!(
        "Potential strings found ({} of {}):",
        report.candidates.len(),
        report.candidate_total
    );
    for candidate in &report.candidates {
        println!("  - [{:#06x}] {}", candidate.offset, candidate.text);
    }
}

/// Print whichever decoder detail is present.
pub fn print_decode_detail(detail: &DecodeDetail, limit: usize) {
    match detail {
        DecodeDetail::Lzw(decompressed) => print_decompressed(decompressed, limit),
        DecodeDetail::Chunked(chunked) => print_chunked(chunked, limit),
    }
}

pub fn print_decompressed(result: &Decompressed, limit: usize) {
    println!(
        "Decoded {} entries into {} bytes (table size {})",
        result.entries,
        result.output.len(),
        result.table_len
    );
    let preview = &result.output[..result.output.len().min(PREVIEW_LEN)];
    println!("Preview: {}", hex_preview(preview));

    if !result.malformed.is_empty() {
        println!(
            "{}",
            style(format!("{} malformed tokens (used index 0):", result.malformed.len())).yellow()
        );
        for bad in result.malformed.iter().take(limit) {
            println!("  - {bad}");
        }
    }

    if !result.printable_runs.is_empty() {
        println!("Printable runs ({}):", result.printable_runs.len());
        for run in result.printable_runs.iter().take(limit) {
            println!("  - [{}] {:?}", run.offset, run.text);
        }
    }

    for hit in &result.marker_hits {
        println!("Found target string {:?} at position {}", hit.marker, hit.offset);
    }
}

pub fn print_chunked(result: &ChunkedPayload, limit: usize) {
    if let Some(header) = &result.header {
        println!("Header: {}", hex_preview(header));
    }
    println!("Chunks: {}", result.chunks.len());
    for chunk in result.chunks.iter().take(limit) {
        println!(
            "  - control at {} [{}]: {:?} -> {:?}",
            chunk.control_offset,
            hex_preview(&chunk.control),
            chunk.encoded,
            chunk.decoded
        );
    }
}
