//! Scan command for binaries already on disk

use std::path::Path;

use crate::formats::lua::ScanOptions;
use crate::pipeline::analyze_bytes;

use super::report::print_scan_report;

/// Scan a binary file and print (or save) the report.
pub fn execute(path: &Path, max_candidates: usize, json: Option<&Path>) -> anyhow::Result<()> {
    println!("Scanning: {}", path.display());
    println!();

    let data = std::fs::read(path)?;
    let options = ScanOptions::new().with_max_candidates(max_candidates);
    let report = analyze_bytes(&data, &options);

    if let Some(json_path) = json {
        std::fs::write(json_path, serde_json::to_string_pretty(&report)?)?;
        println!("Report written to: {}", json_path.display());
    } else {
        print_scan_report(&report);
    }

    Ok(())
}
