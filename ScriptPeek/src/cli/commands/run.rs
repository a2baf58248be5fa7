//! The default `run` command: extract, decode, save, scan

use std::path::PathBuf;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::compression::DecompressOptions;
use crate::formats::lua::{ScanOptions, ScanReport};
use crate::pipeline::{AnalysisOptions, Strategy, analyze};

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step, simple_spinner};
use super::RunArgs;
use super::report::{print_decode_detail, print_scan_report};

/// Machine-readable summary written by `--json`.
#[derive(Debug, serde::Serialize)]
struct RunSummary<'a> {
    input: &'a PathBuf,
    strategy: Strategy,
    payload_len: usize,
    decoded_len: usize,
    hex_decoded: bool,
    decoded_artifact: Option<&'a PathBuf>,
    bytecode_artifact: Option<&'a PathBuf>,
    report: &'a ScanReport,
}

/// Build pipeline options from command-line arguments.
pub fn options_from_args(args: &RunArgs) -> AnalysisOptions {
    let mut markers = vec![crate::compression::DEFAULT_MARKER.to_string()];
    markers.extend(args.marker.iter().cloned());

    let decompress = DecompressOptions::new()
        .with_progress_interval(args.progress_interval)
        .with_markers(markers);
    let scan = ScanOptions::new().with_max_candidates(args.max_candidates);

    let options = AnalysisOptions::new()
        .with_input(&args.input)
        .with_strategy(args.strategy)
        .with_decoded_output(&args.decoded_output)
        .with_bytecode_output(&args.bytecode_output)
        .with_write_artifacts(!args.no_artifacts)
        .with_decompress_options(decompress)
        .with_scan_options(scan);

    match &args.output_dir {
        Some(dir) => options.with_output_dir(dir),
        None => options,
    }
}

/// Spinner for the decode phase. Only shown when `quiet`, since otherwise
/// the decoder's progress lines share the terminal with it.
fn decode_spinner(quiet: bool, strategy: Strategy) -> Option<ProgressBar> {
    quiet.then(|| simple_spinner(&format!("Decoding payload ({strategy})...")))
}

/// Run the full analysis on one source file.
///
/// A missing payload or a failed decode is reported and ends the command
/// without an error exit.
pub fn execute(args: &RunArgs, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let options = options_from_args(args);

    print_step(1, 3, LOOKING_GLASS, &format!("Reading {}...", options.input.display()));
    let spinner = decode_spinner(quiet, options.strategy);
    let outcome = analyze(&options);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = match outcome {
        Ok(Some(outcome)) => outcome,
        Ok(None) => {
            println!("Encoded string not found in {}", options.input.display());
            return Ok(());
        }
        Err(e) => {
            println!("Error during analysis: {e}");
            return Ok(());
        }
    };

    print_step(2, 3, GEAR, &format!("Decoded {} byte payload", outcome.payload_len));
    print_decode_detail(&outcome.decoded.detail, options.scan.max_candidates);
    println!();

    print_step(3, 3, DISK, "Saving artifacts...");
    if outcome.hex_decoded {
        println!("Decoder output is hex, scanning {} decoded bytes", outcome.buffer.len());
    } else {
        println!("Decoder output is not hex, scanning it as raw bytes");
    }
    for path in [&outcome.decoded_artifact, &outcome.bytecode_artifact]
        .into_iter()
        .flatten()
    {
        println!("  Saved to {}", path.display());
    }
    println!();

    print_scan_report(&outcome.report);

    if let Some(json_path) = &args.json {
        let summary = RunSummary {
            input: &options.input,
            strategy: outcome.decoded.strategy(),
            payload_len: outcome.payload_len,
            decoded_len: outcome.decoded.text.len(),
            hex_decoded: outcome.hex_decoded,
            decoded_artifact: outcome.decoded_artifact.as_ref(),
            bytecode_artifact: outcome.bytecode_artifact.as_ref(),
            report: &outcome.report,
        };
        std::fs::write(json_path, serde_json::to_string_pretty(&summary)?)?;
        println!();
        println!("Summary written to: {}", json_path.display());
    }

    println!();
    print_done(start.elapsed());
    Ok(())
}
