//! Base-36 LZW decompression
//!
//! The encoder writes each dictionary index as a length-prefixed base-36
//! token (see [`super::token`]). Decoding follows the classic LZW scheme:
//! every token after the first adds `prev + entry[0]` to the table, and an
//! index that names the slot being created resolves to `prev + prev[0]`.
//!
//! Alongside the output the decoder collects analyst hints: runs of
//! printable entries, malformed tokens, and occurrences of marker strings.

use tracing::{debug, info, warn};

use super::symbol_table::{Lookup, SEED_ENTRIES, SymbolTable, extend_with_head};
use super::token::{MalformedKind, MalformedToken, TokenReader};
use crate::error::{Error, Result};

/// Default number of emitted entries between progress messages.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Marker the sample payloads are expected to contain.
pub const DEFAULT_MARKER: &str = "game:GetService";

/// Options for [`decompress_with_options`].
///
/// # Example
///
/// ```
/// use scriptpeek::compression::DecompressOptions;
///
/// let options = DecompressOptions::new()
///     .with_progress_interval(500)
///     .with_marker("require");
/// ```
#[derive(Debug, Clone)]
pub struct DecompressOptions {
    /// Emit a progress message every this many entries (0 disables).
    pub progress_interval: usize,

    /// Byte strings to look for in the decoded output.
    pub markers: Vec<String>,

    /// Shortest printable run (in bytes) worth recording.
    pub min_run_len: usize,
}

impl DecompressOptions {
    /// Create options with the default progress interval and marker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            markers: vec![DEFAULT_MARKER.to_string()],
            min_run_len: 1,
        }
    }

    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Add a marker to search for.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Replace the marker list.
    #[must_use]
    pub fn with_markers(mut self, markers: Vec<String>) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn with_min_run_len(mut self, len: usize) -> Self {
        self.min_run_len = len.max(1);
        self
    }
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A run of consecutive printable entries in the decoded output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PrintableRun {
    /// Output offset of the first byte of the run.
    pub offset: usize,
    pub text: String,
}

/// A marker string found in the decoded output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MarkerHit {
    pub marker: String,
    pub offset: usize,
}

/// Result of a decompression call.
#[derive(Debug, Clone)]
pub struct Decompressed {
    /// Concatenation of every emitted entry.
    pub output: Vec<u8>,
    /// Number of entries emitted (one per token).
    pub entries: usize,
    /// Final symbol table size.
    pub table_len: usize,
    /// Tokens that fell back to index 0.
    pub malformed: Vec<MalformedToken>,
    pub printable_runs: Vec<PrintableRun>,
    pub marker_hits: Vec<MarkerHit>,
}

impl Decompressed {
    /// Decoded output as text, mapping each byte to the char with the same
    /// code point.
    #[must_use]
    pub fn to_latin1_string(&self) -> String {
        self.output.iter().map(|&b| char::from(b)).collect()
    }
}

/// Decompress a base-36 token string with default options.
///
/// # Errors
/// Returns [`Error::EmptyPayload`] if `encoded` is empty. Malformed tokens
/// are recorded in the result instead of failing the call.
pub fn decompress(encoded: &str) -> Result<Decompressed> {
    decompress_with_options(encoded, &DecompressOptions::default())
}

/// Decompress a base-36 token string.
///
/// # Errors
/// Returns [`Error::EmptyPayload`] if `encoded` is empty.
pub fn decompress_with_options(encoded: &str, options: &DecompressOptions) -> Result<Decompressed> {
    if encoded.is_empty() {
        return Err(Error::EmptyPayload);
    }
    debug!("LZW36 decompression: {} encoded bytes", encoded.len());

    let mut reader = TokenReader::new(encoded);
    let mut table = SymbolTable::new();
    let mut state = DecodeState::new(options);

    // The first token is a plain lookup into the seeded table.
    let first = match reader.next_index() {
        Some(token) => state.resolve_token(token),
        None => return Err(Error::EmptyPayload),
    };
    let first_index = match usize::try_from(first) {
        Ok(index) if index < SEED_ENTRIES => index,
        _ => {
            state.record_malformed(MalformedToken {
                offset: 0,
                kind: MalformedKind::UnseededIndex(first),
            });
            0
        }
    };
    let mut prev = table.get(first_index).unwrap_or(&[0]).to_vec();
    debug!("Initial entry: {prev:02x?} (index {first_index})");
    state.emit(&prev);

    loop {
        let offset = reader.position();
        let Some(token) = reader.next_index() else {
            break;
        };
        let index = usize::try_from(state.resolve_token(token)).unwrap_or(usize::MAX);

        let entry = match table.lookup(index) {
            Lookup::Resolved(entry) => entry.to_vec(),
            Lookup::SelfReferential => {
                if index > table.next_index() {
                    warn!(
                        "Index {index} at offset {offset} is beyond next slot {}, treating as self-referential",
                        table.next_index()
                    );
                }
                extend_with_head(&prev, &prev)
            }
        };

        table.push(extend_with_head(&prev, &entry));
        state.emit(&entry);
        prev = entry;
    }

    state.finish(table.len())
}

/// Mutable bookkeeping for one decompression call.
struct DecodeState<'o> {
    options: &'o DecompressOptions,
    output: Vec<u8>,
    entries: usize,
    malformed: Vec<MalformedToken>,
    runs: Vec<PrintableRun>,
    run_start: usize,
    run: Vec<u8>,
}

impl<'o> DecodeState<'o> {
    fn new(options: &'o DecompressOptions) -> Self {
        Self {
            options,
            output: Vec::new(),
            entries: 0,
            malformed: Vec::new(),
            runs: Vec::new(),
            run_start: 0,
            run: Vec::new(),
        }
    }

    fn resolve_token(&mut self, token: std::result::Result<u64, MalformedToken>) -> u64 {
        match token {
            Ok(index) => index,
            Err(bad) => {
                self.record_malformed(bad);
                0
            }
        }
    }

    fn record_malformed(&mut self, bad: MalformedToken) {
        warn!("{bad}, using index 0");
        self.malformed.push(bad);
    }

    fn emit(&mut self, entry: &[u8]) {
        if is_printable(entry) {
            if self.run.is_empty() {
                self.run_start = self.output.len();
            }
            self.run.extend_from_slice(entry);
        } else {
            self.flush_run("Found candidate string");
        }

        self.output.extend_from_slice(entry);
        self.entries += 1;

        let interval = self.options.progress_interval;
        if interval > 0 && self.entries % interval == 0 {
            info!("Decoded {} entries ({} bytes)...", self.entries, self.output.len());
        }
    }

    fn flush_run(&mut self, label: &str) {
        if self.run.is_empty() {
            return;
        }
        let bytes = std::mem::take(&mut self.run);
        if bytes.len() >= self.options.min_run_len {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            debug!("{label} at {}: {text:?}", self.run_start);
            self.runs.push(PrintableRun {
                offset: self.run_start,
                text,
            });
        }
    }

    fn finish(mut self, table_len: usize) -> Result<Decompressed> {
        self.flush_run("Found final string");

        let marker_hits = find_markers(&self.output, &self.options.markers);
        for hit in &marker_hits {
            info!("Found marker {:?} at offset {}", hit.marker, hit.offset);
        }

        info!(
            "Decoding complete: {} entries, {} bytes, {} malformed tokens",
            self.entries,
            self.output.len(),
            self.malformed.len()
        );

        Ok(Decompressed {
            output: self.output,
            entries: self.entries,
            table_len,
            malformed: self.malformed,
            printable_runs: self.runs,
            marker_hits,
        })
    }
}

/// True when every byte is printable ASCII.
fn is_printable(entry: &[u8]) -> bool {
    !entry.is_empty() && entry.iter().all(|b| (0x20..=0x7E).contains(b))
}

/// Every (possibly overlapping) occurrence of each non-empty marker.
fn find_markers(output: &[u8], markers: &[String]) -> Vec<MarkerHit> {
    let mut hits = Vec::new();
    for marker in markers.iter().filter(|m| !m.is_empty()) {
        let needle = marker.as_bytes();
        hits.extend(
            output
                .windows(needle.len())
                .enumerate()
                .filter(|(_, window)| *window == needle)
                .map(|(offset, _)| MarkerHit {
                    marker: marker.clone(),
                    offset,
                }),
        );
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// Encode indices the way the payload encoder does: length digit then
    /// base-36 digits.
    fn encode(indices: &[u64]) -> String {
        indices
            .iter()
            .map(|&i| {
                let digits = to_base36(i);
                format!("{}{digits}", digits.len())
            })
            .collect()
    }

    fn to_base36(mut value: u64) -> String {
        if value == 0 {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        while value > 0 {
            digits.push(char::from_digit((value % 36) as u32, 36).unwrap());
            value /= 36;
        }
        digits.iter().rev().collect()
    }

    fn quiet() -> DecompressOptions {
        DecompressOptions::new().with_markers(Vec::new())
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a debug-level subscriber and return what it logged.
    fn capture_logs(f: impl FnOnce()) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_first_token_emits_indexed_byte() {
        let result = decompress("21t").unwrap();
        assert_eq!(result.output, b"A".to_vec());
        assert_eq!(result.entries, 1);
        assert_eq!(result.table_len, SEED_ENTRIES);
    }

    #[test]
    fn test_literal_sequence() {
        let encoded = encode(&[u64::from(b'a'), u64::from(b'b'), u64::from(b'c')]);
        let result = decompress_with_options(&encoded, &quiet()).unwrap();
        assert_eq!(result.output, b"abc".to_vec());
        // Each token after the first adds one entry.
        assert_eq!(result.table_len, SEED_ENTRIES + 2);
    }

    #[test]
    fn test_dictionary_reuse() {
        // "ababab": a, b, 256 ("ab"), 256 ("ab")
        let encoded = encode(&[97, 98, 256, 256]);
        let result = decompress_with_options(&encoded, &quiet()).unwrap();
        assert_eq!(result.output, b"ababab".to_vec());
    }

    #[test]
    fn test_self_referential_boundary_index() {
        // "aaaa": a, then index 256 while the table has exactly 256 entries.
        let encoded = encode(&[97, 256, 97]);
        let result = decompress_with_options(&encoded, &quiet()).unwrap();
        assert_eq!(result.output, b"aaaa".to_vec());
        assert!(result.malformed.is_empty());
    }

    #[test]
    fn test_classic_kwkwk_case() {
        // "abababa": a, b, 256 ("ab"), 258 (next slot -> "aba")
        let encoded = encode(&[97, 98, 256, 258]);
        let result = decompress_with_options(&encoded, &quiet()).unwrap();
        assert_eq!(result.output, b"abababa".to_vec());
    }

    #[test]
    fn test_index_beyond_next_slot_is_self_referential() {
        let encoded = encode(&[120, 999]);
        let result = decompress_with_options(&encoded, &quiet()).unwrap();
        assert_eq!(result.output, b"xxx".to_vec());
    }

    #[test]
    fn test_beyond_next_slot_warning_names_token_start() {
        // "23c" is 'x'; the out-of-range token "2rr" (999) starts at offset 3.
        let logs = capture_logs(|| {
            decompress_with_options(&encode(&[120, 999]), &quiet()).unwrap();
        });
        assert!(logs.contains("Index 999 at offset 3"), "{logs}");
    }

    #[test]
    fn test_progress_and_run_diagnostics_are_logged() {
        let options = quiet().with_progress_interval(2);
        let logs = capture_logs(|| {
            decompress_with_options(&encode(&[104, 105, 0]), &options).unwrap();
        });
        assert!(logs.contains("Decoded 2 entries (2 bytes)"), "{logs}");
        assert!(logs.contains("Found candidate string at 0: \"hi\""), "{logs}");
    }

    #[test]
    fn test_empty_payload_is_error() {
        assert!(matches!(decompress(""), Err(Error::EmptyPayload)));
    }

    #[test]
    fn test_truncated_token_falls_back_to_zero() {
        // "A", "B", then a token that declares 3 digits but has one.
        let result = decompress_with_options("21t21u3a", &quiet()).unwrap();
        assert_eq!(result.output, vec![b'A', b'B', 0]);
        assert_eq!(result.malformed.len(), 1);
        assert_eq!(result.malformed[0].offset, 6);
        assert!(matches!(
            result.malformed[0].kind,
            MalformedKind::Truncated { needed: 3, available: 1 }
        ));
    }

    #[test]
    fn test_malformed_token_continues_with_rest() {
        // Bad token in the middle, good tokens after it.
        let result = decompress_with_options("21t2!!21u", &quiet()).unwrap();
        assert_eq!(result.output, vec![b'A', 0, b'B']);
        assert_eq!(result.entries, 3);
        assert_eq!(result.malformed.len(), 1);
    }

    #[test]
    fn test_unseeded_first_index_falls_back() {
        let result = decompress_with_options("3zzz", &quiet()).unwrap();
        assert_eq!(result.output, vec![0]);
        assert_eq!(result.malformed[0].kind, MalformedKind::UnseededIndex(46655));
    }

    #[test]
    fn test_output_grows_with_tokens() {
        let indices = [104, 101, 108, 108, 111, 256, 258, 260];
        let mut last = 0;
        for n in 1..=indices.len() {
            let result = decompress_with_options(&encode(&indices[..n]), &quiet()).unwrap();
            assert!(!result.output.is_empty());
            assert!(result.output.len() >= last);
            last = result.output.len();
        }
    }

    #[test]
    fn test_printable_runs_split_on_control_bytes() {
        let encoded = encode(&[104, 105, 0, 111, 107]);
        let result = decompress_with_options(&encoded, &quiet()).unwrap();
        assert_eq!(
            result.printable_runs,
            vec![
                PrintableRun {
                    offset: 0,
                    text: "hi".to_string()
                },
                PrintableRun {
                    offset: 3,
                    text: "ok".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_min_run_len_filters_short_runs() {
        let encoded = encode(&[104, 0, 111, 107]);
        let options = quiet().with_min_run_len(2);
        let result = decompress_with_options(&encoded, &options).unwrap();
        assert_eq!(result.printable_runs.len(), 1);
        assert_eq!(result.printable_runs[0].text, "ok");
    }

    #[test]
    fn test_marker_hits() {
        let text = b"x=game:GetService";
        let indices: Vec<u64> = text.iter().map(|&b| u64::from(b)).collect();
        let result = decompress(&encode(&indices)).unwrap();
        assert_eq!(
            result.marker_hits,
            vec![MarkerHit {
                marker: DEFAULT_MARKER.to_string(),
                offset: 2
            }]
        );
    }

    #[test]
    fn test_latin1_string() {
        let result = decompress_with_options(&encode(&[0xE2, 0x41]), &quiet()).unwrap();
        assert_eq!(result.to_latin1_string(), "\u{e2}A");
    }
}
