//! Bytecode inspection
//!
//! Combines header detection with the size-prefixed string scan into a
//! single report. Nothing here validates the chunk: a report is a list of
//! hints for whoever opens the bytes in a hex editor next.

use super::signature::{LuaVersion, detect_header};
use super::strings::{CandidateString, find_candidate_strings};

/// Options for [`scan`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanOptions {
    /// Candidate strings kept in the report.
    pub max_candidates: usize,

    /// Bytes dumped when no header matches.
    pub header_dump_len: usize,

    /// Leading bytes split into 4-byte instruction words when no header
    /// matches.
    pub instruction_window: usize,
}

impl ScanOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_candidates: 10,
            header_dump_len: 16,
            instruction_window: 64,
        }
    }

    #[must_use]
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    #[must_use]
    pub fn with_header_dump_len(mut self, len: usize) -> Self {
        self.header_dump_len = len;
        self
    }

    #[must_use]
    pub fn with_instruction_window(mut self, len: usize) -> Self {
        self.instruction_window = len;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A 4-byte word that might be a VM instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct InstructionWord {
    pub offset: usize,
    pub bytes: [u8; 4],
}

impl InstructionWord {
    /// Leading byte, taken as the candidate opcode.
    #[must_use]
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }
}

/// Result of scanning a buffer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScanReport {
    /// Size of the scanned buffer.
    pub size: usize,

    /// Matched bytecode version, if any.
    pub header: Option<LuaVersion>,

    /// First bytes of the buffer, only when no header matched.
    pub leading_bytes: Option<Vec<u8>>,

    /// Candidate instruction words, only when no header matched.
    pub instructions: Vec<InstructionWord>,

    /// First `max_candidates` size-prefixed strings.
    pub candidates: Vec<CandidateString>,

    /// Total size-prefixed strings found before truncation.
    pub candidate_total: usize,
}

/// Split the first `window` bytes into whole 4-byte words.
#[must_use]
pub fn instruction_preview(data: &[u8], window: usize) -> Vec<InstructionWord> {
    let end = data.len().min(window);
    data[..end]
        .chunks_exact(4)
        .enumerate()
        .map(|(i, word)| InstructionWord {
            offset: i * 4,
            bytes: [word[0], word[1], word[2], word[3]],
        })
        .collect()
}

/// Scan a buffer for a bytecode header and embedded strings.
///
/// The buffer is only read. Scanning the same bytes twice gives the same
/// report.
#[must_use]
pub fn scan(data: &[u8], options: &ScanOptions) -> ScanReport {
    let header = detect_header(data);

    let (leading_bytes, instructions) = match header {
        Some(version) => {
            tracing::info!("Found {version} bytecode header");
            (None, Vec::new())
        }
        None => {
            tracing::info!("No standard Lua bytecode header found");
            let dump = data[..data.len().min(options.header_dump_len)].to_vec();
            (Some(dump), instruction_preview(data, options.instruction_window))
        }
    };

    let mut candidates = find_candidate_strings(data);
    let candidate_total = candidates.len();
    candidates.truncate(options.max_candidates);
    tracing::debug!("{candidate_total} size-prefixed string candidates");

    ScanReport {
        size: data.len(),
        header,
        leading_bytes,
        instructions,
        candidates,
        candidate_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lua51_header_skips_dump() {
        let mut data = vec![0x1B, 0x4C, 0x75, 0x61, 0x51, 0x00, 0x01, 0x04];
        data.extend_from_slice(&[0u8; 32]);
        let report = scan(&data, &ScanOptions::default());

        assert_eq!(report.header, Some(LuaVersion::Lua51));
        assert_eq!(report.leading_bytes, None);
        assert!(report.instructions.is_empty());
    }

    #[test]
    fn test_unknown_header_dumps_and_splits_words() {
        let data: Vec<u8> = (0u8..100).collect();
        let report = scan(&data, &ScanOptions::default());

        assert_eq!(report.header, None);
        assert_eq!(report.leading_bytes, Some((0u8..16).collect()));
        assert_eq!(report.instructions.len(), 16);
        assert_eq!(report.instructions[1].offset, 4);
        assert_eq!(report.instructions[1].opcode(), 4);
        assert_eq!(report.instructions[15].bytes, [60, 61, 62, 63]);
    }

    #[test]
    fn test_short_buffer_only_whole_words() {
        let report = scan(&[9, 8, 7, 6, 5, 4], &ScanOptions::default());
        assert_eq!(report.leading_bytes, Some(vec![9, 8, 7, 6, 5, 4]));
        assert_eq!(report.instructions.len(), 1);
        assert_eq!(report.instructions[0].opcode(), 9);
    }

    #[test]
    fn test_candidates_are_capped() {
        let mut data = Vec::new();
        for _ in 0..15 {
            data.push(3);
            data.extend_from_slice(b"abc");
            data.push(0);
        }
        let report = scan(&data, &ScanOptions::default());
        assert_eq!(report.candidate_total, 15);
        assert_eq!(report.candidates.len(), 10);
        assert_eq!(report.candidates[0].text, "abc");

        let report = scan(&data, &ScanOptions::new().with_max_candidates(3));
        assert_eq!(report.candidates.len(), 3);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let data = b"\x1bLua\x51\x00\x05hello\x04main";
        let options = ScanOptions::default();
        assert_eq!(scan(data, &options), scan(data, &options));
    }

    #[test]
    fn test_empty_buffer() {
        let report = scan(&[], &ScanOptions::default());
        assert_eq!(report.size, 0);
        assert_eq!(report.leading_bytes, Some(Vec::new()));
        assert!(report.instructions.is_empty());
        assert!(report.candidates.is_empty());
    }
}
