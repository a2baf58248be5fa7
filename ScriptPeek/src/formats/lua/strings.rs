//! Size-prefixed string heuristics
//!
//! Lua bytecode stores constants as a length followed by the bytes. Without
//! parsing the chunk we can still guess: any byte `n` in `1..=255` followed
//! by `n` printable ASCII bytes looks like a string. Every offset is
//! checked, so overlapping hits are normal.

/// Lowest printable ASCII byte (space).
pub const PRINTABLE_MIN: u8 = 0x20;
/// Highest printable ASCII byte (`~`).
pub const PRINTABLE_MAX: u8 = 0x7E;

/// A printable run that follows a plausible length byte.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CandidateString {
    /// Offset of the length byte.
    pub offset: usize,
    pub text: String,
}

#[must_use]
pub fn is_printable(b: u8) -> bool {
    (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&b)
}

/// The candidate whose length byte sits at `offset`, if any.
#[must_use]
pub fn candidate_at(data: &[u8], offset: usize) -> Option<CandidateString> {
    let len = usize::from(*data.get(offset)?);
    if len == 0 {
        return None;
    }
    let body = data.get(offset + 1..offset + 1 + len)?;
    if !body.iter().copied().all(is_printable) {
        return None;
    }
    // Every byte is ASCII here, so the conversion cannot lose anything.
    let text = body.iter().map(|&b| char::from(b)).collect();
    Some(CandidateString { offset, text })
}

/// Scan every offset of `data` for size-prefixed printable runs.
#[must_use]
pub fn find_candidate_strings(data: &[u8]) -> Vec<CandidateString> {
    (0..data.len())
        .filter_map(|offset| candidate_at(data, offset))
        .collect()
}
