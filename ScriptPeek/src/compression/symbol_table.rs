//! Adaptive symbol table for the base-36 LZW decoder

/// Number of single-byte entries the table starts with.
pub const SEED_ENTRIES: usize = 256;

/// Result of looking up a token index in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The index names an entry that already exists.
    Resolved(&'a [u8]),
    /// The index names the slot that is about to be created. The entry is
    /// the previous symbol followed by its own first byte.
    SelfReferential,
}

/// Append-only dictionary of byte strings.
///
/// Entry `i` is immutable once assigned and indices are handed out in
/// creation order. The table lives for a single decompression call.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<Vec<u8>>,
}

impl SymbolTable {
    /// Create a table seeded with every single-byte string `0x00..=0xFF`.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(SEED_ENTRIES * 4);
        entries.extend((0..=u8::MAX).map(|b| vec![b]));
        Self { entries }
    }

    /// Get an entry by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.entries.get(index).map(Vec::as_slice)
    }

    /// Resolve a token index against the current table.
    ///
    /// Any index at or past [`next_index`](Self::next_index) is
    /// self-referential.
    #[must_use]
    pub fn lookup(&self, index: usize) -> Lookup<'_> {
        match self.entries.get(index) {
            Some(entry) => Lookup::Resolved(entry),
            None => Lookup::SelfReferential,
        }
    }

    /// Append a new entry and return its index.
    pub fn push(&mut self, entry: Vec<u8>) -> usize {
        let index = self.entries.len();
        self.entries.push(entry);
        index
    }

    /// Index the next pushed entry will receive.
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `base` followed by the first byte of `head_of`.
pub(crate) fn extend_with_head(base: &[u8], head_of: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(base.len() + 1);
    out.extend_from_slice(base);
    if let Some(&first) = head_of.first() {
        out.push(first);
    }
    out
}
