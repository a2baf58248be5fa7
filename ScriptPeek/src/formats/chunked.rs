//! Control-sequence chunk decoder
//!
//! An older reading of the payloads: the literal is treated as Latin-1
//! bytes laid out as an optional 9-byte header (first byte `0xE2`), then
//! control sequences. A byte `<= 0x11` opens a 5-byte control sequence and
//! gives the length of the chunk that follows it. The printable bytes of
//! each chunk are passed through a letter substitution observed in the
//! samples, which turns `FduRdswhbd` back into `GetService`.

use tracing::{debug, info};

use crate::error::Result;
use crate::payload::{hex_preview, latin1_bytes};

use super::lua::is_printable;

/// First byte of the optional header.
pub const HEADER_MARKER: u8 = 0xE2;
/// Header length when present.
pub const HEADER_LEN: usize = 9;
/// Highest byte that opens a control sequence.
pub const CONTROL_MAX: u8 = 0x11;
/// Bytes in a control sequence, including the length byte.
pub const CONTROL_LEN: usize = 5;

/// One decoded chunk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Chunk {
    /// Offset of the control sequence that introduced the chunk.
    pub control_offset: usize,
    /// The control sequence bytes (may be short at end of input).
    pub control: Vec<u8>,
    /// Printable bytes before substitution.
    pub encoded: String,
    /// Printable bytes after substitution.
    pub decoded: String,
}

/// Result of a chunked decode.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct ChunkedPayload {
    /// Header bytes, when the payload starts with [`HEADER_MARKER`].
    pub header: Option<Vec<u8>>,
    pub chunks: Vec<Chunk>,
}

impl ChunkedPayload {
    /// Decoded chunks joined by newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.decoded.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Undo the letter substitution seen in encoded chunks.
#[must_use]
pub fn unshift_char(c: char) -> char {
    match c {
        'f' => 'g',
        '`' => 'a',
        'l' => 'm',
        'd' => 'e',
        'F' => 'G',
        'u' => 't',
        'R' => 'S',
        's' => 'r',
        'w' => 'v',
        'h' => 'i',
        'b' => 'c',
        other => other,
    }
}

#[must_use]
pub fn unshift(encoded: &str) -> String {
    encoded.chars().map(unshift_char).collect()
}

/// Decode a payload as control-sequenced chunks.
///
/// # Errors
/// Returns [`crate::Error::NotLatin1`] if the payload has characters above
/// U+00FF.
pub fn decode_chunked(payload: &str) -> Result<ChunkedPayload> {
    let data = latin1_bytes(payload)?;
    Ok(decode_chunked_bytes(&data))
}

/// Decode already-converted payload bytes.
#[must_use]
pub fn decode_chunked_bytes(data: &[u8]) -> ChunkedPayload {
    let mut result = ChunkedPayload::default();
    let mut pos = 0;

    if data.len() > HEADER_LEN && data[0] == HEADER_MARKER {
        let header = data[..HEADER_LEN].to_vec();
        info!("Header: {}", hex_preview(&header));
        result.header = Some(header);
        pos = HEADER_LEN;
    }

    while pos < data.len() {
        if data[pos] > CONTROL_MAX {
            pos += 1;
            continue;
        }

        let length = usize::from(data[pos]);
        let control_offset = pos;
        let control = data[pos..data.len().min(pos + CONTROL_LEN)].to_vec();
        debug!("Control sequence at pos {pos}: {}", hex_preview(&control));
        pos += CONTROL_LEN;

        let start = pos.min(data.len());
        let end = data.len().min(start + length);
        let raw = &data[start..end];
        pos = pos.saturating_add(raw.len());

        let encoded: String = raw
            .iter()
            .copied()
            .filter(|&b| is_printable(b))
            .map(char::from)
            .collect();
        if encoded.is_empty() {
            continue;
        }

        let decoded = unshift(&encoded);
        info!(
            "Found chunk length {} at {control_offset}: raw [{}] encoded {encoded:?} decoded {decoded:?}",
            encoded.len(),
            hex_preview(raw)
        );
        result.chunks.push(Chunk {
            control_offset,
            control,
            encoded,
            decoded,
        });
    }

    result
}
