//! Length-prefixed base-36 token reader
//!
//! A token is one decimal digit `L` followed by `L` base-36 digits
//! (`0-9`, `a-z`, case-insensitive). The reader never stalls: every call
//! that returns `Some` moves the cursor forward by at least one byte.

use thiserror::Error;

/// Why a token could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    /// The length position holds something other than `0-9`.
    #[error("invalid length digit {0:?}")]
    InvalidLengthDigit(char),

    /// The length digit is `0`, leaving no index digits.
    #[error("zero-length index")]
    ZeroLength,

    /// The token runs past the end of input.
    #[error("truncated token: needs {needed} digits, {available} left")]
    Truncated {
        /// Digits declared by the length prefix.
        needed: usize,
        /// Digits actually remaining.
        available: usize,
    },

    /// A character in the digit run is not base-36.
    #[error("invalid base-36 digit {0:?}")]
    InvalidDigit(char),

    /// The first token named an index outside the seeded table.
    #[error("first index {0} is outside the seeded table")]
    UnseededIndex(u64),
}

/// A token that fell back to index 0.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed token at offset {offset}: {kind}")]
pub struct MalformedToken {
    /// Byte offset of the token's length digit.
    pub offset: usize,
    pub kind: MalformedKind,
}

/// Cursor over an encoded token string.
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> TokenReader<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Read the next token.
    ///
    /// Returns `None` once the input is exhausted. A malformed token
    /// consumes the bytes it covers so the caller can substitute a fallback
    /// and continue with whatever follows.
    pub fn next_index(&mut self) -> Option<Result<u64, MalformedToken>> {
        let offset = self.pos;
        let &len_byte = self.input.get(offset)?;

        let malformed = |kind| Some(Err(MalformedToken { offset, kind }));

        if !len_byte.is_ascii_digit() {
            self.pos += 1;
            return malformed(MalformedKind::InvalidLengthDigit(char::from(len_byte)));
        }

        let needed = usize::from(len_byte - b'0');
        self.pos += 1;
        if needed == 0 {
            return malformed(MalformedKind::ZeroLength);
        }

        let available = self.input.len() - self.pos;
        if needed > available {
            self.pos = self.input.len();
            return malformed(MalformedKind::Truncated { needed, available });
        }

        let digits = &self.input[self.pos..self.pos + needed];
        self.pos += needed;

        let mut value: u64 = 0;
        for &b in digits {
            let Some(digit) = char::from(b).to_digit(36) else {
                return malformed(MalformedKind::InvalidDigit(char::from(b)));
            };
            // At most nine digits, so this stays well inside u64.
            value = value * 36 + u64::from(digit);
        }

        Some(Ok(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str) -> Vec<Result<u64, MalformedToken>> {
        let mut reader = TokenReader::new(input);
        std::iter::from_fn(|| reader.next_index()).collect()
    }

    #[test]
    fn test_single_and_multi_digit_tokens() {
        assert_eq!(read_all("1a"), vec![Ok(10)]);
        assert_eq!(read_all("21t"), vec![Ok(65)]);
        assert_eq!(read_all("3100"), vec![Ok(1296)]);
        assert_eq!(read_all("1z21T"), vec![Ok(35), Ok(65)]);
    }

    #[test]
    fn test_uppercase_digits() {
        assert_eq!(read_all("2ZZ"), vec![Ok(35 * 36 + 35)]);
    }

    #[test]
    fn test_nine_digit_token() {
        assert_eq!(read_all("9zzzzzzzzz"), vec![Ok(36u64.pow(9) - 1)]);
    }

    #[test]
    fn test_truncated_token_consumes_rest() {
        let mut reader = TokenReader::new("1a3b");
        assert_eq!(reader.next_index(), Some(Ok(10)));
        let bad = reader.next_index().unwrap().unwrap_err();
        assert_eq!(bad.offset, 2);
        assert_eq!(
            bad.kind,
            MalformedKind::Truncated {
                needed: 3,
                available: 1
            }
        );
        assert!(reader.is_exhausted());
        assert_eq!(reader.next_index(), None);
    }

    #[test]
    fn test_bad_length_digit_advances_one() {
        let mut reader = TokenReader::new("x1a");
        let bad = reader.next_index().unwrap().unwrap_err();
        assert_eq!(bad.kind, MalformedKind::InvalidLengthDigit('x'));
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.next_index(), Some(Ok(10)));
    }

    #[test]
    fn test_zero_length() {
        let results = read_all("01b");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap_err().kind, MalformedKind::ZeroLength);
        assert_eq!(results[1], Ok(11));
    }

    #[test]
    fn test_invalid_digit_skips_whole_token() {
        let results = read_all("2a!1c");
        assert_eq!(
            results[0].as_ref().unwrap_err().kind,
            MalformedKind::InvalidDigit('!')
        );
        assert_eq!(results[1], Ok(12));
    }

    #[test]
    fn test_sign_is_not_a_digit() {
        let results = read_all("2+12");
        assert_eq!(
            results[0].as_ref().unwrap_err().kind,
            MalformedKind::InvalidDigit('+')
        );
    }
}
