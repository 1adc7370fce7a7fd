//! Strict base64 codec (RFC 4648, standard alphabet, padded).
//!
//! The decoder never skips a byte it does not understand. A stray
//! character anywhere in the input is reported with its offset instead of
//! silently shortening the decoded data.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

const PAD: u8 = b'=';

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A byte outside `A-Z a-z 0-9 + /`, or a final symbol carrying
    /// non-zero trailing bits.
    #[error("invalid character {character:?} at offset {offset}")]
    InvalidCharacter { offset: usize, character: char },

    /// Length is not a multiple of 4, or `=` appears before the end.
    #[error("invalid padding")]
    InvalidPadding,
}

/// Encodes `data` with the standard alphabet and `=` padding, without line
/// breaks.
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes base64 text into bytes.
///
/// A single trailing `\n` or `\r\n` is tolerated. Empty input decodes to an
/// empty vector.
///
/// # Errors
///
/// [`DecodeError::InvalidCharacter`] for bytes outside the alphabet and for
/// a final symbol whose unused low bits are not zero (`"QR=="`),
/// [`DecodeError::InvalidPadding`] for a bad length or misplaced `=`.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let text = strip_line_terminator(text);
    validate(text.as_bytes())?;

    STANDARD.decode(text).map_err(|e| match e {
        base64::DecodeError::InvalidByte(offset, b)
        | base64::DecodeError::InvalidLastSymbol(offset, b) => DecodeError::InvalidCharacter {
            offset,
            character: char::from(b),
        },
        base64::DecodeError::InvalidLength(_) | base64::DecodeError::InvalidPadding => {
            DecodeError::InvalidPadding
        }
    })
}

fn strip_line_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

fn validate(input: &[u8]) -> Result<(), DecodeError> {
    // alphabet first, so that "not!valid==" reports the '!' rather than its length
    let mut pad_start = None;
    for (offset, &b) in input.iter().enumerate() {
        if b == PAD {
            pad_start.get_or_insert(offset);
            continue;
        }
        if !is_alphabet(b) {
            return Err(DecodeError::InvalidCharacter {
                offset,
                character: char::from(b),
            });
        }
        if pad_start.is_some() {
            // data after padding
            return Err(DecodeError::InvalidPadding);
        }
    }

    if input.len() % 4 != 0 {
        return Err(DecodeError::InvalidPadding);
    }
    if let Some(start) = pad_start {
        if input.len() - start > 2 {
            return Err(DecodeError::InvalidPadding);
        }
    }
    Ok(())
}

fn is_alphabet(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
}
