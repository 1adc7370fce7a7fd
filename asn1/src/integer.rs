//! Non-negative integers of arbitrary length.
//!
//! Only storage and byte-level conversion are needed here, so the value is
//! kept as its big-endian magnitude rather than as a bignum.

use std::fmt::{Display, Formatter, LowerHex};

use crate::error::Error;

const SIGN_BIT: u8 = 0x80;

/// Strips leading zero bytes from a big-endian unsigned value.
///
/// All-zero input collapses to `[0x00]`. Already minimal input is returned
/// unchanged.
///
/// # Errors
///
/// [`Error::EmptyValue`] if `bytes` is empty: no value was supplied at all,
/// which is not the same thing as zero.
pub fn normalize(bytes: &[u8]) -> Result<Vec<u8>, Error> {
    let Some(last) = bytes.len().checked_sub(1) else {
        return Err(Error::EmptyValue);
    };
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(last);
    Ok(bytes[start..].to_vec())
}

/// Unsigned big integer in canonical big-endian form.
///
/// The DER sign octet is not part of the value; it is added by
/// [`Integer::to_der_content`] and removed by [`Integer::from_der_content`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    magnitude: Vec<u8>,
}

impl Integer {
    /// Builds an integer from big-endian bytes that may carry leading zeros.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Integer {
            magnitude: normalize(bytes)?,
        })
    }

    /// Reads the content octets of a DER `INTEGER`.
    ///
    /// Negative and non-minimally encoded values are rejected.
    pub fn from_der_content(content: &[u8]) -> Result<Self, Error> {
        match content {
            [] => Err(Error::EmptyValue),
            [first, ..] if first & SIGN_BIT != 0 => Err(Error::NegativeInteger),
            [0x00, second, ..] if second & SIGN_BIT == 0 => Err(Error::NonMinimalInteger),
            [0x00, rest @ ..] if !rest.is_empty() => Ok(Integer {
                magnitude: rest.to_vec(),
            }),
            _ => Ok(Integer {
                magnitude: content.to_vec(),
            }),
        }
    }

    /// Content octets of the DER `INTEGER` encoding.
    ///
    /// DER integers are two's complement, so a value whose first byte has
    /// the high bit set gets a `0x00` prefix to stay positive.
    pub fn to_der_content(&self) -> Vec<u8> {
        match self.magnitude.first() {
            Some(&b) if b & SIGN_BIT != 0 => {
                let mut content = Vec::with_capacity(self.magnitude.len() + 1);
                content.push(0x00);
                content.extend_from_slice(&self.magnitude);
                content
            }
            _ => self.magnitude.clone(),
        }
    }

    /// Minimal big-endian magnitude.
    pub fn as_bytes(&self) -> &[u8] {
        &self.magnitude
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.magnitude
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude == [0x00]
    }

    /// Number of significant bits; 0 for zero.
    pub fn bit_len(&self) -> usize {
        match self.magnitude.first() {
            Some(&first) if first != 0 => {
                (self.magnitude.len() - 1) * 8 + (8 - first.leading_zeros() as usize)
            }
            _ => 0,
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        if self.magnitude.len() > size_of::<u64>() {
            return None;
        }
        Some(
            self.magnitude
                .iter()
                .fold(0u64, |n, &b| (n << 8) | u64::from(b)),
        )
    }
}

impl LowerHex for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for b in &self.magnitude {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_u64() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "0x{:x}", self),
        }
    }
}
