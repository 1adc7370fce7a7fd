//! Error types for ASN.1 parsing and encoding.

use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    // Integer errors
    #[error("INTEGER: empty value")]
    EmptyValue,
    #[error("INTEGER: negative value")]
    NegativeInteger,
    #[error("INTEGER: non-minimal encoding")]
    NonMinimalInteger,

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: arc overflows u64")]
    ObjectIdentifierOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: first arcs {0}.{1} out of range")]
    ObjectIdentifierInvalidRoot(u64, u64),
    #[error("OBJECT IDENTIFIER: invalid component '{0}'")]
    ObjectIdentifierInvalidComponent(String),
    #[error("parse int error: {0}")]
    ParseInt(ParseIntError),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    #[error("NULL: content must be empty")]
    NullWithContent,

    #[error("element: expected {expected}")]
    UnexpectedForm { expected: &'static str },
    #[error("element: unsupported tag 0x{0:02x}")]
    UnsupportedTag(u8),

    #[error("invalid DER encoding: {0}")]
    FailedToDecodeDer(#[from] der::error::Error),
}
