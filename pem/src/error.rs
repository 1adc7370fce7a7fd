use thiserror::Error;

use crate::base64::DecodeError;

/// Errors that can occur when parsing or decoding PEM data.
///
/// Parsing follows RFC 7468: a BEGIN line, base64 lines and an END line
/// with the same label.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Missing the opening boundary (e.g. `-----BEGIN PUBLIC KEY-----`)
    #[error("missing a pre encapsulation boundary")]
    MissingPreEncapsulationBoundary,

    /// Missing the closing boundary (e.g. `-----END PUBLIC KEY-----`)
    #[error("missing a post encapsulation boundary")]
    MissingPostEncapsulationBoundary,

    #[error("missing PEM data")]
    MissingData,

    #[error("invalid label")]
    InvalidLabel,

    /// BEGIN and END labels differ
    #[error("label doesn't match")]
    LabelMissMatch,

    #[error("invalid encapsulation boundary")]
    InvalidEncapsulationBoundary,

    /// Blank line inside the base64 block
    #[error("invalid base64line")]
    InvalidBase64Line,

    #[error("base64 decode: {0}")]
    Base64Decode(#[from] DecodeError),
}
