use pem::Label;
use thiserror::Error;

use crate::component::ComponentError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// One entry per invalid input field, modulus first.
    #[error("{}", describe(.0))]
    InvalidComponents(Vec<ComponentError>),

    #[error("ASN.1 error: {0}")]
    Asn1(#[from] asn1::error::Error),

    #[error("Invalid PEM: {0}")]
    InvalidPem(#[from] pem::error::Error),

    #[error("Invalid DER: {0}")]
    InvalidDer(#[from] der::error::Error),

    #[error("unexpected PEM label: expected {expected}, got {actual}")]
    UnexpectedLabel { expected: Label, actual: Label },

    #[error("invalid {structure}: {msg}")]
    InvalidStructure {
        structure: &'static str,
        msg: String,
    },

    #[error("unsupported public key algorithm {0}")]
    UnsupportedAlgorithm(String),

    #[error("empty ASN1Object")]
    EmptyAsn1Object,
}

fn describe(errors: &[ComponentError]) -> String {
    errors
        .iter()
        .map(ComponentError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
