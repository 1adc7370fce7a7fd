//! Decoding of the base64 key components supplied by the caller.

use std::fmt::{Display, Formatter};

use asn1::Integer;
use pem::base64::{self, DecodeError};
use thiserror::Error;
use tracing::debug;

/// The input field a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Modulus,
    PublicExponent,
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Modulus => write!(f, "modulus"),
            Component::PublicExponent => write!(f, "public exponent"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComponentErrorKind {
    #[error("{0}")]
    Decode(#[from] DecodeError),

    /// Decoded but not a usable integer (`EmptyValue`).
    #[error("{0}")]
    Encoding(#[from] asn1::error::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid encoding for {component}: {kind}")]
pub struct ComponentError {
    pub component: Component,
    #[source]
    pub kind: ComponentErrorKind,
}

/// Base64-decodes one component and normalizes it to a canonical integer.
pub fn decode_component(component: Component, text: &str) -> Result<Integer, ComponentError> {
    let wrap = |kind: ComponentErrorKind| ComponentError { component, kind };

    let bytes = base64::decode(text).map_err(|e| wrap(e.into()))?;
    let integer = Integer::from_be_bytes(&bytes).map_err(|e| wrap(e.into()))?;
    debug!(
        %component,
        decoded_len = bytes.len(),
        bits = integer.bit_len(),
        "decoded key component"
    );
    Ok(integer)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Component, ComponentError, ComponentErrorKind, decode_component};
    use asn1::error::Error as Asn1Error;
    use pem::base64::DecodeError;

    #[rstest(component, text, expected,
        case(Component::Modulus, "AMOh", vec![0xc3, 0xa1]),
        case(Component::PublicExponent, "AQAB", vec![0x01, 0x00, 0x01]),
        case(Component::PublicExponent, "AAAAAw==", vec![0x03]),
        case(Component::PublicExponent, "AA==", vec![0x00])
    )]
    fn test_decode_component(component: Component, text: &str, expected: Vec<u8>) {
        let integer = decode_component(component, text).unwrap();
        assert_eq!(expected, integer.as_bytes());
    }

    #[rstest(component, text, expected,
        case(
            Component::Modulus,
            "not!valid==",
            ComponentErrorKind::Decode(DecodeError::InvalidCharacter { offset: 3, character: '!' })
        ),
        case(Component::PublicExponent, "QQ", ComponentErrorKind::Decode(DecodeError::InvalidPadding)),
        case(Component::Modulus, "", ComponentErrorKind::Encoding(Asn1Error::EmptyValue)),
        case(Component::PublicExponent, "\n", ComponentErrorKind::Encoding(Asn1Error::EmptyValue))
    )]
    fn test_decode_component_with_error(
        component: Component,
        text: &str,
        expected: ComponentErrorKind,
    ) {
        let err = decode_component(component, text).unwrap_err();
        assert_eq!(
            ComponentError {
                component,
                kind: expected
            },
            err
        );
    }

    #[test]
    fn test_component_error_message() {
        let err = decode_component(Component::PublicExponent, "QQ").unwrap_err();
        assert_eq!(
            "invalid encoding for public exponent: invalid padding",
            err.to_string()
        );
    }
}
