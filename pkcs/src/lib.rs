//! RSA public key structures and the base64-to-PEM pipeline.
//!
//! ```
//! let pem = pkcs::public_key_pem("AMOh", "AQAB").unwrap();
//! assert_eq!(
//!     "-----BEGIN PUBLIC KEY-----\n\
//!      MB4wDQYJKoZIhvcNAQEBBQADDQAwCgIDAMOhAgMBAAE=\n\
//!      -----END PUBLIC KEY-----\n",
//!     pem
//! );
//! ```

pub mod component;
pub mod error;
pub mod pkcs1;
pub mod spki;

use asn1::{ASN1Object, Element};
use der::Der;
use pem::Label;
use rsapub::decoder::Decoder;
use tracing::debug;

pub use component::{Component, ComponentError, ComponentErrorKind, decode_component};
pub use error::{Error, Result};
pub use pkcs1::RSAPublicKey;
pub use spki::{AlgorithmIdentifier, AlgorithmParameters, SubjectPublicKeyInfo};

/// Converts base64 modulus and public exponent into a `PUBLIC KEY` PEM
/// document.
///
/// # Errors
///
/// [`Error::InvalidComponents`] naming every field that failed to decode.
pub fn public_key_pem(modulus: &str, public_exponent: &str) -> Result<String> {
    let key = RSAPublicKey::from_base64(modulus, public_exponent)?;
    let der = SubjectPublicKeyInfo::from_rsa(&key).to_der();
    debug!(der_len = der.len(), "writing PEM");
    Ok(pem::write(&der, Label::PublicKey))
}

// DER bytes holding exactly one top-level element
pub(crate) fn element_from_der(bytes: &[u8]) -> Result<Element> {
    let der: Der = bytes.decode()?;
    let object: ASN1Object = der.decode()?;
    match object.elements() {
        [] => Err(Error::EmptyAsn1Object),
        [element] => Ok(element.clone()),
        [_, rest @ ..] => {
            let trailing = rest.iter().map(|e| e.to_der().len()).sum();
            Err(der::error::Error::TrailingData(trailing).into())
        }
    }
}
