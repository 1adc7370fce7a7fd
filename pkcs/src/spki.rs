//! Subject Public Key Info
//!
//! RFC 5280 Section 4.1.2.7, with the RSA algorithm identifier of RFC 3279
//! Section 2.3.1.
//!
//! ```asn1
//! SubjectPublicKeyInfo  ::=  SEQUENCE  {
//!     algorithm            AlgorithmIdentifier,
//!     subjectPublicKey     BIT STRING
//! }
//!
//! AlgorithmIdentifier  ::=  SEQUENCE  {
//!     algorithm               OBJECT IDENTIFIER,
//!     parameters              ANY DEFINED BY algorithm OPTIONAL
//! }
//! ```
//!
//! For rsaEncryption the parameters are NULL and the BIT STRING carries the
//! DER encoding of a PKCS#1 `RSAPublicKey`.

use asn1::{BitString, Element, ObjectIdentifier};
use pem::{FromPem, Label, Pem, ToPem};
use rsapub::decoder::{DecodableFrom, Decoder};
use rsapub::encoder::{EncodableTo, Encoder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::pkcs1::RSAPublicKey;

/// rsaEncryption
pub const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmParameters {
    Null,
    Elm(Element),
}

impl From<&AlgorithmParameters> for Element {
    fn from(value: &AlgorithmParameters) -> Self {
        match value {
            AlgorithmParameters::Null => Element::Null,
            AlgorithmParameters::Elm(elm) => elm.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    algorithm: ObjectIdentifier,
    parameters: Option<AlgorithmParameters>,
}

impl AlgorithmIdentifier {
    /// `SEQUENCE { rsaEncryption, NULL }`
    pub fn rsa_encryption() -> Self {
        AlgorithmIdentifier {
            algorithm: ObjectIdentifier::rsa_encryption(),
            parameters: Some(AlgorithmParameters::Null),
        }
    }

    pub fn algorithm(&self) -> &ObjectIdentifier {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&AlgorithmParameters> {
        self.parameters.as_ref()
    }

    pub fn is_rsa_encryption(&self) -> bool {
        self.algorithm == ObjectIdentifier::rsa_encryption()
    }

    fn to_element(&self) -> Element {
        let mut elements = vec![Element::ObjectIdentifier(self.algorithm.clone())];
        if let Some(parameters) = &self.parameters {
            elements.push(Element::from(parameters));
        }
        Element::Sequence(elements)
    }
}

impl DecodableFrom<Element> for AlgorithmIdentifier {}

impl Decoder<Element, AlgorithmIdentifier> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier> {
        let invalid = |msg: &str| Error::InvalidStructure {
            structure: "AlgorithmIdentifier",
            msg: msg.to_string(),
        };

        let Element::Sequence(elements) = self else {
            return Err(invalid("expected Sequence"));
        };

        let (algorithm, parameters) = match elements.as_slice() {
            [Element::ObjectIdentifier(oid)] => (oid, None),
            [Element::ObjectIdentifier(oid), Element::Null] => {
                (oid, Some(AlgorithmParameters::Null))
            }
            [Element::ObjectIdentifier(oid), other] => {
                (oid, Some(AlgorithmParameters::Elm(other.clone())))
            }
            [_] | [_, _] => return Err(invalid("algorithm must be an OBJECT IDENTIFIER")),
            _ => return Err(invalid("expected 1 or 2 elements in sequence")),
        };

        Ok(AlgorithmIdentifier {
            algorithm: algorithm.clone(),
            parameters,
        })
    }
}

impl EncodableTo<AlgorithmIdentifier> for Element {}

impl Encoder<AlgorithmIdentifier, Element> for AlgorithmIdentifier {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(self.to_element())
    }
}

/// Subject Public Key Info
///
/// Contains the algorithm identifier and the public key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    subject_public_key: BitString,
}

impl SubjectPublicKeyInfo {
    /// Wraps an RSA key: rsaEncryption with NULL parameters, and the
    /// PKCS#1 encoding of the key as the BIT STRING payload.
    pub fn from_rsa(key: &RSAPublicKey) -> Self {
        let subject_public_key = BitString::from_bytes(key.to_der());
        debug!(
            bits = key.key_size(),
            payload_len = subject_public_key.as_bytes().len(),
            "assembled SubjectPublicKeyInfo"
        );
        SubjectPublicKeyInfo {
            algorithm: AlgorithmIdentifier::rsa_encryption(),
            subject_public_key,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// Extracts the RSA key carried in the BIT STRING.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedAlgorithm`] for anything but rsaEncryption, and
    /// [`Error::InvalidStructure`] when the parameters are not NULL or the
    /// payload is not whole bytes.
    pub fn rsa_public_key(&self) -> Result<RSAPublicKey> {
        if !self.algorithm.is_rsa_encryption() {
            return Err(Error::UnsupportedAlgorithm(
                self.algorithm.algorithm().to_string(),
            ));
        }
        if self.algorithm.parameters() != Some(&AlgorithmParameters::Null) {
            return Err(Error::InvalidStructure {
                structure: "AlgorithmIdentifier",
                msg: "rsaEncryption parameters must be NULL".to_string(),
            });
        }
        if self.subject_public_key.unused_bits() != 0 {
            return Err(Error::InvalidStructure {
                structure: "SubjectPublicKeyInfo",
                msg: format!(
                    "subject public key has {} unused bits",
                    self.subject_public_key.unused_bits()
                ),
            });
        }
        RSAPublicKey::from_der(self.subject_public_key.as_bytes())
    }

    pub fn to_der(&self) -> Vec<u8> {
        let der = self.to_element().to_der();
        debug!(der_len = der.len(), "encoded SubjectPublicKeyInfo");
        der
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        crate::element_from_der(bytes)?.decode()
    }

    fn to_element(&self) -> Element {
        Element::Sequence(vec![
            self.algorithm.to_element(),
            Element::BitString(self.subject_public_key.clone()),
        ])
    }
}

impl DecodableFrom<Element> for SubjectPublicKeyInfo {}

impl Decoder<Element, SubjectPublicKeyInfo> for Element {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        let invalid = |msg: String| Error::InvalidStructure {
            structure: "SubjectPublicKeyInfo",
            msg,
        };

        let Element::Sequence(elements) = self else {
            return Err(invalid("expected Sequence".to_string()));
        };

        let [algorithm, public_key] = elements.as_slice() else {
            return Err(invalid(format!(
                "expected 2 elements in sequence, got {}",
                elements.len()
            )));
        };

        let algorithm: AlgorithmIdentifier = algorithm.decode()?;
        let Element::BitString(subject_public_key) = public_key else {
            return Err(invalid(
                "expected BitString for subject public key".to_string(),
            ));
        };

        Ok(SubjectPublicKeyInfo {
            algorithm,
            subject_public_key: subject_public_key.clone(),
        })
    }
}

impl EncodableTo<SubjectPublicKeyInfo> for Element {}

impl Encoder<SubjectPublicKeyInfo, Element> for SubjectPublicKeyInfo {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(self.to_element())
    }
}

impl ToPem for SubjectPublicKeyInfo {
    type Error = Error;

    fn pem_label(&self) -> Label {
        Label::PublicKey
    }

    fn to_pem(&self) -> Result<Pem> {
        Ok(Pem::from_bytes(self.pem_label(), &self.to_der()))
    }
}

impl FromPem for SubjectPublicKeyInfo {
    type Error = Error;

    fn expected_label() -> Label {
        Label::PublicKey
    }

    fn from_pem(pem: &Pem) -> Result<Self> {
        pem.decode()
    }
}

// Pem -> SubjectPublicKeyInfo decoder
impl DecodableFrom<Pem> for SubjectPublicKeyInfo {}

impl Decoder<Pem, SubjectPublicKeyInfo> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo> {
        let expected = SubjectPublicKeyInfo::expected_label();
        if self.label() != expected {
            return Err(Error::UnexpectedLabel {
                expected,
                actual: self.label(),
            });
        }
        let der: Vec<u8> = self.decode()?;
        SubjectPublicKeyInfo::from_der(&der)
    }
}
