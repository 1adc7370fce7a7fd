use asn1::{Element, Integer};
use pem::{Label, Pem};
use rsapub::decoder::{DecodableFrom, Decoder};
use rsapub::encoder::{EncodableTo, Encoder};
use tracing::debug;

use crate::component::{Component, decode_component};
use crate::error::{Error, Result};
use crate::spki::SubjectPublicKeyInfo;

/*
RFC 8017 - RSA Public Key

RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

const STRUCTURE: &str = "RSAPublicKey";

/// PKCS#1 RSA public key.
///
/// Both components are validated integers by construction, so a key value
/// is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RSAPublicKey {
    modulus: Integer,         // n
    public_exponent: Integer, // e
}

impl RSAPublicKey {
    pub fn new(modulus: Integer, public_exponent: Integer) -> Self {
        RSAPublicKey {
            modulus,
            public_exponent,
        }
    }

    /// Builds a key from base64 text of the modulus and the public exponent.
    ///
    /// Both fields are always decoded. When both are invalid the error holds
    /// both failures, modulus first.
    pub fn from_base64(modulus: &str, public_exponent: &str) -> Result<Self> {
        let modulus = decode_component(Component::Modulus, modulus);
        let public_exponent = decode_component(Component::PublicExponent, public_exponent);

        match (modulus, public_exponent) {
            (Ok(modulus), Ok(public_exponent)) => {
                let key = RSAPublicKey::new(modulus, public_exponent);
                debug!(bits = key.key_size(), "decoded RSA public key");
                Ok(key)
            }
            (modulus, public_exponent) => Err(Error::InvalidComponents(
                [modulus.err(), public_exponent.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            )),
        }
    }

    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    pub fn public_exponent(&self) -> &Integer {
        &self.public_exponent
    }

    /// Get the key size in bits (RSA modulus bit length)
    pub fn key_size(&self) -> usize {
        self.modulus.bit_len()
    }

    /// DER encoding of the `RSAPublicKey` sequence.
    pub fn to_der(&self) -> Vec<u8> {
        self.to_element().to_der()
    }

    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        crate::element_from_der(bytes)?.decode()
    }

    /// Reads a key from either a `PUBLIC KEY` (SubjectPublicKeyInfo) or an
    /// `RSA PUBLIC KEY` (PKCS#1) block.
    pub fn from_pem(pem: &Pem) -> Result<Self> {
        pem.decode()
    }

    fn to_element(&self) -> Element {
        Element::Sequence(vec![
            Element::Integer(self.modulus.clone()),
            Element::Integer(self.public_exponent.clone()),
        ])
    }
}

impl DecodableFrom<Element> for RSAPublicKey {}

impl Decoder<Element, RSAPublicKey> for Element {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        let Element::Sequence(elements) = self else {
            return Err(Error::InvalidStructure {
                structure: STRUCTURE,
                msg: "expected Sequence".to_string(),
            });
        };

        let [modulus, public_exponent] = elements.as_slice() else {
            return Err(Error::InvalidStructure {
                structure: STRUCTURE,
                msg: format!("expected 2 elements in sequence, got {}", elements.len()),
            });
        };

        let get_integer = |element: &Element, field: &str| -> Result<Integer> {
            match element {
                Element::Integer(int) => Ok(int.clone()),
                other => Err(Error::InvalidStructure {
                    structure: STRUCTURE,
                    msg: format!("expected Integer for {}, got {}", field, other),
                }),
            }
        };

        Ok(RSAPublicKey {
            modulus: get_integer(modulus, "modulus")?,
            public_exponent: get_integer(public_exponent, "publicExponent")?,
        })
    }
}

impl EncodableTo<RSAPublicKey> for Element {}

impl Encoder<RSAPublicKey, Element> for RSAPublicKey {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(self.to_element())
    }
}

// Pem -> RSAPublicKey decoder
impl DecodableFrom<Pem> for RSAPublicKey {}

impl Decoder<Pem, RSAPublicKey> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<RSAPublicKey> {
        match self.label() {
            Label::PublicKey => {
                let spki: SubjectPublicKeyInfo = self.decode()?;
                spki.rsa_public_key()
            }
            Label::RSAPublicKey => {
                let der: Vec<u8> = self.decode()?;
                RSAPublicKey::from_der(&der)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::component::{ComponentError, ComponentErrorKind};
    use asn1::error::Error as Asn1Error;
    use pem::base64::DecodeError;

    // 2048-bit RSA key produced by `openssl genrsa 2048 | openssl rsa -pubout`
    const MODULUS_2048: &str = "rVaEn6la4IJkX2taWtEXWkeLihy735fVRttsRiy0u4/jNXBEnNVUw+A7H8GG+3L0bSszl1uXJ1AaJClxb0LOPfiIfS8U+hkF0BK/YdkapA10IdSKOs0T1PW538FtA/N8aYUiHYJbru2VABkdMy+yyRBIBRa6sv8Ds0Ep2XVkNNjiEZBsy+MslH6R7aOCBXE7hmezQDSQRYUuqSOtoetfL8Mgdyz7mIpsrVyGZGcJn2ogZP56T2rJT5B7T1GyiZAms3kDf6Am+YutifSCLr3CJCkb0L5qHinDnUTApT0qwxyaFgAUBHwArpG3seTxW22cCgE1xijpOjc/GqJIzJnn0w==";

    // same key, `openssl rsa -pubin -RSAPublicKey_out`
    const RSA_2048_PUBLIC_KEY: &str = r"-----BEGIN RSA PUBLIC KEY-----
MIIBCgKCAQEArVaEn6la4IJkX2taWtEXWkeLihy735fVRttsRiy0u4/jNXBEnNVU
w+A7H8GG+3L0bSszl1uXJ1AaJClxb0LOPfiIfS8U+hkF0BK/YdkapA10IdSKOs0T
1PW538FtA/N8aYUiHYJbru2VABkdMy+yyRBIBRa6sv8Ds0Ep2XVkNNjiEZBsy+Ms
lH6R7aOCBXE7hmezQDSQRYUuqSOtoetfL8Mgdyz7mIpsrVyGZGcJn2ogZP56T2rJ
T5B7T1GyiZAms3kDf6Am+YutifSCLr3CJCkb0L5qHinDnUTApT0qwxyaFgAUBHwA
rpG3seTxW22cCgE1xijpOjc/GqJIzJnn0wIDAQAB
-----END RSA PUBLIC KEY-----
";

    const SPKI_2048_PUBLIC_KEY: &str = r"-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEArVaEn6la4IJkX2taWtEX
WkeLihy735fVRttsRiy0u4/jNXBEnNVUw+A7H8GG+3L0bSszl1uXJ1AaJClxb0LO
PfiIfS8U+hkF0BK/YdkapA10IdSKOs0T1PW538FtA/N8aYUiHYJbru2VABkdMy+y
yRBIBRa6sv8Ds0Ep2XVkNNjiEZBsy+MslH6R7aOCBXE7hmezQDSQRYUuqSOtoetf
L8Mgdyz7mIpsrVyGZGcJn2ogZP56T2rJT5B7T1GyiZAms3kDf6Am+YutifSCLr3C
JCkb0L5qHinDnUTApT0qwxyaFgAUBHwArpG3seTxW22cCgE1xijpOjc/GqJIzJnn
0wIDAQAB
-----END PUBLIC KEY-----
";

    #[test]
    fn test_rsa_public_key_from_base64() {
        let key = RSAPublicKey::from_base64("AMOh", "AQAB").unwrap();
        assert_eq!(&[0xc3, 0xa1], key.modulus().as_bytes());
        assert_eq!(&[0x01, 0x00, 0x01], key.public_exponent().as_bytes());
        assert_eq!(16, key.key_size());

        let expected: Vec<u8> = vec![
            0x30, 0x0a, 0x02, 0x03, 0x00, 0xc3, 0xa1, 0x02, 0x03, 0x01, 0x00, 0x01,
        ];
        assert_eq!(expected, key.to_der());
        assert_eq!(key, RSAPublicKey::from_der(&expected).unwrap());
    }

    #[rstest(modulus, exponent, expected,
        case(
            "not!valid==",
            "AQAB",
            vec![ComponentError {
                component: Component::Modulus,
                kind: ComponentErrorKind::Decode(DecodeError::InvalidCharacter { offset: 3, character: '!' }),
            }]
        ),
        case(
            "AMOh",
            "QQ",
            vec![ComponentError {
                component: Component::PublicExponent,
                kind: ComponentErrorKind::Decode(DecodeError::InvalidPadding),
            }]
        ),
        case(
            "not!valid==",
            "",
            vec![
                ComponentError {
                    component: Component::Modulus,
                    kind: ComponentErrorKind::Decode(DecodeError::InvalidCharacter { offset: 3, character: '!' }),
                },
                ComponentError {
                    component: Component::PublicExponent,
                    kind: ComponentErrorKind::Encoding(Asn1Error::EmptyValue),
                },
            ]
        )
    )]
    fn test_rsa_public_key_from_base64_with_error(
        modulus: &str,
        exponent: &str,
        expected: Vec<ComponentError>,
    ) {
        let err = RSAPublicKey::from_base64(modulus, exponent).unwrap_err();
        assert_eq!(Error::InvalidComponents(expected), err);
    }

    #[test]
    fn test_rsa_public_key_both_errors_message() {
        let err = RSAPublicKey::from_base64("not!valid==", "QQ").unwrap_err();
        assert_eq!(
            "invalid encoding for modulus: invalid character '!' at offset 3; \
             invalid encoding for public exponent: invalid padding",
            err.to_string()
        );
    }

    #[test]
    fn test_rsa_public_key_encode_decode_element() {
        let key = RSAPublicKey::from_base64(MODULUS_2048, "AQAB").unwrap();
        let element: Element = key.encode().unwrap();
        let decoded: RSAPublicKey = element.decode().unwrap();
        assert_eq!(key, decoded);
        assert_eq!(2048, decoded.key_size());
    }

    #[rstest(input, msg,
        case(vec![0x02, 0x01, 0x03], "expected Sequence"),
        case(vec![0x30, 0x03, 0x02, 0x01, 0x03], "expected 2 elements in sequence, got 1"),
        case(
            vec![0x30, 0x09, 0x02, 0x01, 0x03, 0x02, 0x01, 0x03, 0x02, 0x01, 0x03],
            "expected 2 elements in sequence, got 3"
        ),
        case(vec![0x30, 0x05, 0x05, 0x00, 0x02, 0x01, 0x03], "expected Integer for modulus, got Null")
    )]
    fn test_rsa_public_key_from_der_with_error(input: Vec<u8>, msg: &str) {
        let err = RSAPublicKey::from_der(&input).unwrap_err();
        assert_eq!(
            Error::InvalidStructure {
                structure: "RSAPublicKey",
                msg: msg.to_string(),
            },
            err
        );
    }

    #[test]
    fn test_rsa_public_key_from_der_negative_modulus() {
        let input = [0x30, 0x06, 0x02, 0x01, 0x80, 0x02, 0x01, 0x03];
        let err = RSAPublicKey::from_der(&input).unwrap_err();
        assert_eq!(Error::Asn1(Asn1Error::NegativeInteger), err);
    }

    #[rstest(input, case(RSA_2048_PUBLIC_KEY), case(SPKI_2048_PUBLIC_KEY))]
    fn test_rsa_public_key_from_pem(input: &str) {
        let pem: Pem = input.parse().unwrap();
        let key = RSAPublicKey::from_pem(&pem).unwrap();

        let expected = RSAPublicKey::from_base64(MODULUS_2048, "AQAB").unwrap();
        assert_eq!(expected, key);
    }

    #[test]
    fn test_rsa_public_key_pkcs1_der_matches_openssl() {
        let pem: Pem = RSA_2048_PUBLIC_KEY.parse().unwrap();
        let der: Vec<u8> = pem.decode().unwrap();

        let key = RSAPublicKey::from_base64(MODULUS_2048, "AQAB").unwrap();
        assert_eq!(der, key.to_der());
    }
}
