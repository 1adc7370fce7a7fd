use std::{fmt::Display, str::FromStr};

use der::{Der, Tag, Tlv};
use error::Error;
use rsapub::decoder::{DecodableFrom, Decoder};
use rsapub::encoder::{EncodableTo, Encoder};

pub mod error;
mod integer;

pub use integer::{Integer, normalize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object, Error> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der, Self::Error> {
        Ok(Der::new(self.elements.iter().map(Tlv::from).collect()))
    }
}

/// The ASN.1 types needed for RSA public keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Integer(Integer),
    BitString(BitString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    Sequence(Vec<Element>),
}

impl Element {
    /// Encodes the element and its children to DER bytes.
    pub fn to_der(&self) -> Vec<u8> {
        Tlv::from(self).to_bytes()
    }

    /// Parses exactly one DER element.
    pub fn from_der(bytes: &[u8]) -> Result<Element, Error> {
        let tlv = Tlv::from_der(bytes)?;
        Element::try_from(&tlv)
    }
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self, Self::Error> {
        match tlv.tag() {
            Tag::Integer => {
                let data = primitive(tlv)?;
                Ok(Element::Integer(Integer::from_der_content(data)?))
            }
            Tag::BitString => {
                let data = primitive(tlv)?;
                Ok(Element::BitString(BitString::try_from(data)?))
            }
            Tag::Null => {
                if !primitive(tlv)?.is_empty() {
                    return Err(Error::NullWithContent);
                }
                Ok(Element::Null)
            }
            Tag::ObjectIdentifier => {
                let data = primitive(tlv)?;
                Ok(Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?))
            }
            Tag::Sequence => {
                let tlvs = tlv.tlvs().ok_or(Error::UnexpectedForm {
                    expected: "constructed SEQUENCE",
                })?;
                let elements = tlvs
                    .iter()
                    .map(Element::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Element::Sequence(elements))
            }
            tag => Err(Error::UnsupportedTag(u8::from(tag))),
        }
    }
}

fn primitive(tlv: &Tlv) -> Result<&[u8], Error> {
    tlv.data().ok_or(Error::UnexpectedForm {
        expected: "primitive encoding",
    })
}

impl From<&Element> for Tlv {
    fn from(element: &Element) -> Self {
        match element {
            Element::Integer(i) => Tlv::new_primitive(Tag::Integer, i.to_der_content()),
            Element::BitString(bs) => Tlv::new_primitive(Tag::BitString, Vec::from(bs)),
            Element::Null => Tlv::new_primitive(Tag::Null, vec![]),
            Element::ObjectIdentifier(oid) => {
                Tlv::new_primitive(Tag::ObjectIdentifier, oid.as_der_content().to_vec())
            }
            Element::Sequence(elements) => {
                Tlv::new_constructed(Tag::Sequence, elements.iter().map(Tlv::from).collect())
            }
        }
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv, Self::Error> {
        Ok(Tlv::from(self))
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({} bits)", bs.bit_len()),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::Sequence(seq) => {
                write!(f, "Sequence(")?;
                for (i, element) in seq.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// OBJECT IDENTIFIER, kept both as arcs and as its DER content octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectIdentifier {
    arcs: Vec<u64>,
    encoded: Vec<u8>,
}

/// rsaEncryption, 1.2.840.113549.1.1.1 (RFC 8017 appendix A.1)
const RSA_ENCRYPTION_ARCS: [u64; 7] = [1, 2, 840, 113549, 1, 1, 1];
const RSA_ENCRYPTION_DER: [u8; 9] = [0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

impl ObjectIdentifier {
    pub fn rsa_encryption() -> Self {
        ObjectIdentifier {
            arcs: RSA_ENCRYPTION_ARCS.to_vec(),
            encoded: RSA_ENCRYPTION_DER.to_vec(),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    pub fn as_der_content(&self) -> &[u8] {
        &self.encoded
    }

    fn from_arcs(arcs: Vec<u64>) -> Result<Self, Error> {
        let [first, second, rest @ ..] = arcs.as_slice() else {
            return Err(Error::ObjectIdentifierTooFewComponents);
        };
        if *first > 2 || (*first < 2 && *second >= 40) {
            return Err(Error::ObjectIdentifierInvalidRoot(*first, *second));
        }
        let head = (first * 40)
            .checked_add(*second)
            .ok_or(Error::ObjectIdentifierOverflow)?;

        let mut encoded = Vec::new();
        encode_arc(head, &mut encoded);
        for arc in rest {
            encode_arc(*arc, &mut encoded);
        }
        Ok(ObjectIdentifier { arcs, encoded })
    }
}

// base-128, most significant group first, continuation bit on all but the last
fn encode_arc(mut value: u64, out: &mut Vec<u8>) {
    let mut groups = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.iter().rev());
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut current = 0u64;
        let mut pending = false;
        for &b in value {
            if !pending && b == 0x80 {
                // leading 0x80 is a non-minimal encoding
                return Err(Error::ObjectIdentifierIncompleteEncoding);
            }
            if current > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierOverflow);
            }
            current = (current << 7) | u64::from(b & 0x7f);
            pending = b & 0x80 != 0;
            if !pending {
                subidentifiers.push(current);
                current = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        let mut arcs = Vec::with_capacity(subidentifiers.len() + 1);
        match subidentifiers[0] {
            head @ 0..40 => arcs.extend([0, head]),
            head @ 40..80 => arcs.extend([1, head - 40]),
            head => arcs.extend([2, head - 80]),
        }
        arcs.extend_from_slice(&subidentifiers[1..]);

        Ok(ObjectIdentifier {
            arcs,
            encoded: value.to_vec(),
        })
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| {
                if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::ObjectIdentifierInvalidComponent(arc.to_string()));
                }
                arc.parse::<u64>().map_err(Error::ParseInt)
            })
            .collect::<Result<Vec<u64>, Error>>()?;
        ObjectIdentifier::from_arcs(arcs)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .arcs
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self, Error> {
        if unused > 7 || (data.is_empty() && unused != 0) {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString { unused, data })
    }

    /// A bit string holding whole bytes, as used for embedded DER.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        BitString { unused: 0, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - usize::from(self.unused)
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value.split_first() {
            Some((&unused, data)) => BitString::new(unused, data.to_vec()),
            None => Err(Error::BitStringNoData),
        }
    }
}

impl From<&BitString> for Vec<u8> {
    fn from(value: &BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend_from_slice(&value.data);
        result
    }
}
