//! Distinguished Encoding Rules: tag-length-value nodes.
//!
//! [`Tlv`] is the untyped DER tree. It is built bottom up with
//! [`Tlv::new_primitive`] / [`Tlv::new_constructed`] and flattened depth
//! first by [`Tlv::to_bytes`]. The length octets are always computed from
//! the content, so a node can never carry a length that disagrees with it.
//!
//! Parsing goes the other way through the `Decoder` trait:
//!
//! ```
//! use der::{Der, Tag};
//! use rsapub::decoder::Decoder;
//!
//! let bytes: Vec<u8> = vec![0x30, 0x03, 0x02, 0x01, 0x07];
//! let der: Der = bytes.decode().unwrap();
//! assert_eq!(Tag::Sequence, der.elements()[0].tag());
//! ```

use std::convert::Infallible;

use nom::{IResult, Parser, error::ErrorKind};
use rsapub::decoder::{DecodableFrom, Decoder};
use rsapub::encoder::{EncodableTo, Encoder};

use error::Error;

pub mod error;

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_NUMBER_MASK: u8 = 0x1f;

/// Deepest constructed nesting the parser accepts.
pub const MAX_DEPTH: usize = 32;
const LENGTH_LONG_FORM: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tag {
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Sequence,
    Set,
    Other(u8),
}

impl Tag {
    pub fn is_constructed(self) -> bool {
        u8::from(self) & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            0x02 => Tag::Integer,
            0x03 => Tag::BitString,
            0x04 => Tag::OctetString,
            0x05 => Tag::Null,
            0x06 => Tag::ObjectIdentifier,
            0x30 => Tag::Sequence,
            0x31 => Tag::Set,
            _ => Tag::Other(value),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Integer => 0x02,
            Tag::BitString => 0x03,
            Tag::OctetString => 0x04,
            Tag::Null => 0x05,
            Tag::ObjectIdentifier => 0x06,
            Tag::Sequence => 0x30,
            Tag::Set => 0x31,
            Tag::Other(b) => b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlv(tlvs),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Content octets of a primitive node.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Children of a constructed node.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(tlvs) => Some(tlvs),
            Value::Data(_) => None,
        }
    }

    /// Length of the content octets.
    pub fn content_len(&self) -> usize {
        match &self.value {
            Value::Data(data) => data.len(),
            Value::Tlv(tlvs) => tlvs.iter().map(Tlv::encoded_len).sum(),
        }
    }

    /// Length of the whole encoding: tag, length octets and content.
    pub fn encoded_len(&self) -> usize {
        let content_len = self.content_len();
        1 + length_octets(content_len) + content_len
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(u8::from(self.tag));
        out.extend(encode_length(self.content_len()));
        match &self.value {
            Value::Data(data) => out.extend_from_slice(data),
            Value::Tlv(tlvs) => tlvs.iter().for_each(|tlv| tlv.write_to(out)),
        }
    }

    /// Parses exactly one TLV; anything left over is an error.
    pub fn from_der(input: &[u8]) -> Result<Tlv, Error> {
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let (rest, tlv) = Self::parse(input, 0)?;
        if !rest.is_empty() {
            return Err(Error::TrailingData(rest.len()));
        }
        Ok(tlv)
    }

    fn parse(input: &[u8], depth: usize) -> IResult<&[u8], Tlv> {
        let (rest, tag) = parse_tag(input)?;
        if tag.is_constructed() && depth >= MAX_DEPTH {
            return Err(failure(input, ErrorKind::TooLarge));
        }
        let (rest, length) = parse_length(rest)?;
        let (input, data) = nom::bytes::complete::take(length).parse(rest)?;

        if tag.is_constructed() {
            let mut tlvs = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, tlv) = Self::parse(data, depth + 1)?;
                data = rest;
                tlvs.push(tlv);
            }
            return Ok((input, Tlv::new_constructed(tag, tlvs)));
        }

        Ok((input, Tlv::new_primitive(tag, data.to_vec())))
    }
}

/// Encodes a content length.
///
/// 0..=127 use the short form (one octet). Longer contents use the long
/// form: `0x80 | n` followed by the `n` minimal big-endian length octets.
pub fn encode_length(length: usize) -> Vec<u8> {
    if length < usize::from(LENGTH_LONG_FORM) {
        return vec![length as u8];
    }
    let be = length.to_be_bytes();
    let skip = be.iter().take_while(|&&b| b == 0).count();
    let significant = &be[skip..];

    let mut out = Vec::with_capacity(significant.len() + 1);
    out.push(LENGTH_LONG_FORM | significant.len() as u8);
    out.extend_from_slice(significant);
    out
}

fn length_octets(length: usize) -> usize {
    if length < usize::from(LENGTH_LONG_FORM) {
        1
    } else {
        1 + (usize::BITS - length.leading_zeros()).div_ceil(8) as usize
    }
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (rest, n) = nom::number::complete::be_u8(input)?;
    if n & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        // high tag number form, not used by any structure handled here
        return Err(failure(input, ErrorKind::Tag));
    }
    Ok((rest, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, n) = nom::number::complete::be_u8(input)?;
    if n & LENGTH_LONG_FORM == 0 {
        // short form: 0-127
        return Ok((rest, usize::from(n)));
    }

    // long form; 0x80 alone is BER's indefinite length, forbidden in DER
    let count = usize::from(n & !LENGTH_LONG_FORM);
    if count == 0 || count > size_of::<usize>() {
        return Err(failure(input, ErrorKind::LengthValue));
    }
    let (rest, bs) = nom::bytes::complete::take(count).parse(rest)?;
    if bs.first() == Some(&0) {
        return Err(failure(input, ErrorKind::LengthValue));
    }
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | usize::from(b));
    if length < usize::from(LENGTH_LONG_FORM) {
        return Err(failure(input, ErrorKind::LengthValue));
    }
    Ok((rest, length))
}

fn failure(input: &[u8], kind: ErrorKind) -> nom::Err<nom::error::Error<&[u8]>> {
    nom::Err::Failure(nom::error::Error::new(input, kind))
}

/// A sequence of top-level DER elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        if self.is_empty() {
            return Err(Error::Empty);
        }
        let mut input = *self;
        let mut elements = Vec::new();
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input, 0)?;
            input = rest;
            elements.push(tlv);
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Infallible;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            tlv.write_to(&mut out);
        }
        Ok(out)
    }
}
