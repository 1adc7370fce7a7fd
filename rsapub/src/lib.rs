//! # rsapub
//!
//! Core traits shared by the rsapub crates.
//!
//! Every layer of the toolkit converts its own type into the next one with
//! the `Decoder` and `Encoder` traits:
//!
//! ```text
//! PEM text → Pem → Vec<u8> → Der → ASN1Object → SubjectPublicKeyInfo → RSAPublicKey
//! ```
//!
//! Decoding walks the chain left to right, encoding walks it back.
//!
//! The marker traits `DecodableFrom` and `EncodableTo` restrict which pairs
//! of types may be converted, so an invalid conversion is a compile error
//! instead of a runtime one.
//!
//! ```ignore
//! use rsapub::decoder::Decoder;
//! use rsapub::encoder::Encoder;
//!
//! // bytes → DER
//! let der: der::Der = vec![0x05, 0x00].decode()?;
//! // DER → bytes
//! let bytes: Vec<u8> = der.encode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
