//! Decoder trait for type-safe conversions.
//!
//! `Decoder<T, D>` is implemented on the source type `T` and produces the
//! destination type `D`. `D` must opt in with `DecodableFrom<T>`.
//!
//! ```no_run
//! use rsapub::decoder::{DecodableFrom, Decoder};
//!
//! struct Encoded(Vec<u8>);
//! struct Length(usize);
//!
//! #[derive(Debug)]
//! struct Empty;
//!
//! impl DecodableFrom<Encoded> for Length {}
//!
//! impl Decoder<Encoded, Length> for Encoded {
//!     type Error = Empty;
//!
//!     fn decode(&self) -> Result<Length, Self::Error> {
//!         if self.0.is_empty() {
//!             return Err(Empty);
//!         }
//!         Ok(Length(self.0.len()))
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` can be decoded from `T`.
///
/// It has no methods. Implement it next to the matching `Decoder`
/// implementation to allow the conversion.
pub trait DecodableFrom<T> {}
