//! Encoder trait, the mirror image of [`crate::decoder::Decoder`].
//!
//! `Encoder<T, E>` is implemented on the source type `T` and produces the
//! encoded form `E`, which must opt in with `EncodableTo<T>`.

/// Converts `self` (of type `T`) into its encoded form `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    /// # Errors
    ///
    /// Returns an error if `self` cannot be represented as `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` is a valid encoding of `T`.
pub trait EncodableTo<T> {}
