//! PKCS#1 (RFC 8017) public key syntax.

mod types;

pub use types::RSAPublicKey;
