//! This module contains cryptographic utilities.
//!
//! Provides interfaces and implementations for cryptographic key management,
//! signing and verification. It supports [Ed25519] and [secp256k1] signatures
//! and [SHA-256] hashing.
//!
//! [Ed25519]: https://en.wikipedia.org/wiki/EdDSA
//! [secp256k1]: https://en.bitcoin.it/wiki/Secp256k1
//! [SHA-256]: https://en.wikipedia.org/wiki/SHA-2

use multibase::Base::Base64Url;

use crate::didcore::Jwk;

mod alg;
mod ed25519;
mod errors;
mod secp256k1;
mod sha256_hash;
mod traits;
mod utils;

pub use alg::Algorithm;
pub use ed25519::Ed25519KeyPair;
pub use errors::Error;
pub use secp256k1::Secp256k1KeyPair;
pub use sha256_hash::sha256_hash;
pub use traits::{CoreSign, Generate, KeyMaterial, ToMultikey, BYTES_LENGTH_32};

/// A wrapper struct for an asymmetric key pair.
/// This struct holds a public key and an optional secret key.
pub struct AsymmetricKey<P, S> {
    pub public_key: P,
    pub secret_key: Option<S>,
}

/// Verification key material extracted from a DID document.
#[derive(Debug)]
pub enum PublicKey {
    Ed25519(Ed25519KeyPair),
    Secp256k1(Secp256k1KeyPair),
}

impl PublicKey {
    /// Builds a public key from raw bytes tagged with their algorithm.
    pub fn from_raw(alg: Algorithm, bytes: &[u8]) -> Result<Self, Error> {
        match alg {
            Algorithm::Ed25519 => Ed25519KeyPair::from_public_key_slice(bytes).map(PublicKey::Ed25519),
            Algorithm::Secp256k1 => Secp256k1KeyPair::from_sec1_bytes(bytes).map(PublicKey::Secp256k1),
            _ => Err(Error::Unsupported),
        }
    }

    /// Returns the algorithm of the key.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            PublicKey::Ed25519(_) => Algorithm::Ed25519,
            PublicKey::Secp256k1(_) => Algorithm::Secp256k1,
        }
    }

    /// Verifies a signature over the payload.
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        match self {
            PublicKey::Ed25519(keypair) => keypair.verify(payload, signature),
            PublicKey::Secp256k1(keypair) => keypair.verify(payload, signature),
        }
    }

    /// Renders the public key as a JSON Web Key.
    pub fn to_jwk(&self) -> Result<Jwk, Error> {
        match self {
            PublicKey::Ed25519(keypair) => Algorithm::Ed25519.build_jwk(&keypair.public_key_bytes()?),
            PublicKey::Secp256k1(keypair) => Algorithm::Secp256k1.build_jwk(&keypair.public_key_sec1()),
        }
    }

    /// Renders the key pair as a private JSON Web Key, carrying `d`.
    pub fn to_secret_jwk(&self) -> Result<Jwk, Error> {
        let secret = match self {
            PublicKey::Ed25519(keypair) => keypair.private_key_bytes()?.to_vec(),
            PublicKey::Secp256k1(keypair) => keypair.secret_key_bytes()?,
        };

        Ok(Jwk {
            d: Some(Base64Url.encode(secret)),
            ..self.to_jwk()?
        })
    }

    /// Signs the payload. Only keys carrying their secret half can sign.
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        match self {
            PublicKey::Ed25519(keypair) => keypair.sign(payload),
            PublicKey::Secp256k1(keypair) => keypair.sign(payload),
        }
    }
}

impl CoreSign for PublicKey {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        PublicKey::sign(self, payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        PublicKey::verify(self, payload, signature)
    }
}
