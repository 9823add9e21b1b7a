use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};

use super::{errors::Error, traits::CoreSign, AsymmetricKey};

/// A wrapper struct for a secp256k1 asymmetric key pair.
///
/// Signatures are ECDSA over SHA-256, serialized as 64 bytes `r || s`.
pub type Secp256k1KeyPair = AsymmetricKey<VerifyingKey, SigningKey>;

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self.public_key))
    }
}

impl Secp256k1KeyPair {
    /// Builds a verification-only key pair from a SEC1 encoded point,
    /// either compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Secp256k1KeyPair, Error> {
        let vk = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| Error::InvalidPublicKey)?;

        Ok(Secp256k1KeyPair {
            public_key: vk,
            secret_key: None,
        })
    }

    /// Builds a verification-only key pair from affine coordinates.
    pub fn from_coordinates(x: &[u8], y: &[u8]) -> Result<Secp256k1KeyPair, Error> {
        if x.len() != 32 || y.len() != 32 {
            return Err(Error::InvalidKeyLength);
        }

        Self::from_sec1_bytes(&[&[0x04], x, y].concat())
    }

    /// Builds a key pair from a 32-byte secret scalar.
    pub fn from_secret_key(secret_key: &[u8]) -> Result<Secp256k1KeyPair, Error> {
        let sk = SigningKey::from_slice(secret_key).map_err(|_| Error::InvalidSecretKey)?;

        Ok(Secp256k1KeyPair {
            public_key: *sk.verifying_key(),
            secret_key: Some(sk),
        })
    }

    /// Returns the compressed SEC1 encoding of the public key.
    pub fn public_key_sec1(&self) -> Vec<u8> {
        self.public_key.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Returns the 32-byte scalar of the secret key.
    pub fn secret_key_bytes(&self) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => Ok(sk.to_bytes().to_vec()),
            None => Err(Error::InvalidSecretKey),
        }
    }
}

impl CoreSign for Secp256k1KeyPair {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => {
                let signature: Signature = sk.try_sign(payload).map_err(|_| Error::SignatureError)?;
                Ok(signature.to_bytes().to_vec())
            }
            None => Err(Error::InvalidSecretKey),
        }
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        let sig = Signature::from_slice(signature).map_err(|_| Error::CanNotRetrieveSignature)?;

        // Issuers in the wild produce high-S signatures, which k256 rejects as malleable.
        let sig = sig.normalize_s().unwrap_or(sig);

        self.public_key.verify(payload, &sig).map_err(|_| Error::VerificationError)
    }
}
