use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use multibase::Base::Base58Btc;

use super::{
    alg::Algorithm,
    errors::Error,
    traits::{CoreSign, Generate, KeyMaterial, ToMultikey, BYTES_LENGTH_32},
    utils::generate_seed,
    AsymmetricKey,
};

/// A wrapper struct for an Ed25519 asymmetric key pair.
pub type Ed25519KeyPair = AsymmetricKey<VerifyingKey, SigningKey>;

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self.public_key))
    }
}

impl KeyMaterial for Ed25519KeyPair {
    fn public_key_bytes(&self) -> Result<[u8; BYTES_LENGTH_32], Error> {
        Ok(self.public_key.to_bytes())
    }

    fn private_key_bytes(&self) -> Result<[u8; BYTES_LENGTH_32], Error> {
        match &self.secret_key {
            Some(sk) => Ok(sk.to_bytes()),
            None => Err(Error::InvalidSecretKey),
        }
    }
}

impl Generate for Ed25519KeyPair {
    fn new() -> Result<Ed25519KeyPair, Error> {
        Self::new_with_seed(&[])
    }

    fn new_with_seed(seed: &[u8]) -> Result<Ed25519KeyPair, Error> {
        let secret_seed = generate_seed(seed)?;
        let sk = SigningKey::from_bytes(&secret_seed);

        Ok(Ed25519KeyPair {
            public_key: sk.verifying_key(),
            secret_key: Some(sk),
        })
    }

    fn from_public_key(public_key: &[u8; BYTES_LENGTH_32]) -> Result<Ed25519KeyPair, Error> {
        let vk = VerifyingKey::from_bytes(public_key).map_err(|_| Error::InvalidPublicKey)?;

        Ok(Ed25519KeyPair {
            public_key: vk,
            secret_key: None,
        })
    }

    fn from_secret_key(secret_key: &[u8; BYTES_LENGTH_32]) -> Result<Ed25519KeyPair, Error> {
        let sk = SigningKey::from_bytes(secret_key);

        Ok(Ed25519KeyPair {
            public_key: sk.verifying_key(),
            secret_key: Some(sk),
        })
    }
}

impl Ed25519KeyPair {
    /// Builds a verification-only key pair from raw public key bytes of any slice length.
    pub fn from_public_key_slice(public_key: &[u8]) -> Result<Ed25519KeyPair, Error> {
        let bytes: &[u8; BYTES_LENGTH_32] = public_key.try_into().map_err(|_| Error::InvalidKeyLength)?;
        Self::from_public_key(bytes)
    }
}

impl CoreSign for Ed25519KeyPair {
    /// Signs the given payload and returns the signature.
    ///
    /// # Example
    ///
    /// ```
    /// use did_utils::crypto::{CoreSign, Ed25519KeyPair, Generate};
    ///
    /// # fn example() -> Result<(), did_utils::crypto::Error> {
    /// let kp = Ed25519KeyPair::new()?;
    /// let signature = kp.sign(b"Hello, World!")?;
    /// # Ok(())
    /// # }
    /// ```
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => sk
                .try_sign(payload)
                .map(|signature| signature.to_bytes().to_vec())
                .map_err(|_| Error::SignatureError),
            None => Err(Error::InvalidSecretKey),
        }
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        // The signature arrives as raw bytes
        let sig = Signature::try_from(signature).map_err(|_| Error::CanNotRetrieveSignature)?;

        self.public_key.verify(payload, &sig).map_err(|_| Error::VerificationError)
    }
}

impl ToMultikey for Ed25519KeyPair {
    fn to_multikey(&self) -> String {
        let prefix = &Algorithm::Ed25519.muticodec_prefix();
        let bytes = &self.public_key.as_bytes()[..];
        multibase::encode(Base58Btc, [prefix, bytes].concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Generate a new Ed25519KeyPair with a seed and check that bytes of both private and public key
    // are equals to the given bytes pub_key_hex and pri_key_hex.
    #[test]
    fn test_new_with_seed() {
        // Beware that you need a seed of 32 bytes to produce the deterministic key pair.
        let seed = "Sample seed bytes of thirtytwo!b".as_bytes();
        let keypair = Ed25519KeyPair::new_with_seed(seed).unwrap();
        let pub_key_hex = hex::encode(keypair.public_key_bytes().unwrap());
        let pri_key_hex = hex::encode(keypair.private_key_bytes().unwrap());
        assert_eq!(pub_key_hex, "412328b0201b71d0144a27d028057b6fdf58d22e0f3baaebaa5388140e57bbbd");
        assert_eq!(pri_key_hex, "53616d706c652073656564206279746573206f662074686972747974776f2162");
    }

    #[test]
    fn test_sign_verify() {
        let keypair = Ed25519KeyPair::new().unwrap();
        let payload = br#"{"origin":"https://identity.foundation"}"#;

        let signature = keypair.sign(payload).unwrap();
        assert!(keypair.verify(payload, &signature).is_ok());

        let verifier = Ed25519KeyPair::from_public_key(&keypair.public_key_bytes().unwrap()).unwrap();
        assert!(verifier.verify(payload, &signature).is_ok());
        assert_eq!(verifier.verify(b"tampered", &signature).unwrap_err(), Error::VerificationError);
        assert_eq!(verifier.sign(payload).unwrap_err(), Error::InvalidSecretKey);
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let keypair = Ed25519KeyPair::new().unwrap();
        assert_eq!(keypair.verify(b"payload", &[0u8; 12]).unwrap_err(), Error::CanNotRetrieveSignature);
    }

    #[test]
    fn test_ed25519_keypair_to_multikey() {
        let bytes = hex::decode("3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29").unwrap();
        let keypair = Ed25519KeyPair::from_public_key_slice(&bytes).unwrap();

        assert_eq!(&keypair.to_multikey(), "z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp");
        assert_eq!(
            Ed25519KeyPair::from_public_key_slice(&bytes[..31]).unwrap_err(),
            Error::InvalidKeyLength
        );
    }
}
