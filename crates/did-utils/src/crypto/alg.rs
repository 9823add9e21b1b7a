use multibase::Base::Base64Url;
use num_bigint::{BigInt, Sign};

use super::errors::Error as CryptoError;
use crate::didcore::Jwk;

/// Supported cryptographic algorithms.
#[derive(Debug, Copy, Clone, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Algorithm {
    Ed25519,
    X25519,
    Secp256k1,
    BLS12381,
    RSA,
}

use Algorithm::*;

// See:
// - https://w3c-ccg.github.io/did-method-key/#signature-method-creation-algorithm
// - https://w3c-ccg.github.io/did-method-key/#encryption-method-creation-algorithm
impl Algorithm {
    /// Returns the multicodec prefix associated with the algorithm.
    pub fn muticodec_prefix(&self) -> [u8; 2] {
        match self {
            Ed25519 => [0xed, 0x01],
            X25519 => [0xec, 0x01],
            Secp256k1 => [0xe7, 0x01],
            BLS12381 => [0xeb, 0x01],
            RSA => [0x85, 0x24],
        }
    }

    /// Creates an `Algorithm` enum variant from the given multicodec prefix.
    pub fn from_muticodec_prefix(prefix: &[u8; 2]) -> Option<Self> {
        match prefix {
            [0xed, 0x01] => Some(Ed25519),
            [0xec, 0x01] => Some(X25519),
            [0xe7, 0x01] => Some(Secp256k1),
            [0xeb, 0x01] => Some(BLS12381),
            [0x85, 0x24] => Some(RSA),
            _ => None,
        }
    }

    /// Returns the length of the public key for the algorithm, if known.
    pub fn public_key_length(&self) -> Option<usize> {
        match self {
            Ed25519 => Some(32),
            X25519 => Some(32),
            Secp256k1 => Some(33),
            BLS12381 => None,
            RSA => None,
        }
    }

    /// Builds a JSON Web Key from raw public key bytes.
    pub fn build_jwk(&self, raw_public_key_bytes: &[u8]) -> Result<Jwk, CryptoError> {
        match self {
            Ed25519 | X25519 => Ok(Jwk {
                key_id: None,
                key_type: String::from("OKP"),
                curve: String::from(if *self == Ed25519 { "Ed25519" } else { "X25519" }),
                x: Some(Base64Url.encode(raw_public_key_bytes)),
                y: None,
                d: None,
            }),
            Secp256k1 => {
                let uncompressed = self.uncompress_public_key(raw_public_key_bytes)?;
                Ok(Jwk {
                    key_id: None,
                    key_type: String::from("EC"),
                    curve: String::from("secp256k1"),
                    x: Some(Base64Url.encode(&uncompressed[1..33])),
                    y: Some(Base64Url.encode(&uncompressed[33..])),
                    d: None,
                })
            }
            _ => Err(CryptoError::Unsupported),
        }
    }

    /// Uncompresses a SEC1 compressed public key into its `0x04 || x || y` form.
    pub fn uncompress_public_key(&self, compressed_key_bytes: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if let Some(required_length) = self.public_key_length() {
            if required_length != compressed_key_bytes.len() {
                return Err(CryptoError::InvalidKeyLength);
            }
        }

        if *self != Secp256k1 {
            return Err(CryptoError::Unsupported);
        }

        let sign = match compressed_key_bytes[0] {
            0x02 => 0u8,
            0x03 => 1u8,
            _ => return Err(CryptoError::InvalidPublicKey),
        };

        // y^2 = x^3 + 7 over the secp256k1 field
        let p = hex_int("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")?;
        let x = BigInt::from_bytes_be(Sign::Plus, &compressed_key_bytes[1..]);
        let y_sq = (x.modpow(&BigInt::from(3u32), &p) + BigInt::from(7)) % &p;
        let mut y = y_sq.modpow(&((&p + BigInt::from(1)) / BigInt::from(4)), &p);

        if &y % BigInt::from(2) != BigInt::from(sign) {
            y = &p - &y;
        }

        let mut z = vec![0x04];
        z.append(&mut left_pad(x.to_bytes_be().1));
        z.append(&mut left_pad(y.to_bytes_be().1));

        Ok(z)
    }
}

fn hex_int(value: &str) -> Result<BigInt, CryptoError> {
    BigInt::parse_bytes(value.as_bytes(), 16).ok_or_else(|| CryptoError::Unknown(format!("invalid curve constant {value}")))
}

// Coordinates are fixed-width 32-byte big-endian integers.
fn left_pad(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.len() >= 32 {
        return bytes;
    }

    let mut padded = vec![0u8; 32 - bytes.len()];
    padded.extend(bytes);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_can_build_secp256k1_jwk() {
        let (alg, bytes) = decode_multibase_key("zQ3shokFTS3brHcDQrn82RUDfCZESWL1ZdCEJwekUDPQiYBme");
        assert_eq!(alg, Secp256k1);

        let uncompressed = alg.uncompress_public_key(&bytes).unwrap();
        assert_eq!(uncompressed.len(), 65);

        let jwk = alg.build_jwk(&bytes).unwrap();
        let expected: Value = serde_json::from_str(
            r#"{
                "kty": "EC",
                "crv": "secp256k1",
                "x": "h0wVx_2iDlOcblulc8E5iEw1EYh5n1RYtLQfeSTyNc0",
                "y": "O2EATIGbu6DezKFptj5scAIRntgfecanVNXxat1rnwE"
            }"#,
        )
        .unwrap();

        assert_eq!(json_canon::to_string(&jwk).unwrap(), json_canon::to_string(&expected).unwrap())
    }

    #[test]
    fn test_cannot_build_unsupported_jwk() {
        assert_eq!(BLS12381.build_jwk(&[0x17; 96]).unwrap_err(), CryptoError::Unsupported);
        assert_eq!(RSA.uncompress_public_key(&[0x02; 33]).unwrap_err(), CryptoError::Unsupported);
    }

    #[test]
    fn test_nist_curves_are_not_recognized() {
        // P-256 and P-384 multicodec prefixes
        assert_eq!(Algorithm::from_muticodec_prefix(&[0x80, 0x24]), None);
        assert_eq!(Algorithm::from_muticodec_prefix(&[0x81, 0x24]), None);
    }

    #[test]
    fn test_key_decompression_failures() {
        let bytes = hex::decode("023d4de48a477e309548a0ed8ceee086d1aaeceb11f0a8e3a0ffb3e5f44602de1800").unwrap();
        assert_eq!(Secp256k1.uncompress_public_key(&bytes).unwrap_err(), CryptoError::InvalidKeyLength);

        let bytes = hex::decode("113d4de48a477e309548a0ed8ceee086d1aaeceb11f0a8e3a0ffb3e5f44602de18").unwrap();
        assert_eq!(Secp256k1.uncompress_public_key(&bytes).unwrap_err(), CryptoError::InvalidPublicKey);
    }

    fn decode_multibase_key(key: &str) -> (Algorithm, Vec<u8>) {
        let (_, multicodec) = multibase::decode(key).unwrap();

        let prefix: &[u8; 2] = &multicodec[..2].try_into().unwrap();
        let bytes = &multicodec[2..];

        (Algorithm::from_muticodec_prefix(prefix).unwrap(), bytes.to_vec())
    }
}
