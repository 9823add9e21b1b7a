use multibase::Base::Base58Btc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::Algorithm;

/// Representation of public keys in expanded DID documents.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum PublicKeyFormat {
    #[default]
    Multikey,
    Jwk,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Error)]
pub enum DecodeMultikeyError {
    #[error("error to multibase decode")]
    MultibaseDecodeError,
    #[error("not multibase-encoded in Base58")]
    NotBase58MultibaseEncoded,
    #[error("assumed multicodec too short")]
    MulticodecTooShort,
    #[error("unknown algorithm")]
    UnknownAlgorithm,
}

/// Decodes algorithm and key bytes from multibase-encode value
pub fn decode_multikey(multikey: &str) -> Result<(Algorithm, Vec<u8>), DecodeMultikeyError> {
    let (base, multicodec) = multibase::decode(multikey).map_err(|_| DecodeMultikeyError::MultibaseDecodeError)?;

    if base != Base58Btc {
        return Err(DecodeMultikeyError::NotBase58MultibaseEncoded);
    }

    if multicodec.len() < 2 {
        return Err(DecodeMultikeyError::MulticodecTooShort);
    }

    let multicodec_prefix = [multicodec[0], multicodec[1]];
    let alg = Algorithm::from_muticodec_prefix(&multicodec_prefix).ok_or(DecodeMultikeyError::UnknownAlgorithm)?;

    Ok((alg, multicodec[2..].to_vec()))
}
