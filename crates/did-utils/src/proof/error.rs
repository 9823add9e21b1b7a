use thiserror::Error;

use crate::{crypto::Error as CryptoError, jsonld::JsonLdError, jws::JwsError};

/// Errors raised while creating or verifying proofs.
#[derive(Debug, Error, PartialEq)]
pub enum ProofError {
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),
    #[error("missing proof value")]
    MissingProofValue,
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    #[error("context loading failed: {0}")]
    JsonLd(#[from] JsonLdError),
    #[error("proof rejected: {0}")]
    Rejected(String),
    #[error("proof creation failed: {0}")]
    Signing(String),
    #[error("jws: {0}")]
    Jws(#[from] JwsError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ProofError {
    /// Tells whether the proof was well formed but its signature did not check out.
    pub fn is_signature_failure(&self) -> bool {
        matches!(
            self,
            ProofError::Rejected(_)
                | ProofError::Jws(JwsError::InvalidSignature)
                | ProofError::Jws(JwsError::KeyMismatch(_))
                | ProofError::Crypto(CryptoError::VerificationError)
        )
    }
}
