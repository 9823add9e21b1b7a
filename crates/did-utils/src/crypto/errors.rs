use thiserror::Error;

/// The set of errors that can occur during key operations.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("can not compute public key")]
    CanNotComputePublicKey,
    #[error("can not retrieve signature")]
    CanNotRetrieveSignature,
    #[error("invalid curve")]
    InvalidCurve,
    #[error("invalid key length")]
    InvalidKeyLength,
    #[error("invalid secret key")]
    InvalidSecretKey,
    #[error("invalid seed")]
    InvalidSeed,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("error while signing")]
    SignatureError,
    #[error("signature verification failed")]
    VerificationError,
    #[error("invalid proof")]
    InvalidProof,
    #[error("invalid call: {0}")]
    InvalidCall(String),
    #[error("unsupported algorithm")]
    Unsupported,
    #[error("{0}")]
    Unknown(String),
}
