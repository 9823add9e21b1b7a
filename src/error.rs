use did_utils::jsonld::JsonLdError;
use thiserror::Error;

/// Terminal outcome of a failed domain linkage verification.
///
/// Transport, status and structural errors abort the verification as soon as
/// they occur. Problems with individual `linked_dids` entries are collected
/// and only surface through [`Error::NoLinkageFound`].
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("endpoint {url} returned status '{status}' and message '{body}'")]
    HttpStatus { url: String, status: u16, body: String },

    #[error("did configuration: {0}")]
    Structural(#[from] StructuralError),

    #[error(
        "no linked DID verifies {did} for {domain} among {candidates} candidate(s): {}",
        describe_last(.errors)
    )]
    NoLinkageFound {
        did: String,
        domain: String,
        candidates: usize,
        errors: Vec<CredentialError>,
    },
}

fn describe_last(errors: &[CredentialError]) -> String {
    errors
        .last()
        .map(ToString::to_string)
        .unwrap_or_else(|| String::from("linked_dids is empty"))
}

/// A failure below the HTTP layer: malformed URL, DNS, connection or timeout.
///
/// The message carries the whole chain of underlying causes.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError(message.into())
    }

    /// Renders an error along with its chain of sources.
    pub fn from_error(context: &str, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = format!("{context}: {err}");

        let mut source = err.source();
        while let Some(cause) = source {
            let rendered = cause.to_string();
            // hyper errors often repeat their source in their own message
            if !message.ends_with(&rendered) {
                message.push_str(": ");
                message.push_str(&rendered);
            }
            source = cause.source();
        }

        TransportError(message)
    }
}

/// The fetched document is not a usable DID configuration.
#[derive(Debug, Error, PartialEq)]
pub enum StructuralError {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("property '{0}' is required")]
    MissingProperty(&'static str),

    #[error("property '{0}' must be an array")]
    InvalidProperty(&'static str),

    #[error("unrecognized @context: {0}")]
    UnrecognizedContext(String),

    #[error("property '{0}' is not defined by the @context")]
    UndefinedProperty(String),

    #[error("JSON-LD processing failed: {0}")]
    JsonLd(#[from] JsonLdError),
}

/// Why a single `linked_dids` entry was rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CredentialError {
    #[error("entry {index}: malformed credential: {reason}")]
    Format { index: usize, reason: String },

    #[error("entry {index}: resolution failed: {reason}")]
    Resolution { index: usize, reason: String },

    #[error("entry {index}: signature verification failed: {reason}")]
    Signature { index: usize, reason: String },

    #[error("entry {index}: linkage mismatch: {reason}")]
    Mismatch { index: usize, reason: String },
}

impl CredentialError {
    /// Position of the rejected entry in `linked_dids`.
    pub fn index(&self) -> usize {
        match self {
            CredentialError::Format { index, .. }
            | CredentialError::Resolution { index, .. }
            | CredentialError::Signature { index, .. }
            | CredentialError::Mismatch { index, .. } => *index,
        }
    }
}
