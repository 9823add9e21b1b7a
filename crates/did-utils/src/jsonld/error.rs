use thiserror::Error;

/// Errors raised while loading or processing JSON-LD contexts.
///
/// Variant names follow the error codes of the JSON-LD 1.1 processing algorithms.
#[derive(Debug, Error, PartialEq)]
pub enum JsonLdError {
    #[error("loading remote context failed: context not found: {0}")]
    ContextNotFound(String),
    #[error("invalid remote context: {0}")]
    InvalidRemoteContext(String),
    #[error("recursive context inclusion: {0}")]
    RecursiveContextInclusion(String),
    #[error("invalid local context")]
    InvalidLocalContext,
    #[error("invalid term definition: {0}")]
    InvalidTermDefinition(String),
    #[error("invalid vocab mapping")]
    InvalidVocabMapping,
    #[error("invalid context map: {0}")]
    InvalidContextMap(String),
}
