use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry for [error] types found across the DID core specification,
/// and especially during the DID resolution process.
///
/// [error]: https://www.w3.org/TR/did-spec-registries/#error
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Error)]
#[serde(rename_all = "camelCase")]
pub enum DIDResolutionError {
    #[error("invalidDid")]
    InvalidDid,
    #[error("invalidDidUrl")]
    InvalidDidUrl,
    #[error("notFound")]
    NotFound,
    #[error("representationNotSupported")]
    RepresentationNotSupported,
    #[error("methodNotSupported")]
    MethodNotSupported,
    #[error("internalError")]
    InternalError,
    #[error("invalidPublicKey")]
    InvalidPublicKey,
    #[error("invalidPublicKeyLength")]
    InvalidPublicKeyLength,
    #[error("unsupportedPublicKeyType")]
    UnsupportedPublicKeyType,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DidWebError {
    #[error("Invalid DID: {0}")]
    InvalidDid(String),
    #[error("Representation not supported: {0}")]
    RepresentationNotSupported(String),
    #[error("Parsing error: {0}")]
    ParsingError(#[from] ParsingErrorSource),
    #[error("HTTP client error: {0}")]
    ClientError(#[from] hyper_util::client::legacy::Error),
    #[error("HTTP body error: {0}")]
    BodyError(#[from] hyper::Error),
    #[error("Non-success server response: {0}")]
    NonSuccessResponse(StatusCode),
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpBindingError {
    #[error("Invalid resolver URL: {0}")]
    InvalidUrl(#[from] hyper::http::uri::InvalidUri),
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] hyper::http::Error),
    #[error("HTTP client error: {0}")]
    ClientError(#[from] hyper_util::client::legacy::Error),
    #[error("HTTP body error: {0}")]
    BodyError(#[from] hyper::Error),
    #[error("Non-success server response: {0}")]
    NonSuccessResponse(StatusCode),
    #[error("Parsing error: {0}")]
    ParsingError(#[from] ParsingErrorSource),
    #[error("Resolver reported error: {0}")]
    Reported(DIDResolutionError),
}

#[derive(Error, Debug)]
pub enum ParsingErrorSource {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid encoding: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}

impl From<serde_json::Error> for DidWebError {
    fn from(error: serde_json::Error) -> Self {
        DidWebError::ParsingError(ParsingErrorSource::JsonError(error))
    }
}

impl From<serde_json::Error> for HttpBindingError {
    fn from(error: serde_json::Error) -> Self {
        HttpBindingError::ParsingError(ParsingErrorSource::JsonError(error))
    }
}

impl From<DidWebError> for DIDResolutionError {
    fn from(error: DidWebError) -> Self {
        match error {
            DidWebError::InvalidDid(_) => DIDResolutionError::InvalidDid,
            DidWebError::NonSuccessResponse(status) if status == StatusCode::NOT_FOUND => DIDResolutionError::NotFound,
            DidWebError::RepresentationNotSupported(_) | DidWebError::ParsingError(_) => DIDResolutionError::RepresentationNotSupported,
            _ => DIDResolutionError::InternalError,
        }
    }
}

impl From<HttpBindingError> for DIDResolutionError {
    fn from(error: HttpBindingError) -> Self {
        match error {
            HttpBindingError::Reported(err) => err,
            HttpBindingError::NonSuccessResponse(status) if status == StatusCode::NOT_FOUND => DIDResolutionError::NotFound,
            HttpBindingError::ParsingError(_) => DIDResolutionError::RepresentationNotSupported,
            _ => DIDResolutionError::InternalError,
        }
    }
}
