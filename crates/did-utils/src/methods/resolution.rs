use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{didcore::Document as DIDDocument, ldmodel::Context, methods::errors::DIDResolutionError};

/// DID Resolution Options.
///
/// See `<https://www.w3.org/TR/did-core/#did-resolution-options>`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DIDResolutionOptions {
    // See https://www.w3.org/TR/did-spec-registries/#accept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<MediaType>,
    // Dynamic properties
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub additional_properties: Option<HashMap<String, Value>>,
}

/// DID Resolution Output.
///
/// See `<https://www.w3.org/TR/did-core/#did-resolution>`
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutput {
    #[serde(rename = "@context", default = "resolution_context")]
    pub context: Context,
    // See https://www.w3.org/TR/did-core/#dfn-diddocument
    pub did_document: Option<DIDDocument>,
    // See https://www.w3.org/TR/did-core/#dfn-didresolutionmetadata
    pub did_resolution_metadata: Option<DIDResolutionMetadata>,
    // See https://www.w3.org/TR/did-core/#dfn-diddocumentmetadata
    pub did_document_metadata: Option<DIDDocumentMetadata>,
}

fn resolution_context() -> Context {
    Context::SingleString(String::from("https://w3id.org/did-resolution/v1"))
}

impl ResolutionOutput {
    /// Wraps a successfully resolved document.
    pub fn from_document(diddoc: DIDDocument) -> Self {
        Self {
            context: resolution_context(),
            did_document: Some(diddoc),
            did_resolution_metadata: Some(DIDResolutionMetadata {
                error: None,
                content_type: Some(MediaType::DidLdJson.to_string()),
                additional_properties: None,
            }),
            did_document_metadata: None,
        }
    }

    /// Reports a failed resolution through the metadata.
    pub fn from_error(error: DIDResolutionError) -> Self {
        Self {
            context: resolution_context(),
            did_document: None,
            did_resolution_metadata: Some(DIDResolutionMetadata {
                error: Some(error),
                content_type: None,
                additional_properties: None,
            }),
            did_document_metadata: None,
        }
    }

    /// Collapses the output into the resolved document or the reported error.
    ///
    /// An output without error nor document is read as `notFound`.
    pub fn into_document(self) -> Result<DIDDocument, DIDResolutionError> {
        let error = self.did_resolution_metadata.and_then(|metadata| metadata.error);

        match (error, self.did_document) {
            (Some(err), _) => Err(err),
            (None, Some(diddoc)) => Ok(diddoc),
            (None, None) => Err(DIDResolutionError::NotFound),
        }
    }
}

/// DID Resolution Metadata.
///
/// See `<https://www.w3.org/TR/did-core/#did-resolution-metadata>`
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DIDResolutionMetadata {
    // See https://www.w3.org/TR/did-spec-registries/#error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DIDResolutionError>,
    // See https://www.w3.org/TR/did-spec-registries/#contenttype
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    // Dynamic properties
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub additional_properties: Option<HashMap<String, Value>>,
}

/// DID Document Metadata.
///
/// See `<https://www.w3.org/TR/did-core/#did-document-metadata>`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DIDDocumentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    // See https://www.w3.org/TR/did-spec-registries/#equivalentid
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equivalent_id: Vec<String>,
    // See https://www.w3.org/TR/did-spec-registries/#canonicalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<String>,
    // Method-specific properties
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub additional_properties: Option<HashMap<String, Value>>,
}

/// Media type for resolution input and output metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MediaType {
    Json,
    DidJson,
    DidLdJson,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Json => write!(f, "application/json"),
            MediaType::DidJson => write!(f, "application/did+json"),
            MediaType::DidLdJson => write!(f, "application/did+ld+json"),
        }
    }
}
