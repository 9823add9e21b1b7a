//! Parsing of the DID configuration resource.

use did_utils::{
    jsonld::{self, is_absolute_iri, is_keyword, ContextLoader, StaticContextLoader},
    ldmodel::Context,
};
use serde_json::{Map, Value};

use crate::{contexts::is_domain_linkage_context, error::StructuralError};

/// IRIs the `linked_dids` term expands to under each domain linkage context.
const LINKED_DIDS_IRIS: [&str; 2] = [
    "https://identity.foundation/.well-known/contexts/did-configuration-v0.0#linked_dids",
    "https://identity.foundation/.well-known/resources/did-configuration/#linked_dids",
];

/// The content of a `.well-known/did-configuration.json` resource.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkageConfiguration {
    pub context: Context,
    pub linked_dids: Vec<RawCredential>,
}

/// One entry of `linked_dids`, as published.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCredential {
    /// A JWT-encoded credential.
    Compact(String),
    /// A credential secured with an embedded linked-data proof.
    LinkedData(Map<String, Value>),
    /// Anything else, kept so that it is reported with its position.
    Unsupported(Value),
}

impl From<Value> for RawCredential {
    fn from(value: Value) -> Self {
        match value {
            Value::String(token) => RawCredential::Compact(token),
            Value::Object(object) => RawCredential::LinkedData(object),
            other => RawCredential::Unsupported(other),
        }
    }
}

/// Parses a DID configuration.
///
/// The `@context` must be one of the domain linkage contexts and every other
/// top-level property must be defined by it. Contexts are resolved through
/// `loader`; without one, every remote context fails to load.
pub fn parse(bytes: &[u8], loader: Option<&dyn ContextLoader>) -> Result<LinkageConfiguration, StructuralError> {
    let document: Value = serde_json::from_slice(bytes).map_err(|err| StructuralError::InvalidJson(err.to_string()))?;
    let Value::Object(object) = &document else {
        return Err(StructuralError::InvalidJson(String::from("expected a JSON object")));
    };

    let raw_context = object.get("@context").ok_or(StructuralError::MissingProperty("@context"))?;
    let context: Context = serde_json::from_value(raw_context.clone())
        .map_err(|_| StructuralError::UnrecognizedContext(raw_context.to_string()))?;

    let empty = StaticContextLoader::new();
    let loader = loader.unwrap_or(&empty);

    let referenced = context.references().into_iter().any(is_domain_linkage_context);
    let expanded = match jsonld::expand_top_level_keys(&document, loader) {
        Ok(expanded) => expanded,
        Err(err) if referenced => return Err(err.into()),
        Err(_) => return Err(StructuralError::UnrecognizedContext(raw_context.to_string())),
    };

    let declares_linkage = referenced
        || expanded
            .iter()
            .any(|(_, iri)| iri.as_deref().is_some_and(|iri| LINKED_DIDS_IRIS.contains(&iri)));
    if !declares_linkage {
        return Err(StructuralError::UnrecognizedContext(raw_context.to_string()));
    }

    for (key, iri) in &expanded {
        let defined = iri.as_deref().is_some_and(|iri| is_keyword(iri) || is_absolute_iri(iri));
        if !defined {
            return Err(StructuralError::UndefinedProperty(key.clone()));
        }
    }

    let linked_dids = match object.get("linked_dids") {
        None => return Err(StructuralError::MissingProperty("linked_dids")),
        Some(Value::Array(entries)) => entries.iter().cloned().map(RawCredential::from).collect(),
        Some(_) => return Err(StructuralError::InvalidProperty("linked_dids")),
    };

    Ok(LinkageConfiguration { context, linked_dids })
}
