//! JSON-LD context handling for verifiable credentials.
//!
//! Context documents come from a pluggable [`ContextLoader`]. Expansion,
//! RDF conversion and URDNA2015 canonicalization are left to [`ssi`]:
//! [`document_loader`] hands it the contexts a document references.
//! [`TopLevelTerms`] covers the one thing done locally, telling which IRI
//! each top-level key of a document expands to.
//!
//! ```
//! use did_utils::jsonld::{self, StaticContextLoader};
//! use serde_json::json;
//!
//! let loader = StaticContextLoader::new().with_context(
//!     "https://example.com/profile/v1",
//!     json!({ "@context": { "name": "https://schema.org/name" } }),
//! );
//! let document = json!({
//!     "@context": "https://example.com/profile/v1",
//!     "name": "Alice",
//!     "nickname": "Al"
//! });
//!
//! let keys = jsonld::expand_top_level_keys(&document, &loader).unwrap();
//! assert!(keys.contains(&(String::from("name"), Some(String::from("https://schema.org/name")))));
//! assert!(keys.contains(&(String::from("nickname"), None)));
//! ```

mod error;
mod loader;
mod terms;

use std::collections::HashMap;

use serde_json::Value;

pub use error::JsonLdError;
pub use loader::{ContextLoader, StaticContextLoader};
pub use terms::{is_absolute_iri, is_keyword, TopLevelTerms};

/// Expands the top-level keys of a JSON object against its own `@context`.
///
/// Every key other than `@context` is returned with its expanded IRI, or `None`
/// when the active context maps it to null or leaves it undefined. Non-object documents yield no keys.
pub fn expand_top_level_keys(document: &Value, loader: &dyn ContextLoader) -> Result<Vec<(String, Option<String>)>, JsonLdError> {
    let Value::Object(object) = document else {
        return Ok(Vec::new());
    };

    let terms = match object.get("@context") {
        Some(local) => TopLevelTerms::from_context(local, loader)?,
        None => TopLevelTerms::default(),
    };

    Ok(object
        .keys()
        .filter(|key| key.as_str() != "@context")
        .map(|key| (key.clone(), terms.expand(key)))
        .collect())
}

/// Builds the `ssi` context loader used to process `document`.
///
/// Every remote context the document references, directly or through the
/// contexts it loads, is looked up in `loader` and seeded into the result.
/// Contexts `loader` does not know are left to the ones `ssi` bundles, such as
/// the credentials and security vocabularies.
pub fn document_loader(document: &Value, loader: &dyn ContextLoader) -> Result<ssi::jsonld::ContextLoader, JsonLdError> {
    let mut pending = Vec::new();
    collect_context_urls(document, &mut pending);

    let mut seen: Vec<String> = Vec::new();
    let mut context_map = HashMap::new();
    while let Some(url) = pending.pop() {
        if seen.contains(&url) {
            continue;
        }
        seen.push(url.clone());

        match loader.load_context(&url) {
            Ok(loaded) => {
                collect_context_urls(&loaded, &mut pending);
                context_map.insert(url, loaded.to_string());
            }
            Err(JsonLdError::ContextNotFound(_)) => {}
            Err(err) => return Err(err),
        }
    }

    ssi::jsonld::ContextLoader::default()
        .with_context_map_from(context_map)
        .map_err(|err| JsonLdError::InvalidContextMap(format!("{err:?}")))
}

// Gathers the URLs of every `@context` entry found in the value.
fn collect_context_urls(value: &Value, urls: &mut Vec<String>) {
    match value {
        Value::Object(object) => {
            for (key, entry) in object {
                if key == "@context" {
                    let references: Vec<&Value> = match entry {
                        Value::Array(items) => items.iter().collect(),
                        other => vec![other],
                    };
                    urls.extend(references.into_iter().filter_map(Value::as_str).map(str::to_string));
                }
                collect_context_urls(entry, urls);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_context_urls(item, urls)),
        _ => {}
    }
}
