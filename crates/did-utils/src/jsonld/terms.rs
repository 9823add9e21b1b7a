use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{error::JsonLdError, loader::ContextLoader};

const KEYWORDS: &[&str] = &[
    "@base",
    "@container",
    "@context",
    "@direction",
    "@graph",
    "@id",
    "@import",
    "@included",
    "@index",
    "@json",
    "@language",
    "@list",
    "@nest",
    "@none",
    "@prefix",
    "@propagate",
    "@protected",
    "@reverse",
    "@set",
    "@type",
    "@value",
    "@version",
    "@vocab",
];

/// Tells whether the value is a JSON-LD keyword.
pub fn is_keyword(value: &str) -> bool {
    KEYWORDS.contains(&value)
}

/// Tells whether the value is an absolute IRI, i.e. starts with a scheme.
pub fn is_absolute_iri(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// The term definitions a context establishes for the node it is attached to.
///
/// Only the IRI mapping of each term is kept. Scoped contexts, containers and
/// type coercions do not affect how the keys of that node expand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopLevelTerms {
    /// Expanded IRI of each term. `None` for terms mapped to null.
    terms: HashMap<String, Option<String>>,
    vocab: Option<String>,
}

impl TopLevelTerms {
    /// Processes a local context: a URL, an inline object, `null` or an array of those.
    pub fn from_context(context: &Value, loader: &dyn ContextLoader) -> Result<Self, JsonLdError> {
        let mut terms = Self::default();
        terms.process(context, loader, &mut Vec::new())?;
        Ok(terms)
    }

    fn process(&mut self, context: &Value, loader: &dyn ContextLoader, remote: &mut Vec<String>) -> Result<(), JsonLdError> {
        let items: Vec<&Value> = match context {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for item in items {
            match item {
                Value::Null => *self = Self::default(),
                Value::String(url) => {
                    if remote.contains(url) {
                        return Err(JsonLdError::RecursiveContextInclusion(url.clone()));
                    }

                    let document = loader.load_context(url)?;
                    let loaded = document
                        .get("@context")
                        .ok_or_else(|| JsonLdError::InvalidRemoteContext(url.clone()))?;

                    remote.push(url.clone());
                    self.process(loaded, loader, remote)?;
                    remote.pop();
                }
                Value::Object(definitions) => self.define(definitions)?,
                _ => return Err(JsonLdError::InvalidLocalContext),
            }
        }

        Ok(())
    }

    fn define(&mut self, definitions: &Map<String, Value>) -> Result<(), JsonLdError> {
        if let Some(vocab) = definitions.get("@vocab") {
            self.vocab = match vocab {
                Value::Null => None,
                Value::String(value) => Some(
                    self.expand_with(value, &HashMap::new(), &mut Vec::new())
                        .filter(|iri| is_absolute_iri(iri))
                        .ok_or(JsonLdError::InvalidVocabMapping)?,
                ),
                _ => return Err(JsonLdError::InvalidVocabMapping),
            };
        }

        let mut local = HashMap::new();
        for (term, definition) in definitions.iter().filter(|(term, _)| !term.starts_with('@')) {
            let id = match definition {
                Value::Null => None,
                Value::String(id) => Some(id.clone()),
                Value::Object(entries) => match entries.get("@id").or_else(|| entries.get("@reverse")) {
                    Some(Value::String(id)) => Some(id.clone()),
                    Some(Value::Null) => None,
                    None => Some(term.clone()),
                    Some(_) => return Err(JsonLdError::InvalidTermDefinition(term.clone())),
                },
                _ => return Err(JsonLdError::InvalidTermDefinition(term.clone())),
            };
            local.insert(term.as_str(), id);
        }

        let expanded: Vec<(String, Option<String>)> = local
            .iter()
            .map(|(term, id)| {
                let iri = id.as_deref().and_then(|id| {
                    // A term defined as itself can only expand through a prefix or @vocab
                    if id == *term {
                        self.expand_compact(id, &local, &mut vec![id.to_string()])
                    } else {
                        self.expand_with(id, &local, &mut vec![term.to_string()])
                    }
                });
                (term.to_string(), iri)
            })
            .collect();

        self.terms.extend(expanded);
        Ok(())
    }

    /// Expands a key of the node this context applies to.
    ///
    /// Returns `None` when the key is mapped to null or does not expand.
    pub fn expand(&self, key: &str) -> Option<String> {
        self.expand_with(key, &HashMap::new(), &mut Vec::new())
    }

    // Expands a value against the terms being defined, then the established ones.
    fn expand_with(&self, value: &str, local: &HashMap<&str, Option<String>>, seen: &mut Vec<String>) -> Option<String> {
        if is_keyword(value) {
            return Some(value.to_string());
        }

        if let Some(id) = local.get(value) {
            if seen.iter().any(|term| term == value) {
                return None;
            }
            seen.push(value.to_string());
            return id.as_deref().and_then(|id| self.expand_with(id, local, seen));
        }

        if let Some(iri) = self.terms.get(value) {
            return iri.clone();
        }

        self.expand_compact(value, local, seen)
    }

    // Compact IRIs, absolute IRIs and terms left to @vocab.
    fn expand_compact(&self, value: &str, local: &HashMap<&str, Option<String>>, seen: &mut Vec<String>) -> Option<String> {
        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }

            let defined = local.contains_key(prefix) || self.terms.contains_key(prefix);
            if defined && !seen.iter().any(|term| term == prefix) {
                if let Some(base) = self.expand_with(prefix, local, seen) {
                    return Some(format!("{base}{suffix}"));
                }
            }

            return Some(value.to_string());
        }

        self.vocab.as_ref().map(|vocab| format!("{vocab}{value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::StaticContextLoader;
    use serde_json::json;

    const V0: &str = "https://identity.foundation/.well-known/contexts/did-configuration-v0.0.jsonld";

    fn loader() -> StaticContextLoader {
        StaticContextLoader::new()
            .with_context(
                V0,
                json!({
                    "@context": [{
                        "@version": 1.1,
                        "didcfg": "https://identity.foundation/.well-known/contexts/did-configuration-v0.0#",
                        "linked_dids": "didcfg:linked_dids"
                    }]
                }),
            )
            .with_context("https://example.com/loop", json!({ "@context": "https://example.com/loop" }))
            .with_context("https://example.com/bare", json!({ "name": "https://schema.org/name" }))
    }

    #[test]
    fn test_prefixed_terms_expand() {
        let terms = TopLevelTerms::from_context(&json!(V0), &loader()).unwrap();

        assert_eq!(
            terms.expand("linked_dids").as_deref(),
            Some("https://identity.foundation/.well-known/contexts/did-configuration-v0.0#linked_dids")
        );
        assert_eq!(
            terms.expand("didcfg:origin").as_deref(),
            Some("https://identity.foundation/.well-known/contexts/did-configuration-v0.0#origin")
        );
        assert_eq!(terms.expand("@context").as_deref(), Some("@context"));
        assert_eq!(terms.expand("publisher"), None);
    }

    #[test]
    fn test_inline_definitions_and_vocab() {
        let context = json!([
            V0,
            {
                "@vocab": "https://example.com/vocab#",
                "hidden": null,
                "homepage": { "@id": "https://schema.org/url", "@type": "@id" },
                "didcfg:vc": "https://example.com/vc"
            }
        ]);
        let terms = TopLevelTerms::from_context(&context, &loader()).unwrap();

        assert_eq!(terms.expand("homepage").as_deref(), Some("https://schema.org/url"));
        assert_eq!(terms.expand("publisher").as_deref(), Some("https://example.com/vocab#publisher"));
        assert_eq!(terms.expand("hidden"), None);
        assert_eq!(terms.expand("https://schema.org/name").as_deref(), Some("https://schema.org/name"));
    }

    #[test]
    fn test_null_resets_the_context() {
        let terms = TopLevelTerms::from_context(&json!([V0, null]), &loader()).unwrap();
        assert_eq!(terms.expand("linked_dids"), None);
    }

    #[test]
    fn test_cyclic_terms_do_not_expand() {
        let terms = TopLevelTerms::from_context(&json!({ "a": "b", "b": "a" }), &loader()).unwrap();
        assert_eq!(terms.expand("a"), None);
    }

    #[test]
    fn test_context_processing_failures() {
        let loader = loader();

        assert_eq!(
            TopLevelTerms::from_context(&json!("https://example.com/unknown"), &loader).unwrap_err(),
            JsonLdError::ContextNotFound(String::from("https://example.com/unknown"))
        );
        assert_eq!(
            TopLevelTerms::from_context(&json!("https://example.com/loop"), &loader).unwrap_err(),
            JsonLdError::RecursiveContextInclusion(String::from("https://example.com/loop"))
        );
        assert_eq!(
            TopLevelTerms::from_context(&json!("https://example.com/bare"), &loader).unwrap_err(),
            JsonLdError::InvalidRemoteContext(String::from("https://example.com/bare"))
        );
        assert_eq!(
            TopLevelTerms::from_context(&json!(42), &loader).unwrap_err(),
            JsonLdError::InvalidLocalContext
        );
        assert_eq!(
            TopLevelTerms::from_context(&json!({ "name": 42 }), &loader).unwrap_err(),
            JsonLdError::InvalidTermDefinition(String::from("name"))
        );
    }

    #[test]
    fn test_absolute_iris() {
        assert!(is_absolute_iri("https://example.com"));
        assert!(is_absolute_iri("did:key:z6Mk"));
        assert!(!is_absolute_iri("linked_dids"));
        assert!(!is_absolute_iri("1x:y"));
    }
}
