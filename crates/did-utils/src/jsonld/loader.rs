use std::collections::HashMap;

use serde_json::Value;

use super::error::JsonLdError;

/// Supplies remote JSON-LD context documents.
///
/// Implementations must be safe to share between concurrent processing calls.
pub trait ContextLoader: Send + Sync {
    /// Returns the JSON document published at `url`.
    ///
    /// The document is expected to carry its definitions under an `@context` entry.
    fn load_context(&self, url: &str) -> Result<Value, JsonLdError>;
}

/// A context loader backed by a fixed set of pre-seeded documents.
#[derive(Debug, Clone, Default)]
pub struct StaticContextLoader {
    documents: HashMap<String, Value>,
}

impl StaticContextLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the loader with the document served at `url`.
    pub fn with_context(mut self, url: &str, document: Value) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    /// Seeds the loader with a document given in its serialized form.
    pub fn with_context_str(self, url: &str, document: &str) -> Result<Self, JsonLdError> {
        let document = serde_json::from_str(document).map_err(|_| JsonLdError::InvalidRemoteContext(url.to_string()))?;
        Ok(self.with_context(url, document))
    }

    /// Lists the URLs this loader can serve.
    pub fn urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }
}

impl ContextLoader for StaticContextLoader {
    fn load_context(&self, url: &str) -> Result<Value, JsonLdError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| JsonLdError::ContextNotFound(url.to_string()))
    }
}
