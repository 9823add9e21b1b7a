use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
// The @context property defines the vocabulary used in the JSON-LD document.
// It provides a way to map the keys in the JSON structure to specific terms,
// properties, and classes from external vocabularies.
//
// Mixed arrays of references and inline definitions land in `JsonObject`.
pub enum Context {
    SingleString(String),
    SetOfString(Vec<String>),
    JsonObject(Value),
}

impl Context {
    /// Returns the remote context references, skipping inline definitions.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Context::SingleString(url) => vec![url.as_str()],
            Context::SetOfString(urls) => urls.iter().map(String::as_str).collect(),
            Context::JsonObject(Value::String(url)) => vec![url.as_str()],
            Context::JsonObject(Value::Array(entries)) => entries.iter().filter_map(Value::as_str).collect(),
            Context::JsonObject(_) => vec![],
        }
    }

    /// Tells whether the context references the given URL.
    pub fn contains(&self, url: &str) -> bool {
        self.references().contains(&url)
    }
}
