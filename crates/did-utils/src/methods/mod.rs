//! A collection of methods for DID resolution and related utilities.
//!
//! This module provides functionality for resolving Decentralized Identifiers (DIDs)
//! using different DID methods including [`did:key`] and [`did:web`], plus a
//! generic [HTTP binding] for methods served by remote resolvers. Resolvers are
//! gathered in a [`ResolverRegistry`] that dispatches on the method name.
//!
//! [`did:key`]: https://w3c-ccg.github.io/did-method-key/
//! [`did:web`]: https://w3c-ccg.github.io/did-method-web/
//! [HTTP binding]: https://w3c.github.io/did-resolution/#bindings-https
//!
//! # Examples
//!
//! ```
//! use did_utils::methods::{DidKey, HttpBinding, ResolverRegistry};
//!
//! # async fn resolve() {
//! let registry = ResolverRegistry::new()
//!     .register("key", DidKey::new())
//!     .register("ion", HttpBinding::new("https://dev.uniresolver.io/1.0/identifiers"));
//!
//! let diddoc = registry.resolve("did:key:z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK").await;
//! # }
//! ```

mod common;
mod errors;
mod http_binding;
mod key;
mod registry;
mod resolution;
mod traits;
mod utils;
mod web;

// Re-exported items
pub use common::{decode_multikey, DecodeMultikeyError, PublicKeyFormat};
pub use errors::{DIDResolutionError, DidWebError, HttpBindingError, ParsingErrorSource};
pub use http_binding::HttpBinding;
pub use key::method::DidKey;
pub use registry::ResolverRegistry;
pub use resolution::*;
pub use traits::{DIDMethod, DIDResolver};
pub use utils::{method_name, parse_did_url};
pub use web::resolver::DidWeb;
