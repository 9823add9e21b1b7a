use std::{collections::HashMap, sync::Arc};

use crate::{
    didcore::Document as DIDDocument,
    methods::{
        errors::DIDResolutionError,
        resolution::DIDResolutionOptions,
        traits::DIDResolver,
        utils::method_name,
        DidKey, DidWeb,
    },
};

/// Dispatch table from DID method names to resolvers.
///
/// The table is assembled once and only read afterwards, so a registry
/// can be shared across concurrent resolutions.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, Arc<dyn DIDResolver + Send + Sync>>,
}

impl ResolverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry handling `did:key` and `did:web`.
    pub fn with_defaults() -> Self {
        Self::new().register("key", DidKey::new()).register("web", DidWeb::new())
    }

    /// Registers a resolver for a DID method, named without the `did:` prefix.
    ///
    /// A later registration for the same method replaces the earlier one.
    pub fn register<R>(mut self, method: &str, resolver: R) -> Self
    where
        R: DIDResolver + Send + Sync + 'static,
    {
        self.resolvers.insert(method.to_string(), Arc::new(resolver));
        self
    }

    /// Tells whether a resolver is registered for the method.
    pub fn supports(&self, method: &str) -> bool {
        self.resolvers.contains_key(method)
    }

    /// Resolves a DID into its document through the resolver of its method.
    pub async fn resolve(&self, did: &str) -> Result<DIDDocument, DIDResolutionError> {
        let method = method_name(did)?;
        let resolver = self.resolvers.get(method).ok_or_else(|| {
            tracing::debug!(did, method, "no resolver registered for method");
            DIDResolutionError::MethodNotSupported
        })?;

        resolver.resolve(did, &DIDResolutionOptions::default()).await.into_document()
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<_> = self.resolvers.keys().collect();
        methods.sort();
        f.debug_struct("ResolverRegistry").field("methods", &methods).finish()
    }
}
