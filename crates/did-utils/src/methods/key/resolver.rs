use async_trait::async_trait;

use crate::methods::{
    resolution::{DIDResolutionOptions, ResolutionOutput},
    traits::DIDResolver,
    DidKey,
};

#[async_trait]
impl DIDResolver for DidKey {
    /// Resolves a `did:key` address offline, by expanding it.
    async fn resolve(&self, did: &str, _options: &DIDResolutionOptions) -> ResolutionOutput {
        match self.expand(did) {
            Ok(diddoc) => ResolutionOutput::from_document(diddoc),
            Err(err) => {
                tracing::debug!(did, error = %err, "did:key expansion failed");
                ResolutionOutput::from_error(err)
            }
        }
    }
}
