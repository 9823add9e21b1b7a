//! Trait definitions for DID methods.

use async_trait::async_trait;

use crate::methods::resolution::{DIDResolutionOptions, ResolutionOutput};

/// Abstract contract for DID methods.
pub trait DIDMethod: DIDResolver {
    /// Returns the DIDMethod's registered name, prefixed with `did:`,
    /// e.g. did:key, did:web, etc.
    fn name() -> String;
}

/// Abstract contract for DID resolution.
///
/// Failures are reported through the resolution metadata rather than
/// an `Err`, so that outputs can be relayed as-is to remote callers.
///
/// [See DID Resolution Specification](https://w3c.github.io/did-resolution)
#[async_trait]
pub trait DIDResolver {
    /// Resolves a DID address into its corresponding DID document.
    async fn resolve(&self, did: &str, options: &DIDResolutionOptions) -> ResolutionOutput;
}
