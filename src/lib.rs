/*! # did-configuration

Verifies that a DID and a web origin are controlled by the same party, using the
[Well Known DID Configuration](https://identity.foundation/.well-known/resources/did-configuration/)
resource.

A domain publishes `/.well-known/did-configuration.json`, listing domain linkage
credentials in `linked_dids`. Each entry is either a JWT or a credential secured
with a linked-data proof. The linkage holds when one entry:

1. is signed by a key found in the DID document of its issuer;
2. names the DID as its subject and the domain as its origin;
3. is typed and contextualized as a `DomainLinkageCredential`.

Both the legacy `v0.0` and the current `v1` contexts are supported.

```no_run
use std::sync::Arc;

use did_configuration::{contexts, Client};
use did_utils::methods::{DidKey, HttpBinding, ResolverRegistry};

# async fn verify() -> Result<(), Box<dyn std::error::Error>> {
let registry = ResolverRegistry::new()
    .register("key", DidKey::new())
    .register("ion", HttpBinding::new("https://dev.uniresolver.io/1.0/identifiers"));

let client = Client::new()
    .with_document_loader(Arc::new(contexts::did_configuration_loader()?))
    .with_vdr_registry(registry);

client.verify_did_and_domain("did:ion:EiCMdVLtzqqW5n6zUC3_srZxWPCseVxKXu9FqQ8LyS1mTA", "https://did.rohitgulati.com").await?;
# Ok(())
# }
```
*/

mod client;
pub mod config;
pub mod contexts;
pub mod credential;
mod error;
pub mod fetcher;
pub mod matcher;
pub mod verifier;

pub use client::Client;
pub use error::{CredentialError, Error, StructuralError, TransportError};
pub use fetcher::{HttpClient, HttpResponse, HyperClient};
