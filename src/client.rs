use std::{sync::Arc, time::Duration};

use did_utils::{
    jsonld::{ContextLoader, StaticContextLoader},
    methods::ResolverRegistry,
};
use tracing::{debug, info};

use crate::{
    config::{self, LinkageConfiguration, RawCredential},
    credential,
    error::{CredentialError, Error},
    fetcher::{self, HttpClient, HyperClient, DEFAULT_TIMEOUT},
    matcher, verifier,
};

/// Verifies DID to domain linkage through the `.well-known/did-configuration.json` resource.
///
/// Each capability can be swapped at construction:
///
/// | option                   | default                               |
/// |--------------------------|---------------------------------------|
/// | `with_document_loader`   | none, every remote context fails      |
/// | `with_vdr_registry`      | an empty registry                     |
/// | `with_http_client`       | [`HyperClient`]                       |
/// | `with_timeout`           | 30 s, for the default transport only  |
///
/// A client holds no state between calls and can be shared.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use did_configuration::{contexts, Client};
/// use did_utils::methods::ResolverRegistry;
///
/// # async fn verify() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new()
///     .with_document_loader(Arc::new(contexts::did_configuration_loader()?))
///     .with_vdr_registry(ResolverRegistry::with_defaults());
///
/// client
///     .verify_did_and_domain(
///         "did:key:z6MkoTHsgNNrby8JzCNQ1iRLyW5QQ6R8Xuu6AA8igGrMVPUM",
///         "https://identity.foundation",
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    document_loader: Option<Arc<dyn ContextLoader>>,
    vdr_registry: ResolverRegistry,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
    timeout: Duration,
}

impl Client {
    pub fn new() -> Self {
        Self {
            document_loader: None,
            vdr_registry: ResolverRegistry::new(),
            http_client: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the source of JSON-LD context documents.
    pub fn with_document_loader(mut self, loader: Arc<dyn ContextLoader>) -> Self {
        self.document_loader = Some(loader);
        self
    }

    /// Sets the registry resolving credential issuers.
    pub fn with_vdr_registry(mut self, registry: ResolverRegistry) -> Self {
        self.vdr_registry = registry;
        self
    }

    /// Sets the transport fetching DID configurations.
    ///
    /// A custom transport manages its own timeouts.
    pub fn with_http_client(mut self, client: Arc<dyn HttpClient + Send + Sync>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the request timeout of the default transport.
    ///
    /// Has no effect on a transport set with [`Client::with_http_client`],
    /// whichever of the two is called first.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn transport(&self) -> Arc<dyn HttpClient + Send + Sync> {
        match &self.http_client {
            Some(client) => client.clone(),
            None => Arc::new(HyperClient::with_timeout(self.timeout)),
        }
    }

    /// Verifies that `did` and `domain` are linked by the DID configuration the domain serves.
    ///
    /// Succeeds as soon as one `linked_dids` entry is validly signed by its
    /// issuer and links the DID to the domain. Entries that fail are skipped.
    /// [`Error::NoLinkageFound`] collects their errors once the list is exhausted.
    pub async fn verify_did_and_domain(&self, did: &str, domain: &str) -> Result<(), Error> {
        let bytes = fetcher::fetch(self.transport().as_ref(), domain).await?;
        let configuration = config::parse(&bytes, self.document_loader.as_deref())?;

        self.verify_configuration(&configuration, did, domain).await
    }

    /// Verifies the linkage against an already parsed DID configuration.
    pub async fn verify_configuration(&self, configuration: &LinkageConfiguration, did: &str, domain: &str) -> Result<(), Error> {
        let empty = StaticContextLoader::new();
        let loader: &dyn ContextLoader = match &self.document_loader {
            Some(loader) => loader.as_ref(),
            None => &empty,
        };

        let mut errors = Vec::new();
        for (index, raw) in configuration.linked_dids.iter().enumerate() {
            match self.verify_entry(index, raw, did, domain, loader).await {
                Ok(()) => {
                    info!(did, domain, index, "domain linkage verified");
                    return Ok(());
                }
                Err(err) => {
                    debug!(did, domain, index, error = %err, "linked_dids entry rejected");
                    errors.push(err);
                }
            }
        }

        Err(Error::NoLinkageFound {
            did: did.to_string(),
            domain: domain.to_string(),
            candidates: configuration.linked_dids.len(),
            errors,
        })
    }

    async fn verify_entry(
        &self,
        index: usize,
        raw: &RawCredential,
        did: &str,
        domain: &str,
        loader: &dyn ContextLoader,
    ) -> Result<(), CredentialError> {
        let normalized = credential::normalize(index, raw)?;
        verifier::verify(&normalized, &self.vdr_registry, loader).await?;
        matcher::matches(&normalized, did, domain)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("document_loader", &self.document_loader.is_some())
            .field("vdr_registry", &self.vdr_registry)
            .field("http_client", &self.http_client.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
