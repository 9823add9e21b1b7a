use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::{
    body::Bytes,
    http::uri::{self, Scheme},
    Uri,
};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::{
    didcore::Document as DIDDocument,
    methods::{
        errors::DidWebError,
        resolution::{DIDResolutionOptions, ResolutionOutput},
        traits::{DIDMethod, DIDResolver},
    },
};

/// A struct for resolving DID Web documents.
pub struct DidWeb {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl Default for DidWeb {
    fn default() -> Self {
        Self::new()
    }
}

impl DIDMethod for DidWeb {
    fn name() -> String {
        "did:web".to_string()
    }
}

impl DidWeb {
    /// Creates a new `DidWeb` resolver.
    pub fn new() -> Self {
        DidWeb {
            client: Client::builder(TokioExecutor::new()).build(HttpsConnector::new()),
        }
    }

    /// Fetches a DID document from the given URL
    async fn fetch_did_document(&self, url: Uri) -> Result<String, DidWebError> {
        let res = self.client.get(url).await?;

        if !res.status().is_success() {
            return Err(DidWebError::NonSuccessResponse(res.status()));
        }

        let body = BodyExt::collect(res.into_body()).await?;

        String::from_utf8(body.to_bytes().to_vec()).map_err(|err| DidWebError::ParsingError(err.into()))
    }

    /// Fetches and parses a DID document for the given DID.
    async fn resolver_fetcher(&self, did: &str) -> Result<DIDDocument, DidWebError> {
        let (path, domain_name) = parse_did_web_url(did)?;

        // Plain HTTP is reserved to local hosts
        let scheme = if domain_name.starts_with("localhost") {
            Scheme::HTTP
        } else {
            Scheme::HTTPS
        };

        let url = uri::Builder::new()
            .scheme(scheme)
            .authority(domain_name)
            .path_and_query(path)
            .build()
            .map_err(|err| DidWebError::InvalidDid(err.to_string()))?;

        tracing::debug!(did, %url, "fetching did:web document");
        let json_string = self.fetch_did_document(url).await?;

        let did_document: DIDDocument = serde_json::from_str(&json_string)?;
        if did_document.id != did {
            return Err(DidWebError::RepresentationNotSupported(format!(
                "document id {} does not match {did}",
                did_document.id
            )));
        }

        Ok(did_document)
    }
}

/// Parses a DID Web URL and returns the path and domain name.
fn parse_did_web_url(did: &str) -> Result<(String, String), DidWebError> {
    let mut parts = did.split(':').peekable();
    let domain_name = match (parts.next(), parts.next(), parts.next()) {
        (Some("did"), Some("web"), Some(domain_name)) if !domain_name.is_empty() => domain_name.replacen("%3A", ":", 1),
        _ => return Err(DidWebError::InvalidDid(did.to_string())),
    };

    let path = match parts.peek() {
        Some(_) => parts.collect::<Vec<&str>>().join("/"),
        None => ".well-known".to_string(),
    };

    Ok((format!("/{path}/did.json"), domain_name))
}

#[async_trait]
impl DIDResolver for DidWeb {
    /// Resolves a `did:web` address to a DID document.
    ///
    /// # Example
    ///
    /// ```
    /// use did_utils::methods::{DIDResolver, DidWeb, DIDResolutionOptions};
    ///
    /// # async fn example_resolve_did_web() {
    /// let did_web_resolver = DidWeb::new();
    /// let output = did_web_resolver.resolve("did:web:example.com", &DIDResolutionOptions::default()).await;
    /// # }
    /// ```
    async fn resolve(&self, did: &str, _options: &DIDResolutionOptions) -> ResolutionOutput {
        match self.resolver_fetcher(did).await {
            Ok(diddoc) => ResolutionOutput::from_document(diddoc),
            Err(err) => {
                tracing::debug!(did, error = %err, "did:web resolution failed");
                ResolutionOutput::from_error(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::DIDResolutionError;

    use axum::{extract::Path, http::StatusCode, routing::get, Router};
    use serde_json::Value;
    use tokio::net::TcpListener;

    async fn create_mock_server() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let host = format!("did:web:localhost%3A{port}");

        let root = host.clone();
        let app = Router::new()
            .route("/.well-known/did.json", get(move || async move { DID_JSON.replace("{did}", &root) }))
            .route(
                "/user/:user/did.json",
                get(move |Path(user): Path<String>| async move {
                    match user.as_str() {
                        "alice" => Ok(DID_JSON.replace("{did}", &format!("{host}:user:alice"))),
                        "mallory" => Ok(DID_JSON.replace("{did}", "did:web:elsewhere.example")),
                        "broken" => Ok(String::from("{not json")),
                        _ => Err(StatusCode::NOT_FOUND),
                    }
                }),
            );

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        port
    }

    const DID_JSON: &str = r#"{
        "@context": "https://www.w3.org/ns/did/v1",
        "id": "{did}",
        "verificationMethod": [{
            "id": "{did}#key1",
            "type": "Ed25519VerificationKey2018",
            "controller": "{did}",
            "publicKeyJwk": {
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "G80iskrv_nE69qbGLSpeOHJgmV4MKIzsy5l5iT6pCww"
            }
        }],
        "assertionMethod": ["{did}#key1"]
    }"#;

    #[tokio::test]
    async fn resolves_document() {
        let port = create_mock_server().await;
        let did = format!("did:web:localhost%3A{port}");

        let output = DidWeb::new().resolve(&did, &DIDResolutionOptions::default()).await;

        let expected: Value = serde_json::from_str(&format!(
            r#"{{
                "@context": "https://w3id.org/did-resolution/v1",
                "didDocument": {{
                    "@context": "https://www.w3.org/ns/did/v1",
                    "assertionMethod": ["{did}#key1"],
                    "id": "{did}",
                    "verificationMethod": [
                        {{
                            "controller": "{did}",
                            "id": "{did}#key1",
                            "publicKeyJwk": {{
                                "crv": "Ed25519",
                                "kty": "OKP",
                                "x": "G80iskrv_nE69qbGLSpeOHJgmV4MKIzsy5l5iT6pCww"
                            }},
                            "type": "Ed25519VerificationKey2018"
                        }}
                    ]
                }},
                "didDocumentMetadata": null,
                "didResolutionMetadata": {{
                    "contentType": "application/did+ld+json"
                }}
            }}"#
        ))
        .unwrap();

        assert_eq!(json_canon::to_string(&output).unwrap(), json_canon::to_string(&expected).unwrap());
    }

    #[tokio::test]
    async fn resolves_document_under_path() {
        let port = create_mock_server().await;
        let did = format!("did:web:localhost%3A{port}:user:alice");

        let diddoc = DidWeb::new().resolve(&did, &DIDResolutionOptions::default()).await.into_document().unwrap();
        assert_eq!(diddoc.id, did);
        assert!(diddoc.find_verification_method(&format!("{did}#key1")).is_some());
    }

    #[tokio::test]
    async fn reports_resolution_errors_in_metadata() {
        let port = create_mock_server().await;
        let resolver = DidWeb::new();

        let cases = [
            (format!("did:web:localhost%3A{port}:user:bob"), DIDResolutionError::NotFound),
            (format!("did:web:localhost%3A{port}:user:broken"), DIDResolutionError::RepresentationNotSupported),
            (format!("did:web:localhost%3A{port}:user:mallory"), DIDResolutionError::RepresentationNotSupported),
            ("did:web:".to_string(), DIDResolutionError::InvalidDid),
        ];

        for (did, expected_err) in cases {
            let output = resolver.resolve(&did, &DIDResolutionOptions::default()).await;
            assert_eq!(output.into_document().unwrap_err(), expected_err, "{did}");
        }
    }

    #[test]
    fn test_parse_did_web_url() {
        let (path, domain_name) = parse_did_web_url("did:web:w3c-ccg.github.io").unwrap();
        assert_eq!(domain_name, "w3c-ccg.github.io");
        assert_eq!(path, "/.well-known/did.json");

        let (path, domain_name) = parse_did_web_url("did:web:w3c-ccg.github.io:user:alice").unwrap();
        assert_eq!(domain_name, "w3c-ccg.github.io");
        assert_eq!(path, "/user/alice/did.json");

        let (path, domain_name) = parse_did_web_url("did:web:example.com%3A3000:user:alice").unwrap();
        assert_eq!(domain_name, "example.com:3000");
        assert_eq!(path, "/user/alice/did.json");

        assert!(matches!(parse_did_web_url("did:key:z6Mk"), Err(DidWebError::InvalidDid(_))));
    }
}
