//! Resolution through a remote resolver exposing the
//! [DID resolution HTTP(S) binding](https://w3c.github.io/did-resolution/#bindings-https),
//! such as a universal resolver instance.

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::{body::Bytes, header::ACCEPT, Request, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::Value;

use crate::{
    didcore::Document as DIDDocument,
    methods::{
        errors::HttpBindingError,
        resolution::{DIDResolutionOptions, MediaType, ResolutionOutput},
        traits::DIDResolver,
    },
};

/// A resolver delegating to a remote `GET {base_url}/{did}` endpoint.
pub struct HttpBinding {
    base_url: String,
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
}

impl HttpBinding {
    /// Creates a resolver for the given endpoint, e.g.
    /// `https://dev.uniresolver.io/1.0/identifiers`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder(TokioExecutor::new()).build(HttpsConnector::new()),
        }
    }

    async fn fetch(&self, did: &str) -> Result<ResolutionOutput, HttpBindingError> {
        let uri: Uri = format!("{}/{did}", self.base_url).parse()?;
        tracing::debug!(did, %uri, "resolving through http binding");

        let request = Request::get(uri)
            .header(ACCEPT, MediaType::DidLdJson.to_string())
            .body(Empty::new())?;

        let res = self.client.request(request).await?;
        let status = res.status();
        let body = BodyExt::collect(res.into_body()).await?.to_bytes();

        if !status.is_success() {
            // Remote resolvers may still describe the failure
            if let Ok(output) = serde_json::from_slice::<ResolutionOutput>(&body) {
                if let Some(err) = output.did_resolution_metadata.and_then(|metadata| metadata.error) {
                    return Err(HttpBindingError::Reported(err));
                }
            }

            return Err(HttpBindingError::NonSuccessResponse(status));
        }

        let value: Value = serde_json::from_slice(&body)?;

        // A resolution result or a bare DID document
        if value.get("didDocument").is_some() || value.get("didResolutionMetadata").is_some() {
            Ok(serde_json::from_value(value)?)
        } else {
            let diddoc: DIDDocument = serde_json::from_value(value)?;
            Ok(ResolutionOutput::from_document(diddoc))
        }
    }
}

#[async_trait]
impl DIDResolver for HttpBinding {
    async fn resolve(&self, did: &str, _options: &DIDResolutionOptions) -> ResolutionOutput {
        match self.fetch(did).await {
            Ok(output) => output,
            Err(err) => {
                tracing::debug!(did, error = %err, "http binding resolution failed");
                ResolutionOutput::from_error(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::DIDResolutionError;

    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use tokio::net::TcpListener;

    const RESOLVED_DID: &str = "did:example:resolved";
    const BARE_DID: &str = "did:example:bare";

    async fn create_mock_server() -> String {
        let result: Value =
            serde_json::from_str(&std::fs::read_to_string("test_resources/ion_resolution_result.json").unwrap()).unwrap();

        let app = Router::new().route(
            "/1.0/identifiers/:did",
            get(move |Path(did): Path<String>, headers: HeaderMap| async move {
                if headers.get(ACCEPT).and_then(|value| value.to_str().ok()) != Some("application/did+ld+json") {
                    return (StatusCode::NOT_ACCEPTABLE, Json(Value::Null));
                }

                match did.as_str() {
                    RESOLVED_DID => (StatusCode::OK, Json(result)),
                    BARE_DID => (StatusCode::OK, Json(result["didDocument"].clone())),
                    "did:example:gone" => (
                        StatusCode::GONE,
                        Json(serde_json::json!({"didResolutionMetadata": {"error": "invalidDid"}})),
                    ),
                    "did:example:down" => (StatusCode::BAD_GATEWAY, Json(Value::Null)),
                    _ => (StatusCode::NOT_FOUND, Json(Value::Null)),
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}/1.0/identifiers/")
    }

    #[tokio::test]
    async fn test_resolves_resolution_result_and_bare_document() {
        let resolver = HttpBinding::new(&create_mock_server().await);

        let output = resolver.resolve(RESOLVED_DID, &DIDResolutionOptions::default()).await;
        assert!(output.did_document_metadata.as_ref().unwrap().canonical_id.is_some());
        let from_result = output.into_document().unwrap();

        let output = resolver.resolve(BARE_DID, &DIDResolutionOptions::default()).await;
        assert!(output.did_document_metadata.is_none());
        let from_bare = output.into_document().unwrap();

        assert_eq!(from_result, from_bare);
    }

    #[tokio::test]
    async fn test_maps_failures_to_resolution_errors() {
        let resolver = HttpBinding::new(&create_mock_server().await);

        let cases = [
            ("did:example:unknown", DIDResolutionError::NotFound),
            ("did:example:gone", DIDResolutionError::InvalidDid),
            ("did:example:down", DIDResolutionError::InternalError),
        ];

        for (did, expected_err) in cases {
            let output = resolver.resolve(did, &DIDResolutionOptions::default()).await;
            assert_eq!(output.into_document().unwrap_err(), expected_err, "{did}");
        }
    }

    #[tokio::test]
    async fn test_unreachable_resolver_is_an_internal_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let resolver = HttpBinding::new(&format!("http://{addr}"));
        let output = resolver.resolve(RESOLVED_DID, &DIDResolutionOptions::default()).await;
        assert_eq!(output.into_document().unwrap_err(), DIDResolutionError::InternalError);
    }
}
