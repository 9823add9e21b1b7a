//! Retrieval of the well-known DID configuration resource.

use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper::{body::Bytes, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tracing::{debug, warn};

use crate::error::{Error, TransportError};

/// Path of the DID configuration resource, relative to the origin.
pub const WELL_KNOWN_PATH: &str = "/.well-known/did-configuration.json";

/// Longest response body quoted in a status error.
pub const MAX_ERROR_BODY: usize = 1024;

/// Default timeout of a fetch through [`HyperClient`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest response body [`HyperClient`] reads by default, 1 MiB.
pub const MAX_CONFIGURATION_SIZE: usize = 1024 * 1024;

/// A drained HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// The transport used to fetch DID configurations.
///
/// Implementations return the whole body. A body that cannot be read on a
/// non-success response may be reported as empty.
#[async_trait]
pub trait HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Default transport: a hyper client over TLS with a request timeout.
///
/// Bodies longer than [`MAX_CONFIGURATION_SIZE`] are refused unless another
/// limit is set with [`HyperClient::with_max_body_size`].
pub struct HyperClient {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    timeout: Duration,
    max_body_size: usize,
}

impl HyperClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build(HttpsConnector::new()),
            timeout,
            max_body_size: MAX_CONFIGURATION_SIZE,
        }
    }

    pub fn with_max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    async fn exchange(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let uri: Uri = url
            .parse()
            .map_err(|err| TransportError::from_error(&format!("GET {url}"), &err))?;

        let request = Request::get(uri)
            .body(Empty::new())
            .map_err(|err| TransportError::from_error(&format!("GET {url}"), &err))?;

        let res = self
            .client
            .request(request)
            .await
            .map_err(|err| TransportError::from_error(&format!("GET {url}"), &err))?;

        let status = res.status();
        match Limited::new(res.into_body(), self.max_body_size).collect().await {
            Ok(collected) => Ok(HttpResponse {
                status: status.as_u16(),
                body: collected.to_bytes().to_vec(),
            }),
            Err(err) if status != StatusCode::OK => {
                warn!(url, %status, error = %err, "failed to drain response body");
                Ok(HttpResponse {
                    status: status.as_u16(),
                    body: Vec::new(),
                })
            }
            Err(err) if err.is::<LengthLimitError>() => Err(TransportError::new(format!(
                "GET {url}: response body exceeds {} bytes",
                self.max_body_size
            ))),
            Err(err) => Err(TransportError::from_error(&format!("GET {url}: reading body"), err.as_ref())),
        }
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for HyperClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        match tokio::time::timeout(self.timeout, self.exchange(url)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::new(format!(
                "GET {url}: request timed out after {}s",
                self.timeout.as_secs_f32()
            ))),
        }
    }
}

/// Builds the well-known URL of the domain, e.g. `https://example.com`.
pub fn well_known_url(domain: &str) -> Result<String, TransportError> {
    let url = format!("{}{WELL_KNOWN_PATH}", domain.trim_end_matches('/'));

    match url::Url::parse(&url) {
        Ok(parsed) if parsed.has_host() => Ok(url),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            Err(TransportError::new(format!("parse \"{url}\": missing protocol scheme")))
        }
        Err(err) => Err(TransportError::new(format!("parse \"{url}\": {err}"))),
    }
}

/// Fetches the DID configuration served by the domain.
pub async fn fetch(client: &(dyn HttpClient + Send + Sync), domain: &str) -> Result<Vec<u8>, Error> {
    let url = well_known_url(domain)?;
    debug!(%url, "fetching did configuration");

    let response = client.get(&url).await?;
    if response.status != StatusCode::OK.as_u16() {
        return Err(Error::HttpStatus {
            url,
            status: response.status,
            body: truncate(&String::from_utf8_lossy(&response.body), MAX_ERROR_BODY).to_string(),
        });
    }

    Ok(response.body)
}

// Cuts the text to at most `max` bytes, on a character boundary.
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
