//! HTTP client implementation.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{
    BaseUrl, HttpClientConfig, PreparedRequest, ReqwestTransport, RequestBuilder, Result,
    Transport,
};

/// Client bound to one base URL.
///
/// Cheap to clone; clones share configuration and transport.
#[derive(Clone)]
pub struct HttpClient {
    config: Arc<HttpClientConfig>,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client that sends through a custom transport.
    pub fn with_transport(config: HttpClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Create a client from `{PREFIX}_*` environment variables.
    ///
    /// See [`HttpClientConfig::from_env`].
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::new(HttpClientConfig::from_env(prefix)?)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &BaseUrl {
        &self.config.base_url
    }

    /// Create a request builder. The method defaults to `GET`.
    pub fn request(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self, "GET")
    }

    /// Create a request builder with the given method.
    pub fn request_with(&self, method: impl AsRef<str>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method.as_ref())
    }

    /// Create a GET request builder.
    pub fn get(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self, "GET")
    }

    /// Create a POST request builder.
    pub fn post(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self, "POST")
    }

    /// Create a PUT request builder.
    pub fn put(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self, "PUT")
    }

    /// Create a PATCH request builder.
    pub fn patch(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self, "PATCH")
    }

    /// Create a DELETE request builder.
    pub fn delete(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(self, "DELETE")
    }

    /// Send a prepared request and classify the response.
    pub async fn send(&self, request: &PreparedRequest) -> Result<Option<Value>> {
        debug!(
            method = %request.method(),
            url = %request.url(),
            body_bytes = request.body().map_or(0, <[u8]>::len),
            "Sending HTTP request"
        );

        let response = match self.transport.exchange(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "HTTP exchange failed");
                return Err(e);
            }
        };

        debug!(
            status = %response.status(),
            body_bytes = response.bytes().len(),
            "Received HTTP response"
        );

        let outcome = response.into_outcome(request.path());
        if let Err(e) = &outcome {
            debug!(error = %e, path = request.path(), "HTTP request failed");
        }
        outcome
    }
}
