//! Wire transport.

use crate::{HttpClientConfig, HttpClientError, PreparedRequest, Response, Result};
use async_trait::async_trait;
use http::HeaderValue;
use http::header::CONNECTION;
use std::time::Duration;

/// Performs one request/response exchange.
///
/// Implementations must read the whole response and release the connection
/// before returning, on success and on failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the full response.
    async fn exchange(&self, request: &PreparedRequest) -> Result<Response>;
}

/// Transport backed by reqwest.
///
/// Every exchange uses its own connection: the idle pool is disabled and
/// requests carry `Connection: close`. `https` base URLs use rustls, anything
/// else goes over plain TCP. Redirects are returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .http1_only()
            .user_agent(config.user_agent.as_str());

        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn exchange(&self, request: &PreparedRequest) -> Result<Response> {
        let mut headers = request.headers().clone();
        headers.insert(CONNECTION, HeaderValue::from_static("close"));

        let mut builder = self
            .inner
            .request(request.method().clone(), request.url().clone())
            .headers(headers);

        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpClientError::from_reqwest(e, self.timeout))?;

        Response::from_reqwest(response, self.timeout).await
    }
}
