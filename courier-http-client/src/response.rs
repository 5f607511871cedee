//! HTTP response wrapper and outcome classification.

use crate::{HttpClientError, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a response. The reason phrase defaults to the canonical one for
    /// `status`; use [`with_reason`](Self::with_reason) for the one the
    /// server sent.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            headers,
            body: body.into(),
        }
    }

    /// Override the reason phrase.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Read a reqwest response to the end.
    pub(crate) async fn from_reqwest(response: reqwest::Response, timeout: Duration) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        // Only present when the server sent a non-canonical phrase.
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::from_reqwest(e, timeout))?;

        let response = Self::new(status, headers, body);
        Ok(match reason {
            Some(reason) => response.with_reason(reason),
            None => response,
        })
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the reason phrase.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|_| HttpClientError::Decode)
    }

    /// Classify the response for a request to `path`.
    ///
    /// - 2xx with a body: the decoded JSON value
    /// - 2xx without a body: `None`
    /// - 404: [`HttpClientError::NotFound`]
    /// - anything else: [`HttpClientError::Status`]
    pub fn into_outcome(self, path: &str) -> Result<Option<Value>> {
        if self.status.is_success() {
            if self.body.is_empty() {
                return Ok(None);
            }
            return self.json().map(Some);
        }

        if self.status == StatusCode::NOT_FOUND {
            return Err(HttpClientError::NotFound {
                path: path.to_string(),
            });
        }

        Err(HttpClientError::Status {
            status: self.status.as_u16(),
            reason: self.reason,
        })
    }
}
