//! # Courier HTTP Client
//!
//! A small fluent client for issuing one HTTP request at a time against a
//! JSON API and decoding the JSON response.
//!
//! ## Features
//!
//! - **Base URL**: configured once per client, trailing `/` stripped
//! - **Fluent builder**: method, header merging and params, then `execute`
//! - **Params**: query string on `GET`, JSON body on `POST`/`PUT`/`PATCH`
//! - **Typed errors**: not found, other status, decode and transport failures
//!   are distinct variants of [`HttpClientError`]
//! - **Explicit timeout**: every client is built with one
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier_http_client::{HttpClient, HttpClientConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HttpClientConfig::new("https://api.example.com/v1/", Duration::from_secs(10))?;
//!     let client = HttpClient::new(config)?;
//!
//!     let user = client.request().execute("users/42").await?;
//!     println!("{user:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Params and Headers
//!
//! ```rust,no_run
//! use courier_http_client::{HttpClient, HttpClientConfig, HttpClientError};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(HttpClientConfig::new(
//!         "https://api.example.com/v1",
//!         Duration::from_secs(10),
//!     )?)?;
//!
//!     let result = client
//!         .request()
//!         .method("post")
//!         .merge_headers(Some([("X-Request-Id", "abc-123")]))
//!         .try_params(&serde_json::json!({"item": "widget", "quantity": 5}))
//!         .execute("/orders")
//!         .await;
//!
//!     match result {
//!         Ok(order) => println!("created: {order:?}"),
//!         Err(HttpClientError::NotFound { path }) => println!("no such endpoint: {path}"),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```

mod base_url;
mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

pub use base_url::BaseUrl;
pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder, ParamPolicy};
pub use error::{HttpClientError, Result};
pub use request::{Params, PreparedRequest, RequestBuilder};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

// Re-export common types
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use serde_json::Value;
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use courier_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder, ParamPolicy};
    pub use crate::error::{HttpClientError, Result};
    pub use crate::request::{Params, PreparedRequest, RequestBuilder};
    pub use crate::response::Response;
    pub use crate::transport::Transport;
    pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
}
