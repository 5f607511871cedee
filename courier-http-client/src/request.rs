//! Request builder.

use crate::{HttpClient, HttpClientError, ParamPolicy, Result};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Key/value payload sent as a query string or a JSON body.
pub type Params = serde_json::Map<String, Value>;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Problems found while chaining, reported when the request is finalized.
#[derive(Debug, Clone)]
enum Deferred {
    Header(String),
    Params(String),
}

impl From<Deferred> for HttpClientError {
    fn from(deferred: Deferred) -> Self {
        match deferred {
            Deferred::Header(msg) => HttpClientError::InvalidHeader(msg),
            Deferred::Params(msg) => HttpClientError::InvalidParams(msg),
        }
    }
}

/// HTTP request builder.
///
/// Mutators consume and return the builder. [`execute`](Self::execute) only
/// borrows it, so one builder can be executed against several endpoints, but
/// cannot be changed while a request is in flight.
#[derive(Clone)]
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: String,
    headers: HeaderMap,
    params: Option<Params>,
    deferred: Option<Deferred>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a new request builder seeded with the client's default headers.
    pub(crate) fn new(client: &'a HttpClient, method: &str) -> Self {
        Self {
            client,
            method: method.to_uppercase(),
            headers: client.config().default_headers.clone(),
            params: None,
            deferred: None,
        }
    }

    /// Set the request method. Stored upper-cased; validated when the request
    /// is prepared.
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        self.method = method.as_ref().to_uppercase();
        self
    }

    /// Overlay headers onto the current set.
    ///
    /// Existing names are overwritten, others are kept. `None` or an empty
    /// collection is a no-op.
    pub fn merge_headers<I, K, V>(mut self, headers: Option<I>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers.into_iter().flatten() {
            let (name, value) = (name.as_ref(), value.as_ref());
            match (
                HeaderName::try_from(name),
                HeaderValue::try_from(value),
            ) {
                (Ok(name), Ok(value)) => {
                    self.headers.insert(name, value);
                }
                _ => {
                    self.deferred
                        .get_or_insert(Deferred::Header(format!("{name}: {value}")));
                }
            }
        }
        self
    }

    /// Set a single header.
    pub fn header(self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.merge_headers(Some([(name, value)]))
    }

    /// Replace the stored params. `None` clears them.
    pub fn params(mut self, params: impl Into<Option<Params>>) -> Self {
        self.params = params.into();
        self
    }

    /// Replace the stored params with any value serializing to a JSON object.
    /// A value serializing to `null` clears them.
    pub fn try_params<T: Serialize + ?Sized>(mut self, params: &T) -> Self {
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => self.params = Some(map),
            Ok(Value::Null) => self.params = None,
            Ok(other) => {
                self.deferred.get_or_insert(Deferred::Params(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )));
            }
            Err(e) => {
                self.deferred.get_or_insert(Deferred::Params(e.to_string()));
            }
        }
        self
    }

    /// Current upper-cased method.
    pub fn current_method(&self) -> &str {
        &self.method
    }

    /// Current header set.
    pub fn current_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Current params.
    pub fn current_params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    /// Finalize the builder into an immutable request for `endpoint`.
    ///
    /// No I/O happens here. On `GET` the params become the query string; on
    /// `POST`/`PUT`/`PATCH` with `Content-Type: application/json` they become
    /// the body. Anything else is handled by the client's [`ParamPolicy`].
    pub fn prepare(&self, endpoint: &str) -> Result<PreparedRequest> {
        if let Some(deferred) = &self.deferred {
            return Err(deferred.clone().into());
        }

        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| HttpClientError::InvalidMethod(self.method.clone()))?;

        let config = self.client.config();
        config.base_url.check_endpoint(endpoint)?;
        let mut path = config.base_url.endpoint_path(endpoint);
        let mut body = None;

        if let Some(params) = self.params.as_ref().filter(|p| !p.is_empty()) {
            let content_type = self
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());

            if method == Method::GET {
                path.push('?');
                path.push_str(&encode_query(params)?);
            } else if matches!(method.as_str(), "POST" | "PUT" | "PATCH")
                && content_type == Some(JSON_CONTENT_TYPE)
            {
                let bytes = serde_json::to_vec(params)
                    .map_err(|e| HttpClientError::InvalidParams(e.to_string()))?;
                body = Some(bytes);
            } else {
                match config.param_policy {
                    ParamPolicy::Drop => {
                        tracing::warn!(
                            method = %method,
                            content_type = content_type.unwrap_or(""),
                            params = params.len(),
                            "Params cannot be sent with this method and content type, dropping them"
                        );
                    }
                    ParamPolicy::Reject => {
                        return Err(HttpClientError::UnsupportedParams {
                            method: method.to_string(),
                            content_type: content_type.map(str::to_string),
                        });
                    }
                }
            }
        }

        let url = config.base_url.url_for(&path)?;

        Ok(PreparedRequest {
            method,
            path: wire_path(&url),
            url,
            headers: self.headers.clone(),
            body,
        })
    }

    /// Send the request to `endpoint` and decode the JSON response.
    ///
    /// Returns `Ok(None)` for a 2xx response with an empty body.
    pub async fn execute(&self, endpoint: &str) -> Result<Option<Value>> {
        let request = self.prepare(endpoint)?;
        self.client.send(&request).await
    }

    /// Like [`execute`](Self::execute), decoding into `T`.
    pub async fn execute_as<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>> {
        self.execute(endpoint)
            .await?
            .map(|value| serde_json::from_value(value).map_err(|_| HttpClientError::Decode))
            .transpose()
    }
}

/// A finalized request: what will go on the wire.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    path: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path and query string exactly as sent in the request line.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string, if params were encoded into it.
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, query)| query)
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Request body.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Path plus `?query`, as written on the request line.
fn wire_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Form-encode params. Strings go out verbatim, `null` as an empty value,
/// everything else as its compact JSON text.
fn encode_query(params: &Params) -> Result<String> {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(key, value)| (key.as_str(), query_value(value)))
        .collect();
    serde_urlencoded::to_string(&pairs).map_err(|e| HttpClientError::InvalidParams(e.to_string()))
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
