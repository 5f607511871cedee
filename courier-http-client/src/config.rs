//! HTTP client configuration.

use crate::{BaseUrl, HttpClientError, Result};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// What to do with params the request cannot carry.
///
/// Params travel as a query string on `GET` and as a JSON body on
/// `POST`/`PUT`/`PATCH` with `Content-Type: application/json`. Any other
/// combination has nowhere to put them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamPolicy {
    /// Send the request without the params and log a warning.
    #[default]
    Drop,
    /// Fail with [`HttpClientError::UnsupportedParams`] before sending.
    Reject,
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests.
    pub base_url: BaseUrl,
    /// Total time allowed for one request/response exchange.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Headers every request starts from.
    pub default_headers: HeaderMap,
    /// User agent string.
    pub user_agent: String,
    /// Handling of params that cannot be sent.
    pub param_policy: ParamPolicy,
}

impl HttpClientConfig {
    /// Create a configuration with default headers and policy.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        Self::builder(base_url, timeout).build()
    }

    /// Create a new configuration builder.
    ///
    /// The base URL and timeout have no defaults; every client must choose
    /// both.
    pub fn builder(base_url: impl AsRef<str>, timeout: Duration) -> HttpClientConfigBuilder {
        HttpClientConfigBuilder {
            base_url: base_url.as_ref().to_string(),
            timeout,
            connect_timeout: None,
            default_headers: Self::json_headers(),
            header_errors: Vec::new(),
            user_agent: default_user_agent(),
            param_policy: ParamPolicy::default(),
        }
    }

    /// `Accept: application/json` and `Content-Type: application/json`.
    pub fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Load configuration from `{PREFIX}_*` environment variables.
    ///
    /// | Variable                        | Required | Meaning                          |
    /// |---------------------------------|----------|----------------------------------|
    /// | `{PREFIX}_BASE_URL`             | yes      | base URL                         |
    /// | `{PREFIX}_TIMEOUT_SECS`         | yes      | exchange timeout in seconds      |
    /// | `{PREFIX}_CONNECT_TIMEOUT_SECS` | no       | connect timeout in seconds       |
    /// | `{PREFIX}_USER_AGENT`           | no       | user agent                       |
    /// | `{PREFIX}_STRICT_PARAMS`        | no       | `1`/`true`/`yes` rejects params  |
    pub fn from_env(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading through `lookup`.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}_{}", prefix.trim_end_matches('_'), name)
            };
            let value = lookup(&key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            (key, value)
        };
        let secs = |key: &str, raw: &str| {
            raw.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| HttpClientError::Config(format!("{key} must be whole seconds, got {raw:?}")))
        };

        let (key, base_url) = var("BASE_URL");
        let base_url = base_url.ok_or_else(|| HttpClientError::Config(format!("{key} is not set")))?;

        let (key, timeout) = var("TIMEOUT_SECS");
        let timeout = match timeout {
            Some(raw) => secs(&key, &raw)?,
            None => return Err(HttpClientError::Config(format!("{key} is not set"))),
        };

        let mut builder = Self::builder(&base_url, timeout);

        if let (key, Some(raw)) = var("CONNECT_TIMEOUT_SECS") {
            builder = builder.connect_timeout(secs(&key, &raw)?);
        }
        if let (_, Some(user_agent)) = var("USER_AGENT") {
            builder = builder.user_agent(user_agent);
        }
        if let (key, Some(raw)) = var("STRICT_PARAMS") {
            let strict = match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(HttpClientError::Config(format!(
                        "{key} must be a boolean, got {raw:?}"
                    )));
                }
            };
            if strict {
                builder = builder.param_policy(ParamPolicy::Reject);
            }
        }

        builder.build()
    }
}

fn default_user_agent() -> String {
    format!("courier-http-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Builder for HTTP client configuration.
#[derive(Debug)]
pub struct HttpClientConfigBuilder {
    base_url: String,
    timeout: Duration,
    connect_timeout: Option<Duration>,
    default_headers: HeaderMap,
    header_errors: Vec<String>,
    user_agent: String,
    param_policy: ParamPolicy,
}

impl HttpClientConfigBuilder {
    /// Set the exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Add or replace a default header for all requests.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let (name, value) = (name.as_ref(), value.as_ref());
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.default_headers.insert(name, value);
            }
            _ => self.header_errors.push(format!("{name}: {value}")),
        }
        self
    }

    /// Replace the default header set entirely.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the handling of params that cannot be sent.
    pub fn param_policy(mut self, policy: ParamPolicy) -> Self {
        self.param_policy = policy;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<HttpClientConfig> {
        if let Some(bad) = self.header_errors.into_iter().next() {
            return Err(HttpClientError::InvalidHeader(bad));
        }
        if self.timeout.is_zero() {
            return Err(HttpClientError::Config("timeout must be greater than zero".into()));
        }

        Ok(HttpClientConfig {
            base_url: BaseUrl::parse(&self.base_url)?,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            default_headers: self.default_headers,
            user_agent: self.user_agent,
            param_policy: self.param_policy,
        })
    }
}
