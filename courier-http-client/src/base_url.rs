//! Base URL normalization and decomposition.

use crate::{HttpClientError, Result};
use std::fmt;
use url::Url;

/// The fixed scheme + authority + path prefix shared by every request of a
/// client.
///
/// Trailing `/` are stripped at construction, so the stored string never ends
/// with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    raw: String,
    url: Url,
}

impl BaseUrl {
    /// Parse and normalize a base URL.
    pub fn parse(base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref().trim().trim_end_matches('/').to_string();
        let url = Url::parse(&raw).map_err(|e| HttpClientError::InvalidUrl(format!("{raw}: {e}")))?;

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(HttpClientError::InvalidUrl(format!(
                "{raw}: base URL must include a scheme and a host"
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(HttpClientError::InvalidUrl(format!(
                "{raw}: base URL must not carry a query or fragment"
            )));
        }

        Ok(Self { raw, url })
    }

    /// The normalized base URL.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// URL scheme, e.g. `https`.
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Whether requests go over TLS.
    pub fn is_tls(&self) -> bool {
        self.scheme() == "https"
    }

    /// `host[:port]` as written (default ports are omitted).
    pub fn authority(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Base path without a trailing `/`; empty for a bare host.
    pub fn path(&self) -> &str {
        self.url.path().trim_end_matches('/')
    }

    /// Join an endpoint onto the base path.
    ///
    /// All leading `/` of the endpoint are dropped so exactly one separator
    /// sits between the base path and the endpoint.
    pub fn endpoint_path(&self, endpoint: &str) -> String {
        format!("{}/{}", self.path(), endpoint.trim_start_matches('/'))
    }

    /// Reject endpoints containing `.` or `..` path segments.
    ///
    /// URL parsing would resolve them, sending a different path than the one
    /// built here and possibly leaving the base path.
    pub fn check_endpoint(&self, endpoint: &str) -> Result<()> {
        let path = endpoint
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let has_dot_segment = path.split(['/', '\\']).any(|segment| {
            let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
            decoded == "." || decoded == ".."
        });

        if has_dot_segment {
            return Err(HttpClientError::InvalidUrl(format!(
                "{endpoint}: endpoint must not contain '.' or '..' segments"
            )));
        }
        Ok(())
    }

    /// Build an absolute URL for a request path (path plus optional query).
    pub(crate) fn url_for(&self, path: &str) -> Result<Url> {
        let absolute = format!("{}://{}{}", self.scheme(), self.authority(), path);
        Url::parse(&absolute).map_err(|e| HttpClientError::InvalidUrl(format!("{absolute}: {e}")))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for BaseUrl {
    type Err = HttpClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separators_stripped() {
        for input in [
            "https://api.example.com/v1",
            "https://api.example.com/v1/",
            "https://api.example.com/v1///",
        ] {
            let base = BaseUrl::parse(input).unwrap();
            assert_eq!(base.as_str(), "https://api.example.com/v1");
            assert!(!base.as_str().ends_with('/'));
        }
    }

    #[test]
    fn test_decomposition() {
        let base = BaseUrl::parse("http://localhost:8080/api/v2/").unwrap();
        assert_eq!(base.scheme(), "http");
        assert_eq!(base.authority(), "localhost:8080");
        assert_eq!(base.path(), "/api/v2");
        assert!(!base.is_tls());

        let base = BaseUrl::parse("https://api.example.com").unwrap();
        assert_eq!(base.authority(), "api.example.com");
        assert_eq!(base.path(), "");
        assert!(base.is_tls());
    }

    #[test]
    fn test_endpoint_path_single_separator() {
        let base = BaseUrl::parse("https://api.example.com/v1/").unwrap();
        assert_eq!(base.endpoint_path("users/42"), "/v1/users/42");
        assert_eq!(base.endpoint_path("/users/42"), "/v1/users/42");
        assert_eq!(base.endpoint_path("//users/42"), "/v1/users/42");

        let bare = BaseUrl::parse("https://api.example.com").unwrap();
        assert_eq!(bare.endpoint_path("/status"), "/status");
        assert_eq!(bare.endpoint_path(""), "/");
    }

    #[test]
    fn test_rejects_relative_and_query() {
        assert!(matches!(
            BaseUrl::parse("api.example.com/v1"),
            Err(HttpClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            BaseUrl::parse("mailto:someone@example.com"),
            Err(HttpClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            BaseUrl::parse("https://api.example.com/v1?key=1"),
            Err(HttpClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_check_endpoint_rejects_dot_segments() {
        let base = BaseUrl::parse("https://api.example.com/v1/").unwrap();
        for endpoint in [
            "../admin/users",
            "/users/../../admin",
            "./users",
            "users/.",
            "%2e%2e/admin",
            "users/.%2E/secrets",
            "..\\admin",
        ] {
            let err = base.check_endpoint(endpoint).unwrap_err();
            assert!(matches!(err, HttpClientError::InvalidUrl(_)), "{endpoint}");
        }

        for endpoint in ["users/42", "/files/report.v2.json", "...", "a..b", "search?q=../x", ""] {
            assert!(base.check_endpoint(endpoint).is_ok(), "{endpoint}");
        }
    }

    #[test]
    fn test_url_for() {
        let base = BaseUrl::parse("http://127.0.0.1:9000/base").unwrap();
        let url = base.url_for("/base/items?q=a+b").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/base/items?q=a+b");
    }
}
