// Courier - a fluent single-request JSON HTTP client
//
// This library configures a base URL once, then chains method selection,
// header merging and params before one request/response exchange.

// Re-export the client crate
pub use courier_http_client::*;

// Re-export JSON helpers used with params and results
pub use serde_json::json;

/// Build [`Params`] from a `json!`-style object literal.
///
/// ```
/// let params = courier::params!({"q": "rust", "page": 2});
/// assert_eq!(params.len(), 2);
/// ```
///
/// Only `{ ... }` literals are accepted; anything else fails to compile.
///
/// ```compile_fail
/// let params = courier::params!([1, 2, 3]);
/// ```
#[macro_export]
macro_rules! params {
    ({ $($body:tt)* }) => {{
        let mut params = $crate::Params::new();
        if let $crate::Value::Object(map) = $crate::json!({ $($body)* }) {
            params = map;
        }
        params
    }};
}
