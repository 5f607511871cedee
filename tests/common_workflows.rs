//! Integration tests for common Courier workflows.
//!
//! These tests verify that the most common use cases work correctly through
//! the top-level crate.

use courier::prelude::*;
use courier::{json, params};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn client(base_url: &str) -> HttpClient {
    let config = HttpClientConfig::new(base_url, Duration::from_secs(5)).unwrap();
    HttpClient::new(config).unwrap()
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_base_url_normalization() {
    for base in [
        "https://api.example.com/v1",
        "https://api.example.com/v1/",
        "https://api.example.com/v1////",
    ] {
        let client = client(base);
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1");
    }
}

#[test]
fn test_prepared_requests() {
    let client = client("https://api.example.com/v1/");

    let get = client
        .request()
        .params(params!({"ids": [1, 2], "q": "a b"}))
        .prepare("/users")
        .unwrap();
    assert_eq!(get.method(), Method::GET);
    assert_eq!(get.path(), "/v1/users?ids=%5B1%2C2%5D&q=a+b");
    assert!(get.body().is_none());

    let put = client
        .request()
        .method("put")
        .params(params!({"name": "Ada"}))
        .prepare("users/1")
        .unwrap();
    assert_eq!(put.path(), "/v1/users/1");
    assert_eq!(put.body(), Some(br#"{"name":"Ada"}"#.as_slice()));
    assert_eq!(put.headers()[header::CONTENT_TYPE], "application/json");
}

#[test]
fn test_per_client_default_headers() {
    let config = HttpClientConfig::builder("http://localhost", Duration::from_secs(1))
        .default_headers(HeaderMap::new())
        .default_header("Accept", "application/vnd.api+json")
        .build()
        .unwrap();
    let client = HttpClient::new(config).unwrap();

    let request = client.post().params(params!({"a": 1})).prepare("x").unwrap();
    assert_eq!(request.headers().len(), 1);
    // Without a JSON content type the params have nowhere to go.
    assert!(request.body().is_none());
}

// =============================================================================
// End-to-end Tests
// =============================================================================

#[tokio::test]
async fn test_crud_round() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/widgets"))
        .and(query_param("color", "blue"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"id":1}]"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/widgets/1"))
        .and(body_json(json!({"color": "red"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":1,"color":"red"}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/widgets/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&format!("{}/api/", server.uri()));

    let list = assert_ok!(
        client
            .request()
            .params(params!({"color": "blue"}))
            .execute("widgets")
            .await
    );
    assert_eq!(list, Some(json!([{"id": 1}])));

    let updated = assert_ok!(
        client
            .request()
            .method("PATCH")
            .params(params!({"color": "red"}))
            .execute("/widgets/1")
            .await
    );
    assert_eq!(updated, Some(json!({"id": 1, "color": "red"})));

    let deleted = assert_ok!(client.delete().execute("widgets/1").await);
    assert_eq!(deleted, None);
}

#[tokio::test]
async fn test_error_kinds_are_distinct() {
    let server = MockServer::start().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;
    Mock::given(path("/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{oops"))
        .mount(&server)
        .await;

    let client = client(&server.uri());

    let err = assert_err!(client.request().execute("missing").await);
    assert!(matches!(err, HttpClientError::NotFound { .. }));

    let err = assert_err!(client.request().execute("teapot").await);
    assert!(matches!(err, HttpClientError::Status { status: 418, .. }));

    let err = assert_err!(client.request().execute("garbled").await);
    assert!(matches!(err, HttpClientError::Decode));
}

#[test]
fn test_params_macro_builds_maps() {
    let empty = params!({});
    assert!(empty.is_empty());

    let nested = params!({"filter": {"tag": "rust"}, "limit": 5});
    assert_eq!(nested["filter"], json!({"tag": "rust"}));
    assert_eq!(nested["limit"], json!(5));
}
