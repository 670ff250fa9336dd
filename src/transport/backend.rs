use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap};

use super::TransportConfig;
use crate::http::{InboundResponse, OutgoingRequest, RequestBody, TransportFailure, decode_body};

/// Performs the network exchange for one request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn send(
        &self,
        config: &TransportConfig,
        request: OutgoingRequest,
    ) -> Result<InboundResponse, TransportFailure>;
}

/// Backend over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("apilink/", env!("APILINK_VERSION")))
            .cookie_store(config.with_credentials)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

/// Defaults overlaid with the request's own headers.
fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut headers = defaults.clone();
    for name in overrides.keys() {
        headers.remove(name);
        for value in overrides.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

#[async_trait]
impl Backend for ReqwestBackend {
    #[tracing::instrument(skip(self, config, request), fields(method = %request.method, path = %request.path))]
    async fn send(
        &self,
        config: &TransportConfig,
        request: OutgoingRequest,
    ) -> Result<InboundResponse, TransportFailure> {
        let url = config.url_for(&request.path);
        let mut headers = merge_headers(&config.default_headers, &request.headers);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            RequestBody::Empty => {
                // no body, no content type unless the caller set one
                if !request.headers.contains_key(CONTENT_TYPE) {
                    headers.remove(CONTENT_TYPE);
                }
                builder.headers(headers)
            }
            RequestBody::Json(value) => builder.headers(headers).json(&value),
            RequestBody::Multipart(form) => {
                // reqwest supplies multipart/form-data with its boundary
                headers.remove(CONTENT_TYPE);
                let form = form
                    .into_form()
                    .map_err(|e| TransportFailure::invalid_request(e.to_string()))?;
                builder.headers(headers).multipart(form)
            }
        };

        debug!("{} {}", request.method, url);

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", request.method, url, e);
            if e.is_builder() {
                TransportFailure::invalid_request(e.to_string())
            } else {
                TransportFailure::network(e.to_string())
            }
        })?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportFailure::network(e.to_string()))?;
        let body = decode_body(&bytes);

        debug!("{} {} -> {}", request.method, url, status);

        if status.is_success() {
            Ok(InboundResponse {
                status,
                headers: response_headers,
                body,
            })
        } else {
            warn!("{} {} returned {}", request.method, url, status);
            Err(TransportFailure::from_status(status.as_u16(), &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{FailureKind, FormPayload};
    use mockito::{Matcher, Server};
    use reqwest::header::HeaderValue;
    use reqwest::{Method, StatusCode};
    use serde_json::{Value, json};

    fn backend_and_config(url: &str) -> (ReqwestBackend, TransportConfig) {
        let config = TransportConfig::new(url);
        (ReqwestBackend::new(&config).unwrap(), config)
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/users")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "ada"})))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 1, "name": "ada"}"#)
            .create_async()
            .await;

        let (backend, config) = backend_and_config(&server.url());
        let request = OutgoingRequest::new(Method::POST, "/users")
            .with_body(RequestBody::Json(json!({"name": "ada"})));
        let response = backend.send(&config, request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, json!({"id": 1, "name": "ada"}));
    }

    #[tokio::test]
    async fn test_send_without_body_omits_content_type() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/me")
            .match_header("content-type", Matcher::Missing)
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"id": 1}"#)
            .create_async()
            .await;
        let logout = server
            .mock("POST", "/logout")
            .match_header("content-type", Matcher::Missing)
            .with_status(204)
            .create_async()
            .await;

        let (backend, config) = backend_and_config(&server.url());
        let response = backend
            .send(&config, OutgoingRequest::new(Method::GET, "/me"))
            .await
            .unwrap();
        assert_eq!(response.body, json!({"id": 1}));

        let response = backend
            .send(&config, OutgoingRequest::new(Method::POST, "/logout"))
            .await
            .unwrap();
        assert_eq!(response.body, Value::Null);

        get.assert_async().await;
        logout.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_without_body_keeps_explicit_content_type() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/cache")
            .match_header("content-type", "text/plain")
            .with_status(204)
            .create_async()
            .await;

        let (backend, config) = backend_and_config(&server.url());
        let request = OutgoingRequest::new(Method::DELETE, "/cache")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        backend.send(&config, request).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_query_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/items")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("q".into(), "red shoes".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (backend, config) = backend_and_config(&server.url());
        let request = OutgoingRequest::new(Method::GET, "/items").with_query(vec![
            ("page".to_string(), "2".to_string()),
            ("q".to_string(), "red shoes".to_string()),
        ]);
        let response = backend.send(&config, request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.body, json!([]));
    }

    #[tokio::test]
    async fn test_send_error_status_becomes_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/users/9")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "admins only"}"#)
            .create_async()
            .await;

        let (backend, config) = backend_and_config(&server.url());
        let failure = backend
            .send(&config, OutgoingRequest::new(Method::DELETE, "/users/9"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.status, Some(403));
        assert_eq!(failure.data.unwrap().detail.as_deref(), Some("admins only"));
    }

    #[tokio::test]
    async fn test_send_multipart_overrides_json_default() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/files")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::Regex("report".to_string()))
            .with_status(200)
            .with_body(r#"{"stored": true}"#)
            .create_async()
            .await;

        let (backend, config) = backend_and_config(&server.url());
        let request = OutgoingRequest::new(Method::POST, "/files")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"))
            .with_body(RequestBody::Multipart(FormPayload::new().text("title", "report")));
        let response = backend.send(&config, request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.body, json!({"stored": true}));
    }

    #[tokio::test]
    async fn test_send_connection_refused_is_network_failure() {
        // nothing listens on port 9 (discard) in test environments
        let (backend, config) = backend_and_config("http://127.0.0.1:9");
        let failure = backend
            .send(&config, OutgoingRequest::new(Method::GET, "/"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::Network);
        assert_eq!(failure.status, None);
    }

    #[test]
    fn test_merge_headers_overrides_replace_defaults() {
        let mut defaults = HeaderMap::new();
        defaults.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        defaults.insert("x-client", HeaderValue::from_static("apilink"));
        let mut overrides = HeaderMap::new();
        overrides.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let merged = merge_headers(&defaults, &overrides);
        assert_eq!(merged.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(merged[CONTENT_TYPE], "text/plain");
        assert_eq!(merged["x-client"], "apilink");
    }
}
