//! The shared transport: fixed configuration, a backend and the
//! interceptor pipeline.
//!
//! Built once by the composition root and shared by reference; nothing
//! here is reconfigured after construction.

mod backend;

use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;

use crate::http::{InboundResponse, OutgoingRequest, TransportFailure};
use crate::interceptor::Pipeline;
use crate::runtime::{Runtime, non_empty_env};

pub use backend::{Backend, ReqwestBackend};

#[cfg(test)]
pub use backend::MockBackend;

/// Used when no API address is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable holding the API address.
pub const API_URL_ENV: &str = "APILINK_API_URL";

/// Explicit value, then the environment, then [`DEFAULT_BASE_URL`].
pub fn resolve_base_url<R: Runtime + ?Sized>(runtime: &R, explicit: Option<String>) -> String {
    explicit
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .or_else(|| non_empty_env(runtime, API_URL_ENV))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub base_url: String,
    pub default_headers: HeaderMap,
    /// Keep and send cookies across calls.
    pub with_credentials: bool,
}

impl TransportConfig {
    /// JSON defaults with credentials enabled.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers,
            with_credentials: true,
        }
    }

    /// Joins `path` onto the base address. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

pub struct Transport {
    config: TransportConfig,
    backend: Arc<dyn Backend>,
    pipeline: Pipeline,
}

impl Transport {
    pub fn new(config: TransportConfig, backend: Arc<dyn Backend>, pipeline: Pipeline) -> Self {
        Self {
            config,
            backend,
            pipeline,
        }
    }

    /// Runs one request through the request interceptors, the backend and
    /// the response interceptors.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn request(
        &self,
        mut request: OutgoingRequest,
    ) -> Result<InboundResponse, TransportFailure> {
        self.pipeline.before_send(&mut request);
        debug!("Sending {} {}", request.method, self.config.url_for(&request.path));
        let outcome = self.backend.send(&self.config, request).await;
        self.pipeline.after_receive(outcome)
    }
}
