//! Typed API client: the only entry point feature code uses.
//!
//! Each call goes through the shared [`Transport`] and returns just the
//! deserialized body. Failures are returned unchanged; any notification
//! has already been emitted by the response interceptors.

mod error;
mod query;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::http::{FormPayload, InboundResponse, OutgoingRequest, RequestBody};
use crate::transport::Transport;

pub use error::ApiError;
pub use query::to_query_pairs;

/// Loosely-typed JSON object used for parameters and bodies.
pub type Json = serde_json::Map<String, Value>;

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    #[tracing::instrument(skip(self, params))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&Json>,
    ) -> Result<T, ApiError> {
        let query = match params {
            Some(params) => to_query_pairs(params).map_err(ApiError::Encode)?,
            None => Vec::new(),
        };
        self.send(OutgoingRequest::new(Method::GET, path).with_query(query))
            .await
    }

    /// GET with query parameters from any serializable value.
    #[tracing::instrument(skip(self, params))]
    pub async fn get_with_query<T, Q>(&self, path: &str, params: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = to_query_pairs(params).map_err(ApiError::Encode)?;
        self.send(OutgoingRequest::new(Method::GET, path).with_query(query))
            .await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Json>,
    ) -> Result<T, ApiError> {
        self.send(OutgoingRequest::new(Method::POST, path).with_body(json_body(body)))
            .await
    }

    /// POST with a body from any serializable value.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.send(OutgoingRequest::new(Method::POST, path).with_body(RequestBody::Json(body)))
            .await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Json>,
    ) -> Result<T, ApiError> {
        self.send(OutgoingRequest::new(Method::PUT, path).with_body(json_body(body)))
            .await
    }

    /// PUT with a body from any serializable value.
    #[tracing::instrument(skip(self, body))]
    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.send(OutgoingRequest::new(Method::PUT, path).with_body(RequestBody::Json(body)))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(OutgoingRequest::new(Method::DELETE, path)).await
    }

    /// POSTs a multipart form. The JSON content type default is replaced
    /// for this call only.
    #[tracing::instrument(skip(self, form))]
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        let request = OutgoingRequest::new(Method::POST, path)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"))
            .with_body(RequestBody::Multipart(form));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: OutgoingRequest) -> Result<T, ApiError> {
        let response = self.transport.request(request).await?;
        unwrap_body(response)
    }
}

fn json_body(body: Option<&Json>) -> RequestBody {
    match body {
        Some(map) => RequestBody::Json(Value::Object(map.clone())),
        None => RequestBody::Empty,
    }
}

fn unwrap_body<T: DeserializeOwned>(response: InboundResponse) -> Result<T, ApiError> {
    let status: StatusCode = response.status;
    serde_json::from_value(response.into_body())
        .map_err(|source| ApiError::Decode { status, source })
}
