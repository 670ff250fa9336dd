use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::Value;

/// A successful response envelope. Only its body leaves the API client.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl InboundResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// Decodes a raw body: empty is `null`, JSON is parsed, anything else is
/// kept as a JSON string.
pub fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
