use log::{debug, warn};
use reqwest::header::{AUTHORIZATION, HeaderValue};

use super::RequestInterceptor;
use crate::http::OutgoingRequest;
use crate::storage::StorageSlot;

/// Injects `Authorization: Bearer <token>` from the stored access token.
#[derive(Debug, Clone)]
pub struct BearerAuth {
    slot: StorageSlot,
}

impl BearerAuth {
    pub fn new(slot: StorageSlot) -> Self {
        Self { slot }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut OutgoingRequest) {
        // the stored value is sent as-is
        let Some(token) = self.slot.get().filter(|t| !t.is_empty()) else {
            return;
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
                debug!("Using access token {}", mask_token(&token));
            }
            Err(_) => warn!("Stored access token is not a valid header value, sending without it"),
        }
    }
}

/// Shows only the ends of a token, for logs.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        ACCESS_TOKEN_KEY, KeyValueStore, LANG_KEY, MemoryStore, MockKeyValueStore, UnavailableStore,
    };
    use reqwest::Method;
    use std::sync::Arc;

    fn auth_with(store: Arc<dyn KeyValueStore>) -> BearerAuth {
        BearerAuth::new(StorageSlot::new(store, ACCESS_TOKEN_KEY))
    }

    fn intercept(auth: &BearerAuth) -> OutgoingRequest {
        let mut request = OutgoingRequest::new(Method::GET, "/me");
        auth.on_request(&mut request);
        request
    }

    #[test]
    fn test_injects_bearer_token() {
        let store = Arc::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "abc123")]));
        let request = intercept(&auth_with(store));

        assert_eq!(request.header("authorization"), Some("Bearer abc123"));
        assert!(request.headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_no_token_leaves_request_unmodified() {
        let request = intercept(&auth_with(Arc::new(MemoryStore::new())));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let store = Arc::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "")]));
        let request = intercept(&auth_with(store));
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_stored_token_is_not_rewritten() {
        let store = Arc::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "abc123 ")]));
        let request = intercept(&auth_with(store));
        assert_eq!(
            request.headers[AUTHORIZATION].as_bytes(),
            b"Bearer abc123 ".as_slice()
        );
    }

    #[test]
    fn test_only_reads_access_token_key() {
        let store = Arc::new(MemoryStore::with_entries([(LANG_KEY, "ar")]));
        let request = intercept(&auth_with(store));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_unavailable_storage_never_blocks() {
        let request = intercept(&auth_with(Arc::new(UnavailableStore)));
        assert!(request.headers.is_empty());
        assert_eq!(request.path, "/me");
    }

    #[test]
    fn test_failing_store_is_read_once_and_ignored() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_try_read()
            .with(mockall::predicate::eq(ACCESS_TOKEN_KEY))
            .times(1)
            .returning(|_| None);

        let request = intercept(&auth_with(Arc::new(store)));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_invalid_header_token_is_skipped() {
        let store = Arc::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "bad\ntoken")]));
        let request = intercept(&auth_with(store));
        assert!(request.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_replaces_existing_authorization_override() {
        let store = Arc::new(MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "fresh")]));
        let mut request = OutgoingRequest::new(Method::GET, "/me")
            .with_header(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
        auth_with(store).on_request(&mut request);
        assert_eq!(request.header("authorization"), Some("Bearer fresh"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*********");
        assert_eq!(mask_token("abcdefghijkl"), "abcd*********ijkl");
    }
}
