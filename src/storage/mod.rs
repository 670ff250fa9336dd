//! Client-side persistent key/value storage.
//!
//! Storage is an external, possibly-absent dependency. Every operation is a
//! "try" operation: reads return `None` and writes return `false` when the
//! backing store is unavailable, so callers never have to handle a storage
//! error on the request path.

mod file;

use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

pub use file::FileStore;

/// Key holding the bearer token injected into outgoing requests.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key holding the persisted interface language.
pub const LANG_KEY: &str = "lang";

#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if absent or the store failed.
    fn try_read(&self, key: &str) -> Option<String>;

    /// Stores a value. Returns `false` if the store failed.
    fn try_write(&self, key: &str, value: &str) -> bool;

    /// Removes a value. Removing a missing key succeeds.
    fn try_remove(&self, key: &str) -> bool;
}

/// A handle to exactly one key of a store.
///
/// Features get a slot instead of the whole store so the token and the
/// language never touch each other's entries.
#[derive(Clone)]
pub struct StorageSlot {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
}

impl StorageSlot {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn get(&self) -> Option<String> {
        self.store.try_read(self.key)
    }

    pub fn set(&self, value: &str) -> bool {
        self.store.try_write(self.key, value)
    }

    pub fn remove(&self) -> bool {
        self.store.try_remove(self.key)
    }
}

impl fmt::Debug for StorageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSlot").field("key", &self.key).finish()
    }
}

/// In-process store. Used by tests and when persistence is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn try_read(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => {
                debug!("Memory store lock poisoned, reading {} as absent", key);
                None
            }
        }
    }

    fn try_write(&self, key: &str, value: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn try_remove(&self, key: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
                true
            }
            Err(_) => false,
        }
    }
}

/// Store for contexts without any persistent storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn try_read(&self, key: &str) -> Option<String> {
        debug!("Storage unavailable, cannot read {}", key);
        None
    }

    fn try_write(&self, key: &str, _value: &str) -> bool {
        debug!("Storage unavailable, cannot write {}", key);
        false
    }

    fn try_remove(&self, _key: &str) -> bool {
        false
    }
}
