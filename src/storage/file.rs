//! File-backed store: one JSON object per file, written atomically.

use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::KeyValueStore;
use crate::runtime::Runtime;

pub struct FileStore<R: Runtime> {
    runtime: R,
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl<R: Runtime> FileStore<R> {
    pub fn new(runtime: R, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.runtime.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let content = self.runtime.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store file {}", self.path.display()))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        self.runtime.write(&tmp, json.as_bytes())?;
        self.runtime.rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, key: &str, change: F) -> bool
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let Ok(_guard) = self.lock.lock() else {
            return false;
        };
        let result = self.load().and_then(|mut entries| {
            change(&mut entries);
            self.save(&entries)
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!("Ignoring storage failure for {}: {:#}", key, e);
                false
            }
        }
    }
}

impl<R: Runtime> KeyValueStore for FileStore<R> {
    #[tracing::instrument(skip(self))]
    fn try_read(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().ok()?;
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                debug!("Ignoring storage failure for {}: {:#}", key, e);
                None
            }
        }
    }

    #[tracing::instrument(skip(self, value))]
    fn try_write(&self, key: &str, value: &str) -> bool {
        self.update(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    #[tracing::instrument(skip(self))]
    fn try_remove(&self, key: &str) -> bool {
        self.update(key, |entries| {
            entries.remove(key);
        })
    }
}
