//! Composition root: resolves settings once and wires the pipeline.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    api::ApiClient,
    error::ErrorHandler,
    i18n::{Catalog, LanguageSync},
    interceptor::{BearerAuth, ErrorReporter, Pipeline},
    notify::{ConsoleNotifier, LogNotifier, Notifier},
    runtime::{Runtime, non_empty_env},
    storage::{ACCESS_TOKEN_KEY, FileStore, KeyValueStore, LANG_KEY, StorageSlot, UnavailableStore},
    transport::{Backend, ReqwestBackend, Transport, TransportConfig, resolve_base_url},
};

/// Environment variable naming the storage file.
pub const STORAGE_ENV: &str = "APILINK_STORAGE";

/// Environment variable naming a message catalog file.
pub const CATALOG_ENV: &str = "APILINK_CATALOG";

/// Where failure notifications go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyMode {
    /// Printed to stderr.
    #[default]
    Console,
    /// Sent to the logger.
    Log,
    /// Not shown at all.
    Off,
}

/// Values given explicitly, e.g. on the command line. They win over the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub storage: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub notify: NotifyMode,
}

pub struct Config {
    pub api: ApiClient,
    pub token: StorageSlot,
    pub language: LanguageSync,
    pub errors: ErrorHandler,
}

impl Config {
    pub fn new<R: Runtime + 'static>(runtime: R, overrides: Overrides) -> Result<Self> {
        let transport_config =
            TransportConfig::new(resolve_base_url(&runtime, overrides.api_url.clone()));
        let backend = Arc::new(ReqwestBackend::new(&transport_config)?);
        Self::with_backend(runtime, overrides, transport_config, backend)
    }

    pub fn with_backend<R: Runtime + 'static>(
        runtime: R,
        overrides: Overrides,
        transport_config: TransportConfig,
        backend: Arc<dyn Backend>,
    ) -> Result<Self> {
        debug!("Using API at {}", transport_config.base_url);

        let catalog = Arc::new(load_catalog(&runtime, overrides.catalog.clone())?);
        let store = open_store(runtime, overrides.storage.clone());

        let token = StorageSlot::new(store.clone(), ACCESS_TOKEN_KEY);
        let language = LanguageSync::new(catalog.clone(), StorageSlot::new(store, LANG_KEY));

        let notifier: Arc<dyn Notifier> = match overrides.notify {
            NotifyMode::Log => Arc::new(LogNotifier),
            NotifyMode::Console | NotifyMode::Off => Arc::new(ConsoleNotifier),
        };
        let errors = ErrorHandler::new(notifier, catalog);

        let pipeline = Pipeline::builder()
            .request(BearerAuth::new(token.clone()))
            .response(ErrorReporter::new(
                errors.clone(),
                overrides.notify != NotifyMode::Off,
            ))
            .build();

        let transport = Transport::new(transport_config, backend, pipeline);

        Ok(Self {
            api: ApiClient::new(Arc::new(transport)),
            token,
            language,
            errors,
        })
    }
}

/// Explicit path, then the environment, then the user's config directory.
/// Without any of them storage is unavailable.
pub fn storage_path<R: Runtime + ?Sized>(runtime: &R, explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or_else(|| non_empty_env(runtime, STORAGE_ENV).map(PathBuf::from))
        .or_else(|| {
            runtime
                .config_dir()
                .map(|dir| dir.join("apilink").join("storage.json"))
        })
}

fn open_store<R: Runtime + 'static>(runtime: R, explicit: Option<PathBuf>) -> Arc<dyn KeyValueStore> {
    match storage_path(&runtime, explicit) {
        Some(path) => {
            debug!("Using storage file {}", path.display());
            Arc::new(FileStore::new(runtime, path))
        }
        None => {
            debug!("No storage location available");
            Arc::new(UnavailableStore)
        }
    }
}

fn load_catalog<R: Runtime + ?Sized>(runtime: &R, explicit: Option<PathBuf>) -> Result<Catalog> {
    let path = explicit.or_else(|| non_empty_env(runtime, CATALOG_ENV).map(PathBuf::from));
    match path {
        Some(path) => {
            debug!("Loading message catalog from {}", path.display());
            let json = runtime.read_to_string(&path)?;
            Catalog::from_json(&json)
                .with_context(|| format!("Invalid message catalog {}", path.display()))
        }
        None => Ok(Catalog::builtin()),
    }
}
