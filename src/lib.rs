pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod i18n;
pub mod interceptor;
pub mod notify;
pub mod runtime;
pub mod storage;
pub mod transport;
