//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the environment and
//! the file system, enabling dependency injection and testability.
//!
//! # Structure
//!
//! - `env` - Environment variables and well-known directories
//! - `fs` - File system operations (read, write, rename, directories)

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    // Directories
    fn config_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.read_impl(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir_impl()
    }
}

/// Reads an environment variable, treating unset and blank values alike.
pub fn non_empty_env<R: Runtime + ?Sized>(runtime: &R, key: &str) -> Option<String> {
    runtime
        .env_var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_non_empty_env_present() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("APILINK_API_URL"))
            .returning(|_| Ok("  https://api.example.com  ".to_string()));

        assert_eq!(
            non_empty_env(&runtime, "APILINK_API_URL"),
            Some("https://api.example.com".to_string())
        );
    }

    #[test]
    fn test_non_empty_env_blank_is_none() {
        let mut runtime = MockRuntime::new();
        runtime.expect_env_var().returning(|_| Ok("   ".to_string()));

        assert_eq!(non_empty_env(&runtime, "APILINK_API_URL"), None);
    }

    #[test]
    fn test_non_empty_env_missing_is_none() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(|_| Err(std_env::VarError::NotPresent));

        assert_eq!(non_empty_env(&runtime, "APILINK_API_URL"), None);
    }
}
