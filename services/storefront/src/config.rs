//! Storefront configuration
//!
//! Values are layered: built-in defaults, then an optional
//! `storefront.toml` in the working directory, then environment variables.
//!
//! # Environment Variables
//! - `STOREFRONT_STORAGE__BACKEND`: `file` or `redis` (default: `file`). `memory`
//!   is for tests and embedding; the CLI refuses it.
//! - `STOREFRONT_STORAGE__DATA_DIR`: directory for the file backend (default: `./data`)
//! - `STOREFRONT_STORAGE__REDIS_URL`: Redis URL (default: `redis://localhost:6379`)
//! - `STOREFRONT_KEYS__DOCUMENT`: key holding the document (default: `kaspi_demo_db_v2`)
//! - `STOREFRONT_KEYS__SESSION`: key holding the session (default: `kaspi_demo_auth_v2`)
//! - `STOREFRONT_LOG_LEVEL`: default log filter when `RUST_LOG` is unset (default: `warn`)

use common::StorageConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::store::StoreKeys;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub keys: StoreKeys,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            keys: StoreKeys::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `storefront.toml` (if present) and the
    /// environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Some("storefront"))
    }

    /// Load configuration from an optional file base name and the
    /// environment
    pub fn load(file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("STOREFRONT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
