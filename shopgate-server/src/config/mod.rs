//! Configuration module for shopgate-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::{FileConfig, StorageBackend};
use shopgate_core::config::{RazorpayConfig, ServerConfig, SharedConfig, UpstreamConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Overrides `[razorpay] webhook_secret` when set.
pub const WEBHOOK_SECRET_ENV: &str = "RAZORPAY_WEBHOOK_SECRET";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub razorpay: RazorpayConfig,
    pub upstream: UpstreamConfig,
    /// Fixed at startup; a reload does not switch stores.
    pub storage: StorageBackend,
}

impl LoadedConfig {
    /// Convert the reloadable sections into a SharedConfig.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.razorpay, self.upstream)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI and environment overrides
    /// 3. Validate the configuration
    /// 4. Build the loaded configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let env_secret = std::env::var(WEBHOOK_SECRET_ENV).ok();
        self.load_str(&config_content, env_secret)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn load_str(
        &self,
        content: &str,
        env_secret: Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Some(secret) = env_secret.filter(|s| !s.is_empty()) {
            file_config.razorpay.webhook_secret = secret;
        }

        let base_url = self.validate(&file_config)?;
        Ok(build_loaded_config(file_config, base_url))
    }

    fn validate(&self, config: &FileConfig) -> Result<Url, ConfigError> {
        if config.razorpay.webhook_secret.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "razorpay.webhook_secret is empty and {WEBHOOK_SECRET_ENV} is not set"
            )));
        }

        let base_url = Url::parse(&config.upstream.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "upstream.base_url {:?} is not a valid URL: {e}",
                config.upstream.base_url
            ))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "upstream.base_url must be http or https, got {}",
                base_url.scheme()
            )));
        }

        if config.upstream.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(base_url)
    }
}

fn build_loaded_config(file_config: FileConfig, base_url: Url) -> LoadedConfig {
    LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        razorpay: RazorpayConfig::new(file_config.razorpay.webhook_secret.into_bytes()),
        upstream: UpstreamConfig::new(
            base_url,
            file_config.upstream.api_key.filter(|k| !k.is_empty()),
            Duration::from_secs(file_config.upstream.timeout_secs),
        ),
        storage: file_config.storage.backend,
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
