//! TOML file configuration structures.
//!
//! These structs directly map to the `shopgate.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub razorpay: RazorpayConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Razorpay section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayConfig {
    /// Webhook secret shared with the Razorpay dashboard. May be left empty
    /// when `RAZORPAY_WEBHOOK_SECRET` is set.
    #[serde(default)]
    pub webhook_secret: String,
}

/// The hosted order/product/search platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Where webhook events are stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// The `webhook_events` table; needs `DATABASE_URL`.
    #[default]
    Postgres,
    /// Process-local map, lost on restart.
    Memory,
}
