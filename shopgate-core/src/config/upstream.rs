//! Upstream platform configuration.

use std::time::Duration;
use url::Url;

/// Where the order service, product catalog, and search indexer live.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL; always ends with `/` so relative joins stay under it.
    pub base_url: Url,
    /// Bearer token sent with every upstream request, if set.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Create a new UpstreamConfig, normalising the base path to end with `/`.
    pub fn new(mut base_url: Url, api_key: Option<String>, timeout: Duration) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            api_key,
            timeout,
        }
    }
}
