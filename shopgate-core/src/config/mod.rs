//! Configuration types for Shopgate.
//!
//! These types represent the validated runtime configuration used by the server
//! and can be shared across crates. The actual config loading/parsing is handled
//! by the server crate.

mod razorpay;
mod server;
mod upstream;

pub use razorpay::RazorpayConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// This allows independent access to different configuration sections
/// without blocking other readers/writers.
#[derive(Clone)]
pub struct SharedConfig {
    /// Server configuration (listen address, etc.).
    pub server: Arc<RwLock<ServerConfig>>,
    /// Razorpay webhook verification settings.
    pub razorpay: Arc<RwLock<RazorpayConfig>>,
    /// The order/product/search platform the gateway fronts.
    pub upstream: Arc<RwLock<UpstreamConfig>>,
}

impl SharedConfig {
    /// Create a new SharedConfig from individual configuration parts.
    pub fn new(server: ServerConfig, razorpay: RazorpayConfig, upstream: UpstreamConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            razorpay: Arc::new(RwLock::new(razorpay)),
            upstream: Arc::new(RwLock::new(upstream)),
        }
    }

    /// Replace the sections that are read per request, one lock at a time.
    ///
    /// `server` is left alone: the listener is bound once at startup.
    pub async fn reload(&self, razorpay: RazorpayConfig, upstream: UpstreamConfig) {
        *self.razorpay.write().await = razorpay;
        *self.upstream.write().await = upstream;
    }
}
