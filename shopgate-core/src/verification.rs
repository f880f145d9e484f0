//! Webhook authenticity checks.

use crate::config::RazorpayConfig;
use shopgate_sdk::signature;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Decides whether a webhook body really came from the payment provider.
#[async_trait::async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// `true` only when `signature` is valid for the raw `body`.
    async fn verify(&self, signature: &str, body: &[u8]) -> bool;
}

/// HMAC-SHA256 verifier using the configured Razorpay webhook secret.
///
/// The secret is read on every call, so a config reload rotates it without
/// a restart.
pub struct RazorpayVerifier {
    config: Arc<RwLock<RazorpayConfig>>,
}

impl RazorpayVerifier {
    pub fn new(config: Arc<RwLock<RazorpayConfig>>) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SignatureVerifier for RazorpayVerifier {
    async fn verify(&self, signature: &str, body: &[u8]) -> bool {
        let config = self.config.read().await;
        match signature::verify_webhook(body, signature, config.secret_bytes()) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Webhook signature rejected");
                false
            }
        }
    }
}
