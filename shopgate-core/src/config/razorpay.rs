//! Razorpay webhook configuration.

/// Settings for verifying Razorpay webhook deliveries.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Webhook secret bytes for HMAC verification.
    pub webhook_secret: Box<[u8]>,
}

impl RazorpayConfig {
    /// Create a new RazorpayConfig.
    pub fn new(webhook_secret: impl Into<Box<[u8]>>) -> Self {
        Self {
            webhook_secret: webhook_secret.into(),
        }
    }

    /// Get the secret key bytes for HMAC verification.
    pub fn secret_bytes(&self) -> &[u8] {
        &self.webhook_secret
    }
}
