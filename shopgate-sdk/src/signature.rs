//! Signature algorithm and verification for Razorpay webhooks.
//!
//! Razorpay signs every webhook delivery with the webhook secret configured
//! on its dashboard. The signature travels in a header as lowercase hex:
//!
//! ```text
//! X-Razorpay-Signature: hex(HMAC-SHA256(raw_body, webhook_secret))
//! X-Razorpay-Event-Id:  evt_...
//! ```
//!
//! Verification must run against the raw request body, byte for byte.
//! Re-serialising a parsed payload changes key order and whitespace and
//! breaks the signature.

/// Header name for the HMAC signature.
pub const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Header name for the provider-assigned event id (the idempotency key).
pub const EVENT_ID_HEADER: &str = "X-Razorpay-Event-Id";

/// Errors produced by signature operations.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("webhook secret is empty")]
    EmptySecret,
    #[error("invalid hex encoding")]
    InvalidEncoding,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

/// Sign a webhook body: `hex(HMAC-SHA256(body, secret))`.
///
/// Returns the value to put in [`SIGNATURE_HEADER`].
pub fn sign_webhook(body: &[u8], secret: &[u8]) -> String {
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret),
        body,
    );
    hex::encode(tag.as_ref())
}

/// Verify a webhook body against the hex signature from [`SIGNATURE_HEADER`].
///
/// The comparison is constant-time. An empty secret never verifies, even
/// if the sender signed with an empty key.
pub fn verify_webhook(body: &[u8], signature: &str, secret: &[u8]) -> Result<(), SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::EmptySecret);
    }
    let signature_bytes =
        hex::decode(signature.trim()).map_err(|_| SignatureError::InvalidEncoding)?;
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret),
        body,
        &signature_bytes,
    )?;
    Ok(())
}
