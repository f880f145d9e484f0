//! Shared wire types for the Shopgate storefront gateway.
//!
//! - [`objects`]: the response envelope, product and order inputs, and the
//!   Razorpay webhook payload.
//! - [`signature`]: webhook HMAC signing and verification.
//! - `client` (feature `client`): a typed HTTP client for the gateway.

#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
pub mod signature;
