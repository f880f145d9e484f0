//! Request processors.
//!
//! - `WebhookIntake`: verifies, deduplicates, and persists Razorpay webhook
//!   deliveries

pub mod webhook_intake;

pub use webhook_intake::{IntakeOutcome, WebhookDelivery, WebhookIntake};
