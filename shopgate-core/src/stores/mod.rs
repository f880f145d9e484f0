//! Durable storage for webhook events.
//!
//! The intake processor only sees the [`WebhookEventStore`] trait. The
//! store, not the processor, is the authority on uniqueness: `insert` must
//! report [`InsertOutcome::AlreadyExists`] rather than write a second row
//! for an event id.

mod memory;
mod postgres;

pub use memory::MemoryWebhookEventStore;
pub use postgres::PgWebhookEventStore;

use crate::entities::webhook_events::{InsertOutcome, NewWebhookEvent, WebhookEventRecord};
use thiserror::Error;

/// Errors raised by a webhook event store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed get/insert access to webhook events.
#[async_trait::async_trait]
pub trait WebhookEventStore: Send + Sync {
    /// Fetch the event stored under `event_id`.
    async fn find(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, StoreError>;

    /// Insert `event` unless its event id is already present.
    async fn insert(&self, event: NewWebhookEvent) -> Result<InsertOutcome, StoreError>;
}
