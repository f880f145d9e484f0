use super::{StoreError, WebhookEventStore};
use crate::entities::webhook_events::{InsertOutcome, NewWebhookEvent, WebhookEventRecord};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::Mutex;

/// Process-local [`WebhookEventStore`].
///
/// Inserts are atomic per event id. Contents are lost on restart, so this
/// is meant for local development and tests.
#[derive(Default)]
pub struct MemoryWebhookEventStore {
    events: Mutex<HashMap<String, WebhookEventRecord>>,
}

impl MemoryWebhookEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl WebhookEventStore for MemoryWebhookEventStore {
    async fn find(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, StoreError> {
        Ok(self.events.lock().await.get(event_id).cloned())
    }

    async fn insert(&self, event: NewWebhookEvent) -> Result<InsertOutcome, StoreError> {
        let mut events = self.events.lock().await;
        match events.entry(event.event_id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(event.into_record());
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}
