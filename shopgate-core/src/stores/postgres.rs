use super::{StoreError, WebhookEventStore};
use crate::entities::webhook_events::{
    GetWebhookEventById, InsertOutcome, InsertWebhookEvent, NewWebhookEvent, WebhookEventRecord,
};
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use sqlx::PgPool;

/// [`WebhookEventStore`] backed by the `webhook_events` table.
pub struct PgWebhookEventStore {
    processor: DatabaseProcessor,
}

impl PgWebhookEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor { pool },
        }
    }
}

#[async_trait::async_trait]
impl WebhookEventStore for PgWebhookEventStore {
    async fn find(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, StoreError> {
        Ok(self
            .processor
            .process(GetWebhookEventById {
                event_id: event_id.to_owned(),
            })
            .await?)
    }

    async fn insert(&self, event: NewWebhookEvent) -> Result<InsertOutcome, StoreError> {
        Ok(self.processor.process(InsertWebhookEvent { event }).await?)
    }
}
