use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use serde::Deserialize;
use serde_json::Value;
use shopgate_sdk::objects::RazorpayWebhookPayload;

/// A persisted webhook delivery. Created once per event id, never updated.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WebhookEventRecord {
    pub event_id: String,
    pub event_type: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub payload: Value,
    pub received_at: time::OffsetDateTime,
}

/// Data for inserting a new webhook event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWebhookEvent {
    pub event_id: String,
    pub event_type: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub payload: Value,
    pub received_at: time::OffsetDateTime,
}

impl NewWebhookEvent {
    /// Build an insert from the raw (already verified) request body.
    ///
    /// The body is kept verbatim as `payload`; `order_id`, `payment_id`
    /// and `status` are read from the payment entity first and the order
    /// entity second.
    pub fn from_body(event_id: &str, body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload: Value = serde_json::from_slice(body)?;
        let parsed = RazorpayWebhookPayload::deserialize(&payload)?;
        Ok(Self {
            event_id: event_id.to_owned(),
            event_type: parsed.event.clone(),
            order_id: parsed.order_id().map(str::to_owned),
            payment_id: parsed.payment_id().map(str::to_owned),
            status: parsed.status().map(str::to_owned),
            payload,
            received_at: time::OffsetDateTime::now_utc(),
        })
    }

    pub fn into_record(self) -> WebhookEventRecord {
        WebhookEventRecord {
            event_id: self.event_id,
            event_type: self.event_type,
            order_id: self.order_id,
            payment_id: self.payment_id,
            status: self.status,
            payload: self.payload,
            received_at: self.received_at,
        }
    }
}

/// Whether an insert wrote a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same event id already exists.
    AlreadyExists,
}

#[derive(Debug, Clone)]
/// Look up a webhook event by its provider event id.
pub struct GetWebhookEventById {
    pub event_id: String,
}

impl Processor<GetWebhookEventById> for DatabaseProcessor {
    type Output = Option<WebhookEventRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetWebhookEventById")]
    async fn process(
        &self,
        query: GetWebhookEventById,
    ) -> Result<Option<WebhookEventRecord>, sqlx::Error> {
        sqlx::query_as::<_, WebhookEventRecord>(
            r#"
            SELECT event_id, event_type, order_id, payment_id, status, payload, received_at
            FROM webhook_events
            WHERE event_id = $1
            "#,
        )
        .bind(query.event_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Insert a webhook event.
///
/// Uses ON CONFLICT DO NOTHING on the primary key, so concurrent
/// deliveries of the same event id write at most one row.
pub struct InsertWebhookEvent {
    pub event: NewWebhookEvent,
}

impl Processor<InsertWebhookEvent> for DatabaseProcessor {
    type Output = InsertOutcome;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertWebhookEvent")]
    async fn process(&self, insert: InsertWebhookEvent) -> Result<InsertOutcome, sqlx::Error> {
        let NewWebhookEvent {
            event_id,
            event_type,
            order_id,
            payment_id,
            status,
            payload,
            received_at,
        } = insert.event;

        let result = sqlx::query(
            r#"
            INSERT INTO webhook_events
                (event_id, event_type, order_id, payment_id, status, payload, received_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(event_type)
        .bind(order_id)
        .bind(payment_id)
        .bind(status)
        .bind(payload)
        .bind(received_at)
        .execute(&self.pool)
        .await?;

        Ok(if result.rows_affected() == 0 {
            InsertOutcome::AlreadyExists
        } else {
            InsertOutcome::Inserted
        })
    }
}
