//! WebhookIntake processor.
//!
//! The WebhookIntake is responsible for:
//! - Ignoring deliveries without an event id
//! - Short-circuiting event ids that are already stored
//! - Verifying the signature over the raw body
//! - Persisting the event exactly once per event id
//!
//! It never fails: every internal error is logged and reported as
//! [`IntakeOutcome::Deferred`], so the provider always gets a 200 and the
//! delivery can be reconciled from the logs.

use crate::entities::webhook_events::{InsertOutcome, NewWebhookEvent};
use crate::stores::{StoreError, WebhookEventStore};
use crate::verification::SignatureVerifier;
use bytes::Bytes;
use kanau::processor::Processor;
use std::convert::Infallible;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// One inbound webhook request, as read off the wire.
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    pub event_id: Option<String>,
    pub signature: Option<String>,
    /// Raw body bytes; the signature covers exactly these.
    pub body: Bytes,
}

/// What happened to a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// No event id header; nothing to deduplicate on, nothing stored.
    MissingEventId,
    /// This event id is already stored.
    Duplicate { event_id: String },
    /// Signature missing or wrong; nothing stored.
    InvalidSignature { event_id: String },
    /// Verified and stored.
    Persisted { event_id: String },
    /// An internal failure; the delivery was not stored.
    Deferred { event_id: String },
}

#[derive(Debug, Error)]
enum IntakeError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Processes Razorpay webhook deliveries.
#[derive(Clone)]
pub struct WebhookIntake {
    store: Arc<dyn WebhookEventStore>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl WebhookIntake {
    pub fn new(store: Arc<dyn WebhookEventStore>, verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { store, verifier }
    }

    async fn intake(&self, event_id: String, delivery: WebhookDelivery) -> Result<IntakeOutcome, IntakeError> {
        // Cheap short-circuit for retries; the insert below is still the
        // authority when two deliveries race past this check.
        if self.store.find(&event_id).await?.is_some() {
            debug!(event_id = %event_id, "Webhook event already stored");
            return Ok(IntakeOutcome::Duplicate { event_id });
        }

        let verified = match delivery.signature.as_deref() {
            Some(signature) => self.verifier.verify(signature, &delivery.body).await,
            None => false,
        };
        if !verified {
            warn!(event_id = %event_id, "Webhook signature invalid or missing");
            return Ok(IntakeOutcome::InvalidSignature { event_id });
        }

        let event = NewWebhookEvent::from_body(&event_id, &delivery.body)?;
        let event_type = event.event_type.clone();
        match self.store.insert(event).await? {
            InsertOutcome::Inserted => {
                info!(event_id = %event_id, event_type = %event_type, "Webhook event persisted");
                Ok(IntakeOutcome::Persisted { event_id })
            }
            InsertOutcome::AlreadyExists => {
                debug!(event_id = %event_id, "Webhook event stored concurrently");
                Ok(IntakeOutcome::Duplicate { event_id })
            }
        }
    }
}

impl Processor<WebhookDelivery> for WebhookIntake {
    type Output = IntakeOutcome;
    type Error = Infallible;
    #[tracing::instrument(skip_all, name = "WebhookIntake")]
    async fn process(&self, delivery: WebhookDelivery) -> Result<IntakeOutcome, Infallible> {
        let Some(event_id) = delivery
            .event_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
        else {
            warn!("Webhook delivery without event id ignored");
            return Ok(IntakeOutcome::MissingEventId);
        };

        match self.intake(event_id.clone(), delivery).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(event_id = %event_id, error = %e, "Failed to process webhook delivery");
                Ok(IntakeOutcome::Deferred { event_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::webhook_events::WebhookEventRecord;
    use crate::stores::MemoryWebhookEventStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GOOD: &str = "good-signature";
    const BODY: &[u8] = br#"{"event":"payment.captured","payload":{"payment":{"entity":{"id":"pay_1","order_id":"order_1","status":"captured"}}}}"#;

    struct FixedVerifier;

    #[async_trait::async_trait]
    impl SignatureVerifier for FixedVerifier {
        async fn verify(&self, signature: &str, _body: &[u8]) -> bool {
            signature == GOOD
        }
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl WebhookEventStore for BrokenStore {
        async fn find(&self, _event_id: &str) -> Result<Option<WebhookEventRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_owned()))
        }

        async fn insert(&self, _event: NewWebhookEvent) -> Result<InsertOutcome, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_owned()))
        }
    }

    /// Counts inserts that actually wrote a row.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryWebhookEventStore,
        inserted: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl WebhookEventStore for CountingStore {
        async fn find(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, StoreError> {
            self.inner.find(event_id).await
        }

        async fn insert(&self, event: NewWebhookEvent) -> Result<InsertOutcome, StoreError> {
            let outcome = self.inner.insert(event).await?;
            if outcome == InsertOutcome::Inserted {
                self.inserted.fetch_add(1, Ordering::SeqCst);
            }
            Ok(outcome)
        }
    }

    fn delivery(event_id: Option<&str>, signature: Option<&str>) -> WebhookDelivery {
        WebhookDelivery {
            event_id: event_id.map(str::to_owned),
            signature: signature.map(str::to_owned),
            body: Bytes::from_static(BODY),
        }
    }

    fn intake(store: Arc<dyn WebhookEventStore>) -> WebhookIntake {
        WebhookIntake::new(store, Arc::new(FixedVerifier))
    }

    async fn run(intake: &WebhookIntake, delivery: WebhookDelivery) -> IntakeOutcome {
        let Ok(outcome) = intake.process(delivery).await;
        outcome
    }

    #[tokio::test]
    async fn verified_delivery_is_persisted_once() {
        let store = Arc::new(MemoryWebhookEventStore::new());
        let intake = intake(store.clone());

        assert_eq!(
            run(&intake, delivery(Some("evt_1"), Some(GOOD))).await,
            IntakeOutcome::Persisted { event_id: "evt_1".to_owned() }
        );
        assert_eq!(
            run(&intake, delivery(Some("evt_1"), Some(GOOD))).await,
            IntakeOutcome::Duplicate { event_id: "evt_1".to_owned() }
        );
        assert_eq!(store.len().await, 1);

        let record = store.find("evt_1").await.unwrap().unwrap();
        assert_eq!(record.event_type, "payment.captured");
        assert_eq!(record.order_id.as_deref(), Some("order_1"));
    }

    #[tokio::test]
    async fn duplicate_wins_over_bad_signature() {
        let store = Arc::new(MemoryWebhookEventStore::new());
        let intake = intake(store.clone());
        run(&intake, delivery(Some("evt_2"), Some(GOOD))).await;

        assert_eq!(
            run(&intake, delivery(Some("evt_2"), Some("forged"))).await,
            IntakeOutcome::Duplicate { event_id: "evt_2".to_owned() }
        );
    }

    #[tokio::test]
    async fn invalid_or_missing_signature_stores_nothing() {
        let store = Arc::new(MemoryWebhookEventStore::new());
        let intake = intake(store.clone());

        assert_eq!(
            run(&intake, delivery(Some("evt_3"), Some("forged"))).await,
            IntakeOutcome::InvalidSignature { event_id: "evt_3".to_owned() }
        );
        assert_eq!(
            run(&intake, delivery(Some("evt_3"), None)).await,
            IntakeOutcome::InvalidSignature { event_id: "evt_3".to_owned() }
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn missing_or_blank_event_id_is_ignored() {
        let store = Arc::new(MemoryWebhookEventStore::new());
        let intake = intake(store.clone());

        assert_eq!(run(&intake, delivery(None, Some(GOOD))).await, IntakeOutcome::MissingEventId);
        assert_eq!(
            run(&intake, delivery(Some("  "), Some(GOOD))).await,
            IntakeOutcome::MissingEventId
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn store_failure_is_deferred() {
        let intake = intake(Arc::new(BrokenStore));
        assert_eq!(
            run(&intake, delivery(Some("evt_4"), Some(GOOD))).await,
            IntakeOutcome::Deferred { event_id: "evt_4".to_owned() }
        );
    }

    #[tokio::test]
    async fn malformed_verified_body_is_deferred() {
        let store = Arc::new(MemoryWebhookEventStore::new());
        let intake = intake(store.clone());
        let delivery = WebhookDelivery {
            event_id: Some("evt_5".to_owned()),
            signature: Some(GOOD.to_owned()),
            body: Bytes::from_static(b"not json"),
        };
        assert_eq!(
            run(&intake, delivery).await,
            IntakeOutcome::Deferred { event_id: "evt_5".to_owned() }
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deliveries_persist_exactly_once() {
        let store = Arc::new(CountingStore::default());
        let intake = intake(store.clone());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let intake = intake.clone();
                tokio::spawn(async move { run(&intake, delivery(Some("evt_race"), Some(GOOD))).await })
            })
            .collect();

        let mut persisted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                IntakeOutcome::Persisted { .. } => persisted += 1,
                IntakeOutcome::Duplicate { .. } => {}
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(persisted, 1);
        assert_eq!(store.inserted.load(Ordering::SeqCst), 1);
    }
}
