//! Razorpay webhook payload types and the gateway's acknowledgement body.

use serde::{Deserialize, Serialize};

/// Top-level body of a Razorpay webhook delivery.
///
/// Only the fields the gateway reads are typed. The full body is always
/// stored as opaque JSON next to the derived columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RazorpayWebhookPayload {
    /// Event type, e.g. `payment.captured` or `order.paid`.
    pub event: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub contains: Vec<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub payload: RazorpayEventPayload,
}

/// The `payload` object; which entities are present depends on the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RazorpayEventPayload {
    #[serde(default)]
    pub payment: Option<EntityWrapper<PaymentEntity>>,
    #[serde(default)]
    pub order: Option<EntityWrapper<OrderEntity>>,
}

/// Razorpay nests every entity under an `entity` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
}

impl RazorpayWebhookPayload {
    fn payment(&self) -> Option<&PaymentEntity> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }

    fn order(&self) -> Option<&OrderEntity> {
        self.payload.order.as_ref().map(|o| &o.entity)
    }

    /// The order this event refers to: `payment.order_id`, else `order.id`.
    pub fn order_id(&self) -> Option<&str> {
        self.payment()
            .and_then(|p| p.order_id.as_deref())
            .or_else(|| self.order().and_then(|o| o.id.as_deref()))
    }

    /// The payment id, present only on payment events.
    pub fn payment_id(&self) -> Option<&str> {
        self.payment().and_then(|p| p.id.as_deref())
    }

    /// The entity status: `payment.status`, else `order.status`.
    pub fn status(&self) -> Option<&str> {
        self.payment()
            .and_then(|p| p.status.as_deref())
            .or_else(|| self.order().and_then(|o| o.status.as_deref()))
    }
}

/// What the gateway did with a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookAckStatus {
    /// Verified and persisted.
    Processed,
    /// The event id was seen before.
    Duplicate,
    /// Not trusted (bad signature or no event id); nothing stored.
    Ignored,
    /// An internal failure; logged server-side only.
    Deferred,
}

/// Body of every webhook response. The HTTP status is always 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
    pub status: WebhookAckStatus,
    pub message: String,
}
