pub mod envelope;
pub mod orders;
pub mod products;
pub mod webhook;

pub use envelope::{CONTEXT_TYPE_KEY, Envelope, ErrorCode, to_items};
pub use orders::{MAX_ORDER_IDS, OrderIdsInput, parse_order_ids};
pub use products::{ProductSummary, SyncReport};
pub use webhook::{
    EntityWrapper, OrderEntity, PaymentEntity, RazorpayEventPayload, RazorpayWebhookPayload,
    WebhookAck, WebhookAckStatus,
};
