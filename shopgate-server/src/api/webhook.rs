//! Razorpay webhook intake.
//!
//! Always answers 200: Razorpay retries any other status, and a bad
//! signature or internal failure must not trigger redelivery storms. The
//! ack body tells the outcomes apart.

use axum::{
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode},
};
use bytes::Bytes;
use kanau::processor::Processor;
use shopgate_core::processors::{IntakeOutcome, WebhookDelivery};
use shopgate_sdk::objects::{WebhookAck, WebhookAckStatus};
use shopgate_sdk::signature::{EVENT_ID_HEADER, SIGNATURE_HEADER};

use super::endpoint::JsonResponse;
use crate::state::AppState;

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// `POST /razorpayWebhook`
///
/// A body that cannot be buffered (too large, aborted mid-stream) is
/// acknowledged as ignored rather than surfacing axum's 4xx rejection.
pub(super) async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> JsonResponse<WebhookAck> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(
                status = %rejection.status(),
                error = %rejection.body_text(),
                "Webhook body could not be read"
            );
            return reply(false, WebhookAckStatus::Ignored, "Unreadable request body");
        }
    };
    let delivery = WebhookDelivery {
        event_id: header(&headers, EVENT_ID_HEADER),
        signature: header(&headers, SIGNATURE_HEADER),
        body,
    };
    let Ok(outcome) = state.webhook_intake.process(delivery).await;

    let (success, status, message) = ack(outcome);
    reply(success, status, message)
}

fn ack(outcome: IntakeOutcome) -> (bool, WebhookAckStatus, &'static str) {
    match outcome {
        IntakeOutcome::Persisted { .. } => (
            true,
            WebhookAckStatus::Processed,
            "Webhook processed successfully",
        ),
        IntakeOutcome::Duplicate { .. } => {
            (true, WebhookAckStatus::Duplicate, "Event already processed")
        }
        IntakeOutcome::InvalidSignature { .. } => {
            (false, WebhookAckStatus::Ignored, "Invalid signature")
        }
        IntakeOutcome::MissingEventId => (false, WebhookAckStatus::Ignored, "Missing event id"),
        IntakeOutcome::Deferred { .. } => (
            false,
            WebhookAckStatus::Deferred,
            "Webhook received, processing deferred",
        ),
    }
}

fn reply(success: bool, status: WebhookAckStatus, message: &str) -> JsonResponse<WebhookAck> {
    JsonResponse {
        status: StatusCode::OK,
        body: WebhookAck {
            success,
            status,
            message: message.to_owned(),
        },
    }
}
