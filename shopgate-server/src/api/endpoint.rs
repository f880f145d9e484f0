//! The validate → call → envelope pipeline shared by every query endpoint.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::ACCESS_CONTROL_ALLOW_ORIGIN},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use shopgate_core::services::ServiceError;
use shopgate_sdk::objects::{CONTEXT_TYPE_KEY, Envelope, ErrorCode};
use std::future::Future;

use super::extractors::RequestContext;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A JSON body with the CORS header every endpoint sends.
pub struct JsonResponse<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        (
            self.status,
            [(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
            Json(self.body),
        )
            .into_response()
    }
}

pub type EnvelopeResponse = JsonResponse<Envelope>;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A request rejected before any collaborator is called. Always a 400.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: ErrorCode,
    pub message: String,
}

impl Rejection {
    pub fn missing_parameter(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::MissingParameter,
            message: message.into(),
        }
    }

    pub fn missing_user_id() -> Self {
        Self {
            code: ErrorCode::MissingUserId,
            message: "User ID is required".to_owned(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidParameter,
            message: message.into(),
        }
    }

    pub fn too_many_orders(max: usize) -> Self {
        Self {
            code: ErrorCode::TooManyOrders,
            message: format!("Maximum {max} orders can be checked at once"),
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Per-endpoint settings for [`Endpoint::handle`].
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// `context.type` of every envelope this endpoint returns.
    pub kind: &'static str,
    /// Used when a failure carries no message of its own.
    pub failure_message: &'static str,
    /// Status for collaborator failures; validation failures are always 400.
    pub failure_status: StatusCode,
}

impl Endpoint {
    pub const fn new(kind: &'static str, failure_message: &'static str) -> Self {
        Self {
            kind,
            failure_message,
            failure_status: StatusCode::BAD_REQUEST,
        }
    }

    /// Collaborator failures are reported as `200` with `success: false`.
    pub const fn lenient(kind: &'static str, failure_message: &'static str) -> Self {
        Self {
            failure_status: StatusCode::OK,
            ..Self::new(kind, failure_message)
        }
    }

    pub const fn with_failure_status(self, failure_status: StatusCode) -> Self {
        Self {
            failure_status,
            ..self
        }
    }

    /// Validate the request, run `call`, and wrap the result.
    ///
    /// - a [`Rejection`] from `validate` is a 400 and `call` never runs;
    /// - a reply with `success: false` keeps its `error`, `code`, and
    ///   `context`, falling back to `SERVER_ERROR` and `failure_message`;
    /// - [`ServiceError::NotFound`] is a 404 `NOT_FOUND`;
    /// - any other error is `SERVER_ERROR` with `failure_message`.
    #[tracing::instrument(skip_all, fields(endpoint = self.kind, user_id = ?ctx.user_id, bot = ctx.is_bot))]
    pub async fn handle<A, V, C, F>(self, ctx: &RequestContext, validate: V, call: C) -> EnvelopeResponse
    where
        V: FnOnce(&RequestContext) -> Result<A, Rejection>,
        C: FnOnce(A) -> F,
        F: Future<Output = Result<Envelope, ServiceError>>,
    {
        let args = match validate(ctx) {
            Ok(args) => args,
            Err(rejection) => {
                tracing::debug!(code = %rejection.code, message = %rejection.message, "Request rejected");
                return self.respond(
                    StatusCode::BAD_REQUEST,
                    Envelope::failure(self.kind, rejection.message, rejection.code),
                );
            }
        };

        match call(args).await {
            Ok(reply) if reply.success => self.respond(StatusCode::OK, reply),
            Ok(reply) => {
                tracing::info!(code = ?reply.code, error = ?reply.error, "Service reported failure");
                let failure = Envelope {
                    success: false,
                    metric_value: Vec::new(),
                    context: reply.context,
                    error: Some(reply.error.unwrap_or_else(|| self.failure_message.to_owned())),
                    code: Some(reply.code.unwrap_or(ErrorCode::ServerError)),
                };
                self.respond(self.failure_status, failure)
            }
            Err(ServiceError::NotFound(what)) => self.respond(
                StatusCode::NOT_FOUND,
                Envelope::failure(self.kind, what, ErrorCode::NotFound),
            ),
            Err(e) => {
                tracing::error!(error = %e, "Service call failed");
                self.respond(
                    self.failure_status,
                    Envelope::failure(self.kind, self.failure_message, ErrorCode::ServerError),
                )
            }
        }
    }

    /// The endpoint's own discriminator always wins over whatever
    /// `context.type` the collaborator sent.
    fn respond(&self, status: StatusCode, envelope: Envelope) -> EnvelopeResponse {
        JsonResponse {
            status,
            body: envelope.with_context(CONTEXT_TYPE_KEY, Value::from(self.kind)),
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter helpers
// ---------------------------------------------------------------------------

pub const MAX_LIMIT: i64 = 100;
pub const MAX_OFFSET: i64 = 100_000;

/// `limit`, defaulted and clamped to `1..=MAX_LIMIT`.
pub fn limit(ctx: &RequestContext, default: i64) -> i64 {
    ctx.query.int_or("limit", default).clamp(1, MAX_LIMIT)
}

/// `offset`, defaulted to 0 and clamped to `0..=MAX_OFFSET`.
pub fn offset(ctx: &RequestContext) -> i64 {
    ctx.query.int_or("offset", 0).clamp(0, MAX_OFFSET)
}

/// The user id, or a `MISSING_USER_ID` rejection.
pub fn require_user(ctx: &RequestContext) -> Result<String, Rejection> {
    ctx.user_id.clone().ok_or_else(Rejection::missing_user_id)
}

/// A required query parameter, or a `MISSING_PARAMETER` rejection.
pub fn require_param(
    ctx: &RequestContext,
    keys: &[&str],
    message: &str,
) -> Result<String, Rejection> {
    ctx.query
        .first_of(keys)
        .map(str::to_owned)
        .ok_or_else(|| Rejection::missing_parameter(message))
}

/// An integer parameter that must parse and lie in `range` when given.
pub fn bounded(
    ctx: &RequestContext,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    message: &str,
) -> Result<i64, Rejection> {
    let value = match ctx.query.get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Rejection::invalid_parameter(message))?,
        None => default,
    };
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(Rejection::invalid_parameter(message))
    }
}
