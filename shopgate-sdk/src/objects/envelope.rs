//! The uniform response envelope returned by every gateway endpoint.
//!
//! ```json
//! {
//!   "success": true,
//!   "metric_value": [ ... ],
//!   "context": { "type": "last_orders", ... }
//! }
//! ```
//!
//! Failures keep the same shape with an empty `metric_value` and add
//! `error` and `code`. The upstream order service speaks the same format,
//! so its replies deserialize into [`Envelope`] directly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the endpoint discriminator inside `context`.
pub const CONTEXT_TYPE_KEY: &str = "type";

/// A `{success, metric_value, context, error?, code?}` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub metric_value: Vec<T>,
    #[serde(default)]
    pub context: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `items`.
    pub fn success(items: Vec<T>, context: Map<String, Value>) -> Self {
        Self {
            success: true,
            metric_value: items,
            context,
            error: None,
            code: None,
        }
    }

    /// A failed envelope for the endpoint `kind`.
    pub fn failure(kind: &str, message: impl Into<String>, code: ErrorCode) -> Self {
        let mut context = Map::new();
        context.insert(CONTEXT_TYPE_KEY.to_owned(), Value::from(kind));
        Self {
            success: false,
            metric_value: Vec::new(),
            context,
            error: Some(message.into()),
            code: Some(code),
        }
    }

    /// The `context.type` discriminator, if present.
    pub fn kind(&self) -> Option<&str> {
        self.context.get(CONTEXT_TYPE_KEY).and_then(Value::as_str)
    }

    /// Set `context.type` unless the envelope already names itself.
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.context
            .entry(CONTEXT_TYPE_KEY)
            .or_insert_with(|| Value::from(kind));
        self
    }

    /// Add (or replace) one `context` entry.
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_owned(), value.into());
        self
    }
}

/// Serialize typed items into `metric_value` elements.
pub fn to_items<T: Serialize>(items: &[T]) -> Result<Vec<Value>, serde_json::Error> {
    items.iter().map(serde_json::to_value).collect()
}

/// Machine-readable failure codes.
///
/// Codes supplied by the upstream service that are not part of this
/// vocabulary are carried verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    MissingParameter,
    MissingUserId,
    InvalidParameter,
    TooManyOrders,
    NotFound,
    ServerError,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::MissingParameter => "MISSING_PARAMETER",
            ErrorCode::MissingUserId => "MISSING_USER_ID",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::TooManyOrders => "TOO_MANY_ORDERS",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::Other(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "MISSING_PARAMETER" => ErrorCode::MissingParameter,
            "MISSING_USER_ID" => ErrorCode::MissingUserId,
            "INVALID_PARAMETER" => ErrorCode::InvalidParameter,
            "TOO_MANY_ORDERS" => ErrorCode::TooManyOrders,
            "NOT_FOUND" => ErrorCode::NotFound,
            "SERVER_ERROR" => ErrorCode::ServerError,
            _ => ErrorCode::Other(value),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(value: ErrorCode) -> Self {
        match value {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_envelope_shape() {
        let envelope: Envelope = Envelope::failure(
            "last_orders",
            "Count must be between 1 and 20",
            ErrorCode::InvalidParameter,
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "metric_value": [],
                "context": { "type": "last_orders" },
                "error": "Count must be between 1 and 20",
                "code": "INVALID_PARAMETER"
            })
        );
    }

    #[test]
    fn success_envelope_omits_error_fields() {
        let envelope: Envelope = Envelope::success(vec![json!({"id": "o1"})], Map::new())
            .with_kind("order_summary");
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("error").is_none());
        assert!(value.get("code").is_none());
        assert_eq!(value["context"]["type"], "order_summary");
    }

    #[test]
    fn with_kind_keeps_upstream_discriminator() {
        let reply: Envelope = serde_json::from_value(json!({
            "success": true,
            "context": { "type": "aggregated_status" }
        }))
        .unwrap();
        assert!(reply.metric_value.is_empty());
        assert_eq!(reply.with_kind("order_status").kind(), Some("aggregated_status"));
    }

    #[test]
    fn unknown_codes_round_trip_verbatim() {
        let reply: Envelope = serde_json::from_value(json!({
            "success": false,
            "error": "Order belongs to another user",
            "code": "ORDER_ACCESS_DENIED"
        }))
        .unwrap();
        assert_eq!(
            reply.code,
            Some(ErrorCode::Other("ORDER_ACCESS_DENIED".to_owned()))
        );
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["code"], "ORDER_ACCESS_DENIED");
    }

    #[test]
    fn known_codes_parse_into_variants() {
        let code: ErrorCode = serde_json::from_value(json!("MISSING_USER_ID")).unwrap();
        assert_eq!(code, ErrorCode::MissingUserId);
        assert_eq!(code.to_string(), "MISSING_USER_ID");
    }
}
