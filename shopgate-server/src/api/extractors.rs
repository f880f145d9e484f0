//! Request-context extraction.
//!
//! Provides:
//! - `QueryParams`: the raw query string as an ordered multi-map.
//! - `RequestContext`: user id, bot flag, and query parameters for one
//!   request. Extraction never fails; absent values are `None`.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::USER_AGENT, request::Parts},
};
use shopgate_sdk::objects::{OrderIdsInput, parse_order_ids};
use std::convert::Infallible;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const BOT_HEADER: &str = "x-bot-request";

/// Query parameter names accepted for the user id, in priority order.
const USER_ID_PARAMS: [&str; 2] = ["userId", "user_id"];

/// User-agent fragments (lowercase) that mark automated callers.
const BOT_AGENT_MARKERS: [&str; 2] = ["bot", "ai-customer-service"];

// ---------------------------------------------------------------------------
// QueryParams
// ---------------------------------------------------------------------------

/// Decoded query parameters. Repeated keys are kept in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for `key`, trimmed. Blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).next()
    }

    /// Every non-blank value for `key`, trimmed, in request order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Value of the first key in `keys` that is present.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// `key` as an integer; absent or unparsable values give `default`.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// `true` for `true`, `1`, or `yes` (any case); anything else is `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Order ids from `key`, accepting both `a,b,c` and repeated keys.
    pub fn order_ids(&self, key: &str) -> Vec<String> {
        let values: Vec<String> = self.get_all(key).map(str::to_owned).collect();
        if values.is_empty() {
            return parse_order_ids(None);
        }
        parse_order_ids(Some(&OrderIdsInput::Joined(values.join(","))))
    }
}

fn is_truthy(value: &str) -> bool {
    ["true", "1", "yes"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

// ---------------------------------------------------------------------------
// User id and bot classification
// ---------------------------------------------------------------------------

/// The caller's user id: the `X-User-Id` header, else `userId`, else
/// `user_id` from the query string.
pub fn extract_user_id(headers: &HeaderMap, query: &QueryParams) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| query.first_of(&USER_ID_PARAMS))
        .map(str::to_owned)
}

/// Whether the request comes from an automated assistant. Only used for
/// logging.
pub fn is_bot_request(headers: &HeaderMap) -> bool {
    let flagged = headers
        .get(BOT_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| is_truthy(v.trim()));
    if flagged {
        return true;
    }
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|agent| {
            let agent = agent.to_ascii_lowercase();
            BOT_AGENT_MARKERS.iter().any(|m| agent.contains(m))
        })
}

// ---------------------------------------------------------------------------
// RequestContext
// ---------------------------------------------------------------------------

/// Per-request context shared by every query endpoint.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<String>,
    pub is_bot: bool,
    pub query: QueryParams,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        let query = QueryParams::parse(parts.uri.query());
        Self {
            user_id: extract_user_id(&parts.headers, &query),
            is_bot: is_bot_request(&parts.headers),
            query,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn context(uri: &str, headers: &[(&'static str, &'static str)]) -> RequestContext {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let (parts, ()) = request.body(()).unwrap().into_parts();
        RequestContext::from_parts(&parts)
    }

    #[test]
    fn header_user_id_beats_query() {
        let ctx = context("/getUserOrders?userId=from-query", &[("x-user-id", "from-header")]);
        assert_eq!(ctx.user_id.as_deref(), Some("from-header"));
    }

    #[test]
    fn user_id_query_names_in_order() {
        let ctx = context("/x?user_id=snake&userId=camel", &[]);
        assert_eq!(ctx.user_id.as_deref(), Some("camel"));

        let ctx = context("/x?user_id=snake", &[]);
        assert_eq!(ctx.user_id.as_deref(), Some("snake"));

        let ctx = context("/x?userId=%20%20", &[("x-user-id", " ")]);
        assert_eq!(ctx.user_id, None);
    }

    #[test]
    fn bot_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_bot_request(&headers));

        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        assert!(!is_bot_request(&headers));

        headers.insert(USER_AGENT, HeaderValue::from_static("Shop-AI-Customer-Service/4.0"));
        assert!(is_bot_request(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(BOT_HEADER, HeaderValue::from_static("TRUE"));
        assert!(is_bot_request(&headers));
    }

    #[test]
    fn numbers_fall_back_on_garbage() {
        let query = QueryParams::parse(Some("limit=abc&count=7&days="));
        assert_eq!(query.int_or("limit", 6), 6);
        assert_eq!(query.int_or("count", 1), 7);
        assert_eq!(query.int_or("days", 30), 30);
    }

    #[test]
    fn flags() {
        let query = QueryParams::parse(Some("includeItems=True&includeRenderTypes=no"));
        assert!(query.flag("includeItems"));
        assert!(!query.flag("includeRenderTypes"));
        assert!(!query.flag("missing"));
    }

    #[test]
    fn order_ids_from_joined_and_repeated_keys() {
        let query = QueryParams::parse(Some("orderIds=a,%20b%20,,c"));
        assert_eq!(query.order_ids("orderIds"), vec!["a", "b", "c"]);

        let query = QueryParams::parse(Some("orderIds=a&orderIds=b,c"));
        assert_eq!(query.order_ids("orderIds"), vec!["a", "b", "c"]);

        assert!(QueryParams::parse(None).order_ids("orderIds").is_empty());
    }
}
