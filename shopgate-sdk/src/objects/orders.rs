//! Order query inputs shared by the gateway and its clients.

use serde::{Deserialize, Serialize};

/// Maximum number of order ids accepted by one multiple-status lookup.
pub const MAX_ORDER_IDS: usize = 10;

/// A list of order ids as callers send it: either one comma-separated
/// string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderIdsInput {
    Joined(String),
    List(Vec<String>),
}

impl OrderIdsInput {
    /// Normalised ids: trimmed, empty entries dropped, order preserved.
    pub fn ids(&self) -> Vec<String> {
        let clean = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_owned())
        };
        match self {
            OrderIdsInput::Joined(joined) => joined.split(',').filter_map(clean).collect(),
            OrderIdsInput::List(list) => list.iter().filter_map(|s| clean(s)).collect(),
        }
    }
}

/// Parse an optional order-id list. Absent input yields an empty list;
/// whether that is an error is up to the caller.
pub fn parse_order_ids(input: Option<&OrderIdsInput>) -> Vec<String> {
    input.map(OrderIdsInput::ids).unwrap_or_default()
}
