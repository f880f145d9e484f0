//! Collaborators the gateway delegates to.
//!
//! Order aggregation, product lookup, and search indexing all live on the
//! hosted platform. Handlers depend on the traits here; [`UpstreamClient`]
//! implements them over HTTP and tests substitute in-memory fakes.

mod orders;
mod products;
mod search;
mod upstream;

pub use orders::{
    LastOrdersQuery, MultipleOrderStatusQuery, OrderLookup, OrderService, OrdersByStatusQuery,
    RecentOrdersQuery, UserOrdersQuery,
};
pub use products::{Collection, ProductCatalog, SearchQuery};
pub use search::SearchIndexer;
pub use upstream::UpstreamClient;

use reqwest::StatusCode;
use shopgate_sdk::objects::Envelope;
use thiserror::Error;

/// Errors from a collaborator call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level failure (DNS, TLS, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream path could not be joined onto the base URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The upstream answered with an unexpected status and no envelope.
    #[error("upstream error: status {status}, body: {body}")]
    Upstream { status: StatusCode, body: String },

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// What the order service returns for every operation.
pub type ServiceResult = Result<Envelope, ServiceError>;
