//! Search index maintenance.

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Map;
use shopgate_sdk::objects::Envelope;

use super::endpoint::{Endpoint, EnvelopeResponse};
use super::extractors::RequestContext;
use crate::state::AppState;

const SEARCH_SYNC: Endpoint = Endpoint::new("search_sync", "Failed to sync search index")
    .with_failure_status(StatusCode::INTERNAL_SERVER_ERROR);

/// `POST /syncSearchIndex`: rebuild the product search index.
///
/// `metric_value` holds a single `{indexed, removed}` report.
pub(super) async fn sync_search_index(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    SEARCH_SYNC
        .handle(&ctx, |_| Ok(()), |()| async move {
            let report = state.search.sync().await?;
            tracing::info!(indexed = report.indexed, removed = report.removed, "Search index synced");
            Ok(Envelope::success(vec![serde_json::to_value(report)?], Map::new()))
        })
        .await
}
