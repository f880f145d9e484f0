//! Order query endpoints, backed by the order service.
//!
//! Order lookups by id accept an optional user id; history endpoints
//! require one.

use axum::extract::State;
use shopgate_core::services::{
    LastOrdersQuery, MultipleOrderStatusQuery, OrderLookup, OrdersByStatusQuery,
    RecentOrdersQuery, UserOrdersQuery,
};
use shopgate_sdk::objects::MAX_ORDER_IDS;

use super::endpoint::{
    Endpoint, EnvelopeResponse, Rejection, bounded, limit, offset, require_param, require_user,
};
use super::extractors::RequestContext;
use crate::state::AppState;

const ORDER_ITEMS: Endpoint = Endpoint::new("order_items", "Failed to retrieve order items");
const ORDER_SUMMARY: Endpoint = Endpoint::new("order_summary", "Failed to retrieve order summary");
/// Lookup failures are a 200 here, unlike the sibling endpoints.
const ORDER_STATUS: Endpoint = Endpoint::lenient("order_status", "Failed to retrieve order status");
const USER_ORDERS: Endpoint = Endpoint::new("user_orders", "Failed to retrieve user orders");
const MULTIPLE_STATUS: Endpoint = Endpoint::new(
    "multiple_order_status",
    "Failed to retrieve multiple order status",
);
const LAST_ORDERS: Endpoint = Endpoint::new("last_orders", "Failed to retrieve last orders");
const RECENT_ORDERS: Endpoint = Endpoint::new("recent_orders", "Failed to retrieve recent orders");
const ORDERS_BY_STATUS: Endpoint =
    Endpoint::new("orders_by_status", "Failed to retrieve orders by status");
const USER_ORDER_STATS: Endpoint =
    Endpoint::new("user_order_stats", "Failed to retrieve order statistics");

fn order_lookup(ctx: &RequestContext) -> Result<OrderLookup, Rejection> {
    Ok(OrderLookup {
        order_id: require_param(ctx, &["orderId"], "Order ID is required")?,
        user_id: ctx.user_id.clone(),
    })
}

/// `GET /getOrderItems?orderId=...`
pub(super) async fn get_order_items(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    ORDER_ITEMS
        .handle(&ctx, order_lookup, |lookup| async move {
            let order_id = lookup.order_id.clone();
            let reply = state.orders.order_items(lookup).await?;
            Ok(reply.with_context("orderId", order_id))
        })
        .await
}

/// `GET /getOrderSummary?orderId=...`
pub(super) async fn get_order_summary(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    ORDER_SUMMARY
        .handle(&ctx, order_lookup, |lookup| async move {
            let order_id = lookup.order_id.clone();
            let reply = state.orders.order_summary(lookup).await?;
            Ok(reply.with_context("orderId", order_id))
        })
        .await
}

/// `GET /getOrderStatus?orderId=...`
///
/// Answers from the order summary.
pub(super) async fn get_order_status(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    ORDER_STATUS
        .handle(&ctx, order_lookup, |lookup| async move {
            let order_id = lookup.order_id.clone();
            let reply = state.orders.order_summary(lookup).await?;
            Ok(reply.with_context("orderId", order_id))
        })
        .await
}

/// `GET /getUserOrders?limit=20&offset=0&includeItems=false`
pub(super) async fn get_user_orders(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    USER_ORDERS
        .handle(
            &ctx,
            |ctx| {
                Ok(UserOrdersQuery {
                    user_id: require_user(ctx)?,
                    limit: limit(ctx, 20),
                    offset: offset(ctx),
                    include_items: ctx.query.flag("includeItems"),
                })
            },
            |query| async move {
                let user_id = query.user_id.clone();
                let reply = state.orders.user_orders(query).await?;
                Ok(reply.with_context("userId", user_id))
            },
        )
        .await
}

/// `GET /getMultipleOrderStatus?orderIds=a,b,c`
pub(super) async fn get_multiple_order_status(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    MULTIPLE_STATUS
        .handle(
            &ctx,
            |ctx| {
                let order_ids = ctx.query.order_ids("orderIds");
                if order_ids.is_empty() {
                    return Err(Rejection::missing_parameter("Order IDs list is required"));
                }
                if order_ids.len() > MAX_ORDER_IDS {
                    return Err(Rejection::too_many_orders(MAX_ORDER_IDS));
                }
                Ok(MultipleOrderStatusQuery {
                    order_ids,
                    user_id: ctx.user_id.clone(),
                })
            },
            |query| async move {
                let order_ids = query.order_ids.clone();
                let reply = state.orders.multiple_order_status(query).await?;
                Ok(reply.with_context("orderIds", order_ids))
            },
        )
        .await
}

/// `GET /getLastOrders?count=1&includeRenderTypes=false`
pub(super) async fn get_last_orders(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    LAST_ORDERS
        .handle(
            &ctx,
            |ctx| {
                Ok(LastOrdersQuery {
                    user_id: require_user(ctx)?,
                    count: bounded(ctx, "count", 1, 1..=20, "Count must be between 1 and 20")?,
                    include_render_types: ctx.query.flag("includeRenderTypes"),
                })
            },
            |query| async move {
                let count = query.count;
                let reply = state.orders.last_orders(query).await?;
                Ok(reply.with_context("count", count))
            },
        )
        .await
}

/// `GET /getRecentOrders?days=30`
pub(super) async fn get_recent_orders(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    RECENT_ORDERS
        .handle(
            &ctx,
            |ctx| {
                Ok(RecentOrdersQuery {
                    user_id: require_user(ctx)?,
                    days: bounded(ctx, "days", 30, 1..=365, "Days must be between 1 and 365")?,
                })
            },
            |query| async move {
                let days = query.days;
                let reply = state.orders.recent_orders(query).await?;
                Ok(reply.with_context("days", days))
            },
        )
        .await
}

/// `GET /getOrdersByStatus?status=...&limit=10`
pub(super) async fn get_orders_by_status(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    ORDERS_BY_STATUS
        .handle(
            &ctx,
            |ctx| {
                Ok(OrdersByStatusQuery {
                    user_id: require_user(ctx)?,
                    status: require_param(ctx, &["status"], "Status is required")?,
                    limit: limit(ctx, 10),
                })
            },
            |query| async move {
                let status = query.status.clone();
                let reply = state.orders.orders_by_status(query).await?;
                Ok(reply.with_context("status", status))
            },
        )
        .await
}

/// `GET /getUserOrderStats`
pub(super) async fn get_user_order_stats(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    USER_ORDER_STATS
        .handle(&ctx, require_user, |user_id| async move {
            state.orders.user_order_stats(user_id).await
        })
        .await
}
