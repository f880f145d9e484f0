//! HTTP endpoints.
//!
//! Every endpoint answers with the `{success, metric_value, context}`
//! envelope except the webhook, which answers with a [`WebhookAck`].
//!
//! # Endpoints
//!
//! - `POST /razorpayWebhook`        – payment event intake
//! - `POST /syncSearchIndex`        – rebuild the search index
//! - `GET  /getNewArrivals`         – newest products
//! - `GET  /getMensProducts`        – men's collection
//! - `GET  /getWomensProducts`      – women's collection
//! - `GET  /searchProducts`         – full-text product search
//! - `GET  /getProduct`             – one product by id
//! - `GET  /getOrderItems`          – line items of an order
//! - `GET  /getOrderSummary`        – summary of an order
//! - `GET  /getOrderStatus`         – status of an order (200 on lookup failure)
//! - `GET  /getUserOrders`          – a user's orders, paginated
//! - `GET  /getMultipleOrderStatus` – status of up to 10 orders
//! - `GET  /getLastOrders`          – a user's last N orders
//! - `GET  /getRecentOrders`        – a user's orders from the last N days
//! - `GET  /getOrdersByStatus`      – a user's orders in one status
//! - `GET  /getUserOrderStats`      – a user's order statistics
//!
//! [`WebhookAck`]: shopgate_sdk::objects::WebhookAck

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod endpoint;
mod extractors;
mod orders;
mod products;
mod search;
mod webhook;


/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/razorpayWebhook", post(webhook::razorpay_webhook))
        .route("/syncSearchIndex", post(search::sync_search_index))
        .route("/getNewArrivals", get(products::get_new_arrivals))
        .route("/getMensProducts", get(products::get_mens_products))
        .route("/getWomensProducts", get(products::get_womens_products))
        .route("/searchProducts", get(products::search_products))
        .route("/getProduct", get(products::get_product))
        .route("/getOrderItems", get(orders::get_order_items))
        .route("/getOrderSummary", get(orders::get_order_summary))
        .route("/getOrderStatus", get(orders::get_order_status))
        .route("/getUserOrders", get(orders::get_user_orders))
        .route(
            "/getMultipleOrderStatus",
            get(orders::get_multiple_order_status),
        )
        .route("/getLastOrders", get(orders::get_last_orders))
        .route("/getRecentOrders", get(orders::get_recent_orders))
        .route("/getOrdersByStatus", get(orders::get_orders_by_status))
        .route("/getUserOrderStats", get(orders::get_user_order_stats))
}
