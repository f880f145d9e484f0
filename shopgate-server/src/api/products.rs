//! Product listing, search, and lookup endpoints.

use axum::extract::State;
use serde_json::Map;
use shopgate_core::services::{Collection, SearchQuery, ServiceError};
use shopgate_sdk::objects::{Envelope, ProductSummary, to_items};

use super::endpoint::{Endpoint, EnvelopeResponse, limit, require_param};
use super::extractors::RequestContext;
use crate::state::AppState;

const NEW_ARRIVALS: Endpoint = Endpoint::new("new_arrivals", "Failed to retrieve new arrivals");
const MENS: Endpoint = Endpoint::new("mens_products", "Failed to retrieve men's products");
const WOMENS: Endpoint = Endpoint::new("womens_products", "Failed to retrieve women's products");
const SEARCH: Endpoint = Endpoint::new("search_products", "Failed to search products");
const PRODUCT: Endpoint = Endpoint::new("product", "Failed to retrieve product");

fn listing(products: &[ProductSummary], context: Map<String, serde_json::Value>) -> Result<Envelope, ServiceError> {
    Ok(Envelope::success(to_items(products)?, context))
}

fn count_context(count: usize) -> Map<String, serde_json::Value> {
    let mut context = Map::new();
    context.insert("count".to_owned(), count.into());
    context
}

/// `GET /getNewArrivals?limit=6`
pub(super) async fn get_new_arrivals(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    NEW_ARRIVALS
        .handle(&ctx, |ctx| Ok(limit(ctx, 6)), |limit| async move {
            let products = state.products.new_arrivals(limit).await?;
            listing(&products, count_context(products.len()))
        })
        .await
}

/// `GET /getMensProducts?limit=15`
pub(super) async fn get_mens_products(
    state: State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    collection(MENS, Collection::Mens, state, ctx).await
}

/// `GET /getWomensProducts?limit=15`
pub(super) async fn get_womens_products(
    state: State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    collection(WOMENS, Collection::Womens, state, ctx).await
}

async fn collection(
    endpoint: Endpoint,
    collection: Collection,
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    endpoint
        .handle(&ctx, |ctx| Ok(limit(ctx, 15)), |limit| async move {
            let products = state.products.collection(collection, limit).await?;
            listing(&products, count_context(products.len()))
        })
        .await
}

/// `GET /searchProducts?q=...&category=...&limit=10`
pub(super) async fn search_products(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    SEARCH
        .handle(
            &ctx,
            |ctx| {
                Ok(SearchQuery {
                    query: require_param(ctx, &["q", "query"], "Search query is required")?,
                    category: ctx.query.get("category").map(str::to_owned),
                    limit: limit(ctx, 10),
                })
            },
            |query| async move {
                let mut context = Map::new();
                context.insert("query".to_owned(), query.query.clone().into());
                if let Some(category) = &query.category {
                    context.insert("category".to_owned(), category.clone().into());
                }
                let products = state.products.search(query).await?;
                context.insert("count".to_owned(), products.len().into());
                listing(&products, context)
            },
        )
        .await
}

/// `GET /getProduct?id=...`
pub(super) async fn get_product(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> EnvelopeResponse {
    PRODUCT
        .handle(
            &ctx,
            |ctx| require_param(ctx, &["id"], "Product ID is required"),
            |id| async move {
                let product = state
                    .products
                    .product(&id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))?;
                let mut context = Map::new();
                context.insert("productId".to_owned(), id.into());
                listing(std::slice::from_ref(&product), context)
            },
        )
        .await
}
