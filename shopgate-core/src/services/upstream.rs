//! HTTP implementation of the collaborator traits.
//!
//! Paths under the configured base URL:
//!
//! - `GET orders/{operation}` for every order-service operation
//! - `GET products/new-arrivals`, `products/collections/{mens|womens}`,
//!   `products/search`, `products/{id}`
//! - `POST search/sync`

use super::orders::Params;
use super::{
    Collection, LastOrdersQuery, MultipleOrderStatusQuery, OrderLookup, OrderService,
    OrdersByStatusQuery, ProductCatalog, RecentOrdersQuery, SearchIndexer, SearchQuery,
    ServiceError, ServiceResult, UserOrdersQuery,
};
use crate::config::UpstreamConfig;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shopgate_sdk::objects::{Envelope, ProductSummary, SyncReport};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Talks to the hosted order/product/search platform.
///
/// The base URL, API key and timeout are read from the shared config on
/// every request, so a reload takes effect immediately.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: Arc<RwLock<UpstreamConfig>>,
}

impl UpstreamClient {
    pub fn new(config: Arc<RwLock<UpstreamConfig>>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("shopgate/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ServiceError> {
        let config = self.config.read().await;
        let url = config.base_url.join(path)?;
        Ok(self.build(&config, method, url))
    }

    fn build(&self, config: &UpstreamConfig, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url).timeout(config.timeout);
        match &config.api_key {
            Some(api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }

    async fn order_call(&self, operation: &str, params: Params) -> ServiceResult {
        let resp = self
            .request(Method::GET, &format!("orders/{operation}"))
            .await?
            .query(&params)
            .send()
            .await?;
        read_envelope(operation, resp).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let resp = self
            .request(Method::GET, path)
            .await?
            .query(params)
            .send()
            .await?;
        read_json(resp).await
    }
}

/// The order service answers with an envelope even on 4xx; only a
/// non-envelope body counts as a transport-level failure.
async fn read_envelope(operation: &str, resp: Response) -> ServiceResult {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    match serde_json::from_slice::<Envelope>(&bytes) {
        Ok(envelope) => {
            debug!(operation, %status, success = envelope.success, "Order service replied");
            Ok(envelope)
        }
        Err(_) if !status.is_success() => {
            warn!(operation, %status, "Order service replied without an envelope");
            Err(ServiceError::Upstream {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(ServiceError::Upstream {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn limit_param(limit: i64) -> [(&'static str, String); 1] {
    [("limit", limit.to_string())]
}

#[async_trait::async_trait]
impl OrderService for UpstreamClient {
    async fn order_items(&self, lookup: OrderLookup) -> ServiceResult {
        self.order_call("getOrderItems", lookup.params()).await
    }

    async fn order_summary(&self, lookup: OrderLookup) -> ServiceResult {
        self.order_call("getOrderSummary", lookup.params()).await
    }

    async fn user_orders(&self, query: UserOrdersQuery) -> ServiceResult {
        self.order_call("getUserOrders", query.params()).await
    }

    async fn multiple_order_status(&self, query: MultipleOrderStatusQuery) -> ServiceResult {
        self.order_call("getMultipleOrderStatus", query.params())
            .await
    }

    async fn last_orders(&self, query: LastOrdersQuery) -> ServiceResult {
        self.order_call("getLastOrders", query.params()).await
    }

    async fn recent_orders(&self, query: RecentOrdersQuery) -> ServiceResult {
        self.order_call("getRecentOrders", query.params()).await
    }

    async fn orders_by_status(&self, query: OrdersByStatusQuery) -> ServiceResult {
        self.order_call("getOrdersByStatus", query.params()).await
    }

    async fn user_order_stats(&self, user_id: String) -> ServiceResult {
        self.order_call("getUserOrderStats", vec![("userId", user_id)])
            .await
    }
}

#[async_trait::async_trait]
impl ProductCatalog for UpstreamClient {
    async fn new_arrivals(&self, limit: i64) -> Result<Vec<ProductSummary>, ServiceError> {
        self.get_json("products/new-arrivals", &limit_param(limit)).await
    }

    async fn collection(
        &self,
        collection: Collection,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, ServiceError> {
        self.get_json(
            &format!("products/collections/{}", collection.slug()),
            &limit_param(limit),
        )
        .await
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<ProductSummary>, ServiceError> {
        let mut params = vec![("q", query.query)];
        if let Some(category) = query.category {
            params.push(("category", category));
        }
        params.push(("limit", query.limit.to_string()));
        self.get_json("products/search", &params).await
    }

    async fn product(&self, id: &str) -> Result<Option<ProductSummary>, ServiceError> {
        let request = {
            let config = self.config.read().await;
            let mut url = config.base_url.join("products/")?;
            // Pushed as a segment so ids containing `/` or `?` are escaped.
            url.path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
                .pop_if_empty()
                .push(id);
            self.build(&config, Method::GET, url)
        };
        let resp = request.send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(resp).await.map(Some)
    }
}

#[async_trait::async_trait]
impl SearchIndexer for UpstreamClient {
    async fn sync(&self) -> Result<SyncReport, ServiceError> {
        let resp = self.request(Method::POST, "search/sync").await?.send().await?;
        read_json(resp).await
    }
}
