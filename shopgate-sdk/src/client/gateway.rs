//! Gateway client (chat assistants, storefront backends → Shopgate).
//!
//! Requests identify the caller as a bot so the gateway can tag its logs,
//! and carry the shopper's id in `X-User-Id` when one is known.

use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::ClientError;
use crate::objects::{Envelope, WebhookAck};
use crate::signature::{EVENT_ID_HEADER, SIGNATURE_HEADER, sign_webhook};

const USER_ID_HEADER: &str = "X-User-Id";
const BOT_HEADER: &str = "X-Bot-Request";

/// Typed HTTP client for the gateway endpoints.
///
/// Every GET method returns the server's [`Envelope`] as-is, including
/// 4xx replies, so callers can branch on `code`.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
}

/// Options for [`GatewayClient::user_orders`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UserOrdersOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub include_items: bool,
}

/// Options for [`GatewayClient::last_orders`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LastOrdersOptions {
    pub count: Option<u32>,
    pub include_render_types: bool,
}

impl GatewayClient {
    /// Create a new `GatewayClient`.
    ///
    /// * `base_url` – the URL the endpoints hang off, e.g.
    ///   `https://shop.example.com/_functions/`. A missing trailing slash is
    ///   added.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http: Client::builder()
                .user_agent(concat!("shopgate-sdk/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// The resolved base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -- products -------------------------------------------------------

    /// `GET getNewArrivals`
    pub async fn new_arrivals(&self, limit: Option<u32>) -> Result<Envelope, ClientError> {
        self.get("getNewArrivals", None, &limit_param(limit)).await
    }

    /// `GET getMensProducts`
    pub async fn mens_products(&self, limit: Option<u32>) -> Result<Envelope, ClientError> {
        self.get("getMensProducts", None, &limit_param(limit)).await
    }

    /// `GET getWomensProducts`
    pub async fn womens_products(&self, limit: Option<u32>) -> Result<Envelope, ClientError> {
        self.get("getWomensProducts", None, &limit_param(limit)).await
    }

    /// `GET searchProducts`
    pub async fn search_products(
        &self,
        query: &str,
        category: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Envelope, ClientError> {
        let mut params = vec![("q", query.to_owned())];
        if let Some(category) = category {
            params.push(("category", category.to_owned()));
        }
        params.extend(limit_param(limit));
        self.get("searchProducts", None, &params).await
    }

    /// `GET getProduct`
    pub async fn product(&self, id: &str) -> Result<Envelope, ClientError> {
        self.get("getProduct", None, &[("id", id.to_owned())]).await
    }

    // -- orders ---------------------------------------------------------

    /// `GET getOrderItems`
    pub async fn order_items(
        &self,
        order_id: &str,
        user_id: Option<&str>,
    ) -> Result<Envelope, ClientError> {
        self.get("getOrderItems", user_id, &[("orderId", order_id.to_owned())])
            .await
    }

    /// `GET getOrderSummary`
    pub async fn order_summary(
        &self,
        order_id: &str,
        user_id: Option<&str>,
    ) -> Result<Envelope, ClientError> {
        self.get("getOrderSummary", user_id, &[("orderId", order_id.to_owned())])
            .await
    }

    /// `GET getOrderStatus`
    ///
    /// A failed lookup still comes back as HTTP 200 with `success: false`.
    pub async fn order_status(
        &self,
        order_id: &str,
        user_id: Option<&str>,
    ) -> Result<Envelope, ClientError> {
        self.get("getOrderStatus", user_id, &[("orderId", order_id.to_owned())])
            .await
    }

    /// `GET getUserOrders`
    pub async fn user_orders(
        &self,
        user_id: &str,
        options: UserOrdersOptions,
    ) -> Result<Envelope, ClientError> {
        let mut params = limit_param(options.limit);
        if let Some(offset) = options.offset {
            params.push(("offset", offset.to_string()));
        }
        params.push(("includeItems", options.include_items.to_string()));
        self.get("getUserOrders", Some(user_id), &params).await
    }

    /// `GET getMultipleOrderStatus`
    pub async fn multiple_order_status(
        &self,
        order_ids: &[&str],
        user_id: Option<&str>,
    ) -> Result<Envelope, ClientError> {
        self.get(
            "getMultipleOrderStatus",
            user_id,
            &[("orderIds", order_ids.join(","))],
        )
        .await
    }

    /// `GET getLastOrders`
    pub async fn last_orders(
        &self,
        user_id: &str,
        options: LastOrdersOptions,
    ) -> Result<Envelope, ClientError> {
        let mut params = Vec::new();
        if let Some(count) = options.count {
            params.push(("count", count.to_string()));
        }
        params.push((
            "includeRenderTypes",
            options.include_render_types.to_string(),
        ));
        self.get("getLastOrders", Some(user_id), &params).await
    }

    /// `GET getRecentOrders`
    pub async fn recent_orders(
        &self,
        user_id: &str,
        days: Option<u32>,
    ) -> Result<Envelope, ClientError> {
        let params: Vec<_> = days.map(|d| ("days", d.to_string())).into_iter().collect();
        self.get("getRecentOrders", Some(user_id), &params).await
    }

    /// `GET getOrdersByStatus`
    pub async fn orders_by_status(
        &self,
        user_id: &str,
        status: &str,
        limit: Option<u32>,
    ) -> Result<Envelope, ClientError> {
        let mut params = vec![("status", status.to_owned())];
        params.extend(limit_param(limit));
        self.get("getOrdersByStatus", Some(user_id), &params).await
    }

    /// `GET getUserOrderStats`
    pub async fn user_order_stats(&self, user_id: &str) -> Result<Envelope, ClientError> {
        self.get("getUserOrderStats", Some(user_id), &[]).await
    }

    // -- operations -----------------------------------------------------

    /// `POST syncSearchIndex`
    pub async fn sync_search_index(&self) -> Result<Envelope, ClientError> {
        let url = self.base_url.join("syncSearchIndex")?;
        let resp = self.http.post(url).header(BOT_HEADER, "true").send().await?;
        parse_envelope(resp).await
    }

    /// `POST razorpayWebhook` – replay a raw webhook body, signed with
    /// `secret` the way Razorpay signs it.
    pub async fn send_webhook(
        &self,
        event_id: &str,
        body: impl Into<Vec<u8>>,
        secret: &[u8],
    ) -> Result<WebhookAck, ClientError> {
        let body = body.into();
        let url = self.base_url.join("razorpayWebhook")?;
        let resp = self
            .http
            .post(url)
            .header(EVENT_ID_HEADER, event_id)
            .header(SIGNATURE_HEADER, sign_webhook(&body, secret))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|_| ClientError::Api {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    async fn get(
        &self,
        endpoint: &str,
        user_id: Option<&str>,
        params: &[(&str, String)],
    ) -> Result<Envelope, ClientError> {
        let url = self.base_url.join(endpoint)?;
        let mut request = self.http.get(url).query(params).header(BOT_HEADER, "true");
        if let Some(user_id) = user_id {
            request = request.header(USER_ID_HEADER, user_id);
        }
        let resp = request.send().await?;
        parse_envelope(resp).await
    }
}

fn limit_param(limit: Option<u32>) -> Vec<(&'static str, String)> {
    limit.map(|l| ("limit", l.to_string())).into_iter().collect()
}

/// Accept any status as long as the body is an envelope.
async fn parse_envelope(resp: reqwest::Response) -> Result<Envelope, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    match serde_json::from_slice::<Envelope<Value>>(&bytes) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(ClientError::Api {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }),
        Err(e) => Err(ClientError::Json(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = GatewayClient::new(Url::parse("https://shop.example.com/_functions").unwrap());
        assert_eq!(
            client.base_url().join("getProduct").unwrap().as_str(),
            "https://shop.example.com/_functions/getProduct"
        );
    }

    #[test]
    fn limit_is_only_sent_when_given() {
        assert!(limit_param(None).is_empty());
        assert_eq!(limit_param(Some(6)), vec![("limit", "6".to_owned())]);
    }
}
