use super::ServiceResult;

/// A lookup of one order, optionally scoped to the requesting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLookup {
    pub order_id: String,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOrdersQuery {
    pub user_id: String,
    pub limit: i64,
    pub offset: i64,
    pub include_items: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleOrderStatusQuery {
    pub order_ids: Vec<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastOrdersQuery {
    pub user_id: String,
    pub count: i64,
    pub include_render_types: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentOrdersQuery {
    pub user_id: String,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersByStatusQuery {
    pub user_id: String,
    pub status: String,
    pub limit: i64,
}

/// The platform's order-aggregation service.
///
/// Every operation answers with an envelope; `success: false` replies are
/// service-level failures and keep their own `error` and `code`.
#[async_trait::async_trait]
pub trait OrderService: Send + Sync {
    async fn order_items(&self, lookup: OrderLookup) -> ServiceResult;
    async fn order_summary(&self, lookup: OrderLookup) -> ServiceResult;
    async fn user_orders(&self, query: UserOrdersQuery) -> ServiceResult;
    async fn multiple_order_status(&self, query: MultipleOrderStatusQuery) -> ServiceResult;
    async fn last_orders(&self, query: LastOrdersQuery) -> ServiceResult;
    async fn recent_orders(&self, query: RecentOrdersQuery) -> ServiceResult;
    async fn orders_by_status(&self, query: OrdersByStatusQuery) -> ServiceResult;
    async fn user_order_stats(&self, user_id: String) -> ServiceResult;
}

// Query-string encodings used by the HTTP client.

pub(super) type Params = Vec<(&'static str, String)>;

fn push_user(params: &mut Params, user_id: Option<&str>) {
    if let Some(user_id) = user_id {
        params.push(("userId", user_id.to_owned()));
    }
}

impl OrderLookup {
    pub(super) fn params(&self) -> Params {
        let mut params = vec![("orderId", self.order_id.clone())];
        push_user(&mut params, self.user_id.as_deref());
        params
    }
}

impl UserOrdersQuery {
    pub(super) fn params(&self) -> Params {
        vec![
            ("userId", self.user_id.clone()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("includeItems", self.include_items.to_string()),
        ]
    }
}

impl MultipleOrderStatusQuery {
    pub(super) fn params(&self) -> Params {
        let mut params = vec![("orderIds", self.order_ids.join(","))];
        push_user(&mut params, self.user_id.as_deref());
        params
    }
}

impl LastOrdersQuery {
    pub(super) fn params(&self) -> Params {
        vec![
            ("userId", self.user_id.clone()),
            ("count", self.count.to_string()),
            ("includeRenderTypes", self.include_render_types.to_string()),
        ]
    }
}

impl RecentOrdersQuery {
    pub(super) fn params(&self) -> Params {
        vec![
            ("userId", self.user_id.clone()),
            ("days", self.days.to_string()),
        ]
    }
}

impl OrdersByStatusQuery {
    pub(super) fn params(&self) -> Params {
        vec![
            ("userId", self.user_id.clone()),
            ("status", self.status.clone()),
            ("limit", self.limit.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_omits_absent_user() {
        let lookup = OrderLookup {
            order_id: "10042".to_owned(),
            user_id: None,
        };
        assert_eq!(lookup.params(), vec![("orderId", "10042".to_owned())]);
    }

    #[test]
    fn multiple_status_joins_ids() {
        let query = MultipleOrderStatusQuery {
            order_ids: vec!["a".to_owned(), "b".to_owned()],
            user_id: Some("u-1".to_owned()),
        };
        assert_eq!(
            query.params(),
            vec![("orderIds", "a,b".to_owned()), ("userId", "u-1".to_owned())]
        );
    }
}
