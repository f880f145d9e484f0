use super::ServiceError;
use shopgate_sdk::objects::ProductSummary;

/// A gendered product collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Mens,
    Womens,
}

impl Collection {
    /// Path segment used by the catalog.
    pub fn slug(self) -> &'static str {
        match self {
            Collection::Mens => "mens",
            Collection::Womens => "womens",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub category: Option<String>,
    pub limit: i64,
}

/// The platform's product-fetch utilities.
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn new_arrivals(&self, limit: i64) -> Result<Vec<ProductSummary>, ServiceError>;
    async fn collection(
        &self,
        collection: Collection,
        limit: i64,
    ) -> Result<Vec<ProductSummary>, ServiceError>;
    async fn search(&self, query: SearchQuery) -> Result<Vec<ProductSummary>, ServiceError>;
    /// `None` when no product has this id.
    async fn product(&self, id: &str) -> Result<Option<ProductSummary>, ServiceError>;
}
