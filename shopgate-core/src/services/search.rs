use super::ServiceError;
use shopgate_sdk::objects::SyncReport;

/// The platform's search indexer.
#[async_trait::async_trait]
pub trait SearchIndexer: Send + Sync {
    /// Rebuild the product search index from the catalog.
    async fn sync(&self) -> Result<SyncReport, ServiceError>;
}
