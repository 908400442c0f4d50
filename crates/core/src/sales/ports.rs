//! Port interfaces for sales data

use async_trait::async_trait;
use paydesk_domain::{Result, SaleRecord, SalesFilter};

/// Read access to the remote sales listing
///
/// A page is the window `[offset, offset + limit)` of the filtered
/// listing ordered by sale timestamp descending. Implementations push the
/// filter down to the store on every page request.
#[async_trait]
pub trait SalesStore: Send + Sync {
    async fn fetch_page(
        &self,
        filter: &SalesFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SaleRecord>>;
}
