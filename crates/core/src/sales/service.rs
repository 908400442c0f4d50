//! Sales listing service - composition of fetch, refine and paginate

use std::sync::Arc;

use paydesk_domain::{Result, SalesFilter};
use tracing::instrument;

use super::fetcher::SalesFetcher;
use super::ports::SalesStore;
use super::refine::{paginate, SaleRefinement, SalesPage, SalesSummary};

/// Read-side service behind the sales views
///
/// Every call materializes the filtered listing through the fetcher, then
/// refines and paginates in memory. Memory and transfer scale with the
/// filtered listing size, not with the returned page.
pub struct SalesService {
    fetcher: SalesFetcher,
}

impl SalesService {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { fetcher: SalesFetcher::new(store) }
    }

    /// Build from a preconfigured fetcher (custom page size)
    pub fn with_fetcher(fetcher: SalesFetcher) -> Self {
        Self { fetcher }
    }

    /// One page of the refined listing
    #[instrument(skip(self, filter, refinement))]
    pub async fn query(
        &self,
        filter: &SalesFilter,
        refinement: &SaleRefinement,
        page: usize,
        per_page: usize,
    ) -> Result<SalesPage> {
        let records = self.fetcher.fetch_all(filter).await?;
        let refined = refinement.apply(records);
        Ok(paginate(refined, page, per_page))
    }

    /// Aggregate totals over the refined listing
    #[instrument(skip(self, filter, refinement))]
    pub async fn summary(
        &self,
        filter: &SalesFilter,
        refinement: &SaleRefinement,
    ) -> Result<SalesSummary> {
        let records = self.fetcher.fetch_all(filter).await?;
        let refined = refinement.apply(records);
        Ok(SalesSummary::from_records(&refined))
    }
}
