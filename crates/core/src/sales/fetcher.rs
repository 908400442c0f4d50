//! Full-listing materialization
//!
//! The remote store only answers bounded pages, so the complete filtered
//! result set is assembled by walking pages sequentially until the store
//! returns an empty one. Cost grows with the unfiltered listing size, not
//! with the page eventually shown to the user; refinement and pagination
//! of the materialized set happen downstream in [`super::service`].

use std::sync::Arc;

use paydesk_domain::constants::SALES_PAGE_SIZE;
use paydesk_domain::{Result, SaleRecord, SalesFilter};
use tracing::{debug, instrument};

use super::ports::SalesStore;

/// Sequential page walker over the filtered sales listing
pub struct SalesFetcher {
    store: Arc<dyn SalesStore>,
    page_size: usize,
}

impl SalesFetcher {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { store, page_size: SALES_PAGE_SIZE }
    }

    /// Override the page size (tests use small pages)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Materialize every row matching the filter
    ///
    /// Pages are requested strictly one after another; the loop terminates
    /// only on an empty page, so a short page keeps the walk going. Any
    /// page error aborts the whole fetch without returning partial data;
    /// retrying is the caller's decision, not this layer's.
    #[instrument(skip(self, filter))]
    pub async fn fetch_all(&self, filter: &SalesFilter) -> Result<Vec<SaleRecord>> {
        let mut records = Vec::new();
        let mut page = 0usize;

        loop {
            let offset = page * self.page_size;
            let rows = self.store.fetch_page(filter, offset, self.page_size).await?;
            if rows.is_empty() {
                break;
            }
            debug!(page, rows = rows.len(), "fetched sales page");
            records.extend(rows);
            page += 1;
        }

        debug!(total = records.len(), pages = page + 1, "sales listing materialized");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use paydesk_domain::{PaydeskError, PaymentMethod, SaleSource, SaleStatus};

    use super::*;

    fn sale(id: &str) -> SaleRecord {
        SaleRecord {
            id: id.to_string(),
            terminal: "T1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
            gross_amount_cents: 12_500,
            payment_method: PaymentMethod::Credit,
            installments: 1,
            source: SaleSource::Pos,
            brand: Some("visa".to_string()),
            status: SaleStatus::Approved,
            machine: None,
        }
    }

    fn page_of(count: usize, offset: usize) -> Vec<SaleRecord> {
        (0..count).map(|i| sale(&format!("sale-{}", offset + i))).collect()
    }

    /// Sales store answering a scripted sequence of pages
    struct PagedStore {
        calls: AtomicUsize,
        pages: Vec<Result<Vec<SaleRecord>>>,
        seen_windows: Mutex<Vec<(usize, usize)>>,
    }

    impl PagedStore {
        fn new(pages: Vec<Result<Vec<SaleRecord>>>) -> Self {
            Self { calls: AtomicUsize::new(0), pages, seen_windows: Mutex::new(Vec::new()) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SalesStore for PagedStore {
        async fn fetch_page(
            &self,
            _filter: &SalesFilter,
            offset: usize,
            limit: usize,
        ) -> Result<Vec<SaleRecord>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_windows.lock().unwrap().push((offset, limit));
            self.pages
                .get(call)
                .cloned()
                .unwrap_or_else(|| Err(PaydeskError::Internal("unexpected page".to_string())))
        }
    }

    #[tokio::test]
    async fn test_walks_pages_until_empty() {
        let store = Arc::new(PagedStore::new(vec![
            Ok(page_of(100, 0)),
            Ok(page_of(100, 100)),
            Ok(page_of(37, 200)),
            Ok(Vec::new()),
        ]));
        let fetcher = SalesFetcher::new(Arc::clone(&store) as Arc<dyn SalesStore>);

        let records = fetcher.fetch_all(&SalesFilter::default()).await.unwrap();

        assert_eq!(records.len(), 237);
        assert_eq!(store.calls(), 4);
        assert_eq!(
            *store.seen_windows.lock().unwrap(),
            vec![(0, 100), (100, 100), (200, 100), (300, 100)]
        );
    }

    #[tokio::test]
    async fn test_short_page_does_not_stop_the_walk() {
        // 37 < page size, but termination requires an explicitly empty page
        let store = Arc::new(PagedStore::new(vec![Ok(page_of(37, 0)), Ok(Vec::new())]));
        let fetcher = SalesFetcher::new(Arc::clone(&store) as Arc<dyn SalesStore>);

        let records = fetcher.fetch_all(&SalesFilter::default()).await.unwrap();

        assert_eq!(records.len(), 37);
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing_is_one_request() {
        let store = Arc::new(PagedStore::new(vec![Ok(Vec::new())]));
        let fetcher = SalesFetcher::new(Arc::clone(&store) as Arc<dyn SalesStore>);

        let records = fetcher.fetch_all(&SalesFilter::default()).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_page_error_aborts_without_partial_result() {
        let store = Arc::new(PagedStore::new(vec![
            Ok(page_of(100, 0)),
            Err(PaydeskError::Store("server error".to_string())),
        ]));
        let fetcher = SalesFetcher::new(Arc::clone(&store) as Arc<dyn SalesStore>);

        let result = fetcher.fetch_all(&SalesFilter::default()).await;

        assert!(matches!(result, Err(PaydeskError::Store(_))));
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_custom_page_size_drives_offsets() {
        let store = Arc::new(PagedStore::new(vec![
            Ok(page_of(10, 0)),
            Ok(page_of(10, 10)),
            Ok(Vec::new()),
        ]));
        let fetcher =
            SalesFetcher::new(Arc::clone(&store) as Arc<dyn SalesStore>).with_page_size(10);

        let records = fetcher.fetch_all(&SalesFilter::default()).await.unwrap();

        assert_eq!(records.len(), 20);
        assert_eq!(*store.seen_windows.lock().unwrap(), vec![(0, 10), (10, 10), (20, 10)]);
    }
}
