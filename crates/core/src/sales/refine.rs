//! In-memory refinement of the materialized sales listing
//!
//! Hour-of-day, brand and status cannot be pushed to the store the way the
//! primary filter is, so they are applied here against the full fetched
//! set, followed by pagination and summary totals. The records keep their
//! store order (timestamp descending).

use std::collections::HashMap;

use chrono::Timelike;
use paydesk_domain::{PaymentMethod, SaleRecord, SaleStatus};
use serde::Serialize;

/// Secondary predicates applied after materialization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleRefinement {
    /// Earliest hour of day, inclusive (0-23)
    pub hour_start: Option<u32>,
    /// Latest hour of day, inclusive (0-23)
    pub hour_end: Option<u32>,
    /// Card brand, matched case-insensitively
    pub brand: Option<String>,
    pub status: Option<SaleStatus>,
}

impl SaleRefinement {
    pub fn is_empty(&self) -> bool {
        self.hour_start.is_none()
            && self.hour_end.is_none()
            && self.brand.is_none()
            && self.status.is_none()
    }

    /// Whether a single record passes every set predicate
    pub fn matches(&self, sale: &SaleRecord) -> bool {
        let hour = sale.date.hour();
        if let Some(start) = self.hour_start {
            if hour < start {
                return false;
            }
        }
        if let Some(end) = self.hour_end {
            if hour > end {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            let matched =
                sale.brand.as_deref().is_some_and(|b| b.eq_ignore_ascii_case(brand));
            if !matched {
                return false;
            }
        }
        if let Some(status) = self.status {
            if sale.status != status {
                return false;
            }
        }
        true
    }

    /// Filter the materialized listing, preserving order
    pub fn apply(&self, records: Vec<SaleRecord>) -> Vec<SaleRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// One page of the refined listing plus the refined total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesPage {
    pub records: Vec<SaleRecord>,
    /// Total refined records across all pages
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Slice a page out of the refined listing (0-based page index)
pub fn paginate(records: Vec<SaleRecord>, page: usize, per_page: usize) -> SalesPage {
    let per_page = per_page.max(1);
    let total = records.len();
    let start = page.saturating_mul(per_page);
    let page_records = if start >= total {
        Vec::new()
    } else {
        records.into_iter().skip(start).take(per_page).collect()
    };
    SalesPage { records: page_records, total, page, per_page }
}

/// Aggregate totals over a refined listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub count: usize,
    pub gross_cents: i64,
    pub gross_cents_by_method: HashMap<PaymentMethod, i64>,
}

impl SalesSummary {
    pub fn from_records(records: &[SaleRecord]) -> Self {
        let mut gross_cents_by_method = HashMap::new();
        let mut gross_cents = 0i64;
        for record in records {
            gross_cents += record.gross_amount_cents;
            *gross_cents_by_method.entry(record.payment_method).or_insert(0) +=
                record.gross_amount_cents;
        }
        Self { count: records.len(), gross_cents, gross_cents_by_method }
    }
}
