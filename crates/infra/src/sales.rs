//! Sales store implementation
//!
//! Pages through the remote `sales` table with the machine display fields
//! embedded. The filter travels with every page request; the row window is
//! expressed through `Range` headers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use paydesk_core::sales::SalesStore;
use paydesk_domain::{
    MachineInfo, PaymentMethod, Result, SaleRecord, SaleSource, SaleStatus, SalesFilter,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::store::{QueryBuilder, StoreClient, StoreError};

/// `SalesStore` backed by the remote REST surface
pub struct RestSalesStore {
    client: Arc<StoreClient>,
}

impl RestSalesStore {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }

    fn apply_filter<'a>(mut query: QueryBuilder<'a>, filter: &SalesFilter) -> QueryBuilder<'a> {
        if let Some(bound) = filter.start_bound() {
            query = query.gte("date", &bound);
        }
        if let Some(bound) = filter.end_bound() {
            query = query.lte("date", &bound);
        }
        if let Some(terminals) = &filter.terminals {
            if !terminals.is_empty() {
                query = query.in_list("terminal", terminals);
            }
        }
        if let Some(method) = filter.payment_method {
            query = query.eq("payment_method", method.as_str());
        }
        if let Some(source) = filter.source {
            query = query.eq("source", source.as_str());
        }
        query
    }
}

#[derive(Debug, Deserialize)]
struct MachineRow {
    serial_number: String,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    id: String,
    terminal: String,
    /// Combined date+time string, optionally with fractional seconds
    date: String,
    gross_amount_cents: i64,
    payment_method: PaymentMethod,
    installments: u32,
    source: SaleSource,
    brand: Option<String>,
    status: SaleStatus,
    machines: Option<MachineRow>,
}

impl SaleRow {
    fn into_record(self) -> std::result::Result<SaleRecord, StoreError> {
        let date = parse_sale_timestamp(&self.date)?;
        Ok(SaleRecord {
            id: self.id,
            terminal: self.terminal,
            date,
            gross_amount_cents: self.gross_amount_cents,
            payment_method: self.payment_method,
            installments: self.installments,
            source: self.source,
            brand: self.brand,
            status: self.status,
            machine: self
                .machines
                .map(|m| MachineInfo { serial_number: m.serial_number, model: m.model }),
        })
    }
}

fn parse_sale_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| StoreError::Decode(format!("bad sale timestamp {raw:?}: {e}")))
}

#[async_trait]
impl SalesStore for RestSalesStore {
    #[instrument(skip(self, filter))]
    async fn fetch_page(
        &self,
        filter: &SalesFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SaleRecord>> {
        let query = self
            .client
            .from("sales")
            .select("*,machines(serial_number,model)")
            .order_desc("date");

        let rows: Vec<SaleRow> = Self::apply_filter(query, filter)
            .range(offset, offset + limit.saturating_sub(1))
            .fetch()
            .await?;

        debug!(offset, rows = rows.len(), "sales page fetched");
        rows.into_iter()
            .map(|row| row.into_record().map_err(Into::into))
            .collect()
    }
}
