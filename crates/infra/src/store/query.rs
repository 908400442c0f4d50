//! Query builder for the store's REST surface
//!
//! Builds the `column=op.value` parameter grammar the store understands:
//!
//! ```text
//! select=*,machines(serial_number,model)
//! date=gte.2024-01-01T00:00:00&date=lte.2024-01-31T23:59:59
//! terminal=in.("T1","T2")
//! order=date.desc
//! ```
//!
//! Row windows are expressed as `Range`/`Range-Unit` headers rather than
//! parameters. Duplicate keys are legal (both bounds of a date range go on
//! the same column), so parameters are kept as an ordered list, not a map.

use serde::de::DeserializeOwned;

use super::client::StoreClient;
use super::errors::StoreError;

/// Fluent query against a single table
#[must_use = "a query does nothing until fetched"]
pub struct QueryBuilder<'a> {
    client: &'a StoreClient,
    table: String,
    params: Vec<(String, String)>,
    range: Option<(usize, usize)>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(client: &'a StoreClient, table: &str) -> Self {
        Self { client, table: table.to_string(), params: Vec::new(), range: None }
    }

    /// Restrict the returned columns (may include embedded resources)
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    /// Equality filter: `column=eq.value`
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Lower bound filter: `column=gte.value`
    pub fn gte(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("gte.{value}")));
        self
    }

    /// Upper bound filter: `column=lte.value`
    pub fn lte(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("lte.{value}")));
        self
    }

    /// Set-membership filter: `column=in.("a","b")`
    pub fn in_list<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        let quoted: Vec<String> =
            values.iter().map(|v| format!("\"{}\"", v.as_ref())).collect();
        self.params.push((column.to_string(), format!("in.({})", quoted.join(","))));
        self
    }

    /// Ascending order on a column
    pub fn order_asc(mut self, column: &str) -> Self {
        self.params.push(("order".to_string(), format!("{column}.asc")));
        self
    }

    /// Descending order on a column
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params.push(("order".to_string(), format!("{column}.desc")));
        self
    }

    /// Cap the number of returned rows: `limit=n`
    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Request the inclusive row window `[from, to]` via `Range` headers
    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.range = Some((from, to));
        self
    }

    /// Execute the query, decoding the response as a JSON row array
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        self.client.execute(&self.table, &self.params, self.range).await
    }
}
