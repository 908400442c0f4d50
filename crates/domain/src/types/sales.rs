//! Sales transaction types
//!
//! `SaleRecord` mirrors a row of the remote `sales` table joined with the
//! owning `machines` record. Rows are append-only upstream; this side never
//! mutates them. Amounts are carried in integer cents.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{DAY_END_SUFFIX, DAY_START_SUFFIX};

/// Payment method recorded on a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    Credit,
    Debit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Boleto => "boleto",
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

/// Channel the sale originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleSource {
    /// Captured on a physical terminal
    Pos,
    /// Payment link checkout
    Link,
    /// Imported from an acquirer report
    Import,
}

impl SaleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Link => "link",
            Self::Import => "import",
        }
    }
}

/// Settlement status of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Approved,
    Pending,
    Refused,
    Refunded,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Refused => "refused",
            Self::Refunded => "refunded",
        }
    }
}

/// Display fields joined from the owning `machines` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    pub serial_number: String,
    pub model: Option<String>,
}

/// A single sales transaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    /// Terminal serial the sale was captured on
    pub terminal: String,
    /// Combined date+time timestamp, store-local, second precision
    pub date: NaiveDateTime,
    pub gross_amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub installments: u32,
    pub source: SaleSource,
    pub brand: Option<String>,
    pub status: SaleStatus,
    pub machine: Option<MachineInfo>,
}

/// Server-pushable sale filters
///
/// Every field is optional; an empty filter selects the whole table. Date
/// bounds are inclusive whole days expanded against the combined date+time
/// column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesFilter {
    /// First day of the range, inclusive (`YYYY-MM-DD`)
    pub date_start: Option<chrono::NaiveDate>,
    /// Last day of the range, inclusive (`YYYY-MM-DD`)
    pub date_end: Option<chrono::NaiveDate>,
    /// Restrict to these terminal serials
    pub terminals: Option<Vec<String>>,
    pub payment_method: Option<PaymentMethod>,
    pub source: Option<SaleSource>,
}

impl SalesFilter {
    /// Lower bound for the combined date+time column, if a start day is set
    pub fn start_bound(&self) -> Option<String> {
        self.date_start.map(|d| format!("{}{}", d.format("%Y-%m-%d"), DAY_START_SUFFIX))
    }

    /// Upper bound for the combined date+time column, if an end day is set
    pub fn end_bound(&self) -> Option<String> {
        self.date_end.map(|d| format!("{}{}", d.format("%Y-%m-%d"), DAY_END_SUFFIX))
    }

    pub fn is_empty(&self) -> bool {
        self.date_start.is_none()
            && self.date_end.is_none()
            && self.terminals.is_none()
            && self.payment_method.is_none()
            && self.source.is_none()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_day_bounds_expand_to_full_days() {
        let filter = SalesFilter {
            date_start: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };

        assert_eq!(filter.start_bound().as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(filter.end_bound().as_deref(), Some("2024-01-31T23:59:59"));
    }

    #[test]
    fn test_empty_filter_has_no_bounds() {
        let filter = SalesFilter::default();
        assert!(filter.is_empty());
        assert!(filter.start_bound().is_none());
        assert!(filter.end_bound().is_none());
    }

    #[test]
    fn test_enum_wire_formats() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Pix).unwrap(), "\"pix\"");
        assert_eq!(serde_json::to_string(&SaleSource::Pos).unwrap(), "\"pos\"");
        assert_eq!(serde_json::to_string(&SaleStatus::Refunded).unwrap(), "\"refunded\"");
        assert_eq!(PaymentMethod::Boleto.as_str(), "boleto");
    }
}
