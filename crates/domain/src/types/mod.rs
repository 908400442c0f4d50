//! Domain data types
//!
//! Pure data structures shared across the workspace. Everything here is
//! serde-serializable and free of I/O.

pub mod sales;
pub mod user;

pub use sales::{
    MachineInfo, PaymentMethod, SaleRecord, SaleSource, SaleStatus, SalesFilter,
};
pub use user::UserRole;
