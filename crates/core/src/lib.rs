//! # Paydesk Core
//!
//! Business services for the Paydesk back office, written against port
//! traits so infrastructure stays swappable:
//! - `auth`: role resolution with TTL caching, request coalescing and retry
//! - `sales`: full-listing materialization, in-memory refinement and
//!   pagination
//!
//! ## Architecture
//! - Defines the `ProfileStore` / `SalesStore` ports
//! - Implementations live in `paydesk-infra`
//! - No HTTP or storage code in this crate

pub mod auth;
pub mod sales;

pub use auth::{ProfileStore, RoleLookup, RoleResolver};
pub use sales::{
    paginate, SaleRefinement, SalesFetcher, SalesPage, SalesService, SalesStore, SalesSummary,
};
