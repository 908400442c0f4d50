//! PostgREST-style store access
//!
//! The remote data store exposes its tables through a generic REST query
//! surface: filters as `column=op.value` query parameters, ordering as
//! `order=column.direction`, and row windows as `Range` headers. This
//! module holds the HTTP client, the query builder and the error
//! classification for that surface; nothing here knows about specific
//! tables.

mod client;
mod errors;
mod query;

pub use client::StoreClient;
pub use errors::StoreError;
pub use query::QueryBuilder;
