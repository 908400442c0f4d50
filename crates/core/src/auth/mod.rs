//! Role resolution

pub mod ports;
pub mod resolver;

pub use ports::ProfileStore;
pub use resolver::{RoleLookup, RoleResolver};
