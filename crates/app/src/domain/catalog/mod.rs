//! Catalog
//!
//! Products as the storefront sells them, and the guarded stock updates the
//! order placement relies on.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod store;

pub use errors::CatalogServiceError;
pub use service::*;
pub use store::*;
