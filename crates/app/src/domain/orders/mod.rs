//! Orders
//!
//! Order placement turns a cart submission into a persisted order: lines are
//! normalised and priced against the active catalog, tracked stock is
//! reserved with guarded decrements, and the order is stored under a fresh
//! human-readable order number.

pub(crate) mod cart;
pub mod data;
pub mod errors;
pub mod numbers;
pub mod options;
pub(crate) mod placement;
pub(crate) mod pricing;
pub mod records;
pub(crate) mod repository;
pub(crate) mod reservation;
mod scope;
pub mod service;
pub mod store;

pub use errors::OrdersServiceError;
pub use service::*;
pub use store::*;
