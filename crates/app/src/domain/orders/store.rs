//! Order Store
//!
//! What order placement needs from order storage: an existence check on order
//! numbers and an insert that reports a taken number instead of failing.

use async_trait::async_trait;
use mockall::automock;

use crate::domain::orders::{
    data::{InsertOutcome, NewOrder},
    numbers::OrderNumber,
};

#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Whether an order visible to this store already uses `number`.
    ///
    /// Best effort: under row-level security only the current tenant's orders
    /// are visible. [`OrderStore::insert`] decides whether a number is free.
    async fn exists_by_number(&self, number: &OrderNumber) -> Result<bool, sqlx::Error>;

    /// Store a new order with its line items.
    ///
    /// Returns [`InsertOutcome::NumberTaken`] without writing anything when the
    /// order number is already in use.
    async fn insert(&self, order: NewOrder) -> Result<InsertOutcome, sqlx::Error>;
}
