//! Placement scope: one tenant transaction shared by the catalog and order
//! stores for the duration of a single order placement.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;

use crate::domain::{
    catalog::{
        records::{ProductRecord, ProductUuid},
        repository::PgCatalogRepository,
        store::CatalogStore,
    },
    orders::{
        data::{InsertOutcome, NewOrder},
        numbers::OrderNumber,
        repository::PgOrdersRepository,
        store::OrderStore,
    },
};

/// Dropping the scope without [`PgPlacementScope::commit`] rolls back every
/// decrement and insert made through it.
pub(super) struct PgPlacementScope {
    tx: Mutex<Transaction<'static, Postgres>>,
    catalog: PgCatalogRepository,
    orders: PgOrdersRepository,
}

impl PgPlacementScope {
    pub(super) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Mutex::new(tx),
            catalog: PgCatalogRepository::new(),
            orders: PgOrdersRepository::new(),
        }
    }

    pub(super) async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.into_inner().commit().await
    }
}

#[async_trait]
impl CatalogStore for PgPlacementScope {
    async fn find_active_by_ids(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let mut tx = self.tx.lock().await;

        self.catalog.find_active_products(&mut tx, products).await
    }

    async fn conditional_decrement(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.tx.lock().await;

        self.catalog
            .decrement_inventory(&mut tx, product, quantity)
            .await
    }

    async fn conditional_increment(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.tx.lock().await;

        self.catalog
            .increment_inventory(&mut tx, product, quantity)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OrderStore for PgPlacementScope {
    async fn exists_by_number(&self, number: &OrderNumber) -> Result<bool, sqlx::Error> {
        let mut tx = self.tx.lock().await;

        self.orders.order_number_exists(&mut tx, number).await
    }

    async fn insert(&self, order: NewOrder) -> Result<InsertOutcome, sqlx::Error> {
        let mut tx = self.tx.lock().await;

        self.orders.insert_order(&mut tx, order).await
    }
}
