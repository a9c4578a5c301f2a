//! In-memory stores for exercising order placement without a database.

use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::domain::{
    catalog::{
        records::{ProductRecord, ProductUuid},
        store::CatalogStore,
    },
    orders::{
        data::{InsertOutcome, NewOrder},
        numbers::OrderNumber,
        options::{OrderStatus, PaymentStatus},
        records::OrderRecord,
        store::OrderStore,
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Catalog whose guarded updates check and write under one lock, like a
/// single-row `UPDATE ... WHERE inventory_quantity >= $2`.
#[derive(Debug, Default)]
pub(crate) struct MemoryCatalog {
    products: Mutex<FxHashMap<ProductUuid, ProductRecord>>,
    fail_increments: AtomicBool,
}

impl MemoryCatalog {
    pub(crate) fn new(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        Self {
            products: Mutex::new(
                products
                    .into_iter()
                    .map(|product| (product.uuid, product))
                    .collect(),
            ),
            fail_increments: AtomicBool::new(false),
        }
    }

    pub(crate) fn stock(&self, product: ProductUuid) -> Option<u32> {
        lock(&self.products)
            .get(&product)
            .map(|product| product.inventory.quantity)
    }

    pub(crate) fn fail_increments(&self) {
        self.fail_increments.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_active_by_ids(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        tokio::task::yield_now().await;

        let catalog = lock(&self.products);

        Ok(products
            .iter()
            .filter_map(|uuid| catalog.get(uuid))
            .filter(|product| product.is_active())
            .cloned()
            .collect())
    }

    async fn conditional_decrement(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        tokio::task::yield_now().await;

        let mut catalog = lock(&self.products);

        let Some(record) = catalog.get_mut(&product) else {
            return Ok(false);
        };

        if !record.is_active() || !record.inventory.track || record.inventory.quantity < quantity {
            return Ok(false);
        }

        record.inventory.quantity -= quantity;

        Ok(true)
    }

    async fn conditional_increment(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        tokio::task::yield_now().await;

        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }

        if let Some(record) = lock(&self.products)
            .get_mut(&product)
            .filter(|record| record.inventory.track)
        {
            record.inventory.quantity += quantity;
        }

        Ok(())
    }
}

/// Order storage with a unique order number index.
#[derive(Debug, Default)]
pub(crate) struct MemoryOrders {
    orders: Mutex<Vec<OrderRecord>>,
    /// Numbers held by orders outside this store's visible rows; only the
    /// insert sees them, as with another tenant's orders under RLS.
    hidden_numbers: Mutex<FxHashSet<OrderNumber>>,
    fail_inserts: AtomicBool,
}

impl MemoryOrders {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_hidden_numbers(numbers: impl IntoIterator<Item = OrderNumber>) -> Self {
        Self {
            hidden_numbers: Mutex::new(numbers.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn orders(&self) -> Vec<OrderRecord> {
        lock(&self.orders).clone()
    }

    pub(crate) fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for MemoryOrders {
    async fn exists_by_number(&self, number: &OrderNumber) -> Result<bool, sqlx::Error> {
        tokio::task::yield_now().await;

        Ok(lock(&self.orders)
            .iter()
            .any(|order| &order.order_number == number))
    }

    async fn insert(&self, order: NewOrder) -> Result<InsertOutcome, sqlx::Error> {
        tokio::task::yield_now().await;

        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let mut orders = lock(&self.orders);

        let taken = lock(&self.hidden_numbers).contains(&order.order_number)
            || orders
                .iter()
                .any(|existing| existing.order_number == order.order_number);

        if taken {
            return Ok(InsertOutcome::NumberTaken);
        }

        let now = Timestamp::now();

        let record = OrderRecord {
            uuid: order.uuid,
            order_number: order.order_number,
            user_uuid: order.user_uuid,
            items: order.items,
            currency: order.currency,
            subtotal: order.subtotal,
            discount: order.discount,
            shipping_cost: order.shipping_cost,
            total: order.total,
            shipping_method: order.shipping_method,
            shipping_address: order.shipping_address,
            note: order.note,
            payment_method: order.payment_method,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };

        orders.push(record.clone());

        Ok(InsertOutcome::Created(record))
    }
}
