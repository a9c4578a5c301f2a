//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        orders::{
            data::{OrderStatusUpdate, OrderSubmission},
            errors::OrdersServiceError,
            numbers::{OrderNumber, OrderNumbers, RandomOrderNumbers},
            placement::place_order,
            records::{OrderRecord, OrderUuid, UserUuid},
            repository::PgOrdersRepository,
            scope::PgPlacementScope,
        },
        tenants::records::TenantUuid,
    },
};

/// Placements started before a lock conflict is reported to the caller.
pub(crate) const PLACEMENT_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    numbers: Arc<dyn OrderNumbers>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            numbers: Arc::new(RandomOrderNumbers),
        }
    }

    /// Replace the source of order number candidates.
    #[must_use]
    pub fn with_order_numbers(mut self, numbers: Arc<dyn OrderNumbers>) -> Self {
        self.numbers = numbers;
        self
    }

    async fn place_once(
        &self,
        tenant: TenantUuid,
        submission: OrderSubmission,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let tx = self.db.begin_tenant_transaction(tenant).await?;
        let scope = PgPlacementScope::new(tx);

        let order = place_order(&scope, &scope, self.numbers.as_ref(), submission).await?;

        scope
            .commit()
            .await
            .map_err(OrdersServiceError::Persistence)?;

        Ok(order)
    }
}

/// Run `place` again while PostgreSQL keeps aborting it over lock conflicts,
/// up to [`PLACEMENT_ATTEMPTS`] times in total.
///
/// Each run starts a fresh transaction, so an aborted run leaves nothing
/// behind.
async fn retry_lock_conflicts<T, F, Fut>(mut place: F) -> Result<T, OrdersServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OrdersServiceError>>,
{
    let mut attempt = 1;

    loop {
        match place().await {
            Err(error) if error.is_lock_conflict() && attempt < PLACEMENT_ATTEMPTS => {
                warn!(attempt, %error, "order placement lost a lock conflict, retrying");

                attempt += 1;
            }
            result => return result,
        }
    }
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.submit_order",
        skip(self, submission),
        fields(tenant_uuid = %tenant, user_uuid = %submission.user, lines = submission.lines.len()),
        err
    )]
    async fn submit_order(
        &self,
        tenant: TenantUuid,
        submission: OrderSubmission,
    ) -> Result<OrderRecord, OrdersServiceError> {
        retry_lock_conflicts(move || self.place_once(tenant, submission.clone())).await
    }

    async fn get_order(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn get_order_by_number(
        &self,
        tenant: TenantUuid,
        number: OrderNumber,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let order = self.repository.get_order_by_number(&mut tx, &number).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_user_orders(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let orders = self.repository.list_user_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip(self, update),
        fields(tenant_uuid = %tenant, order_uuid = %order),
        err
    )]
    async fn update_order_status(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if update.is_empty() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .update_order_status(&mut tx, order, update)
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %updated.uuid,
            status = %updated.status,
            payment_status = %updated.payment_status,
            "updated order status"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Place an order for the submitted cart.
    ///
    /// Either the order is stored and its tracked stock decremented, or
    /// nothing changes at all.
    async fn submit_order(
        &self,
        tenant: TenantUuid,
        submission: OrderSubmission,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn get_order(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    async fn get_order_by_number(
        &self,
        tenant: TenantUuid,
        number: OrderNumber,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Orders placed by `user`, newest first.
    async fn list_user_orders(
        &self,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Change the fulfilment or payment state of an order. Items, prices and
    /// the order number never change.
    async fn update_order_status(
        &self,
        tenant: TenantUuid,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
