//! Inventory reservation.

use tracing::{info, warn};

use crate::domain::{
    catalog::{records::ProductUuid, store::CatalogStore},
    orders::errors::OrdersServiceError,
};

/// Stock taken from one tracked product for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Reservation {
    pub product: ProductUuid,
    pub quantity: u32,
}

/// Apply every reservation in order with guarded decrements.
///
/// Stops at the first product that cannot cover its quantity, gives back
/// whatever was already taken for this order and reports that product.
/// On success the applied reservations are returned so a later failure can
/// release them.
pub(crate) async fn reserve_inventory(
    catalog: &dyn CatalogStore,
    reservations: &[Reservation],
) -> Result<Vec<Reservation>, OrdersServiceError> {
    let mut applied = Vec::with_capacity(reservations.len());

    for reservation in reservations {
        match catalog
            .conditional_decrement(reservation.product, reservation.quantity)
            .await
        {
            Ok(true) => applied.push(*reservation),
            Ok(false) => {
                warn!(
                    product_uuid = %reservation.product,
                    quantity = reservation.quantity,
                    "insufficient stock"
                );

                release_inventory(catalog, &applied).await;

                return Err(OrdersServiceError::InsufficientStock {
                    product: reservation.product,
                });
            }
            Err(error) => {
                release_inventory(catalog, &applied).await;

                return Err(OrdersServiceError::from(error));
            }
        }
    }

    Ok(applied)
}

/// Give back reserved stock. Best effort: failures are logged and skipped.
pub(crate) async fn release_inventory(catalog: &dyn CatalogStore, applied: &[Reservation]) {
    for reservation in applied.iter().rev() {
        match catalog
            .conditional_increment(reservation.product, reservation.quantity)
            .await
        {
            Ok(()) => info!(
                product_uuid = %reservation.product,
                quantity = reservation.quantity,
                "released reserved stock"
            ),
            Err(error) => warn!(
                product_uuid = %reservation.product,
                quantity = reservation.quantity,
                %error,
                "failed to release reserved stock"
            ),
        }
    }
}
