//! Catalog Store
//!
//! The narrow view of the catalog that order placement needs: a batched read
//! of active products and guarded stock updates on single products.

use async_trait::async_trait;
use mockall::automock;

use crate::domain::catalog::records::{ProductRecord, ProductUuid};

#[automock]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch every product in `products` whose status is active, in one read.
    ///
    /// Products that are missing or not active are simply absent from the result.
    async fn find_active_by_ids(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error>;

    /// Decrement tracked stock by `quantity` only if at least that much is on hand.
    ///
    /// The check and the write are one atomic update on the product. Returns
    /// `false` when nothing was changed.
    async fn conditional_decrement(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error>;

    /// Give back `quantity` units previously taken by [`Self::conditional_decrement`].
    async fn conditional_increment(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error>;
}
