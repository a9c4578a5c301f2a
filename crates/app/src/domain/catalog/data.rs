//! Catalog Data

use crate::domain::catalog::records::{Inventory, ProductStatus, ProductUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub slug: String,

    /// ISO-4217 code; `None` takes the owning tenant's default currency.
    pub currency: Option<String>,
    pub price: u64,
    pub compare_at_price: Option<u64>,
    pub image: Option<String>,
    pub inventory: Inventory,
    pub status: ProductStatus,
}
