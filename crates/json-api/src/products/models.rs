//! Product Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_app::domain::catalog::records::ProductRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub title: String,
    pub slug: String,
    pub currency: String,

    /// The price of the product in minor units
    pub price: u64,

    /// Reference price shown struck through when above `price`
    pub compare_at_price: Option<u64>,

    pub image: Option<String>,

    /// Whether stock is tracked; untracked products never run out
    pub track_inventory: bool,

    pub quantity: u32,

    /// `active`, `draft` or `archived`
    pub status: String,

    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        ProductResponse {
            uuid: product.uuid.into(),
            title: product.title,
            slug: product.slug,
            currency: product.currency,
            price: product.price,
            compare_at_price: product.compare_at_price,
            image: product.image,
            track_inventory: product.inventory.track,
            quantity: product.inventory.quantity,
            status: product.status.to_string(),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}
