//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use atelier_app::domain::catalog::{
    data::NewProduct,
    records::{Inventory, ProductStatus, ProductUuid},
};

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
    state::State,
};

const fn track_by_default() -> bool {
    true
}

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    pub title: String,
    pub slug: String,

    /// ISO-4217 code, e.g. `USD`; the tenant's default currency when omitted
    #[serde(default)]
    pub currency: Option<String>,

    /// Price in minor units
    pub price: u64,

    #[serde(default)]
    pub compare_at_price: Option<u64>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default = "track_by_default")]
    pub track_inventory: bool,

    #[serde(default)]
    pub quantity: u32,

    /// `active`, `draft` or `archived`; defaults to `draft`
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, StatusError> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ProductStatus>)
            .transpose()
            .or_400()?
            .unwrap_or(ProductStatus::Draft);

        Ok(NewProduct {
            uuid: ProductUuid::new(),
            title: self.title,
            slug: self.slug,
            currency: self.currency,
            price: self.price,
            compare_at_price: self.compare_at_price,
            image: self.image,
            inventory: Inventory {
                track: self.track_inventory,
                quantity: self.quantity,
            },
            status,
        })
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("tenant_header" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Slug already taken"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let product = state
        .app
        .catalog
        .create_product(tenant, json.into_inner().into_new_product()?)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(product.into()))
}
