//! Update Product Inventory Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
    state::State,
};

/// Update Product Inventory Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateInventoryRequest {
    /// New absolute stock level
    pub quantity: u32,
}

/// Update Product Inventory Handler
///
/// Sets the stock level after a restock or stock take.
#[endpoint(
    tags("products"),
    summary = "Set Product Stock",
    security(("tenant_header" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Stock updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateInventoryRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let product = state
        .app
        .catalog
        .adjust_inventory(tenant, product.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
