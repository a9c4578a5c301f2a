//! Update Product Status Handler

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

use atelier_app::domain::catalog::records::ProductStatus;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::ProductResponse},
    state::State,
};

/// Update Product Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductStatusRequest {
    /// `active`, `draft` or `archived`
    pub status: String,
}

/// Update Product Status Handler
///
/// Archived products keep their stock but can no longer be ordered.
#[endpoint(
    tags("products"),
    summary = "Update Product Status",
    security(("tenant_header" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let status = json
        .into_inner()
        .status
        .parse::<ProductStatus>()
        .or_400()?;

    let product = state
        .app
        .catalog
        .update_product_status(tenant, product.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
