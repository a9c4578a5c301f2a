//! Get Order By Number Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use atelier_app::domain::orders::numbers::OrderNumber;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Get Order By Number Handler
///
/// Looks an order up by the number printed on receipts and emails.
#[endpoint(
    tags("orders"),
    summary = "Get Order By Number",
    security(("tenant_header" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed order number"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
pub(crate) async fn handler(
    number: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let number = number
        .into_inner()
        .parse::<OrderNumber>()
        .or_400()?;

    let order = state
        .app
        .orders
        .get_order_by_number(tenant, number)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
