//! Update Order Status Handler

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

use atelier_app::domain::orders::{
    data::OrderStatusUpdate,
    options::{OrderStatus, PaymentStatus, UnknownOption},
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Update Order Status Request
///
/// Omitted fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// `pending`, `confirmed`, `shipped`, `delivered` or `cancelled`
    #[serde(default)]
    pub status: Option<String>,

    /// `pending`, `paid`, `failed` or `refunded`
    #[serde(default)]
    pub payment_status: Option<String>,

    /// Payment provider reference
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl TryFrom<UpdateOrderStatusRequest> for OrderStatusUpdate {
    type Error = UnknownOption;

    fn try_from(request: UpdateOrderStatusRequest) -> Result<Self, Self::Error> {
        Ok(OrderStatusUpdate {
            status: request
                .status
                .as_deref()
                .map(str::parse::<OrderStatus>)
                .transpose()?,
            payment_status: request
                .payment_status
                .as_deref()
                .map(str::parse::<PaymentStatus>)
                .transpose()?,
            transaction_id: request.transaction_id,
        })
    }
}

/// Update Order Status Handler
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("tenant_header" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown or missing status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_status",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let order = order.into_inner();

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let update = OrderStatusUpdate::try_from(json.into_inner())
        .or_400()?;

    let order = state
        .app
        .orders
        .update_order_status(tenant, order.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
