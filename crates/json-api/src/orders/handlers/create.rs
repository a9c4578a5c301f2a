//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use atelier_app::domain::orders::{
    data::{OrderSubmission, RawCartLine},
    records::UserUuid,
};

use crate::{
    extensions::*,
    orders::{
        errors::into_status_error,
        models::{ColorBody, OrderResponse, ShippingAddressBody},
    },
    state::State,
};

/// Cart line as sent by the storefront
///
/// Lines with a missing product are dropped. Quantities that are not
/// positive whole numbers are treated as 1.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineRequest {
    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    #[salvo(schema(value_type = Option<Object>))]
    pub quantity: Option<Value>,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub color: Option<ColorBody>,
}

impl From<CartLineRequest> for RawCartLine {
    fn from(line: CartLineRequest) -> Self {
        RawCartLine {
            product: line.product,
            quantity: line.quantity,
            size: line.size,
            color: line.color.map(Into::into),
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<CartLineRequest>,

    pub shipping_address: ShippingAddressBody,

    /// `free`, `local` or `flat`; anything else ships free
    #[serde(default)]
    pub shipping_method: Option<String>,

    #[serde(default)]
    pub note: Option<String>,

    /// `cod`, `card`, `paypal` or `applepay`; anything else is cash on delivery
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl CreateOrderRequest {
    fn into_submission(self, user: UserUuid) -> OrderSubmission {
        OrderSubmission {
            user,
            lines: self.items.into_iter().map(RawCartLine::from).collect(),
            shipping_address: self.shipping_address.into(),
            shipping_method: self.shipping_method,
            note: self.note,
            payment_method: self.payment_method,
        }
    }
}

/// Create Order Handler
///
/// Places an order for the signed-in shopper's cart.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("tenant_header" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart cannot be fulfilled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "No signed-in user"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .orders
        .submit_order(tenant, json.into_inner().into_submission(user))
        .await
        .map_err(|error| {
            if error.is_rejection() {
                info!(tenant_uuid = %tenant, user_uuid = %user, "order rejected: {error}");
            }

            into_status_error(error)
        })?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
