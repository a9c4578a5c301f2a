//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use atelier_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::InvalidOrder => {
            StatusError::unprocessable_entity().brief("Order has no valid cart lines")
        }
        OrdersServiceError::ProductUnavailable { .. }
        | OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::MixedCurrency { .. } => {
            StatusError::unprocessable_entity().brief(error.to_string())
        }
        OrdersServiceError::AmountOverflow
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::NotFound => StatusError::not_found(),
        OrdersServiceError::OrderNumberExhausted => {
            error!("failed to allocate an order number");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Persistence(source) | OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
