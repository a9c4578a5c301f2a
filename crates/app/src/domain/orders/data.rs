//! Order Data

use serde_json::Value;

use crate::domain::orders::{
    numbers::OrderNumber,
    options::{OrderStatus, PaymentMethod, PaymentStatus, ShippingMethod},
    records::{Color, OrderLineItemRecord, OrderRecord, OrderUuid, ShippingAddress, UserUuid},
};

/// One cart line exactly as the shopper submitted it.
///
/// Nothing here is trusted yet: the product reference may be missing or
/// malformed and the quantity may be any JSON value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCartLine {
    pub product: Option<String>,
    pub quantity: Option<Value>,
    pub size: Option<String>,
    pub color: Option<Color>,
}

/// Checkout Submission
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSubmission {
    pub user: UserUuid,
    pub lines: Vec<RawCartLine>,
    pub shipping_address: ShippingAddress,
    pub shipping_method: Option<String>,
    pub note: Option<String>,
    pub payment_method: Option<String>,
}

/// New Order Data
///
/// Fully priced order ready to be stored. Status and payment status are
/// always `pending` on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub user_uuid: UserUuid,
    pub items: Vec<OrderLineItemRecord>,
    pub currency: String,
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub shipping_method: ShippingMethod,
    pub shipping_address: ShippingAddress,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
}

/// Result of trying to store a new order.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Created(OrderRecord),

    /// Another order already holds the order number; nothing was written.
    NumberTaken,
}

/// Order Status Update Data
///
/// The only fields of an order that may change after placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStatusUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub transaction_id: Option<String>,
}

impl OrderStatusUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.payment_status.is_none() && self.transaction_id.is_none()
    }
}
