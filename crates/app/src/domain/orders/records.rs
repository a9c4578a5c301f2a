//! Order Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        catalog::records::ProductUuid,
        orders::{
            numbers::OrderNumber,
            options::{OrderStatus, PaymentMethod, PaymentStatus, ShippingMethod},
        },
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// The shopper an order belongs to. Users live outside this crate.
#[derive(Debug)]
pub struct OrderUser;

/// User UUID
pub type UserUuid = TypedUuid<OrderUser>;

/// A named colour swatch chosen for a line, e.g. `Navy` / `#1B2A4A`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub code: String,
}

/// Where the order ships to. Stored verbatim as supplied at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

/// Order Line Item Record
///
/// Title, slug, image and both prices are copies taken from the catalog when
/// the order was placed; later catalog edits never reach them.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineItemRecord {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub unit_price: u64,
    pub compare_at_price: Option<u64>,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<Color>,
}

/// Order Record
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
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
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
