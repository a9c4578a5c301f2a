//! Order Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use atelier_app::domain::orders::records::{
    Color, OrderLineItemRecord, OrderRecord, ShippingAddress,
};

/// Colour swatch of a line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ColorBody {
    /// Display name, e.g. `Navy`
    pub name: String,

    /// Swatch code, e.g. `#1B2A4A`
    pub code: String,
}

impl From<ColorBody> for Color {
    fn from(body: ColorBody) -> Self {
        Color {
            name: body.name,
            code: body.code,
        }
    }
}

impl From<Color> for ColorBody {
    fn from(color: Color) -> Self {
        ColorBody {
            name: color.name,
            code: color.code,
        }
    }
}

/// Shipping address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressBody {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    pub country: String,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        ShippingAddress {
            full_name: body.full_name,
            phone: body.phone,
            line1: body.line1,
            line2: body.line2,
            city: body.city,
            region: body.region,
            postal_code: body.postal_code,
            country: body.country,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        ShippingAddressBody {
            full_name: address.full_name,
            phone: address.phone,
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            region: address.region,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Order line item as captured at checkout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,

    /// Unit price in minor units at the time of purchase
    pub unit_price: u64,

    pub compare_at_price: Option<u64>,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<ColorBody>,
}

impl From<OrderLineItemRecord> for OrderItemResponse {
    fn from(item: OrderLineItemRecord) -> Self {
        OrderItemResponse {
            product_uuid: item.product_uuid.into(),
            title: item.title,
            slug: item.slug,
            image: item.image,
            unit_price: item.unit_price,
            compare_at_price: item.compare_at_price,
            quantity: item.quantity,
            size: item.size,
            color: item.color.map(ColorBody::from),
        }
    }
}

/// Order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-readable order number, e.g. `FS-20260314-3F9A1C`
    pub order_number: String,

    pub user_uuid: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub currency: String,

    /// Amounts in minor units
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,

    pub shipping_method: String,
    pub shipping_address: ShippingAddressBody,
    pub note: Option<String>,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            order_number: order.order_number.into_string(),
            user_uuid: order.user_uuid.into(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            currency: order.currency,
            subtotal: order.subtotal,
            discount: order.discount,
            shipping_cost: order.shipping_cost,
            total: order.total,
            shipping_method: order.shipping_method.to_string(),
            shipping_address: order.shipping_address.into(),
            note: order.note,
            payment_method: order.payment_method.to_string(),
            payment_status: order.payment_status.to_string(),
            status: order.status.to_string(),
            transaction_id: order.transaction_id,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
