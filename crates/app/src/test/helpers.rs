//! Test Helpers

use std::{borrow::Cow, error::Error as StdError, fmt};

use jiff::Timestamp;
use serde_json::json;
use sqlx::error::{DatabaseError, ErrorKind};

use crate::domain::{
    catalog::{
        data::NewProduct,
        records::{Inventory, ProductRecord, ProductStatus, ProductUuid},
    },
    orders::{
        data::{OrderSubmission, RawCartLine},
        records::{ShippingAddress, UserUuid},
    },
};

/// An active, tracked USD product with a unique slug.
pub(crate) fn new_product(price: u64, compare_at_price: Option<u64>, quantity: u32) -> NewProduct {
    let uuid = ProductUuid::new();

    NewProduct {
        uuid,
        title: "Merino Crew Sweater".to_string(),
        slug: format!("merino-crew-{}", uuid.into_uuid().simple()),
        currency: Some("USD".to_string()),
        price,
        compare_at_price,
        image: Some("https://cdn.example.com/merino.jpg".to_string()),
        inventory: Inventory {
            track: true,
            quantity,
        },
        status: ProductStatus::Active,
    }
}

/// The catalog record [`new_product`] would produce once stored.
pub(crate) fn product_record(product: NewProduct) -> ProductRecord {
    ProductRecord {
        uuid: product.uuid,
        title: product.title,
        slug: product.slug,
        currency: product.currency.unwrap_or_else(|| "USD".to_string()),
        price: product.price,
        compare_at_price: product.compare_at_price,
        image: product.image,
        inventory: product.inventory,
        status: product.status,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn cart_line(product: ProductUuid, quantity: u32) -> RawCartLine {
    RawCartLine {
        product: Some(product.to_string()),
        quantity: Some(json!(quantity)),
        size: None,
        color: None,
    }
}

pub(crate) fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ines Duarte".to_string(),
        phone: Some("+351 912 345 678".to_string()),
        line1: "Rua Augusta 120".to_string(),
        line2: None,
        city: "Lisboa".to_string(),
        region: None,
        postal_code: Some("1100-053".to_string()),
        country: "PT".to_string(),
    }
}

pub(crate) fn submission(lines: Vec<RawCartLine>, shipping_method: &str) -> OrderSubmission {
    OrderSubmission {
        user: UserUuid::new(),
        lines,
        shipping_address: shipping_address(),
        shipping_method: Some(shipping_method.to_string()),
        note: Some("Gift wrap, please".to_string()),
        payment_method: Some("card".to_string()),
    }
}

#[derive(Debug)]
struct SqlState(&'static str);

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sqlstate {}", self.0)
    }
}

impl StdError for SqlState {}

impl DatabaseError for SqlState {
    fn message(&self) -> &str {
        "transaction aborted"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.0))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A database error carrying the given SQLSTATE `code`.
pub(crate) fn database_error(code: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(SqlState(code)))
}
