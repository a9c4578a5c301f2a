//! Order pricing.

use rustc_hash::FxHashMap;

use crate::domain::{
    catalog::records::{ProductRecord, ProductUuid},
    orders::{
        cart::CartLine, errors::OrdersServiceError, options::ShippingMethod,
        records::OrderLineItemRecord, reservation::Reservation,
    },
};

/// A cart priced against the catalog, ready for reservation and storage.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PricedOrder {
    pub items: Vec<OrderLineItemRecord>,
    pub reservations: Vec<Reservation>,
    pub currency: String,
    pub subtotal: u64,
    pub discount: u64,
    pub shipping_cost: u64,
    pub total: u64,
}

/// Price `lines` using the active `products` fetched for them.
///
/// Every line must resolve to an active product, otherwise the whole cart is
/// rejected and the unresolved products are listed. Line items snapshot the
/// product's title, slug, image and prices.
pub(crate) fn price_cart(
    lines: Vec<CartLine>,
    products: &[ProductRecord],
    shipping: ShippingMethod,
) -> Result<PricedOrder, OrdersServiceError> {
    if lines.is_empty() {
        return Err(OrdersServiceError::InvalidOrder);
    }

    let catalog: FxHashMap<ProductUuid, &ProductRecord> = products
        .iter()
        .filter(|product| product.is_active())
        .map(|product| (product.uuid, product))
        .collect();

    let mut missing: Vec<ProductUuid> = Vec::new();

    for line in &lines {
        if !catalog.contains_key(&line.product) && !missing.contains(&line.product) {
            missing.push(line.product);
        }
    }

    if !missing.is_empty() {
        return Err(OrdersServiceError::ProductUnavailable {
            products: missing.iter().map(ToString::to_string).collect(),
        });
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut reservations = Vec::new();
    let mut currency: Option<&str> = None;
    let mut subtotal: u64 = 0;
    let mut discount: u64 = 0;

    for line in lines {
        let Some(product) = catalog.get(&line.product).copied() else {
            continue;
        };

        match currency {
            Some(first) if first != product.currency => {
                return Err(OrdersServiceError::MixedCurrency {
                    first: first.to_string(),
                    second: product.currency.clone(),
                });
            }
            Some(_) => {}
            None => currency = Some(&product.currency),
        }

        let quantity = u64::from(line.quantity);

        subtotal = product
            .price
            .checked_mul(quantity)
            .and_then(|amount| subtotal.checked_add(amount))
            .ok_or(OrdersServiceError::AmountOverflow)?;

        if let Some(markdown) = product
            .compare_at_price
            .and_then(|compare_at| compare_at.checked_sub(product.price))
            .filter(|markdown| *markdown > 0)
        {
            discount = markdown
                .checked_mul(quantity)
                .and_then(|amount| discount.checked_add(amount))
                .ok_or(OrdersServiceError::AmountOverflow)?;
        }

        if product.inventory.track {
            reservations.push(Reservation {
                product: product.uuid,
                quantity: line.quantity,
            });
        }

        items.push(OrderLineItemRecord {
            product_uuid: product.uuid,
            title: product.title.clone(),
            slug: product.slug.clone(),
            image: product.image.clone(),
            unit_price: product.price,
            compare_at_price: product.compare_at_price,
            quantity: line.quantity,
            size: line.size,
            color: line.color,
        });
    }

    let currency = currency
        .map(str::to_string)
        .ok_or(OrdersServiceError::InvalidOrder)?;

    let shipping_cost = shipping.cost();

    let total = subtotal
        .checked_add(shipping_cost)
        .ok_or(OrdersServiceError::AmountOverflow)?
        .saturating_sub(discount);

    Ok(PricedOrder {
        items,
        reservations,
        currency,
        subtotal,
        discount,
        shipping_cost,
        total,
    })
}
