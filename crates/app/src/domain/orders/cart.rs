//! Cart normalisation.

use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    catalog::records::ProductUuid,
    orders::{
        data::RawCartLine,
        errors::OrdersServiceError,
        records::Color,
    },
};

/// A cart line that references a well-formed product id with a usable quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CartLine {
    pub product: ProductUuid,
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<Color>,
}

/// Turn raw submitted lines into [`CartLine`]s, keeping their order.
///
/// Lines without a product reference are dropped. Duplicate products stay as
/// separate lines.
pub(crate) fn normalize(raw: Vec<RawCartLine>) -> Result<Vec<CartLine>, OrdersServiceError> {
    let mut lines = Vec::with_capacity(raw.len());
    let mut malformed = Vec::new();

    for line in raw {
        let Some(reference) = line
            .product
            .as_deref()
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
        else {
            continue;
        };

        let Ok(uuid) = Uuid::parse_str(reference) else {
            malformed.push(reference.to_string());
            continue;
        };

        lines.push(CartLine {
            product: ProductUuid::from_uuid(uuid),
            quantity: coerce_quantity(line.quantity.as_ref()),
            size: line.size,
            color: line.color,
        });
    }

    if lines.is_empty() && malformed.is_empty() {
        return Err(OrdersServiceError::InvalidOrder);
    }

    if !malformed.is_empty() {
        return Err(OrdersServiceError::ProductUnavailable {
            products: malformed,
        });
    }

    Ok(lines)
}

/// Largest quantity a single line can carry. Stock and order item quantities
/// are stored as `INTEGER`.
pub(crate) const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Read a submitted quantity leniently. Anything unusable becomes 1, anything
/// above [`MAX_LINE_QUANTITY`] becomes the cap.
pub(crate) fn coerce_quantity(value: Option<&Value>) -> u32 {
    let quantity = match value {
        Some(Value::Number(number)) => match (number.as_u64(), number.as_f64()) {
            (Some(whole), _) => saturate(whole),
            (None, Some(float)) => truncate(float),
            (None, None) => 1,
        },
        Some(Value::String(text)) => {
            let text = text.trim();

            match text.parse::<u64>() {
                Ok(whole) => saturate(whole),
                Err(_) => text.parse::<f64>().map_or(1, truncate),
            }
        }
        _ => 1,
    };

    quantity.max(1)
}

fn saturate(whole: u64) -> u32 {
    u32::try_from(whole).map_or(MAX_LINE_QUANTITY, |quantity| {
        quantity.min(MAX_LINE_QUANTITY)
    })
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite and clamped to the line quantity range first"
)]
fn truncate(value: f64) -> u32 {
    if !value.is_finite() || value < 1.0 {
        return 1;
    }

    value.trunc().min(f64::from(MAX_LINE_QUANTITY)) as u32
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(product: Option<&str>, quantity: Option<Value>) -> RawCartLine {
        RawCartLine {
            product: product.map(str::to_string),
            quantity,
            ..RawCartLine::default()
        }
    }

    #[test]
    fn quantity_accepts_integers_and_numeric_strings() {
        assert_eq!(coerce_quantity(Some(&json!(3))), 3);
        assert_eq!(coerce_quantity(Some(&json!("4"))), 4);
        assert_eq!(coerce_quantity(Some(&json!(" 7 "))), 7);
    }

    #[test]
    fn quantity_truncates_fractions() {
        assert_eq!(coerce_quantity(Some(&json!(2.9))), 2);
        assert_eq!(coerce_quantity(Some(&json!("5.5"))), 5);
    }

    #[test]
    fn unusable_quantities_collapse_to_one() {
        for value in [
            json!(0),
            json!(-3),
            json!(0.4),
            json!("abc"),
            json!(""),
            json!(null),
            json!(true),
            json!([2]),
            json!({"n": 2}),
        ] {
            assert_eq!(coerce_quantity(Some(&value)), 1, "value {value}");
        }

        assert_eq!(coerce_quantity(None), 1);
    }

    #[test]
    fn huge_quantities_saturate_at_line_cap() {
        assert_eq!(coerce_quantity(Some(&json!(u64::MAX))), MAX_LINE_QUANTITY);
        assert_eq!(coerce_quantity(Some(&json!(1e30))), MAX_LINE_QUANTITY);
        assert_eq!(
            coerce_quantity(Some(&json!(3_000_000_000_u64))),
            MAX_LINE_QUANTITY
        );
        assert_eq!(
            coerce_quantity(Some(&json!("3000000000"))),
            MAX_LINE_QUANTITY
        );
        assert_eq!(
            coerce_quantity(Some(&json!(2_147_483_647))),
            MAX_LINE_QUANTITY
        );
    }

    #[test]
    fn capped_quantities_fit_integer_columns() {
        let quantity = coerce_quantity(Some(&json!(3_000_000_000_u64)));

        assert!(
            i32::try_from(quantity).is_ok(),
            "capped quantity {quantity} must bind as INTEGER"
        );
    }

    #[test]
    fn lines_without_product_are_dropped() {
        let product = Uuid::now_v7();

        let lines = normalize(vec![
            raw(None, Some(json!(2))),
            raw(Some("   "), None),
            raw(Some(&product.to_string()), Some(json!(2))),
        ])
        .expect("one usable line");

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product.into_uuid(), product);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn empty_cart_is_invalid() {
        assert!(matches!(
            normalize(vec![]),
            Err(OrdersServiceError::InvalidOrder)
        ));

        assert!(matches!(
            normalize(vec![raw(None, Some(json!(1)))]),
            Err(OrdersServiceError::InvalidOrder)
        ));
    }

    #[test]
    fn malformed_product_ids_are_unavailable() {
        let product = Uuid::now_v7().to_string();

        let result = normalize(vec![raw(Some(&product), None), raw(Some("not-a-uuid"), None)]);

        match result {
            Err(OrdersServiceError::ProductUnavailable { products }) => {
                assert_eq!(products, vec!["not-a-uuid".to_string()]);
            }
            other => panic!("expected ProductUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_products_stay_separate_lines() {
        let product = Uuid::now_v7().to_string();

        let lines = normalize(vec![
            raw(Some(&product), Some(json!(1))),
            raw(Some(&product), Some(json!(2))),
        ])
        .expect("two lines");

        assert_eq!(
            lines.iter().map(|line| line.quantity).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
