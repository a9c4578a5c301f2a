//! Order placement workflow.

use jiff::Timestamp;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::domain::{
    catalog::{records::ProductUuid, store::CatalogStore},
    orders::{
        cart,
        data::{InsertOutcome, NewOrder, OrderSubmission},
        errors::OrdersServiceError,
        numbers::{OrderNumber, OrderNumbers},
        options::{PaymentMethod, ShippingMethod},
        pricing::{self, PricedOrder},
        records::{OrderRecord, OrderUuid},
        reservation,
        store::OrderStore,
    },
};

/// Candidates checked against existing orders before one is used anyway.
pub(crate) const ORDER_NUMBER_CHECK_ATTEMPTS: usize = 3;

/// Inserts tried before giving up on finding a free order number.
pub(crate) const ORDER_INSERT_ATTEMPTS: usize = 3;

/// Place an order: normalise and price the cart, reserve tracked stock and
/// store the order under a fresh order number.
///
/// Nothing is reserved until every line has been priced. When storing the
/// order fails, the reservations are released before the error is returned.
pub(crate) async fn place_order(
    catalog: &dyn CatalogStore,
    orders: &dyn OrderStore,
    numbers: &dyn OrderNumbers,
    submission: OrderSubmission,
) -> Result<OrderRecord, OrdersServiceError> {
    let lines = cart::normalize(submission.lines)?;

    let mut products: SmallVec<[ProductUuid; 8]> = SmallVec::new();

    for line in &lines {
        if !products.contains(&line.product) {
            products.push(line.product);
        }
    }

    let found = catalog.find_active_by_ids(&products).await?;

    let shipping_method = ShippingMethod::from_selection(submission.shipping_method.as_deref());
    let payment_method = PaymentMethod::from_selection(submission.payment_method.as_deref());

    let priced = pricing::price_cart(lines, &found, shipping_method)?;

    let applied = reservation::reserve_inventory(catalog, &priced.reservations).await?;

    let PricedOrder {
        items,
        currency,
        subtotal,
        discount,
        shipping_cost,
        total,
        ..
    } = priced;

    let stored = match allocate_order_number(orders, numbers).await {
        Ok(order_number) => {
            let order = NewOrder {
                uuid: OrderUuid::new(),
                order_number,
                user_uuid: submission.user,
                items,
                currency,
                subtotal,
                discount,
                shipping_cost,
                total,
                shipping_method,
                shipping_address: submission.shipping_address,
                note: submission.note,
                payment_method,
            };

            store_order(orders, numbers, order).await
        }
        Err(error) => Err(error),
    };

    match stored {
        Ok(created) => {
            info!(
                order_uuid = %created.uuid,
                order_number = %created.order_number,
                total = created.total,
                "placed order"
            );

            Ok(created)
        }
        Err(error) => {
            reservation::release_inventory(catalog, &applied).await;

            Err(error)
        }
    }
}

async fn store_order(
    orders: &dyn OrderStore,
    numbers: &dyn OrderNumbers,
    mut order: NewOrder,
) -> Result<OrderRecord, OrdersServiceError> {
    for attempt in 1..=ORDER_INSERT_ATTEMPTS {
        let outcome = orders
            .insert(order.clone())
            .await
            .map_err(OrdersServiceError::Persistence)?;

        match outcome {
            InsertOutcome::Created(created) => return Ok(created),
            InsertOutcome::NumberTaken => warn!(
                order_number = %order.order_number,
                attempt,
                "order number taken on insert"
            ),
        }

        if attempt < ORDER_INSERT_ATTEMPTS {
            order.order_number = allocate_order_number(orders, numbers).await?;
        }
    }

    Err(OrdersServiceError::OrderNumberExhausted)
}

/// Pick a candidate that no stored order uses yet, giving up after
/// [`ORDER_NUMBER_CHECK_ATTEMPTS`] checks and returning the last candidate.
async fn allocate_order_number(
    orders: &dyn OrderStore,
    numbers: &dyn OrderNumbers,
) -> Result<OrderNumber, OrdersServiceError> {
    let now = Timestamp::now();
    let mut candidate = numbers.generate(now);

    for attempt in 1..=ORDER_NUMBER_CHECK_ATTEMPTS {
        let taken = orders
            .exists_by_number(&candidate)
            .await
            .map_err(OrdersServiceError::Persistence)?;

        if !taken {
            return Ok(candidate);
        }

        warn!(order_number = %candidate, attempt, "order number collision");

        if attempt < ORDER_NUMBER_CHECK_ATTEMPTS {
            candidate = numbers.generate(now);
        }
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::{
            catalog::records::ProductStatus,
            orders::{
                numbers::{MockOrderNumbers, RandomOrderNumbers},
                options::{OrderStatus, PaymentStatus},
            },
        },
        test::{
            helpers::{cart_line, new_product, product_record, submission},
            memory::{MemoryCatalog, MemoryOrders},
        },
    };

    use super::*;

    fn scripted(numbers: &[&str]) -> Result<MockOrderNumbers, Box<dyn std::error::Error>> {
        let mut queue = numbers
            .iter()
            .map(|number| number.parse::<OrderNumber>())
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        let mut mock = MockOrderNumbers::new();

        mock.expect_generate()
            .returning(move |_| queue.next().expect("ran out of scripted order numbers"));

        Ok(mock)
    }

    #[tokio::test]
    async fn local_delivery_with_markdown_is_priced_and_reserved() -> TestResult {
        let shirt = product_record(new_product(50_00, Some(80_00), 5));
        let catalog = MemoryCatalog::new([shirt.clone()]);
        let orders = MemoryOrders::new();

        let order = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![cart_line(shirt.uuid, 2)], "local"),
        )
        .await?;

        assert_eq!(order.subtotal, 100_00);
        assert_eq!(order.discount, 60_00);
        assert_eq!(order.shipping_cost, 35_00);
        assert_eq!(order.total, 75_00);
        assert_eq!(order.shipping_method, ShippingMethod::Local);
        assert_eq!(order.payment_method, PaymentMethod::Card);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(catalog.stock(shirt.uuid), Some(3));
        assert_eq!(orders.orders(), vec![order]);

        Ok(())
    }

    #[tokio::test]
    async fn insufficient_stock_leaves_nothing_behind() {
        let coat = product_record(new_product(120_00, None, 4));
        let catalog = MemoryCatalog::new([coat.clone()]);
        let orders = MemoryOrders::new();

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![cart_line(coat.uuid, 10)], "free"),
        )
        .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InsufficientStock { product }) if product == coat.uuid),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(catalog.stock(coat.uuid), Some(4));
        assert!(orders.orders().is_empty());
    }

    #[tokio::test]
    async fn quantity_beyond_integer_range_is_insufficient_stock() {
        let coat = product_record(new_product(120_00, None, 4));
        let catalog = MemoryCatalog::new([coat.clone()]);
        let orders = MemoryOrders::new();

        let mut line = cart_line(coat.uuid, 1);
        line.quantity = Some(json!(3_000_000_000_u64));

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![line], "free"),
        )
        .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InsufficientStock { product }) if product == coat.uuid),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(catalog.stock(coat.uuid), Some(4));
        assert!(orders.orders().is_empty());
    }

    #[tokio::test]
    async fn untracked_line_quantity_is_capped() -> TestResult {
        let mut new = new_product(1_00, None, 0);
        new.inventory.track = false;
        let sticker = product_record(new);

        let catalog = MemoryCatalog::new([sticker.clone()]);
        let orders = MemoryOrders::new();

        let mut line = cart_line(sticker.uuid, 1);
        line.quantity = Some(json!("3000000000"));

        let order = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![line], "free"),
        )
        .await?;

        let quantities: Vec<u32> = order.items.iter().map(|item| item.quantity).collect();

        assert_eq!(quantities, vec![cart::MAX_LINE_QUANTITY]);
        assert_eq!(order.subtotal, u64::from(cart::MAX_LINE_QUANTITY) * 1_00);

        Ok(())
    }

    #[tokio::test]
    async fn failed_second_line_restores_the_first() {
        let a = product_record(new_product(10_00, None, 5));
        let b = product_record(new_product(20_00, None, 1));
        let catalog = MemoryCatalog::new([a.clone(), b.clone()]);
        let orders = MemoryOrders::new();

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![cart_line(a.uuid, 2), cart_line(b.uuid, 3)], "flat"),
        )
        .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InsufficientStock { product }) if product == b.uuid),
            "expected InsufficientStock for b, got {result:?}"
        );
        assert_eq!(catalog.stock(a.uuid), Some(5));
        assert_eq!(catalog.stock(b.uuid), Some(1));
        assert!(orders.orders().is_empty());
    }

    #[tokio::test]
    async fn archived_product_rejects_the_whole_cart() {
        let active = product_record(new_product(10_00, None, 5));
        let mut archived = product_record(new_product(10_00, None, 5));
        archived.status = ProductStatus::Archived;

        let catalog = MemoryCatalog::new([active.clone(), archived.clone()]);
        let orders = MemoryOrders::new();

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(
                vec![cart_line(active.uuid, 1), cart_line(archived.uuid, 1)],
                "free",
            ),
        )
        .await;

        match result {
            Err(OrdersServiceError::ProductUnavailable { products }) => {
                assert_eq!(products, vec![archived.uuid.to_string()]);
            }
            other => panic!("expected ProductUnavailable, got {other:?}"),
        }

        assert_eq!(catalog.stock(active.uuid), Some(5));
        assert_eq!(catalog.stock(archived.uuid), Some(5));
        assert!(orders.orders().is_empty());
    }

    #[tokio::test]
    async fn cart_without_products_is_invalid() {
        let catalog = MemoryCatalog::default();
        let orders = MemoryOrders::new();

        let mut lines = vec![cart_line(ProductUuid::new(), 1)];
        if let Some(line) = lines.first_mut() {
            line.product = None;
        }

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(lines, "free"),
        )
        .await;

        assert!(matches!(result, Err(OrdersServiceError::InvalidOrder)));
    }

    #[tokio::test]
    async fn untracked_products_are_not_reserved() -> TestResult {
        let mut new = new_product(15_00, None, 0);
        new.inventory.track = false;
        let gift_card = product_record(new);

        let catalog = MemoryCatalog::new([gift_card.clone()]);
        let orders = MemoryOrders::new();

        let order = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![cart_line(gift_card.uuid, 50)], "free"),
        )
        .await?;

        assert_eq!(order.subtotal, 750_00);
        assert_eq!(catalog.stock(gift_card.uuid), Some(0));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_selections_fall_back_to_defaults() -> TestResult {
        let shirt = product_record(new_product(50_00, None, 5));
        let catalog = MemoryCatalog::new([shirt.clone()]);
        let orders = MemoryOrders::new();

        let mut request = submission(vec![cart_line(shirt.uuid, 1)], "teleport");
        request.payment_method = Some("barter".to_string());

        let mut line = cart_line(shirt.uuid, 1);
        line.quantity = Some(json!("lots"));
        request.lines = vec![line];

        let order = place_order(&catalog, &orders, &RandomOrderNumbers, request).await?;

        assert_eq!(order.shipping_method, ShippingMethod::Free);
        assert_eq!(order.shipping_cost, 0);
        assert_eq!(order.payment_method, PaymentMethod::Cod);
        assert_eq!(order.items.first().map(|item| item.quantity), Some(1));

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_orders_never_oversell() -> TestResult {
        let scarf = product_record(new_product(30_00, None, 7));
        let catalog = Arc::new(MemoryCatalog::new([scarf.clone()]));
        let orders = Arc::new(MemoryOrders::new());

        let mut handles = Vec::new();

        for _ in 0..20 {
            let catalog = Arc::clone(&catalog);
            let orders = Arc::clone(&orders);
            let request = submission(vec![cart_line(scarf.uuid, 2)], "free");

            handles.push(tokio::spawn(async move {
                place_order(catalog.as_ref(), orders.as_ref(), &RandomOrderNumbers, request).await
            }));
        }

        let mut placed = 0;

        for handle in handles {
            match handle.await? {
                Ok(_) => placed += 1,
                Err(OrdersServiceError::InsufficientStock { .. }) => {}
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(placed, 3, "7 units cover three orders of 2");
        assert_eq!(catalog.stock(scarf.uuid), Some(1));
        assert_eq!(orders.orders().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn existing_order_number_is_regenerated() -> TestResult {
        let shirt = product_record(new_product(10_00, None, 10));
        let catalog = MemoryCatalog::new([shirt.clone()]);
        let orders = MemoryOrders::new();

        let first = place_order(
            &catalog,
            &orders,
            &scripted(&["FS-20260101-00000A"])?,
            submission(vec![cart_line(shirt.uuid, 1)], "free"),
        )
        .await?;

        let second = place_order(
            &catalog,
            &orders,
            &scripted(&["FS-20260101-00000A", "FS-20260101-00000B"])?,
            submission(vec![cart_line(shirt.uuid, 1)], "free"),
        )
        .await?;

        assert_eq!(first.order_number.as_str(), "FS-20260101-00000A");
        assert_eq!(second.order_number.as_str(), "FS-20260101-00000B");

        Ok(())
    }

    #[tokio::test]
    async fn number_taken_on_insert_is_retried() -> TestResult {
        let shirt = product_record(new_product(10_00, None, 10));
        let catalog = MemoryCatalog::new([shirt.clone()]);
        let orders =
            MemoryOrders::with_hidden_numbers(["FS-20260101-0000C1".parse::<OrderNumber>()?]);

        let order = place_order(
            &catalog,
            &orders,
            &scripted(&["FS-20260101-0000C1", "FS-20260101-0000C2"])?,
            submission(vec![cart_line(shirt.uuid, 1)], "free"),
        )
        .await?;

        assert_eq!(order.order_number.as_str(), "FS-20260101-0000C2");
        assert_eq!(catalog.stock(shirt.uuid), Some(9));

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_order_numbers_release_stock() -> TestResult {
        let shirt = product_record(new_product(10_00, None, 10));
        let catalog = MemoryCatalog::new([shirt.clone()]);

        let taken = ["FS-20260101-0000D1", "FS-20260101-0000D2", "FS-20260101-0000D3"];
        let orders = MemoryOrders::with_hidden_numbers(
            taken
                .iter()
                .map(|number| number.parse::<OrderNumber>())
                .collect::<Result<Vec<_>, _>>()?,
        );

        let result = place_order(
            &catalog,
            &orders,
            &scripted(&taken)?,
            submission(vec![cart_line(shirt.uuid, 4)], "free"),
        )
        .await;

        assert!(
            matches!(result, Err(OrdersServiceError::OrderNumberExhausted)),
            "expected OrderNumberExhausted, got {result:?}"
        );
        assert_eq!(catalog.stock(shirt.uuid), Some(10));
        assert!(orders.orders().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_insert_releases_stock() {
        let a = product_record(new_product(10_00, None, 6));
        let b = product_record(new_product(25_00, None, 2));
        let catalog = MemoryCatalog::new([a.clone(), b.clone()]);
        let orders = MemoryOrders::new();
        orders.fail_inserts();

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![cart_line(a.uuid, 2), cart_line(b.uuid, 2)], "free"),
        )
        .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Persistence(_))),
            "expected Persistence, got {result:?}"
        );
        assert_eq!(catalog.stock(a.uuid), Some(6));
        assert_eq!(catalog.stock(b.uuid), Some(2));
    }

    #[tokio::test]
    async fn failed_release_still_reports_the_original_error() {
        let a = product_record(new_product(10_00, None, 6));
        let catalog = MemoryCatalog::new([a.clone()]);
        let orders = MemoryOrders::new();
        orders.fail_inserts();
        catalog.fail_increments();

        let result = place_order(
            &catalog,
            &orders,
            &RandomOrderNumbers,
            submission(vec![cart_line(a.uuid, 2)], "free"),
        )
        .await;

        assert!(matches!(result, Err(OrdersServiceError::Persistence(_))));
        assert_eq!(catalog.stock(a.uuid), Some(4), "release is best effort");
    }
}
