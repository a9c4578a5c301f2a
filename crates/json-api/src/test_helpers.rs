//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use atelier_app::{
    context::AppContext,
    domain::{
        catalog::{
            MockCatalogService,
            records::{Inventory, ProductRecord, ProductStatus, ProductUuid},
        },
        orders::{
            MockOrdersService,
            numbers::OrderNumber,
            options::{OrderStatus, PaymentMethod, PaymentStatus, ShippingMethod},
            records::{OrderLineItemRecord, OrderRecord, OrderUuid, ShippingAddress, UserUuid},
        },
        tenants::records::TenantUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::max());

#[salvo::handler]
pub(crate) async fn inject_identity(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_tenant_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_create_product().never();
    catalog.expect_get_product().never();
    catalog.expect_update_product_status().never();
    catalog.expect_adjust_inventory().never();

    catalog
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_submit_order().never();
    orders.expect_get_order().never();
    orders.expect_get_order_by_number().never();
    orders.expect_list_user_orders().never();
    orders.expect_update_order_status().never();

    orders
}

fn state(catalog: MockCatalogService, orders: MockOrdersService) -> Arc<State> {
    State::from_app_context(AppContext {
        catalog: Arc::new(catalog),
        orders: Arc::new(orders),
    })
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_catalog_mock(), orders)))
            .hoop(inject_identity)
            .push(route),
    )
}

/// Like [`orders_service`] but without a signed-in user.
pub(crate) fn anonymous_orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(strict_catalog_mock(), orders)))
            .hoop(inject_tenant_only)
            .push(route),
    )
}

pub(crate) fn catalog_service(catalog: MockCatalogService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(catalog, strict_orders_mock())))
            .hoop(inject_identity)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        title: "Linen Shirt".to_string(),
        slug: "linen-shirt".to_string(),
        currency: "USD".to_string(),
        price: 120_00,
        compare_at_price: Some(150_00),
        image: None,
        inventory: Inventory {
            track: true,
            quantity: 8,
        },
        status: ProductStatus::Active,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, product: ProductUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        order_number: OrderNumber::from_parts(Timestamp::UNIX_EPOCH, 0x3F_9A1C),
        user_uuid: TEST_USER_UUID,
        items: vec![OrderLineItemRecord {
            product_uuid: product,
            title: "Linen Shirt".to_string(),
            slug: "linen-shirt".to_string(),
            image: None,
            unit_price: 120_00,
            compare_at_price: Some(150_00),
            quantity: 2,
            size: Some("M".to_string()),
            color: None,
        }],
        currency: "USD".to_string(),
        subtotal: 240_00,
        discount: 60_00,
        shipping_cost: 35_00,
        total: 215_00,
        shipping_method: ShippingMethod::Local,
        shipping_address: ShippingAddress {
            full_name: "Ada Lovelace".to_string(),
            line1: "12 Marylebone Road".to_string(),
            city: "London".to_string(),
            country: "GB".to_string(),
            ..ShippingAddress::default()
        },
        note: None,
        payment_method: PaymentMethod::Card,
        payment_status: PaymentStatus::Pending,
        status: OrderStatus::Pending,
        transaction_id: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
