//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar, types::Json,
};
use uuid::Uuid;

use crate::{
    database::{
        bind_amount, bind_quantity, try_get_amount, try_get_optional_amount, try_get_parsed,
        try_get_quantity,
    },
    domain::{
        catalog::records::ProductUuid,
        orders::{
            data::{InsertOutcome, NewOrder, OrderStatusUpdate},
            numbers::OrderNumber,
            options::{OrderStatus, PaymentMethod, PaymentStatus, ShippingMethod},
            records::{
                Color, OrderLineItemRecord, OrderRecord, OrderUuid, ShippingAddress, UserUuid,
            },
        },
    },
};

const ORDER_NUMBER_EXISTS_SQL: &str = include_str!("sql/order_number_exists.sql");
const INSERT_ORDER_SQL: &str = include_str!("sql/insert_order.sql");
const INSERT_ORDER_ITEMS_SQL: &str = include_str!("sql/insert_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_BY_NUMBER_SQL: &str = include_str!("sql/get_order_by_number.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

/// An `orders` row before its line items are attached.
#[derive(Debug)]
struct OrderRow {
    uuid: OrderUuid,
    order_number: OrderNumber,
    user_uuid: UserUuid,
    currency: String,
    subtotal: u64,
    discount: u64,
    shipping_cost: u64,
    total: u64,
    shipping_method: ShippingMethod,
    shipping_address: ShippingAddress,
    note: Option<String>,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    status: OrderStatus,
    transaction_id: Option<String>,
    created_at: jiff::Timestamp,
    updated_at: jiff::Timestamp,
}

impl OrderRow {
    fn into_record(self, items: Vec<OrderLineItemRecord>) -> OrderRecord {
        OrderRecord {
            uuid: self.uuid,
            order_number: self.order_number,
            user_uuid: self.user_uuid,
            items,
            currency: self.currency,
            subtotal: self.subtotal,
            discount: self.discount,
            shipping_cost: self.shipping_cost,
            total: self.total,
            shipping_method: self.shipping_method,
            shipping_address: self.shipping_address,
            note: self.note,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            status: self.status,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug)]
struct OrderItemRow {
    order_uuid: OrderUuid,
    item: OrderLineItemRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn order_number_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        number: &OrderNumber,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ORDER_NUMBER_EXISTS_SQL)
            .bind(number.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "orders.repository.insert_order",
        skip(self, tx, order),
        fields(order_uuid = %order.uuid, order_number = %order.order_number),
        err
    )]
    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrder,
    ) -> Result<InsertOutcome, sqlx::Error> {
        let inserted = query_as::<Postgres, OrderRow>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number.as_str())
            .bind(order.user_uuid.into_uuid())
            .bind(&order.currency)
            .bind(bind_amount(order.subtotal, "subtotal")?)
            .bind(bind_amount(order.discount, "discount")?)
            .bind(bind_amount(order.shipping_cost, "shipping_cost")?)
            .bind(bind_amount(order.total, "total")?)
            .bind(order.shipping_method.as_str())
            .bind(Json(&order.shipping_address))
            .bind(&order.note)
            .bind(order.payment_method.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        let Some(row) = inserted else {
            return Ok(InsertOutcome::NumberTaken);
        };

        self.insert_order_items(tx, row.uuid, &order.items).await?;

        Ok(InsertOutcome::Created(row.into_record(order.items)))
    }

    async fn insert_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderLineItemRecord],
    ) -> Result<(), sqlx::Error> {
        let mut positions = Vec::with_capacity(items.len());
        let mut product_uuids = Vec::with_capacity(items.len());
        let mut titles = Vec::with_capacity(items.len());
        let mut slugs = Vec::with_capacity(items.len());
        let mut images = Vec::with_capacity(items.len());
        let mut unit_prices = Vec::with_capacity(items.len());
        let mut compare_at_prices = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        let mut sizes = Vec::with_capacity(items.len());
        let mut color_names = Vec::with_capacity(items.len());
        let mut color_codes = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

            positions.push(position);
            product_uuids.push(item.product_uuid.into_uuid());
            titles.push(item.title.clone());
            slugs.push(item.slug.clone());
            images.push(item.image.clone());
            unit_prices.push(bind_amount(item.unit_price, "unit_price")?);
            compare_at_prices.push(
                item.compare_at_price
                    .map(|amount| bind_amount(amount, "compare_at_price"))
                    .transpose()?,
            );
            quantities.push(bind_quantity(item.quantity, "quantity")?);
            sizes.push(item.size.clone());
            color_names.push(item.color.as_ref().map(|color| color.name.clone()));
            color_codes.push(item.color.as_ref().map(|color| color.code.clone()));
        }

        query(INSERT_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(positions)
            .bind(product_uuids)
            .bind(titles)
            .bind(slugs)
            .bind(images)
            .bind(unit_prices)
            .bind(compare_at_prices)
            .bind(quantities)
            .bind(sizes)
            .bind(color_names)
            .bind(color_codes)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, vec![row])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn get_order_by_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        number: &OrderNumber,
    ) -> Result<OrderRecord, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(GET_ORDER_BY_NUMBER_SQL)
            .bind(number.as_str())
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, vec![row])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, OrderRow>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, rows).await
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        update: OrderStatusUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        let row = query_as::<Postgres, OrderRow>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(update.status.map(OrderStatus::as_str))
            .bind(update.payment_status.map(PaymentStatus::as_str))
            .bind(update.transaction_id)
            .fetch_one(&mut **tx)
            .await?;

        self.attach_items(tx, vec![row])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Load the line items of `rows` in one query, keeping row order.
    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = rows.iter().map(|row| row.uuid.into_uuid()).collect();

        let item_rows = query_as::<Postgres, OrderItemRow>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut items: FxHashMap<OrderUuid, Vec<OrderLineItemRecord>> = FxHashMap::default();

        for row in item_rows {
            items.entry(row.order_uuid).or_default().push(row.item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let order_items = items.remove(&row.uuid).unwrap_or_default();

                row.into_record(order_items)
            })
            .collect())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let currency: String = row.try_get("currency")?;
        let Json(shipping_address) = row.try_get::<Json<ShippingAddress>, _>("shipping_address")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: try_get_parsed::<OrderNumber>(row, "order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            currency: currency.trim_end().to_string(),
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total: try_get_amount(row, "total")?,
            shipping_method: try_get_parsed::<ShippingMethod>(row, "shipping_method")?,
            shipping_address,
            note: row.try_get("note")?,
            payment_method: try_get_parsed::<PaymentMethod>(row, "payment_method")?,
            payment_status: try_get_parsed::<PaymentStatus>(row, "payment_status")?,
            status: try_get_parsed::<OrderStatus>(row, "status")?,
            transaction_id: row.try_get("transaction_id")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let color_name: Option<String> = row.try_get("color_name")?;
        let color_code: Option<String> = row.try_get("color_code")?;

        let color = color_name
            .zip(color_code)
            .map(|(name, code)| Color { name, code });

        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderLineItemRecord {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                title: row.try_get("title")?,
                slug: row.try_get("slug")?,
                image: row.try_get("image")?,
                unit_price: try_get_amount(row, "unit_price")?,
                compare_at_price: try_get_optional_amount(row, "compare_at_price")?,
                quantity: try_get_quantity(row, "quantity")?,
                size: row.try_get("size")?,
                color,
            },
        })
    }
}
