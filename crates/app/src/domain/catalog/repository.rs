//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{
        bind_amount, bind_quantity, try_get_amount, try_get_optional_amount, try_get_parsed,
        try_get_quantity,
    },
    domain::catalog::{
        data::NewProduct,
        records::{Inventory, ProductRecord, ProductStatus, ProductUuid},
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const FIND_ACTIVE_PRODUCTS_SQL: &str = include_str!("sql/find_active_products.sql");
const DECREMENT_INVENTORY_SQL: &str = include_str!("sql/decrement_inventory.sql");
const INCREMENT_INVENTORY_SQL: &str = include_str!("sql/increment_inventory.sql");
const UPDATE_PRODUCT_STATUS_SQL: &str = include_str!("sql/update_product_status.sql");
const SET_INVENTORY_SQL: &str = include_str!("sql/set_inventory.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price = bind_amount(product.price, "price")?;

        let compare_at_price = product
            .compare_at_price
            .map(|amount| bind_amount(amount, "compare_at_price"))
            .transpose()?;

        let quantity = bind_quantity(product.inventory.quantity, "inventory_quantity")?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.title)
            .bind(product.slug)
            .bind(product.currency)
            .bind(price)
            .bind(compare_at_price)
            .bind(product.image)
            .bind(product.inventory.track)
            .bind(quantity)
            .bind(product.status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_active_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(FIND_ACTIVE_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    #[tracing::instrument(
        name = "catalog.repository.decrement_inventory",
        skip(self, tx),
        fields(product_uuid = %product),
        err
    )]
    pub(crate) async fn decrement_inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        // More than an INTEGER column can hold is more than any stock level.
        let Ok(quantity) = bind_quantity(quantity, "inventory_quantity") else {
            return Ok(false);
        };

        let rows_affected = query(DECREMENT_INVENTORY_SQL)
            .bind(product.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    #[tracing::instrument(
        name = "catalog.repository.increment_inventory",
        skip(self, tx),
        fields(product_uuid = %product),
        err
    )]
    pub(crate) async fn increment_inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let quantity = bind_quantity(quantity, "inventory_quantity")?;

        let rows_affected = query(INCREMENT_INVENTORY_SQL)
            .bind(product.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_product_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        status: ProductStatus,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_STATUS_SQL)
            .bind(product.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<ProductRecord, sqlx::Error> {
        let quantity = bind_quantity(quantity, "inventory_quantity")?;

        query_as::<Postgres, ProductRecord>(SET_INVENTORY_SQL)
            .bind(product.into_uuid())
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let currency: String = row.try_get("currency")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            currency: currency.trim_end().to_string(),
            price: try_get_amount(row, "price")?,
            compare_at_price: try_get_optional_amount(row, "compare_at_price")?,
            image: row.try_get("image")?,
            inventory: Inventory {
                track: row.try_get("track_inventory")?,
                quantity: try_get_quantity(row, "inventory_quantity")?,
            },
            status: try_get_parsed::<ProductStatus>(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
