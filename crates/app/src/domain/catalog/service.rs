//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        catalog::{
            data::NewProduct,
            errors::CatalogServiceError,
            records::{ProductRecord, ProductStatus, ProductUuid},
            repository::PgCatalogRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.create_product",
        skip(self, product),
        fields(tenant_uuid = %tenant, product_uuid = %product.uuid),
        err
    )]
    async fn create_product(
        &self,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        validate_new_product(&product)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, slug = %created.slug, "created product");

        Ok(created)
    }

    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let product = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "catalog.service.update_product_status",
        skip(self),
        fields(tenant_uuid = %tenant, product_uuid = %product, status = %status),
        err
    )]
    async fn update_product_status(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        status: ProductStatus,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .update_product_status(&mut tx, product, status)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "catalog.service.adjust_inventory",
        skip(self),
        fields(tenant_uuid = %tenant, product_uuid = %product),
        err
    )]
    async fn adjust_inventory(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .repository
            .set_inventory(&mut tx, product, quantity)
            .await?;

        tx.commit().await?;

        info!(product_uuid = %product, quantity, "set product inventory");

        Ok(updated)
    }
}

/// Back-office catalog operations.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a new product.
    async fn create_product(
        &self,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Retrieve a single product regardless of its status.
    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Publish, unpublish or archive a product.
    async fn update_product_status(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        status: ProductStatus,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Set the absolute stock level of a product (restocking, stock takes).
    async fn adjust_inventory(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<ProductRecord, CatalogServiceError>;
}

fn validate_new_product(product: &NewProduct) -> Result<(), CatalogServiceError> {
    if product.title.trim().is_empty() || product.slug.trim().is_empty() {
        return Err(CatalogServiceError::MissingRequiredData);
    }

    let currency_ok = product.currency.as_deref().is_none_or(|currency| {
        currency.len() == 3 && currency.bytes().all(|b| b.is_ascii_uppercase())
    });

    if !currency_ok {
        return Err(CatalogServiceError::InvalidData);
    }

    if i64::try_from(product.price).is_err()
        || product
            .compare_at_price
            .is_some_and(|amount| i64::try_from(amount).is_err())
    {
        return Err(CatalogServiceError::InvalidAmount);
    }

    Ok(())
}
