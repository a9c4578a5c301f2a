//! Tenants service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::tenants::{
    data::NewTenant, errors::TenantsServiceError, records::TenantRecord,
    repository::PgTenantsRepository,
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    repository: PgTenantsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgTenantsRepository::new(pool),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    #[tracing::instrument(
        name = "tenants.service.create_tenant",
        skip(self, tenant),
        fields(tenant_uuid = %tenant.uuid),
        err
    )]
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError> {
        let name = tenant.name.trim();

        if name.is_empty() {
            return Err(TenantsServiceError::BlankName);
        }

        let currency = tenant.currency.trim().to_ascii_uppercase();

        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(TenantsServiceError::InvalidData);
        }

        let record = self
            .repository
            .create_tenant(NewTenant {
                uuid: tenant.uuid,
                name: name.to_string(),
                currency,
            })
            .await?;

        info!(tenant_uuid = %record.uuid, "created tenant");

        Ok(record)
    }
}

/// Tenant persistence operations.
#[automock]
#[async_trait]
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError>;
}
