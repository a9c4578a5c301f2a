//! Tenant Data

use crate::domain::tenants::records::TenantUuid;

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    pub uuid: TenantUuid,

    /// Storefront name shown in the back-office.
    pub name: String,

    /// ISO-4217 code new products are usually priced in. Case-insensitive on input.
    pub currency: String,
}
