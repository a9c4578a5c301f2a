//! Tenant Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
///
/// A tenant is one storefront; every product and order belongs to exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantRecord {
    pub uuid: TenantUuid,
    pub name: String,
    pub currency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
