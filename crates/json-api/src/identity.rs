//! Identity middleware.
//!
//! Shoppers and back-office users are authenticated by the gateway in front
//! of this service, which forwards who they are as headers.

use salvo::prelude::*;
use uuid::Uuid;

use atelier_app::domain::{orders::records::UserUuid, tenants::records::TenantUuid};

use crate::extensions::*;

pub(crate) const TENANT_HEADER: &str = "x-tenant-uuid";
pub(crate) const USER_HEADER: &str = "x-user-uuid";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(tenant) = header_uuid(req, TENANT_HEADER) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid x-tenant-uuid header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_tenant_uuid(TenantUuid::from_uuid(tenant));

    if let Some(user) = header_uuid(req, USER_HEADER) {
        depot.insert_user_uuid(UserUuid::from_uuid(user));
    }

    ctrl.call_next(req, depot, res).await;
}

fn header_uuid(req: &Request, name: &str) -> Option<Uuid> {
    let value = req.headers().get(name)?.to_str().ok()?;

    Uuid::parse_str(value.trim()).ok()
}
