//! Service-level test context.

use sqlx::{Connection, PgConnection, PgPool, query};

use crate::{
    database::Db,
    domain::{
        catalog::PgCatalogService,
        orders::PgOrdersService,
        tenants::{PgTenantsService, TenantsService, data::NewTenant, records::TenantUuid},
    },
};

use super::db::{SUPERUSER, SUPERUSER_PASSWORD, TestDb};

/// Superusers bypass row-level security, so services connect as this role.
const APP_ROLE: &str = "atelier_app_test";
const APP_ROLE_PASSWORD: &str = "atelier_app_test_password";

pub struct TestContext {
    pub db: TestDb,
    pub app_db: Db,
    pub tenant_uuid: TenantUuid,
    pub catalog: PgCatalogService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDb::new().await;
        let app_db = Db::new(Self::connect_as_app_role(&db).await);

        let ctx = Self {
            tenant_uuid: TenantUuid::new(),
            catalog: PgCatalogService::new(app_db.clone()),
            orders: PgOrdersService::new(app_db.clone()),
            app_db,
            db,
        };

        ctx.insert_tenant(ctx.tenant_uuid, "Test Tenant", "USD").await;

        ctx
    }

    /// Create another tenant, for isolation tests.
    pub async fn create_tenant(&self, name: &str) -> TenantUuid {
        let uuid = TenantUuid::new();

        self.insert_tenant(uuid, name, "USD").await;

        uuid
    }

    /// Create another tenant that prices in `currency` by default.
    pub async fn create_tenant_with_currency(&self, name: &str, currency: &str) -> TenantUuid {
        let uuid = TenantUuid::new();

        self.insert_tenant(uuid, name, currency).await;

        uuid
    }

    async fn insert_tenant(&self, uuid: TenantUuid, name: &str, currency: &str) {
        PgTenantsService::new(self.db.pool().clone())
            .create_tenant(NewTenant {
                uuid,
                name: name.to_string(),
                currency: currency.to_string(),
            })
            .await
            .expect("Failed to create test tenant");
    }

    async fn connect_as_app_role(db: &TestDb) -> PgPool {
        let server_url = db
            .superuser_url
            .rsplit_once('/')
            .map_or(db.superuser_url.as_str(), |(server, _)| server);

        let mut server_conn = PgConnection::connect(&format!("{server_url}/postgres"))
            .await
            .expect("Failed to connect for role setup");

        // Parallel tests race to create the role; duplicate errors mean it exists.
        let created = query(&format!(
            "CREATE ROLE {APP_ROLE} WITH LOGIN PASSWORD '{APP_ROLE_PASSWORD}' \
             NOSUPERUSER NOCREATEDB NOCREATEROLE"
        ))
        .execute(&mut server_conn)
        .await;

        match created {
            Ok(_) => {}
            Err(sqlx::Error::Database(ref e))
                if matches!(e.code().as_deref(), Some("42710" | "23505")) => {}
            Err(error) => panic!("Failed to create app role: {error}"),
        }

        query(&format!(
            "GRANT CONNECT ON DATABASE \"{}\" TO {APP_ROLE}",
            db.name
        ))
        .execute(&mut server_conn)
        .await
        .expect("Failed to grant CONNECT");

        server_conn.close().await.expect("Failed to close connection");

        let mut db_conn = PgConnection::connect(&db.superuser_url)
            .await
            .expect("Failed to connect to test database");

        for statement in [
            format!("GRANT USAGE ON SCHEMA public TO {APP_ROLE}"),
            format!("GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {APP_ROLE}"),
        ] {
            query(&statement)
                .execute(&mut db_conn)
                .await
                .expect("Failed to grant privileges");
        }

        db_conn.close().await.expect("Failed to close connection");

        let app_url = db.superuser_url.replacen(
            &format!("{SUPERUSER}:{SUPERUSER_PASSWORD}"),
            &format!("{APP_ROLE}:{APP_ROLE_PASSWORD}"),
            1,
        );

        PgPool::connect(&app_url)
            .await
            .expect("Failed to connect as app role")
    }
}
