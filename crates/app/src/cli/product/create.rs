use atelier_app::{
    database::{self, Db},
    domain::{
        catalog::{
            CatalogService, PgCatalogService,
            data::NewProduct,
            records::{Inventory, ProductStatus, ProductUuid},
        },
        tenants::records::TenantUuid,
    },
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Owning tenant
    #[arg(long)]
    tenant_uuid: Uuid,

    #[arg(long)]
    title: String,

    #[arg(long)]
    slug: String,

    /// ISO-4217 currency code; the tenant's default when omitted
    #[arg(long)]
    currency: Option<String>,

    /// Price in minor units
    #[arg(long)]
    price: u64,

    /// Reference price in minor units
    #[arg(long)]
    compare_at_price: Option<u64>,

    #[arg(long)]
    image: Option<String>,

    /// Stock on hand; stock is untracked when omitted
    #[arg(long)]
    quantity: Option<u32>,

    /// One of active, draft, archived
    #[arg(long, default_value = "draft")]
    status: ProductStatus,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let product = PgCatalogService::new(Db::new(pool))
        .create_product(
            TenantUuid::from_uuid(args.tenant_uuid),
            NewProduct {
                uuid: ProductUuid::new(),
                title: args.title,
                slug: args.slug,
                currency: args.currency.map(|code| code.to_ascii_uppercase()),
                price: args.price,
                compare_at_price: args.compare_at_price,
                image: args.image,
                inventory: Inventory {
                    track: args.quantity.is_some(),
                    quantity: args.quantity.unwrap_or_default(),
                },
                status: args.status,
            },
        )
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("slug: {}", product.slug);
    println!("status: {}", product.status);

    Ok(())
}
