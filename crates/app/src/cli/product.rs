use bodega_app::{
    database::{self, Db},
    domain::{
        categories::models::CategoryUuid,
        products::{
            PgProductsService,
            models::{NewProduct, ProductUuid},
        },
    },
};
use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Create a product.
    Create(CreateProductArgs),

    /// Soft-delete a product.
    Delete(DeleteProductArgs),
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Price in minor currency units
    #[arg(long)]
    price: u64,

    /// Optional category UUID
    #[arg(long)]
    category_uuid: Option<Uuid>,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

#[derive(Debug, Args)]
struct DeleteProductArgs {
    /// Product UUID
    #[arg(long)]
    uuid: Uuid,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Create(args) => create(args).await,
        ProductSubcommand::Delete(args) => delete(args).await,
    }
}

async fn service(database_url: &str) -> Result<PgProductsService, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(PgProductsService::new(Db::new(pool)))
}

#[expect(clippy::print_stdout, reason = "stdout is the command's interface")]
async fn create(args: CreateProductArgs) -> Result<(), String> {
    let uuid = args
        .uuid
        .map_or_else(ProductUuid::now_v7, ProductUuid::from_uuid);

    let product = service(&args.database_url)
        .await?
        .create_product(NewProduct {
            uuid,
            name: args.name,
            price: args.price,
            category_uuid: args.category_uuid.map(CategoryUuid::from_uuid),
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("price: {}", product.price);

    Ok(())
}

#[expect(clippy::print_stdout, reason = "stdout is the command's interface")]
async fn delete(args: DeleteProductArgs) -> Result<(), String> {
    service(&args.database_url)
        .await?
        .delete_product(ProductUuid::from_uuid(args.uuid))
        .await
        .map_err(|error| format!("failed to delete product: {error}"))?;

    println!("deleted product {}", args.uuid);

    Ok(())
}
