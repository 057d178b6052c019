use bodega_app::{
    database::{self, Db},
    domain::categories::{PgCategoriesService, models::CategoryUuid},
};
use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CategoryCommand {
    #[command(subcommand)]
    command: CategorySubcommand,
}

#[derive(Debug, Subcommand)]
enum CategorySubcommand {
    /// Create a category.
    Create(CreateCategoryArgs),
}

#[derive(Debug, Args)]
struct CreateCategoryArgs {
    /// Category display name
    #[arg(long)]
    name: String,

    /// Optional category UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(command: CategoryCommand) -> Result<(), String> {
    match command.command {
        CategorySubcommand::Create(args) => create(args).await,
    }
}

#[expect(clippy::print_stdout, reason = "stdout is the command's interface")]
async fn create(args: CreateCategoryArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let uuid = args
        .uuid
        .map_or_else(CategoryUuid::now_v7, CategoryUuid::from_uuid);

    let category = PgCategoriesService::new(Db::new(pool))
        .create_category(uuid, &args.name)
        .await
        .map_err(|error| format!("failed to create category: {error}"))?;

    println!("category_uuid: {}", category.uuid);
    println!("name: {}", category.name);

    Ok(())
}
