//! Containerized database provisioning for tests.
//!
//! One PostgreSQL container is shared by the whole test binary. Every test
//! gets its own freshly created database with the schema applied, so state
//! never leaks between tests. Isolation is database-level: services commit
//! their transactions normally and clean state comes from the per-test
//! database, not from rollback.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const DB_USER: &str = "bodega_test";
const DB_PASSWORD: &str = "bodega_test_password";

const SCHEMA_SQL: &str = include_str!("../../db/schema.sql");

/// Container shared across the test binary, started on first use.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases whose [`TestDb`] has gone out of scope, awaiting drop.
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(DB_USER)
        .with_password(DB_PASSWORD)
        .with_db_name(DB_USER)
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("failed to start PostgreSQL container")
}

/// Connection URL for the named database inside the shared container,
/// starting the container if needed.
async fn database_url(database: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("failed to get mapped container port");

    let host = std::env::var("TESTCONTAINERS_HOST_OVERRIDE")
        .unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{DB_USER}:{DB_PASSWORD}@{host}:{port}/{database}")
}

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            drop_database(&db_name).await;
        }
    });

    sender
}

async fn drop_database(db_name: &str) {
    // Never start a container just to clean up after one.
    if POSTGRES_CONTAINER.get().is_none() || validate_database_name(db_name).is_err() {
        return;
    }

    let admin_url = database_url("postgres").await;

    if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
        // FORCE severs any pool connections that are still draining.
        let drop_query = format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)");

        if let Err(error) = sqlx::query(&drop_query).execute(&mut conn).await {
            eprintln!("failed to drop test database '{db_name}': {error}");
        }

        let _ = conn.close().await;
    }
}

/// The name is interpolated into `CREATE DATABASE` / `DROP DATABASE`
/// statements, so only plain identifier names are accepted.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.len() > 63 {
        return Err("database name must be at most 63 characters".to_string());
    }

    match name.chars().next() {
        None => return Err("database name cannot be empty".to_string()),
        Some(first) if !first.is_ascii_alphabetic() && first != '_' => {
            return Err("database name must start with a letter or underscore".to_string());
        }
        Some(_) => {}
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err("database name can only contain letters, digits, and underscores".to_string());
    }

    Ok(())
}

/// An isolated, uniquely named database inside the shared container.
///
/// Dropping a `TestDb` queues the database for removal on a background
/// task; tests never need to clean up explicitly.
#[derive(Debug)]
pub(crate) struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    /// Create a fresh database with the schema applied.
    pub(crate) async fn new() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();

        let thread_id = std::thread::current().id();

        let name = format!("bodega_test_{nanos}_{thread_id:?}").replace([':', ' ', '(', ')'], "");

        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        if let Err(error) = validate_database_name(&name) {
            panic!("invalid database name '{name}': {error}");
        }

        let admin_url = database_url("postgres").await;

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("failed to connect to maintenance database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("failed to create test database");

        conn.close()
            .await
            .expect("failed to close maintenance connection");

        let pool = PgPool::connect(&database_url(&name).await)
            .await
            .expect("failed to connect to test database");

        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&pool)
            .await
            .expect("failed to apply schema to test database");

        Self { pool, name }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_database_name_accepts_identifiers() {
        assert!(validate_database_name("bodega_test_123").is_ok());
        assert!(validate_database_name("_leading_underscore").is_ok());
    }

    #[test]
    fn test_validate_database_name_rejects_empty_and_long() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_validate_database_name_rejects_bad_characters() {
        assert!(validate_database_name("1starts_with_digit").is_err());
        assert!(validate_database_name("has-hyphen").is_err());
        assert!(validate_database_name("has space").is_err());
        assert!(validate_database_name("quote\"inject").is_err());
    }

    #[tokio::test]
    async fn test_fresh_database_has_schema() {
        let test_db = TestDb::new().await;

        let carts: i64 = sqlx::query_scalar("SELECT count(*) FROM carts")
            .fetch_one(test_db.pool())
            .await
            .expect("schema should be applied to a fresh database");

        assert_eq!(carts, 0);
    }
}
