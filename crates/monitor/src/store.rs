//! Monitored-table access.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::health::CollectionCounts;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}

/// Raw product row as captured in an emergency backup. Soft-deleted rows are
/// included and flagged.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub(crate) struct ProductRecord {
    pub uuid: Uuid,
    pub name: String,
    pub price: i64,
    pub category_uuid: Option<Uuid>,
    pub deleted: bool,
}

/// Raw category row as captured in an emergency backup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub(crate) struct CategoryRecord {
    pub uuid: Uuid,
    pub name: String,
    pub deleted: bool,
}

/// Full contents of both monitored tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct DatabaseDump {
    pub generated_at: Timestamp,
    pub products: Vec<ProductRecord>,
    pub categories: Vec<CategoryRecord>,
}

#[automock]
#[async_trait]
pub(crate) trait MonitorStore: Send + Sync {
    /// Active (non-soft-deleted) row counts for the monitored tables.
    async fn counts(&self) -> Result<CollectionCounts, StoreError>;

    /// Every row of both tables, for the emergency backup.
    async fn dump(&self) -> Result<DatabaseDump, StoreError>;
}

#[derive(Debug, Clone)]
pub(crate) struct PgMonitorStore {
    pool: PgPool,
}

impl PgMonitorStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MonitorStore for PgMonitorStore {
    async fn counts(&self) -> Result<CollectionCounts, StoreError> {
        let row = sqlx::query(include_str!("../sql/collection_counts.sql"))
            .fetch_one(&self.pool)
            .await?;

        Ok(CollectionCounts {
            products: row.try_get("products")?,
            categories: row.try_get("categories")?,
        })
    }

    async fn dump(&self) -> Result<DatabaseDump, StoreError> {
        let products = sqlx::query_as::<_, ProductRecord>(include_str!("../sql/dump_products.sql"))
            .fetch_all(&self.pool)
            .await?;

        let categories =
            sqlx::query_as::<_, CategoryRecord>(include_str!("../sql/dump_categories.sql"))
                .fetch_all(&self.pool)
                .await?;

        Ok(DatabaseDump {
            generated_at: Timestamp::now(),
            products,
            categories,
        })
    }
}
