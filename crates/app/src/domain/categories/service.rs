//! Categories service.

use crate::{
    database::Db,
    domain::{
        categories::{
            models::{Category, CategoryUuid},
            repository::PgCategoriesRepository,
        },
        products::errors::ProductsServiceError,
    },
};

#[derive(Debug, Clone)]
pub struct PgCategoriesService {
    db: Db,
    repository: PgCategoriesRepository,
}

impl PgCategoriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCategoriesRepository::new(),
        }
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is taken or the insert fails.
    pub async fn create_category(
        &self,
        uuid: CategoryUuid,
        name: &str,
    ) -> Result<Category, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_category(&mut tx, uuid, name).await?;

        tx.commit().await?;

        Ok(created)
    }
}
