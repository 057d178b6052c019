//! Wired services over an isolated test database.

use crate::{
    auth::{PgAuthService, models::UserUuid},
    database::Db,
    domain::{
        carts::{PgCartsService, models::CartLimits},
        products::{
            PgProductsService,
            models::{NewProduct, ProductUuid},
        },
    },
};

use super::db::TestDb;

/// Real services sharing one per-test database. Service calls commit as
/// they would in production; isolation comes from the database itself.
pub(crate) struct TestContext {
    pub(crate) db: TestDb,
    pub(crate) carts: PgCartsService,
    pub(crate) products: PgProductsService,
    pub(crate) auth: PgAuthService,
}

impl TestContext {
    pub(crate) async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        Self {
            carts: PgCartsService::new(db.clone(), CartLimits::default()),
            products: PgProductsService::new(db),
            auth: PgAuthService::new(test_db.pool().clone()),
            db: test_db,
        }
    }

    /// Create a user and return their UUID.
    pub(crate) async fn create_user(&self, email: &str) -> UserUuid {
        self.auth
            .create_user(email.to_string())
            .await
            .expect("failed to create test user")
            .user
            .uuid
    }

    /// Create an uncategorized product at the given price.
    pub(crate) async fn create_product(&self, name: &str, price: u64) -> ProductUuid {
        self.products
            .create_product(NewProduct {
                uuid: ProductUuid::now_v7(),
                name: name.to_string(),
                price,
                category_uuid: None,
            })
            .await
            .expect("failed to create test product")
            .uuid
    }
}
