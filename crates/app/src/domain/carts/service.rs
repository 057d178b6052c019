//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::models::UserUuid,
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            lines,
            models::{Cart, CartLimits, CartLine, CartOwner, CartUuid, SessionToken},
            repositories::{PgCartLinesRepository, PgCartsRepository},
        },
        products::{models::ProductUuid, repository::PgProductsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts: PgCartsRepository,
    cart_lines: PgCartLinesRepository,
    products: PgProductsRepository,
    limits: CartLimits,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, limits: CartLimits) -> Self {
        Self {
            db,
            carts: PgCartsRepository::new(),
            cart_lines: PgCartLinesRepository::new(),
            products: PgProductsRepository::new(),
            limits,
        }
    }

    /// Persist a full line set and the recomputed total, returning the
    /// up-to-date cart.
    async fn persist_lines(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        cart: CartUuid,
        owner: CartOwner,
        cart_lines: Vec<CartLine>,
    ) -> Result<Cart, CartsServiceError> {
        let total = lines::total(&cart_lines);

        self.cart_lines.replace_lines(tx, cart, &cart_lines).await?;

        let updated_at = self.carts.update_total(tx, cart, total).await?;

        Ok(Cart {
            owner,
            lines: cart_lines,
            total,
            updated_at: Some(updated_at),
        })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(row) = self.carts.find_cart(&mut tx, owner).await? else {
            return Ok(Cart::empty(owner));
        };

        let cart_lines = self.cart_lines.get_lines(&mut tx, row.uuid).await?;

        tx.commit().await?;

        Ok(Cart {
            owner,
            lines: cart_lines,
            total: row.total,
            updated_at: Some(row.updated_at),
        })
    }

    async fn add_item(
        &self,
        owner: CartOwner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        lines::validate_quantity(quantity, self.limits.max_line_quantity)?;

        let mut tx = self.db.begin().await?;

        let snapshot = self
            .products
            .get_active_product(&mut tx, product)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        let row = match self.carts.find_cart(&mut tx, owner).await? {
            Some(row) => row,
            None => {
                self.carts
                    .create_cart(&mut tx, CartUuid::now_v7(), owner)
                    .await?
            }
        };

        let mut cart_lines = self.cart_lines.get_lines(&mut tx, row.uuid).await?;

        lines::apply_add(
            &mut cart_lines,
            product,
            quantity,
            snapshot.price,
            self.limits.max_line_quantity,
        );

        let cart = self
            .persist_lines(&mut tx, row.uuid, owner, cart_lines)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn update_item(
        &self,
        owner: CartOwner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(row) = self.carts.find_cart(&mut tx, owner).await? else {
            return Err(CartsServiceError::ProductNotFound);
        };

        let mut cart_lines = self.cart_lines.get_lines(&mut tx, row.uuid).await?;

        lines::apply_update(
            &mut cart_lines,
            product,
            quantity,
            self.limits.max_line_quantity,
        )?;

        let cart = self
            .persist_lines(&mut tx, row.uuid, owner, cart_lines)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        owner: CartOwner,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(row) = self.carts.find_cart(&mut tx, owner).await? else {
            return Ok(Cart::empty(owner));
        };

        let mut cart_lines = self.cart_lines.get_lines(&mut tx, row.uuid).await?;

        lines::apply_remove(&mut cart_lines, product);

        let cart = self
            .persist_lines(&mut tx, row.uuid, owner, cart_lines)
            .await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if let Some(row) = self.carts.find_cart(&mut tx, owner).await? {
            self.carts.delete_cart(&mut tx, row.uuid).await?;
        }

        tx.commit().await?;

        Ok(Cart::empty(owner))
    }

    async fn merge_guest_into_user(
        &self,
        session: SessionToken,
        user: UserUuid,
    ) -> Result<Cart, CartsServiceError> {
        let owner = CartOwner::User(user);
        let mut tx = self.db.begin().await?;

        // Lock guest then user so concurrent merges for the same pair
        // serialize instead of double-counting lines.
        let guest_row = self
            .carts
            .find_cart_for_update(&mut tx, CartOwner::Guest(session))
            .await?;

        let guest_lines = match &guest_row {
            Some(row) => self.cart_lines.get_lines(&mut tx, row.uuid).await?,
            None => Vec::new(),
        };

        let user_row = self.carts.find_cart_for_update(&mut tx, owner).await?;

        // Absent or empty guest cart: the user cart is returned unchanged.
        if guest_lines.is_empty() {
            let cart = match user_row {
                Some(row) => {
                    let cart_lines = self.cart_lines.get_lines(&mut tx, row.uuid).await?;

                    Cart {
                        owner,
                        lines: cart_lines,
                        total: row.total,
                        updated_at: Some(row.updated_at),
                    }
                }
                None => Cart::empty(owner),
            };

            tx.commit().await?;

            return Ok(cart);
        }

        let user_row = match user_row {
            Some(row) => row,
            None => {
                self.carts
                    .create_cart(&mut tx, CartUuid::now_v7(), owner)
                    .await?
            }
        };

        let mut merged = self.cart_lines.get_lines(&mut tx, user_row.uuid).await?;

        lines::merge_lines(&mut merged, guest_lines, self.limits.max_line_quantity);

        let cart = self
            .persist_lines(&mut tx, user_row.uuid, owner, merged)
            .await?;

        if let Some(row) = guest_row {
            self.carts.delete_cart(&mut tx, row.uuid).await?;
        }

        // The guest cart only disappears together with the durably merged
        // lines; a failure before this point rolls everything back.
        tx.commit().await?;

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the cart for an identity. An identity without a cart record
    /// gets the empty representation; reading never creates a record.
    async fn get_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError>;

    /// Add `quantity` of a product, snapshotting its current price. Creates
    /// the cart record on first add and collapses duplicate product lines.
    async fn add_item(
        &self,
        owner: CartOwner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Set the quantity of an existing line; zero removes it.
    async fn update_item(
        &self,
        owner: CartOwner,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a product's line. Removing an absent product succeeds as a
    /// no-op.
    async fn remove_item(
        &self,
        owner: CartOwner,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Delete the cart record, if any.
    async fn clear_cart(&self, owner: CartOwner) -> Result<Cart, CartsServiceError>;

    /// One-time reconciliation of a guest cart into a user cart at login.
    /// Runs in a single transaction: the guest record is deleted only after
    /// the merged lines are durably applied, so the operation is safely
    /// retryable and a second invocation is a no-op.
    async fn merge_guest_into_user(
        &self,
        session: SessionToken,
        user: UserUuid,
    ) -> Result<Cart, CartsServiceError>;
}
