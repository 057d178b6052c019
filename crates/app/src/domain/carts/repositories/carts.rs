//! Carts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_amount,
    domain::carts::models::{CartOwner, CartUuid},
};

const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const FIND_CART_FOR_UPDATE_SQL: &str = include_str!("../sql/find_cart_for_update.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");
const UPDATE_CART_TOTAL_SQL: &str = include_str!("../sql/update_cart_total.sql");

/// The carts table row, without its lines.
#[derive(Debug, Clone)]
pub(crate) struct CartRow {
    pub(crate) uuid: CartUuid,
    pub(crate) total: u64,
    pub(crate) updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

/// Split an owner into the `(user_uuid, session_token)` bind pair used by
/// the owner-keyed queries.
fn owner_binds(owner: CartOwner) -> (Option<Uuid>, Option<Uuid>) {
    match owner {
        CartOwner::User(user) => (Some(user.into_uuid()), None),
        CartOwner::Guest(session) => (None, Some(session.into_uuid())),
    }
}

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: CartOwner,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        let (user, session) = owner_binds(owner);

        query_as::<Postgres, CartRow>(FIND_CART_SQL)
            .bind(user)
            .bind(session)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_cart`] but row-locked for the duration of the
    /// transaction, so concurrent merges for the same identity serialize.
    pub(crate) async fn find_cart_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: CartOwner,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        let (user, session) = owner_binds(owner);

        query_as::<Postgres, CartRow>(FIND_CART_FOR_UPDATE_SQL)
            .bind(user)
            .bind(session)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: CartUuid,
        owner: CartOwner,
    ) -> Result<CartRow, sqlx::Error> {
        let (user, session) = owner_binds(owner);

        query_as::<Postgres, CartRow>(CREATE_CART_SQL)
            .bind(uuid.into_uuid())
            .bind(user)
            .bind(session)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        total: u64,
    ) -> Result<Timestamp, sqlx::Error> {
        let total_i64 = i64::try_from(total).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let updated_at: SqlxTimestamp = sqlx::query_scalar(UPDATE_CART_TOTAL_SQL)
            .bind(cart.into_uuid())
            .bind(total_i64)
            .fetch_one(&mut **tx)
            .await?;

        Ok(updated_at.to_jiff())
    }
}

impl<'r> FromRow<'r, PgRow> for CartRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            total: try_get_amount(row, "total")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
