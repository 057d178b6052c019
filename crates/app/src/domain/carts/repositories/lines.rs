//! Cart Lines Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{try_get_amount, try_get_quantity},
    domain::{
        carts::models::{CartLine, CartUuid},
        products::models::ProductUuid,
    },
};

const GET_CART_LINES_SQL: &str = include_str!("../sql/get_cart_lines.sql");
const DELETE_CART_LINES_SQL: &str = include_str!("../sql/delete_cart_lines.sql");
const INSERT_CART_LINE_SQL: &str = include_str!("../sql/insert_cart_line.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(GET_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Rewrite the full line set for a cart, preserving list order via the
    /// `position` column.
    pub(crate) async fn replace_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        lines: &[CartLine],
    ) -> Result<(), sqlx::Error> {
        query(DELETE_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        for (position, line) in lines.iter().enumerate() {
            let quantity =
                i32::try_from(line.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            let unit_price =
                i64::try_from(line.unit_price).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
            let position = i32::try_from(position).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

            query(INSERT_CART_LINE_SQL)
                .bind(cart.into_uuid())
                .bind(line.product_uuid.into_uuid())
                .bind(quantity)
                .bind(unit_price)
                .bind(position)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}
