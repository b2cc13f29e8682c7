//! Cart repository.
//!
//! Carts persist in the database; the session only carries the cart ID,
//! so a cart survives session-store cleanup of expired sessions being
//! recreated on next login.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use seedling_core::{CartId, CartLineId, ProductId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartLine};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    cart_id: i32,
    product_id: i32,
    quantity: i32,
}

impl CartLineRow {
    fn into_line(self) -> CartLine {
        CartLine {
            id: CartLineId::new(self.id),
            cart_id: CartId::new(self.cart_id),
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self) -> Result<Cart, RepositoryError> {
        let row: CartRow =
            sqlx::query_as("INSERT INTO carts DEFAULT VALUES RETURNING id, created_at")
                .fetch_one(self.pool)
                .await?;
        Ok(Cart {
            id: CartId::new(row.id),
            created_at: row.created_at,
        })
    }

    /// Get a cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as("SELECT id, created_at FROM carts WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|r| Cart {
            id: CartId::new(r.id),
            created_at: r.created_at,
        }))
    }

    /// List the lines of a cart in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r"
            SELECT id, cart_id, product_id, quantity
            FROM cart_lines
            WHERE cart_id = $1
            ORDER BY id
            ",
        )
        .bind(cart_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(CartLineRow::into_line).collect())
    }

    /// Add a product to a cart, incrementing the quantity when the line
    /// already exists (one line per product, enforced by constraint).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let row: CartLineRow = sqlx::query_as(
            r"
            INSERT INTO cart_lines (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_lines.quantity + EXCLUDED.quantity
            RETURNING id, cart_id, product_id, quantity
            ",
        )
        .bind(cart_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;
        Ok(row.into_line())
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line is not in this cart.
    pub async fn set_line_quantity(
        &self,
        cart_id: CartId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity <= 0 {
            return self.remove_line(cart_id, line_id).await;
        }

        let result = sqlx::query(
            "UPDATE cart_lines SET quantity = $3 WHERE id = $2 AND cart_id = $1",
        )
        .bind(cart_id.as_i32())
        .bind(line_id.as_i32())
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line is not in this cart.
    pub async fn remove_line(
        &self,
        cart_id: CartId,
        line_id: CartLineId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = $2 AND cart_id = $1")
            .bind(cart_id.as_i32())
            .bind(line_id.as_i32())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Total quantity across a cart's lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, cart_id: CartId) -> Result<i64, RepositoryError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(quantity)::BIGINT FROM cart_lines WHERE cart_id = $1",
        )
        .bind(cart_id.as_i32())
        .fetch_one(self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Delete a cart and its lines (after a successful checkout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        // Lines go first; no ON DELETE CASCADE on cart_lines.
        sqlx::query("DELETE FROM cart_lines WHERE cart_id = $1")
            .bind(cart_id.as_i32())
            .execute(self.pool)
            .await?;
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
