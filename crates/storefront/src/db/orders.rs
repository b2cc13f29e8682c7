//! Order repository.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use seedling_core::types::{CurrencyCode, OrderStatus};
use seedling_core::{CartId, OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderLine};

/// Attempts at generating a unique order number before giving up.
const ORDER_NUMBER_ATTEMPTS: u32 = 3;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    cart_id: Option<i32>,
    number: String,
    domain_id: String,
    currency: String,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Order {
        Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            cart_id: self.cart_id.map(CartId::new),
            number: self.number,
            domain_id: self.domain_id,
            currency: parse_currency(&self.currency),
            total: self.total,
            status: OrderStatus::parse(&self.status),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_id: i32,
    product_id: i32,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    line_total: Decimal,
}

impl OrderLineRow {
    fn into_line(self) -> OrderLine {
        OrderLine {
            order_id: OrderId::new(self.order_id),
            product_id: ProductId::new(self.product_id),
            title: self.title,
            quantity: self.quantity,
            unit_price: self.unit_price,
            line_total: self.line_total,
        }
    }
}

fn parse_currency(code: &str) -> CurrencyCode {
    match code {
        "USD" => CurrencyCode::USD,
        "GBP" => CurrencyCode::GBP,
        _ => CurrencyCode::EUR,
    }
}

/// A line to snapshot onto a new order.
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending order with its lines, in one transaction.
    ///
    /// Order numbers carry a random component so public order numbers do
    /// not leak order volume; collisions retry against the uniqueness
    /// constraint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::Conflict` if no unique number could be found.
    pub async fn create(
        &self,
        user_id: UserId,
        cart_id: CartId,
        domain_id: &str,
        currency: CurrencyCode,
        total: Decimal,
        lines: &[NewOrderLine],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let mut inserted: Option<OrderRow> = None;
        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let number = generate_order_number();
            let result: Result<OrderRow, sqlx::Error> = sqlx::query_as(
                r"
                INSERT INTO orders (user_id, cart_id, number, domain_id, currency, total, status)
                VALUES ($1, $2, $3, $4, $5, $6, 'pending')
                RETURNING id, user_id, cart_id, number, domain_id, currency, total, status, created_at
                ",
            )
            .bind(user_id.as_i32())
            .bind(cart_id.as_i32())
            .bind(&number)
            .bind(domain_id)
            .bind(currency.code())
            .bind(total)
            .fetch_one(&mut *tx)
            .await;

            match result {
                Ok(row) => {
                    inserted = Some(row);
                    break;
                }
                Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {}
                Err(e) => return Err(RepositoryError::Database(e)),
            }
        }

        let Some(row) = inserted else {
            return Err(RepositoryError::Conflict(
                "could not allocate a unique order number".to_owned(),
            ));
        };

        for line in lines {
            sqlx::query(
                r"
                INSERT INTO order_lines (order_id, product_id, title, quantity, unit_price, line_total)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(row.id)
            .bind(line.product_id.as_i32())
            .bind(&line.title)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.line_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.into_order())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, cart_id, number, domain_id, currency, total, status, created_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(OrderRow::into_order))
    }

    /// Get the lines of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows: Vec<OrderLineRow> = sqlx::query_as(
            r"
            SELECT order_id, product_id, title, quantity, unit_price, line_total
            FROM order_lines
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(OrderLineRow::into_line).collect())
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, cart_id, number, domain_id, currency, total, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(OrderRow::into_order).collect())
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// "S2026-483920": year plus a random six-digit component.
fn generate_order_number() -> String {
    let year = Utc::now().format("%Y");
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    format!("S{year}-{suffix:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        assert!(number.starts_with('S'));
        assert_eq!(number.len(), "S2026-000000".len());
        assert!(number.contains('-'));
    }

    #[test]
    fn test_parse_currency_defaults_to_eur() {
        assert_eq!(parse_currency("USD"), CurrencyCode::USD);
        assert_eq!(parse_currency("GBP"), CurrencyCode::GBP);
        assert_eq!(parse_currency("EUR"), CurrencyCode::EUR);
        assert_eq!(parse_currency("???"), CurrencyCode::EUR);
    }
}
