//! Payment oversight operations (shop database).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use seedling_core::types::{OrderStatus, PaymentStatus};
use seedling_core::{OrderId, PaymentId};

use super::RepositoryError;
use crate::models::payment::PaymentOverview;

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    order_id: i32,
    order_number: String,
    provider_id: String,
    status: String,
    amount: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_overview(self) -> PaymentOverview {
        PaymentOverview {
            id: PaymentId::new(self.id),
            order_id: OrderId::new(self.order_id),
            order_number: self.order_number,
            provider_id: self.provider_id,
            status: PaymentStatus::parse(&self.status),
            amount: self.amount,
            currency: self.currency,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// List recent payments, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list_payments(
    pool: &PgPool,
    status: Option<PaymentStatus>,
    limit: i64,
) -> Result<Vec<PaymentOverview>, RepositoryError> {
    let rows: Vec<PaymentRow> = sqlx::query_as(
        r"
        SELECT p.id, p.order_id, o.number AS order_number, p.provider_id,
               p.status, p.amount, p.currency, p.created_at, p.updated_at
        FROM payments p
        JOIN orders o ON o.id = p.order_id
        WHERE $1::TEXT IS NULL OR p.status = $1
        ORDER BY p.created_at DESC
        LIMIT $2
        ",
    )
    .bind(status.map(|s| s.as_str()))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PaymentRow::into_overview).collect())
}

/// Get one payment.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn get_payment(
    pool: &PgPool,
    id: PaymentId,
) -> Result<Option<PaymentOverview>, RepositoryError> {
    let row: Option<PaymentRow> = sqlx::query_as(
        r"
        SELECT p.id, p.order_id, o.number AS order_number, p.provider_id,
               p.status, p.amount, p.currency, p.created_at, p.updated_at
        FROM payments p
        JOIN orders o ON o.id = p.order_id
        WHERE p.id = $1
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(PaymentRow::into_overview))
}

/// Set a payment's status, returning the status it had before.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the payment does not exist.
pub async fn update_payment_status(
    pool: &PgPool,
    id: PaymentId,
    status: PaymentStatus,
) -> Result<PaymentStatus, RepositoryError> {
    let previous: Option<String> = sqlx::query_scalar(
        r"
        UPDATE payments p
        SET status = $2, updated_at = NOW()
        FROM (SELECT id, status FROM payments WHERE id = $1 FOR UPDATE) old
        WHERE p.id = old.id
        RETURNING old.status
        ",
    )
    .bind(id.as_i32())
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    previous
        .map(|s| PaymentStatus::parse(&s))
        .ok_or(RepositoryError::NotFound)
}

/// Set an order's status (payment reconciliation).
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the order does not exist.
pub async fn update_order_status(
    pool: &PgPool,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
        .bind(id.as_i32())
        .bind(status.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}
