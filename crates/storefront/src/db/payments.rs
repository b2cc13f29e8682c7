//! Payment repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use seedling_core::types::{CurrencyCode, PaymentStatus};
use seedling_core::{OrderId, PaymentId};

use super::RepositoryError;
use crate::models::order::Payment;

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    order_id: i32,
    provider_id: String,
    status: String,
    checkout_url: Option<String>,
    amount: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> Payment {
        Payment {
            id: PaymentId::new(self.id),
            order_id: OrderId::new(self.order_id),
            provider_id: self.provider_id,
            status: PaymentStatus::parse(&self.status),
            checkout_url: self.checkout_url,
            amount: self.amount,
            currency: match self.currency.as_str() {
                "USD" => CurrencyCode::USD,
                "GBP" => CurrencyCode::GBP,
                _ => CurrencyCode::EUR,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for payment database operations.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a freshly created provider payment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the provider ID is already
    /// recorded, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        order_id: OrderId,
        provider_id: &str,
        status: PaymentStatus,
        checkout_url: Option<&str>,
        amount: Decimal,
        currency: CurrencyCode,
    ) -> Result<Payment, RepositoryError> {
        let row: PaymentRow = sqlx::query_as(
            r"
            INSERT INTO payments (order_id, provider_id, status, checkout_url, amount, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, order_id, provider_id, status, checkout_url, amount, currency,
                      created_at, updated_at
            ",
        )
        .bind(order_id.as_i32())
        .bind(provider_id)
        .bind(status.as_str())
        .bind(checkout_url)
        .bind(amount)
        .bind(currency.code())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("provider payment already recorded".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into_payment())
    }

    /// Look a payment up by the provider's payment ID (webhook path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_provider_id(
        &self,
        provider_id: &str,
    ) -> Result<Option<Payment>, RepositoryError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r"
            SELECT id, order_id, provider_id, status, checkout_url, amount, currency,
                   created_at, updated_at
            FROM payments
            WHERE provider_id = $1
            ",
        )
        .bind(provider_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(row.map(PaymentRow::into_payment))
    }

    /// Update a payment's status, returning the status it had before.
    ///
    /// The previous status is what makes webhook processing idempotent:
    /// a transition is only acted upon when the status actually changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the payment does not exist.
    pub async fn update_status(
        &self,
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
        .fetch_optional(self.pool)
        .await?;

        previous
            .map(|s| PaymentStatus::parse(&s))
            .ok_or(RepositoryError::NotFound)
    }
}
