//! Loyalty ledger repository.
//!
//! The ledger is append-only; a balance is always `SUM(points)`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use seedling_core::{LoyaltyEntryId, OrderId, UserId};

use super::RepositoryError;
use crate::models::user::LoyaltyEntry;

#[derive(sqlx::FromRow)]
struct LoyaltyRow {
    id: i32,
    user_id: i32,
    order_id: Option<i32>,
    points: i32,
    reason: String,
    created_at: DateTime<Utc>,
}

impl LoyaltyRow {
    fn into_entry(self) -> LoyaltyEntry {
        LoyaltyEntry {
            id: LoyaltyEntryId::new(self.id),
            user_id: UserId::new(self.user_id),
            order_id: self.order_id.map(OrderId::new),
            points: self.points,
            reason: self.reason,
            created_at: self.created_at,
        }
    }
}

/// Repository for the loyalty ledger.
pub struct LoyaltyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LoyaltyRepository<'a> {
    /// Create a new loyalty repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's current balance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn balance(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let balance: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(points)::BIGINT FROM loyalty_entries WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;
        Ok(balance.unwrap_or(0))
    }

    /// A user's most recent ledger entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_entries(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<LoyaltyEntry>, RepositoryError> {
        let rows: Vec<LoyaltyRow> = sqlx::query_as(
            r"
            SELECT id, user_id, order_id, points, reason, created_at
            FROM loyalty_entries
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(LoyaltyRow::into_entry).collect())
    }

    /// Append an accrual entry for a paid order.
    ///
    /// A partial unique index on `order_id` makes this idempotent per
    /// order: a duplicate webhook hits the constraint and is reported as
    /// a conflict instead of double-awarding.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order already earned
    /// points, `RepositoryError::Database` otherwise.
    pub async fn award_for_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        points: i32,
        reason: &str,
    ) -> Result<LoyaltyEntry, RepositoryError> {
        let row: LoyaltyRow = sqlx::query_as(
            r"
            INSERT INTO loyalty_entries (user_id, order_id, points, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, order_id, points, reason, created_at
            ",
        )
        .bind(user_id.as_i32())
        .bind(order_id.as_i32())
        .bind(points)
        .bind(reason)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order already awarded points".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into_entry())
    }
}
