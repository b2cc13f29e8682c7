//! Loyalty point accrual.
//!
//! Customers earn one point per whole currency unit of a paid order
//! (floor of the order total). Accrual happens exactly once per order;
//! the ledger's per-order uniqueness makes a replayed webhook a no-op.

use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;

use crate::db::loyalty::LoyaltyRepository;
use crate::db::RepositoryError;
use crate::models::order::Order;
use crate::models::user::LoyaltyEntry;

/// Points earned for an order total.
#[must_use]
pub fn points_for_total(total: rust_decimal::Decimal) -> i32 {
    let whole = total.trunc().to_i64().unwrap_or(0);
    i32::try_from(whole).unwrap_or(i32::MAX).max(0)
}

/// Award points for a freshly paid order.
///
/// Returns `Ok(None)` when the order already earned points (duplicate
/// webhook delivery) or when the total rounds down to zero points.
///
/// # Errors
///
/// Returns `RepositoryError` for database failures other than the
/// idempotence conflict.
pub async fn award_for_paid_order(
    pool: &PgPool,
    order: &Order,
) -> Result<Option<LoyaltyEntry>, RepositoryError> {
    let points = points_for_total(order.total);
    if points <= 0 {
        return Ok(None);
    }

    let reason = format!("order {} paid", order.number);
    match LoyaltyRepository::new(pool)
        .award_for_order(order.user_id, order.id, points, &reason)
        .await
    {
        Ok(entry) => {
            tracing::info!(
                user_id = %order.user_id,
                order_id = %order.id,
                points,
                "loyalty points awarded"
            );
            Ok(Some(entry))
        }
        Err(RepositoryError::Conflict(_)) => {
            tracing::debug!(order_id = %order.id, "order already awarded points");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_points_floor_the_total() {
        assert_eq!(points_for_total(Decimal::new(1999, 2)), 19);
        assert_eq!(points_for_total(Decimal::new(2000, 2)), 20);
        assert_eq!(points_for_total(Decimal::new(99, 2)), 0);
        assert_eq!(points_for_total(Decimal::ZERO), 0);
    }

    #[test]
    fn test_points_for_whole_amounts() {
        assert_eq!(points_for_total(Decimal::new(45, 0)), 45);
    }
}
