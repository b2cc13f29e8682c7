//! User, address, and loyalty domain types.

use chrono::{DateTime, Utc};

use seedling_core::{AddressId, Email, LoyaltyEntryId, OrderId, UserId};

/// A storefront customer account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (lowercase-normalized).
    pub email: Email,
    /// Display name shown in the account area.
    pub display_name: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A shipping/billing address belonging to a user.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(skip)]
    pub user_id: UserId,
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub created_at: DateTime<Utc>,
}

/// One append-only loyalty ledger entry.
///
/// A user's balance is the sum of their entries; entries are never
/// updated or deleted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoyaltyEntry {
    pub id: LoyaltyEntryId,
    #[serde(skip)]
    pub user_id: UserId,
    /// Order that earned these points, when order-related.
    pub order_id: Option<OrderId>,
    /// Points delta; positive for accrual.
    pub points: i32,
    /// Human-readable reason ("order #S2026-000123 paid").
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
