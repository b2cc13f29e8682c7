//! Session-stored values and their keys.

use serde::{Deserialize, Serialize};

use seedling_core::UserId;

/// Keys under which values are stored in the tower-sessions session.
pub mod session_keys {
    /// The signed-in user (`CurrentUser`).
    pub const CURRENT_USER: &str = "current_user";
    /// The active cart ID (`i32`).
    pub const CART_ID: &str = "cart_id";
}

/// The signed-in user, as persisted in the session.
///
/// Deliberately small: anything else is re-read from the database so a
/// stale session cannot serve stale account data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}
