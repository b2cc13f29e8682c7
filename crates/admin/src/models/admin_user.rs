//! Admin user domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seedling_core::{AdminUserId, Email};

/// Keys under which values are stored in the admin session.
pub mod session_keys {
    /// The signed-in admin (`CurrentAdmin`).
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// An admin account. Created via the CLI only; there is no
/// self-registration path.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The signed-in admin, as persisted in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
}
