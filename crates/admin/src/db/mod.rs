//! Database operations for the admin service.
//!
//! # Two databases
//!
//! - `seedling_admin` (SEPARATE from the shop): `admin_users`, admin
//!   sessions. Admin accounts are created via the CLI only.
//! - `seedling_shop`: the back-office reaches into the shop database for
//!   catalog management ([`products`]) and payment oversight
//!   ([`payments`]).
//!
//! # Migrations
//!
//! Admin migrations live in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p seedling-cli -- migrate admin
//! ```

pub mod admin_users;
pub mod payments;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
