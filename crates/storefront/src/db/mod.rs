//! Database operations for the storefront `PostgreSQL`.
//!
//! # Database: `seedling_shop`
//!
//! ## Tables
//!
//! - `users` - Customer accounts (argon2 password hashes)
//! - `sessions` - Tower-sessions storage
//! - `addresses` - User shipping/billing addresses
//! - `products` / `product_variants` - Catalog; one variant row per
//!   `(product, domain)` pair, enforced by a uniqueness constraint
//! - `carts` / `cart_lines` - Persisted carts (cart ID lives in the session)
//! - `orders` / `order_lines` - Orders with snapshotted prices
//! - `payments` - Hosted-provider payment attempts
//! - `loyalty_entries` - Append-only loyalty ledger
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p seedling-cli -- migrate storefront
//! ```
//!
//! All queries bind at runtime (`sqlx::query_as`); no compile-time query
//! cache is committed, so builds never need a live database.

pub mod carts;
pub mod loyalty;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use loyalty::LoyaltyRepository;
pub use orders::OrderRepository;
pub use payments::PaymentRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

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
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
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
