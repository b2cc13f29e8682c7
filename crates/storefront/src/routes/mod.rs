//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Products
//! GET  /products               - Catalog page for the resolved region
//! GET  /products/{handle}      - Product detail
//!
//! # Cart
//! GET    /cart                 - Cart priced for the resolved region
//! POST   /cart/lines           - Add a product
//! PATCH  /cart/lines/{id}      - Set a line's quantity (0 removes)
//! DELETE /cart/lines/{id}      - Remove a line
//! GET    /cart/count           - Cart count badge
//!
//! # Checkout
//! POST /checkout               - Create order + hosted payment, return checkout URL
//! GET  /checkout/complete      - Order status for the provider return page
//! POST /webhooks/mollie        - Payment provider status webhook
//!
//! # Auth
//! POST /auth/register          - Register
//! POST /auth/login             - Login
//! POST /auth/logout            - Logout
//!
//! # Account (requires auth)
//! GET   /account               - Profile with loyalty balance
//! PATCH /account               - Update display name
//! GET   /account/orders        - Order history
//! GET   /account/loyalty       - Loyalty balance + recent ledger entries
//! GET  /account/addresses      - Address list
//! POST /account/addresses      - Create address
//! PUT    /account/addresses/{id} - Update address
//! DELETE /account/addresses/{id} - Delete address
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/lines", post(cart::add_line))
        .route(
            "/lines/{line_id}",
            patch(cart::update_line).delete(cart::remove_line),
        )
        .route("/count", get(cart::count))
        .layer(api_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).patch(account::update_profile))
        .route("/orders", get(account::orders))
        .route("/loyalty", get(account::loyalty))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout + payment webhook
        .route("/checkout", post(checkout::start))
        .route("/checkout/complete", get(checkout::complete))
        .route("/webhooks/mollie", post(checkout::mollie_webhook))
        // Account routes
        .nest("/account", account_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
