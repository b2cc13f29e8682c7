//! HTTP route handlers for the admin service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//!
//! # Auth
//! POST /auth/login                 - Admin login
//! POST /auth/logout                - Admin logout
//!
//! # Products (requires admin auth)
//! GET    /products                 - List products with variants
//! POST   /products                 - Create product
//! GET    /products/{id}            - Product detail
//! PUT    /products/{id}            - Update product
//! DELETE /products/{id}            - Delete product
//! PUT    /products/{id}/variants/{domain_id} - Upsert the domain's variant
//! DELETE /products/{id}/variants/{domain_id} - Delete the domain's variant
//!
//! # Payments (requires admin auth)
//! GET  /payments                   - Recent payments, filter by status
//! GET  /payments/{id}              - Payment detail
//! POST /payments/{id}/sync         - Re-fetch status from the provider
//! ```

pub mod auth;
pub mod payments;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AdminState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AdminState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product management routes router.
pub fn product_routes() -> Router<AdminState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/{id}/variants/{domain_id}",
            put(products::upsert_variant).delete(products::delete_variant),
        )
}

/// Create the payment oversight routes router.
pub fn payment_routes() -> Router<AdminState> {
    Router::new()
        .route("/", get(payments::index))
        .route("/{id}", get(payments::show))
        .route("/{id}/sync", post(payments::sync))
}

/// Create all routes for the admin service.
pub fn routes() -> Router<AdminState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/payments", payment_routes())
        .nest("/auth", auth_routes())
}
