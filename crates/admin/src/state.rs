//! Application state shared across admin handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::mollie::MollieClient;

/// Application state shared across all admin handlers.
///
/// Holds two pools: the admin database (admin users, sessions) and the
/// shop database (catalog, orders, payments). The split keeps a
/// compromised storefront away from admin credentials and vice versa.
#[derive(Clone)]
pub struct AdminState {
    inner: Arc<AdminStateInner>,
}

struct AdminStateInner {
    config: AdminConfig,
    admin_pool: PgPool,
    shop_pool: PgPool,
    mollie: MollieClient,
}

impl AdminState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment client fails to build.
    pub fn new(
        config: AdminConfig,
        admin_pool: PgPool,
        shop_pool: PgPool,
    ) -> Result<Self, crate::services::mollie::MollieError> {
        let mollie = MollieClient::new(&config.mollie_api_key)?;
        Ok(Self {
            inner: Arc::new(AdminStateInner {
                config,
                admin_pool,
                shop_pool,
                mollie,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the admin database pool.
    #[must_use]
    pub fn admin_pool(&self) -> &PgPool {
        &self.inner.admin_pool
    }

    /// Get a reference to the shop database pool.
    #[must_use]
    pub fn shop_pool(&self) -> &PgPool {
        &self.inner.shop_pool
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn mollie(&self) -> &MollieClient {
        &self.inner.mollie
    }
}
