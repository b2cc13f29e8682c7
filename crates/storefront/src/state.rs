//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use seedling_core::region::DomainTable;

use crate::config::StorefrontConfig;
use crate::models::product::Product;
use crate::services::mollie::MollieClient;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid domain table: {0}")]
    DomainTable(#[from] seedling_core::region::DomainTableError),
    #[error("payment client error: {0}")]
    Mollie(#[from] crate::services::mollie::MollieError),
}

/// How long a cached catalog page stays fresh.
///
/// Admin edits show up on the storefront within this window; the catalog
/// is small enough that a short TTL keeps the database load negligible.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound on cached catalog pages across all domains.
const CATALOG_CACHE_CAPACITY: u64 = 1_000;

/// Cache key: the catalog page number.
pub type CatalogCacheKey = u32;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    mollie: MollieClient,
    domains: DomainTable,
    catalog_cache: Cache<CatalogCacheKey, Arc<Vec<Product>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the default TLD from configuration is not in
    /// the domain table, or if the payment client fails to build.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateError> {
        let mollie = MollieClient::new(&config.mollie)?;

        // Rebuild the shipped table around the configured default so a
        // preview deployment can default to .com without a code change.
        let shipped = DomainTable::default();
        let domains = DomainTable::new(shipped.domains().to_vec(), &config.default_tld)?;

        let catalog_cache = Cache::builder()
            .max_capacity(CATALOG_CACHE_CAPACITY)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mollie,
                domains,
                catalog_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn mollie(&self) -> &MollieClient {
        &self.inner.mollie
    }

    /// Get a reference to the domain table.
    #[must_use]
    pub fn domains(&self) -> &DomainTable {
        &self.inner.domains
    }

    /// Get a reference to the catalog page cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<CatalogCacheKey, Arc<Vec<Product>>> {
        &self.inner.catalog_cache
    }
}
