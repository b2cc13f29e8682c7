//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use seedling_core::ProductId;
use seedling_core::variant::{RegionalVariant, select_for_domain};

/// A catalog entry with its per-domain variants.
///
/// Variants are fetched ordered by `domain_id` so the cross-region
/// fallback pick is deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    /// URL slug, unique across the catalog.
    pub handle: String,
    pub title: String,
    pub description: String,
    /// Product family, e.g. "feminized", "autoflower", "cbd".
    pub kind: String,
    pub image_url: Option<String>,
    pub variants: Vec<RegionalVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The variant shown on this product for a domain, with the fallback
    /// flag. See [`select_for_domain`].
    #[must_use]
    pub fn variant_for(&self, domain_id: &str) -> seedling_core::variant::VariantSelection<'_> {
        select_for_domain(&self.variants, domain_id)
    }
}
