//! Catalog types as the back-office sees them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use seedling_core::ProductId;
use seedling_core::variant::RegionalVariant;

/// A product with all of its per-domain variants, for management views.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProduct {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub image_url: Option<String>,
    pub variants: Vec<RegionalVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
