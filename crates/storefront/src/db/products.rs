//! Product repository for catalog reads.
//!
//! Variants are always fetched `ORDER BY domain_id` so that the
//! cross-region fallback (first variant in list order) is deterministic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use seedling_core::types::StockStatus;
use seedling_core::variant::RegionalVariant;
use seedling_core::{ProductId, VariantId};

use super::RepositoryError;
use crate::models::product::Product;

/// Products per catalog page.
pub const PAGE_SIZE: i64 = 24;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    handle: String,
    title: String,
    description: String,
    kind: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: i32,
    product_id: i32,
    domain_id: String,
    price: Decimal,
    sale_price: Option<Decimal>,
    stock_quantity: i32,
    stock_status: String,
    available: bool,
}

impl VariantRow {
    fn into_variant(self) -> RegionalVariant {
        RegionalVariant {
            id: VariantId::new(self.id),
            domain_id: self.domain_id,
            price: self.price,
            sale_price: self.sale_price,
            stock_quantity: self.stock_quantity,
            stock_status: StockStatus::parse(&self.stock_status),
            available: self.available,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List one catalog page, newest first, with variants attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_page(&self, page: u32) -> Result<Vec<Product>, RepositoryError> {
        let offset = i64::from(page.saturating_sub(1)) * PAGE_SIZE;
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, handle, title, description, kind, image_url, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        self.attach_variants(rows).await
    }

    /// Total number of catalog pages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn page_count(&self) -> Result<u32, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        let pages = (total + PAGE_SIZE - 1) / PAGE_SIZE;
        Ok(u32::try_from(pages).unwrap_or(u32::MAX).max(1))
    }

    /// Get a product by its URL handle.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_handle(&self, handle: &str) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, handle, title, description, kind, image_url, created_at, updated_at
            FROM products
            WHERE handle = $1
            ",
        )
        .bind(handle)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_variants(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Get products by ID, preserving no particular order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<HashMap<ProductId, Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, handle, title, description, kind, image_url, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        let products = self.attach_variants(rows).await?;
        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Fetch variants for the given product rows and assemble domain types.
    async fn attach_variants(
        &self,
        rows: Vec<ProductRow>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let variant_rows: Vec<VariantRow> = if ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                r"
                SELECT id, product_id, domain_id, price, sale_price,
                       stock_quantity, stock_status, available
                FROM product_variants
                WHERE product_id = ANY($1)
                ORDER BY domain_id
                ",
            )
            .bind(&ids)
            .fetch_all(self.pool)
            .await?
        };

        let mut by_product: HashMap<i32, Vec<RegionalVariant>> = HashMap::new();
        for row in variant_rows {
            by_product
                .entry(row.product_id)
                .or_default()
                .push(row.into_variant());
        }

        Ok(rows
            .into_iter()
            .map(|row| Product {
                id: ProductId::new(row.id),
                handle: row.handle,
                title: row.title,
                description: row.description,
                kind: row.kind,
                image_url: row.image_url,
                variants: by_product.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }
}
