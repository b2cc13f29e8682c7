//! Catalog management operations (shop database).
//!
//! The storefront reads this data; the back-office writes it. Variant
//! upserts lean on the `(product_id, domain_id)` uniqueness constraint,
//! so there is never more than one variant per product and domain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use seedling_core::types::StockStatus;
use seedling_core::variant::RegionalVariant;
use seedling_core::{ProductId, VariantId};

use super::RepositoryError;
use crate::models::product::AdminProduct;

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

/// Fields for creating or updating a product.
pub struct ProductFields<'a> {
    pub handle: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub kind: &'a str,
    pub image_url: Option<&'a str>,
}

/// Fields for upserting a variant.
pub struct VariantFields {
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub stock_status: StockStatus,
    pub available: bool,
}

/// List all products with their variants, newest first.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<AdminProduct>, RepositoryError> {
    let rows: Vec<ProductRow> = sqlx::query_as(
        r"
        SELECT id, handle, title, description, kind, image_url, created_at, updated_at
        FROM products
        ORDER BY created_at DESC, id DESC
        ",
    )
    .fetch_all(pool)
    .await?;

    let variant_rows: Vec<VariantRow> = sqlx::query_as(
        r"
        SELECT id, product_id, domain_id, price, sale_price,
               stock_quantity, stock_status, available
        FROM product_variants
        ORDER BY domain_id
        ",
    )
    .fetch_all(pool)
    .await?;

    let mut products: Vec<AdminProduct> = rows.into_iter().map(into_product).collect();
    for row in variant_rows {
        if let Some(product) = products
            .iter_mut()
            .find(|p| p.id.as_i32() == row.product_id)
        {
            product.variants.push(into_variant(row));
        }
    }

    Ok(products)
}

/// Get one product with its variants.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn get_product(
    pool: &PgPool,
    id: ProductId,
) -> Result<Option<AdminProduct>, RepositoryError> {
    let row: Option<ProductRow> = sqlx::query_as(
        r"
        SELECT id, handle, title, description, kind, image_url, created_at, updated_at
        FROM products
        WHERE id = $1
        ",
    )
    .bind(id.as_i32())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else { return Ok(None) };

    let variant_rows: Vec<VariantRow> = sqlx::query_as(
        r"
        SELECT id, product_id, domain_id, price, sale_price,
               stock_quantity, stock_status, available
        FROM product_variants
        WHERE product_id = $1
        ORDER BY domain_id
        ",
    )
    .bind(id.as_i32())
    .fetch_all(pool)
    .await?;

    let mut product = into_product(row);
    product.variants = variant_rows.into_iter().map(into_variant).collect();
    Ok(Some(product))
}

/// Create a product.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the handle is taken.
pub async fn create_product(
    pool: &PgPool,
    fields: &ProductFields<'_>,
) -> Result<AdminProduct, RepositoryError> {
    let row: ProductRow = sqlx::query_as(
        r"
        INSERT INTO products (handle, title, description, kind, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, handle, title, description, kind, image_url, created_at, updated_at
        ",
    )
    .bind(fields.handle)
    .bind(fields.title)
    .bind(fields.description)
    .bind(fields.kind)
    .bind(fields.image_url)
    .fetch_one(pool)
    .await
    .map_err(conflict_on_unique("handle already exists"))?;

    Ok(into_product(row))
}

/// Update a product.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product does not exist,
/// `RepositoryError::Conflict` if the new handle is taken.
pub async fn update_product(
    pool: &PgPool,
    id: ProductId,
    fields: &ProductFields<'_>,
) -> Result<AdminProduct, RepositoryError> {
    let row: Option<ProductRow> = sqlx::query_as(
        r"
        UPDATE products
        SET handle = $2, title = $3, description = $4, kind = $5, image_url = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, handle, title, description, kind, image_url, created_at, updated_at
        ",
    )
    .bind(id.as_i32())
    .bind(fields.handle)
    .bind(fields.title)
    .bind(fields.description)
    .bind(fields.kind)
    .bind(fields.image_url)
    .fetch_optional(pool)
    .await
    .map_err(conflict_on_unique("handle already exists"))?;

    row.map(into_product).ok_or(RepositoryError::NotFound)
}

/// Delete a product and its variants.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product does not exist.
pub async fn delete_product(pool: &PgPool, id: ProductId) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id.as_i32())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// Create or update the variant for one `(product, domain)` pair.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the product does not exist.
pub async fn upsert_variant(
    pool: &PgPool,
    product_id: ProductId,
    domain_id: &str,
    fields: &VariantFields,
) -> Result<RegionalVariant, RepositoryError> {
    let row: VariantRow = sqlx::query_as(
        r"
        INSERT INTO product_variants
            (product_id, domain_id, price, sale_price, stock_quantity, stock_status, available)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (product_id, domain_id)
        DO UPDATE SET price = EXCLUDED.price,
                      sale_price = EXCLUDED.sale_price,
                      stock_quantity = EXCLUDED.stock_quantity,
                      stock_status = EXCLUDED.stock_status,
                      available = EXCLUDED.available
        RETURNING id, product_id, domain_id, price, sale_price,
                  stock_quantity, stock_status, available
        ",
    )
    .bind(product_id.as_i32())
    .bind(domain_id)
    .bind(fields.price)
    .bind(fields.sale_price)
    .bind(fields.stock_quantity)
    .bind(fields.stock_status.as_str())
    .bind(fields.available)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_foreign_key_violation()
        {
            return RepositoryError::NotFound;
        }
        RepositoryError::Database(e)
    })?;

    Ok(into_variant(row))
}

/// Delete the variant for one `(product, domain)` pair.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no such variant exists.
pub async fn delete_variant(
    pool: &PgPool,
    product_id: ProductId,
    domain_id: &str,
) -> Result<(), RepositoryError> {
    let result =
        sqlx::query("DELETE FROM product_variants WHERE product_id = $1 AND domain_id = $2")
            .bind(product_id.as_i32())
            .bind(domain_id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

fn into_product(row: ProductRow) -> AdminProduct {
    AdminProduct {
        id: ProductId::new(row.id),
        handle: row.handle,
        title: row.title,
        description: row.description,
        kind: row.kind,
        image_url: row.image_url,
        variants: Vec::new(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn into_variant(row: VariantRow) -> RegionalVariant {
    RegionalVariant {
        id: VariantId::new(row.id),
        domain_id: row.domain_id,
        price: row.price,
        sale_price: row.sale_price,
        stock_quantity: row.stock_quantity,
        stock_status: StockStatus::parse(&row.stock_status),
        available: row.available,
    }
}

fn conflict_on_unique(message: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(message.to_owned());
        }
        RepositoryError::Database(e)
    }
}
