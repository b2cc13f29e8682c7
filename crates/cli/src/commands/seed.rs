//! Catalog seeding for local development.
//!
//! Inserts a handful of products with variants on every storefront
//! domain, plus one deliberately region-limited product so the variant
//! fallback paths show up in a fresh environment.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors from seed commands.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SeedProduct {
    handle: &'static str,
    title: &'static str,
    description: &'static str,
    kind: &'static str,
    /// `(domain_id, price_cents, stock)` per variant.
    variants: &'static [(&'static str, i64, i32)],
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        handle: "northern-lights-feminized",
        title: "Northern Lights Feminized",
        description: "Classic indica, forgiving to grow and quick to finish.",
        kind: "feminized",
        variants: &[("nl", 2495, 120), ("com", 2795, 80), ("de", 2495, 60), ("fr", 2495, 45)],
    },
    SeedProduct {
        handle: "amnesia-haze-autoflower",
        title: "Amnesia Haze Autoflower",
        description: "Sativa-leaning autoflower with a citrus edge.",
        kind: "autoflower",
        variants: &[("nl", 2895, 90), ("com", 3195, 40), ("de", 2895, 30), ("fr", 2895, 25)],
    },
    SeedProduct {
        handle: "charlottes-web-cbd",
        title: "Charlotte's Web CBD",
        description: "High-CBD cultivar, below 0.3% THC.",
        kind: "cbd",
        // Deliberately not sold on every domain.
        variants: &[("nl", 3495, 50), ("com", 3895, 20)],
    },
    SeedProduct {
        handle: "white-widow-regular",
        title: "White Widow Regular",
        description: "The Amsterdam coffeeshop staple, regular seeds.",
        kind: "regular",
        variants: &[("nl", 1995, 200)],
    },
];

/// Seed the shop database with sample products.
///
/// Idempotent per handle: existing products are left untouched.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn catalog() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SHOP_DATABASE_URL")
        .or_else(|_| std::env::var("STOREFRONT_DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar("SHOP_DATABASE_URL"))?;

    let pool = PgPool::connect(&database_url).await?;

    for product in SEED_PRODUCTS {
        let product_id: Option<i32> = sqlx::query_scalar(
            r"
            INSERT INTO products (handle, title, description, kind)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (handle) DO NOTHING
            RETURNING id
            ",
        )
        .bind(product.handle)
        .bind(product.title)
        .bind(product.description)
        .bind(product.kind)
        .fetch_optional(&pool)
        .await?;

        let Some(product_id) = product_id else {
            tracing::info!(handle = product.handle, "product already seeded, skipping");
            continue;
        };

        for (domain_id, price_cents, stock) in product.variants {
            sqlx::query(
                r"
                INSERT INTO product_variants
                    (product_id, domain_id, price, stock_quantity, stock_status, available)
                VALUES ($1, $2, $3, $4, 'in_stock', TRUE)
                ",
            )
            .bind(product_id)
            .bind(domain_id)
            .bind(Decimal::new(*price_cents, 2))
            .bind(stock)
            .execute(&pool)
            .await?;
        }

        tracing::info!(handle = product.handle, "product seeded");
    }

    tracing::info!("Catalog seed complete!");
    Ok(())
}
