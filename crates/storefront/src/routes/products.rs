//! Product route handlers.
//!
//! Every response is shaped by the request's resolved region: the variant
//! for the resolved domain supplies pricing and stock, a variant from
//! another domain is flagged as fallback pricing, and a product with no
//! variants at all is returned as unavailable rather than omitted.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use seedling_core::types::{CurrencyCode, StockStatus};
use seedling_core::variant::VariantSelection;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::ShopRegion;
use crate::models::product::Product;
use crate::state::AppState;

/// Product summary for catalog listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub handle: String,
    pub title: String,
    pub kind: String,
    pub image_url: Option<String>,
    /// Absent when the product has no variant anywhere.
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub currency: CurrencyCode,
    pub purchasable: bool,
    /// Pricing taken from another region's variant.
    pub fallback_pricing: bool,
    /// No variant exists for any region.
    pub unavailable: bool,
}

/// Product detail payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub currency: CurrencyCode,
    pub stock_status: Option<StockStatus>,
    pub stock_quantity: Option<i32>,
    pub purchasable: bool,
    pub fallback_pricing: bool,
    pub unavailable: bool,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Catalog page response.
#[derive(Debug, Serialize)]
pub struct ProductsIndexResponse {
    pub products: Vec<ProductSummary>,
    pub page: u32,
    pub total_pages: u32,
    pub locale: String,
    pub domain_id: String,
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductShowResponse {
    pub product: ProductDetail,
    pub locale: String,
    pub domain_id: String,
}

fn summarize(product: &Product, domain_id: &str, currency: CurrencyCode) -> ProductSummary {
    let selection = product.variant_for(domain_id);
    let (price, sale_price, purchasable) = selection_pricing(&selection);

    ProductSummary {
        handle: product.handle.clone(),
        title: product.title.clone(),
        kind: product.kind.clone(),
        image_url: product.image_url.clone(),
        price,
        sale_price,
        currency,
        purchasable,
        fallback_pricing: selection.is_fallback,
        unavailable: selection.is_unavailable(),
    }
}

fn detail(product: &Product, domain_id: &str, currency: CurrencyCode) -> ProductDetail {
    let selection = product.variant_for(domain_id);
    let (price, sale_price, purchasable) = selection_pricing(&selection);

    ProductDetail {
        handle: product.handle.clone(),
        title: product.title.clone(),
        description: product.description.clone(),
        kind: product.kind.clone(),
        image_url: product.image_url.clone(),
        price,
        sale_price,
        currency,
        stock_status: selection.variant.map(|v| v.stock_status),
        stock_quantity: selection.variant.map(|v| v.stock_quantity),
        purchasable,
        fallback_pricing: selection.is_fallback,
        unavailable: selection.is_unavailable(),
    }
}

fn selection_pricing(selection: &VariantSelection<'_>) -> (Option<Decimal>, Option<Decimal>, bool) {
    match selection.variant {
        Some(v) => (Some(v.price), v.sale_price, v.is_purchasable()),
        None => (None, None, false),
    }
}

/// Fetch one catalog page through the read-through cache.
async fn cached_page(state: &AppState, page: u32) -> Result<Arc<Vec<Product>>> {
    if let Some(products) = state.catalog_cache().get(&page).await {
        return Ok(products);
    }

    let products = Arc::new(ProductRepository::new(state.pool()).list_page(page).await?);
    state.catalog_cache().insert(page, Arc::clone(&products)).await;
    Ok(products)
}

/// Catalog listing for the resolved region.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ProductsIndexResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let currency = state.domains().currency_for(&region.domain_id);

    let products = cached_page(&state, page).await?;
    let total_pages = ProductRepository::new(state.pool()).page_count().await?;

    let summaries = products
        .iter()
        .map(|p| summarize(p, &region.domain_id, currency))
        .collect();

    Ok(Json(ProductsIndexResponse {
        products: summaries,
        page,
        total_pages,
        locale: region.locale,
        domain_id: region.domain_id,
    }))
}

/// Product detail for the resolved region.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    Path(handle): Path<String>,
) -> Result<Json<ProductShowResponse>> {
    let product = ProductRepository::new(state.pool())
        .get_by_handle(&handle)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))?;

    let currency = state.domains().currency_for(&region.domain_id);

    Ok(Json(ProductShowResponse {
        product: detail(&product, &region.domain_id, currency),
        locale: region.locale,
        domain_id: region.domain_id,
    }))
}
