//! Product management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use seedling_core::ProductId;
use seedling_core::types::StockStatus;

use crate::db::products as catalog;
use crate::db::products::{ProductFields, VariantFields};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AdminState;

/// Product create/update request body.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: String,
    pub image_url: Option<String>,
}

impl ProductBody {
    fn validate(&self) -> Result<ProductFields<'_>> {
        let handle = self.handle.trim();
        if handle.is_empty()
            || !handle
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AdminError::BadRequest(
                "handle must be non-empty lowercase kebab-case".to_owned(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(AdminError::BadRequest("title cannot be empty".to_owned()));
        }
        Ok(ProductFields {
            handle,
            title: self.title.trim(),
            description: &self.description,
            kind: &self.kind,
            image_url: self.image_url.as_deref(),
        })
    }
}

/// Variant upsert request body.
#[derive(Debug, Deserialize)]
pub struct VariantBody {
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock_quantity: i32,
    #[serde(default)]
    pub stock_status: StockStatus,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl VariantBody {
    fn validate(&self) -> Result<VariantFields> {
        if self.price < Decimal::ZERO {
            return Err(AdminError::BadRequest("price cannot be negative".to_owned()));
        }
        if let Some(sale) = self.sale_price
            && (sale < Decimal::ZERO || sale > self.price)
        {
            return Err(AdminError::BadRequest(
                "sale price must be between zero and the regular price".to_owned(),
            ));
        }
        if self.stock_quantity < 0 {
            return Err(AdminError::BadRequest(
                "stock quantity cannot be negative".to_owned(),
            ));
        }
        Ok(VariantFields {
            price: self.price,
            sale_price: self.sale_price,
            stock_quantity: self.stock_quantity,
            stock_status: self.stock_status,
            available: self.available,
        })
    }
}

/// List products with all variants.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AdminState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Value>> {
    let products = catalog::list_products(state.shop_pool()).await?;
    Ok(Json(json!({ "products": products })))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AdminState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    let product = catalog::get_product(state.shop_pool(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;
    Ok(Json(json!({ "product": product })))
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AdminState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let product = catalog::create_product(state.shop_pool(), &body.validate()?).await?;
    tracing::info!(admin_id = %admin.id, product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

/// Update a product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AdminState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Value>> {
    let product = catalog::update_product(state.shop_pool(), id, &body.validate()?).await?;
    tracing::info!(admin_id = %admin.id, product_id = %id, "product updated");
    Ok(Json(json!({ "product": product })))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AdminState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    catalog::delete_product(state.shop_pool(), id).await?;
    tracing::info!(admin_id = %admin.id, product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Create or replace the variant for one domain.
#[instrument(skip(state, body))]
pub async fn upsert_variant(
    State(state): State<AdminState>,
    RequireAdmin(admin): RequireAdmin,
    Path((id, domain_id)): Path<(ProductId, String)>,
    Json(body): Json<VariantBody>,
) -> Result<Json<Value>> {
    let variant =
        catalog::upsert_variant(state.shop_pool(), id, &domain_id, &body.validate()?).await?;
    tracing::info!(
        admin_id = %admin.id,
        product_id = %id,
        domain_id = %domain_id,
        "variant upserted"
    );
    Ok(Json(json!({ "variant": variant })))
}

/// Delete the variant for one domain.
#[instrument(skip(state))]
pub async fn delete_variant(
    State(state): State<AdminState>,
    RequireAdmin(admin): RequireAdmin,
    Path((id, domain_id)): Path<(ProductId, String)>,
) -> Result<StatusCode> {
    catalog::delete_variant(state.shop_pool(), id, &domain_id).await?;
    tracing::info!(
        admin_id = %admin.id,
        product_id = %id,
        domain_id = %domain_id,
        "variant deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
