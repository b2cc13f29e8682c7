//! Cart route handlers.
//!
//! The cart ID lives in the session; cart contents live in the database.
//! All pricing is computed per request against the resolved region, so a
//! cart viewed from another storefront domain reprices itself.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use seedling_core::{CartId, CartLineId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::ShopRegion;
use crate::models::cart::{PricedCart, price_cart};
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
pub(crate) async fn get_cart_id(session: &Session) -> Option<CartId> {
    session
        .get::<i32>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
        .map(CartId::new)
}

/// Set the cart ID in the session.
async fn set_cart_id(
    session: &Session,
    cart_id: CartId,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART_ID, cart_id.as_i32()).await
}

/// Get the session's cart, creating one on first use.
async fn ensure_cart(state: &AppState, session: &Session) -> Result<CartId> {
    if let Some(cart_id) = get_cart_id(session).await {
        // A stale session may reference a cart deleted after checkout.
        if CartRepository::new(state.pool()).get(cart_id).await?.is_some() {
            return Ok(cart_id);
        }
    }

    let cart = CartRepository::new(state.pool()).create().await?;
    set_cart_id(session, cart.id)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist cart id: {e}")))?;
    Ok(cart.id)
}

/// Price a cart's lines for the resolved region.
async fn priced_cart(state: &AppState, cart_id: CartId, region: &seedling_core::region::ResolvedRegion) -> Result<PricedCart> {
    let currency = state.domains().currency_for(&region.domain_id);
    let lines = CartRepository::new(state.pool()).lines(cart_id).await?;
    if lines.is_empty() {
        return Ok(PricedCart::empty(currency));
    }

    let product_ids: Vec<ProductId> = lines.iter().map(|l| l.product_id).collect();
    let mut products = ProductRepository::new(state.pool())
        .get_by_ids(&product_ids)
        .await?;

    let pairs: Vec<_> = lines
        .into_iter()
        .filter_map(|line| products.remove(&line.product_id).map(|p| (line, p)))
        .collect();

    Ok(price_cart(&pairs, &region.domain_id, currency))
}

// =============================================================================
// Handlers
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddLineBody {
    pub product_id: ProductId,
    pub quantity: Option<i32>,
}

/// Update line request body.
#[derive(Debug, Deserialize)]
pub struct UpdateLineBody {
    pub quantity: i32,
}

/// Display the cart priced for the resolved region.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    session: Session,
) -> Result<Json<PricedCart>> {
    let currency = state.domains().currency_for(&region.domain_id);
    let cart = match get_cart_id(&session).await {
        Some(cart_id) => priced_cart(&state, cart_id, &region).await?,
        None => PricedCart::empty(currency),
    };
    Ok(Json(cart))
}

/// Add a product to the cart.
///
/// Rejects products that are not purchasable in the resolved region
/// (no variant at all, kill-switched, or out of stock).
#[instrument(skip(state, session))]
pub async fn add_line(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    session: Session,
    Json(body): Json<AddLineBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let quantity = body.quantity.unwrap_or(1);
    if !(1..=999).contains(&quantity) {
        return Err(AppError::BadRequest("quantity must be within 1..=999".to_owned()));
    }

    let products = ProductRepository::new(state.pool())
        .get_by_ids(&[body.product_id])
        .await?;
    let product = products
        .get(&body.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let selection = product.variant_for(&region.domain_id);
    let purchasable = selection.variant.is_some_and(seedling_core::variant::RegionalVariant::is_purchasable);
    if !purchasable {
        return Err(AppError::Unprocessable(
            "product is not available in your region".to_owned(),
        ));
    }

    let cart_id = ensure_cart(&state, &session).await?;
    let line = CartRepository::new(state.pool())
        .add_line(cart_id, body.product_id, quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "line_id": line.id, "quantity": line.quantity })),
    ))
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(state, session))]
pub async fn update_line(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    session: Session,
    Path(line_id): Path<CartLineId>,
    Json(body): Json<UpdateLineBody>,
) -> Result<Json<PricedCart>> {
    let cart_id = get_cart_id(&session)
        .await
        .ok_or_else(|| AppError::NotFound("cart".to_owned()))?;

    CartRepository::new(state.pool())
        .set_line_quantity(cart_id, line_id, body.quantity)
        .await?;

    Ok(Json(priced_cart(&state, cart_id, &region).await?))
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove_line(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    session: Session,
    Path(line_id): Path<CartLineId>,
) -> Result<Json<PricedCart>> {
    let cart_id = get_cart_id(&session)
        .await
        .ok_or_else(|| AppError::NotFound("cart".to_owned()))?;

    CartRepository::new(state.pool())
        .remove_line(cart_id, line_id)
        .await?;

    Ok(Json(priced_cart(&state, cart_id, &region).await?))
}

/// Cart count badge.
#[instrument(skip(state, session))]
pub async fn count(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>> {
    let count = match get_cart_id(&session).await {
        Some(cart_id) => CartRepository::new(state.pool()).item_count(cart_id).await?,
        None => 0,
    };
    Ok(Json(json!({ "count": count })))
}
