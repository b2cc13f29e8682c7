//! Account route handlers: profile, orders, addresses, loyalty.
//!
//! Everything here requires an authenticated session; ownership checks
//! happen in the repositories via `user_id` guards.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use seedling_core::AddressId;

use crate::db::users::NewAddress;
use crate::db::{LoyaltyRepository, OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Ledger entries returned by the loyalty endpoint.
const LOYALTY_HISTORY_LIMIT: i64 = 20;

/// Profile with loyalty balance.
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

    let balance = LoyaltyRepository::new(state.pool()).balance(user.id).await?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "display_name": user.display_name,
        "loyalty_balance": balance,
        "member_since": user.created_at,
    })))
}

/// Profile update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub display_name: Option<String>,
}

/// Update the display name.
#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<Value>> {
    let display_name = body
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let user = UserRepository::new(state.pool())
        .update_display_name(current.id, display_name)
        .await?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "display_name": user.display_name,
    })))
}

/// Order history, newest first.
#[instrument(skip(state))]
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;
    Ok(Json(json!({ "orders": orders })))
}

/// Loyalty balance and recent ledger entries.
#[instrument(skip(state))]
pub async fn loyalty(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let repo = LoyaltyRepository::new(state.pool());
    let balance = repo.balance(current.id).await?;
    let entries = repo.recent_entries(current.id, LOYALTY_HISTORY_LIMIT).await?;

    Ok(Json(json!({
        "balance": balance,
        "entries": entries,
    })))
}

// =============================================================================
// Addresses
// =============================================================================

/// Address create/update request body.
#[derive(Debug, Deserialize)]
pub struct AddressBody {
    pub name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl AddressBody {
    fn validate(&self) -> Result<NewAddress<'_>> {
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::BadRequest(
                "country must be a two-letter ISO code".to_owned(),
            ));
        }
        for (field, value) in [
            ("name", &self.name),
            ("street", &self.street),
            ("postal_code", &self.postal_code),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{field} cannot be empty")));
            }
        }
        Ok(NewAddress {
            name: self.name.trim(),
            street: self.street.trim(),
            postal_code: self.postal_code.trim(),
            city: self.city.trim(),
            country: &self.country,
        })
    }
}

/// List addresses.
#[instrument(skip(state))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<Value>> {
    let addresses = UserRepository::new(state.pool())
        .list_addresses(current.id)
        .await?;
    Ok(Json(json!({ "addresses": addresses })))
}

/// Create an address.
#[instrument(skip(state, body))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(body): Json<AddressBody>,
) -> Result<(StatusCode, Json<Value>)> {
    let address = UserRepository::new(state.pool())
        .create_address(current.id, &body.validate()?)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "address": address }))))
}

/// Update an address.
#[instrument(skip(state, body))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressBody>,
) -> Result<Json<Value>> {
    let address = UserRepository::new(state.pool())
        .update_address(current.id, id, &body.validate()?)
        .await?;
    Ok(Json(json!({ "address": address })))
}

/// Delete an address.
#[instrument(skip(state))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<AddressId>,
) -> Result<StatusCode> {
    UserRepository::new(state.pool())
        .delete_address(current.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
