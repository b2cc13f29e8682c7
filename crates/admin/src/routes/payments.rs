//! Payment oversight route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use seedling_core::PaymentId;
use seedling_core::types::{OrderStatus, PaymentStatus};

use crate::db::payments as payments_db;
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::services::mollie::MollieError;
use crate::state::AdminState;

/// Payments shown per listing.
const PAYMENT_LIST_LIMIT: i64 = 100;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Provider status to filter by (e.g. "paid", "open").
    pub status: Option<String>,
}

/// List recent payments.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AdminState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let status = query.status.as_deref().map(PaymentStatus::parse);
    let payments =
        payments_db::list_payments(state.shop_pool(), status, PAYMENT_LIST_LIMIT).await?;
    Ok(Json(json!({ "payments": payments })))
}

/// Payment detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AdminState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<PaymentId>,
) -> Result<Json<Value>> {
    let payment = payments_db::get_payment(state.shop_pool(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("payment {id}")))?;
    Ok(Json(json!({ "payment": payment })))
}

/// Re-fetch a payment's status from the provider and reconcile the order.
///
/// The storefront webhook normally keeps payments current; this is the
/// manual path for missed webhooks.
#[instrument(skip(state))]
pub async fn sync(
    State(state): State<AdminState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<PaymentId>,
) -> Result<Json<Value>> {
    let payment = payments_db::get_payment(state.shop_pool(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("payment {id}")))?;

    let provider_status = match state.mollie().get_payment_status(&payment.provider_id).await {
        Ok(status) => status,
        Err(MollieError::PaymentNotFound(pid)) => {
            return Err(AdminError::NotFound(format!("provider payment {pid}")));
        }
        Err(e) => return Err(e.into()),
    };

    let previous = payments_db::update_payment_status(state.shop_pool(), id, provider_status).await?;

    if previous != provider_status {
        tracing::info!(
            admin_id = %admin.id,
            payment_id = %id,
            from = previous.as_str(),
            to = provider_status.as_str(),
            "payment status reconciled"
        );

        // Reflect terminal provider states onto the order. Loyalty
        // accrual stays with the storefront webhook; the ledger's
        // per-order uniqueness keeps the two paths from double-awarding.
        let order_status = match provider_status {
            PaymentStatus::Paid => Some(OrderStatus::Paid),
            PaymentStatus::Canceled | PaymentStatus::Expired | PaymentStatus::Failed => {
                Some(OrderStatus::Canceled)
            }
            PaymentStatus::Open | PaymentStatus::Pending => None,
        };
        if let Some(status) = order_status {
            payments_db::update_order_status(state.shop_pool(), payment.order_id, status).await?;
        }
    }

    Ok(Json(json!({
        "payment_id": id,
        "previous_status": previous,
        "status": provider_status,
    })))
}
