//! Checkout and payment webhook handlers.
//!
//! Checkout snapshots the cart into a pending order, creates a hosted
//! payment at the provider, and hands the checkout URL to the client.
//! The provider reports status changes to the webhook with nothing but a
//! payment ID; the handler re-fetches the payment before acting, so a
//! forged webhook body can at worst trigger a harmless re-sync.

use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use seedling_core::types::{OrderStatus, PaymentStatus};
use seedling_core::{OrderId, ProductId};

use crate::db::orders::NewOrderLine;
use crate::db::{CartRepository, OrderRepository, PaymentRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireUser, ShopRegion};
use crate::models::cart::price_cart;
use crate::models::order::Order;
use crate::services::loyalty;
use crate::services::mollie::{MollieAmount, MollieError};
use crate::state::AppState;

use super::cart::get_cart_id;

/// Start checkout: create a pending order and a hosted payment.
#[instrument(skip(state, session))]
pub async fn start(
    State(state): State<AppState>,
    ShopRegion(region): ShopRegion,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<(StatusCode, Json<Value>)> {
    let cart_id = get_cart_id(&session)
        .await
        .ok_or_else(|| AppError::BadRequest("cart is empty".to_owned()))?;

    let lines = CartRepository::new(state.pool()).lines(cart_id).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    let product_ids: Vec<ProductId> = lines.iter().map(|l| l.product_id).collect();
    let mut products = ProductRepository::new(state.pool())
        .get_by_ids(&product_ids)
        .await?;
    let pairs: Vec<_> = lines
        .into_iter()
        .filter_map(|line| products.remove(&line.product_id).map(|p| (line, p)))
        .collect();

    let currency = state.domains().currency_for(&region.domain_id);
    let priced = price_cart(&pairs, &region.domain_id, currency);
    if priced.has_unavailable_lines() {
        return Err(AppError::Unprocessable(
            "some cart items are not available in your region".to_owned(),
        ));
    }

    let order_lines: Vec<NewOrderLine> = priced
        .lines
        .iter()
        .filter_map(|line| {
            Some(NewOrderLine {
                product_id: line.product_id,
                title: line.title.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price?,
                line_total: line.line_total?,
            })
        })
        .collect();

    let order = OrderRepository::new(state.pool())
        .create(user.id, cart_id, &region.domain_id, currency, priced.subtotal, &order_lines)
        .await?;

    let redirect_url = build_url(
        &state,
        "/checkout/complete",
        Some(("order", &order.id.to_string())),
    )?;
    let webhook_url = build_url(&state, "/webhooks/mollie", None)?;

    let amount = MollieAmount::new(order.total, currency);
    let description = format!("Seedling order {}", order.number);
    let provider_payment = state
        .mollie()
        .create_payment(
            &amount,
            &description,
            order.id.as_i32(),
            &redirect_url,
            &webhook_url,
        )
        .await?;

    PaymentRepository::new(state.pool())
        .create(
            order.id,
            &provider_payment.id,
            provider_payment.status,
            provider_payment.checkout_url.as_deref(),
            order.total,
            currency,
        )
        .await?;

    tracing::info!(
        order_id = %order.id,
        number = %order.number,
        provider_id = %provider_payment.id,
        "checkout started"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "order_id": order.id,
            "number": order.number,
            "checkout_url": provider_payment.checkout_url,
        })),
    ))
}

/// Join a path (and optional query pair) onto the configured base URL.
fn build_url(state: &AppState, path: &str, query: Option<(&str, &str)>) -> Result<String> {
    let mut url = Url::parse(&state.config().base_url)
        .and_then(|u| u.join(path))
        .map_err(|e| AppError::Internal(format!("invalid base_url: {e}")))?;
    if let Some((key, value)) = query {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url.into())
}

/// Query parameters for the provider return page.
#[derive(Debug, Deserialize)]
pub struct CompleteQuery {
    pub order: OrderId,
}

/// Order status for the provider return page.
///
/// The provider redirects here without saying how the payment went; the
/// client polls this until the webhook has settled the order.
#[instrument(skip(state))]
pub async fn complete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<CompleteQuery>,
) -> Result<Json<Value>> {
    let order = OrderRepository::new(state.pool())
        .get(query.order)
        .await?
        .filter(|o| o.user_id == user.id)
        .ok_or_else(|| AppError::NotFound(format!("order {}", query.order)))?;

    Ok(Json(json!({
        "number": order.number,
        "status": order.status,
        "total": order.total,
        "currency": order.currency,
    })))
}

/// Payment provider webhook body: just the payment ID.
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    pub id: String,
}

/// Payment provider status webhook.
///
/// Idempotent: replayed deliveries re-fetch the same provider state and
/// find the status unchanged, so no transition fires twice.
#[instrument(skip(state), fields(provider_id = %form.id))]
pub async fn mollie_webhook(
    State(state): State<AppState>,
    Form(form): Form<WebhookForm>,
) -> Result<StatusCode> {
    let payment = PaymentRepository::new(state.pool())
        .get_by_provider_id(&form.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("payment {}", form.id)))?;

    let provider_payment = match state.mollie().get_payment(&form.id).await {
        Ok(p) => p,
        Err(MollieError::PaymentNotFound(id)) => {
            return Err(AppError::NotFound(format!("payment {id}")));
        }
        Err(e) => return Err(e.into()),
    };

    let previous = PaymentRepository::new(state.pool())
        .update_status(payment.id, provider_payment.status)
        .await?;

    if previous == provider_payment.status {
        return Ok(StatusCode::OK);
    }

    tracing::info!(
        payment_id = %payment.id,
        order_id = %payment.order_id,
        from = previous.as_str(),
        to = provider_payment.status.as_str(),
        "payment status changed"
    );

    let order = OrderRepository::new(state.pool())
        .get(payment.order_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("payment {} has no order", payment.id)))?;

    match provider_payment.status {
        PaymentStatus::Paid => settle_paid_order(&state, &order).await?,
        PaymentStatus::Canceled | PaymentStatus::Expired | PaymentStatus::Failed => {
            if order.status == OrderStatus::Pending {
                OrderRepository::new(state.pool())
                    .set_status(order.id, OrderStatus::Canceled)
                    .await?;
            }
        }
        PaymentStatus::Open | PaymentStatus::Pending => {}
    }

    Ok(StatusCode::OK)
}

/// Mark an order paid, award loyalty points, and drop the source cart.
async fn settle_paid_order(state: &AppState, order: &Order) -> Result<()> {
    OrderRepository::new(state.pool())
        .set_status(order.id, OrderStatus::Paid)
        .await?;

    loyalty::award_for_paid_order(state.pool(), order).await?;

    if let Some(cart_id) = order.cart_id {
        CartRepository::new(state.pool()).delete(cart_id).await?;
    }

    Ok(())
}
