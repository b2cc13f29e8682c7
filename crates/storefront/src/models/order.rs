//! Order and payment domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use seedling_core::types::{CurrencyCode, OrderStatus, PaymentStatus};
use seedling_core::{CartId, OrderId, PaymentId, ProductId, UserId};

/// A placed order. Line prices are snapshotted at checkout; later price
/// changes never touch an existing order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(skip)]
    pub user_id: UserId,
    /// Cart this order was created from; cleared once the payment lands.
    #[serde(skip)]
    pub cart_id: Option<CartId>,
    /// Human-facing order number, e.g. "S2026-000042".
    pub number: String,
    /// Domain the order was placed on; fixes the currency and the prices.
    pub domain_id: String,
    pub currency: CurrencyCode,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One order line with its snapshotted price.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    #[serde(skip)]
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// A payment attempt at the hosted provider for one order.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    /// The provider's payment ID (e.g. "tr_WDqYK6vllg").
    pub provider_id: String,
    pub status: PaymentStatus,
    /// Hosted checkout page the customer is sent to.
    pub checkout_url: Option<String>,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
