//! Payment types as the back-office sees them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use seedling_core::types::PaymentStatus;
use seedling_core::{OrderId, PaymentId};

/// One payment joined with its order number, for oversight views.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentOverview {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub order_number: String,
    pub provider_id: String,
    pub status: PaymentStatus,
    pub amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
