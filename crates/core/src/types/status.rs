//! Status enums for catalog, orders, and payments.

use serde::{Deserialize, Serialize};

/// Stock status of a product variant in one region.
///
/// Stored as lowercase text in the `product_variants` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    Backorder,
}

impl StockStatus {
    /// Parse from the database/text representation. Unknown values map to
    /// `OutOfStock` rather than erroring; a typo in the back-office must
    /// never make an item purchasable.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "in_stock" => Self::InStock,
            "backorder" => Self::Backorder,
            _ => Self::OutOfStock,
        }
    }

    /// Text representation as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::Backorder => "backorder",
        }
    }
}

/// Payment status, mirroring the hosted payment provider's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Created, customer has not completed the hosted checkout yet.
    #[default]
    Open,
    /// Provider is processing (e.g., bank transfer initiated).
    Pending,
    /// Funds received.
    Paid,
    /// Customer aborted at the provider.
    Canceled,
    /// Checkout link expired unused.
    Expired,
    /// Provider rejected or the payment bounced.
    Failed,
}

impl PaymentStatus {
    /// Parse a provider status string. Unknown statuses are treated as
    /// `Pending` so a new provider state never flips an order to paid or
    /// dead; a later sync will pick up the real terminal state.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            "paid" => Self::Paid,
            "canceled" => Self::Canceled,
            "expired" => Self::Expired,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// Text representation as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::Failed => "failed",
        }
    }

    /// Whether this status can still change on the provider side.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Canceled | Self::Expired | Self::Failed)
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at checkout, awaiting payment.
    #[default]
    Pending,
    /// Payment confirmed.
    Paid,
    /// Payment failed, expired, or was canceled.
    Canceled,
    /// Fulfilled and handed to the carrier.
    Shipped,
}

impl OrderStatus {
    /// Text representation as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
            Self::Shipped => "shipped",
        }
    }

    /// Parse from the database representation; unknown values map to
    /// `Pending`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "paid" => Self::Paid,
            "canceled" => Self::Canceled,
            "shipped" => Self::Shipped,
            _ => Self::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_roundtrip() {
        for status in [
            StockStatus::InStock,
            StockStatus::OutOfStock,
            StockStatus::Backorder,
        ] {
            assert_eq!(StockStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_stock_status_unknown_is_out_of_stock() {
        assert_eq!(StockStatus::parse("???"), StockStatus::OutOfStock);
    }

    #[test]
    fn test_payment_status_provider_strings() {
        assert_eq!(PaymentStatus::parse("open"), PaymentStatus::Open);
        assert_eq!(PaymentStatus::parse("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::parse("canceled"), PaymentStatus::Canceled);
        assert_eq!(PaymentStatus::parse("expired"), PaymentStatus::Expired);
        assert_eq!(PaymentStatus::parse("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::parse("pending"), PaymentStatus::Pending);
    }

    #[test]
    fn test_payment_status_unknown_is_pending() {
        assert_eq!(
            PaymentStatus::parse("authorized"),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn test_payment_status_terminal() {
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(!PaymentStatus::Open.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
    }

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Canceled,
            OrderStatus::Shipped,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), status);
        }
    }
}
