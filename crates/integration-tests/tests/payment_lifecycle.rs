//! Payment status mapping and loyalty accrual rules.

use rust_decimal::Decimal;
use seedling_core::types::{OrderStatus, PaymentStatus};
use seedling_storefront::services::loyalty::points_for_total;

// =============================================================================
// Provider status mapping
// =============================================================================

#[test]
fn provider_statuses_map_one_to_one() {
    let cases = [
        ("open", PaymentStatus::Open),
        ("pending", PaymentStatus::Pending),
        ("paid", PaymentStatus::Paid),
        ("canceled", PaymentStatus::Canceled),
        ("expired", PaymentStatus::Expired),
        ("failed", PaymentStatus::Failed),
    ];
    for (raw, expected) in cases {
        assert_eq!(PaymentStatus::parse(raw), expected);
    }
}

#[test]
fn unknown_provider_status_stays_pending() {
    // A new provider state must never flip an order to paid or dead.
    let parsed = PaymentStatus::parse("authorized");
    assert_eq!(parsed, PaymentStatus::Pending);
    assert!(!parsed.is_terminal());
}

#[test]
fn terminal_statuses_are_exactly_the_settled_ones() {
    for status in [
        PaymentStatus::Paid,
        PaymentStatus::Canceled,
        PaymentStatus::Expired,
        PaymentStatus::Failed,
    ] {
        assert!(status.is_terminal());
    }
    for status in [PaymentStatus::Open, PaymentStatus::Pending] {
        assert!(!status.is_terminal());
    }
}

// =============================================================================
// Order status round-trips (database text representation)
// =============================================================================

#[test]
fn order_statuses_round_trip_through_text() {
    for status in [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Canceled,
        OrderStatus::Shipped,
    ] {
        assert_eq!(OrderStatus::parse(status.as_str()), status);
    }
}

// =============================================================================
// Loyalty accrual
// =============================================================================

#[test]
fn one_point_per_whole_unit_floor() {
    assert_eq!(points_for_total(Decimal::new(2495, 2)), 24);
    assert_eq!(points_for_total(Decimal::new(2400, 2)), 24);
    assert_eq!(points_for_total(Decimal::new(99, 2)), 0);
}

#[test]
fn zero_and_negative_totals_award_nothing() {
    assert_eq!(points_for_total(Decimal::ZERO), 0);
    assert_eq!(points_for_total(Decimal::new(-500, 2)), 0);
}
