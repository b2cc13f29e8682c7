//! Cross-region variant selection behavior.

use rust_decimal::Decimal;
use seedling_core::VariantId;
use seedling_core::types::StockStatus;
use seedling_core::variant::{RegionalVariant, select_for_domain};

fn variant(id: i32, domain_id: &str, stock: i32, available: bool) -> RegionalVariant {
    RegionalVariant {
        id: VariantId::new(id),
        domain_id: domain_id.to_owned(),
        price: Decimal::new(2495, 2),
        sale_price: None,
        stock_quantity: stock,
        stock_status: StockStatus::InStock,
        available,
    }
}

#[test]
fn matching_domain_wins_without_fallback_flag() {
    let variants = vec![variant(1, "fr", 3, true)];
    let selection = select_for_domain(&variants, "fr");
    assert_eq!(selection.variant.map(|v| v.id), Some(VariantId::new(1)));
    assert!(!selection.is_fallback);
}

#[test]
fn missing_domain_falls_back_with_flag() {
    let variants = vec![variant(1, "de", 5, true)];
    let selection = select_for_domain(&variants, "fr");
    assert_eq!(selection.variant.map(|v| v.domain_id.as_str()), Some("de"));
    assert!(selection.is_fallback);
}

#[test]
fn fallback_is_deterministic_first_in_list_order() {
    // Repositories fetch variants ORDER BY domain_id, so "com" leads.
    let variants = vec![
        variant(1, "com", 1, true),
        variant(2, "de", 9, true),
        variant(3, "nl", 4, true),
    ];
    for _ in 0..3 {
        let selection = select_for_domain(&variants, "fr");
        assert_eq!(selection.variant.map(|v| v.id), Some(VariantId::new(1)));
        assert!(selection.is_fallback);
    }
}

#[test]
fn no_variants_is_a_displayable_state_not_an_error() {
    let selection = select_for_domain(&[], "nl");
    assert!(selection.variant.is_none());
    assert!(!selection.is_fallback);
    assert!(selection.is_unavailable());
}

#[test]
fn out_of_stock_is_shown_but_not_purchasable() {
    let variants = vec![variant(1, "nl", 0, true)];
    let selection = select_for_domain(&variants, "nl");
    let selected = selection.variant.expect("variant should be shown");
    assert!(!selected.is_purchasable());
    assert!(!selection.is_unavailable());
}

#[test]
fn kill_switched_variant_is_never_purchasable() {
    let variants = vec![variant(1, "nl", 50, false)];
    let selection = select_for_domain(&variants, "nl");
    assert!(!selection.variant.expect("shown").is_purchasable());
}
