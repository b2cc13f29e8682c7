//! Region-aware cart pricing through the storefront's public API.

use chrono::Utc;
use rust_decimal::Decimal;
use seedling_core::types::{CurrencyCode, StockStatus};
use seedling_core::variant::RegionalVariant;
use seedling_core::{CartId, CartLineId, ProductId, VariantId};
use seedling_storefront::models::cart::{CartLine, price_cart};
use seedling_storefront::models::product::Product;

fn product(id: i32, variants: Vec<RegionalVariant>) -> Product {
    Product {
        id: ProductId::new(id),
        handle: format!("seed-{id}"),
        title: format!("Seed {id}"),
        description: String::new(),
        kind: "feminized".to_owned(),
        image_url: None,
        variants,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn variant(domain_id: &str, cents: i64, sale_cents: Option<i64>) -> RegionalVariant {
    RegionalVariant {
        id: VariantId::new(1),
        domain_id: domain_id.to_owned(),
        price: Decimal::new(cents, 2),
        sale_price: sale_cents.map(|c| Decimal::new(c, 2)),
        stock_quantity: 10,
        stock_status: StockStatus::InStock,
        available: true,
    }
}

fn line(id: i32, product_id: i32, quantity: i32) -> CartLine {
    CartLine {
        id: CartLineId::new(id),
        cart_id: CartId::new(1),
        product_id: ProductId::new(product_id),
        quantity,
    }
}

#[test]
fn the_same_cart_reprices_per_domain() {
    let pairs = vec![(
        line(1, 1, 2),
        product(1, vec![variant("nl", 2495, None), variant("com", 2795, None)]),
    )];

    let nl = price_cart(&pairs, "nl", CurrencyCode::EUR);
    assert_eq!(nl.subtotal, Decimal::new(4990, 2));
    assert!(!nl.lines[0].is_fallback);

    let com = price_cart(&pairs, "com", CurrencyCode::USD);
    assert_eq!(com.subtotal, Decimal::new(5590, 2));
    assert_eq!(com.currency, CurrencyCode::USD);
}

#[test]
fn sale_prices_apply_and_fallback_is_flagged() {
    let pairs = vec![
        (line(1, 1, 1), product(1, vec![variant("nl", 2495, Some(1995))])),
        (line(2, 2, 3), product(2, vec![variant("de", 1000, None)])),
    ];

    let cart = price_cart(&pairs, "nl", CurrencyCode::EUR);
    assert_eq!(cart.lines[0].unit_price, Some(Decimal::new(1995, 2)));
    assert!(cart.lines[1].is_fallback);
    assert_eq!(cart.subtotal, Decimal::new(1995 + 3000, 2));
    assert_eq!(cart.item_count, 4);
}

#[test]
fn lines_without_any_variant_block_checkout_but_stay_visible() {
    let pairs = vec![
        (line(1, 1, 1), product(1, Vec::new())),
        (line(2, 2, 1), product(2, vec![variant("nl", 500, None)])),
    ];

    let cart = price_cart(&pairs, "nl", CurrencyCode::EUR);
    assert!(cart.has_unavailable_lines());
    assert_eq!(cart.lines.len(), 2);
    assert!(cart.lines[0].unavailable);
    assert_eq!(cart.lines[0].line_total, None);
    assert_eq!(cart.subtotal, Decimal::new(500, 2));
}
