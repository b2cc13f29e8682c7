//! Cart domain types and region-aware pricing.
//!
//! The cart rows store only product references and quantities; prices are
//! computed at read time against the variant for the request's resolved
//! domain. A cart carried from seedling.nl to seedling.de therefore
//! reprices itself, which is the same rule the catalog pages follow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use seedling_core::types::CurrencyCode;
use seedling_core::{CartId, CartLineId, ProductId};

use super::product::Product;

/// A persisted cart.
#[derive(Debug, Clone)]
pub struct Cart {
    pub id: CartId,
    pub created_at: DateTime<Utc>,
}

/// One cart line: a product reference and a quantity.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: CartLineId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// A cart line priced for one domain.
#[derive(Debug, Clone, Serialize)]
pub struct PricedLine {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    pub handle: String,
    pub title: String,
    pub quantity: i32,
    /// Unit price in the domain's currency; absent when the product has
    /// no variant anywhere.
    pub unit_price: Option<Decimal>,
    pub line_total: Option<Decimal>,
    /// Pricing taken from another region's variant.
    pub is_fallback: bool,
    /// No variant exists at all; the line cannot be checked out.
    pub unavailable: bool,
}

/// A fully priced cart for one domain.
#[derive(Debug, Clone, Serialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
    pub currency: CurrencyCode,
    /// Total quantity across purchasable lines.
    pub item_count: i32,
}

impl PricedCart {
    /// An empty cart in the given currency.
    #[must_use]
    pub const fn empty(currency: CurrencyCode) -> Self {
        Self {
            lines: Vec::new(),
            subtotal: Decimal::ZERO,
            currency,
            item_count: 0,
        }
    }

    /// Whether any line cannot be fulfilled in this region.
    #[must_use]
    pub fn has_unavailable_lines(&self) -> bool {
        self.lines.iter().any(|l| l.unavailable)
    }
}

/// Price cart lines against their products for one domain.
///
/// Lines whose product has no variant anywhere are kept in the result,
/// marked unavailable, and excluded from the subtotal; checkout rejects
/// carts containing them.
#[must_use]
pub fn price_cart(
    lines: &[(CartLine, Product)],
    domain_id: &str,
    currency: CurrencyCode,
) -> PricedCart {
    let mut priced_lines = Vec::with_capacity(lines.len());
    let mut subtotal = Decimal::ZERO;
    let mut item_count = 0;

    for (line, product) in lines {
        let selection = product.variant_for(domain_id);
        let priced = match selection.variant {
            Some(variant) => {
                let unit_price = variant.effective_price();
                let line_total = unit_price * Decimal::from(line.quantity);
                subtotal += line_total;
                item_count += line.quantity;
                PricedLine {
                    line_id: line.id,
                    product_id: product.id,
                    handle: product.handle.clone(),
                    title: product.title.clone(),
                    quantity: line.quantity,
                    unit_price: Some(unit_price),
                    line_total: Some(line_total),
                    is_fallback: selection.is_fallback,
                    unavailable: false,
                }
            }
            None => PricedLine {
                line_id: line.id,
                product_id: product.id,
                handle: product.handle.clone(),
                title: product.title.clone(),
                quantity: line.quantity,
                unit_price: None,
                line_total: None,
                is_fallback: false,
                unavailable: true,
            },
        };
        priced_lines.push(priced);
    }

    PricedCart {
        lines: priced_lines,
        subtotal,
        currency,
        item_count,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use seedling_core::types::StockStatus;
    use seedling_core::variant::RegionalVariant;
    use seedling_core::{VariantId, CartId, CartLineId, ProductId};

    use super::*;

    fn product(id: i32, variants: Vec<RegionalVariant>) -> Product {
        Product {
            id: ProductId::new(id),
            handle: format!("product-{id}"),
            title: format!("Product {id}"),
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
    fn test_price_cart_sums_line_totals() {
        let lines = vec![
            (line(1, 1, 2), product(1, vec![variant("nl", 1000, None)])),
            (line(2, 2, 1), product(2, vec![variant("nl", 595, None)])),
        ];
        let cart = price_cart(&lines, "nl", CurrencyCode::EUR);
        assert_eq!(cart.subtotal, Decimal::new(2595, 2));
        assert_eq!(cart.item_count, 3);
        assert!(!cart.has_unavailable_lines());
    }

    #[test]
    fn test_price_cart_uses_sale_price() {
        let lines = vec![(
            line(1, 1, 1),
            product(1, vec![variant("nl", 1000, Some(750))]),
        )];
        let cart = price_cart(&lines, "nl", CurrencyCode::EUR);
        assert_eq!(cart.subtotal, Decimal::new(750, 2));
    }

    #[test]
    fn test_price_cart_flags_fallback_pricing() {
        let lines = vec![(line(1, 1, 1), product(1, vec![variant("de", 800, None)]))];
        let cart = price_cart(&lines, "fr", CurrencyCode::EUR);
        assert!(cart.lines[0].is_fallback);
        assert_eq!(cart.subtotal, Decimal::new(800, 2));
    }

    #[test]
    fn test_price_cart_excludes_unavailable_from_subtotal() {
        let lines = vec![
            (line(1, 1, 1), product(1, Vec::new())),
            (line(2, 2, 2), product(2, vec![variant("nl", 500, None)])),
        ];
        let cart = price_cart(&lines, "nl", CurrencyCode::EUR);
        assert!(cart.has_unavailable_lines());
        assert!(cart.lines[0].unavailable);
        assert_eq!(cart.lines[0].unit_price, None);
        assert_eq!(cart.subtotal, Decimal::new(1000, 2));
        assert_eq!(cart.item_count, 2);
    }

    #[test]
    fn test_empty_cart() {
        let cart = PricedCart::empty(CurrencyCode::EUR);
        assert_eq!(cart.subtotal, Decimal::ZERO);
        assert_eq!(cart.item_count, 0);
        assert!(!cart.has_unavailable_lines());
    }
}
