//! Per-domain product variant selection.
//!
//! Every product carries one variant row per storefront domain, each with
//! its own price, sale price, and stock. Given the request's resolved
//! domain ID, [`select_for_domain`] picks the variant to display:
//!
//! 1. the variant whose `domain_id` matches, or
//! 2. any other variant, flagged as a fallback ("prices shown for another
//!    region"), or
//! 3. nothing, in which case the product renders as not available in the
//!    region.
//!
//! Absence of a variant is a valid, displayable state, not an error; every
//! outcome is representable in the return value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{StockStatus, VariantId};

/// One product variant, bound to a single storefront domain.
///
/// At most one variant exists per `(product, domain_id)` pair; the backing
/// store enforces that with a uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalVariant {
    pub id: VariantId,
    /// Domain this variant's pricing and stock apply to.
    pub domain_id: String,
    /// Regular price in the domain's currency.
    pub price: Decimal,
    /// Discounted price, when on sale.
    pub sale_price: Option<Decimal>,
    /// Units on hand.
    pub stock_quantity: i32,
    pub stock_status: StockStatus,
    /// Merchandising kill-switch; false hides the buy button regardless
    /// of stock.
    pub available: bool,
}

impl RegionalVariant {
    /// The price a customer actually pays: sale price when set.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether an add-to-cart action is offered.
    ///
    /// An available variant with zero stock is shown as out of stock but
    /// not hidden.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.available && self.stock_quantity > 0
    }
}

/// Result of selecting a variant for a domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantSelection<'a> {
    /// The variant to display, if any exists at all.
    pub variant: Option<&'a RegionalVariant>,
    /// True when the variant belongs to another domain and pricing is
    /// shown for that region instead.
    pub is_fallback: bool,
}

impl VariantSelection<'_> {
    /// Whether the product has nothing to show for this region.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        self.variant.is_none()
    }
}

/// Select the variant to display for a domain.
///
/// Exact `domain_id` match first; otherwise the first variant in list
/// order with the fallback flag set; otherwise nothing. Callers fetch
/// variants ordered by `domain_id`, which makes the fallback choice
/// deterministic across requests.
#[must_use]
pub fn select_for_domain<'a>(
    variants: &'a [RegionalVariant],
    domain_id: &str,
) -> VariantSelection<'a> {
    if let Some(variant) = variants.iter().find(|v| v.domain_id == domain_id) {
        return VariantSelection {
            variant: Some(variant),
            is_fallback: false,
        };
    }

    match variants.first() {
        Some(variant) => VariantSelection {
            variant: Some(variant),
            is_fallback: true,
        },
        None => VariantSelection {
            variant: None,
            is_fallback: false,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn variant(domain_id: &str, stock: i32, available: bool) -> RegionalVariant {
        RegionalVariant {
            id: VariantId::new(1),
            domain_id: domain_id.to_owned(),
            price: Decimal::new(1995, 2),
            sale_price: None,
            stock_quantity: stock,
            stock_status: StockStatus::InStock,
            available,
        }
    }

    #[test]
    fn test_exact_match_is_not_fallback() {
        let variants = vec![variant("fr", 3, true)];
        let selection = select_for_domain(&variants, "fr");
        assert_eq!(selection.variant.unwrap().domain_id, "fr");
        assert!(!selection.is_fallback);
    }

    #[test]
    fn test_missing_domain_falls_back_to_first() {
        let variants = vec![variant("de", 5, true)];
        let selection = select_for_domain(&variants, "fr");
        assert_eq!(selection.variant.unwrap().domain_id, "de");
        assert!(selection.is_fallback);
    }

    #[test]
    fn test_fallback_takes_first_in_list_order() {
        let variants = vec![variant("com", 1, true), variant("de", 9, true)];
        let selection = select_for_domain(&variants, "fr");
        assert_eq!(selection.variant.unwrap().domain_id, "com");
        assert!(selection.is_fallback);
    }

    #[test]
    fn test_empty_list_is_unavailable_not_an_error() {
        let selection = select_for_domain(&[], "fr");
        assert!(selection.variant.is_none());
        assert!(!selection.is_fallback);
        assert!(selection.is_unavailable());
    }

    #[test]
    fn test_exact_match_wins_over_list_order() {
        let variants = vec![variant("de", 5, true), variant("fr", 2, true)];
        let selection = select_for_domain(&variants, "fr");
        assert_eq!(selection.variant.unwrap().domain_id, "fr");
        assert!(!selection.is_fallback);
    }

    #[test]
    fn test_purchasable_requires_stock_and_availability() {
        assert!(variant("nl", 5, true).is_purchasable());
        // Out of stock is shown, but not purchasable.
        assert!(!variant("nl", 0, true).is_purchasable());
        // Kill-switched variants are never purchasable.
        assert!(!variant("nl", 5, false).is_purchasable());
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        let mut v = variant("nl", 5, true);
        assert_eq!(v.effective_price(), Decimal::new(1995, 2));
        v.sale_price = Some(Decimal::new(1495, 2));
        assert_eq!(v.effective_price(), Decimal::new(1495, 2));
    }
}
