use rust_decimal::Decimal;
use shopfront_core::EnrichedLineItem;

/// Sum of `quantity × price` over the line items; 0 for none.
///
/// Only reconciled items count, so entries whose product failed to resolve
/// never contribute. The sum saturates at [`Decimal::MAX`].
#[must_use]
pub fn total(items: &[EnrichedLineItem]) -> Decimal {
    items
        .iter()
        .map(EnrichedLineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Number of units across the line items.
#[must_use]
pub fn item_count(items: &[EnrichedLineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::cart::reconcile::tests::product;

    #[test]
    fn test_total_of_nothing_is_zero() {
        assert_eq!(total(&[]), Decimal::ZERO);
        assert_eq!(item_count(&[]), 0);
    }

    #[test]
    fn test_total_sums_lines() {
        let items = [
            EnrichedLineItem::new(product("A", Decimal::TEN, 9), 2),
            EnrichedLineItem::new(product("B", Decimal::from_str("5.5").unwrap(), 9), 1),
        ];
        assert_eq!(total(&items), Decimal::from_str("25.5").unwrap());
        assert_eq!(item_count(&items), 3);
    }

    #[test]
    fn test_total_keeps_cents_exact() {
        let items = [EnrichedLineItem::new(
            product("A", Decimal::from_str("0.10").unwrap(), 99),
            3,
        )];
        assert_eq!(total(&items), Decimal::from_str("0.30").unwrap());
    }

    #[test]
    fn test_total_saturates_on_huge_prices() {
        let single = [EnrichedLineItem::new(product("A", Decimal::MAX, 9), 2)];
        assert_eq!(total(&single), Decimal::MAX);

        let half = Decimal::MAX / Decimal::TWO;
        let lines = [
            EnrichedLineItem::new(product("A", half, 9), 1),
            EnrichedLineItem::new(product("B", half, 9), 1),
            EnrichedLineItem::new(product("C", half, 9), 1),
        ];
        assert_eq!(total(&lines), Decimal::MAX);
    }
}
