//! Merging a live-cart snapshot with transcript-derived candidates.

use tandoor_menu::MenuCatalog;
use tandoor_types::{CandidateItem, LiveCartSnapshot, OrderLineItem};

use crate::assemble::{add_item, line_modifiers};

/// Merges a live cart with candidates parsed from the final confirmation.
///
/// The cart is the base list: its quantities and prices are authoritative.
/// Each cart line picks up the spice level and notes of the candidate
/// matching it by canonical name and quantity; spice-required lines with
/// no recovered level default to mild. Candidates with no matching cart
/// line contribute nothing — the cart, not the transcript, decides what
/// was ordered.
pub fn merge_cart(
    cart: LiveCartSnapshot,
    candidates: &[CandidateItem],
    catalog: &MenuCatalog,
) -> Vec<OrderLineItem> {
    let mut items = Vec::new();
    for line in &cart.items {
        let matched = candidates
            .iter()
            .find(|candidate| candidate.name == line.name && candidate.quantity == line.quantity);
        if matched.is_none() && !candidates.is_empty() {
            tracing::debug!(
                call_id = %cart.call_id,
                name = %line.name,
                "cart line has no matching transcript candidate, kept as-is"
            );
        }

        let modifiers = line_modifiers(
            matched.and_then(|candidate| candidate.spice),
            matched.and_then(|candidate| candidate.notes.as_deref()),
            catalog.requires_spice(&line.name),
        );
        add_item(&mut items, &line.name, line.quantity, line.unit_price, modifiers);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use tandoor_types::{CartLine, SpiceLevel};

    fn catalog() -> MenuCatalog {
        MenuCatalog::load(None).expect("default menu")
    }

    fn cart(lines: &[(&str, u32, i64)]) -> LiveCartSnapshot {
        LiveCartSnapshot {
            call_id: "abc".to_string(),
            items: lines
                .iter()
                .map(|(name, quantity, cents)| CartLine {
                    name: name.to_string(),
                    quantity: *quantity,
                    unit_price: Decimal::new(*cents, 2),
                    line_total: Decimal::new(*cents * i64::from(*quantity), 2),
                })
                .collect(),
            captured_at: Utc::now(),
        }
    }

    fn candidate(name: &str, quantity: u32, spice: Option<SpiceLevel>) -> CandidateItem {
        CandidateItem {
            quantity,
            name: name.to_string(),
            spice,
            notes: None,
        }
    }

    #[test]
    fn cart_lines_pick_up_matching_spice() {
        let items = merge_cart(
            cart(&[("butter chicken", 1, 1799)]),
            &[candidate("butter chicken", 1, Some(SpiceLevel::Spicy))],
            &catalog(),
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "butter chicken");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].modifiers, vec!["spice: spicy".to_string()]);
        assert_eq!(items[0].line_total, Decimal::new(1799, 2));
    }

    #[test]
    fn quantity_mismatch_means_no_enrichment() {
        let items = merge_cart(
            cart(&[("chicken dum biryani", 2, 1599)]),
            &[candidate("chicken dum biryani", 1, Some(SpiceLevel::Spicy))],
            &catalog(),
        );
        // Spice-required line falls back to the mild default.
        assert_eq!(items[0].modifiers, vec!["spice: mild".to_string()]);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn empty_candidates_keep_cart_as_is_with_defaults() {
        let items = merge_cart(
            cart(&[("chicken dum biryani", 1, 1599), ("mango lassi", 2, 499)]),
            &[],
            &catalog(),
        );
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].modifiers, vec!["spice: mild".to_string()]);
        assert!(items[1].modifiers.is_empty());
    }

    #[test]
    fn cart_quantities_and_prices_are_authoritative() {
        let items = merge_cart(
            cart(&[("butter chicken", 3, 1799)]),
            &[candidate("butter chicken", 3, None), candidate("samosa", 1, None)],
            &catalog(),
        );
        // The transcript-only samosa does not appear.
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].line_total, Decimal::new(5397, 2));
    }
}
