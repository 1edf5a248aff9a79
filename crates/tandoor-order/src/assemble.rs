//! Line-item accumulation, totals, and direct order assembly.

use rust_decimal::{Decimal, RoundingStrategy};

use tandoor_menu::MenuCatalog;
use tandoor_parse::infer_fulfillment;
use tandoor_types::{
    CandidateItem, Contact, LiveCartSnapshot, Order, OrderLineItem, SpiceLevel,
};

use crate::reconcile;

/// Adds a line to the accumulating item list, merging with an existing
/// line of identical identity (name + exact modifier list).
///
/// This is the single place quantities combine: every producing path
/// (transcript-direct, AI-assisted, live-cart merge) goes through it, so
/// the same name+modifier combination can never appear twice.
pub fn add_item(
    items: &mut Vec<OrderLineItem>,
    name: &str,
    quantity: u32,
    unit_price: Decimal,
    modifiers: Vec<String>,
) {
    let quantity = quantity.max(1);
    if let Some(existing) = items
        .iter_mut()
        .find(|item| item.same_identity(name, &modifiers))
    {
        existing.quantity += quantity;
        existing.line_total = existing.unit_price * Decimal::from(existing.quantity);
    } else {
        items.push(OrderLineItem::new(name, quantity, unit_price, modifiers));
    }
}

/// Builds the modifier list for one line in its fixed sequence: the spice
/// modifier (explicit, or the mild default when the item requires one),
/// then any freeform note.
pub(crate) fn line_modifiers(
    spice: Option<SpiceLevel>,
    notes: Option<&str>,
    requires_spice: bool,
) -> Vec<String> {
    let mut modifiers = Vec::new();
    match spice {
        Some(level) => modifiers.push(level.modifier()),
        None if requires_spice => modifiers.push(SpiceLevel::Mild.modifier()),
        None => {}
    }
    if let Some(notes) = notes {
        let notes = notes.trim();
        if !notes.is_empty() {
            modifiers.push(notes.to_string());
        }
    }
    modifiers
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes `(subtotal, tax, total)` from an item list and tax rate.
///
/// Accumulation is exact decimal arithmetic; rounding to two places
/// happens only here, at output time. Pure function of its inputs.
pub fn compute_totals(items: &[OrderLineItem], tax_rate: Decimal) -> (Decimal, Decimal, Decimal) {
    let subtotal: Decimal = items.iter().map(|item| item.line_total).sum();
    let tax = subtotal * tax_rate;
    let total = subtotal + tax;
    (round_money(subtotal), round_money(tax), round_money(total))
}

/// Assembles a full order from parsed candidates, contact details, the
/// optional call summary, and an optional live-cart snapshot.
///
/// With a snapshot present, its lines are the authoritative base and
/// candidates only contribute spice levels and notes (see
/// [`reconcile::merge_cart`]). Without one, candidates are priced from the
/// catalog directly. Returns `None` when no line items result.
pub fn assemble(
    candidates: &[CandidateItem],
    contact: Contact,
    summary: Option<&str>,
    live_cart: Option<LiveCartSnapshot>,
    catalog: &MenuCatalog,
) -> Option<Order> {
    let items = match live_cart {
        Some(cart) => reconcile::merge_cart(cart, candidates, catalog),
        None => {
            let mut items = Vec::new();
            for candidate in candidates {
                let Some(unit_price) = catalog.price(&candidate.name) else {
                    tracing::warn!(name = %candidate.name, "candidate lost its catalog entry, skipped");
                    continue;
                };
                let modifiers = line_modifiers(
                    candidate.spice,
                    candidate.notes.as_deref(),
                    catalog.requires_spice(&candidate.name),
                );
                add_item(
                    &mut items,
                    &candidate.name,
                    candidate.quantity,
                    unit_price,
                    modifiers,
                );
            }
            items
        }
    };

    if items.is_empty() {
        return None;
    }

    let (pickup_time, order_type) = infer_fulfillment(summary);
    let (subtotal, tax, total) = compute_totals(&items, catalog.tax_rate());

    Some(Order {
        customer_name: contact.name,
        phone: contact.phone,
        address: contact.address,
        items,
        pickup_time,
        order_type,
        subtotal,
        tax,
        total,
    })
}
