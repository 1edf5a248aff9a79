//! The per-call extraction pipeline.
//!
//! One completion event flows through a single pass: locate the final
//! confirmation, parse candidates (directly, or via the AI collaborator
//! when direct parsing comes up empty), recover contact details, merge a
//! live cart when one exists, and assemble the order. Every recognized
//! failure resolves to a defined outcome; nothing here can crash the host.

use chrono::{DateTime, Utc};

use tandoor_ai::{AiLineItem, OrderTextParser};
use tandoor_cart::CartStore;
use tandoor_menu::MenuCatalog;
use tandoor_parse::{extract_contact, find_final_order, parse_candidates};
use tandoor_types::{CallCompletionEvent, CandidateItem, Order, SpiceLevel};

use crate::assemble::assemble;

/// Why a call produced no order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOrderReason {
    /// Transcript missing or empty (malformed payloads land here too).
    EmptyTranscript,
    /// No final-order anchor phrase anywhere in the conversation.
    MissingConfirmation,
    /// An anchor was found but nothing resolved to a menu item.
    NoItems,
}

impl NoOrderReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyTranscript => "empty_transcript",
            Self::MissingConfirmation => "missing_confirmation",
            Self::NoItems => "no_items",
        }
    }
}

/// A successfully extracted order plus its confidence signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOrder {
    pub order: Order,
    /// False when the customer never affirmed the final confirmation;
    /// the order is best-effort and flagged low-confidence downstream.
    pub customer_confirmed: bool,
}

/// Defined result of processing one completion event.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Order(ParsedOrder),
    NoOrder(NoOrderReason),
}

/// Canonicalizes AI collaborator output into candidates.
///
/// Item names go through the same catalog resolution as direct segments;
/// names that resolve to nothing are logged and dropped, never inserted as
/// unknown lines. Unrecognized spice strings fall back to the
/// default-level rule at assembly.
fn canonicalize_ai_items(lines: &[AiLineItem], catalog: &MenuCatalog) -> Vec<CandidateItem> {
    let mut candidates = Vec::new();
    for line in lines {
        let Some(name) = catalog.resolve(&line.item) else {
            tracing::warn!(item = %line.item, "ai-suggested item did not resolve, dropped");
            continue;
        };
        candidates.push(CandidateItem {
            quantity: line.quantity.max(1),
            name: name.to_string(),
            spice: line.spice_level.as_deref().and_then(SpiceLevel::from_phrase),
            notes: line.notes.clone().filter(|notes| !notes.trim().is_empty()),
        });
    }
    candidates
}

/// Runs the full extraction pipeline for one completion event.
///
/// `parser` is the optional AI collaborator; `now` anchors the live-cart
/// retention check. The matching live-cart snapshot, when present and
/// fresh, is consumed by this call.
pub async fn process_call(
    event: &CallCompletionEvent,
    catalog: &MenuCatalog,
    parser: Option<&dyn OrderTextParser>,
    carts: &CartStore,
    now: DateTime<Utc>,
) -> CallOutcome {
    if event.transcript.is_empty() {
        tracing::warn!(call_id = %event.call_id, "completion event carried no transcript");
        return CallOutcome::NoOrder(NoOrderReason::EmptyTranscript);
    }

    let Some(final_order) = find_final_order(&event.transcript) else {
        tracing::info!(call_id = %event.call_id, "no final order confirmation in transcript");
        return CallOutcome::NoOrder(NoOrderReason::MissingConfirmation);
    };
    if !final_order.customer_confirmed {
        tracing::warn!(
            call_id = %event.call_id,
            "customer never affirmed the final order, proceeding best-effort"
        );
    }

    let mut candidates = parse_candidates(&final_order.order_text, catalog);
    if candidates.is_empty() {
        if let Some(parser) = parser {
            tracing::info!(call_id = %event.call_id, "direct parse found nothing, asking ai collaborator");
            if let Some(lines) = parser.parse_order_text(&final_order.order_text).await {
                candidates = canonicalize_ai_items(&lines, catalog);
            }
        }
    }

    let contact = extract_contact(&event.transcript);
    let live_cart = carts.take(&event.call_id, now);
    if let Some(cart) = &live_cart {
        tracing::info!(
            call_id = %event.call_id,
            cart_lines = cart.items.len(),
            "merging live cart with transcript candidates"
        );
    }

    match assemble(
        &candidates,
        contact,
        event.summary.as_deref(),
        live_cart,
        catalog,
    ) {
        Some(order) => CallOutcome::Order(ParsedOrder {
            order,
            customer_confirmed: final_order.customer_confirmed,
        }),
        None => CallOutcome::NoOrder(NoOrderReason::NoItems),
    }
}
