//! Inbound webhook handlers: call completion and live-cart updates.

use std::sync::Arc;

use axum::{extract::Extension, response::Json};
use chrono::Utc;
use serde_json::{json, Value};

use tandoor_cart::build_snapshot;
use tandoor_order::{process_call, CallOutcome};
use tandoor_types::{CallCompletionEvent, LiveCartUpdateEvent, Role};

use crate::AppState;

/// POST /webhooks/post-call
///
/// Consumes a call-completion event and runs the extraction pipeline.
/// Always answers 200 with a JSON outcome summary; a transcript that
/// yields no order is a normal outcome, not an HTTP error.
pub async fn post_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(event): Json<CallCompletionEvent>,
) -> Json<Value> {
    let now = Utc::now();
    tracing::info!(
        call_id = %event.call_id,
        status = %event.status,
        turns = event.transcript.len(),
        "call completion received"
    );
    for turn in &event.transcript {
        let speaker = match turn.role {
            Role::Agent => "agent",
            Role::User => "customer",
            Role::Other => continue,
        };
        tracing::debug!(speaker, message = %turn.message, "transcript turn");
    }

    if !state.processed.first_time(&event.call_id, now) {
        tracing::info!(call_id = %event.call_id, "duplicate completion event ignored");
        return Json(json!({
            "status": "duplicate",
            "call_id": event.call_id,
        }));
    }

    let outcome = process_call(
        &event,
        &state.catalog,
        state.ai_parser.as_deref(),
        &state.carts,
        now,
    )
    .await;

    match outcome {
        CallOutcome::Order(parsed) => {
            if !parsed.customer_confirmed {
                tracing::warn!(call_id = %event.call_id, "forwarding low-confidence order");
            }
            if let Some(pos) = &state.pos {
                pos.submit(&parsed.order).await;
            }

            let response = json!({
                "status": "ok",
                "call_id": event.call_id,
                "outcome": "order",
                "items": parsed.order.items.len(),
                "total": parsed.order.total,
                "customer_confirmed": parsed.customer_confirmed,
            });
            *state
                .latest_order
                .write()
                .expect("latest-order lock poisoned") = Some(parsed.order);
            Json(response)
        }
        CallOutcome::NoOrder(reason) => {
            tracing::info!(call_id = %event.call_id, reason = reason.as_str(), "call produced no order");
            Json(json!({
                "status": "ok",
                "call_id": event.call_id,
                "outcome": "no_order",
                "reason": reason.as_str(),
            }))
        }
    }
}

/// POST /webhooks/live-cart
///
/// Resolves the update against the catalog and stores the priced snapshot
/// for the call, overwriting any earlier one.
pub async fn live_cart_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(event): Json<LiveCartUpdateEvent>,
) -> Json<Value> {
    let now = Utc::now();
    let snapshot = build_snapshot(&event, &state.catalog, now);
    let lines = snapshot.items.len();
    tracing::info!(call_id = %event.call_id, lines, "live cart updated");
    state.carts.put(snapshot);

    Json(json!({
        "status": "ok",
        "call_id": event.call_id,
        "lines": lines,
    }))
}
