//! Live-cart snapshot construction and the shared per-call stores.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use tandoor_menu::MenuCatalog;
use tandoor_types::{CartLine, LiveCartSnapshot, LiveCartUpdateEvent};

use crate::store::BoundedTtlMap;

/// Default number of calls with a retained live cart.
pub const DEFAULT_CART_CAPACITY: usize = 256;

/// Default validity window for a snapshot, relative to `captured_at`.
pub const DEFAULT_CART_RETENTION_MINUTES: i64 = 60;

/// Default bookkeeping window for duplicate call-completion events.
const PROCESSED_CALL_CAPACITY: usize = 1024;
const PROCESSED_CALL_RETENTION_HOURS: i64 = 24;

/// Resolves a live-cart update against the catalog into a priced snapshot.
///
/// Raw names go through the same lexical resolution as transcript
/// segments; unresolved lines are logged and skipped, repeated mentions of
/// the same item merge by summing quantity. An event with no resolvable
/// lines yields a snapshot with an empty item list (callers store nothing).
pub fn build_snapshot(
    event: &LiveCartUpdateEvent,
    catalog: &MenuCatalog,
    now: DateTime<Utc>,
) -> LiveCartSnapshot {
    let mut items: Vec<CartLine> = Vec::new();
    for line in &event.items {
        let Some((name, unit_price)) = catalog.resolve_priced(&line.name) else {
            match catalog.suggest(&line.name) {
                Some(suggestion) => tracing::warn!(
                    call_id = %event.call_id,
                    name = %line.name,
                    suggestion = %suggestion,
                    "live-cart line did not resolve, skipped"
                ),
                None => tracing::warn!(
                    call_id = %event.call_id,
                    name = %line.name,
                    "live-cart line did not resolve, skipped"
                ),
            }
            continue;
        };
        let quantity = line.quantity.max(1);

        if let Some(existing) = items.iter_mut().find(|item| item.name == name) {
            existing.quantity += quantity;
            existing.line_total = existing.unit_price * Decimal::from(existing.quantity);
        } else {
            items.push(CartLine {
                name: name.to_string(),
                quantity,
                unit_price,
                line_total: unit_price * Decimal::from(quantity),
            });
        }
    }

    LiveCartSnapshot {
        call_id: event.call_id.clone(),
        items,
        captured_at: now,
    }
}

/// Shared store of the most recent live cart per call.
///
/// Last-write-wins per call ID; a completion event consumes the snapshot.
pub struct CartStore {
    inner: RwLock<BoundedTtlMap<LiveCartSnapshot>>,
}

impl CartStore {
    pub fn new(capacity: usize, retention: Duration) -> Self {
        Self {
            inner: RwLock::new(BoundedTtlMap::new(capacity, retention)),
        }
    }

    /// Stores a snapshot, overwriting any earlier one for the same call.
    /// Snapshots with no items are not stored.
    pub fn put(&self, snapshot: LiveCartSnapshot) {
        if snapshot.items.is_empty() {
            tracing::debug!(call_id = %snapshot.call_id, "empty live-cart snapshot not stored");
            return;
        }
        let captured_at = snapshot.captured_at;
        self.inner
            .write()
            .expect("cart store lock poisoned")
            .insert(snapshot.call_id.clone(), snapshot, captured_at);
    }

    /// Removes and returns the snapshot for a call, if one exists within
    /// its retention window.
    pub fn take(&self, call_id: &str, now: DateTime<Utc>) -> Option<LiveCartSnapshot> {
        self.inner
            .write()
            .expect("cart store lock poisoned")
            .remove(call_id, now)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(
            DEFAULT_CART_CAPACITY,
            Duration::minutes(DEFAULT_CART_RETENTION_MINUTES),
        )
    }
}

/// Duplicate call-ID bookkeeping for completion events.
pub struct ProcessedCalls {
    inner: RwLock<BoundedTtlMap<()>>,
}

impl ProcessedCalls {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BoundedTtlMap::new(
                PROCESSED_CALL_CAPACITY,
                Duration::hours(PROCESSED_CALL_RETENTION_HOURS),
            )),
        }
    }

    /// Marks a call as processed. Returns `true` the first time a call ID
    /// is seen within the bookkeeping window.
    pub fn first_time(&self, call_id: &str, now: DateTime<Utc>) -> bool {
        let mut inner = self.inner.write().expect("processed-calls lock poisoned");
        if inner.get(call_id, now).is_some() {
            return false;
        }
        inner.insert(call_id, (), now);
        true
    }
}

impl Default for ProcessedCalls {
    fn default() -> Self {
        Self::new()
    }
}
