//! Pickup-time and order-type inference from an optional call summary.

use once_cell::sync::Lazy;
use regex::Regex;

use tandoor_types::{OrderType, DEFAULT_PICKUP_TIME};

/// A relative duration like "20 minutes", "1 hr", "45 min".
static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*(minutes?|mins?|hours?|hrs?)\b").expect("valid regex"));

/// Infers pickup time and order type from free summary text.
///
/// A `<n> minute/hour` phrase becomes a normalized `"<n> minute(s)"` /
/// `"<n> hour(s)"` pickup time; any mention of delivery flips the order
/// type. Defaults are `"ASAP"` and pickup.
pub fn infer_fulfillment(summary: Option<&str>) -> (String, OrderType) {
    let Some(summary) = summary else {
        return (DEFAULT_PICKUP_TIME.to_string(), OrderType::Pickup);
    };
    let lowered = summary.to_lowercase();

    let pickup_time = match DURATION_RE.captures(&lowered) {
        Some(caps) => {
            let count: u64 = caps
                .get(1)
                .expect("count capture")
                .as_str()
                .parse()
                .unwrap_or(0);
            let unit = if caps.get(2).expect("unit capture").as_str().starts_with('h') {
                "hour"
            } else {
                "minute"
            };
            if count == 1 {
                format!("{count} {unit}")
            } else {
                format!("{count} {unit}s")
            }
        }
        None => DEFAULT_PICKUP_TIME.to_string(),
    };

    let order_type = if lowered.contains("deliver") {
        OrderType::Delivery
    } else {
        OrderType::Pickup
    };

    (pickup_time, order_type)
}
