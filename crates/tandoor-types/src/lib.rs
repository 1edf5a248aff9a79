//! Shared types and constants for the Tandoor order extraction platform.
//!
//! This crate provides the foundational types used across all Tandoor crates:
//! transcript turns, order line items, assembled orders, live-cart snapshots,
//! and the inbound webhook event shapes.
//!
//! No crate in the workspace depends on anything *except* `tandoor-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod event;

pub use event::{CallCompletionEvent, CartUpdateLine, LiveCartUpdateEvent};

/// Sentinel for contact fields that could not be recovered from a call.
pub const NOT_AVAILABLE: &str = "N/A";

/// Default pickup time when the call gives no explicit timing.
pub const DEFAULT_PICKUP_TIME: &str = "ASAP";

/// Speaker role for a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The voice agent.
    Agent,
    /// The customer.
    User,
    /// Any other speaker label; ignored by the parsers.
    #[serde(other)]
    Other,
}

/// A single turn of a call transcript.
///
/// `message` tolerates absent or null payload fields by defaulting to the
/// empty string; consumers must not assume it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Role,
    #[serde(default)]
    pub message: String,
}

impl TranscriptTurn {
    pub fn new(role: Role, message: impl Into<String>) -> Self {
        Self {
            role,
            message: message.into(),
        }
    }
}

/// Spice level attached to spice-required menu items.
///
/// The wire/spoken vocabulary is wider than the four canonical levels;
/// [`SpiceLevel::from_phrase`] folds the synonyms down: "medium" is mild,
/// "hot" is spicy, "very hot" is extra spicy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpiceLevel {
    #[serde(rename = "very mild")]
    VeryMild,
    #[serde(rename = "mild")]
    Mild,
    #[serde(rename = "spicy")]
    Spicy,
    #[serde(rename = "extra spicy")]
    ExtraSpicy,
}

impl SpiceLevel {
    /// Canonical lowercase label, as used in `spice: <level>` modifiers.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryMild => "very mild",
            Self::Mild => "mild",
            Self::Spicy => "spicy",
            Self::ExtraSpicy => "extra spicy",
        }
    }

    /// Parses a spoken spice phrase, applying the normalization table.
    ///
    /// Returns `None` for phrases outside the recognized vocabulary.
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        match phrase.trim().to_lowercase().as_str() {
            "very mild" => Some(Self::VeryMild),
            "mild" | "medium" => Some(Self::Mild),
            "spicy" | "hot" => Some(Self::Spicy),
            "extra spicy" | "very hot" => Some(Self::ExtraSpicy),
            _ => None,
        }
    }

    /// The `spice: <level>` modifier string for this level.
    pub fn modifier(self) -> String {
        format!("spice: {}", self.as_str())
    }
}

/// How the order leaves the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Pickup,
    Delivery,
}

/// A priced line of an assembled order.
///
/// Identity for deduplication is the canonical `name` plus the exact
/// `modifiers` list, order included; two lines with the same name but
/// different modifiers stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Canonical menu name.
    pub name: String,
    /// Always >= 1.
    pub quantity: u32,
    /// Unit price captured from the catalog at parse time.
    pub unit_price: Decimal,
    /// `unit_price * quantity`; recomputed whenever quantity changes.
    pub line_total: Decimal,
    /// Ordered free-text modifiers (`spice: mild`, freeform notes).
    pub modifiers: Vec<String>,
}

impl OrderLineItem {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
        modifiers: Vec<String>,
    ) -> Self {
        let quantity = quantity.max(1);
        Self {
            name: name.into(),
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
            modifiers,
        }
    }

    /// True when `name` + `modifiers` match this line exactly.
    pub fn same_identity(&self, name: &str, modifiers: &[String]) -> bool {
        self.name == name && self.modifiers == modifiers
    }
}

/// Customer identity recovered from a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
            address: NOT_AVAILABLE.to_string(),
        }
    }
}

/// A fully assembled order, ready for downstream submission.
///
/// Constructed fresh per call and never mutated after assembly. Totals are
/// derived from `items` and the catalog tax rate, rounded to two decimal
/// places at output time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    /// Insertion order = first-seen order during assembly.
    pub items: Vec<OrderLineItem>,
    pub pickup_time: String,
    pub order_type: OrderType,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// A candidate line parsed from the final confirmation text (directly or via
/// the AI-assisted collaborator), before pricing and assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub quantity: u32,
    /// Canonical menu name; candidates that fail to resolve never get here.
    pub name: String,
    pub spice: Option<SpiceLevel>,
    pub notes: Option<String>,
}

/// A priced line inside a live-cart snapshot. No modifiers yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// The most recent live running cart captured for one call.
///
/// At most one snapshot is retained per call (most-recent overwrites), and a
/// snapshot is only valid within a fixed retention window of `captured_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveCartSnapshot {
    pub call_id: String,
    pub items: Vec<CartLine>,
    pub captured_at: DateTime<Utc>,
}
