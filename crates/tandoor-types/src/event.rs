//! Inbound webhook event shapes.
//!
//! Both events tolerate structurally broken payloads: a list field that is
//! not a JSON array deserializes to an empty list, and individual entries
//! that fail to parse are skipped. The core then reports "no items" /
//! `NoOrder` instead of the HTTP layer rejecting the event outright.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::TranscriptTurn;

/// Deserializes a JSON array leniently: non-array values become an empty
/// list and unparseable entries are dropped.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(entries) => Ok(entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// "Call completed" event delivered by the voice-agent platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallCompletionEvent {
    pub call_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub transcript: Vec<TranscriptTurn>,
    /// Optional AI-produced call summary; used for pickup-time and
    /// order-type inference.
    #[serde(default)]
    pub summary: Option<String>,
}

/// One unpriced line of a live-cart update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartUpdateLine {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Mid-call running-cart update. Names are raw speech text; the core
/// resolves them against the catalog before storing a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveCartUpdateEvent {
    pub call_id: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub items: Vec<CartUpdateLine>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn completion_event_parses_normal_payload() {
        let event: CallCompletionEvent = serde_json::from_str(
            r#"{
                "call_id": "abc",
                "status": "done",
                "transcript": [
                    {"role": "agent", "message": "hello"},
                    {"role": "user", "message": "hi"}
                ],
                "summary": "pickup in 20 minutes"
            }"#,
        )
        .unwrap();
        assert_eq!(event.call_id, "abc");
        assert_eq!(event.transcript.len(), 2);
        assert_eq!(event.transcript[0].role, Role::Agent);
        assert_eq!(event.summary.as_deref(), Some("pickup in 20 minutes"));
    }

    #[test]
    fn completion_event_tolerates_non_array_transcript() {
        let event: CallCompletionEvent =
            serde_json::from_str(r#"{"call_id": "abc", "transcript": "oops"}"#).unwrap();
        assert!(event.transcript.is_empty());
    }

    #[test]
    fn completion_event_skips_broken_turns() {
        let event: CallCompletionEvent = serde_json::from_str(
            r#"{
                "call_id": "abc",
                "transcript": [
                    {"role": "user", "message": "hi"},
                    42,
                    {"message": "no role"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(event.transcript.len(), 1);
    }

    #[test]
    fn cart_event_tolerates_missing_items() {
        let event: LiveCartUpdateEvent = serde_json::from_str(r#"{"call_id": "abc"}"#).unwrap();
        assert!(event.items.is_empty());

        let event: LiveCartUpdateEvent =
            serde_json::from_str(r#"{"call_id": "abc", "items": {"name": "x"}}"#).unwrap();
        assert!(event.items.is_empty());
    }

    #[test]
    fn cart_line_defaults_quantity_to_one() {
        let event: LiveCartUpdateEvent = serde_json::from_str(
            r#"{"call_id": "abc", "items": [{"name": "butter chicken"}]}"#,
        )
        .unwrap();
        assert_eq!(event.items[0].quantity, 1);
    }
}
