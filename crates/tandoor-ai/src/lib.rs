//! AI-assisted order text parsing.
//!
//! An external language model is an optional collaborator that turns the
//! captured confirmation text into a structured candidate list. It is
//! treated as unreliable by contract: every failure mode (missing
//! credentials, network error, non-2xx, malformed output, timeout)
//! degrades to "unavailable" and the pipeline parses without it. Its
//! output always flows through the same catalog canonicalization as the
//! direct path, so it can never insert unknown line items.

pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;

pub use openai::{AiConfig, OpenAiParser};

/// One structured line returned by the collaborator, before catalog
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AiLineItem {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub item: String,
    #[serde(default, alias = "spiceLevel")]
    pub spice_level: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// The pluggable order-text parsing collaborator.
///
/// `None` means unavailable; callers must produce a usable order without
/// it, relying on direct segmentation alone.
#[async_trait]
pub trait OrderTextParser: Send + Sync {
    async fn parse_order_text(&self, order_text: &str) -> Option<Vec<AiLineItem>>;
}
