//! Free-text extraction over call transcripts.
//!
//! The parsers are staged pure functions chained by the segmenter: quantity
//! extraction, spice extraction, and lexical normalization each operate on
//! plain strings, in that fixed order. Nothing here touches the network or
//! the clock, so every stage is testable in isolation.

pub mod affirm;
pub mod contact;
pub mod quantity;
pub mod segment;
pub mod spice;
pub mod summary;

pub use contact::extract_contact;
pub use quantity::extract_quantity;
pub use segment::{find_final_order, parse_candidates, split_segments, FinalOrder};
pub use spice::extract_spice;
pub use summary::infer_fulfillment;
