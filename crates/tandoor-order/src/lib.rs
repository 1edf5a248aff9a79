//! Order assembly: merging parsed candidates, live carts, and contact
//! details into a priced order, and the per-call extraction pipeline.

pub mod assemble;
pub mod pipeline;
pub mod reconcile;

pub use assemble::{add_item, assemble, compute_totals};
pub use pipeline::{process_call, CallOutcome, NoOrderReason, ParsedOrder};
