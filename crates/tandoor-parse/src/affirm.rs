//! Affirmative-response detection for confirmation adjacency checks.

/// Phrases that count as the customer agreeing with a confirmation.
const AFFIRMATIVE_PHRASES: &[&str] = &[
    "yes",
    "correct",
    "right",
    "confirm",
    "confirmed",
    "that's right",
    "yeah",
];

/// Whether a customer turn reads as an affirmative response.
///
/// Case-insensitive substring match; "yes that's right" and "yeah, correct"
/// both count, "actually wait" does not.
pub fn is_affirmative(message: &str) -> bool {
    let lowered = message.to_lowercase();
    AFFIRMATIVE_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
