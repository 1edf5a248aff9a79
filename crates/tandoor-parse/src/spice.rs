//! Spice-level extraction from item segments.

use once_cell::sync::Lazy;
use regex::Regex;
use tandoor_menu::normalize;
use tandoor_types::SpiceLevel;

/// Spoken spice vocabulary, longest phrases first so "very mild" and
/// "extra spicy" win over their single-word substrings.
static SPICE_FIND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(very\s+mild|extra\s+spicy|very\s+hot|mild|medium|spicy|hot)\b")
        .expect("valid regex")
});

/// Finds the first spice-level phrase in a segment.
///
/// Matching is case-insensitive and only the first match counts. A "hot"
/// that is part of "hot & sour" / "hot and sour" is not a spice token.
pub fn extract_spice(text: &str) -> Option<SpiceLevel> {
    let lowered = text.to_lowercase();
    let shielded = normalize::shield_hot_and_sour(&lowered);
    let matched = SPICE_FIND_RE.find(&shielded)?;
    // Collapse inner whitespace ("very   hot" -> "very hot").
    let phrase = matched
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    SpiceLevel::from_phrase(&phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_levels_anywhere_in_segment() {
        assert_eq!(
            extract_spice("two chicken biryanis both with mild"),
            Some(SpiceLevel::Mild)
        );
        assert_eq!(
            extract_spice("butter chicken with Spicy"),
            Some(SpiceLevel::Spicy)
        );
        assert_eq!(extract_spice("samosa"), None);
    }

    #[test]
    fn applies_normalization_table() {
        assert_eq!(extract_spice("curry medium please"), Some(SpiceLevel::Mild));
        assert_eq!(extract_spice("make it hot"), Some(SpiceLevel::Spicy));
        assert_eq!(
            extract_spice("goat biryani very hot"),
            Some(SpiceLevel::ExtraSpicy)
        );
        assert_eq!(
            extract_spice("shrimp fry extra spicy"),
            Some(SpiceLevel::ExtraSpicy)
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            extract_spice("mild curry but spicy naan"),
            Some(SpiceLevel::Mild)
        );
    }

    #[test]
    fn hot_and_sour_is_not_a_spice_token() {
        assert_eq!(extract_spice("one hot & sour soup"), None);
        assert_eq!(extract_spice("one hot and sour soup"), None);
        // An actual spice phrase elsewhere still counts.
        assert_eq!(
            extract_spice("hot and sour soup, extra spicy"),
            Some(SpiceLevel::ExtraSpicy)
        );
    }
}
