//! Locating and segmenting the final order confirmation in a transcript.
//!
//! The agent's closing confirmation ("your final order is: … is that
//! correct?") is the authoritative statement of the order. When the
//! conversation contains several confirmation utterances, the one with the
//! greatest start offset wins: an evolving call supersedes earlier
//! tentative confirmations.

use once_cell::sync::Lazy;
use regex::Regex;

use tandoor_menu::{normalize, MenuCatalog};
use tandoor_types::{CandidateItem, Role, TranscriptTurn};

use crate::affirm::is_affirmative;
use crate::quantity::extract_quantity;
use crate::spice::extract_spice;

/// Anchor patterns for the final order confirmation. Each requires the
/// closing phrase "is that correct" and captures the order text.
static ANCHOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)got it!?\s*your final order is:?\s*(.+?)[.,]?\s*is that correct",
        r"(?i)your final order is:?\s*(.+?)[.,]?\s*is that correct",
        r"(?i)here'?s your order:?\s*(.+?)[.,]?\s*is that correct",
        r"(?i)to confirm:\s*(.+?)[.,]?\s*is that correct",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Segment separators: commas, semicolons, and the standalone word "and".
static SEGMENT_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",|;|\band\b").expect("valid regex"));

/// The authoritative final order statement found in a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalOrder {
    /// Captured order text, lowercased, single trailing period stripped.
    pub order_text: String,
    /// Index of the agent turn containing the confirmation.
    pub turn_index: usize,
    /// Whether the immediately following customer turn was affirmative.
    /// Advisory: parsing proceeds either way, unconfirmed results are
    /// low-confidence.
    pub customer_confirmed: bool,
}

/// Finds the final order confirmation in a transcript.
///
/// Searches the whole lowercased conversation for the anchor patterns and
/// selects the match with the greatest start offset (the LAST confirmation
/// wins). Returns `None` when no anchor is present, or when the matched
/// text cannot be located back in an agent turn.
pub fn find_final_order(transcript: &[TranscriptTurn]) -> Option<FinalOrder> {
    let conversation = transcript
        .iter()
        .map(|turn| turn.message.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    let mut best: Option<(usize, String)> = None;
    for pattern in ANCHOR_PATTERNS.iter() {
        for caps in pattern.captures_iter(&conversation) {
            let start = caps.get(0).expect("whole match").start();
            let text = caps.get(1).expect("order capture").as_str();
            if best.as_ref().map_or(true, |(offset, _)| start > *offset) {
                best = Some((start, text.to_string()));
            }
        }
    }
    let (_, captured) = best?;

    let mut order_text = captured.trim().to_string();
    if order_text.ends_with('.') {
        order_text.pop();
    }

    // Anchor the adjacency check at the agent turn that spoke this text.
    // When identical confirmations repeat, the last one is authoritative.
    let turn_index = transcript
        .iter()
        .enumerate()
        .filter(|(_, turn)| {
            turn.role == Role::Agent && turn.message.to_lowercase().contains(&order_text)
        })
        .map(|(index, _)| index)
        .last();
    let Some(turn_index) = turn_index else {
        tracing::warn!("final order text not found in any agent turn");
        return None;
    };

    let customer_confirmed = transcript
        .get(turn_index + 1)
        .is_some_and(|turn| turn.role == Role::User && is_affirmative(&turn.message));

    Some(FinalOrder {
        order_text,
        turn_index,
        customer_confirmed,
    })
}

/// Splits captured order text into candidate item segments.
///
/// Splits on commas, semicolons, and the word "and"; "hot and sour" is
/// shielded first so the soup name never splits. Segments of two characters
/// or fewer (after trimming a leading "and") are discarded.
pub fn split_segments(order_text: &str) -> Vec<String> {
    let shielded = normalize::shield_hot_and_sour(&order_text.to_lowercase());
    SEGMENT_SPLIT_RE
        .split(&shielded)
        .map(|piece| {
            let piece = piece.trim();
            let piece = piece.strip_prefix("and ").map(str::trim).unwrap_or(piece);
            normalize::unshield_hot_and_sour(piece)
        })
        .filter(|piece| piece.len() > 2)
        .collect()
}

/// Parses captured order text into candidate items against the catalog.
///
/// Per segment: quantity first, then spice level, then lexical resolution
/// of the remainder. Segments that resolve to nothing are logged (with a
/// nearest-neighbor suggestion when one exists) and dropped; a bad segment
/// never fails the whole parse.
pub fn parse_candidates(order_text: &str, catalog: &MenuCatalog) -> Vec<CandidateItem> {
    let mut candidates = Vec::new();
    for segment in split_segments(order_text) {
        let (quantity, remainder) = extract_quantity(&segment);
        let spice = extract_spice(&segment);
        match catalog.resolve(&remainder) {
            Some(name) => candidates.push(CandidateItem {
                quantity,
                name: name.to_string(),
                spice,
                notes: None,
            }),
            None => match catalog.suggest(&remainder) {
                Some(suggestion) => tracing::warn!(
                    segment = %segment,
                    suggestion = %suggestion,
                    "unresolved item segment dropped"
                ),
                None => tracing::warn!(segment = %segment, "unresolved item segment dropped"),
            },
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandoor_types::SpiceLevel;

    fn agent(message: &str) -> TranscriptTurn {
        TranscriptTurn::new(Role::Agent, message)
    }

    fn user(message: &str) -> TranscriptTurn {
        TranscriptTurn::new(Role::User, message)
    }

    #[test]
    fn finds_confirmed_final_order() {
        let transcript = vec![
            agent("Welcome to Tandoor, what can I get you?"),
            user("Two chicken biryanis please"),
            agent("Your final order is: two chicken biryanis both with mild. Is that correct?"),
            user("Yes that's right"),
        ];
        let found = find_final_order(&transcript).expect("anchor present");
        assert_eq!(found.order_text, "two chicken biryanis both with mild");
        assert_eq!(found.turn_index, 2);
        assert!(found.customer_confirmed);
    }

    #[test]
    fn last_confirmation_supersedes_earlier_ones() {
        let transcript = vec![
            agent("Your final order is: one samosa. Is that correct?"),
            user("no wait, add a lassi"),
            agent("Got it! Your final order is: one samosa and one mango lassi. Is that correct?"),
            user("yes"),
        ];
        let found = find_final_order(&transcript).expect("anchor present");
        assert_eq!(found.order_text, "one samosa and one mango lassi");
        assert_eq!(found.turn_index, 2);
        assert!(found.customer_confirmed);
    }

    #[test]
    fn alternate_anchor_phrasings_are_recognized() {
        for lead in [
            "Here's your order: one garlic naan. Is that correct?",
            "To confirm: one garlic naan. Is that correct?",
        ] {
            let transcript = vec![agent(lead), user("correct")];
            let found = find_final_order(&transcript).expect("anchor present");
            assert_eq!(found.order_text, "one garlic naan", "lead: {lead}");
            assert!(found.customer_confirmed);
        }
    }

    #[test]
    fn non_affirmative_followup_flags_unconfirmed() {
        let transcript = vec![
            agent("Your final order is: one samosa. Is that correct?"),
            user("actually wait"),
        ];
        let found = find_final_order(&transcript).expect("anchor present");
        assert!(!found.customer_confirmed);
    }

    #[test]
    fn missing_followup_flags_unconfirmed() {
        let transcript = vec![agent("Your final order is: one samosa. Is that correct?")];
        let found = find_final_order(&transcript).expect("anchor present");
        assert!(!found.customer_confirmed);
    }

    #[test]
    fn no_anchor_means_no_order() {
        let transcript = vec![
            agent("What can I get you?"),
            user("one samosa"),
            agent("Anything else?"),
        ];
        assert_eq!(find_final_order(&transcript), None);
        assert_eq!(find_final_order(&[]), None);
    }

    #[test]
    fn splits_on_commas_semicolons_and_the_word_and() {
        let segments =
            split_segments("one butter chicken, two samosas; one garlic naan and one mango lassi");
        assert_eq!(
            segments,
            vec![
                "one butter chicken",
                "two samosas",
                "one garlic naan",
                "one mango lassi"
            ]
        );
    }

    #[test]
    fn hot_and_sour_survives_segment_splitting() {
        let segments = split_segments("one hot and sour soup and one samosa");
        assert_eq!(segments, vec!["one hot & sour soup", "one samosa"]);
    }

    #[test]
    fn short_fragments_are_discarded() {
        let segments = split_segments("one samosa, ok, a");
        assert_eq!(segments, vec!["one samosa"]);
    }

    #[test]
    fn parses_candidates_with_quantity_and_spice() {
        let catalog = MenuCatalog::load(None).expect("default menu");
        let candidates = parse_candidates("two chicken biryanis both with mild", &catalog);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].quantity, 2);
        assert_eq!(candidates[0].name, "chicken dum biryani");
        assert_eq!(candidates[0].spice, Some(SpiceLevel::Mild));
    }

    #[test]
    fn unresolved_segments_are_dropped_not_fatal() {
        let catalog = MenuCatalog::load(None).expect("default menu");
        let candidates =
            parse_candidates("one flying saucer curry and one mango lassi", &catalog);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "mango lassi");
    }
}
