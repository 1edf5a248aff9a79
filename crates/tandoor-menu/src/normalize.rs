//! Lexical cleanup of spoken item phrases.
//!
//! The cleanup stages run in a fixed order: leading quantifier phrases,
//! then spice-level phrases, then stray articles, then whitespace collapse.
//! "hot & sour" / "hot and sour" is shielded before spice stripping so the
//! soup name survives the removal of "hot".

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder that shields "hot & sour" from the spice-word pass.
const HOT_SOUR_SENTINEL: &str = "hotsourshield";

static HOT_SOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"hot\s*(?:&|and)\s*sour").expect("valid regex"));

/// Replaces "hot & sour" / "hot and sour" with a sentinel token so that
/// spice-word removal and "and"-splitting cannot mangle the soup name.
/// Reversed by [`unshield_hot_and_sour`].
pub fn shield_hot_and_sour(text: &str) -> String {
    HOT_SOUR_RE.replace_all(text, HOT_SOUR_SENTINEL).into_owned()
}

/// Restores the sentinel from [`shield_hot_and_sour`] to "hot & sour".
pub fn unshield_hot_and_sour(text: &str) -> String {
    text.replace(HOT_SOUR_SENTINEL, "hot & sour")
}

/// Leading quantifier phrases: "order of", "orders of", "piece of",
/// "pieces of", optionally preceded by an article.
static LEADING_QUANTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:a|an|the)\s+)?(?:orders?|pieces?)\s+of\s+").expect("valid regex")
});

/// Spice-level phrases, standalone or preceded by "with". Longest
/// alternatives first so "very mild" is not split into "very" + "mild".
static SPICE_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:with\s+)?\b(?:very\s+mild|extra\s+spicy|very\s+hot|mild|medium|spicy|hot)\b")
        .expect("valid regex")
});

/// Stray articles and distributive filler left behind by quantity and
/// spice extraction ("both with mild", "all spicy").
static FILLER_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:the|a|an|of|both|all|please)\b").expect("valid regex"));

/// Cleans a spoken item phrase down to a catalog lookup key.
///
/// Pure function of the input text; lowercases, strips quantifier/spice/
/// filler phrases, and collapses whitespace.
pub fn clean_item_text(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let shielded = shield_hot_and_sour(&lowered);
    let no_quantifier = LEADING_QUANTIFIER_RE.replace(&shielded, "");
    let no_spice = SPICE_PHRASE_RE.replace_all(&no_quantifier, " ");
    let no_filler = FILLER_WORD_RE.replace_all(&no_spice, " ");
    let restored = unshield_hot_and_sour(&no_filler);

    restored.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_quantifier_phrases() {
        assert_eq!(clean_item_text("order of garlic naan"), "garlic naan");
        assert_eq!(clean_item_text("two orders of samosa"), "two orders samosa");
        assert_eq!(clean_item_text("an order of samosa"), "samosa");
        assert_eq!(clean_item_text("piece of tandoori chicken"), "tandoori chicken");
    }

    #[test]
    fn strips_spice_phrases_with_and_without_with() {
        assert_eq!(clean_item_text("butter chicken with spicy"), "butter chicken");
        assert_eq!(clean_item_text("mild vegetable curry"), "vegetable curry");
        assert_eq!(
            clean_item_text("chicken biryanis both with mild"),
            "chicken biryanis"
        );
        assert_eq!(
            clean_item_text("goat biryani with very hot"),
            "goat biryani"
        );
    }

    #[test]
    fn hot_and_sour_is_protected_from_spice_stripping() {
        assert_eq!(clean_item_text("hot & sour soup"), "hot & sour soup");
        assert_eq!(clean_item_text("hot and sour soup"), "hot & sour soup");
        assert_eq!(
            clean_item_text("a hot and sour soup with mild"),
            "hot & sour soup"
        );
    }

    #[test]
    fn strips_articles_and_collapses_whitespace() {
        assert_eq!(clean_item_text("  the   mango    lassi "), "mango lassi");
        assert_eq!(clean_item_text("a samosa please"), "samosa");
    }

    #[test]
    fn empty_and_filler_only_input_cleans_to_empty() {
        assert_eq!(clean_item_text(""), "");
        assert_eq!(clean_item_text("the a an"), "");
        assert_eq!(clean_item_text("with mild"), "");
    }
}
