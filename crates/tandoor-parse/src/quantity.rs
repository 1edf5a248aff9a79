//! Leading-quantity extraction from item segments.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(one|two|three|four|five|six|seven|eight|nine|ten)|(\d+))\b[\s,]*")
        .expect("valid regex")
});

fn number_word_value(word: &str) -> u32 {
    match word {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        _ => 1,
    }
}

/// Extracts a leading quantity token from a segment.
///
/// A leading number word (one..ten) or literal integer sets the quantity;
/// integers beyond ten are parsed literally. Absent a token the quantity
/// defaults to 1. Returns the quantity and the remainder with the token
/// removed.
pub fn extract_quantity(text: &str) -> (u32, String) {
    let lowered = text.trim().to_lowercase();
    match LEADING_QUANTITY_RE.captures(&lowered) {
        Some(caps) => {
            let quantity = if let Some(word) = caps.get(1) {
                number_word_value(word.as_str())
            } else {
                // Literals that overflow u32 fall back to 1.
                caps.get(2)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(1)
                    .max(1)
            };
            let remainder = lowered[caps.get(0).expect("whole match").end()..].to_string();
            (quantity, remainder)
        }
        None => (1, lowered),
    }
}
