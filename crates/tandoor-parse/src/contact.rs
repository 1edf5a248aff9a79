//! Customer identity extraction from transcripts.
//!
//! Uses the same confirmation-anchored strategy as the order segmenter: the
//! LAST agent utterance matching the identity confirmation template is
//! authoritative. When the template never occurs, falls back to scanning
//! customer turns directly ("my name is …", a phone-shaped token).

use once_cell::sync::Lazy;
use regex::Regex;

use tandoor_types::{Contact, Role, TranscriptTurn, NOT_AVAILABLE};

use crate::affirm::is_affirmative;

/// Identity confirmation template spoken by the agent.
static CONTACT_CONFIRM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)to confirm,?\s*your name is\s+(.+?)\s+and your phone number is\s+(.+?)\.?\s*is that correct",
    )
    .expect("valid regex")
});

/// Customer self-introduction, used only when no confirmation exists.
static NAME_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)my name is\s+([A-Za-z][A-Za-z\s]*)").expect("valid regex"));

/// A phone-shaped token: bare ten digits, separator-punctuated, or with a
/// parenthesized area code.
static PHONE_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid regex"));

/// Delivery address markers in customer speech.
static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:address is|live at|deliver to)\s+([^.,]+)").expect("valid regex")
});

/// Canonicalizes a phone-like token to `DDD-DDD-DDDD`.
///
/// Only when exactly ten digits are recovered; anything else is rejected.
fn canonicalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        Some(format!(
            "{}-{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..]
        ))
    } else {
        None
    }
}

/// Extracts customer name, phone, and address from a transcript.
///
/// Every field defaults to `"N/A"` when unresolved. The identity
/// confirmation is advisory like the order confirmation: extraction
/// proceeds even when the customer never affirmed, logged as degraded.
pub fn extract_contact(transcript: &[TranscriptTurn]) -> Contact {
    let mut contact = Contact::default();

    // Scan from the end: the last identity confirmation is authoritative.
    let confirmation = transcript
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, turn)| turn.role == Role::Agent)
        .find_map(|(index, turn)| {
            CONTACT_CONFIRM_RE
                .captures(&turn.message)
                .map(|caps| (index, caps))
        });

    if let Some((index, caps)) = confirmation {
        let confirmed = transcript
            .get(index + 1)
            .is_some_and(|turn| turn.role == Role::User && is_affirmative(&turn.message));
        if !confirmed {
            tracing::debug!("identity confirmation not affirmed, extracting anyway");
        }

        let name = caps.get(1).expect("name capture").as_str().trim();
        if !name.is_empty() {
            contact.name = name.to_string();
        }
        if let Some(phone) = canonicalize_phone(caps.get(2).expect("phone capture").as_str()) {
            contact.phone = phone;
        }
    } else {
        // No template anywhere: fall back to the customer's own words.
        for turn in transcript.iter().filter(|t| t.role == Role::User) {
            if let Some(caps) = NAME_FALLBACK_RE.captures(&turn.message) {
                contact.name = caps.get(1).expect("name capture").as_str().trim().to_string();
            }
            if let Some(found) = PHONE_FALLBACK_RE.find(&turn.message) {
                if let Some(phone) = canonicalize_phone(found.as_str()) {
                    contact.phone = phone;
                }
            }
        }
    }

    // Address is independent of the confirmation anchor.
    for turn in transcript.iter().filter(|t| t.role == Role::User) {
        if let Some(caps) = ADDRESS_RE.captures(&turn.message) {
            let address = caps.get(1).expect("address capture").as_str().trim();
            if !address.is_empty() {
                contact.address = address.to_string();
            }
        }
    }

    if contact.name == NOT_AVAILABLE && contact.phone == NOT_AVAILABLE {
        tracing::debug!("no customer identity recovered from transcript");
    }

    contact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(message: &str) -> TranscriptTurn {
        TranscriptTurn::new(Role::Agent, message)
    }

    fn user(message: &str) -> TranscriptTurn {
        TranscriptTurn::new(Role::User, message)
    }

    #[test]
    fn extracts_from_confirmation_template() {
        let transcript = vec![
            agent("To confirm, your name is Priya Sharma and your phone number is 555-123-4567. Is that correct?"),
            user("yes"),
        ];
        let contact = extract_contact(&transcript);
        assert_eq!(contact.name, "Priya Sharma");
        assert_eq!(contact.phone, "555-123-4567");
        assert_eq!(contact.address, NOT_AVAILABLE);
    }

    #[test]
    fn phone_formats_canonicalize_to_dashes() {
        for raw in ["5551234567", "555.123.4567", "555 123 4567", "(555) 123-4567"] {
            let transcript = vec![
                agent(&format!(
                    "To confirm, your name is Sam and your phone number is {raw}. Is that correct?"
                )),
                user("correct"),
            ];
            let contact = extract_contact(&transcript);
            assert_eq!(contact.phone, "555-123-4567", "raw: {raw}");
        }
    }

    #[test]
    fn wrong_digit_count_leaves_phone_unresolved() {
        let transcript = vec![
            agent("To confirm, your name is Sam and your phone number is 123-4567. Is that correct?"),
            user("yes"),
        ];
        let contact = extract_contact(&transcript);
        assert_eq!(contact.phone, NOT_AVAILABLE);
        assert_eq!(contact.name, "Sam");
    }

    #[test]
    fn last_confirmation_wins() {
        let transcript = vec![
            agent("To confirm, your name is Bob and your phone number is 111-111-1111. Is that correct?"),
            user("no, it's Rob"),
            agent("To confirm, your name is Rob and your phone number is 222-333-4444. Is that correct?"),
            user("yes"),
        ];
        let contact = extract_contact(&transcript);
        assert_eq!(contact.name, "Rob");
        assert_eq!(contact.phone, "222-333-4444");
    }

    #[test]
    fn unaffirmed_confirmation_still_extracts() {
        let transcript = vec![
            agent("To confirm, your name is Sam and your phone number is 555-123-4567. Is that correct?"),
            user("hold on"),
        ];
        let contact = extract_contact(&transcript);
        assert_eq!(contact.name, "Sam");
        assert_eq!(contact.phone, "555-123-4567");
    }

    #[test]
    fn falls_back_to_customer_turns() {
        let transcript = vec![
            agent("Can I get your details?"),
            user("my name is Anita Rao"),
            user("you can reach me at (555) 987-6543"),
        ];
        let contact = extract_contact(&transcript);
        assert_eq!(contact.name, "Anita Rao");
        assert_eq!(contact.phone, "555-987-6543");
    }

    #[test]
    fn address_markers_scan_all_customer_turns() {
        let transcript = vec![
            agent("Pickup or delivery?"),
            user("deliver to 42 Spice Lane, please"),
        ];
        let contact = extract_contact(&transcript);
        assert_eq!(contact.address, "42 Spice Lane");

        let transcript = vec![user("my address is 7 Curry Court. See you soon")];
        assert_eq!(extract_contact(&transcript).address, "7 Curry Court");
    }

    #[test]
    fn empty_transcript_yields_defaults() {
        let contact = extract_contact(&[]);
        assert_eq!(contact, Contact::default());
    }
}
