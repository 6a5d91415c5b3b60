//! Log Redaction Layer
//!
//! Scrubs access tokens and phone numbers from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(EAA[a-zA-Z0-9]{20,})|(ya29\.[a-zA-Z0-9\-_]+)|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = TELEPHONE_RE.replace_all(input, "[REDACTED_PHONE]");
    TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Masks a sender address down to its last four characters.
pub fn mask_sender(sender: &str) -> String {
    let count = sender.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = sender.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "Sending to +1-555-123-4567 with Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
    }

    #[test]
    fn test_redacts_graph_and_google_tokens() {
        let raw = "token EAAGm0PX4ZCpsBAKZCexampleexample and ya29.a0AfH6SMBx-abc_123";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("EAAGm0PX4ZCps"));
        assert!(!clean.contains("ya29."));
        assert_eq!(clean.matches("[REDACTED_TOKEN]").count(), 2);
    }

    #[test]
    fn test_order_commands_pass_through() {
        assert_eq!(redact_sensitive_data("order 12345"), "order 12345");
    }

    #[test]
    fn test_mask_sender() {
        assert_eq!(mask_sender("15551234567"), "*******4567");
        assert_eq!(mask_sender("123"), "***");
    }
}
