//! Phone number helpers
//!
//! Formatting here is for people reading the console and for the transport's
//! `To` field. It never fails: input it cannot make sense of is returned as is.

use regex::Regex;
use std::sync::LazyLock;

/// Digits, an optional leading `+`, and the usual separators
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s().\-]+$").expect("phone pattern is valid"));

/// A phone number reduced to its digits
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParsedNumber {
    /// North American number without the leading country code
    NorthAmerican(String),
    /// Any other number written with a leading `+`
    International(String),
}

fn parse(raw: &str) -> Option<ParsedNumber> {
    let trimmed = raw.trim();
    if !PHONE_PATTERN.is_match(trimmed) {
        return None;
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let international = trimmed.starts_with('+');

    match digits.len() {
        10 if !international => Some(ParsedNumber::NorthAmerican(digits)),
        11 if digits.starts_with('1') => Some(ParsedNumber::NorthAmerican(digits[1..].to_string())),
        8..=15 if international => Some(ParsedNumber::International(digits)),
        _ => None,
    }
}

/// Human readable form of `raw`
///
/// `5551234567` becomes `+1 (555) 123-4567`. Other `+` prefixed numbers are
/// shown as `+<digits>`. Anything else is passed through unchanged.
pub fn format_number(raw: &str) -> String {
    match parse(raw) {
        Some(ParsedNumber::NorthAmerican(digits)) => format!(
            "+1 ({}) {}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..10]
        ),
        Some(ParsedNumber::International(digits)) => format!("+{digits}"),
        None => raw.to_string(),
    }
}

/// Dialable E.164 form of `raw`, if it is a recognizable number
pub fn to_e164(raw: &str) -> Option<String> {
    parse(raw).map(|parsed| match parsed {
        ParsedNumber::NorthAmerican(digits) => format!("+1{digits}"),
        ParsedNumber::International(digits) => format!("+{digits}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_north_american_numbers() {
        assert_eq!(format_number("5551234567"), "+1 (555) 123-4567");
        assert_eq!(format_number("(555) 123-4567"), "+1 (555) 123-4567");
        assert_eq!(format_number("+1 555.123.4567"), "+1 (555) 123-4567");
        assert_eq!(format_number("15551234567"), "+1 (555) 123-4567");
    }

    #[test]
    fn test_format_international_numbers() {
        assert_eq!(format_number("+44 20 7946 0958"), "+442079460958");
        assert_eq!(format_number("+15550100"), "+15550100");
    }

    #[test]
    fn test_unformattable_input_passes_through() {
        assert_eq!(format_number("call me"), "call me");
        assert_eq!(format_number("12345"), "12345");
        assert_eq!(format_number(""), "");
    }

    #[test]
    fn test_to_e164() {
        assert_eq!(to_e164("(555) 123-4567").as_deref(), Some("+15551234567"));
        assert_eq!(to_e164("+44 20 7946 0958").as_deref(), Some("+442079460958"));
        assert_eq!(to_e164("not a number"), None);
        assert_eq!(to_e164("555-0100"), None);
    }
}
