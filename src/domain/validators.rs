//! Input formatting and validation for every payment-method field.
//!
//! Formatters run on each keystroke and only clamp or reshape input. The
//! validators are separate predicates so that "is this valid" never depends on
//! whether an error is currently displayed.

use super::method::BankType;
use chrono::{Datelike, NaiveDate};

pub const CARD_NUMBER_MAX_DIGITS: usize = 19;
const CARD_NUMBER_MIN_DIGITS: usize = 13;

/// Card expiry as entered, with a four-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry {
    pub year: i32,
    pub month: u32,
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Strips everything but digits and caps the result at 19 characters.
pub fn normalize_card_number(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(CARD_NUMBER_MAX_DIGITS)
        .collect()
}

/// Groups digits in blocks of four separated by a space.
pub fn format_card_number(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 4);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && idx % 4 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

pub fn luhn_valid(digits: &str) -> bool {
    let len = digits.len();
    if !(CARD_NUMBER_MIN_DIGITS..=CARD_NUMBER_MAX_DIGITS).contains(&len)
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(idx, b)| {
            let d = u32::from(b - b'0');
            if idx % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Reshapes expiry input into `MM/YY` as the payer types.
pub fn format_expiry(raw: &str) -> String {
    let digits: String = digits_only(raw).chars().take(4).collect();
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Parses `MM/YY` (separators optional). Anything but exactly four digits, or
/// a month outside 1..=12, is rejected.
pub fn parse_expiry(raw: &str) -> Option<Expiry> {
    let digits = digits_only(raw);
    if digits.len() != 4 {
        return None;
    }
    let month: u32 = digits[..2].parse().ok()?;
    let yy: i32 = digits[2..].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(Expiry {
        year: 2000 + yy,
        month,
    })
}

/// A card is usable through the last day of its expiry month.
pub fn expiry_not_expired(expiry: Expiry, reference: NaiveDate) -> bool {
    (expiry.year, expiry.month) >= (reference.year(), reference.month())
}

pub fn normalize_cvc(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).take(4).collect()
}

pub fn cvc_valid(digits: &str) -> bool {
    (3..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Permissive `local@domain.tld` check: no whitespace, exactly one `@` with
/// something on each side, and a dot inside the domain.
pub fn email_valid(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(idx, ch)| ch == '.' && idx > 0 && idx + 1 < domain.len())
}

/// Clamps routing input to the shape the bank type expects.
pub fn normalize_routing(raw: &str, bank_type: BankType) -> String {
    match bank_type {
        BankType::Us => raw.chars().filter(char::is_ascii_digit).take(9).collect(),
        BankType::Uk => raw.chars().filter(char::is_ascii_digit).take(6).collect(),
        BankType::Euro => raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .take(11)
            .collect(),
    }
}

pub fn routing_valid(value: &str, bank_type: BankType) -> bool {
    match bank_type {
        BankType::Us => digits_only(value).len() == 9,
        BankType::Uk => digits_only(value).len() >= 6,
        BankType::Euro => value.chars().filter(char::is_ascii_alphanumeric).count() >= 8,
    }
}

pub fn normalize_account(raw: &str, bank_type: BankType) -> String {
    match bank_type {
        BankType::Us => raw.chars().filter(char::is_ascii_digit).take(17).collect(),
        BankType::Euro | BankType::Uk => raw.chars().take(34).collect(),
    }
}

pub fn account_valid(value: &str) -> bool {
    (4..=34).contains(&value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_card_number() {
        assert_eq!(normalize_card_number("4242 4242-4242 4242"), "4242424242424242");
        assert_eq!(normalize_card_number("1234567890123456789012"), "1234567890123456789");
        assert_eq!(normalize_card_number("abc"), "");
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("42424"), "4242 4");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_luhn_known_numbers() {
        assert!(luhn_valid("4242424242424242"));
        assert!(luhn_valid("5555555555554444"));
        assert!(luhn_valid("378282246310005"));
        assert!(!luhn_valid("4242424242424241"));
    }

    #[test]
    fn test_luhn_rejects_bad_lengths() {
        // 12 digits that would otherwise pass the checksum
        assert!(!luhn_valid("000000000000"));
        assert!(luhn_valid("0000000000000"));
        assert!(!luhn_valid("00000000000000000000"));
        assert!(!luhn_valid("4242 4242 4242 4242"));
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("13/25"), None);
        assert_eq!(parse_expiry("00/25"), None);
        assert_eq!(parse_expiry("0925"), Some(Expiry { month: 9, year: 2025 }));
        assert_eq!(parse_expiry("12/30"), Some(Expiry { month: 12, year: 2030 }));
        assert_eq!(parse_expiry("1/25"), None);
        assert_eq!(parse_expiry("09/2025"), None);
    }

    #[test]
    fn test_expiry_against_reference_date() {
        let reference = date(2025, 10, 1);
        assert!(!expiry_not_expired(Expiry { month: 9, year: 2025 }, reference));
        assert!(expiry_not_expired(Expiry { month: 10, year: 2025 }, reference));
        assert!(expiry_not_expired(Expiry { month: 1, year: 2026 }, reference));
        assert!(!expiry_not_expired(Expiry { month: 12, year: 2024 }, reference));
    }

    #[test]
    fn test_format_expiry_as_you_type() {
        assert_eq!(format_expiry("0"), "0");
        assert_eq!(format_expiry("09"), "09");
        assert_eq!(format_expiry("092"), "09/2");
        assert_eq!(format_expiry("09/255"), "09/25");
    }

    #[test]
    fn test_cvc() {
        assert_eq!(normalize_cvc("12a34 5"), "1234");
        assert!(cvc_valid("123"));
        assert!(cvc_valid("1234"));
        assert!(!cvc_valid("12"));
        assert!(!cvc_valid("12345"));
        assert!(!cvc_valid("12a"));
    }

    #[test]
    fn test_email_shape() {
        assert!(email_valid("payer@example.com"));
        assert!(email_valid("a@b.co"));
        assert!(!email_valid(""));
        assert!(!email_valid("payer@example"));
        assert!(!email_valid("@example.com"));
        assert!(!email_valid("payer@.com"));
        assert!(!email_valid("payer@example."));
        assert!(!email_valid("pay er@example.com"));
        assert!(!email_valid("a@b@c.com"));
    }

    #[test]
    fn test_routing_per_bank_type() {
        assert!(routing_valid("021000021", BankType::Us));
        assert!(!routing_valid("02100002", BankType::Us));
        assert!(routing_valid("12-34-56", BankType::Uk));
        assert!(!routing_valid("12345", BankType::Uk));
        assert!(routing_valid("DEUTDEFF", BankType::Euro));
        assert!(!routing_valid("DEUT-DE", BankType::Euro));
    }

    #[test]
    fn test_normalize_routing_per_bank_type() {
        assert_eq!(normalize_routing("0210-0002-1999", BankType::Us), "021000021");
        assert_eq!(normalize_routing("12-34-56-78", BankType::Uk), "123456");
        assert_eq!(normalize_routing("deut de ff 500x", BankType::Euro), "DEUTDEFF500");
    }

    #[test]
    fn test_account() {
        assert!(account_valid("1234"));
        assert!(!account_valid("123"));
        assert!(account_valid(&"9".repeat(34)));
        assert!(!account_valid(&"9".repeat(35)));
        assert_eq!(normalize_account("12ab34 5678901234567890", BankType::Us), "12345678901234567");
        assert_eq!(normalize_account(&"x".repeat(40), BankType::Euro).len(), 34);
    }
}
