//! Phone number display formatting.
//!
//! Numbers are stored as entered by the owner or client; these helpers only
//! normalize what is shown and what is used to build WhatsApp links.

/// Default country calling code prefixed to national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "55";

/// Format a phone number for display.
///
/// - 11 digits: `(XX) XXXXX-XXXX` (mobile)
/// - 10 digits: `(XX) XXXX-XXXX` (landline)
/// - 13 digits starting with the country code: `+55 (XX) XXXXX-XXXX`
///
/// Anything else is returned trimmed and otherwise untouched.
pub fn format_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        13 if digits.starts_with(DEFAULT_COUNTRY_CODE) => format!(
            "+{} ({}) {}-{}",
            &digits[..2],
            &digits[2..4],
            &digits[4..9],
            &digits[9..]
        ),
        _ => raw.trim().to_string(),
    }
}

/// Digits suitable for a `wa.me` link, with the country code prefixed to
/// national numbers. Returns `None` when there are no digits at all.
pub fn whatsapp_number(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    match digits.len() {
        0 => None,
        10 | 11 => Some(format!("{DEFAULT_COUNTRY_CODE}{digits}")),
        _ => Some(digits),
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_mobile() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("(11) 98765 4321"), "(11) 98765-4321");
    }

    #[test]
    fn formats_landline() {
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
    }

    #[test]
    fn formats_with_country_code() {
        assert_eq!(format_phone("+55 11 98765-4321"), "+55 (11) 98765-4321");
    }

    #[test]
    fn leaves_unknown_shapes_alone() {
        assert_eq!(format_phone("  +1 555 0100 "), "+1 555 0100");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn whatsapp_prefixes_country_code() {
        assert_eq!(whatsapp_number("(11) 98765-4321").as_deref(), Some("5511987654321"));
        assert_eq!(whatsapp_number("+55 11 98765-4321").as_deref(), Some("5511987654321"));
        assert_eq!(whatsapp_number("n/a"), None);
    }
}
