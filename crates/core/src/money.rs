//! Prices are stored as integer cents.

/// Format a price in cents with two decimals, e.g. `2550` → `"25.50"`.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_decimals() {
        assert_eq!(format_price(2500), "25.00");
        assert_eq!(format_price(2550), "25.50");
        assert_eq!(format_price(5), "0.05");
        assert_eq!(format_price(0), "0.00");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_price(-150), "-1.50");
    }
}
