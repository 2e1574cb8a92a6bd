/// Currency glyph shown in front of revenue amounts
pub const CURRENCY_GLYPH: &str = "₺";

/// Format an amount with `.` as the thousands separator (27360 -> "27.360")
pub fn format_revenue(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        // Separator goes before every group of three counted from the right
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}

/// Format an amount with the currency prefix ("₺ 27.360")
pub fn format_currency(value: u64) -> String {
    format!("{} {}", CURRENCY_GLYPH, format_revenue(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_separator() {
        assert_eq!(format_revenue(27360), "27.360");
        assert_eq!(format_revenue(4281), "4.281");
        assert_eq!(format_revenue(16001), "16.001");
    }

    #[test]
    fn test_no_separator_below_thousand() {
        assert_eq!(format_revenue(999), "999");
        assert_eq!(format_revenue(0), "0");
        assert_eq!(format_revenue(7), "7");
    }

    #[test]
    fn test_large_amounts() {
        assert_eq!(format_revenue(1_000), "1.000");
        assert_eq!(format_revenue(1_234_567), "1.234.567");
        assert_eq!(format_revenue(100_000_000), "100.000.000");
    }

    #[test]
    fn test_currency_prefix() {
        assert_eq!(format_currency(27360), "₺ 27.360");
        assert_eq!(format_currency(999), "₺ 999");
    }
}
