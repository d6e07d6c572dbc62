use once_cell::sync::Lazy;
use regex::Regex;

/// Convert a numeric token plus unit suffix into an integer amount string.
///
/// Both "," and "." are stripped before parsing, so "1.5" is read as the
/// digits "15". Callers rely on this, see DESIGN.md before changing it.
pub fn normalize(number: &str, unit: &str) -> Option<String> {
    // Separators and any trailing unit text are dropped alike
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return None;
    }

    let value: u64 = digits.parse().ok()?;
    value.checked_mul(multiplier(unit)).map(|v| v.to_string())
}

/// Drop a zero fraction from price text ("15000.0" → "15000", "1.0만" → "1만")
/// so that [`normalize`] does not read the zeros as extra digits.
pub fn trim_zero_fraction(price: &str) -> String {
    ZERO_FRACTION.replace_all(price, "$1$2").into_owned()
}

static ZERO_FRACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d)\.0+(\D|$)").expect("zero fraction pattern must compile")
});

fn multiplier(unit: &str) -> u64 {
    if unit.contains('만') {
        10_000
    } else if unit.contains('천') {
        1_000
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_thousand_unit() {
        assert_eq!(normalize("5", "만"), Some("50000".to_string()));
    }

    #[test]
    fn test_decimal_point_is_stripped() {
        assert_eq!(normalize("1.5", "만"), Some("150000".to_string()));
    }

    #[test]
    fn test_thousand_unit() {
        assert_eq!(normalize("2", "천"), Some("2000".to_string()));
    }

    #[test]
    fn test_won_unit_and_trailing_suffix() {
        assert_eq!(normalize("10000원", "원"), Some("10000".to_string()));
        assert_eq!(normalize("15,000", ""), Some("15000".to_string()));
    }

    #[test]
    fn test_unparsable_number() {
        assert_eq!(normalize("", "만"), None);
        assert_eq!(normalize("가격없음", ""), None);
    }

    #[test]
    fn test_trim_zero_fraction() {
        assert_eq!(trim_zero_fraction("15000.0"), "15000");
        assert_eq!(trim_zero_fraction("15,000.00원"), "15,000원");
        assert_eq!(trim_zero_fraction("1.0만"), "1만");
        assert_eq!(trim_zero_fraction("1.5만"), "1.5만");
        assert_eq!(trim_zero_fraction("1.05만"), "1.05만");
    }

    #[test]
    fn test_overflow_is_no_value() {
        assert_eq!(normalize("99999999999999999999", ""), None);
        assert_eq!(normalize("9999999999999999", "만"), None);
    }
}
