use ordered_float::OrderedFloat;

/// Bucket key for grouping rows by normalized amount. Full parsed value,
/// not rounded cents, so distinct parsed amounts never alias.
pub type AmountKey = OrderedFloat<f64>;

/// Normalize a raw currency-like field into a number.
///
/// `None`, empty, or unparseable input degrades to 0.0 — malformed feed data
/// must never block grouping or aggregation. Currency symbols and thousands
/// separators are stripped; trailing non-numeric noise is ignored.
pub fn normalize_amount(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|&c| c != ',')
        .collect();

    // Longest leading prefix that reads as a float: optional sign, digits,
    // at most one decimal point.
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in cleaned.char_indices() {
        match c {
            '+' | '-' if i == 0 => end = i + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            '0'..='9' => end = i + 1,
            _ => break,
        }
    }

    cleaned[..end].parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_are_zero() {
        assert_eq!(normalize_amount(None), 0.0);
        assert_eq!(normalize_amount(Some("")), 0.0);
        assert_eq!(normalize_amount(Some("   ")), 0.0);
    }

    #[test]
    fn plain_numbers_parse() {
        assert_eq!(normalize_amount(Some("123.45")), 123.45);
        assert_eq!(normalize_amount(Some("-42")), -42.0);
        assert_eq!(normalize_amount(Some("0.00")), 0.0);
    }

    #[test]
    fn currency_noise_is_stripped() {
        assert_eq!(normalize_amount(Some("$1,234.50")), 1234.5);
        assert_eq!(normalize_amount(Some(" $99 ")), 99.0);
    }

    #[test]
    fn trailing_noise_is_ignored() {
        assert_eq!(normalize_amount(Some("55.20 USD")), 55.2);
        assert_eq!(normalize_amount(Some("12.5/mo")), 12.5);
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(normalize_amount(Some("n/a")), 0.0);
        assert_eq!(normalize_amount(Some("pending")), 0.0);
        assert_eq!(normalize_amount(Some("--")), 0.0);
    }
}
