use std::sync::LazyLock;

use regex::Regex;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(k|m|thousand|million)?$").unwrap()
});

static MONEY_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\$\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:k|m|thousand|million)\b)?|\b\d[\d,]*(?:\.\d+)?\s?(?:k|m|thousand|million)\b",
    )
    .unwrap()
});

/// Parse a single monetary amount such as `"$1,250.00"`, `"50k"` or `"2 million"`
///
/// Returns `None` for anything that is not an amount.
pub fn parse_monetary_value(raw: &str) -> Option<f64> {
    let caps = AMOUNT_RE.captures(raw.trim())?;
    let number: f64 = caps[1].replace(',', "").parse().ok()?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("k") | Some("thousand") => 1_000.0,
        Some("m") | Some("million") => 1_000_000.0,
        _ => 1.0,
    };

    Some(number * multiplier)
}

/// Every amount mentioned in free text, in order of appearance
pub fn extract_monetary_values(text: &str) -> Vec<f64> {
    MONEY_MENTION_RE
        .find_iter(text)
        .filter_map(|m| parse_monetary_value(m.as_str()))
        .collect()
}

/// Largest amount mentioned in free text
pub fn max_monetary_value(text: &str) -> Option<f64> {
    extract_monetary_values(text)
        .into_iter()
        .fold(None, |max, v| Some(max.map_or(v, |m: f64| m.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_monetary_value() {
        assert_eq!(parse_monetary_value("$1,250.00"), Some(1250.0));
        assert_eq!(parse_monetary_value("50k"), Some(50_000.0));
        assert_eq!(parse_monetary_value("50K"), Some(50_000.0));
        assert_eq!(parse_monetary_value("2 million"), Some(2_000_000.0));
        assert_eq!(parse_monetary_value("$3M"), Some(3_000_000.0));
        assert_eq!(parse_monetary_value("15 thousand"), Some(15_000.0));
    }

    #[test]
    fn test_parse_monetary_value_rejects_garbage() {
        assert_eq!(parse_monetary_value(""), None);
        assert_eq!(parse_monetary_value("a lot of money"), None);
        assert_eq!(parse_monetary_value("$"), None);
        assert_eq!(parse_monetary_value("12 apples"), None);
    }

    #[test]
    fn test_extract_monetary_values_from_text() {
        let text = "They spend $1,250.00 a month now, the proposal is 50k, and the whole portfolio is worth 2 million.";
        assert_eq!(
            extract_monetary_values(text),
            vec![1250.0, 50_000.0, 2_000_000.0]
        );
        assert_eq!(max_monetary_value(text), Some(2_000_000.0));
    }

    #[test]
    fn test_extract_ignores_plain_numbers() {
        assert!(extract_monetary_values("We manage 300 units across 5 members of staff").is_empty());
        assert_eq!(max_monetary_value("no amounts here"), None);
    }
}
