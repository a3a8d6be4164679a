//! Normalization of raw price text into comparable values.

/// Strips everything except digits, commas, and periods, then removes commas
/// as thousands separators. Returns `None` when nothing numeric remains.
///
/// Known limitation: commas are always treated as thousands separators, so
/// decimal-comma locales ("1.234,56") are not handled correctly.
pub fn clean(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.replace(',', ""))
}

/// Parses a price string into a ranking value for minimum selection.
/// Unparseable input ranks as positive infinity so it never wins a
/// comparison but never fails one either.
pub fn rank_value(price: &str) -> f64 {
    let stripped: String = price
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '₹'))
        .collect();
    stripped.trim().parse::<f64>().unwrap_or(f64::INFINITY)
}
