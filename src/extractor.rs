use std::sync::LazyLock;

use regex::Regex;

/// Currency marker (`inr`, `aed` or `₹`), at most one whitespace character,
/// then ASCII digits with optional thousands separators and decimal part.
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:inr|aed|₹)\s?([0-9,]+\.?[0-9]*)").expect("amount pattern is valid")
});

/// Pull the transaction amount out of an SMS body.
///
/// Only the first marker+number match is considered. Messages that mention
/// several amounts (e.g. "paid inr 500, avl bal inr 12,000") yield the first
/// one, which is usually but not always the transaction amount.
pub fn extract_amount(text: &str) -> Option<f64> {
    let caps = AMOUNT_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}
