//! Lenient text parsers for numeric and boolean cells.
//!
//! Hand-entered numbers carry units and currency marks (`28세`, `5,500원`,
//! `$ 1,200.50`). These parsers strip everything that cannot be part of the
//! number and then parse what remains.

use std::str::FromStr;

/// Outcome of parsing one text cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextParse<T> {
    /// Empty or whitespace-only input.
    Blank,
    Parsed(T),
    /// Non-blank input that does not yield a value.
    Invalid,
}

impl<T> TextParse<T> {
    pub fn parsed(self) -> Option<T> {
        match self {
            TextParse::Parsed(value) => Some(value),
            TextParse::Blank | TextParse::Invalid => None,
        }
    }
}

/// Keeps ASCII digits and `-`, then parses as an integer.
///
/// Whitespace and unit suffixes disappear (`" 35 "` -> 35, `"28세"` -> 28);
/// a minus sign anywhere but the front leaves an unparsable remainder.
pub fn parse_integer_text<T: FromStr>(value: &str) -> TextParse<T> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return TextParse::Blank;
    }
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    match digits.parse() {
        Ok(number) => TextParse::Parsed(number),
        Err(_) => TextParse::Invalid,
    }
}

/// Removes thousands separators, keeps ASCII digits, `.` and `-`, then
/// parses as `f64` (`"8,500,000원"` -> 8500000.0).
pub fn parse_decimal_text(value: &str) -> TextParse<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return TextParse::Blank;
    }
    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match digits.parse() {
        Ok(number) => TextParse::Parsed(number),
        Err(_) => TextParse::Invalid,
    }
}

const TRUE_TOKENS: [&str; 4] = ["true", "yes", "y", "1"];
const FALSE_TOKENS: [&str; 4] = ["false", "no", "n", "0"];

/// Case-insensitive match against the accepted boolean spellings.
pub fn parse_boolean_text(value: &str) -> TextParse<bool> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return TextParse::Blank;
    }
    if TRUE_TOKENS.contains(&normalized.as_str()) {
        TextParse::Parsed(true)
    } else if FALSE_TOKENS.contains(&normalized.as_str()) {
        TextParse::Parsed(false)
    } else {
        TextParse::Invalid
    }
}

/// Truncates toward zero; `None` for non-finite or out-of-range values.
pub fn truncate_to_i32(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        return None;
    }
    Some(truncated as i32)
}

/// Truncates toward zero; `None` for non-finite or out-of-range values.
pub fn truncate_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    // i64::MAX is not representable; 2^63 is the first value past the range.
    if truncated < -9_223_372_036_854_775_808.0 || truncated >= 9_223_372_036_854_775_808.0 {
        return None;
    }
    Some(truncated as i64)
}
