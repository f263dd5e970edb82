//! Multi-format date and date-time parsing.
//!
//! Input dates arrive in whatever shape people typed them: `2020-03-15`,
//! `2020/3/15`, `15/03/2020`, `2020-03-15 9:05`. This module holds two ordered
//! pattern lists (date-only and date+time) and tries them in sequence; the
//! first pattern that matches the whole trimmed input wins.
//!
//! # Pattern letters
//!
//! | Letter | Meaning | Width |
//! |--------|---------|-------|
//! | `yyyy` | year | exactly 4 digits |
//! | `MM` / `M` | month | 2 digits / 1-2 digits |
//! | `dd` / `d` | day of month | 2 digits / 1-2 digits |
//! | `HH` / `H` | hour (0-23) | 2 digits / 1-2 digits |
//! | `mm` / `m` | minute | 2 digits / 1-2 digits |
//! | `ss` / `s` | second | 2 digits / 1-2 digits |
//!
//! Any other non-letter character is matched literally. Several patterns can
//! match the same digit string (`yyyy-MM-dd` and `yyyy-M-d` both accept
//! `2020-03-15`), so list order is the tie-break and is part of the contract.

use std::sync::Arc;

use chrono::format::{Parsed, StrftimeItems};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::diagnostics::redact_value;
use crate::error::PatternError;

/// Date+time formats, strict two-digit forms first, then lenient forms.
pub const DATETIME_FORMATS: [&str; 8] = [
    "yyyy-MM-dd HH:mm:ss",
    "yyyy-MM-dd HH:mm",
    "yyyy/MM/dd HH:mm:ss",
    "yyyy/MM/dd HH:mm",
    "yyyy-M-d H:m:s",
    "yyyy-M-d H:m",
    "yyyy/M/d H:m:s",
    "yyyy/M/d H:m",
];

/// Date formats, strict two-digit forms first, then lenient forms.
pub const DATE_FORMATS: [&str; 8] = [
    "yyyy-MM-dd",
    "yyyy/MM/dd",
    "dd-MM-yyyy",
    "dd/MM/yyyy",
    "yyyy-M-d",
    "yyyy/M/d",
    "d-M-yyyy",
    "d/M/yyyy",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number {
        component: Component,
        min: usize,
        max: usize,
    },
    Literal(char),
}

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const ISO_LOCAL_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    Format(Vec<Token>),
    /// `yyyy-MM-dd`
    IsoLocalDate,
    /// `yyyy-MM-dd` with an optional offset.
    IsoDate,
    /// `yyyy-MM-ddTHH:mm[:ss[.fffffffff]]`
    IsoLocalDateTime,
    /// ISO local date-time, then optionally an offset and a zone region.
    IsoDateTime,
}

/// Parsed numeric components, before calendar validation.
#[derive(Debug, Default)]
struct Fields {
    year: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
}

impl Fields {
    fn set(&mut self, component: Component, value: u32) {
        let slot = match component {
            Component::Year => &mut self.year,
            Component::Month => &mut self.month,
            Component::Day => &mut self.day,
            Component::Hour => &mut self.hour,
            Component::Minute => &mut self.minute,
            Component::Second => &mut self.second,
        };
        *slot = Some(value);
    }

    /// Days 29 to 31 past the end of the month resolve to its last day
    /// (`2023-02-30` is 2023-02-28); day 0, day 32 and month 13 do not.
    fn date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year?).ok()?;
        let (month, day) = (self.month?, self.day?);
        if !(1..=31).contains(&day) {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        first.with_day(day.min(last.day()))
    }

    fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour?, self.minute?, self.second.unwrap_or(0))
    }
}

/// Consumes `tokens` from the front of `text`, returning the unmatched tail.
fn scan<'t>(tokens: &[Token], text: &'t str, fields: &mut Fields) -> Option<&'t str> {
    let mut rest = text;
    for token in tokens {
        match *token {
            Token::Literal(expected) => {
                rest = rest.strip_prefix(expected)?;
            }
            Token::Number {
                component,
                min,
                max,
            } => {
                let digits = rest
                    .bytes()
                    .take(max)
                    .take_while(u8::is_ascii_digit)
                    .count();
                if digits < min {
                    return None;
                }
                let (number, tail) = rest.split_at(digits);
                fields.set(component, number.parse().ok()?);
                rest = tail;
            }
        }
    }
    Some(rest)
}

fn scan_fields(tokens: &[Token], text: &str) -> Option<Fields> {
    let mut fields = Fields::default();
    scan(tokens, text, &mut fields)?
        .is_empty()
        .then_some(fields)
}

/// Exactly `dddd-dd-dd`.
fn has_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// `HH:mm`, `HH:mm:ss` or `HH:mm:ss.f` with one to nine fraction digits.
fn has_iso_time_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.len() {
        5 => bytes[2] == b':',
        8 => bytes[2] == b':' && bytes[5] == b':',
        10..=18 => bytes[2] == b':' && bytes[5] == b':' && bytes[8] == b'.',
        _ => false,
    }
}

/// `Z` or `+HH:MM` / `-HH:MM`.
fn is_iso_offset(text: &str) -> bool {
    if text == "Z" {
        return true;
    }
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, text, StrftimeItems::new("%:z")).is_ok()
        && parsed.to_fixed_offset().is_ok()
}

/// Zone region id such as `Asia/Seoul` or `UTC`.
fn is_zone_region(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_alphabetic())
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '-'))
}

fn parse_iso_local_date(text: &str) -> Option<NaiveDate> {
    if !has_iso_date_shape(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, ISO_DATE_FORMAT).ok()
}

fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let (local, offset) = text.split_at_checked(10)?;
    if !offset.is_empty() && !is_iso_offset(offset) {
        return None;
    }
    parse_iso_local_date(local)
}

fn parse_iso_local_date_time(text: &str) -> Option<NaiveDateTime> {
    let (date, time) = text.split_once('T')?;
    if !has_iso_date_shape(date) || !has_iso_time_shape(time) {
        return None;
    }
    ISO_LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// The offset is validated and dropped; a zone region is only accepted after
/// an offset.
fn parse_iso_date_time(text: &str) -> Option<NaiveDateTime> {
    let (text, region) = match text.strip_suffix(']') {
        Some(head) => {
            let (head, region) = head.rsplit_once('[')?;
            (head, Some(region))
        }
        None => (text, None),
    };
    let time_start = text.find('T')? + 1;
    let offset_start = text[time_start..]
        .find(['Z', '+', '-'])
        .map_or(text.len(), |at| time_start + at);
    let (local, offset) = text.split_at(offset_start);
    if offset.is_empty() {
        if region.is_some() {
            return None;
        }
    } else if !is_iso_offset(offset) {
        return None;
    }
    if region.is_some_and(|region| !is_zone_region(region)) {
        return None;
    }
    parse_iso_local_date_time(local)
}

/// One entry of a pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalPattern {
    name: String,
    kind: PatternKind,
}

impl TemporalPattern {
    /// Compiles a pattern string such as `yyyy/M/d H:m`.
    ///
    /// # Errors
    ///
    /// Fails on empty patterns, letters outside the table in the module docs,
    /// and unsupported widths (`yy`, `MMM`).
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        if chars.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut tokens = Vec::new();
        let mut index = 0;
        while index < chars.len() {
            let letter = chars[index];
            if !letter.is_ascii_alphabetic() {
                tokens.push(Token::Literal(letter));
                index += 1;
                continue;
            }
            let width = chars[index..].iter().take_while(|&&c| c == letter).count();
            let component = match letter {
                'y' => Component::Year,
                'M' => Component::Month,
                'd' => Component::Day,
                'H' => Component::Hour,
                'm' => Component::Minute,
                's' => Component::Second,
                _ => {
                    return Err(PatternError::UnsupportedLetter {
                        pattern: pattern.to_string(),
                        letter,
                    });
                }
            };
            let (min, max) = match (component, width) {
                (Component::Year, 4) => (4, 4),
                (Component::Year, _) => {
                    return Err(PatternError::InvalidWidth {
                        pattern: pattern.to_string(),
                        letter,
                        width,
                    });
                }
                (_, 1) => (1, 2),
                (_, 2) => (2, 2),
                _ => {
                    return Err(PatternError::InvalidWidth {
                        pattern: pattern.to_string(),
                        letter,
                        width,
                    });
                }
            };
            tokens.push(Token::Number {
                component,
                min,
                max,
            });
            index += width;
        }
        Ok(Self {
            name: pattern.to_string(),
            kind: PatternKind::Format(tokens),
        })
    }

    /// ISO-8601 local date, `2020-03-15`.
    pub fn iso_local_date() -> Self {
        Self {
            name: "ISO_LOCAL_DATE".to_string(),
            kind: PatternKind::IsoLocalDate,
        }
    }

    /// ISO-8601 date with optional offset, `2020-03-15+09:00`.
    pub fn iso_date() -> Self {
        Self {
            name: "ISO_DATE".to_string(),
            kind: PatternKind::IsoDate,
        }
    }

    /// ISO-8601 local date-time, `2020-03-15T10:30:00.5`.
    pub fn iso_local_date_time() -> Self {
        Self {
            name: "ISO_LOCAL_DATE_TIME".to_string(),
            kind: PatternKind::IsoLocalDateTime,
        }
    }

    /// ISO-8601 date-time with optional offset, `2020-03-15T10:30:00Z`.
    ///
    /// The offset is validated and dropped; the local wall-clock time is kept.
    pub fn iso_date_time() -> Self {
        Self {
            name: "ISO_DATE_TIME".to_string(),
            kind: PatternKind::IsoDateTime,
        }
    }

    /// The pattern string, or the ISO constant name for the ISO fallbacks.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parses the whole of `text` as a calendar date.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        match &self.kind {
            PatternKind::Format(tokens) => scan_fields(tokens, text)?.date(),
            PatternKind::IsoLocalDate => parse_iso_local_date(text),
            PatternKind::IsoDate => parse_iso_date(text),
            PatternKind::IsoLocalDateTime => parse_iso_local_date_time(text).map(|value| value.date()),
            PatternKind::IsoDateTime => parse_iso_date_time(text).map(|value| value.date()),
        }
    }

    /// Parses the whole of `text` as a date and time; hour and minute are required.
    pub fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        match &self.kind {
            PatternKind::Format(tokens) => {
                let fields = scan_fields(tokens, text)?;
                Some(fields.date()?.and_time(fields.time()?))
            }
            PatternKind::IsoLocalDate | PatternKind::IsoDate => None,
            PatternKind::IsoLocalDateTime => parse_iso_local_date_time(text),
            PatternKind::IsoDateTime => parse_iso_date_time(text),
        }
    }
}

/// The two ordered pattern lists consulted by [`TemporalParser`].
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalPatterns {
    date: Vec<TemporalPattern>,
    datetime: Vec<TemporalPattern>,
}

impl TemporalPatterns {
    /// Uses the lists exactly as given, without ISO fallbacks.
    pub fn new(date: Vec<TemporalPattern>, datetime: Vec<TemporalPattern>) -> Self {
        Self { date, datetime }
    }

    /// [`DATE_FORMATS`] and [`DATETIME_FORMATS`] followed by the ISO fallbacks.
    pub fn standard() -> Self {
        let compile_all = |formats: &[&str]| -> Vec<TemporalPattern> {
            formats
                .iter()
                .filter_map(|format| TemporalPattern::compile(format).ok())
                .collect()
        };
        let mut date = compile_all(&DATE_FORMATS);
        date.extend([TemporalPattern::iso_local_date(), TemporalPattern::iso_date()]);
        let mut datetime = compile_all(&DATETIME_FORMATS);
        datetime.extend([
            TemporalPattern::iso_local_date_time(),
            TemporalPattern::iso_date_time(),
        ]);
        Self { date, datetime }
    }

    /// Compiles custom format lists, appending the ISO fallbacks to each.
    pub fn from_formats(
        date_formats: &[&str],
        datetime_formats: &[&str],
    ) -> Result<Self, PatternError> {
        let mut date = date_formats
            .iter()
            .map(|format| TemporalPattern::compile(format))
            .collect::<Result<Vec<_>, _>>()?;
        date.extend([TemporalPattern::iso_local_date(), TemporalPattern::iso_date()]);
        let mut datetime = datetime_formats
            .iter()
            .map(|format| TemporalPattern::compile(format))
            .collect::<Result<Vec<_>, _>>()?;
        datetime.extend([
            TemporalPattern::iso_local_date_time(),
            TemporalPattern::iso_date_time(),
        ]);
        Ok(Self { date, datetime })
    }

    pub fn date_patterns(&self) -> &[TemporalPattern] {
        &self.date
    }

    pub fn datetime_patterns(&self) -> &[TemporalPattern] {
        &self.datetime
    }
}

impl Default for TemporalPatterns {
    fn default() -> Self {
        Self::standard()
    }
}

/// A successful parse together with the pattern that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalMatch<'p, T> {
    pub value: T,
    pub pattern: &'p TemporalPattern,
}

/// Parses dates and date-times against injected pattern lists.
#[derive(Debug, Clone)]
pub struct TemporalParser {
    patterns: Arc<TemporalPatterns>,
}

impl Default for TemporalParser {
    fn default() -> Self {
        Self::standard()
    }
}

impl TemporalParser {
    pub fn new(patterns: Arc<TemporalPatterns>) -> Self {
        Self { patterns }
    }

    /// Parser over [`TemporalPatterns::standard`].
    pub fn standard() -> Self {
        Self::new(Arc::new(TemporalPatterns::standard()))
    }

    pub fn patterns(&self) -> &TemporalPatterns {
        &self.patterns
    }

    /// First date pattern matching the trimmed text, in list order.
    pub fn match_date(&self, text: &str) -> Option<TemporalMatch<'_, NaiveDate>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.patterns.date.iter().find_map(|pattern| {
            pattern
                .parse_date(trimmed)
                .map(|value| TemporalMatch { value, pattern })
        })
    }

    /// First date+time pattern matching the trimmed text; when none does, the
    /// first matching date pattern at midnight.
    pub fn match_datetime(&self, text: &str) -> Option<TemporalMatch<'_, NaiveDateTime>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.patterns
            .datetime
            .iter()
            .find_map(|pattern| {
                pattern
                    .parse_datetime(trimmed)
                    .map(|value| TemporalMatch { value, pattern })
            })
            .or_else(|| {
                self.match_date(trimmed).map(|found| TemporalMatch {
                    value: found.value.and_time(NaiveTime::MIN),
                    pattern: found.pattern,
                })
            })
    }

    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let parsed = self.match_date(text).map(|found| found.value);
        if parsed.is_none() && !text.trim().is_empty() {
            debug!(raw = redact_value(text.trim()), "date matched no pattern");
        }
        parsed
    }

    pub fn parse_datetime(&self, text: &str) -> Option<NaiveDateTime> {
        let parsed = self.match_datetime(text).map(|found| found.value);
        if parsed.is_none() && !text.trim().is_empty() {
            debug!(raw = redact_value(text.trim()), "date-time matched no pattern");
        }
        parsed
    }
}
