//! Scalar text forms: datetime patterns and culture-invariant decimal patterns.

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use recordkit_core::DATETIME_FORMAT;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CodecError, Result};

/// Fallback layouts tried when decoding a datetime, after the configured one.
const DATETIME_LAYOUTS: &[&str] = &[
    DATETIME_FORMAT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A validated `chrono` strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn parse(pattern: &str) -> Result<Self> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(CodecError::InvalidFormat {
                pattern: pattern.to_string(),
                reason: "unrecognized strftime specifier".to_string(),
            });
        }
        Ok(Self {
            pattern: pattern.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, value: &NaiveDateTime) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.pattern)).map_err(|_| CodecError::InvalidFormat {
            pattern: self.pattern.clone(),
            reason: "pattern needs a time zone or other missing component".to_string(),
        })?;
        Ok(out)
    }

    /// Parse with this pattern; a date-only pattern yields midnight.
    pub fn parse_value(&self, text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, &self.pattern)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, &self.pattern)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
    }
}

/// Default textual form of a datetime.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Parse a datetime, trying `preferred` first and then the ISO 8601 forms.
pub fn parse_datetime(text: &str, preferred: Option<&DateFormat>) -> Option<NaiveDateTime> {
    let text = text.trim();
    preferred
        .and_then(|format| format.parse_value(text))
        .or_else(|| {
            DATETIME_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|value| value.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Numeric pattern made of `0`, `#`, `,` and at most one `.`.
///
/// `0` is a mandatory digit and `#` an optional one; a `,` in the integer
/// part enables thousands grouping. Values are rounded half away from zero
/// to the number of fraction placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalPattern {
    min_integer: usize,
    min_fraction: u32,
    max_fraction: u32,
    grouping: bool,
}

impl DecimalPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| CodecError::InvalidFormat {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let (integer, fraction) = match pattern.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (pattern, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid("empty pattern"));
        }
        if !integer.chars().all(|c| matches!(c, '0' | '#' | ',')) {
            return Err(invalid("integer part allows only 0, # and ,"));
        }
        if !fraction.chars().all(|c| matches!(c, '0' | '#')) {
            return Err(invalid("fraction part allows only 0 and #"));
        }

        let min_fraction = fraction.chars().filter(|&c| c == '0').count();
        Ok(Self {
            min_integer: integer.chars().filter(|&c| c == '0').count(),
            min_fraction: u32::try_from(min_fraction).map_err(|_| invalid("too many digits"))?,
            max_fraction: u32::try_from(fraction.len()).map_err(|_| invalid("too many digits"))?,
            grouping: integer.contains(','),
        })
    }

    pub fn format(&self, value: Decimal) -> String {
        let rounded =
            value.round_dp_with_strategy(self.max_fraction, RoundingStrategy::MidpointAwayFromZero);
        let digits = rounded.abs().to_string();
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
            None => (digits, String::new()),
        };

        let mut fraction = fraction.trim_end_matches('0').to_string();
        while fraction.len() < self.min_fraction as usize {
            fraction.push('0');
        }

        let integer = integer.trim_start_matches('0');
        let mut integer = format!("{integer:0>width$}", width = self.min_integer);
        if self.grouping {
            integer = group_thousands(&integer);
        }

        let mut out = String::new();
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(&fraction);
        }
        if out.is_empty() || out == "-" {
            out = "0".to_string();
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Parse decimal text produced by a [`DecimalPattern`] or the default form.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();
    let normalized = match cleaned.strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        _ if cleaned.starts_with('.') => format!("0{cleaned}"),
        _ => cleaned,
    };
    Decimal::from_str(&normalized).ok()
}
