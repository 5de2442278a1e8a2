use crate::config::ConfigError;
use crate::consts::{MAX_DELTA_DAYS, MICROS_PER_SECOND, SECONDS_PER_DAY};
use crate::prelude::*;
use crate::{ParseError, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A timedelta unit, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DeltaUnit {
    #[display(fmt = "weeks")]
    Weeks,
    #[display(fmt = "days")]
    Days,
    #[display(fmt = "hours")]
    Hours,
    #[display(fmt = "minutes")]
    Minutes,
    #[display(fmt = "seconds")]
    Seconds,
    #[display(fmt = "microseconds")]
    Microseconds,
}

/// All units in significance order; positional values walk down this list.
const UNITS: [DeltaUnit; 6] = [
    DeltaUnit::Weeks,
    DeltaUnit::Days,
    DeltaUnit::Hours,
    DeltaUnit::Minutes,
    DeltaUnit::Seconds,
    DeltaUnit::Microseconds,
];

impl DeltaUnit {
    const fn name(self) -> &'static str {
        match self {
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Microseconds => "microseconds",
        }
    }

    /// Resolves a caller-supplied key: the first unit (in significance order)
    /// whose name the key contains or starts; `"h"` is hours, `"m"` is
    /// minutes, `"mic"` is microseconds. ASCII case-insensitive.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidUnit` when nothing matches.
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        let wanted = key.to_ascii_lowercase();
        if wanted.is_empty() {
            return Err(ConfigError::InvalidUnit(key.to_string()));
        }
        UNITS
            .into_iter()
            .find(|unit| wanted.contains(unit.name()) || unit.name().starts_with(&wanted))
            .ok_or_else(|| ConfigError::InvalidUnit(key.to_string()))
    }

    /// Prefix-only matching for labels found inside the input string.
    fn from_label(label: &str) -> Option<Self> {
        let wanted = label.to_ascii_lowercase();
        UNITS
            .into_iter()
            .find(|unit| unit.name().starts_with(&wanted))
    }
}

impl std::str::FromStr for DeltaUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// A signed duration normalized to days, seconds and microseconds.
///
/// Seconds (`0..86_400`) and microseconds (`0..1_000_000`) are always
/// non-negative; the sign lives in the day count, so minus one second is
/// `-1 day, 23:59:59`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Into, Serialize, Deserialize,
)]
#[serde(try_from = "(i64, u32, u32)", into = "(i64, u32, u32)")]
pub struct TimeDelta {
    days: i64,
    seconds: u32,
    microseconds: u32,
}

impl TimeDelta {
    /// The zero-length duration
    pub const ZERO: Self = Self {
        days: 0,
        seconds: 0,
        microseconds: 0,
    };

    /// Creates a normalized duration from possibly-unnormalized parts.
    ///
    /// # Errors
    /// Returns `ParseError::DeltaOutOfRange` when the normalized day count
    /// exceeds `MAX_DELTA_DAYS` in magnitude.
    pub fn new(days: i64, seconds: i64, microseconds: i64) -> Result<Self, ParseError> {
        Self::normalize(
            i128::from(days),
            i128::from(seconds),
            i128::from(microseconds),
        )
    }

    pub(crate) fn normalize(days: i128, seconds: i128, microseconds: i128) -> Result<Self, ParseError> {
        let micros_per_second = i128::from(MICROS_PER_SECOND);
        let micros_per_day = i128::from(SECONDS_PER_DAY) * micros_per_second;
        let total = days
            .checked_mul(micros_per_day)
            .and_then(|total| total.checked_add(seconds.checked_mul(micros_per_second)?))
            .and_then(|total| total.checked_add(microseconds))
            .ok_or(ParseError::DeltaOutOfRange)?;
        let days = total.div_euclid(micros_per_day);
        let rest = total.rem_euclid(micros_per_day);
        if days.abs() > i128::from(MAX_DELTA_DAYS) {
            return Err(ParseError::DeltaOutOfRange);
        }
        Ok(Self {
            days: days as i64,
            seconds: (rest / micros_per_second) as u32,
            microseconds: (rest % micros_per_second) as u32,
        })
    }

    /// The signed day count; between -999,999,999 and 999,999,999, inclusive.
    #[inline]
    pub const fn days(&self) -> i64 {
        self.days
    }

    /// The second-of-day remainder; between 0 and 86,399, inclusive.
    #[inline]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// The microsecond remainder; between 0 and 999,999, inclusive.
    #[inline]
    pub const fn microseconds(&self) -> u32 {
        self.microseconds
    }

    /// Total duration in (possibly fractional) seconds
    pub fn total_seconds(&self) -> f64 {
        self.days as f64 * f64::from(SECONDS_PER_DAY)
            + f64::from(self.seconds)
            + f64::from(self.microseconds) / f64::from(MICROS_PER_SECOND)
    }
}

impl TryFrom<(i64, u32, u32)> for TimeDelta {
    type Error = ParseError;

    fn try_from(value: (i64, u32, u32)) -> Result<Self, Self::Error> {
        Self::new(value.0, i64::from(value.1), i64::from(value.2))
    }
}

impl fmt::Display for TimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days != 0 {
            let plural = if self.days.abs() == 1 { "" } else { "s" };
            write!(f, "{} day{plural}, ", self.days)?;
        }
        let hours = self.seconds / 3600;
        let minutes = self.seconds % 3600 / 60;
        let seconds = self.seconds % 60;
        write!(f, "{hours}:{minutes:02}:{seconds:02}")?;
        if self.microseconds > 0 {
            write!(f, ".{:06}", self.microseconds)?;
        }
        Ok(())
    }
}

/// Scans signed integers and letter runs from the input, in order.
/// Everything else counts as free-form separators. Returns `None` when a
/// number does not fit an `i64`.
fn scan(input: &str) -> Option<(Vec<i64>, Vec<&str>)> {
    let mut values = Vec::new();
    let mut labels = Vec::new();
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        let signed = (c == '+' || c == '-')
            && rest[1..].chars().next().is_some_and(|d| d.is_ascii_digit());
        if c.is_ascii_digit() || signed {
            let skip = usize::from(signed);
            let end = rest[skip..]
                .find(|d: char| !d.is_ascii_digit())
                .map_or(rest.len(), |at| at + skip);
            values.push(rest[..end].parse().ok()?);
            rest = &rest[end..];
        } else if c.is_ascii_alphabetic() {
            let end = rest
                .find(|d: char| !d.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            labels.push(&rest[..end]);
            rest = &rest[end..];
        } else {
            rest = &rest[c.len_utf8()..];
        }
    }
    Some((values, labels))
}

/// Parses a duration string: either labeled magnitudes (`"1h 2m 3s"`) or
/// bare magnitudes assigned to consecutive units from `start` downwards
/// (`"1, 2, 3"` from hours is one hour, two minutes, three seconds).
pub(crate) fn parse_timedelta(input: &str, start: DeltaUnit) -> Result<TimeDelta, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let no_match = || ParseError::NoMatch {
        input: input.to_string(),
        kind: ValueKind::Timedelta,
    };

    let (values, labels) = scan(trimmed).ok_or_else(no_match)?;
    let mut pairs: Vec<(DeltaUnit, i64)> = Vec::new();
    if labels.is_empty() {
        let from = UNITS.iter().position(|&unit| unit == start).unwrap_or(0);
        let units = &UNITS[from..];
        if values.is_empty() || values.len() > units.len() {
            return Err(no_match());
        }
        pairs.extend(units.iter().copied().zip(values));
    } else {
        if labels.len() != values.len() {
            return Err(no_match());
        }
        for (label, value) in labels.into_iter().zip(values) {
            let unit = DeltaUnit::from_label(label).ok_or_else(no_match)?;
            if pairs.iter().any(|&(seen, _)| seen == unit) {
                return Err(no_match());
            }
            pairs.push((unit, value));
        }
    }

    let mut days: i128 = 0;
    let mut seconds: i128 = 0;
    let mut microseconds: i128 = 0;
    for (unit, value) in pairs {
        let value = i128::from(value);
        match unit {
            DeltaUnit::Weeks => days += value * 7,
            DeltaUnit::Days => days += value,
            DeltaUnit::Hours => seconds += value * 3600,
            DeltaUnit::Minutes => seconds += value * 60,
            DeltaUnit::Seconds => seconds += value,
            DeltaUnit::Microseconds => microseconds += value,
        }
    }
    TimeDelta::normalize(days, seconds, microseconds)
}
