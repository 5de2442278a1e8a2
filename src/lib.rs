//! Parse free-form time, date, datetime and duration strings.
//!
//! Every parser tries an ordered list of accepted layouts and returns the
//! first match; the lists are regenerated from plain option structs, so a
//! caller decides which separators, component orders and shorthand forms are
//! acceptable. Partial dates are completed from a configurable reference
//! date.
//!
//! ```
//! use timestr::{parsedate, parsetime};
//!
//! let time = parsetime("23:44:05")?;
//! assert_eq!((time.hour(), time.minute(), time.second()), (23, 44, 5));
//!
//! let date = parsedate("24 Apr 2013")?;
//! assert_eq!((date.year(), date.month(), date.day()), (2013, 4, 24));
//! # Ok::<(), timestr::ParseError>(())
//! ```

mod config;
mod consts;
mod delta;
mod formats;
mod prelude;
mod types;

pub use config::{
    ConfigError, DateField, DateOptions, DatetimeOptions, Endian, OptionValue, TimeOptions, Today,
};
pub use consts::*;
pub use delta::{DeltaUnit, TimeDelta};
pub use formats::{DateFormat, DateFormats, DatetimeFormats, TimeFormat, TimeFormats};
pub use types::{Date, DateTime, Day, Month, Time, Year};

use crate::prelude::*;
use serde::Deserialize;
use std::str::FromStr;

/// What a parser was asked to produce; names the failed conversion in
/// [`ParseError::NoMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValueKind {
    #[display(fmt = "time")]
    Time,
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "datetime")]
    Datetime,
    #[display(fmt = "timedelta")]
    Timedelta,
}

/// Error type for parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    /// No accepted layout matched the input; carries the offending string.
    #[display(fmt = "couldn't parse '{input}' as {kind}")]
    NoMatch { input: String, kind: ValueKind },
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Invalid hour: {} (must be 0-23)", "_0")]
    InvalidHour(u8),
    #[display(fmt = "Invalid minute: {} (must be 0-59)", "_0")]
    InvalidMinute(u8),
    #[display(fmt = "Invalid second: {} (must be 0-59)", "_0")]
    InvalidSecond(u8),
    #[display(fmt = "Invalid microsecond: {} (must be 0-999999)", "_0")]
    InvalidMicrosecond(u32),
    #[display(fmt = "timedelta magnitude exceeds {} days", MAX_DELTA_DAYS)]
    DeltaOutOfRange,
    #[display(fmt = "Empty input string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// A parsing context: the three format registries plus the reference date.
///
/// The registries and the reference date belong to the context, so two
/// contexts never interfere; the top-level functions build a default context
/// per call for quick one-off use.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    time: TimeFormats,
    date: DateFormats,
    datetime: DatetimeFormats,
    today: Today,
}

impl Parser {
    /// A context with default registries and the real current date.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the reference date used to complete partial input
    pub const fn today(&self) -> Date {
        self.today.date()
    }

    /// Replaces the reference date.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidDate` if the triplet is not a real date;
    /// the previous reference date stays in effect.
    pub fn set_today(&mut self, year: u16, month: u8, day: u8) -> Result<(), ConfigError> {
        self.today.set(year, month, day)
    }

    /// Returns the date component order in effect
    pub const fn endian(&self) -> Endian {
        self.date.options().endian
    }

    /// Sets the date component order and regenerates the date and datetime
    /// registries.
    ///
    /// # Errors
    /// Returns `ConfigError` if the stored options no longer validate.
    pub fn set_endian(&mut self, endian: Endian) -> Result<(), ConfigError> {
        let mut date_options = self.date.options().clone();
        date_options.endian = endian;
        self.date.config(date_options)?;
        let mut datetime_options = self.datetime.options().clone();
        datetime_options.date.endian = endian;
        self.datetime.config(datetime_options)
    }

    /// Key-based variant of [`set_endian`]: accepts the keys understood by
    /// [`Endian::from_key`] (`"year"`, `"y"`, `"big"`, ...).
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidEndian` for an unrecognized key.
    ///
    /// [`set_endian`]: Self::set_endian
    pub fn set_endian_key(&mut self, key: &str) -> Result<(), ConfigError> {
        self.set_endian(Endian::from_key(key)?)
    }

    /// Returns the time registry
    pub const fn time_formats(&self) -> &TimeFormats {
        &self.time
    }

    /// Returns the time registry for configuration
    pub fn time_formats_mut(&mut self) -> &mut TimeFormats {
        &mut self.time
    }

    /// Returns the date registry
    pub const fn date_formats(&self) -> &DateFormats {
        &self.date
    }

    /// Returns the date registry for configuration
    pub fn date_formats_mut(&mut self) -> &mut DateFormats {
        &mut self.date
    }

    /// Returns the datetime registry
    pub const fn datetime_formats(&self) -> &DatetimeFormats {
        &self.datetime
    }

    /// Returns the datetime registry for configuration
    pub fn datetime_formats_mut(&mut self) -> &mut DatetimeFormats {
        &mut self.datetime
    }

    /// Parses a time-of-day string.
    ///
    /// # Errors
    /// Returns `ParseError` when no accepted layout matches.
    pub fn parsetime(&self, string: &str) -> Result<Time, ParseError> {
        self.time.parse(string)
    }

    /// Parses a time-of-day string against a caller-supplied registry,
    /// leaving this context untouched.
    ///
    /// # Errors
    /// Returns `ParseError` when no accepted layout matches.
    pub fn parsetime_with(&self, string: &str, formats: &TimeFormats) -> Result<Time, ParseError> {
        formats.parse(string)
    }

    /// Parses a date string, completing missing components from the
    /// reference date.
    ///
    /// # Errors
    /// Returns `ParseError` when no accepted layout matches.
    pub fn parsedate(&self, string: &str) -> Result<Date, ParseError> {
        self.date.parse(string, self.today.date())
    }

    /// Parses a date string against a caller-supplied registry, leaving this
    /// context untouched.
    ///
    /// # Errors
    /// Returns `ParseError` when no accepted layout matches.
    pub fn parsedate_with(&self, string: &str, formats: &DateFormats) -> Result<Date, ParseError> {
        formats.parse(string, self.today.date())
    }

    /// Parses a datetime string; a date-only input completes with midnight
    /// and a time-only input takes its date from the reference date.
    ///
    /// # Errors
    /// Returns `ParseError` when no accepted layout matches.
    pub fn parsedatetime(&self, string: &str) -> Result<DateTime, ParseError> {
        self.datetime.parse(string, self.today.date())
    }

    /// Parses a datetime string against a caller-supplied registry, leaving
    /// this context untouched.
    ///
    /// # Errors
    /// Returns `ParseError` when no accepted layout matches.
    pub fn parsedatetime_with(
        &self,
        string: &str,
        formats: &DatetimeFormats,
    ) -> Result<DateTime, ParseError> {
        formats.parse(string, self.today.date())
    }

    /// Parses a duration string; bare magnitudes count down from weeks.
    ///
    /// # Errors
    /// Returns `ParseError` when the string holds no usable magnitudes.
    pub fn parsetimedelta(&self, string: &str) -> Result<TimeDelta, ParseError> {
        delta::parse_timedelta(string, DeltaUnit::Weeks)
    }

    /// Parses a duration string with bare magnitudes counting down from
    /// `start`.
    ///
    /// # Errors
    /// Returns `ParseError` when the string holds no usable magnitudes.
    pub fn parsetimedelta_with(
        &self,
        string: &str,
        start: DeltaUnit,
    ) -> Result<TimeDelta, ParseError> {
        delta::parse_timedelta(string, start)
    }
}

/// Parses a time-of-day string with the default configuration.
///
/// # Errors
/// Returns `ParseError` when no accepted layout matches.
pub fn parsetime(string: &str) -> Result<Time, ParseError> {
    TimeFormats::new().parse(string)
}

/// Parses a date string with the default configuration, completing missing
/// components from the current date.
///
/// # Errors
/// Returns `ParseError` when no accepted layout matches.
pub fn parsedate(string: &str) -> Result<Date, ParseError> {
    DateFormats::new().parse(string, Date::today())
}

/// Parses a datetime string with the default configuration, completing a
/// missing date from the current date.
///
/// # Errors
/// Returns `ParseError` when no accepted layout matches.
pub fn parsedatetime(string: &str) -> Result<DateTime, ParseError> {
    DatetimeFormats::new().parse(string, Date::today())
}

/// Parses a duration string; bare magnitudes count down from weeks.
///
/// # Errors
/// Returns `ParseError` when the string holds no usable magnitudes.
pub fn parsetimedelta(string: &str) -> Result<TimeDelta, ParseError> {
    delta::parse_timedelta(string, DeltaUnit::Weeks)
}

impl FromStr for Time {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFormats::new().parse(s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFormats::new().parse(s, Self::today())
    }
}

impl FromStr for DateTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatetimeFormats::new().parse(s, Date::today())
    }
}

impl FromStr for TimeDelta {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        delta::parse_timedelta(s, DeltaUnit::Weeks)
    }
}

impl serde::Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser_at(year: u16, month: u8, day: u8) -> Parser {
        let mut parser = Parser::new();
        parser.set_today(year, month, day).unwrap();
        parser
    }

    #[test]
    fn test_parsetime_values() {
        let time = parsetime("23:44").unwrap();
        assert_eq!((time.hour(), time.minute(), time.second()), (23, 44, 0));
        assert_eq!(parsetime("23:44:05").unwrap(), Time::new(23, 44, 5, 0).unwrap());
    }

    #[test]
    fn test_compact_time_gated_by_allow_no_sep() {
        let mut parser = Parser::new();
        assert_eq!(
            parser.parsetime("234405").unwrap(),
            Time::new(23, 44, 5, 0).unwrap()
        );
        parser
            .time_formats_mut()
            .set("allow_no_sep", false.into())
            .unwrap();
        assert!(matches!(
            parser.parsetime("234405"),
            Err(ParseError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_parsedate_numeric_and_month_name_agree() {
        let expected = Date::new(2013, 4, 24).unwrap();
        assert_eq!(parsedate("24.4.13").unwrap(), expected);
        assert_eq!(parsedate("24 Apr 2013").unwrap(), expected);
    }

    #[test]
    fn test_parsedatetime_combined() {
        let datetime = parsedatetime("24-04-13_23:44:05").unwrap();
        assert_eq!(
            datetime,
            DateTime::new(
                Date::new(2013, 4, 24).unwrap(),
                Time::new(23, 44, 5, 0).unwrap()
            )
        );
    }

    #[test]
    fn test_endian_decides_ambiguous_triplets() {
        let mut parser = parser_at(2013, 5, 9);
        parser.set_endian_key("d").unwrap();
        assert_eq!(
            parser.parsedate("01.02.03").unwrap(),
            Date::new(2003, 2, 1).unwrap()
        );
        parser.set_endian_key("y").unwrap();
        assert_eq!(
            parser.parsedate("01.02.03").unwrap(),
            Date::new(2001, 2, 3).unwrap()
        );
        // the datetime registry follows
        let datetime = parser.parsedatetime("01.02.03 23:44").unwrap();
        assert_eq!(datetime.date(), Date::new(2001, 2, 3).unwrap());
    }

    #[test]
    fn test_reference_date_completes_partial_input() {
        let parser = parser_at(2020, 1, 1);
        let datetime = parser.parsedatetime("23:44").unwrap();
        assert_eq!(datetime.date(), Date::new(2020, 1, 1).unwrap());
        assert_eq!(datetime.time(), Time::new(23, 44, 0, 0).unwrap());

        assert_eq!(
            parser.parsedate("20").unwrap(),
            Date::new(2020, 1, 20).unwrap()
        );
        assert_eq!(
            parser.parsedate("20 Apr").unwrap(),
            Date::new(2020, 4, 20).unwrap()
        );
    }

    #[test]
    fn test_unknown_option_fails_without_side_effects() {
        let mut parser = parser_at(2013, 5, 9);
        let err = parser
            .date_formats_mut()
            .set("allow_weeks", true.into())
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownOption("allow_weeks".to_string()));
        // the registry still parses with its previous candidate list
        assert_eq!(
            parser.parsedate("24.4.13").unwrap(),
            Date::new(2013, 4, 24).unwrap()
        );
    }

    #[test]
    fn test_date_roundtrip_over_supported_patterns() {
        let parser = parser_at(2013, 5, 9);
        let dates = [
            Date::new(2013, 4, 24).unwrap(),
            Date::new(2000, 2, 29).unwrap(),
            Date::new(1999, 12, 31).unwrap(),
            Date::new(2069, 1, 1).unwrap(),
        ];
        for date in dates {
            // canonical display (big-endian fallback)
            assert_eq!(date.to_string().parse::<Date>().unwrap(), date);
            // little-endian with four-digit year
            let little = format!("{}.{}.{}", date.day(), date.month(), date.year());
            assert_eq!(parser.parsedate(&little).unwrap(), date);
            // compact little-endian
            let compact = format!("{:02}{:02}{:04}", date.day(), date.month(), date.year());
            assert_eq!(parser.parsedate(&compact).unwrap(), date);
        }
        // month-name layout round-trips too
        assert_eq!(
            parser.parsedate("24 Apr 2013").unwrap(),
            Date::new(2013, 4, 24).unwrap()
        );
    }

    #[test]
    fn test_fromstr_canonical_forms() {
        assert_eq!(
            "2013-04-24".parse::<Date>().unwrap(),
            Date::new(2013, 4, 24).unwrap()
        );
        assert_eq!(
            "23:44:05".parse::<Time>().unwrap(),
            Time::new(23, 44, 5, 0).unwrap()
        );
        let datetime = "2013-04-24 23:44:05".parse::<DateTime>().unwrap();
        assert_eq!(datetime.date(), Date::new(2013, 4, 24).unwrap());
        assert_eq!(datetime.time(), Time::new(23, 44, 5, 0).unwrap());
        assert_eq!(
            "1h 30m".parse::<TimeDelta>().unwrap(),
            TimeDelta::new(0, 5400, 0).unwrap()
        );
    }

    #[test]
    fn test_serde_string_format() {
        let date = Date::new(2013, 4, 24).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#""2013-04-24""#);
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);

        let time = Time::new(23, 44, 5, 0).unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, r#""23:44:05""#);
        let parsed: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(time, parsed);

        let datetime = DateTime::new(date, time);
        let json = serde_json::to_string(&datetime).unwrap();
        assert_eq!(json, r#""2013-04-24 23:44:05""#);
        let parsed: DateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(datetime, parsed);

        let invalid: Result<Date, _> = serde_json::from_str(r#""2013-13-01""#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_parsetimedelta_surface() {
        assert_eq!(
            parsetimedelta("1h 2m 3s").unwrap(),
            TimeDelta::new(0, 3723, 0).unwrap()
        );
        assert_eq!(parsetimedelta("3").unwrap().days(), 21);

        let parser = Parser::new();
        assert_eq!(
            parser
                .parsetimedelta_with("1, 2, 3", DeltaUnit::Hours)
                .unwrap(),
            TimeDelta::new(0, 3723, 0).unwrap()
        );
    }

    #[test]
    fn test_one_shot_registry_does_not_leak() {
        let parser = Parser::new();
        let strict = TimeFormats::with_options(TimeOptions {
            allow_no_sep: false,
            ..TimeOptions::default()
        })
        .unwrap();
        assert!(parser.parsetime_with("234405", &strict).is_err());
        // the context's own registry is untouched
        assert!(parser.parsetime("234405").is_ok());
    }

    #[test]
    fn test_error_carries_offending_input() {
        let err = parsedate("nonsense").unwrap_err();
        assert_eq!(err.to_string(), "couldn't parse 'nonsense' as date");
        let err = parsetime("23;44").unwrap_err();
        assert_eq!(err.to_string(), "couldn't parse '23;44' as time");
    }

    #[test]
    fn test_empty_input_is_an_error_everywhere() {
        assert!(matches!(parsetime(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parsedate(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parsedatetime(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parsetimedelta(""), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_invalid_endian_key_leaves_parser_unchanged() {
        let mut parser = parser_at(2013, 5, 9);
        assert!(matches!(
            parser.set_endian_key("tiny"),
            Err(ConfigError::InvalidEndian(_))
        ));
        assert_eq!(parser.endian(), Endian::Little);
        assert_eq!(
            parser.parsedate("24.4.13").unwrap(),
            Date::new(2013, 4, 24).unwrap()
        );
    }

    #[test]
    fn test_datetime_with_custom_registry() {
        let parser = parser_at(2013, 5, 9);
        let formats = DatetimeFormats::with_options(DatetimeOptions {
            try_hard: true,
            ..DatetimeOptions::default()
        })
        .unwrap();
        let datetime = parser
            .parsedatetime_with("13.04.24#23:44", &formats)
            .unwrap();
        assert_eq!(datetime.date(), Date::new(2024, 4, 13).unwrap());
    }
}
