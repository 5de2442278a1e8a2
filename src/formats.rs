use crate::config::{
    ConfigError, DateField, DateOptions, DatetimeOptions, Endian, OptionValue, TimeOptions,
};
use crate::consts::MICROSEC_SEPS;
use crate::types::{Date, DateTime, Month, Time, Year};
use crate::{ParseError, ValueKind};

/// How many time components a layout carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeFields {
    Hour,
    HourMinute,
    HourMinuteSecond,
}

impl TimeFields {
    const fn count(self) -> usize {
        match self {
            Self::Hour => 1,
            Self::HourMinute => 2,
            Self::HourMinuteSecond => 3,
        }
    }
}

/// One accepted time layout: separator, component count and an optional
/// fractional-second separator. `sep: None` matches the compact two-digit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat {
    sep: Option<char>,
    fields: TimeFields,
    micro_sep: Option<char>,
}

impl TimeFormat {
    fn matches(&self, input: &str) -> Option<Time> {
        let (body, microsecond) = match self.micro_sep {
            Some(micro_sep) => {
                let (body, frac) = input.rsplit_once(micro_sep)?;
                (body, parse_fraction(frac)?)
            }
            None => (input, 0),
        };
        let count = self.fields.count();
        let mut parts = [0_u8; 3];
        match self.sep {
            Some(sep) => {
                let mut filled = 0;
                for token in body.split(sep) {
                    if filled == count {
                        return None;
                    }
                    parts[filled] = two_digit(token)?;
                    filled += 1;
                }
                if filled != count {
                    return None;
                }
            }
            None if count == 1 => parts[0] = two_digit(body)?,
            None => decompose_fixed(body, &mut parts[..count])?,
        }
        Time::new(parts[0], parts[1], parts[2], microsecond).ok()
    }
}

/// One date component within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateCode {
    Day,
    MonthNum,
    MonthAbbr,
    MonthName,
    YearShort,
    YearFull,
}

/// One accepted date layout: separator plus an ordered component list.
/// Layouts without a year (or without year and month) are completed from the
/// reference date after matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    sep: Option<char>,
    codes: Vec<DateCode>,
}

/// Components extracted by a date layout before completion.
#[derive(Debug, Default, Clone, Copy)]
struct RawDate {
    year: Option<u16>,
    month: Option<u8>,
    day: Option<u8>,
}

impl DateFormat {
    fn matches(&self, input: &str, today: Date) -> Option<Date> {
        let mut raw = RawDate::default();
        if let [code] = self.codes[..] {
            apply_code(&mut raw, code, input)?;
            return complete_date(raw, today);
        }
        match self.sep {
            Some(sep) => {
                let mut filled = 0;
                for token in input.split(sep) {
                    let code = *self.codes.get(filled)?;
                    apply_code(&mut raw, code, token)?;
                    filled += 1;
                }
                if filled != self.codes.len() {
                    return None;
                }
            }
            None => {
                let mut rest = input;
                for &code in &self.codes {
                    rest = consume_compact(&mut raw, code, rest)?;
                }
                if !rest.is_empty() {
                    return None;
                }
            }
        }
        complete_date(raw, today)
    }
}

/// Matches one separated token against a component code.
fn apply_code(raw: &mut RawDate, code: DateCode, token: &str) -> Option<()> {
    match code {
        DateCode::Day => raw.day = Some(two_digit(token)?),
        DateCode::MonthNum => raw.month = Some(two_digit(token)?),
        DateCode::MonthAbbr => raw.month = Some(Month::from_abbr(token)?.get()),
        DateCode::MonthName => raw.month = Some(Month::from_name(token)?.get()),
        DateCode::YearShort => raw.year = Some(Year::from_short(two_digit(token)?).ok()?.get()),
        DateCode::YearFull => raw.year = Some(full_year(token)?),
    }
    Some(())
}

/// Consumes one component from the front of a compact (separator-less) input.
/// Numeric components occupy fixed widths: two digits, four for a full year.
fn consume_compact<'a>(raw: &mut RawDate, code: DateCode, rest: &'a str) -> Option<&'a str> {
    match code {
        DateCode::Day => {
            let (head, tail) = take_digits(rest, 2)?;
            raw.day = Some(head.parse().ok()?);
            Some(tail)
        }
        DateCode::MonthNum => {
            let (head, tail) = take_digits(rest, 2)?;
            raw.month = Some(head.parse().ok()?);
            Some(tail)
        }
        DateCode::MonthAbbr => {
            let (head, tail) = rest.split_at_checked(3)?;
            if !head.bytes().all(|b| b.is_ascii_alphabetic()) {
                return None;
            }
            raw.month = Some(Month::from_abbr(head)?.get());
            Some(tail)
        }
        DateCode::MonthName => {
            let end = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            let (head, tail) = rest.split_at(end);
            raw.month = Some(Month::from_name(head)?.get());
            Some(tail)
        }
        DateCode::YearShort => {
            let (head, tail) = take_digits(rest, 2)?;
            raw.year = Some(Year::from_short(head.parse().ok()?).ok()?.get());
            Some(tail)
        }
        DateCode::YearFull => {
            let (head, tail) = take_digits(rest, 4)?;
            raw.year = Some(head.parse().ok()?);
            Some(tail)
        }
    }
}

/// Fills missing components from the reference date and validates the result.
fn complete_date(raw: RawDate, today: Date) -> Option<Date> {
    let year = raw.year.unwrap_or_else(|| today.year());
    let month = raw.month.unwrap_or_else(|| today.month());
    Date::new(year, month, raw.day?).ok()
}

/// An ordered list of time layouts, regenerated from [`TimeOptions`].
#[derive(Debug, Clone)]
pub struct TimeFormats {
    options: TimeOptions,
    candidates: Vec<TimeFormat>,
}

impl TimeFormats {
    /// A registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from validated options.
    ///
    /// # Errors
    /// Returns `ConfigError` if the options are unusable.
    pub fn with_options(options: TimeOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let candidates = generate_time(&options);
        Ok(Self {
            options,
            candidates,
        })
    }

    /// Replaces the configuration and regenerates the layout list.
    ///
    /// # Errors
    /// Returns `ConfigError` on unusable options; the registry is untouched.
    pub fn config(&mut self, options: TimeOptions) -> Result<(), ConfigError> {
        *self = Self::with_options(options)?;
        Ok(())
    }

    /// Updates a single option by name and regenerates the layout list.
    ///
    /// # Errors
    /// Returns `ConfigError` on an unrecognized name or unusable value; the
    /// registry is untouched.
    pub fn set(&mut self, option: &str, value: OptionValue) -> Result<(), ConfigError> {
        let mut options = self.options.clone();
        options.set(option, value)?;
        self.config(options)
    }

    /// Returns the active configuration
    pub const fn options(&self) -> &TimeOptions {
        &self.options
    }

    /// Returns the generated layouts in priority order
    pub fn candidates(&self) -> &[TimeFormat] {
        &self.candidates
    }

    /// Parses a time-of-day string against the layouts in priority order.
    ///
    /// # Errors
    /// Returns `ParseError::EmptyInput` for blank input and
    /// `ParseError::NoMatch` when no layout accepts the string.
    pub fn parse(&self, input: &str) -> Result<Time, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        for candidate in &self.candidates {
            if let Some(time) = candidate.matches(trimmed) {
                return Ok(time);
            }
        }
        if self.options.try_hard {
            if let Some(time) = permissive_time(trimmed) {
                return Ok(time);
            }
        }
        Err(ParseError::NoMatch {
            input: input.to_string(),
            kind: ValueKind::Time,
        })
    }
}

impl Default for TimeFormats {
    fn default() -> Self {
        let options = TimeOptions::default();
        let candidates = generate_time(&options);
        Self {
            options,
            candidates,
        }
    }
}

/// An ordered list of date layouts, regenerated from [`DateOptions`].
#[derive(Debug, Clone)]
pub struct DateFormats {
    options: DateOptions,
    candidates: Vec<DateFormat>,
}

impl DateFormats {
    /// A registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from validated options.
    ///
    /// # Errors
    /// Returns `ConfigError` if the options are unusable.
    pub fn with_options(options: DateOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let candidates = generate_date(&options);
        Ok(Self {
            options,
            candidates,
        })
    }

    /// Replaces the configuration and regenerates the layout list.
    ///
    /// # Errors
    /// Returns `ConfigError` on unusable options; the registry is untouched.
    pub fn config(&mut self, options: DateOptions) -> Result<(), ConfigError> {
        *self = Self::with_options(options)?;
        Ok(())
    }

    /// Updates a single option by name and regenerates the layout list.
    ///
    /// # Errors
    /// Returns `ConfigError` on an unrecognized name or unusable value; the
    /// registry is untouched.
    pub fn set(&mut self, option: &str, value: OptionValue) -> Result<(), ConfigError> {
        let mut options = self.options.clone();
        options.set(option, value)?;
        self.config(options)
    }

    /// Returns the active configuration
    pub const fn options(&self) -> &DateOptions {
        &self.options
    }

    /// Returns the generated layouts in priority order
    pub fn candidates(&self) -> &[DateFormat] {
        &self.candidates
    }

    /// Parses a date string against the layouts in priority order, completing
    /// missing components from `today`.
    ///
    /// # Errors
    /// Returns `ParseError::EmptyInput` for blank input and
    /// `ParseError::NoMatch` when no layout accepts the string.
    pub fn parse(&self, input: &str, today: Date) -> Result<Date, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        for candidate in &self.candidates {
            if let Some(date) = candidate.matches(trimmed, today) {
                return Ok(date);
            }
        }
        if self.options.try_hard {
            if let Some(date) = permissive_date(trimmed, &self.options, today) {
                return Ok(date);
            }
        }
        Err(ParseError::NoMatch {
            input: input.to_string(),
            kind: ValueKind::Date,
        })
    }
}

impl Default for DateFormats {
    fn default() -> Self {
        let options = DateOptions::default();
        let candidates = generate_date(&options);
        Self {
            options,
            candidates,
        }
    }
}

/// Splits datetime strings on the configured separators and delegates the
/// halves to a nested date and time registry.
#[derive(Debug, Clone)]
pub struct DatetimeFormats {
    options: DatetimeOptions,
    date: DateFormats,
    time: TimeFormats,
}

impl DatetimeFormats {
    /// A registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from validated options. A `try_hard` at this level
    /// is pushed down into the nested date and time options.
    ///
    /// # Errors
    /// Returns `ConfigError` if the options are unusable.
    pub fn with_options(options: DatetimeOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let mut options = options;
        if options.try_hard {
            options.date.try_hard = true;
            options.time.try_hard = true;
        }
        let date = DateFormats::with_options(options.date.clone())?;
        let time = TimeFormats::with_options(options.time.clone())?;
        Ok(Self {
            options,
            date,
            time,
        })
    }

    /// Replaces the configuration and regenerates the nested registries.
    ///
    /// # Errors
    /// Returns `ConfigError` on unusable options; the registry is untouched.
    pub fn config(&mut self, options: DatetimeOptions) -> Result<(), ConfigError> {
        *self = Self::with_options(options)?;
        Ok(())
    }

    /// Updates a single option by name (`date_*`/`time_*` names reach the
    /// nested option sets) and regenerates the nested registries.
    ///
    /// # Errors
    /// Returns `ConfigError` on an unrecognized name or unusable value; the
    /// registry is untouched.
    pub fn set(&mut self, option: &str, value: OptionValue) -> Result<(), ConfigError> {
        let mut options = self.options.clone();
        options.set(option, value)?;
        self.config(options)
    }

    /// Returns the active configuration
    pub const fn options(&self) -> &DatetimeOptions {
        &self.options
    }

    /// Returns the nested date registry
    pub const fn date_formats(&self) -> &DateFormats {
        &self.date
    }

    /// Returns the nested time registry
    pub const fn time_formats(&self) -> &TimeFormats {
        &self.time
    }

    /// Parses a datetime string. Every occurrence of every configured
    /// separator is tried as the date/time boundary, in priority order; a
    /// date-only input completes with midnight and a time-only input takes
    /// its date from `today`.
    ///
    /// # Errors
    /// Returns `ParseError::EmptyInput` for blank input and
    /// `ParseError::NoMatch` when no split succeeds.
    pub fn parse(&self, input: &str, today: Date) -> Result<DateTime, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        for &sep in &self.options.seps {
            for (at, matched) in trimmed.match_indices(sep) {
                if let Some(datetime) = self.try_split(trimmed, at, matched.len(), today) {
                    return Ok(datetime);
                }
            }
        }
        if self.options.allow_no_sep {
            if let Ok(date) = self.date.parse(trimmed, today) {
                return Ok(DateTime::new(date, Time::MIDNIGHT));
            }
            if let Ok(time) = self.time.parse(trimmed) {
                return Ok(DateTime::new(today, time));
            }
        }
        if self.options.try_hard {
            for (at, c) in trimmed.char_indices() {
                if c.is_alphanumeric() {
                    continue;
                }
                if let Some(datetime) = self.try_split(trimmed, at, c.len_utf8(), today) {
                    return Ok(datetime);
                }
            }
        }
        Err(ParseError::NoMatch {
            input: input.to_string(),
            kind: ValueKind::Datetime,
        })
    }

    fn try_split(&self, input: &str, at: usize, sep_len: usize, today: Date) -> Option<DateTime> {
        let date_part = &input[..at];
        let time_part = &input[at + sep_len..];
        if date_part.is_empty() || time_part.is_empty() {
            return None;
        }
        let date = self.date.parse(date_part, today).ok()?;
        let time = self.time.parse(time_part).ok()?;
        Some(DateTime::new(date, time))
    }
}

impl Default for DatetimeFormats {
    fn default() -> Self {
        Self {
            options: DatetimeOptions::default(),
            date: DateFormats::default(),
            time: TimeFormats::default(),
        }
    }
}

// --- layout generation ---

fn sep_slots(seps: &[char], allow_no_sep: bool) -> Vec<Option<char>> {
    let mut slots: Vec<Option<char>> = seps.iter().copied().map(Some).collect();
    if allow_no_sep {
        slots.push(None);
    }
    slots
}

fn generate_time(options: &TimeOptions) -> Vec<TimeFormat> {
    let mut formats = Vec::new();
    if options.figures[0] {
        formats.push(TimeFormat {
            sep: None,
            fields: TimeFields::Hour,
            micro_sep: None,
        });
    }
    for sep in sep_slots(&options.seps, options.allow_no_sep) {
        if options.figures[1] {
            formats.push(TimeFormat {
                sep,
                fields: TimeFields::HourMinute,
                micro_sep: None,
            });
        }
        if options.figures[2] {
            formats.push(TimeFormat {
                sep,
                fields: TimeFields::HourMinuteSecond,
                micro_sep: None,
            });
            if options.allow_microsec {
                for micro_sep in MICROSEC_SEPS {
                    formats.push(TimeFormat {
                        sep,
                        fields: TimeFields::HourMinuteSecond,
                        micro_sep: Some(micro_sep),
                    });
                }
            }
        }
    }
    formats
}

const fn field_code(field: DateField, year: DateCode, month: DateCode) -> DateCode {
    match field {
        DateField::Year => year,
        DateField::Month => month,
        DateField::Day => DateCode::Day,
    }
}

fn generate_date(options: &DateOptions) -> Vec<DateFormat> {
    let month_codes: &[DateCode] = if options.allow_month_name {
        &[DateCode::MonthNum, DateCode::MonthAbbr, DateCode::MonthName]
    } else {
        &[DateCode::MonthNum]
    };
    let year_codes: &[DateCode] = if options.allow_short_year {
        &[DateCode::YearShort, DateCode::YearFull]
    } else {
        &[DateCode::YearFull]
    };
    let order = options.endian.order();
    let slots = sep_slots(&options.seps, options.allow_no_sep);

    let mut formats = Vec::new();
    if options.figures[0] {
        formats.push(DateFormat {
            sep: None,
            codes: vec![DateCode::Day],
        });
    }
    for &sep in &slots {
        // year-less pairs first: compact digit strings prefer the
        // day/month reading over a short-year triple
        if options.figures[1] {
            for &month in month_codes {
                let codes = order
                    .iter()
                    .filter(|&&field| field != DateField::Year)
                    .map(|&field| field_code(field, DateCode::YearFull, month))
                    .collect();
                formats.push(DateFormat { sep, codes });
            }
        }
        if options.figures[2] {
            for &year in year_codes {
                for &month in month_codes {
                    let codes = order
                        .iter()
                        .map(|&field| field_code(field, year, month))
                        .collect();
                    formats.push(DateFormat { sep, codes });
                }
            }
        }
    }
    // a leading four-digit year orders itself; only all-two-digit triplets
    // are ambiguous enough to need the endian setting
    if options.endian != Endian::Big && options.figures[2] {
        for &sep in &slots {
            for &month in month_codes {
                formats.push(DateFormat {
                    sep,
                    codes: vec![DateCode::YearFull, month, DateCode::Day],
                });
            }
        }
    }
    formats
}

// --- token helpers ---

fn two_digit(token: &str) -> Option<u8> {
    if token.is_empty() || token.len() > 2 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn full_year(token: &str) -> Option<u16> {
    if token.len() < 3 || token.len() > 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn take_digits(rest: &str, width: usize) -> Option<(&str, &str)> {
    let (head, tail) = rest.split_at_checked(width)?;
    head.bytes()
        .all(|b| b.is_ascii_digit())
        .then_some((head, tail))
}

fn decompose_fixed(body: &str, parts: &mut [u8]) -> Option<()> {
    if body.len() != parts.len() * 2 {
        return None;
    }
    let mut rest = body;
    for slot in parts.iter_mut() {
        let (head, tail) = take_digits(rest, 2)?;
        *slot = head.parse().ok()?;
        rest = tail;
    }
    Some(())
}

/// 1-6 fractional digits, right-padded to microseconds (".5" is 500000)
fn parse_fraction(frac: &str) -> Option<u32> {
    if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = frac.parse().ok()?;
    Some(value * 10_u32.pow(6 - frac.len() as u32))
}

// --- permissive (try_hard) matching ---

/// Splits on any non-digit run; 1-3 numeric tokens are hour/minute/second.
/// A fourth token is a fraction, accepted only directly behind a `'.'`.
/// Letters anywhere disqualify the input.
fn permissive_time(input: &str) -> Option<Time> {
    if input
        .chars()
        .any(|c| c.is_alphanumeric() && !c.is_ascii_digit())
    {
        return None;
    }
    let mut tokens: Vec<(usize, &str)> = Vec::new();
    let mut start = None;
    for (at, c) in input.char_indices() {
        if c.is_ascii_digit() {
            if start.is_none() {
                start = Some(at);
            }
        } else if let Some(from) = start.take() {
            tokens.push((from, &input[from..at]));
        }
    }
    if let Some(from) = start {
        tokens.push((from, &input[from..]));
    }

    let (parts, microsecond) = match tokens.len() {
        1..=3 => (&tokens[..], 0),
        4 => {
            let (at, frac) = tokens[3];
            if !input[..at].ends_with('.') {
                return None;
            }
            (&tokens[..3], parse_fraction(frac)?)
        }
        _ => return None,
    };
    let mut fields = [0_u8; 3];
    for (slot, &(_, token)) in fields.iter_mut().zip(parts) {
        *slot = two_digit(token)?;
    }
    Time::new(fields[0], fields[1], fields[2], microsecond).ok()
}

/// Splits on any non-alphanumeric run and assigns 1-3 tokens to date slots:
/// a unique month-name token claims the month, a unique 3-4-digit token
/// claims the year, the remaining numeric tokens fill the remaining slots in
/// endian order.
fn permissive_date(input: &str, options: &DateOptions, today: Date) -> Option<Date> {
    let tokens: Vec<&str> = input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.is_empty() || tokens.len() > 3 {
        return None;
    }

    let mut raw = RawDate::default();
    let mut numeric = Vec::new();
    for token in tokens {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            numeric.push(token);
        } else if let Some(month) = Month::from_abbr(token).or_else(|| Month::from_name(token)) {
            if raw.month.is_some() {
                return None;
            }
            raw.month = Some(month.get());
        } else {
            return None;
        }
    }

    // a unique long numeric token is the year, wherever it appears
    let long_count = numeric.iter().filter(|token| token.len() > 2).count();
    if long_count > 1 {
        return None;
    }
    if long_count == 1 {
        let at = numeric.iter().position(|token| token.len() > 2)?;
        raw.year = Some(full_year(numeric.remove(at))?);
    }

    let free: Vec<DateField> = options
        .endian
        .order()
        .into_iter()
        .filter(|field| match field {
            DateField::Year => raw.year.is_none(),
            DateField::Month => raw.month.is_none(),
            DateField::Day => true,
        })
        .collect();
    if numeric.len() > free.len() {
        return None;
    }
    for (token, field) in numeric.iter().zip(free) {
        match field {
            DateField::Day => raw.day = Some(two_digit(token)?),
            DateField::Month => raw.month = Some(two_digit(token)?),
            DateField::Year => raw.year = Some(Year::from_short(two_digit(token)?).ok()?.get()),
        }
    }
    complete_date(raw, today)
}
