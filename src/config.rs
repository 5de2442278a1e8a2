use crate::consts::{DEFAULT_DATETIME_SEPS, DEFAULT_DATE_SEPS, DEFAULT_TIME_SEPS};
use crate::prelude::*;
use crate::types::Date;

/// Error type for configuration and setter calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Option name is not recognized by the targeted option set.
    #[error("unrecognized option '{0}'")]
    UnknownOption(String),

    /// Option name is recognized but the supplied value is unusable.
    #[error("invalid value for option '{option}': {reason}")]
    InvalidValue { option: String, reason: String },

    /// Key does not name a date component order.
    #[error("'{0}' is not a valid endian key")]
    InvalidEndian(String),

    /// Key does not name a timedelta unit.
    #[error("'{0}' is not a valid timedelta unit key")]
    InvalidUnit(String),

    /// Reference-date triplet is not a real calendar date.
    #[error("{year}-{month}-{day} is not a valid calendar date")]
    InvalidDate { year: u16, month: u8, day: u8 },
}

/// One of the three date components, as they appear in an ordered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year,
    Month,
    Day,
}

/// The assumed ordering of date components in an ambiguous numeric date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Endian {
    /// day, month, year
    #[default]
    #[display(fmt = "little")]
    Little,
    /// year, month, day
    #[display(fmt = "big")]
    Big,
    /// month, day, year
    #[display(fmt = "middle")]
    Middle,
}

impl Endian {
    /// Resolves a key to an ordering. Any non-empty ASCII case-insensitive
    /// prefix of "year", "month", "day" (the leading component) or of
    /// "big", "middle", "little" is accepted: `"y"`, `"big"` and `"b"` all
    /// mean year-first.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidEndian` for anything else.
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        const KEYS: [(&str, Endian); 6] = [
            ("year", Endian::Big),
            ("month", Endian::Middle),
            ("day", Endian::Little),
            ("little", Endian::Little),
            ("big", Endian::Big),
            ("middle", Endian::Middle),
        ];
        let wanted = key.to_ascii_lowercase();
        if wanted.is_empty() {
            return Err(ConfigError::InvalidEndian(key.to_string()));
        }
        KEYS.iter()
            .find(|(name, _)| name.starts_with(&wanted))
            .map(|&(_, endian)| endian)
            .ok_or_else(|| ConfigError::InvalidEndian(key.to_string()))
    }

    /// The component order this endianness stands for.
    pub const fn order(self) -> [DateField; 3] {
        match self {
            Self::Little => [DateField::Day, DateField::Month, DateField::Year],
            Self::Big => [DateField::Year, DateField::Month, DateField::Day],
            Self::Middle => [DateField::Month, DateField::Day, DateField::Year],
        }
    }
}

impl std::str::FromStr for Endian {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// The reference date used to complete partial date input.
///
/// Defaults to the real current date; replace it with [`Today::set`] to make
/// parsing reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(fmt = "{_0}")]
pub struct Today(Date);

impl Today {
    /// Creates a reference date from a calendar triplet.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidDate` if the triplet is not a real date.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ConfigError> {
        Date::new(year, month, day)
            .map(Self)
            .map_err(|_| ConfigError::InvalidDate { year, month, day })
    }

    /// Replaces the reference date.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidDate` if the triplet is not a real date.
    pub fn set(&mut self, year: u16, month: u8, day: u8) -> Result<(), ConfigError> {
        *self = Self::new(year, month, day)?;
        Ok(())
    }

    /// Returns the reference date
    #[inline]
    pub const fn date(&self) -> Date {
        self.0
    }

    /// Returns the year component
    #[inline]
    pub const fn year(&self) -> u16 {
        self.0.year()
    }

    /// Returns the month component
    #[inline]
    pub const fn month(&self) -> u8 {
        self.0.month()
    }

    /// Returns the day component
    #[inline]
    pub const fn day(&self) -> u8 {
        self.0.day()
    }
}

impl Default for Today {
    fn default() -> Self {
        Self(Date::today())
    }
}

impl From<Date> for Today {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

/// A dynamically typed option value for the kwargs-style [`set`] calls.
///
/// [`set`]: TimeOptions::set
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum OptionValue {
    Bool(bool),
    Seps(Vec<char>),
    Figures([bool; 3]),
    Endian(Endian),
}

/// Configuration for time format generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeOptions {
    /// Separators formats are generated with, in priority order
    pub seps: Vec<char>,
    /// Also generate formats without any separator ("234405")
    pub allow_no_sep: bool,
    /// Allowed component counts: bare hour, hour+minute, hour+minute+second
    pub figures: [bool; 3],
    /// Also generate formats with a fractional-second part
    pub allow_microsec: bool,
    /// Fall back to permissive matching when every strict format fails
    pub try_hard: bool,
}

impl Default for TimeOptions {
    fn default() -> Self {
        Self {
            seps: DEFAULT_TIME_SEPS.to_vec(),
            allow_no_sep: true,
            figures: [true, true, true],
            allow_microsec: false,
            try_hard: false,
        }
    }
}

impl TimeOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_seps("seps", &self.seps)?;
        validate_figures("figures", self.figures)
    }

    /// Updates one option by name.
    ///
    /// # Errors
    /// `ConfigError::UnknownOption` for an unrecognized name,
    /// `ConfigError::InvalidValue` for a value of the wrong type or content.
    /// On error the option set is left untouched.
    pub fn set(&mut self, option: &str, value: OptionValue) -> Result<(), ConfigError> {
        match option {
            "seps" => self.seps = expect_seps(option, value)?,
            "allow_no_sep" => self.allow_no_sep = expect_bool(option, value)?,
            "figures" => self.figures = expect_figures(option, value)?,
            "allow_microsec" => self.allow_microsec = expect_bool(option, value)?,
            "try_hard" => self.try_hard = expect_bool(option, value)?,
            _ => return Err(ConfigError::UnknownOption(option.to_string())),
        }
        Ok(())
    }
}

/// Configuration for date format generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOptions {
    /// Separators formats are generated with, in priority order
    pub seps: Vec<char>,
    /// Also generate formats without any separator ("241213")
    pub allow_no_sep: bool,
    /// Allowed component counts: bare day, day+month, full triple
    pub figures: [bool; 3],
    /// Also generate formats with literal English month names
    pub allow_month_name: bool,
    /// Also generate formats with two-digit years
    pub allow_short_year: bool,
    /// Component order for ambiguous numeric dates
    pub endian: Endian,
    /// Fall back to permissive matching when every strict format fails
    pub try_hard: bool,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            seps: DEFAULT_DATE_SEPS.to_vec(),
            allow_no_sep: true,
            figures: [true, true, true],
            allow_month_name: true,
            allow_short_year: true,
            endian: Endian::default(),
            try_hard: false,
        }
    }
}

impl DateOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_seps("seps", &self.seps)?;
        validate_figures("figures", self.figures)
    }

    /// Updates one option by name.
    ///
    /// # Errors
    /// `ConfigError::UnknownOption` for an unrecognized name,
    /// `ConfigError::InvalidValue` for a value of the wrong type or content.
    /// On error the option set is left untouched.
    pub fn set(&mut self, option: &str, value: OptionValue) -> Result<(), ConfigError> {
        match option {
            "seps" => self.seps = expect_seps(option, value)?,
            "allow_no_sep" => self.allow_no_sep = expect_bool(option, value)?,
            "figures" => self.figures = expect_figures(option, value)?,
            "allow_month_name" => self.allow_month_name = expect_bool(option, value)?,
            "allow_short_year" => self.allow_short_year = expect_bool(option, value)?,
            "endian" => self.endian = expect_endian(option, value)?,
            "try_hard" => self.try_hard = expect_bool(option, value)?,
            _ => return Err(ConfigError::UnknownOption(option.to_string())),
        }
        Ok(())
    }
}

/// Configuration for datetime format generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeOptions {
    /// Separators between the date and time halves, in priority order
    pub seps: Vec<char>,
    /// Also accept inputs that are only a date or only a time
    pub allow_no_sep: bool,
    /// Fall back to permissive matching when every strict split fails
    pub try_hard: bool,
    /// Options for the date half
    pub date: DateOptions,
    /// Options for the time half
    pub time: TimeOptions,
}

impl Default for DatetimeOptions {
    fn default() -> Self {
        Self {
            seps: DEFAULT_DATETIME_SEPS.to_vec(),
            allow_no_sep: true,
            try_hard: false,
            date: DateOptions::default(),
            time: TimeOptions::default(),
        }
    }
}

impl DatetimeOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        validate_seps("seps", &self.seps)?;
        self.date.validate()?;
        self.time.validate()
    }

    /// Updates one option by name. Names prefixed with `date_` or `time_`
    /// are routed to the nested option sets; `try_hard` applies to this set
    /// and both nested ones.
    ///
    /// # Errors
    /// `ConfigError::UnknownOption` for an unrecognized name,
    /// `ConfigError::InvalidValue` for a value of the wrong type or content.
    /// On error the option set is left untouched.
    pub fn set(&mut self, option: &str, value: OptionValue) -> Result<(), ConfigError> {
        if let Some(rest) = option.strip_prefix("date_") {
            return self
                .date
                .set(rest, value)
                .map_err(|err| relabel(err, option));
        }
        if let Some(rest) = option.strip_prefix("time_") {
            return self
                .time
                .set(rest, value)
                .map_err(|err| relabel(err, option));
        }
        match option {
            "seps" => self.seps = expect_seps(option, value)?,
            "allow_no_sep" => self.allow_no_sep = expect_bool(option, value)?,
            "try_hard" => {
                let flag = expect_bool(option, value)?;
                self.try_hard = flag;
                self.date.try_hard = flag;
                self.time.try_hard = flag;
            }
            _ => return Err(ConfigError::UnknownOption(option.to_string())),
        }
        Ok(())
    }
}

// --- option value helpers ---

fn relabel(err: ConfigError, option: &str) -> ConfigError {
    match err {
        ConfigError::UnknownOption(_) => ConfigError::UnknownOption(option.to_string()),
        ConfigError::InvalidValue { reason, .. } => ConfigError::InvalidValue {
            option: option.to_string(),
            reason,
        },
        other => other,
    }
}

fn type_mismatch(option: &str, wanted: &str, got: &OptionValue) -> ConfigError {
    ConfigError::InvalidValue {
        option: option.to_string(),
        reason: format!("expected {wanted}, got {got:?}"),
    }
}

fn expect_bool(option: &str, value: OptionValue) -> Result<bool, ConfigError> {
    match value {
        OptionValue::Bool(flag) => Ok(flag),
        other => Err(type_mismatch(option, "a boolean", &other)),
    }
}

fn expect_seps(option: &str, value: OptionValue) -> Result<Vec<char>, ConfigError> {
    match value {
        OptionValue::Seps(seps) => {
            validate_seps(option, &seps)?;
            Ok(seps)
        }
        other => Err(type_mismatch(option, "a separator list", &other)),
    }
}

fn expect_figures(option: &str, value: OptionValue) -> Result<[bool; 3], ConfigError> {
    match value {
        OptionValue::Figures(figures) => {
            validate_figures(option, figures)?;
            Ok(figures)
        }
        other => Err(type_mismatch(option, "a figures triple", &other)),
    }
}

fn expect_endian(option: &str, value: OptionValue) -> Result<Endian, ConfigError> {
    match value {
        OptionValue::Endian(endian) => Ok(endian),
        other => Err(type_mismatch(option, "an endian value", &other)),
    }
}

fn validate_seps(option: &str, seps: &[char]) -> Result<(), ConfigError> {
    match seps.iter().find(|sep| sep.is_alphanumeric()) {
        Some(sep) => Err(ConfigError::InvalidValue {
            option: option.to_string(),
            reason: format!("separator '{sep}' is alphanumeric"),
        }),
        None => Ok(()),
    }
}

fn validate_figures(option: &str, figures: [bool; 3]) -> Result<(), ConfigError> {
    if figures.iter().any(|&enabled| enabled) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            option: option.to_string(),
            reason: "at least one figure width must be enabled".to_string(),
        })
    }
}
