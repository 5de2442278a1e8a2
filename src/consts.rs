/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Two-digit years below the pivot land in the 2000s, the rest in the 1900s
pub const SHORT_YEAR_PIVOT: u8 = 70;

/// Separators time formats are generated with, in priority order
pub const DEFAULT_TIME_SEPS: [char; 2] = [':', ' '];
/// Separators date formats are generated with, in priority order
pub const DEFAULT_DATE_SEPS: [char; 4] = ['.', '-', '/', ' '];
/// Separators between the date and time halves of a datetime string
pub const DEFAULT_DATETIME_SEPS: [char; 4] = [' ', ',', '_', ';'];
/// Separators between whole seconds and the fractional part
pub(crate) const MICROSEC_SEPS: [char; 2] = ['.', ' '];

/// Seconds per civil day
pub(crate) const SECONDS_PER_DAY: u32 = 86_400;
/// Microseconds per second
pub(crate) const MICROS_PER_SECOND: u32 = 1_000_000;

/// Day magnitude bound for durations
pub const MAX_DELTA_DAYS: i64 = 999_999_999;

/// Three-letter English month abbreviations, lowercase, January first
pub(crate) const MONTH_ABBRS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Full English month names, lowercase, January first
pub(crate) const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];
