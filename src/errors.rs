//! Error types.

use alloc::string::String;
use core::fmt;

/// The error type returned when a conversion to or from a
/// [`UtcTime`](crate::UtcTime) is outside the representable range of the
/// target type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError(pub(crate) ());

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        "timestamp out of representable range".fmt(fmt)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

/// The error type returned when calendar coordinates fail the range check
/// performed at construction.
///
/// The check is syntactic: each field is checked against its own range only,
/// so that for instance the 31st of April passes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// The year is not between -9999 and 9999.
    InvalidYear(i32),
    /// The month is not between 1 and 12.
    InvalidMonth(i32),
    /// The day of the month is not between 1 and 31, or, when parsing text,
    /// exceeds the length of the month.
    InvalidDayOfMonth(i32),
    /// The hour field value is not between 0 and 23.
    InvalidHour(i32),
    /// The minute field value is not between 0 and 59.
    InvalidMinute(i32),
    /// The second field value is not between 0 and 59.
    InvalidSecond(i32),
    /// The microsecond field value is more than 999 999.
    InvalidMicrosecond(i32),
    /// The ISO week number is not between 1 and 53.
    InvalidIsoWeek(i32),
    /// The ISO week day is not between 1 (Monday) and 7 (Sunday).
    InvalidWeekDay(i32),
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidYear(year) => write!(fmt, "year numeral '{}' is not valid", year),
            Self::InvalidMonth(month) => write!(fmt, "month numeral '{}' is not valid", month),
            Self::InvalidDayOfMonth(day) => {
                write!(fmt, "day of month '{}' is not valid for this date", day)
            }
            Self::InvalidHour(hour) => write!(fmt, "hour numeral '{}' is not valid", hour),
            Self::InvalidMinute(min) => write!(fmt, "minute numeral '{}' is not valid", min),
            Self::InvalidSecond(sec) => write!(fmt, "second numeral '{}' is not valid", sec),
            Self::InvalidMicrosecond(micros) => {
                write!(fmt, "microsecond value '{}' is not valid", micros)
            }
            Self::InvalidIsoWeek(week) => write!(fmt, "iso week numeral '{}' is not valid", week),
            Self::InvalidWeekDay(wday) => write!(fmt, "week day numeral '{}' is not valid", wday),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DateTimeError {}

/// The error type returned when a date-time string is invalid or corresponds to
/// a timestamp outside the representable range.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseDateTimeError {
    /// A field value is either not of the expected numeric type or is out of
    /// range for the expected numeric type.
    InvalidFieldValue,
    /// The width of a fixed-width or minimum-width field is invalid.
    InvalidFieldWidth,
    /// A field is missing.
    MissingField,
    /// The UTC offset suffix is malformed or larger than 24 hours.
    InvalidOffset,
    /// One of the field value is out of its expected range.
    RangeError(DateTimeError),
}

impl fmt::Display for ParseDateTimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldValue => "one of the fields is invalid".fmt(fmt),
            Self::InvalidFieldWidth => "the width of one of the fields is invalid".fmt(fmt),
            Self::MissingField => "a field is missing".fmt(fmt),
            Self::InvalidOffset => "the utc offset is invalid".fmt(fmt),
            Self::RangeError(err) => err.fmt(fmt),
        }
    }
}

impl From<DateTimeError> for ParseDateTimeError {
    fn from(err: DateTimeError) -> Self {
        Self::RangeError(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseDateTimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RangeError(err) => Some(err),
            _ => None,
        }
    }
}

/// The error type returned when a timezone region or abbreviation is not
/// registered in a [`TzDatabase`](crate::TzDatabase).
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TzLookupError {
    /// No timezone is registered under this region name, e.g. `Europe/Oslo`.
    RegionNotFound(String),
    /// No timezone is registered under this abbreviation, e.g. `CET`.
    AbbreviationNotFound(String),
}

impl fmt::Display for TzLookupError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegionNotFound(name) => write!(fmt, "tz region '{}' not found", name),
            Self::AbbreviationNotFound(name) => write!(fmt, "tz name '{}' not found", name),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TzLookupError {}

/// The error type returned when a persisted DST table cannot be turned into a
/// [`TzTable`](crate::TzTable).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TzTableError {
    /// The same year appears more than once.
    DuplicateYear(i32),
    /// The DST start or end of this year is the `NO_TIME` sentinel.
    InvalidDstPeriod(i32),
    /// The year is not between -9999 and 9999.
    YearOutOfRange(i32),
}

impl fmt::Display for TzTableError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateYear(year) => write!(fmt, "dst year '{}' is listed twice", year),
            Self::InvalidDstPeriod(year) => {
                write!(fmt, "dst period of year '{}' has a missing bound", year)
            }
            Self::YearOutOfRange(year) => write!(fmt, "dst year '{}' is out of range", year),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TzTableError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_offending_value() {
        assert_eq!(
            DateTimeError::InvalidMonth(13).to_string(),
            "month numeral '13' is not valid"
        );
        assert_eq!(
            TzLookupError::RegionNotFound("Mars/Olympus".into()).to_string(),
            "tz region 'Mars/Olympus' not found"
        );
        assert_eq!(
            ParseDateTimeError::from(DateTimeError::InvalidHour(24)).to_string(),
            "hour numeral '24' is not valid"
        );
    }
}
