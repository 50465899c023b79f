//! Calendar coordinates.

use core::fmt;

use crate::DateTimeError;

/// Calendar coordinates: year, month, day, hour, minute, second and
/// microsecond.
///
/// Values built with [`YMDhms::new`] pass a range check on each field, which
/// does not guarantee a real date: the 31st of April is accepted and resolves
/// to the 1st of May when converted to a time.
///
/// The all-zero [`YMDhms::NULL`] value stands for "no time", and
/// [`YMDhms::MIN`] and [`YMDhms::MAX`] for the minimum and maximum times.
///
/// # Examples
///
/// ```
/// use utc_calendar::{DateTimeError, YMDhms};
///
/// let c = YMDhms::new(2021, 7, 15, 12, 0, 0).unwrap();
/// assert_eq!(c.month(), 7);
///
/// assert_eq!(
///     YMDhms::new(2021, 13, 1, 0, 0, 0),
///     Err(DateTimeError::InvalidMonth(13))
/// );
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct YMDhms {
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
    micro_second: i32,
}

impl YMDhms {
    /// Largest valid year.
    pub const YEAR_MAX: i32 = 9999;
    /// Smallest valid year.
    pub const YEAR_MIN: i32 = -9999;

    /// The null coordinates, mapped to and from `UtcTime::NO_TIME`.
    pub const NULL: Self = Self::from_parts(0, 0, 0, 0, 0, 0, 0);

    /// The largest coordinates, mapped to and from `UtcTime::MAX`.
    pub const MAX: Self = Self::from_parts(Self::YEAR_MAX, 12, 31, 23, 59, 59, 0);

    /// The smallest coordinates, mapped to and from `UtcTime::MIN`.
    pub const MIN: Self = Self::from_parts(Self::YEAR_MIN, 1, 1, 0, 0, 0, 0);

    /// Creates range-checked calendar coordinates.
    ///
    /// The all-zero tuple is accepted and yields [`YMDhms::NULL`].
    pub fn new(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<Self, DateTimeError> {
        let c = Self::from_parts(year, month, day, hour, minute, second, 0);
        if c.is_null() {
            return Ok(c);
        }
        c.check().map(|_| c)
    }

    /// Creates range-checked coordinates at midnight of a date.
    pub fn from_date(year: i32, month: i32, day: i32) -> Result<Self, DateTimeError> {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Returns these coordinates with the microsecond field set.
    pub fn with_micro_second(self, micro_second: i32) -> Result<Self, DateTimeError> {
        if !(0..=999_999).contains(&micro_second) {
            return Err(DateTimeError::InvalidMicrosecond(micro_second));
        }
        Ok(Self {
            micro_second,
            ..self
        })
    }

    pub(crate) const fn from_parts(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        micro_second: i32,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            micro_second,
        }
    }

    fn check(&self) -> Result<(), DateTimeError> {
        if !(Self::YEAR_MIN..=Self::YEAR_MAX).contains(&self.year) {
            return Err(DateTimeError::InvalidYear(self.year));
        }
        if !(1..=12).contains(&self.month) {
            return Err(DateTimeError::InvalidMonth(self.month));
        }
        if !(1..=31).contains(&self.day) {
            return Err(DateTimeError::InvalidDayOfMonth(self.day));
        }
        check_time_of_day(self.hour, self.minute, self.second, self.micro_second)
    }

    /// Year, between `YEAR_MIN` and `YEAR_MAX`.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month, from 1 to 12.
    pub const fn month(&self) -> i32 {
        self.month
    }

    /// Day of the month, from 1 to 31.
    pub const fn day(&self) -> i32 {
        self.day
    }

    /// Hour, from 0 to 23.
    pub const fn hour(&self) -> i32 {
        self.hour
    }

    /// Minute, from 0 to 59.
    pub const fn minute(&self) -> i32 {
        self.minute
    }

    /// Second, from 0 to 59.
    pub const fn second(&self) -> i32 {
        self.second
    }

    /// Microsecond within the second, from 0 to 999 999.
    pub const fn micro_second(&self) -> i32 {
        self.micro_second
    }

    /// Returns whether all fields are zero.
    pub const fn is_null(&self) -> bool {
        self.year == 0
            && self.month == 0
            && self.day == 0
            && self.hour == 0
            && self.minute == 0
            && self.second == 0
            && self.micro_second == 0
    }

    /// Returns whether every field is within its range. The date may still not
    /// exist.
    pub fn is_valid_coordinates(&self) -> bool {
        self.check().is_ok()
    }

    /// Returns whether the coordinates are null or within range.
    pub fn is_valid(&self) -> bool {
        self.is_null() || self.is_valid_coordinates()
    }

    pub(crate) fn set_time_of_day(&mut self, hour: i32, minute: i32, second: i32) {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self.micro_second = 0;
    }

    pub(crate) fn set_date(&mut self, year: i32, month: i32, day: i32) {
        self.year = year;
        self.month = month;
        self.day = day;
    }
}

impl fmt::Display for YMDhms {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.micro_second != 0 {
            write!(fmt, ".{:06}", self.micro_second)?;
        }
        Ok(())
    }
}

/// ISO 8601 week coordinates: ISO year, ISO week, week day (Monday is 1),
/// hour, minute, second and microsecond.
///
/// Follows the same conventions as [`YMDhms`]: fields are range-checked at
/// construction and the all-zero value is the null coordinates.
///
/// # Examples
///
/// ```
/// use utc_calendar::{DateTimeError, YWdhms};
///
/// let c = YWdhms::new(2020, 53, 5, 0, 0, 0).unwrap();
/// assert_eq!(c.iso_week(), 53);
///
/// assert_eq!(
///     YWdhms::new(2020, 1, 8, 0, 0, 0),
///     Err(DateTimeError::InvalidWeekDay(8))
/// );
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct YWdhms {
    iso_year: i32,
    iso_week: i32,
    week_day: i32,
    hour: i32,
    minute: i32,
    second: i32,
    micro_second: i32,
}

impl YWdhms {
    /// The null coordinates, mapped to and from `UtcTime::NO_TIME`.
    pub const NULL: Self = Self::from_parts(0, 0, 0, 0, 0, 0, 0);

    /// The largest coordinates, mapped to and from `UtcTime::MAX`.
    ///
    /// This is the ISO week equivalent of [`YMDhms::MAX`], a Friday.
    pub const MAX: Self = Self::from_parts(YMDhms::YEAR_MAX, 52, 5, 23, 59, 59, 0);

    /// The smallest coordinates, mapped to and from `UtcTime::MIN`.
    pub const MIN: Self = Self::from_parts(YMDhms::YEAR_MIN, 1, 1, 0, 0, 0, 0);

    /// Creates range-checked ISO week coordinates.
    pub fn new(
        iso_year: i32,
        iso_week: i32,
        week_day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<Self, DateTimeError> {
        let c = Self::from_parts(iso_year, iso_week, week_day, hour, minute, second, 0);
        if c.is_null() {
            return Ok(c);
        }
        c.check().map(|_| c)
    }

    /// Returns these coordinates with the microsecond field set.
    pub fn with_micro_second(self, micro_second: i32) -> Result<Self, DateTimeError> {
        if !(0..=999_999).contains(&micro_second) {
            return Err(DateTimeError::InvalidMicrosecond(micro_second));
        }
        Ok(Self {
            micro_second,
            ..self
        })
    }

    pub(crate) const fn from_parts(
        iso_year: i32,
        iso_week: i32,
        week_day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        micro_second: i32,
    ) -> Self {
        Self {
            iso_year,
            iso_week,
            week_day,
            hour,
            minute,
            second,
            micro_second,
        }
    }

    fn check(&self) -> Result<(), DateTimeError> {
        if !(YMDhms::YEAR_MIN..=YMDhms::YEAR_MAX).contains(&self.iso_year) {
            return Err(DateTimeError::InvalidYear(self.iso_year));
        }
        if !(1..=53).contains(&self.iso_week) {
            return Err(DateTimeError::InvalidIsoWeek(self.iso_week));
        }
        if !(1..=7).contains(&self.week_day) {
            return Err(DateTimeError::InvalidWeekDay(self.week_day));
        }
        check_time_of_day(self.hour, self.minute, self.second, self.micro_second)
    }

    /// ISO 8601 week-numbering year.
    ///
    /// It differs from the calendar year for the first days of January and
    /// the last days of December.
    pub const fn iso_year(&self) -> i32 {
        self.iso_year
    }

    /// ISO 8601 week number, from 1 to 53.
    pub const fn iso_week(&self) -> i32 {
        self.iso_week
    }

    /// Day of the week, from 1 (Monday) to 7 (Sunday).
    pub const fn week_day(&self) -> i32 {
        self.week_day
    }

    /// Hour, from 0 to 23.
    pub const fn hour(&self) -> i32 {
        self.hour
    }

    /// Minute, from 0 to 59.
    pub const fn minute(&self) -> i32 {
        self.minute
    }

    /// Second, from 0 to 59.
    pub const fn second(&self) -> i32 {
        self.second
    }

    /// Microsecond within the second.
    pub const fn micro_second(&self) -> i32 {
        self.micro_second
    }

    /// Returns whether all fields are zero.
    pub const fn is_null(&self) -> bool {
        self.iso_year == 0
            && self.iso_week == 0
            && self.week_day == 0
            && self.hour == 0
            && self.minute == 0
            && self.second == 0
            && self.micro_second == 0
    }

    /// Returns whether every field is within its range.
    pub fn is_valid_coordinates(&self) -> bool {
        self.check().is_ok()
    }

    /// Returns whether the coordinates are null or within range.
    pub fn is_valid(&self) -> bool {
        self.is_null() || self.is_valid_coordinates()
    }
}

impl fmt::Display for YWdhms {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "{:04}-W{:02}-{}T{:02}:{:02}:{:02}",
            self.iso_year, self.iso_week, self.week_day, self.hour, self.minute, self.second
        )?;
        if self.micro_second != 0 {
            write!(fmt, ".{:06}", self.micro_second)?;
        }
        Ok(())
    }
}

fn check_time_of_day(
    hour: i32,
    minute: i32,
    second: i32,
    micro_second: i32,
) -> Result<(), DateTimeError> {
    if !(0..=23).contains(&hour) {
        return Err(DateTimeError::InvalidHour(hour));
    }
    if !(0..=59).contains(&minute) {
        return Err(DateTimeError::InvalidMinute(minute));
    }
    if !(0..=59).contains(&second) {
        return Err(DateTimeError::InvalidSecond(second));
    }
    if !(0..=999_999).contains(&micro_second) {
        return Err(DateTimeError::InvalidMicrosecond(micro_second));
    }
    Ok(())
}
