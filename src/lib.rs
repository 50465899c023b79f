//! A microsecond-resolution linear UTC time axis with a timezone and DST
//! aware calendar.
//!
//! # Overview
//!
//! Time is a plain number on a linear axis: a [`UtcTime`] is a signed 64-bit
//! count of microseconds since 1970-01-01 00:00:00 UTC, and a [`UtcTimeSpan`]
//! is a signed 64-bit count of microseconds. Three values of the axis are
//! reserved: [`UtcTime::NO_TIME`] for an absent time, and [`UtcTime::MIN`] and
//! [`UtcTime::MAX`] for the symmetric bounds of the axis.
//!
//! Human calendar concepts are provided by a [`Calendar`], which is bound to
//! a timezone described by the [`TzInfo`] trait, either a fixed offset
//! ([`FixedOffset`]) or a year-indexed table of daylight saving time periods
//! ([`TzTable`]). The calendar:
//!
//! - converts between times and calendar coordinates, both as year, month and
//!   day ([`YMDhms`]) and as ISO 8601 year, week and week day ([`YWdhms`]),
//! - truncates, adds and counts calendar units with calendar semantics: adding
//!   one [`Calendar::DAY`] across a DST change moves 23 or 25 hours and keeps
//!   the wall-clock time, adding one [`Calendar::MONTH`] to January 31st lands
//!   on the last day of February,
//! - formats times in its timezone.
//!
//! Half-open intervals of the axis are represented by [`UtcPeriod`], and named
//! timezones can be registered in and looked up from a [`TzDatabase`].
//!
//!
//! # Design choices and limitations
//!
//! Timezone rules are data: a [`TzTable`] stores a DST period and DST offset
//! per year and is built either from a [`DstRule`] or from a persisted
//! [`TzTableRecord`]. Years outside the table are considered without DST.
//! Parsing of system or POSIX timezone databases is not provided.
//!
//! Local times that do not exist (spring-forward gap) or exist twice
//! (fall-back overlap) resolve to the offset in force after the transition.
//!
//!
//! # Features flags
//!
//! ### Support for `no-std`
//!
//! By default, this crate enables the `std` feature to access the operating
//! system clock and allow conversion to/from `time::SystemTime`, but specifying
//! `default-features = false` makes it `no-std`-compatible. The `alloc` crate
//! is always required.
//!
//! ### Support for time-related crates
//!
//! Conversion methods to and from UTC date-time stamps from the [chrono] crate
//! are available with the `chrono` feature.
//!
//! [chrono]: https://crates.io/crates/chrono
//!
//! ### Serialization
//!
//! Times, spans, periods, calendar coordinates, timezone tables and related
//! error types can be (de)serialized with `serde` by activating the `serde`
//! feature.
//!
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use utc_calendar::{Calendar, EuSummerTime, TzTable, UtcTimeSpan};
//!
//! // Central European Time with EU summer time rules.
//! let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
//! let cal = Calendar::new(Arc::new(TzTable::from_rule(&rule, 2000, 50)));
//!
//! let t = cal.time_from_ymd(2021, 3, 27, 12, 0, 0).unwrap();
//! assert_eq!(cal.format(t), "2021-03-27T12:00:00+01:00");
//!
//! // The next day is 23 hours long but the wall-clock time is preserved.
//! let next = cal.add(t, Calendar::DAY, 1);
//! assert_eq!(cal.format(next), "2021-03-28T12:00:00+02:00");
//! assert_eq!(next - t, UtcTimeSpan::from_hours(23));
//! assert_eq!(cal.diff_units(t, next, Calendar::DAY), 1);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod calendar;
mod coordinates;
mod date_time;
mod errors;
mod period;
mod time_zone;
mod tz_database;

use core::fmt;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use core::str::FromStr;

pub use calendar::Calendar;
pub use coordinates::{YMDhms, YWdhms};
pub use errors::{
    DateTimeError, OutOfRangeError, ParseDateTimeError, TzLookupError, TzTableError,
};
pub use period::{intersection, UtcPeriod};
pub use time_zone::{
    DstRecord, DstRule, EuSummerTime, FixedOffset, SharedTzInfo, TzInfo, TzTable, TzTableRecord,
};
pub use tz_database::TzDatabase;

use date_time::MICROS_PER_SEC;

/// A signed duration on the time axis, in microseconds.
///
/// # Examples
///
/// ```
/// use utc_calendar::UtcTimeSpan;
///
/// let dt = UtcTimeSpan::from_hours(1) + UtcTimeSpan::from_minutes(30);
/// assert_eq!(dt.as_secs(), 5400);
/// assert_eq!(dt * -2, UtcTimeSpan::from_secs(-10_800));
/// assert_eq!(UtcTimeSpan::from_secs_f64(1.5e-6).as_micros(), 2);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcTimeSpan(i64);

impl UtcTimeSpan {
    /// A null span.
    pub const ZERO: Self = Self(0);

    /// Creates a span from a signed number of microseconds.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Creates a span from a signed number of seconds.
    ///
    /// The number of seconds must fit in the range of the type once converted
    /// to microseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::UtcTimeSpan;
    ///
    /// assert_eq!(UtcTimeSpan::from_secs(-2).as_micros(), -2_000_000);
    /// ```
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * MICROS_PER_SEC)
    }

    /// Creates a span from a signed number of minutes.
    pub const fn from_minutes(minutes: i64) -> Self {
        Self::from_secs(minutes * 60)
    }

    /// Creates a span from a signed number of hours.
    pub const fn from_hours(hours: i64) -> Self {
        Self::from_secs(hours * 3600)
    }

    /// A span of `days` times 24 hours.
    pub const fn from_days(days: i64) -> Self {
        Self::from_secs(days * 86_400)
    }

    /// Creates a span from fractional seconds, rounded to the nearest
    /// microsecond.
    pub fn from_secs_f64(secs: f64) -> Self {
        let micros = secs * MICROS_PER_SEC as f64;
        let rounded = if micros < 0.0 {
            micros - 0.5
        } else {
            micros + 0.5
        };

        Self(rounded as i64)
    }

    /// Length of the span in microseconds.
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Whole seconds, truncated toward zero.
    pub const fn as_secs(self) -> i64 {
        self.0 / MICROS_PER_SEC
    }

    /// Length of the span in fractional seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::UtcTimeSpan;
    ///
    /// assert_eq!(UtcTimeSpan::from_micros(-1_500_000).as_secs_f64(), -1.5);
    /// ```
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_SEC as f64
    }

    /// Whether the span points backward in time.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies the span by `n`, saturating at the bounds of `i64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::UtcTimeSpan;
    ///
    /// let hour = UtcTimeSpan::from_hours(1);
    ///
    /// assert_eq!(hour.saturating_mul(3), UtcTimeSpan::from_hours(3));
    /// assert_eq!(hour.saturating_mul(i64::MIN).as_micros(), i64::MIN);
    /// ```
    pub const fn saturating_mul(self, n: i64) -> Self {
        Self(self.0.saturating_mul(n))
    }
}

impl Add for UtcTimeSpan {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for UtcTimeSpan {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for UtcTimeSpan {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<i64> for UtcTimeSpan {
    type Output = Self;

    fn mul(self, n: i64) -> Self {
        Self(self.0 * n)
    }
}

impl AddAssign for UtcTimeSpan {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for UtcTimeSpan {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// A point on the linear UTC time axis, in microseconds since 1970-01-01
/// 00:00:00 UTC.
///
/// The value `i64::MIN` is reserved as [`UtcTime::NO_TIME`], leaving
/// [`UtcTime::MIN`] and [`UtcTime::MAX`] as symmetric bounds.
///
/// Arithmetic operators panic on overflow; [`saturating_add`] clamps to the
/// bounds instead.
///
/// [`saturating_add`]: UtcTime::saturating_add
///
/// # Examples
///
/// ```
/// use utc_calendar::{UtcTime, UtcTimeSpan};
///
/// // 2009-02-13 23:31:30 UTC.
/// let mut t = UtcTime::from_secs(1_234_567_890);
///
/// t += UtcTimeSpan::from_micros(123_456);
///
/// assert_eq!(t.as_micros(), 1_234_567_890_123_456);
/// assert_eq!(t.to_string(), "2009-02-13T23:31:30.123456Z");
/// assert_eq!("2009-02-13T23:31:30.123456Z".parse(), Ok(t));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcTime(i64);

impl UtcTime {
    /// 1970-01-01 00:00:00 UTC.
    pub const EPOCH: Self = Self(0);

    /// The absent or invalid time.
    pub const NO_TIME: Self = Self(i64::MIN);

    /// The smallest time, `-MAX`.
    pub const MIN: Self = Self(-i64::MAX);

    /// The largest time.
    pub const MAX: Self = Self(i64::MAX);

    /// Creates a time from a signed number of microseconds since the epoch.
    ///
    /// No check is made against the sentinel values: `i64::MIN` is
    /// `NO_TIME`.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Creates a time from a signed number of seconds since the epoch.
    ///
    /// The number of seconds must fit in the range of the type once converted
    /// to microseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::UtcTime;
    ///
    /// let t = UtcTime::from_secs(1_234_567_890);
    ///
    /// assert_eq!(t.to_string(), "2009-02-13T23:31:30Z");
    /// ```
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs * MICROS_PER_SEC)
    }

    /// Creates a time from the system clock.
    ///
    /// Returns an error if the system time is outside the representable range.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::UtcTime;
    ///
    /// let now = UtcTime::now().unwrap();
    /// assert!(now > UtcTime::from_secs(1_600_000_000));
    /// ```
    #[cfg(feature = "std")]
    pub fn now() -> Result<Self, OutOfRangeError> {
        Self::from_system_time(&std::time::SystemTime::now())
    }

    /// Creates a time from a `SystemTime`, rounding down to the microsecond.
    #[cfg(feature = "std")]
    pub fn from_system_time(system_time: &std::time::SystemTime) -> Result<Self, OutOfRangeError> {
        let micros = match system_time.duration_since(std::time::SystemTime::UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_micros()).map_err(|_| OutOfRangeError(()))?,
            Err(before) => {
                let before = before.duration();
                let micros =
                    i64::try_from(before.as_micros()).map_err(|_| OutOfRangeError(()))?;
                let carry = (before.subsec_nanos() % 1_000 != 0) as i64;
                -micros - carry
            }
        };

        let t = Self(micros);
        if t.is_valid() {
            Ok(t)
        } else {
            Err(OutOfRangeError(()))
        }
    }

    /// Creates a time from a chrono date-time, rounding down to the
    /// microsecond.
    ///
    /// A leap second is folded into the following second.
    #[cfg(feature = "chrono")]
    pub fn from_chrono_date_time<Tz: chrono::TimeZone>(
        date_time: &chrono::DateTime<Tz>,
    ) -> Result<Self, OutOfRangeError> {
        let secs = date_time.timestamp();
        let subsec_nanos = date_time.timestamp_subsec_nanos() as i64;

        secs.checked_mul(MICROS_PER_SEC)
            .and_then(|micros| micros.checked_add(subsec_nanos / 1_000))
            .map(Self)
            .filter(|t| t.is_valid())
            .ok_or(OutOfRangeError(()))
    }

    /// Microseconds since the epoch.
    pub const fn as_micros(&self) -> i64 {
        self.0
    }

    /// Whole seconds since the epoch, rounded down.
    pub const fn as_secs(&self) -> i64 {
        self.0.div_euclid(MICROS_PER_SEC)
    }

    /// Returns `false` for [`UtcTime::NO_TIME`] only.
    pub const fn is_valid(&self) -> bool {
        self.0 != i64::MIN
    }

    /// Converts to a `SystemTime`.
    ///
    /// Returns an error for `NO_TIME` or if the time is outside the range of
    /// `SystemTime`.
    #[cfg(feature = "std")]
    pub fn to_system_time(&self) -> Result<std::time::SystemTime, OutOfRangeError> {
        if !self.is_valid() {
            return Err(OutOfRangeError(()));
        }
        let delta = std::time::Duration::from_micros(self.0.unsigned_abs());
        let system_time = if self.0 >= 0 {
            std::time::SystemTime::UNIX_EPOCH.checked_add(delta)
        } else {
            std::time::SystemTime::UNIX_EPOCH.checked_sub(delta)
        };

        system_time.ok_or(OutOfRangeError(()))
    }

    /// Converts to a chrono UTC date-time.
    ///
    /// Returns an error for `NO_TIME` or if the time is outside the range of
    /// `chrono::DateTime`.
    #[cfg(feature = "chrono")]
    pub fn to_chrono_date_time(&self) -> Result<chrono::DateTime<chrono::Utc>, OutOfRangeError> {
        if !self.is_valid() {
            return Err(OutOfRangeError(()));
        }
        let secs = self.0.div_euclid(MICROS_PER_SEC);
        let nanos = self.0.rem_euclid(MICROS_PER_SEC) as u32 * 1_000;

        chrono::DateTime::from_timestamp(secs, nanos).ok_or(OutOfRangeError(()))
    }

    /// Rounds down to a multiple of `dt` microseconds since the epoch.
    ///
    /// A null `dt` returns the time unchanged and a negative `dt` rounds up
    /// instead. The reserved values are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::{UtcTime, UtcTimeSpan};
    ///
    /// let hour = UtcTimeSpan::from_hours(1);
    /// let t = UtcTime::from_secs(-1);
    ///
    /// assert_eq!(t.floor(hour), UtcTime::from_secs(-3600));
    /// assert_eq!(t.floor(-hour), UtcTime::EPOCH);
    /// ```
    pub fn floor(self, dt: UtcTimeSpan) -> Self {
        if dt.0 == 0 || self.is_reserved() {
            return self;
        }
        let (num, den) = (self.0 as i128, dt.0 as i128);
        let floored = if den > 0 {
            num.div_euclid(den) * den
        } else {
            // Ceiling to a multiple of `|den|`.
            -((-num).div_euclid(-den) * -den)
        };

        Self::clamped(floored)
    }

    /// Adds a span, clamping the result to `[MIN, MAX]`.
    ///
    /// `NO_TIME` is returned unchanged.
    pub fn saturating_add(self, rhs: UtcTimeSpan) -> Self {
        if !self.is_valid() {
            return self;
        }
        Self::clamped(self.0 as i128 + rhs.0 as i128)
    }

    /// Checked addition; `None` on overflow or if the result would be
    /// `NO_TIME`.
    pub const fn checked_add(self, rhs: UtcTimeSpan) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(micros) if micros != i64::MIN => Some(Self(micros)),
            _ => None,
        }
    }

    /// Checked subtraction; `None` on overflow or if the result would be
    /// `NO_TIME`.
    pub const fn checked_sub(self, rhs: UtcTimeSpan) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(micros) if micros != i64::MIN => Some(Self(micros)),
            _ => None,
        }
    }

    pub(crate) const fn is_reserved(&self) -> bool {
        self.0 == Self::NO_TIME.0 || self.0 == Self::MIN.0 || self.0 == Self::MAX.0
    }

    pub(crate) fn clamped(micros: i128) -> Self {
        Self(micros.clamp(Self::MIN.0 as i128, Self::MAX.0 as i128) as i64)
    }
}

impl Add<UtcTimeSpan> for UtcTime {
    type Output = Self;

    /// Adds a span to a time.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting time cannot be represented.
    fn add(self, other: UtcTimeSpan) -> Self {
        self.checked_add(other)
            .expect("overflow when adding span to time")
    }
}

impl Sub<UtcTimeSpan> for UtcTime {
    type Output = Self;

    /// Subtracts a span from a time.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting time cannot be represented.
    fn sub(self, other: UtcTimeSpan) -> Self {
        self.checked_sub(other)
            .expect("overflow when subtracting span from time")
    }
}

impl Sub for UtcTime {
    type Output = UtcTimeSpan;

    /// Returns the signed span from `other` to `self`.
    ///
    /// # Panics
    ///
    /// This function panics if the span cannot be represented.
    fn sub(self, other: Self) -> UtcTimeSpan {
        UtcTimeSpan(
            self.0
                .checked_sub(other.0)
                .expect("overflow when subtracting times"),
        )
    }
}

impl AddAssign<UtcTimeSpan> for UtcTime {
    fn add_assign(&mut self, other: UtcTimeSpan) {
        *self = *self + other;
    }
}

impl SubAssign<UtcTimeSpan> for UtcTime {
    fn sub_assign(&mut self, other: UtcTimeSpan) {
        *self = *self - other;
    }
}

impl fmt::Display for UtcTime {
    /// Formats the time in UTC, e.g. `2021-07-15T10:00:00Z`.
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        date_time::write_iso8601(fmt, *self, UtcTimeSpan::ZERO)
    }
}

impl FromStr for UtcTime {
    type Err = ParseDateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_iso8601(s)
    }
}

/// Parses an ISO 8601 date-time such as `2021-07-15T12:00:00+02:00`.
///
/// The accepted format is `[±]YYYY-MM-DD'T'hh:mm:ss[.f...]` followed by an
/// optional `Z`, `±hh`, `±hhmm` or `±hh:mm` offset. A missing offset means UTC.
///
/// # Examples
///
/// ```
/// use utc_calendar::{parse_iso8601, UtcTime};
///
/// assert_eq!(
///     parse_iso8601("2021-07-15T12:00:00+02:00"),
///     Ok(UtcTime::from_secs(1_626_343_200))
/// );
/// assert!(parse_iso8601("2021-07-15").is_err());
/// ```
pub fn parse_iso8601(s: &str) -> Result<UtcTime, ParseDateTimeError> {
    date_time::parse_iso8601(s)
}
