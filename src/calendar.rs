//! Timezone-aware calendar conversions and arithmetic.

use alloc::string::String;
use alloc::sync::Arc;

use crate::date_time::{
    self, civil_from_micros, days_in_month, micros_from_civil, micros_from_day, week_day,
    year_and_day_of_year, MICROS_PER_DAY, UNIX_DAY,
};
use crate::{
    DateTimeError, FixedOffset, SharedTzInfo, TzDatabase, TzLookupError, UtcPeriod, UtcTime,
    UtcTimeSpan, YMDhms, YWdhms,
};

/// A calendar bound to a timezone.
///
/// The calendar converts between times and local calendar coordinates and
/// implements calendar arithmetic. The spans [`Calendar::DAY`],
/// [`Calendar::WEEK`], [`Calendar::MONTH`], [`Calendar::QUARTER`] and
/// [`Calendar::YEAR`] select calendar semantics in [`trim`], [`add`] and
/// [`diff_units`]: a day lasts from one local midnight to the next and may be
/// 23, 24 or 25 hours long, a month lasts from a day of the month to the same
/// day of the next month. Any other span is a fixed duration.
///
/// Cloning a calendar shares its timezone.
///
/// [`trim`]: Calendar::trim
/// [`add`]: Calendar::add
/// [`diff_units`]: Calendar::diff_units
///
/// # Local times around DST changes
///
/// Local times that are skipped when DST starts, or repeated when DST ends,
/// are resolved with the offset in force after the change. With European
/// summer time, both `2021-03-28T02:30` and `2021-10-31T02:30` map to
/// `01:30Z`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use utc_calendar::{Calendar, EuSummerTime, TzTable, UtcTimeSpan};
///
/// let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
/// let cal = Calendar::new(Arc::new(TzTable::from_rule(&rule, 2021, 1)));
///
/// let t = cal.time_from_ymd(2021, 1, 31, 0, 0, 0).unwrap();
/// let t = cal.add(t, Calendar::MONTH, 1);
/// assert_eq!(cal.format(t), "2021-02-28T00:00:00+01:00");
///
/// let c = cal.calendar_units(cal.add(t, Calendar::MONTH, 5));
/// assert_eq!((c.month(), c.day(), c.hour()), (7, 28, 0));
/// ```
#[derive(Clone, Debug)]
pub struct Calendar {
    tz: SharedTzInfo,
}

impl Calendar {
    /// One second.
    pub const SECOND: UtcTimeSpan = UtcTimeSpan::from_secs(1);
    /// One minute.
    pub const MINUTE: UtcTimeSpan = UtcTimeSpan::from_minutes(1);
    /// One hour, always a fixed span.
    pub const HOUR: UtcTimeSpan = UtcTimeSpan::from_hours(1);
    /// Three hours.
    pub const HOUR_3: UtcTimeSpan = UtcTimeSpan::from_hours(3);
    /// A local day.
    pub const DAY: UtcTimeSpan = UtcTimeSpan::from_days(1);
    /// A local week, starting on Monday.
    pub const WEEK: UtcTimeSpan = UtcTimeSpan::from_days(7);
    /// A calendar month, nominally 30 days.
    pub const MONTH: UtcTimeSpan = UtcTimeSpan::from_days(30);
    /// Three calendar months, nominally 90 days.
    pub const QUARTER: UtcTimeSpan = UtcTimeSpan::from_days(90);
    /// A calendar year, nominally 365 days.
    pub const YEAR: UtcTimeSpan = UtcTimeSpan::from_days(365);

    /// Creates a calendar in the given timezone.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use utc_calendar::{Calendar, FixedOffset, UtcTimeSpan};
    ///
    /// let tz = Arc::new(FixedOffset::new(UtcTimeSpan::from_hours(-5)));
    /// let cal = Calendar::new(tz);
    ///
    /// assert_eq!(cal.tz().name(), "UTC-05");
    /// ```
    pub fn new(tz: SharedTzInfo) -> Self {
        Self { tz }
    }

    /// A calendar in UTC.
    pub fn utc() -> Self {
        Self::new(Arc::new(FixedOffset::utc()))
    }

    /// A calendar with a constant offset from UTC.
    pub fn with_offset(offset: UtcTimeSpan) -> Self {
        Self::new(Arc::new(FixedOffset::new(offset)))
    }

    /// A calendar in the timezone registered under `region`.
    pub fn from_region(db: &TzDatabase, region: &str) -> Result<Self, TzLookupError> {
        db.lookup_by_region(region).map(Self::new)
    }

    /// The timezone of the calendar.
    pub fn tz(&self) -> &SharedTzInfo {
        &self.tz
    }

    /// Days elapsed since 0000-01-01 in the proleptic Gregorian calendar.
    ///
    /// Days beyond the end of the month run into the next month, so the 31st
    /// of April has the same day number as the 1st of May. The time fields are
    /// ignored.
    pub fn day_number(c: &YMDhms) -> i64 {
        date_time::day_number(c.year(), c.month(), c.day())
    }

    /// Date at a day number, with null time fields.
    ///
    /// This is the inverse of [`Calendar::day_number`] for existing dates.
    pub fn from_day_number(day_number: i64) -> YMDhms {
        let (year, month, day) = date_time::ymd_from_day_number(day_number);

        YMDhms::from_parts(year, month, day, 0, 0, 0, 0)
    }

    /// UTC year of `t`, or `None` for `NO_TIME`.
    pub fn utc_year(t: UtcTime) -> Option<i32> {
        date_time::utc_year(t)
    }

    /// Local calendar coordinates of `t`.
    ///
    /// `NO_TIME`, `MAX` and `MIN` map to [`YMDhms::NULL`], [`YMDhms::MAX`]
    /// and [`YMDhms::MIN`].
    pub fn calendar_units(&self, t: UtcTime) -> YMDhms {
        match t {
            UtcTime::NO_TIME => YMDhms::NULL,
            UtcTime::MAX => YMDhms::MAX,
            UtcTime::MIN => YMDhms::MIN,
            _ => civil_from_micros(self.to_local(t)),
        }
    }

    /// Local ISO 8601 week coordinates of `t`.
    ///
    /// `NO_TIME`, `MAX` and `MIN` map to [`YWdhms::NULL`], [`YWdhms::MAX`]
    /// and [`YWdhms::MIN`].
    pub fn calendar_week_units(&self, t: UtcTime) -> YWdhms {
        match t {
            UtcTime::NO_TIME => return YWdhms::NULL,
            UtcTime::MAX => return YWdhms::MAX,
            UtcTime::MIN => return YWdhms::MIN,
            _ => {}
        }
        let local = self.to_local(t);
        let c = civil_from_micros(local);
        let days = local.div_euclid(MICROS_PER_DAY) + UNIX_DAY;
        let wday = iso_week_day(days);

        // The ISO year is the year of the Thursday of the week.
        let (iso_year, doy) = year_and_day_of_year(days - wday + 4);

        YWdhms::from_parts(
            iso_year as i32,
            doy / 7 + 1,
            wday as i32,
            c.hour(),
            c.minute(),
            c.second(),
            c.micro_second(),
        )
    }

    /// Time at local calendar coordinates.
    ///
    /// [`YMDhms::NULL`], [`YMDhms::MAX`] and [`YMDhms::MIN`] map to
    /// `NO_TIME`, `MAX` and `MIN`.
    pub fn time(&self, c: &YMDhms) -> UtcTime {
        if c.is_null() {
            UtcTime::NO_TIME
        } else if *c == YMDhms::MAX {
            UtcTime::MAX
        } else if *c == YMDhms::MIN {
            UtcTime::MIN
        } else {
            self.resolve_local(micros_from_civil(c))
        }
    }

    /// Time at validated local calendar coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::{Calendar, DateTimeError, UtcTimeSpan};
    ///
    /// let cal = Calendar::with_offset(UtcTimeSpan::from_hours(2));
    ///
    /// assert_eq!(
    ///     cal.time_from_ymd(2021, 7, 15, 12, 0, 0).unwrap().to_string(),
    ///     "2021-07-15T10:00:00Z"
    /// );
    /// assert_eq!(
    ///     cal.time_from_ymd(2021, 7, 15, 12, 60, 0),
    ///     Err(DateTimeError::InvalidMinute(60))
    /// );
    /// ```
    pub fn time_from_ymd(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<UtcTime, DateTimeError> {
        YMDhms::new(year, month, day, hour, minute, second).map(|c| self.time(&c))
    }

    /// Time at local ISO 8601 week coordinates.
    ///
    /// [`YWdhms::NULL`], [`YWdhms::MAX`] and [`YWdhms::MIN`] map to
    /// `NO_TIME`, `MAX` and `MIN`.
    pub fn time_iso_week(&self, c: &YWdhms) -> UtcTime {
        if c.is_null() {
            return UtcTime::NO_TIME;
        } else if *c == YWdhms::MAX {
            return UtcTime::MAX;
        } else if *c == YWdhms::MIN {
            return UtcTime::MIN;
        }

        // Week 1 is the week of January 4th.
        let jan_4 = date_time::day_number(c.iso_year(), 1, 4);
        let days = jan_4 - iso_week_day(jan_4)
            + 7 * (c.iso_week() as i64 - 1)
            + c.week_day() as i64;

        self.resolve_local(micros_from_day(
            days,
            c.hour(),
            c.minute(),
            c.second(),
            c.micro_second(),
        ))
    }

    /// Time at validated local ISO 8601 week coordinates.
    pub fn time_from_week(
        &self,
        iso_year: i32,
        iso_week: i32,
        week_day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<UtcTime, DateTimeError> {
        YWdhms::new(iso_year, iso_week, week_day, hour, minute, second)
            .map(|c| self.time_iso_week(&c))
    }

    /// Local day of the week, from 0 (Sunday) to 6 (Saturday).
    pub fn day_of_week(&self, t: UtcTime) -> Option<u32> {
        self.local_date(t)
            .map(|c| week_day(Self::day_number(&c)) as u32)
    }

    /// Local day of the year, from 1.
    pub fn day_of_year(&self, t: UtcTime) -> Option<u32> {
        self.local_date(t).map(|c| {
            let days = Self::day_number(&c) - date_time::day_number(c.year(), 1, 1);
            days as u32 + 1
        })
    }

    /// Local month, from 1.
    pub fn month(&self, t: UtcTime) -> Option<u32> {
        self.local_date(t).map(|c| c.month() as u32)
    }

    /// Local quarter, from 1.
    pub fn quarter(&self, t: UtcTime) -> Option<u32> {
        self.month(t).map(|month| (month - 1) / 3 + 1)
    }

    /// Formats `t` in local time followed by the offset to UTC, e.g.
    /// `2021-07-15T12:00:00+02:00`.
    pub fn format(&self, t: UtcTime) -> String {
        let mut s = String::new();
        let _ = date_time::write_iso8601(&mut s, t, self.tz.utc_offset(t));

        s
    }

    /// Formats a period as `[start,end>` in local time.
    pub fn format_period(&self, p: &UtcPeriod) -> String {
        let mut s = String::from("[");
        s.push_str(&self.format(p.start));
        s.push(',');
        s.push_str(&self.format(p.end));
        s.push('>');

        s
    }

    /// Truncates `t` to the start of its calendar unit.
    ///
    /// Calendar units are truncated in local time, with weeks starting on
    /// Monday. Other spans round down to a multiple of `dt` since the epoch
    /// regardless of the timezone; see [`UtcTime::floor`]. `NO_TIME`, `MAX`
    /// and `MIN` are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::{Calendar, UtcTimeSpan};
    ///
    /// let cal = Calendar::with_offset(UtcTimeSpan::from_hours(-5));
    /// let t = cal.time_from_ymd(2021, 7, 15, 20, 30, 0).unwrap();
    ///
    /// assert_eq!(
    ///     cal.format(cal.trim(t, Calendar::WEEK)),
    ///     "2021-07-12T00:00:00-05:00"
    /// );
    /// assert_eq!(
    ///     cal.format(cal.trim(t, Calendar::HOUR_3)),
    ///     "2021-07-15T19:00:00-05:00"
    /// );
    /// ```
    pub fn trim(&self, t: UtcTime, dt: UtcTimeSpan) -> UtcTime {
        if t.is_reserved() {
            return t;
        }
        let mut c = self.calendar_units(t);
        match dt {
            Self::DAY => {}
            Self::WEEK => {
                let days = Self::day_number(&c);
                let monday = days - iso_week_day(days) + 1;
                return self.resolve_local(micros_from_day(monday, 0, 0, 0, 0));
            }
            Self::MONTH => c.set_date(c.year(), c.month(), 1),
            Self::QUARTER => c.set_date(c.year(), (c.month() - 1) / 3 * 3 + 1, 1),
            Self::YEAR => c.set_date(c.year(), 1, 1),
            _ => return t.floor(dt),
        }
        c.set_time_of_day(0, 0, 0);

        self.resolve_local(micros_from_civil(&c))
    }

    /// Adds `n` units of `dt` to `t`.
    ///
    /// Adding days or weeks preserves the local time of day across DST
    /// changes. Adding months, quarters or years preserves the local time of
    /// day and the day of the month, clamped to the length of the target
    /// month. Other spans are added as fixed durations.
    ///
    /// The result saturates at `MIN` and `MAX`; `NO_TIME`, `MAX` and `MIN`
    /// are returned unchanged.
    pub fn add(&self, t: UtcTime, dt: UtcTimeSpan, n: i64) -> UtcTime {
        if t.is_reserved() || n == 0 {
            return t;
        }
        match dt {
            Self::DAY | Self::WEEK => {
                let r = fixed_add(t, dt, n);
                if r.is_reserved() {
                    return r;
                }
                r.saturating_add(self.tz.utc_offset(t) - self.tz.utc_offset(r))
            }
            Self::MONTH | Self::QUARTER | Self::YEAR => {
                self.add_months(t, n.saturating_mul(months_per_unit(dt)))
            }
            _ => fixed_add(t, dt, n),
        }
    }

    /// Number of whole units of `dt` from `t1` to `t2`, truncated toward zero.
    ///
    /// See [`Calendar::diff_units_remainder`].
    pub fn diff_units(&self, t1: UtcTime, t2: UtcTime, dt: UtcTimeSpan) -> i64 {
        self.diff_units_remainder(t1, t2, dt).0
    }

    /// Number of whole units of `dt` from `t1` to `t2`, truncated toward zero,
    /// and the remaining span.
    ///
    /// The result `(n, remainder)` satisfies `add(t1, dt, n) + remainder ==
    /// t2`; the remainder has the sign of `t2 - t1`. A day spanning a DST
    /// change counts as one whole day.
    ///
    /// `(0, 0)` is returned if either time is `NO_TIME`, `MIN` or `MAX`, or if
    /// `dt` is null.
    ///
    /// # Examples
    ///
    /// ```
    /// use utc_calendar::{Calendar, UtcTimeSpan};
    ///
    /// let cal = Calendar::utc();
    /// let t1 = cal.time_from_ymd(2021, 1, 31, 0, 0, 0).unwrap();
    /// let t2 = cal.time_from_ymd(2021, 3, 30, 12, 0, 0).unwrap();
    ///
    /// // January 31st + 1 month is February 28th.
    /// assert_eq!(
    ///     cal.diff_units_remainder(t1, t2, Calendar::MONTH),
    ///     (1, UtcTimeSpan::from_days(30) + UtcTimeSpan::from_hours(12))
    /// );
    /// ```
    pub fn diff_units_remainder(
        &self,
        t1: UtcTime,
        t2: UtcTime,
        dt: UtcTimeSpan,
    ) -> (i64, UtcTimeSpan) {
        if t1.is_reserved() || t2.is_reserved() || dt == UtcTimeSpan::ZERO {
            return (0, UtcTimeSpan::ZERO);
        }
        let estimate = match dt {
            Self::DAY | Self::WEEK => {
                let local =
                    |t: UtcTime| t.as_micros() as i128 + self.tz.utc_offset(t).as_micros() as i128;
                clamp_i64((local(t2) - local(t1)) / dt.as_micros() as i128)
            }
            Self::MONTH | Self::QUARTER | Self::YEAR => {
                let c1 = self.calendar_units(t1);
                let c2 = self.calendar_units(t2);
                let months = 12 * (c2.year() as i64 - c1.year() as i64)
                    + (c2.month() as i64 - c1.month() as i64);
                months / months_per_unit(dt)
            }
            _ => {
                let span = t2.as_micros() as i128 - t1.as_micros() as i128;
                clamp_i64(span / dt.as_micros() as i128)
            }
        };
        let n = match dt {
            Self::DAY | Self::WEEK | Self::MONTH | Self::QUARTER | Self::YEAR => {
                self.settle(t1, t2, dt, estimate)
            }
            _ => estimate,
        };
        let r = self.add(t1, dt, n);

        (
            n,
            UtcTimeSpan::from_micros(clamp_i64(
                t2.as_micros() as i128 - r.as_micros() as i128,
            )),
        )
    }

    /// Corrects an estimated unit count so that `add(t1, dt, n)` does not go
    /// past `t2` while `add(t1, dt, n ± 1)` does.
    fn settle(&self, t1: UtcTime, t2: UtcTime, dt: UtcTimeSpan, estimate: i64) -> i64 {
        if t2 >= t1 {
            let mut n = estimate.max(0);
            while n > 0 && self.add(t1, dt, n) > t2 {
                n -= 1;
            }
            let mut current = self.add(t1, dt, n);
            while n < i64::MAX {
                let next = self.add(t1, dt, n + 1);
                if next > t2 || next == current {
                    break;
                }
                n += 1;
                current = next;
            }
            n
        } else {
            let mut n = estimate.min(0);
            while n < 0 && self.add(t1, dt, n) < t2 {
                n += 1;
            }
            let mut current = self.add(t1, dt, n);
            while n > i64::MIN {
                let next = self.add(t1, dt, n - 1);
                if next < t2 || next == current {
                    break;
                }
                n -= 1;
                current = next;
            }
            n
        }
    }

    fn add_months(&self, t: UtcTime, months: i64) -> UtcTime {
        let mut c = self.calendar_units(t);
        let month0 = (12 * c.year() as i64 + c.month() as i64 - 1).saturating_add(months);
        let year = match i32::try_from(month0.div_euclid(12)) {
            Ok(year) => year,
            Err(_) if months > 0 => return UtcTime::MAX,
            Err(_) => return UtcTime::MIN,
        };
        let month = month0.rem_euclid(12) as i32 + 1;
        c.set_date(year, month, c.day().min(days_in_month(year, month)));

        self.resolve_local(micros_from_civil(&c))
    }

    /// Local date of `t`, or `None` for `NO_TIME`.
    fn local_date(&self, t: UtcTime) -> Option<YMDhms> {
        if t.is_valid() {
            Some(self.calendar_units(t))
        } else {
            None
        }
    }

    fn to_local(&self, t: UtcTime) -> i64 {
        t.as_micros()
            .saturating_add(self.tz.utc_offset(t).as_micros())
    }

    /// Resolves a local microsecond count to a time.
    ///
    /// The base offset is tried first; if another offset is in force at the
    /// resulting time, the local time is re-resolved with that offset, which
    /// is kept only if it is in force at its own result.
    fn resolve_local(&self, local: i64) -> UtcTime {
        let base = self.tz.base_offset();
        let candidate = UtcTime::clamped(local as i128 - base.as_micros() as i128);
        let offset = self.tz.utc_offset(candidate);
        if offset == base {
            return candidate;
        }
        let corrected = UtcTime::clamped(local as i128 - offset.as_micros() as i128);
        if self.tz.utc_offset(corrected) == offset {
            corrected
        } else {
            candidate
        }
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

/// ISO week day of a day number, from 1 (Monday) to 7 (Sunday).
fn iso_week_day(day_number: i64) -> i64 {
    (week_day(day_number) as i64 + 6) % 7 + 1
}

fn months_per_unit(dt: UtcTimeSpan) -> i64 {
    match dt {
        Calendar::QUARTER => 3,
        Calendar::YEAR => 12,
        _ => 1,
    }
}

/// `t + n * dt` on the fixed axis, saturating at `MIN` and `MAX`.
fn fixed_add(t: UtcTime, dt: UtcTimeSpan, n: i64) -> UtcTime {
    UtcTime::clamped(t.as_micros() as i128 + dt.as_micros() as i128 * n as i128)
}

fn clamp_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EuSummerTime, TzTable};

    // 2021-07-15T10:00:00Z.
    const SUMMER: i64 = 1_626_343_200;
    // 2021-03-28T01:00:00Z and 2021-10-31T01:00:00Z.
    const DST_START: i64 = 1_616_893_200;
    const DST_END: i64 = 1_635_642_000;

    fn cet() -> Calendar {
        let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
        Calendar::new(Arc::new(TzTable::from_rule(&rule, 2000, 50)))
    }

    fn secs(s: i64) -> UtcTime {
        UtcTime::from_secs(s)
    }

    /// Deterministic times between 2019 and 2023.
    fn sample_times(count: usize) -> impl Iterator<Item = UtcTime> {
        const START: u64 = 1_546_300_800_000_000;
        const SPAN: u64 = 126_230_400_000_000;
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;

        (0..count).map(move |_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            UtcTime::from_micros((START + (state >> 11) % SPAN) as i64)
        })
    }

    #[test]
    fn summer_time_example() {
        let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
        let cal = Calendar::new(Arc::new(TzTable::from_rule(&rule, 2021, 1)));

        let c = YMDhms::new(2021, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(cal.time(&c), secs(SUMMER));
        assert_eq!(cal.calendar_units(secs(SUMMER)), c);
        assert_eq!(cal.format(secs(SUMMER)), "2021-07-15T12:00:00+02:00");
    }

    #[test]
    fn transition_policy() {
        let cal = cet();

        // Skipped and repeated local times resolve after the change.
        assert_eq!(
            cal.time_from_ymd(2021, 3, 28, 2, 30, 0),
            Ok(secs(DST_START + 1800))
        );
        assert_eq!(
            cal.time_from_ymd(2021, 10, 31, 2, 30, 0),
            Ok(secs(DST_END + 1800))
        );
        assert_eq!(
            cal.time_from_ymd(2021, 3, 28, 3, 0, 0),
            Ok(secs(DST_START))
        );
        assert_eq!(
            cal.time_from_ymd(2021, 10, 31, 1, 30, 0),
            Ok(secs(DST_END - 5400))
        );
        assert_eq!(cal.format(secs(DST_START)), "2021-03-28T03:00:00+02:00");
        assert_eq!(cal.format(secs(DST_END)), "2021-10-31T02:00:00+01:00");
    }

    #[test]
    fn round_trip_without_dst() {
        for cal in [
            Calendar::utc(),
            Calendar::with_offset(UtcTimeSpan::from_minutes(330)),
            Calendar::with_offset(UtcTimeSpan::from_hours(-10)),
        ] {
            let mut t = -100_000_000_000_000_000;
            while t < 100_000_000_000_000_000 {
                let t_utc = UtcTime::from_micros(t);
                assert_eq!(cal.time(&cal.calendar_units(t_utc)), t_utc);
                assert_eq!(cal.time_iso_week(&cal.calendar_week_units(t_utc)), t_utc);
                t += 7_777_777_777_777;
            }
        }
    }

    #[test]
    fn round_trip_with_dst() {
        let cal = cet();
        for t in sample_times(2_000) {
            // The first occurrence of a repeated local hour resolves to the
            // second one.
            if cal.tz().utc_offset(t) != cal.tz().utc_offset(t + Calendar::HOUR) {
                continue;
            }
            assert_eq!(cal.time(&cal.calendar_units(t)), t);
        }
    }

    #[test]
    fn special_values() {
        let cal = cet();

        assert_eq!(cal.calendar_units(UtcTime::NO_TIME), YMDhms::NULL);
        assert_eq!(cal.calendar_units(UtcTime::MAX), YMDhms::MAX);
        assert_eq!(cal.calendar_units(UtcTime::MIN), YMDhms::MIN);
        assert_eq!(cal.time(&YMDhms::NULL), UtcTime::NO_TIME);
        assert_eq!(cal.time(&YMDhms::MAX), UtcTime::MAX);
        assert_eq!(cal.time(&YMDhms::MIN), UtcTime::MIN);

        assert_eq!(cal.calendar_week_units(UtcTime::NO_TIME), YWdhms::NULL);
        assert_eq!(cal.calendar_week_units(UtcTime::MAX), YWdhms::MAX);
        assert_eq!(cal.calendar_week_units(UtcTime::MIN), YWdhms::MIN);
        assert_eq!(cal.time_iso_week(&YWdhms::NULL), UtcTime::NO_TIME);
        assert_eq!(cal.time_iso_week(&YWdhms::MAX), UtcTime::MAX);
        assert_eq!(cal.time_iso_week(&YWdhms::MIN), UtcTime::MIN);

        assert_eq!(cal.day_of_week(UtcTime::NO_TIME), None);
        assert_eq!(cal.day_of_year(UtcTime::NO_TIME), None);
        assert_eq!(cal.month(UtcTime::NO_TIME), None);
        assert_eq!(cal.quarter(UtcTime::NO_TIME), None);
    }

    #[test]
    fn day_number_round_trip() {
        for year in (YMDhms::YEAR_MIN..=YMDhms::YEAR_MAX).step_by(97) {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let c = YMDhms::from_date(year, month, day).unwrap();
                    assert_eq!(Calendar::from_day_number(Calendar::day_number(&c)), c);
                }
            }
        }
        let april_31 = YMDhms::from_date(2021, 4, 31).unwrap();
        assert_eq!(
            Calendar::from_day_number(Calendar::day_number(&april_31)),
            YMDhms::from_date(2021, 5, 1).unwrap()
        );
        assert_eq!(Calendar::utc_year(secs(SUMMER)), Some(2021));
    }

    #[test]
    fn iso_weeks() {
        let cal = Calendar::utc();
        let week = |y, m, d| {
            let c = cal.calendar_week_units(cal.time_from_ymd(y, m, d, 0, 0, 0).unwrap());
            (c.iso_year(), c.iso_week(), c.week_day())
        };

        assert_eq!(week(2020, 12, 31), (2020, 53, 4));
        assert_eq!(week(2021, 1, 1), (2020, 53, 5));
        assert_eq!(week(2021, 1, 3), (2020, 53, 7));
        assert_eq!(week(2021, 1, 4), (2021, 1, 1));
        assert_eq!(week(2024, 1, 1), (2024, 1, 1));
        assert_eq!(week(2019, 12, 30), (2020, 1, 1));
        assert_eq!(week(9999, 12, 31), (9999, 52, 5));

        assert_eq!(
            cal.time_from_week(2020, 53, 5, 0, 0, 0),
            cal.time_from_ymd(2021, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            cal.time_from_week(2021, 0, 1, 0, 0, 0),
            Err(DateTimeError::InvalidIsoWeek(0))
        );
    }

    #[test]
    fn date_queries() {
        let cal = cet();
        let t = cal.time_from_ymd(2021, 3, 28, 12, 0, 0).unwrap();

        assert_eq!(cal.day_of_week(t), Some(0));
        assert_eq!(cal.day_of_year(t), Some(87));
        assert_eq!(cal.month(t), Some(3));
        assert_eq!(cal.quarter(t), Some(1));

        // 23:30 UTC on December 31st is already January 1st in CET.
        let t = cal.time_from_ymd(2021, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(Calendar::utc().day_of_year(t), Some(366));
        assert_eq!(cal.day_of_year(t), Some(1));
        assert_eq!(cal.quarter(t), Some(1));
        assert_eq!(Calendar::utc().quarter(t), Some(4));
        assert_eq!(cal.day_of_week(t), Some(5));
    }

    #[test]
    fn formatting() {
        let cal = cet();

        assert_eq!(cal.format(UtcTime::NO_TIME), "not-a-date-time");
        assert_eq!(cal.format(UtcTime::MAX), "+oo");
        assert_eq!(cal.format(UtcTime::MIN), "-oo");
        assert_eq!(
            cal.format_period(&UtcPeriod::new(secs(DST_START), secs(DST_END))),
            "[2021-03-28T03:00:00+02:00,2021-10-31T02:00:00+01:00>"
        );
        assert_eq!(Calendar::utc().format(secs(SUMMER)), "2021-07-15T10:00:00Z");
        assert_eq!(
            Calendar::with_offset(UtcTimeSpan::from_minutes(-210)).format(secs(SUMMER)),
            "2021-07-15T06:30:00-03:30"
        );
    }

    #[test]
    fn trim_calendar_units() {
        let cal = cet();
        let t = cal.time_from_ymd(2021, 8, 15, 12, 34, 56).unwrap();
        let trimmed = |dt| cal.format(cal.trim(t, dt));

        assert_eq!(trimmed(Calendar::DAY), "2021-08-15T00:00:00+02:00");
        assert_eq!(trimmed(Calendar::WEEK), "2021-08-09T00:00:00+02:00");
        assert_eq!(trimmed(Calendar::MONTH), "2021-08-01T00:00:00+02:00");
        assert_eq!(trimmed(Calendar::QUARTER), "2021-07-01T00:00:00+02:00");
        assert_eq!(trimmed(Calendar::YEAR), "2021-01-01T00:00:00+01:00");
        assert_eq!(trimmed(Calendar::HOUR), "2021-08-15T12:00:00+02:00");

        // Monday is the first day of the week.
        let monday = cal.time_from_ymd(2021, 8, 9, 0, 0, 0).unwrap();
        let sunday = cal.time_from_ymd(2021, 8, 15, 23, 59, 59).unwrap();
        assert_eq!(cal.trim(monday, Calendar::WEEK), monday);
        assert_eq!(cal.trim(sunday, Calendar::WEEK), monday);

        for t in [UtcTime::NO_TIME, UtcTime::MAX, UtcTime::MIN] {
            assert_eq!(cal.trim(t, Calendar::DAY), t);
            assert_eq!(cal.trim(t, Calendar::HOUR), t);
        }
    }

    #[test]
    fn trim_fixed_units_ignores_timezone() {
        let cal = Calendar::with_offset(UtcTimeSpan::from_minutes(330));
        // 10:34:56Z.
        let t = secs(SUMMER + 2096);

        assert_eq!(cal.trim(t, Calendar::HOUR), secs(SUMMER));
        assert_eq!(cal.format(cal.trim(t, Calendar::HOUR)), "2021-07-15T15:30:00+05:30");
        assert_eq!(cal.trim(t, -Calendar::HOUR), secs(SUMMER + 3600));
        assert_eq!(cal.trim(t, UtcTimeSpan::ZERO), t);
    }

    #[test]
    fn trim_day_is_idempotent() {
        let cal = cet();
        for t in sample_times(2_000) {
            let day = cal.trim(t, Calendar::DAY);
            assert!(day <= t);
            assert_eq!(cal.trim(day, Calendar::DAY), day);
            assert_eq!(cal.calendar_units(day).hour(), 0);
        }
    }

    #[test]
    fn add_days_keeps_wall_clock() {
        let cal = cet();

        let t = cal.time_from_ymd(2021, 3, 27, 12, 0, 0).unwrap();
        let next = cal.add(t, Calendar::DAY, 1);
        assert_eq!(cal.format(next), "2021-03-28T12:00:00+02:00");
        assert_eq!(next - t, UtcTimeSpan::from_hours(23));

        let t = cal.time_from_ymd(2021, 10, 30, 12, 0, 0).unwrap();
        let next = cal.add(t, Calendar::DAY, 1);
        assert_eq!(cal.format(next), "2021-10-31T12:00:00+01:00");
        assert_eq!(next - t, UtcTimeSpan::from_hours(25));

        let t = cal.time_from_ymd(2021, 3, 22, 6, 0, 0).unwrap();
        assert_eq!(
            cal.format(cal.add(t, Calendar::WEEK, 1)),
            "2021-03-29T06:00:00+02:00"
        );
    }

    #[test]
    fn add_days_round_trip() {
        let cal = cet();
        for month in [3, 10] {
            for day in 20..=31 {
                for hour in [0, 1, 6, 12, 18, 23] {
                    let t = cal.time_from_ymd(2021, month, day, hour, 0, 0).unwrap();
                    for n in -10..=10 {
                        for dt in [Calendar::DAY, Calendar::WEEK] {
                            assert_eq!(cal.add(cal.add(t, dt, n), dt, -n), t);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn add_months_clamps_day() {
        let cal = cet();
        let at = |y, m, d| cal.time_from_ymd(y, m, d, 0, 0, 0).unwrap();

        assert_eq!(cal.add(at(2021, 1, 31), Calendar::MONTH, 1), at(2021, 2, 28));
        assert_eq!(cal.add(at(2020, 1, 31), Calendar::MONTH, 1), at(2020, 2, 29));
        assert_eq!(cal.add(at(2021, 3, 31), Calendar::MONTH, -1), at(2021, 2, 28));
        assert_eq!(cal.add(at(2021, 11, 30), Calendar::MONTH, 3), at(2022, 2, 28));
        assert_eq!(cal.add(at(2021, 1, 15), Calendar::MONTH, -13), at(2019, 12, 15));
        assert_eq!(cal.add(at(2020, 2, 29), Calendar::YEAR, 1), at(2021, 2, 28));
        assert_eq!(cal.add(at(2021, 8, 31), Calendar::QUARTER, 1), at(2021, 11, 30));

        // Across DST the local time of day is kept.
        let t = cal.time_from_ymd(2021, 2, 10, 12, 0, 0).unwrap();
        assert_eq!(
            cal.format(cal.add(t, Calendar::MONTH, 2)),
            "2021-04-10T12:00:00+02:00"
        );
    }

    #[test]
    fn add_fixed_and_special() {
        let cal = cet();
        let t = secs(SUMMER);

        assert_eq!(cal.add(t, Calendar::HOUR, 3), secs(SUMMER + 3 * 3600));
        assert_eq!(cal.add(t, Calendar::DAY, 0), t);
        assert_eq!(cal.add(UtcTime::NO_TIME, Calendar::DAY, 1), UtcTime::NO_TIME);
        assert_eq!(cal.add(UtcTime::MAX, Calendar::MONTH, -1), UtcTime::MAX);
        assert_eq!(cal.add(t, Calendar::SECOND, i64::MAX), UtcTime::MAX);
        assert_eq!(cal.add(t, Calendar::DAY, i64::MIN), UtcTime::MIN);
        assert_eq!(cal.add(t, Calendar::YEAR, i64::MAX), UtcTime::MAX);
    }

    #[test]
    fn add_saturates_against_the_sign_of_t() {
        let cal = cet();
        let past = secs(-1_600_000_000);
        let t = secs(SUMMER);

        assert_eq!(cal.add(past, Calendar::SECOND, i64::MAX), UtcTime::MAX);
        assert_eq!(cal.add(past, Calendar::DAY, i64::MAX), UtcTime::MAX);
        assert_eq!(cal.add(past, Calendar::WEEK, i64::MAX), UtcTime::MAX);
        assert_eq!(cal.add(t, Calendar::HOUR, i64::MIN), UtcTime::MIN);
        assert_eq!(cal.add(t, Calendar::DAY, i64::MIN), UtcTime::MIN);
        assert_eq!(cal.add(t, Calendar::WEEK, i64::MIN), UtcTime::MIN);
    }

    #[test]
    fn diff_over_short_day() {
        let cal = cet();
        let t1 = cal.time_from_ymd(2021, 3, 28, 0, 0, 0).unwrap();
        let t2 = cal.time_from_ymd(2021, 3, 29, 0, 0, 0).unwrap();

        assert_eq!(t2 - t1, UtcTimeSpan::from_hours(23));
        assert_eq!(
            cal.diff_units_remainder(t1, t2, Calendar::DAY),
            (1, UtcTimeSpan::ZERO)
        );
        assert_eq!(
            cal.diff_units_remainder(t2, t1, Calendar::DAY),
            (-1, UtcTimeSpan::ZERO)
        );
        assert_eq!(
            cal.diff_units_remainder(t1, t2, Calendar::HOUR),
            (23, UtcTimeSpan::ZERO)
        );
    }

    #[test]
    fn diff_matches_add() {
        let cal = cet();
        let times: alloc::vec::Vec<_> = sample_times(200).collect();
        let units = [
            Calendar::DAY,
            Calendar::WEEK,
            Calendar::MONTH,
            Calendar::QUARTER,
            Calendar::YEAR,
            Calendar::HOUR_3,
        ];

        for pair in times.windows(2) {
            let (t1, t2) = (pair[0], pair[1]);
            for dt in units {
                let (n, remainder) = cal.diff_units_remainder(t1, t2, dt);
                assert_eq!(cal.add(t1, dt, n) + remainder, t2);
                if t2 >= t1 {
                    assert!(!remainder.is_negative());
                    assert!(cal.add(t1, dt, n + 1) > t2);
                } else {
                    assert!(remainder <= UtcTimeSpan::ZERO);
                    assert!(cal.add(t1, dt, n - 1) < t2);
                }
            }
        }
    }

    #[test]
    fn diff_degenerate() {
        let cal = cet();
        let t = secs(SUMMER);

        assert_eq!(
            cal.diff_units_remainder(UtcTime::NO_TIME, t, Calendar::DAY),
            (0, UtcTimeSpan::ZERO)
        );
        assert_eq!(
            cal.diff_units_remainder(t, UtcTime::NO_TIME, Calendar::HOUR),
            (0, UtcTimeSpan::ZERO)
        );
        assert_eq!(
            cal.diff_units_remainder(t, t + Calendar::HOUR, UtcTimeSpan::ZERO),
            (0, UtcTimeSpan::ZERO)
        );
        assert_eq!(
            cal.diff_units_remainder(t, t - UtcTimeSpan::from_minutes(90), Calendar::HOUR),
            (-1, -UtcTimeSpan::from_minutes(30))
        );
        assert_eq!(cal.diff_units(t, t, Calendar::MONTH), 0);
    }

    #[test]
    fn diff_with_axis_bounds() {
        let cal = cet();
        let t = secs(SUMMER);

        assert_eq!(
            cal.diff_units_remainder(UtcTime::MIN, t, Calendar::DAY),
            (0, UtcTimeSpan::ZERO)
        );
        assert_eq!(
            cal.diff_units_remainder(t, UtcTime::MAX, Calendar::HOUR),
            (0, UtcTimeSpan::ZERO)
        );
        assert_eq!(cal.diff_units(t, UtcTime::MAX, Calendar::MONTH), 0);
        assert_eq!(cal.diff_units(UtcTime::MIN, UtcTime::MAX, Calendar::YEAR), 0);
    }

    #[test]
    fn diff_count_saturates() {
        let cal = Calendar::utc();
        let t1 = UtcTime::from_micros(-5_000_000_000_000_000_000);
        let t2 = UtcTime::from_micros(5_000_000_000_000_000_000);
        let dt = UtcTimeSpan::from_micros(1);

        let (n, remainder) = cal.diff_units_remainder(t1, t2, dt);
        assert_eq!(n, i64::MAX);
        assert!(remainder > UtcTimeSpan::ZERO);
        assert_eq!(cal.add(t1, dt, n) + remainder, t2);

        let (n, remainder) = cal.diff_units_remainder(t2, t1, dt);
        assert_eq!(n, i64::MIN);
        assert_eq!(cal.add(t2, dt, n) + remainder, t1);
    }

    #[test]
    fn from_region() {
        let mut db = TzDatabase::new();
        let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
        db.add_tz_info("Europe/Oslo", Arc::new(TzTable::from_rule_default(&rule)));

        let cal = Calendar::from_region(&db, "Europe/Oslo").unwrap();
        assert_eq!(cal.format(secs(SUMMER)), "2021-07-15T12:00:00+02:00");
        assert!(Arc::ptr_eq(cal.tz(), cal.clone().tz()));
        assert_eq!(
            Calendar::from_region(&db, "Europe/Paris").unwrap_err(),
            TzLookupError::RegionNotFound("Europe/Paris".into())
        );
    }
}
