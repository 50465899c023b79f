//! Timezone offsets and daylight saving time tables.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{self, Write};

use tracing::{debug, trace};

use crate::date_time::{self, days_in_month, week_day};
use crate::{TzTableError, UtcPeriod, UtcTime, UtcTimeSpan, YMDhms};

/// Offset and daylight saving time queries of a timezone.
///
/// Implementors must be immutable once built since they are shared between
/// calendars through [`SharedTzInfo`].
pub trait TzInfo: fmt::Debug + Send + Sync {
    /// Name of the timezone, e.g. `CET`.
    fn name(&self) -> &str;

    /// Offset from UTC outside of DST.
    fn base_offset(&self) -> UtcTimeSpan;

    /// Offset from UTC in force at `t`, DST included.
    fn utc_offset(&self, t: UtcTime) -> UtcTimeSpan;

    /// Returns whether DST is in force at `t`.
    fn is_dst(&self, t: UtcTime) -> bool;
}

/// A shared handle to immutable timezone information.
pub type SharedTzInfo = Arc<dyn TzInfo>;

/// A timezone with a constant offset from UTC.
///
/// # Examples
///
/// ```
/// use utc_calendar::{FixedOffset, TzInfo, UtcTime, UtcTimeSpan};
///
/// let tz = FixedOffset::new(UtcTimeSpan::from_minutes(-210));
///
/// assert_eq!(tz.name(), "UTC-03:30");
/// assert_eq!(tz.utc_offset(UtcTime::EPOCH), UtcTimeSpan::from_minutes(-210));
/// assert!(!tz.is_dst(UtcTime::EPOCH));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedOffset {
    name: String,
    offset: UtcTimeSpan,
}

impl FixedOffset {
    /// Creates a fixed offset timezone named after its offset, e.g. `UTC`,
    /// `UTC+01` or `UTC-03:30`.
    pub fn new(offset: UtcTimeSpan) -> Self {
        let mut name = String::from("UTC");
        let minutes = offset.as_secs() / 60;
        if minutes != 0 {
            let sign = if minutes < 0 { '-' } else { '+' };
            let minutes = minutes.unsigned_abs();
            let _ = write!(name, "{}{:02}", sign, minutes / 60);
            if minutes % 60 != 0 {
                let _ = write!(name, ":{:02}", minutes % 60);
            }
        }

        Self { name, offset }
    }

    /// Creates a named fixed offset timezone.
    pub fn with_name(name: impl Into<String>, offset: UtcTimeSpan) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }

    /// The UTC timezone.
    pub fn utc() -> Self {
        Self::new(UtcTimeSpan::ZERO)
    }
}

impl TzInfo for FixedOffset {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_offset(&self) -> UtcTimeSpan {
        self.offset
    }

    fn utc_offset(&self, _t: UtcTime) -> UtcTimeSpan {
        self.offset
    }

    fn is_dst(&self, _t: UtcTime) -> bool {
        false
    }
}

/// A yearly daylight saving time rule.
pub trait DstRule {
    /// Name of the timezone following the rule.
    fn name(&self) -> &str;

    /// Offset from UTC outside of DST.
    fn base_offset(&self) -> UtcTimeSpan;

    /// Start of DST in the given year.
    fn dst_start(&self, year: i32) -> UtcTime;

    /// End of DST in the given year.
    fn dst_end(&self, year: i32) -> UtcTime;

    /// Offset added to the base offset during DST.
    fn dst_offset(&self, year: i32) -> UtcTimeSpan;
}

/// European Union summer time: one extra hour from the last Sunday of March
/// to the last Sunday of October, both at 01:00 UTC.
///
/// # Examples
///
/// ```
/// use utc_calendar::{DstRule, EuSummerTime, UtcTimeSpan};
///
/// let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
///
/// assert_eq!(rule.dst_start(2021).to_string(), "2021-03-28T01:00:00Z");
/// assert_eq!(rule.dst_end(2021).to_string(), "2021-10-31T01:00:00Z");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EuSummerTime {
    name: String,
    base_offset: UtcTimeSpan,
}

impl EuSummerTime {
    /// Creates the rule for a timezone with the given standard offset from
    /// UTC.
    pub fn new(name: impl Into<String>, base_offset: UtcTimeSpan) -> Self {
        Self {
            name: name.into(),
            base_offset,
        }
    }

    /// 01:00 UTC on the last Sunday of the month.
    fn last_sunday(year: i32, month: i32) -> UtcTime {
        let last_day = date_time::day_number(year, month, days_in_month(year, month));
        let sunday = last_day - week_day(last_day) as i64;

        UtcTime::from_micros(date_time::micros_from_day(sunday, 1, 0, 0, 0))
    }
}

impl DstRule for EuSummerTime {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_offset(&self) -> UtcTimeSpan {
        self.base_offset
    }

    fn dst_start(&self, year: i32) -> UtcTime {
        Self::last_sunday(year, 3)
    }

    fn dst_end(&self, year: i32) -> UtcTime {
        Self::last_sunday(year, 10)
    }

    fn dst_offset(&self, _year: i32) -> UtcTimeSpan {
        UtcTimeSpan::from_hours(1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct DstEntry {
    period: UtcPeriod,
    offset: UtcTimeSpan,
}

impl DstEntry {
    const NONE: Self = Self {
        period: UtcPeriod::new(UtcTime::NO_TIME, UtcTime::NO_TIME),
        offset: UtcTimeSpan::ZERO,
    };

    fn is_none(&self) -> bool {
        !self.period.start.is_valid() || !self.period.end.is_valid()
    }
}

/// A timezone with a base offset and a year-indexed table of DST periods.
///
/// The table covers the UTC years `[start_year, start_year + n_years)`. Each
/// year holds a DST period and the offset added to the base offset during that
/// period. A period whose start is after its end, as in the southern
/// hemisphere, has DST in force outside of `[end, start)`. Years outside the
/// table and years without a DST entry have no DST.
///
/// # Examples
///
/// ```
/// use utc_calendar::{EuSummerTime, TzInfo, TzTable, UtcTime, UtcTimeSpan};
///
/// let rule = EuSummerTime::new("CET", UtcTimeSpan::from_hours(1));
/// let tz = TzTable::from_rule(&rule, 2000, 50);
///
/// // 2021-07-15 10:00:00 UTC.
/// let summer = UtcTime::from_secs(1_626_343_200);
/// assert_eq!(tz.utc_offset(summer), UtcTimeSpan::from_hours(2));
/// assert!(tz.is_dst(summer));
///
/// // Out of the table.
/// assert_eq!(tz.utc_offset(UtcTime::EPOCH), UtcTimeSpan::from_hours(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TzTableRecord", into = "TzTableRecord")
)]
pub struct TzTable {
    name: String,
    base_offset: UtcTimeSpan,
    start_year: i32,
    dst: Vec<DstEntry>,
}

impl TzTable {
    /// First year of a table built with the default range.
    pub const DEFAULT_START_YEAR: i32 = 1905;
    /// Number of years of a table built with the default range.
    pub const DEFAULT_N_YEARS: u32 = 200;

    /// Creates a table by evaluating a rule over `n_years` years starting at
    /// `start_year`.
    ///
    /// Years beyond [`YMDhms::YEAR_MAX`] are left out.
    pub fn from_rule<R: DstRule + ?Sized>(rule: &R, start_year: i32, n_years: u32) -> Self {
        let end_year = (start_year as i64 + n_years as i64).min(YMDhms::YEAR_MAX as i64 + 1);
        let dst: Vec<_> = (start_year as i64..end_year)
            .map(|year| {
                let year = year as i32;
                DstEntry {
                    period: UtcPeriod::new(rule.dst_start(year), rule.dst_end(year)),
                    offset: rule.dst_offset(year),
                }
            })
            .collect();

        debug!(
            tz = rule.name(),
            start_year,
            n_years = dst.len(),
            "timezone table built from rule"
        );

        Self {
            name: rule.name().into(),
            base_offset: rule.base_offset(),
            start_year,
            dst,
        }
    }

    /// Creates a table over the default range of years.
    pub fn from_rule_default<R: DstRule + ?Sized>(rule: &R) -> Self {
        Self::from_rule(rule, Self::DEFAULT_START_YEAR, Self::DEFAULT_N_YEARS)
    }

    /// Creates a table from its persisted form.
    pub fn from_record(record: TzTableRecord) -> Result<Self, TzTableError> {
        let mut years: Vec<DstRecord> = record.dst;
        years.sort_by_key(|r| r.year);

        for pair in years.windows(2) {
            if pair[0].year == pair[1].year {
                return Err(TzTableError::DuplicateYear(pair[0].year));
            }
        }
        for r in &years {
            if !(YMDhms::YEAR_MIN..=YMDhms::YEAR_MAX).contains(&r.year) {
                return Err(TzTableError::YearOutOfRange(r.year));
            }
            if !r.start.is_valid() || !r.end.is_valid() {
                return Err(TzTableError::InvalidDstPeriod(r.year));
            }
        }

        let start_year = years.first().map(|r| r.year).unwrap_or(0);
        let n_years = years
            .last()
            .map(|r| (r.year - start_year + 1) as usize)
            .unwrap_or(0);
        let mut dst = Vec::with_capacity(n_years);
        dst.resize(n_years, DstEntry::NONE);
        for r in &years {
            dst[(r.year - start_year) as usize] = DstEntry {
                period: UtcPeriod::new(r.start, r.end),
                offset: r.offset,
            };
        }

        debug!(
            tz = record.name.as_str(),
            start_year,
            n_years,
            "timezone table built from record"
        );

        Ok(Self {
            name: record.name,
            base_offset: record.base_offset,
            start_year,
            dst,
        })
    }

    /// Returns the persisted form of the table; years without DST are left
    /// out.
    pub fn to_record(&self) -> TzTableRecord {
        let dst = self
            .dst
            .iter()
            .zip(self.start_year..)
            .filter(|(entry, _)| !entry.is_none())
            .map(|(entry, year)| DstRecord {
                year,
                start: entry.period.start,
                end: entry.period.end,
                offset: entry.offset,
            })
            .collect();

        TzTableRecord {
            name: self.name.clone(),
            base_offset: self.base_offset,
            dst,
        }
    }

    /// First year covered by the table.
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Number of years covered by the table.
    pub fn n_years(&self) -> usize {
        self.dst.len()
    }

    /// Returns whether at least one year has a DST period.
    pub fn observes_dst(&self) -> bool {
        self.dst
            .iter()
            .any(|entry| !entry.is_none() && entry.period.start != entry.period.end)
    }

    /// Start of DST in `year`, or `NO_TIME` if the year is not covered.
    pub fn dst_start(&self, year: i32) -> UtcTime {
        self.entry(year)
            .map(|entry| entry.period.start)
            .unwrap_or(UtcTime::NO_TIME)
    }

    /// End of DST in `year`, or `NO_TIME` if the year is not covered.
    pub fn dst_end(&self, year: i32) -> UtcTime {
        self.entry(year)
            .map(|entry| entry.period.end)
            .unwrap_or(UtcTime::NO_TIME)
    }

    /// DST offset in force at `t`, zero outside DST.
    pub fn dst_offset(&self, t: UtcTime) -> UtcTimeSpan {
        let year = match date_time::utc_year(t) {
            Some(year) => year,
            None => return UtcTimeSpan::ZERO,
        };
        let entry = match self.entry(year) {
            Some(entry) => entry,
            None => {
                trace!(tz = self.name.as_str(), year, "year outside of dst table");
                return UtcTimeSpan::ZERO;
            }
        };
        if entry.is_none() {
            return UtcTimeSpan::ZERO;
        }

        let UtcPeriod { start, end } = entry.period;
        let active = if start < end {
            t >= start && t < end
        } else if start > end {
            t < end || t >= start
        } else {
            false
        };

        if active {
            entry.offset
        } else {
            UtcTimeSpan::ZERO
        }
    }

    fn entry(&self, year: i32) -> Option<&DstEntry> {
        let index = year.checked_sub(self.start_year)?;
        self.dst.get(usize::try_from(index).ok()?)
    }
}

impl TzInfo for TzTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_offset(&self) -> UtcTimeSpan {
        self.base_offset
    }

    fn utc_offset(&self, t: UtcTime) -> UtcTimeSpan {
        self.base_offset + self.dst_offset(t)
    }

    fn is_dst(&self, t: UtcTime) -> bool {
        self.dst_offset(t) != UtcTimeSpan::ZERO
    }
}

impl TryFrom<TzTableRecord> for TzTable {
    type Error = TzTableError;

    fn try_from(record: TzTableRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

impl From<TzTable> for TzTableRecord {
    fn from(table: TzTable) -> Self {
        table.to_record()
    }
}

/// Persisted form of a [`TzTable`].
///
/// Years between the first and last record that have no record of their own
/// have no DST.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TzTableRecord {
    pub name: String,
    pub base_offset: UtcTimeSpan,
    pub dst: Vec<DstRecord>,
}

/// DST period and offset of one year.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DstRecord {
    pub year: i32,
    pub start: UtcTime,
    pub end: UtcTime,
    pub offset: UtcTimeSpan,
}
