//! Half-open periods on the time axis.

use core::fmt;

use crate::{UtcTime, UtcTimeSpan};

/// A half-open period `[start, end)` on the time axis.
///
/// A period is valid if none of its bounds is [`UtcTime::NO_TIME`] and `start
/// <= end`. Queries on invalid periods return `false` rather than failing.
///
/// # Examples
///
/// ```
/// use utc_calendar::{UtcPeriod, UtcTime};
///
/// let t0 = UtcTime::from_secs(0);
/// let t1 = UtcTime::from_secs(3600);
/// let p = UtcPeriod::new(t0, t1);
///
/// assert!(p.contains(t0));
/// assert!(!p.contains(t1));
/// assert!(!UtcPeriod::default().valid());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UtcPeriod {
    pub start: UtcTime,
    pub end: UtcTime,
}

impl UtcPeriod {
    /// Creates a period; it is not validated.
    pub const fn new(start: UtcTime, end: UtcTime) -> Self {
        Self { start, end }
    }

    /// Returns whether both bounds are set and `start <= end`.
    pub fn valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid() && self.start <= self.end
    }

    /// Returns `end - start`, saturating at the bounds of `UtcTimeSpan`.
    pub fn timespan(&self) -> UtcTimeSpan {
        UtcTimeSpan::from_micros(self.end.as_micros().saturating_sub(self.start.as_micros()))
    }

    /// Alias of [`timespan`](Self::timespan).
    pub fn duration(&self) -> UtcTimeSpan {
        self.timespan()
    }

    /// Returns whether `t` is within `[start, end)`.
    pub fn contains(&self, t: UtcTime) -> bool {
        t.is_valid() && self.valid() && t >= self.start && t < self.end
    }

    /// Returns whether `other` is a subset of this period.
    pub fn contains_period(&self, other: &UtcPeriod) -> bool {
        self.valid() && other.valid() && other.start >= self.start && other.end <= self.end
    }

    /// Returns whether both periods share at least one instant.
    pub fn overlaps(&self, other: &UtcPeriod) -> bool {
        self.valid() && other.valid() && other.start < self.end && other.end > self.start
    }

    /// See [`intersection`].
    pub fn intersection(&self, other: &UtcPeriod) -> UtcPeriod {
        intersection(self, other)
    }
}

impl Default for UtcPeriod {
    fn default() -> Self {
        Self::new(UtcTime::NO_TIME, UtcTime::NO_TIME)
    }
}

/// Returns `[max(a.start, b.start), min(a.end, b.end))`, or the invalid
/// default period if it would be reversed or either argument is invalid.
///
/// Periods that merely touch intersect in a valid empty period.
///
/// # Examples
///
/// ```
/// use utc_calendar::{intersection, UtcPeriod, UtcTime};
///
/// let t = |s| UtcTime::from_secs(s);
/// let a = UtcPeriod::new(t(0), t(10));
/// let b = UtcPeriod::new(t(5), t(20));
/// let c = UtcPeriod::new(t(15), t(20));
///
/// assert_eq!(intersection(&a, &b), UtcPeriod::new(t(5), t(10)));
/// assert!(!intersection(&a, &c).valid());
/// ```
pub fn intersection(a: &UtcPeriod, b: &UtcPeriod) -> UtcPeriod {
    if !a.valid() || !b.valid() {
        return UtcPeriod::default();
    }
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    if start <= end {
        UtcPeriod::new(start, end)
    } else {
        UtcPeriod::default()
    }
}

impl fmt::Display for UtcPeriod {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "[{},{}>", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn p(start: i64, end: i64) -> UtcPeriod {
        UtcPeriod::new(UtcTime::from_secs(start), UtcTime::from_secs(end))
    }

    #[test]
    fn validity() {
        assert!(p(0, 0).valid());
        assert!(p(0, 1).valid());
        assert!(!p(1, 0).valid());
        assert!(!UtcPeriod::new(UtcTime::NO_TIME, UtcTime::EPOCH).valid());
        assert!(UtcPeriod::new(UtcTime::MIN, UtcTime::MAX).valid());
        assert_eq!(p(10, 25).timespan(), UtcTimeSpan::from_secs(15));
        assert_eq!(p(10, 25).duration(), UtcTimeSpan::from_secs(15));
    }

    #[test]
    fn half_open_contains() {
        let period = p(0, 10);
        assert!(period.contains(UtcTime::from_secs(0)));
        assert!(period.contains(UtcTime::from_secs(9)));
        assert!(!period.contains(UtcTime::from_secs(10)));
        assert!(!period.contains(UtcTime::NO_TIME));
        assert!(!p(10, 0).contains(UtcTime::from_secs(5)));
    }

    #[test]
    fn contains_period() {
        assert!(p(0, 10).contains_period(&p(0, 10)));
        assert!(p(0, 10).contains_period(&p(2, 3)));
        assert!(!p(0, 10).contains_period(&p(5, 11)));
        assert!(!p(0, 10).contains_period(&UtcPeriod::default()));
        assert!(!UtcPeriod::default().contains_period(&p(0, 10)));
    }

    #[test]
    fn overlaps() {
        assert!(p(0, 10).overlaps(&p(5, 15)));
        assert!(p(5, 15).overlaps(&p(0, 10)));
        assert!(!p(0, 10).overlaps(&p(10, 15)));
        assert!(!p(0, 10).overlaps(&UtcPeriod::default()));
        assert!(!UtcPeriod::default().overlaps(&UtcPeriod::default()));
    }

    #[test]
    fn intersection_is_symmetric_and_associative() {
        let periods = [p(0, 10), p(5, 15), p(8, 9), p(10, 20), p(30, 40), UtcPeriod::default()];
        for a in &periods {
            for b in &periods {
                assert_eq!(intersection(a, b), intersection(b, a));
                for c in &periods {
                    assert_eq!(
                        intersection(&intersection(a, b), c),
                        intersection(a, &intersection(b, c))
                    );
                }
            }
            assert!(!intersection(a, &UtcPeriod::default()).valid());
        }
    }

    #[test]
    fn intersection_edges() {
        assert_eq!(p(0, 10).intersection(&p(10, 20)), p(10, 10));
        assert_eq!(p(0, 10).intersection(&p(30, 40)), UtcPeriod::default());
        assert_eq!(p(0, 10).intersection(&p(2, 3)), p(2, 3));
    }

    #[test]
    fn display() {
        assert_eq!(
            p(0, 3600).to_string(),
            "[1970-01-01T00:00:00Z,1970-01-01T01:00:00Z>"
        );
    }
}
