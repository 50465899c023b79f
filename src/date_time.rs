//! Proleptic Gregorian day numbers and ISO 8601 date-time text.

use core::fmt;

use crate::{DateTimeError, ParseDateTimeError, UtcTime, UtcTimeSpan, YMDhms};

const DOY_AT_MONTH: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DOY_AT_MONTH_LEAP: [i32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

pub(crate) const MICROS_PER_SEC: i64 = 1_000_000;
pub(crate) const SECS_PER_DAY: i64 = 86_400;
pub(crate) const MICROS_PER_DAY: i64 = SECS_PER_DAY * MICROS_PER_SEC;

/// Day number of 1970-01-01, counted from 0000-01-01.
pub(crate) const UNIX_DAY: i64 = 719_528;

/// Returns whether the year is a leap year for a 64-bit signed year.
///
/// The argument is the proleptic Gregorian year, with the ISO 8601
/// interpretation of year 0 as year 1 BC. Year 0 does not obey the usual rule
/// and is considered a leap year.
pub(crate) const fn is_leap(year: i64) -> bool {
    (year & 0b11) == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Calculates the number of days in a month; `month` must be in 1..=12.
pub(crate) const fn days_in_month(year: i32, month: i32) -> i32 {
    let idx = (month - 1) as usize;
    let table = if is_leap(year as i64) {
        &DOY_AT_MONTH_LEAP
    } else {
        &DOY_AT_MONTH
    };
    if idx == 11 {
        31
    } else {
        table[idx + 1] - table[idx]
    }
}

/// Calculates the 0-based day of the year; `month` must be in 1..=12.
///
/// Days past the end of the month simply run into the next month.
const fn day_of_year(year: i64, month: i32, day: i32) -> i32 {
    let month_idx = (month - 1) as usize;
    let table = if is_leap(year) {
        &DOY_AT_MONTH_LEAP
    } else {
        &DOY_AT_MONTH
    };

    (day - 1) + table[month_idx]
}

/// Calculates the month and the day of the month for a 0-based day of the year.
fn month_and_day_of_month(year: i64, doy: i32) -> (i32, i32) {
    let table = if is_leap(year) {
        &DOY_AT_MONTH_LEAP
    } else {
        &DOY_AT_MONTH
    };

    let idx = table.binary_search(&doy).unwrap_or_else(|e| e - 1);
    let month = idx as i32 + 1;
    let day = doy - table[idx] + 1;

    (month, day)
}

/// Returns the number of elapsed days since the first day of year 0 to the
/// first day of the provided year.
///
/// The result is negative for negative years.
pub(crate) const fn days_from_year_0(year: i64) -> i64 {
    let offset = (year > 0) as i64;
    let y = year - offset;
    let m4 = y / 4 + offset;
    let m100 = y / 100;
    let m400 = m100 / 4;

    year * 365 + m4 - m100 + m400
}

/// Returns the year and the 0-based day of the year of a day number.
pub(crate) fn year_and_day_of_year(day_number: i64) -> (i64, i32) {
    // Find the nearest 400-year boundary that is before or at the date.
    let mut year = 400 * day_number.div_euclid(146097);
    let mut day = day_number.rem_euclid(146097);
    if day < 366 {
        return (year, day as i32);
    }

    // Find the nearest 100-year, 4-year and 1-year boundaries that are before
    // or at the date.
    for (years_in_period, days_in_period, starts_with_non_leap_year) in
        [(100, 36524, 1), (4, 1461, 0), (1, 365, 1)]
    {
        day -= starts_with_non_leap_year;
        let n_period = day / days_in_period;
        year += years_in_period * n_period;
        day -= n_period * days_in_period;
        if day < (366 - starts_with_non_leap_year) {
            return (year, day as i32);
        }
        day += starts_with_non_leap_year;
    }

    unreachable!();
}

/// Days elapsed since 0000-01-01.
///
/// Months outside 1..=12 carry into the year and days outside the month carry
/// into the neighbouring months, so the function is total.
pub(crate) const fn day_number(year: i32, month: i32, day: i32) -> i64 {
    let month0 = month as i64 - 1;
    let year = year as i64 + month0.div_euclid(12);
    let month = month0.rem_euclid(12) as i32 + 1;

    days_from_year_0(year) + day_of_year(year, month, day) as i64
}

/// Inverse of [`day_number`] for real dates.
pub(crate) fn ymd_from_day_number(day_number: i64) -> (i32, i32, i32) {
    let (year, doy) = year_and_day_of_year(day_number);
    let (month, day) = month_and_day_of_month(year, doy);

    (year as i32, month, day)
}

/// Day of the week of a day number, 0 for Sunday to 6 for Saturday.
pub(crate) const fn week_day(day_number: i64) -> i32 {
    // 0000-01-01 was a Saturday.
    (day_number + 6).rem_euclid(7) as i32
}

/// UTC year of a time; the bounds map to the extreme years of the calendar.
pub(crate) fn utc_year(t: UtcTime) -> Option<i32> {
    if t == UtcTime::NO_TIME {
        None
    } else if t == UtcTime::MAX {
        Some(YMDhms::YEAR_MAX)
    } else if t == UtcTime::MIN {
        Some(YMDhms::YEAR_MIN)
    } else {
        let days = t.as_micros().div_euclid(MICROS_PER_DAY) + UNIX_DAY;
        Some(year_and_day_of_year(days).0 as i32)
    }
}

/// Decomposes a local microsecond count into calendar coordinates.
pub(crate) fn civil_from_micros(local: i64) -> YMDhms {
    let days = local.div_euclid(MICROS_PER_DAY) + UNIX_DAY;
    let micros_of_day = local.rem_euclid(MICROS_PER_DAY);
    let (year, month, day) = ymd_from_day_number(days);
    let secs = micros_of_day / MICROS_PER_SEC;

    YMDhms::from_parts(
        year,
        month,
        day,
        (secs / 3600) as i32,
        (secs % 3600 / 60) as i32,
        (secs % 60) as i32,
        (micros_of_day % MICROS_PER_SEC) as i32,
    )
}

/// Local microsecond count of calendar coordinates, saturating at the `i64`
/// bounds.
pub(crate) fn micros_from_civil(c: &YMDhms) -> i64 {
    micros_from_day(
        day_number(c.year(), c.month(), c.day()),
        c.hour(),
        c.minute(),
        c.second(),
        c.micro_second(),
    )
}

/// Local microsecond count of a time of day on the given day number.
pub(crate) fn micros_from_day(
    day_number: i64,
    hour: i32,
    minute: i32,
    second: i32,
    micro_second: i32,
) -> i64 {
    let secs_of_day = hour as i64 * 3600 + minute as i64 * 60 + second as i64;

    (day_number - UNIX_DAY)
        .saturating_mul(MICROS_PER_DAY)
        .saturating_add(secs_of_day * MICROS_PER_SEC + micro_second as i64)
}

/// Writes `t` shifted by `offset` as `YYYY-MM-DDThh:mm:ss[.ffffff]` followed by
/// `Z` or a `±hh:mm` offset suffix.
pub(crate) fn write_iso8601<W: fmt::Write>(
    w: &mut W,
    t: UtcTime,
    offset: UtcTimeSpan,
) -> fmt::Result {
    if t == UtcTime::NO_TIME {
        return w.write_str("not-a-date-time");
    }
    if t == UtcTime::MAX {
        return w.write_str("+oo");
    }
    if t == UtcTime::MIN {
        return w.write_str("-oo");
    }

    let c = civil_from_micros(t.as_micros().saturating_add(offset.as_micros()));
    if c.year() < 0 {
        write!(w, "-{:04}", -c.year())?;
    } else {
        write!(w, "{:04}", c.year())?;
    }
    write!(
        w,
        "-{:02}-{:02}T{:02}:{:02}:{:02}",
        c.month(),
        c.day(),
        c.hour(),
        c.minute(),
        c.second()
    )?;
    if c.micro_second() != 0 {
        write!(w, ".{:06}", c.micro_second())?;
    }

    write_utc_offset(w, offset, "Z")
}

/// Writes an offset as `±hh:mm`, or `zero` when the offset is null.
pub(crate) fn write_utc_offset<W: fmt::Write>(
    w: &mut W,
    offset: UtcTimeSpan,
    zero: &str,
) -> fmt::Result {
    let secs = offset.as_micros() / MICROS_PER_SEC;
    if secs == 0 {
        return w.write_str(zero);
    }
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.unsigned_abs();

    write!(w, "{}{:02}:{:02}", sign, secs / 3600, secs % 3600 / 60)
}

/// Parses an RFC3339-like date-time with signed years and an optional UTC
/// offset.
///
/// Expected format:
///
/// `[±]YYYY-MM-DD'T'hh:mm:ss[.d[d]...[d]][Z|±hh|±hhmm|±hh:mm]`
///
/// where delimiter `T` between date and time may also be a lowercase `t` or a
/// space. A missing offset suffix stands for UTC. Fraction digits beyond the
/// microsecond are validated and discarded.
pub(crate) fn parse_iso8601(stream: &str) -> Result<UtcTime, ParseDateTimeError> {
    // Expect 2 leading digits optionally followed by one of the provided
    // delimiters, and return them as a single `i32`, together with the
    // remaining part of the stream if a delimiter was found.
    fn pull_two_digits<'a, E>(
        stream: &'a str,
        delimiter: &'a [char],
        missing_delimiter_error: E,
    ) -> Result<(i32, Result<&'a str, E>), ParseDateTimeError> {
        let (token, stream) = stream
            .split_once(delimiter)
            .map(|(t, s)| (t, Ok(s)))
            .unwrap_or((stream, Err(missing_delimiter_error)));

        two_digits(token).map(|token| (token, stream))
    }

    // Pull the leading sign of the year, if any.
    let (stream, sign) = match stream.chars().next() {
        Some('+') => (&stream[1..], 1),
        Some('-') => (&stream[1..], -1),
        _ => (stream, 1),
    };

    // Pull the year.
    let (year, stream) = stream
        .split_once('-')
        .ok_or(ParseDateTimeError::MissingField)?;
    if year.len() < 4 {
        return Err(ParseDateTimeError::InvalidFieldWidth);
    }
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDateTimeError::InvalidFieldValue);
    }
    let year = year
        .parse()
        .map(|year: i32| sign * year)
        .map_err(|_| ParseDateTimeError::InvalidFieldValue)?;

    // Pull month, day, hour and minute.
    let (month, stream) = pull_two_digits(stream, &['-'], ParseDateTimeError::MissingField)?;
    let (day, stream) =
        pull_two_digits(stream?, &[' ', 'T', 't'], ParseDateTimeError::MissingField)?;
    let (hour, stream) = pull_two_digits(stream?, &[':'], ParseDateTimeError::MissingField)?;
    let (min, stream) = pull_two_digits(stream?, &[':'], ParseDateTimeError::MissingField)?;

    // The second has no trailing delimiter of its own.
    let stream = stream?;
    let sec = two_digits(stream.get(..2).ok_or(ParseDateTimeError::InvalidFieldWidth)?)?;
    let stream = &stream[2..];

    // Parse the fraction.
    let (micros, stream) = match stream.strip_prefix('.') {
        Some(fraction) => {
            let end = fraction
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(fraction.len());
            if end == 0 {
                return Err(ParseDateTimeError::MissingField);
            }
            let mut micros = 0;
            let mut weight = 100_000;
            for digit in fraction[..end].bytes() {
                micros += (digit - b'0') as i32 * weight;
                weight /= 10;
            }
            (micros, &fraction[end..])
        }
        None => (0, stream),
    };

    let offset = parse_utc_offset(stream)?;

    let c = YMDhms::new(year, month, day, hour, min, sec)?.with_micro_second(micros)?;
    if day > days_in_month(year, month) {
        return Err(DateTimeError::InvalidDayOfMonth(day).into());
    }

    Ok(UtcTime::from_micros(
        micros_from_civil(&c) - offset.as_micros(),
    ))
}

/// Parses exactly two ASCII digits.
fn two_digits(token: &str) -> Result<i32, ParseDateTimeError> {
    if token.len() != 2 {
        return Err(ParseDateTimeError::InvalidFieldWidth);
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDateTimeError::InvalidFieldValue);
    }
    token
        .parse()
        .map_err(|_| ParseDateTimeError::InvalidFieldValue)
}

/// Parses an empty suffix, `Z`, `±hh`, `±hhmm` or `±hh:mm`.
fn parse_utc_offset(stream: &str) -> Result<UtcTimeSpan, ParseDateTimeError> {
    let (sign, body) = match stream.chars().next() {
        None => return Ok(UtcTimeSpan::ZERO),
        Some('Z') | Some('z') if stream.len() == 1 => return Ok(UtcTimeSpan::ZERO),
        Some('+') => (1, &stream[1..]),
        Some('-') => (-1, &stream[1..]),
        _ => return Err(ParseDateTimeError::InvalidOffset),
    };
    if !body.is_ascii() {
        return Err(ParseDateTimeError::InvalidOffset);
    }

    let (hours, minutes) = match body.len() {
        2 => (body, None),
        4 => (&body[..2], Some(&body[2..])),
        5 if body.as_bytes()[2] == b':' => (&body[..2], Some(&body[3..])),
        _ => return Err(ParseDateTimeError::InvalidOffset),
    };
    let hours = two_digits(hours).map_err(|_| ParseDateTimeError::InvalidOffset)?;
    let minutes = match minutes {
        Some(minutes) => two_digits(minutes).map_err(|_| ParseDateTimeError::InvalidOffset)?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return Err(ParseDateTimeError::InvalidOffset);
    }

    Ok(UtcTimeSpan::from_minutes(sign * (hours as i64 * 60 + minutes as i64)))
}
