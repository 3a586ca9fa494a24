//! Proleptic Gregorian calendar date and datetime, without a timezone.

use core::fmt;
use core::ops::{Add, Sub};

use serde::ser;

use crate::time::TimeDelta;
use crate::weekday::Weekday;

/// Cumulative days before the first of each month in a non-leap year.
const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

const SECS_PER_DAY: i64 = 86_400;

/// A calendar date in the proleptic Gregorian calendar.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Date {
    pub(crate) year: i32,
    pub(crate) month: u32,
    pub(crate) day: u32,
}

impl Date {
    /// Makes a new `Date` from year, month and day-of-month.
    ///
    /// Returns `None` on an invalid combination, e.g. April 31.
    pub fn from_ymd_opt(year: i32, month: u32, day: u32) -> Option<Date> {
        if (1..=12).contains(&month) && day >= 1 && day <= Date::days_in_month(year, month) {
            Some(Date { year, month, day })
        } else {
            None
        }
    }

    /// Returns the year number.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number starting from 1.
    #[inline]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Returns the day of month starting from 1.
    #[inline]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Returns the number of days in the given month of the given year.
    pub const fn days_in_month(year: i32, month: u32) -> u32 {
        match month {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(year) => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// Returns the day of week.
    pub fn weekday(&self) -> Weekday {
        // Jan 1, AD 1 was a Monday in the proleptic Gregorian calendar.
        let days = self.num_days_from_ce() - 1;
        Weekday::from_days_from_monday(days.rem_euclid(7) as u32)
    }

    /// Counts the days since January 1, AD 1 (that date being day 1).
    pub(crate) fn num_days_from_ce(&self) -> i64 {
        let year = i64::from(self.year) - 1;
        let mut ordinal = DAYS_BEFORE_MONTH[(self.month - 1) as usize] + i64::from(self.day);
        if self.month > 2 && is_leap_year(self.year) {
            ordinal += 1;
        }
        365 * year + year.div_euclid(4) - year.div_euclid(100) + year.div_euclid(400) + ordinal
    }

    /// The inverse of [`num_days_from_ce`](Date::num_days_from_ce).
    pub(crate) fn from_num_days_from_ce(days: i64) -> Date {
        // Count from 0000-03-01 so that the leap day is the last day of a
        // year and every 400-year era has a fixed length of 146097 days.
        let shifted = days - 1 + 306;
        let era = shifted.div_euclid(146_097);
        let doe = shifted - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let (year, month) = if mp < 10 {
            (era * 400 + yoe, (mp + 3) as u32)
        } else {
            (era * 400 + yoe + 1, (mp - 9) as u32)
        };
        Date { year: year as i32, month, day }
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Returns whether the given year is a leap year.
pub(crate) const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// A calendar date combined with a second-of-day, on an unspecified clock.
///
/// Which clock (wall, standard or UTC) a `DateTime` is measured on is
/// carried separately as a [`TimeKind`](crate::TimeKind); the resolver
/// converts everything onto the UTC clock before comparing.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct DateTime {
    pub(crate) date: Date,
    pub(crate) secs: u32,
}

impl DateTime {
    /// The earliest instant the compiler reasons about: 1800-01-01 00:00:00.
    pub const MIN: DateTime = DateTime { date: Date { year: 1800, month: 1, day: 1 }, secs: 0 };

    /// The horizon for open-ended periods and unbounded rules:
    /// 2038-12-31 00:00:00.
    pub const MAX: DateTime = DateTime { date: Date { year: 2038, month: 12, day: 31 }, secs: 0 };

    /// Makes a new `DateTime` at midnight of the given date.
    #[inline]
    pub const fn at_midnight(date: Date) -> DateTime {
        DateTime { date, secs: 0 }
    }

    /// Makes a new `DateTime` from calendar and clock components.
    ///
    /// Returns `None` on an invalid combination.
    pub fn from_ymd_hms_opt(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<DateTime> {
        let date = Date::from_ymd_opt(year, month, day)?;
        if hour < 24 && min < 60 && sec < 60 {
            Some(DateTime { date, secs: hour * 3600 + min * 60 + sec })
        } else {
            None
        }
    }

    /// Returns the calendar date component.
    #[inline]
    pub const fn date(&self) -> Date {
        self.date
    }

    /// Returns the second of the day, `0 ..= 86399`.
    #[inline]
    pub const fn second_of_day(&self) -> u32 {
        self.secs
    }

    /// Seconds since the start of AD 1. Internal pivot for arithmetic.
    fn to_ce_seconds(&self) -> i64 {
        (self.date.num_days_from_ce() - 1) * SECS_PER_DAY + i64::from(self.secs)
    }

    fn from_ce_seconds(secs: i64) -> DateTime {
        let days = secs.div_euclid(SECS_PER_DAY);
        let secs = secs.rem_euclid(SECS_PER_DAY) as u32;
        DateTime { date: Date::from_num_days_from_ce(days + 1), secs }
    }
}

/// Adding a `TimeDelta` carries across day boundaries, so midnight plus
/// `24:00` lands on the following day.
impl Add<TimeDelta> for DateTime {
    type Output = DateTime;

    fn add(self, rhs: TimeDelta) -> DateTime {
        DateTime::from_ce_seconds(self.to_ce_seconds() + rhs.num_seconds())
    }
}

impl Sub<TimeDelta> for DateTime {
    type Output = DateTime;

    fn sub(self, rhs: TimeDelta) -> DateTime {
        DateTime::from_ce_seconds(self.to_ce_seconds() - rhs.num_seconds())
    }
}

/// The signed distance between two instants measured on the same clock.
impl Sub for DateTime {
    type Output = TimeDelta;

    fn sub(self, rhs: DateTime) -> TimeDelta {
        TimeDelta::seconds(self.to_ce_seconds() - rhs.to_ce_seconds())
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}:{:02}",
            self.date,
            self.secs / 3600,
            (self.secs / 60) % 60,
            self.secs % 60
        )
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Serialises as the `YYYY-MM-DD HH:MM:SS` display form.
impl ser::Serialize for DateTime {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Date, DateTime};
    use crate::time::TimeDelta;
    use crate::weekday::Weekday;

    #[test]
    fn test_from_ymd_opt() {
        assert!(Date::from_ymd_opt(2000, 2, 29).is_some());
        assert!(Date::from_ymd_opt(1900, 2, 29).is_none());
        assert!(Date::from_ymd_opt(2015, 4, 31).is_none());
        assert!(Date::from_ymd_opt(2015, 13, 1).is_none());
        assert!(Date::from_ymd_opt(2015, 1, 0).is_none());
    }

    #[test]
    fn test_days_from_ce_round_trip() {
        for (y, m, d) in [
            (1, 1, 1),
            (1800, 1, 1),
            (1918, 9, 16),
            (1970, 1, 1),
            (2000, 2, 29),
            (2038, 12, 31),
        ] {
            let date = Date::from_ymd_opt(y, m, d).unwrap();
            assert_eq!(Date::from_num_days_from_ce(date.num_days_from_ce()), date);
        }
        // Known fixed point: the Unix epoch.
        assert_eq!(Date::from_ymd_opt(1970, 1, 1).unwrap().num_days_from_ce(), 719_163);
    }

    #[test]
    fn test_weekday() {
        assert_eq!(Date::from_ymd_opt(1, 1, 1).unwrap().weekday(), Weekday::Mon);
        assert_eq!(Date::from_ymd_opt(2000, 2, 27).unwrap().weekday(), Weekday::Sun);
        assert_eq!(Date::from_ymd_opt(2015, 3, 8).unwrap().weekday(), Weekday::Sun);
        assert_eq!(Date::from_ymd_opt(2026, 8, 2).unwrap().weekday(), Weekday::Sun);
    }

    #[test]
    fn test_datetime_arithmetic() {
        let dt = DateTime::from_ymd_hms_opt(1984, 10, 1, 0, 0, 0).unwrap();
        assert_eq!(
            dt + TimeDelta::hours(24),
            DateTime::from_ymd_hms_opt(1984, 10, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(
            dt - TimeDelta::seconds(1),
            DateTime::from_ymd_hms_opt(1984, 9, 30, 23, 59, 59).unwrap()
        );
        assert_eq!(
            (dt + TimeDelta::hours(24)) - dt,
            TimeDelta::hours(24)
        );
    }

    #[test]
    fn test_datetime_order() {
        assert!(DateTime::MIN < DateTime::MAX);
        let a = DateTime::from_ymd_hms_opt(1919, 4, 15, 2, 0, 0).unwrap();
        let b = DateTime::from_ymd_hms_opt(1919, 9, 16, 2, 0, 0).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_display() {
        let dt = DateTime::from_ymd_hms_opt(1918, 9, 16, 2, 0, 0).unwrap();
        assert_eq!(dt.to_string(), "1918-09-16 02:00:00");
    }
}
