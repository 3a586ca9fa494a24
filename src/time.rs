//! Signed second quantities and the clock references they are measured on.

use core::fmt;
use core::ops::{Add, Neg, Sub};
use core::str::FromStr;

use serde::ser;

use crate::date::DateTime;
use crate::error::{Error, Result};

/// A signed quantity of seconds.
///
/// This is the unit every column of an Olson file ultimately reduces to: GMT
/// offsets, DST savings and transition times-of-day are all `TimeDelta`s.
/// The useful range is a little over a day in either direction, but the
/// representation does not enforce that.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Hash)]
pub struct TimeDelta {
    secs: i64,
}

impl TimeDelta {
    /// Makes a new `TimeDelta` with the given number of seconds.
    #[inline]
    pub const fn seconds(secs: i64) -> TimeDelta {
        TimeDelta { secs }
    }

    /// Makes a new `TimeDelta` with the given number of minutes.
    #[inline]
    pub const fn minutes(mins: i64) -> TimeDelta {
        TimeDelta { secs: mins * 60 }
    }

    /// Makes a new `TimeDelta` with the given number of hours.
    #[inline]
    pub const fn hours(hours: i64) -> TimeDelta {
        TimeDelta { secs: hours * 3600 }
    }

    /// The zero quantity.
    #[inline]
    pub const fn zero() -> TimeDelta {
        TimeDelta { secs: 0 }
    }

    /// Returns the total number of seconds.
    #[inline]
    pub const fn num_seconds(&self) -> i64 {
        self.secs
    }

    /// Returns `true` for the zero quantity.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.secs == 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> TimeDelta {
        TimeDelta { secs: self.secs.abs() }
    }
}

impl Add for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn add(self, rhs: TimeDelta) -> TimeDelta {
        TimeDelta { secs: self.secs + rhs.secs }
    }
}

impl Sub for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn sub(self, rhs: TimeDelta) -> TimeDelta {
        TimeDelta { secs: self.secs - rhs.secs }
    }
}

impl Neg for TimeDelta {
    type Output = TimeDelta;

    #[inline]
    fn neg(self) -> TimeDelta {
        TimeDelta { secs: -self.secs }
    }
}

/// Parses `[-]H[:MM[:SS]]`.
///
/// A lone `-` means zero. A negative hour makes the minute and second
/// components inherit the sign, so `-1:30` is minus ninety minutes. Hours
/// above 24 are accepted; region files use values like `25:00` for
/// transitions that land on the following day.
impl FromStr for TimeDelta {
    type Err = Error;

    fn from_str(s: &str) -> Result<TimeDelta> {
        if s == "-" {
            return Ok(TimeDelta::zero());
        }
        let invalid = || Error::InvalidTime(s.to_owned());

        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = rest.split(':');
        let hours = match parts.next() {
            Some(h) if !h.is_empty() && h.bytes().all(|b| b.is_ascii_digit()) => {
                h.parse::<i64>().map_err(|_| invalid())?
            }
            _ => return Err(invalid()),
        };
        let mut component = |max: i64| -> Result<i64> {
            match parts.next() {
                None => Ok(0),
                Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
                    let v = p.parse::<i64>().map_err(|_| invalid())?;
                    if v < max {
                        Ok(v)
                    } else {
                        Err(invalid())
                    }
                }
                Some(_) => Err(invalid()),
            }
        };
        let minutes = component(60)?;
        let seconds = component(60)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let secs = hours * 3600 + minutes * 60 + seconds;
        Ok(TimeDelta::seconds(if negative { -secs } else { secs }))
    }
}

/// Prints `-HH:MM:SS`, the sign omitted for non-negative quantities.
impl fmt::Display for TimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (sign, abs) = if self.secs < 0 { ("-", -self.secs) } else { ("", self.secs) };
        write!(f, "{}{:02}:{:02}:{:02}", sign, abs / 3600, (abs / 60) % 60, abs % 60)
    }
}

/// Serialises as the plain number of seconds.
impl ser::Serialize for TimeDelta {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.secs)
    }
}

/// The clock a datetime in a region file is measured against.
///
/// Olson files qualify transition times and period ends with a trailing
/// letter: `w` for the local civil (wall) clock, `s` for the local standard
/// clock, and `u` for UTC. The wall clock includes any DST saving in force;
/// the standard clock does not.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum TimeKind {
    /// Local civil time, including the current saving.
    Wall,
    /// Local standard time, excluding the saving.
    Standard,
    /// Co-ordinated Universal Time.
    Utc,
}

impl TimeKind {
    /// Interprets a trailing clock-kind letter.
    pub(crate) fn from_letter(letter: char) -> Result<TimeKind> {
        match letter {
            'w' => Ok(TimeKind::Wall),
            's' => Ok(TimeKind::Standard),
            'u' => Ok(TimeKind::Utc),
            _ => Err(Error::UnknownTimeKind(letter)),
        }
    }

    /// Converts a datetime measured on this clock to UTC, given the zone's
    /// GMT offset and the saving in force.
    pub fn to_utc(self, dt: DateTime, offset: TimeDelta, save: TimeDelta) -> DateTime {
        match self {
            TimeKind::Utc => dt,
            TimeKind::Standard => dt - offset,
            TimeKind::Wall => dt - offset - save,
        }
    }

    /// Converts a UTC datetime back to this clock; the inverse of
    /// [`to_utc`](TimeKind::to_utc).
    pub fn to_local(self, utc: DateTime, offset: TimeDelta, save: TimeDelta) -> DateTime {
        match self {
            TimeKind::Utc => utc,
            TimeKind::Standard => utc + offset,
            TimeKind::Wall => utc + offset + save,
        }
    }
}
