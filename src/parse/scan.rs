//! Scanning routines for the individual fields of a region-file line.

use crate::date::{Date, DateTime};
use crate::error::{Error, Result};
use crate::rule::{DaySpec, Rule};
use crate::time::{TimeDelta, TimeKind};
use crate::weekday::Weekday;
use crate::zone::Until;

/// Reads a month number (1 through 12) from the first three ASCII letters
/// of an English month name; longer forms such as `January` also pass.
pub(crate) fn month(s: &str) -> Result<u32> {
    if s.len() < 3 {
        return Err(Error::InvalidDate(s.to_owned()));
    }
    let buf = s.as_bytes();
    let month0 = match [buf[0] | 32, buf[1] | 32, buf[2] | 32] {
        [b'j', b'a', b'n'] => 0,
        [b'f', b'e', b'b'] => 1,
        [b'm', b'a', b'r'] => 2,
        [b'a', b'p', b'r'] => 3,
        [b'm', b'a', b'y'] => 4,
        [b'j', b'u', b'n'] => 5,
        [b'j', b'u', b'l'] => 6,
        [b'a', b'u', b'g'] => 7,
        [b's', b'e', b'p'] => 8,
        [b'o', b'c', b't'] => 9,
        [b'n', b'o', b'v'] => 10,
        [b'd', b'e', b'c'] => 11,
        _ => return Err(Error::InvalidDate(s.to_owned())),
    };
    Ok(month0 + 1)
}

/// Reads a calendar year.
pub(crate) fn year(s: &str) -> Result<i32> {
    s.parse().map_err(|_| Error::InvalidDate(s.to_owned()))
}

fn day_number(s: &str) -> Option<u32> {
    let day = s.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Reads an `ON` column day specification: `DD`, `lastDOW`, `DOW>=N` or
/// `DOW<=N`.
pub(crate) fn day_spec(s: &str) -> Result<DaySpec> {
    let invalid = || Error::InvalidDaySpec(s.to_owned());
    if let Some(rest) = s.strip_prefix("last") {
        return Weekday::from_name(rest).map(DaySpec::Last).ok_or_else(invalid);
    }
    if let Some((weekday, day)) = s.split_once(">=") {
        let weekday = Weekday::from_name(weekday).ok_or_else(invalid)?;
        return Ok(DaySpec::OnOrAfter(weekday, day_number(day).ok_or_else(invalid)?));
    }
    if let Some((weekday, day)) = s.split_once("<=") {
        let weekday = Weekday::from_name(weekday).ok_or_else(invalid)?;
        return Ok(DaySpec::OnOrBefore(weekday, day_number(day).ok_or_else(invalid)?));
    }
    day_number(s).map(DaySpec::Exact).ok_or_else(invalid)
}

/// Reads a time of day, with an optional trailing clock-kind letter.
pub(crate) fn time_of_day(s: &str) -> Result<(TimeDelta, Option<TimeKind>)> {
    match s.bytes().last() {
        Some(letter) if letter.is_ascii_alphabetic() => {
            let kind = TimeKind::from_letter(letter as char)?;
            Ok((s[..s.len() - 1].parse()?, Some(kind)))
        }
        _ => Ok((s.parse()?, None)),
    }
}

/// Reads an `UNTIL` column: one to four fields
/// (`yyyy [Mon [DD [HH:MM:SS]]]`), the day slot accepting the same tokens
/// as a rule's `ON` column, the time optionally suffixed with a clock-kind
/// letter. `24:00:00` lands on midnight of the following day. The clock
/// kind defaults to wall.
pub(crate) fn until(fields: &[&str]) -> Result<Until> {
    let (&first, rest) = match fields.split_first() {
        Some(split) if fields.len() <= 4 => split,
        _ => return Err(Error::InvalidDate(fields.join(" "))),
    };
    let year = year(first)?;
    let month = match rest.first() {
        Some(field) => month(field)?,
        None => 1,
    };
    let date = match rest.get(1) {
        Some(field) => day_spec(field)?.resolve_in(year, month)?,
        None => Date::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidDate(fields.join(" ")))?,
    };
    let (time, kind) = match rest.get(2) {
        Some(field) => time_of_day(field)?,
        None => (TimeDelta::zero(), None),
    };
    Ok(Until {
        datetime: DateTime::at_midnight(date) + time,
        kind: kind.unwrap_or(TimeKind::Wall),
    })
}

/// Assembles a `Rule` line from its meaningful payload fields. The `TYPE`
/// column is checked for presence by the caller and ignored here.
pub(crate) fn rule(
    from: &str,
    to: &str,
    month_field: &str,
    on: &str,
    at: &str,
    save: &str,
    letter: &str,
) -> Result<Rule> {
    let from = match from.to_ascii_lowercase().as_str() {
        "min" | "minimum" => None,
        _ => Some(year(from)?),
    };
    let to = match to.to_ascii_lowercase().as_str() {
        "max" | "maximum" => None,
        "only" => from,
        _ => Some(year(to)?),
    };
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(Error::InvalidYearRange { from, to });
        }
    }
    let (at, at_kind) = time_of_day(at)?;
    Ok(Rule {
        from,
        to,
        month: month(month_field)?,
        on: day_spec(on)?,
        at,
        at_kind: at_kind.unwrap_or(TimeKind::Wall),
        save: save.parse()?,
        letter: match letter {
            "-" => String::new(),
            letter => letter.to_owned(),
        },
    })
}
