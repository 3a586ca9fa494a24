//! Recurring transition rules and their expansion into concrete dates.

use core::fmt;

use crate::date::{Date, DateTime};
use crate::error::{Error, Result};
use crate::time::{TimeDelta, TimeKind};
use crate::weekday::Weekday;
use crate::zone::MAX_ABS_DIFF;

/// Rules with an open-ended past are clamped to this year.
pub const MIN_YEAR: i32 = 1800;
/// Rules with an open-ended future are clamped to this year.
pub const MAX_YEAR: i32 = 2038;

/// Customary bounds for the SAVE column. Values outside are suspicious but
/// retained.
pub const MIN_SAVE: TimeDelta = TimeDelta::zero();
/// See [`MIN_SAVE`].
pub const MAX_SAVE: TimeDelta = TimeDelta::hours(2);

/// One recurring transition specification, i.e. one `Rule` line.
///
/// A rule has no identity beyond its fields; two equal rules are
/// interchangeable.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Rule {
    /// First year the rule applies; `None` means the unbounded past.
    pub from: Option<i32>,
    /// Last year the rule applies, inclusive; `None` means the unbounded
    /// future.
    pub to: Option<i32>,
    /// Month of the transition, 1–12.
    pub month: u32,
    /// Day-of-month predicate selecting the transition date.
    pub on: DaySpec,
    /// Time of day of the transition; may be `24:00` or beyond.
    pub at: TimeDelta,
    /// The clock `at` is measured on.
    pub at_kind: TimeKind,
    /// Saving in force once the rule fires.
    pub save: TimeDelta,
    /// Fragment substituted for `%s` in a zone's abbreviation format.
    pub letter: String,
}

/// A day-of-month predicate from the `ON` column.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum DaySpec {
    /// An exact day of the month.
    Exact(u32),
    /// The last occurrence of a weekday in the month (`lastSun`).
    Last(Weekday),
    /// The first occurrence of a weekday on or after a day (`Sun>=8`).
    OnOrAfter(Weekday, u32),
    /// The last occurrence of a weekday on or before a day (`Sun<=25`).
    OnOrBefore(Weekday, u32),
}

impl DaySpec {
    /// Whether the given date satisfies this predicate.
    pub fn matches(&self, date: Date) -> bool {
        let days_in_month = Date::days_in_month(date.year(), date.month());
        match *self {
            DaySpec::Exact(day) => date.day() == day,
            DaySpec::Last(weekday) => {
                date.weekday() == weekday && date.day() + 7 > days_in_month
            }
            DaySpec::OnOrAfter(weekday, day) => date.weekday() == weekday && date.day() >= day,
            DaySpec::OnOrBefore(weekday, day) => {
                date.weekday() == weekday && date.day() <= day && date.day() + 7 > day
            }
        }
    }

    /// Finds the date in the given month satisfying this predicate,
    /// advancing from the 1st and giving up past the end of the month.
    pub fn resolve_in(&self, year: i32, month: u32) -> Result<Date> {
        for day in 1..=Date::days_in_month(year, month) {
            // In-range loop bounds, so the date always exists.
            if let Some(date) = Date::from_ymd_opt(year, month, day) {
                if self.matches(date) {
                    return Ok(date);
                }
            }
        }
        Err(Error::NoMatchingDay { year, month })
    }
}

impl fmt::Display for DaySpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DaySpec::Exact(day) => write!(f, "{}", day),
            DaySpec::Last(weekday) => write!(f, "last{}", weekday),
            DaySpec::OnOrAfter(weekday, day) => write!(f, "{}>={}", weekday, day),
            DaySpec::OnOrBefore(weekday, day) => write!(f, "{}<={}", weekday, day),
        }
    }
}

/// One concrete firing of a rule, produced by [`order_rules`].
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RuleInstance {
    /// Local date the rule fires, before `at` is applied.
    pub date: Date,
    /// The rule that fires.
    pub rule: Rule,
}

/// Materialises every (year, rule) pair of a rule set into a list of
/// concrete dates, sorted ascending.
///
/// Open-ended year ranges are clamped to [`MIN_YEAR`] and [`MAX_YEAR`].
/// After sorting, consecutive dates must be separated by more than the
/// worst-case clock disagreement ([`MAX_ABS_DIFF`](crate::zone::MAX_ABS_DIFF));
/// anything closer means pure local-date ordering could invert once offsets
/// are applied, which is fatal for the rule set.
pub fn order_rules(rule_set: &str, rules: &[Rule]) -> Result<Vec<RuleInstance>> {
    let mut instances = Vec::new();
    for rule in rules {
        let from = rule.from.unwrap_or(MIN_YEAR).max(MIN_YEAR);
        let to = rule.to.unwrap_or(MAX_YEAR).min(MAX_YEAR);
        for year in from..=to {
            instances.push(RuleInstance {
                date: rule.on.resolve_in(year, rule.month)?,
                rule: rule.clone(),
            });
        }
    }
    instances.sort_by_key(|instance| instance.date);

    for pair in instances.windows(2) {
        let gap = DateTime::at_midnight(pair[1].date) - DateTime::at_midnight(pair[0].date);
        if gap <= MAX_ABS_DIFF {
            return Err(Error::RuleOrder { rule_set: rule_set.to_owned() });
        }
    }
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::{order_rules, DaySpec, Rule};
    use crate::date::Date;
    use crate::error::Error;
    use crate::time::{TimeDelta, TimeKind};
    use crate::weekday::Weekday;

    fn rule(from: Option<i32>, to: Option<i32>, month: u32, on: DaySpec, save_hours: i64) -> Rule {
        Rule {
            from,
            to,
            month,
            on,
            at: TimeDelta::hours(2),
            at_kind: TimeKind::Standard,
            save: TimeDelta::hours(save_hours),
            letter: String::new(),
        }
    }

    #[test]
    fn test_last_sunday_of_february() {
        let spec = DaySpec::Last(Weekday::Sun);
        assert_eq!(spec.resolve_in(2000, 2).unwrap(), Date::from_ymd_opt(2000, 2, 27).unwrap());
    }

    #[test]
    fn test_sunday_on_or_after() {
        let spec = DaySpec::OnOrAfter(Weekday::Sun, 8);
        assert_eq!(spec.resolve_in(2015, 3).unwrap(), Date::from_ymd_opt(2015, 3, 8).unwrap());
    }

    #[test]
    fn test_sunday_on_or_before() {
        let spec = DaySpec::OnOrBefore(Weekday::Sun, 25);
        // 2015-10-25 is itself a Sunday.
        assert_eq!(spec.resolve_in(2015, 10).unwrap(), Date::from_ymd_opt(2015, 10, 25).unwrap());
        // The last Wednesday on or before the 1st is the 1st only if it is
        // a Wednesday; otherwise no day in the month qualifies.
        let spec = DaySpec::OnOrBefore(Weekday::Wed, 1);
        assert!(matches!(
            spec.resolve_in(2015, 3),
            Err(Error::NoMatchingDay { year: 2015, month: 3 })
        ));
    }

    #[test]
    fn test_exact_day_out_of_month() {
        assert!(matches!(
            DaySpec::Exact(30).resolve_in(2015, 2),
            Err(Error::NoMatchingDay { year: 2015, month: 2 })
        ));
    }

    #[test]
    fn test_poland_expansion_order() {
        // Rule Poland 1918 1919 - Sep 16 2:00s 0    -
        // Rule Poland 1919 only - Apr 15 2:00s 1:00 S
        // Rule Poland 1944 only - Apr  3 2:00s 1:00 S
        let rules = [
            rule(Some(1918), Some(1919), 9, DaySpec::Exact(16), 0),
            rule(Some(1919), Some(1919), 4, DaySpec::Exact(15), 1),
            rule(Some(1944), Some(1944), 4, DaySpec::Exact(3), 1),
        ];
        let expanded = order_rules("Poland", &rules).unwrap();
        let dates: Vec<_> = expanded.iter().map(|instance| instance.date.to_string()).collect();
        assert_eq!(dates, ["1918-09-16", "1919-04-15", "1919-09-16", "1944-04-03"]);
    }

    #[test]
    fn test_one_instance_per_year_in_rule_month() {
        let rules = [rule(Some(1990), Some(1999), 3, DaySpec::Last(Weekday::Sun), 1)];
        let expanded = order_rules("EU", &rules).unwrap();
        assert_eq!(expanded.len(), 10);
        for (instance, year) in expanded.iter().zip(1990..) {
            assert_eq!(instance.date.year(), year);
            assert_eq!(instance.date.month(), 3);
        }
    }

    #[test]
    fn test_open_ended_years_are_clamped() {
        let rules = [rule(None, Some(1801), 6, DaySpec::Exact(1), 0)];
        let expanded = order_rules("Clamp", &rules).unwrap();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].date.year(), 1800);

        let rules = [rule(Some(2037), None, 6, DaySpec::Exact(1), 0)];
        let expanded = order_rules("Clamp", &rules).unwrap();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[1].date.year(), 2038);
    }

    #[test]
    fn test_adjacent_dates_rejected() {
        let rules = [
            rule(Some(1990), Some(1990), 6, DaySpec::Exact(1), 0),
            rule(Some(1990), Some(1990), 6, DaySpec::Exact(2), 1),
        ];
        assert!(matches!(
            order_rules("Shaky", &rules),
            Err(Error::RuleOrder { .. })
        ));
    }
}
