//! Zone periods: the lines of a `Zone` stanza and their ordering rules.

use crate::date::DateTime;
use crate::error::{Error, Result};
use crate::time::{TimeDelta, TimeKind};

/// Customary bounds for a zone's GMT offset (historically, -15:56:00 for
/// Pacific islands west of the date line and +15:13:42 for the eastern
/// extreme). Values outside are suspicious but retained.
pub const MIN_OFFSET: TimeDelta = TimeDelta::seconds(-(15 * 3600 + 56 * 60));
/// See [`MIN_OFFSET`].
pub const MAX_OFFSET: TimeDelta = TimeDelta::seconds(15 * 3600 + 13 * 60 + 42);

/// The worst-case disagreement between two clocks an Olson datetime can be
/// measured on: the full spread of offset plus saving. Two instants closer
/// than this cannot be ordered safely unless they share a clock kind.
pub const MAX_ABS_DIFF: TimeDelta = TimeDelta::seconds(
    (MAX_OFFSET.num_seconds() + crate::rule::MAX_SAVE.num_seconds())
        - (MIN_OFFSET.num_seconds() + crate::rule::MIN_SAVE.num_seconds()),
);

/// The `RULES` column of a zone period: either a fixed saving or the name
/// of a rule set that drives the period.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ZoneRules {
    /// A fixed saving; `-` in the file means a zero saving.
    Save(TimeDelta),
    /// The name of the rule set in effect during the period.
    Named(String),
}

/// The end of a zone period, measured on one of the three clocks.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct Until {
    /// Local end of the period.
    pub datetime: DateTime,
    /// The clock `datetime` is measured on.
    pub kind: TimeKind,
}

/// One line of a `Zone` stanza: the offset, rules and abbreviation format
/// in effect up to `until`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ZonePeriod {
    /// Offset from UTC of standard time during the period.
    pub offset: TimeDelta,
    /// Fixed saving or driving rule set.
    pub rules: ZoneRules,
    /// Abbreviation template; may contain one `%s` placeholder. `zzz` in
    /// the file has already been normalised to the empty string.
    pub format: String,
    /// End of the period; `None` means it runs to the horizon.
    pub until: Option<Until>,
}

impl ZonePeriod {
    /// The period end against which the resolver compares, the horizon
    /// standing in for an open end.
    pub(crate) fn until_datetime(&self) -> DateTime {
        self.until.map_or(DateTime::MAX, |until| until.datetime)
    }

    /// The clock kind of the period end, wall clock standing in for an
    /// open end.
    pub(crate) fn until_kind(&self) -> TimeKind {
        self.until.map_or(TimeKind::Wall, |until| until.kind)
    }
}

/// Verifies that a zone's periods are strictly ascending by `UNTIL`.
///
/// Period ends measured on different clocks can only be ordered when they
/// are further apart than [`MAX_ABS_DIFF`]; a closer pair, or any pair out
/// of order, is fatal for the zone.
pub(crate) fn check_period_order(zone: &str, periods: &[ZonePeriod]) -> Result<()> {
    for pair in periods.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        let gap = later.until_datetime() - earlier.until_datetime();
        if earlier.until_kind() != later.until_kind() && gap.abs() <= MAX_ABS_DIFF {
            return Err(Error::PeriodOrder { zone: zone.to_owned() });
        }
        if gap <= TimeDelta::zero() {
            return Err(Error::PeriodOrder { zone: zone.to_owned() });
        }
    }
    Ok(())
}
