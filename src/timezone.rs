//! Resolved time zones: the compiler's output model.

use serde::Serialize;

use crate::date::DateTime;
use crate::time::TimeDelta;

/// A description of local time during a span in which nothing changes: an
/// abbreviation, an offset from UTC and the saving contained in that offset.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct FixedTimeZone {
    /// Abbreviation, e.g. `EST`; may be empty.
    pub abbreviation: String,
    /// Offset of standard time from UTC.
    pub offset: TimeDelta,
    /// Saving in force on top of standard time.
    pub save: TimeDelta,
}

impl FixedTimeZone {
    /// Makes a new `FixedTimeZone`, substituting `letter` for the `%s`
    /// placeholder of the abbreviation format.
    pub fn from_format(
        format: &str,
        letter: &str,
        offset: TimeDelta,
        save: TimeDelta,
    ) -> FixedTimeZone {
        FixedTimeZone { abbreviation: format.replace("%s", letter), offset, save }
    }
}

/// A point in UTC at which a zone's offset and/or abbreviation changes,
/// together with the local time description from that point on.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct Transition {
    /// The UTC instant of the change.
    pub utc: DateTime,
    /// Local time from this instant until the next transition.
    pub timezone: FixedTimeZone,
}

/// A zone whose offset or abbreviation changes over time.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub struct VariableTimeZone {
    /// The Olson zone name, e.g. `Europe/Warsaw`.
    pub name: String,
    /// At least two transitions, strictly increasing in `utc`.
    pub transitions: Vec<Transition>,
}

impl VariableTimeZone {
    /// Whether the transition list is strictly increasing in its UTC
    /// instants, as resolution guarantees.
    pub fn is_monotonic(&self) -> bool {
        self.transitions.windows(2).all(|pair| pair[0].utc < pair[1].utc)
    }
}

/// A resolved zone: fixed forever, or a timeline of transitions.
#[derive(PartialEq, Eq, Clone, Debug, Serialize)]
pub enum TimeZone {
    /// The zone never changes.
    Fixed(FixedTimeZone),
    /// The zone changes at each listed transition.
    Variable(VariableTimeZone),
}

impl TimeZone {
    /// A copy of this zone carrying the given name. Used for links, whose
    /// resolved data is the canonical zone's under the alias.
    pub(crate) fn renamed(&self, name: &str) -> TimeZone {
        match self {
            TimeZone::Fixed(fixed) => TimeZone::Fixed(fixed.clone()),
            TimeZone::Variable(variable) => TimeZone::Variable(VariableTimeZone {
                name: name.to_owned(),
                transitions: variable.transitions.clone(),
            }),
        }
    }
}
