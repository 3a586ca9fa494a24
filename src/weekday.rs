//! Day of the week.

use core::fmt;

/// The day of week.
///
/// The order of the days of week depends on the context.
/// (This is why this type does *not* implement `PartialOrd` or `Ord` traits.)
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Weekday {
    /// Monday.
    Mon = 0,
    /// Tuesday.
    Tue = 1,
    /// Wednesday.
    Wed = 2,
    /// Thursday.
    Thu = 3,
    /// Friday.
    Fri = 4,
    /// Saturday.
    Sat = 5,
    /// Sunday.
    Sun = 6,
}

impl Weekday {
    /// The next day in the week.
    #[inline]
    pub const fn succ(&self) -> Weekday {
        Weekday::from_days_from_monday((*self as u32 + 1) % 7)
    }

    /// Returns a day-of-week number starting from Monday = 0.
    #[inline]
    pub const fn num_days_from_monday(&self) -> u32 {
        *self as u32
    }

    /// Returns a day-of-week number starting from the parameter `day` (D) = 0.
    #[inline]
    pub(crate) const fn num_days_from(&self, day: Weekday) -> u32 {
        (*self as u32 + 7 - day as u32) % 7
    }

    /// Makes a `Weekday` from a number of days since Monday, modulo 7.
    pub(crate) const fn from_days_from_monday(n: u32) -> Weekday {
        match n % 7 {
            0 => Weekday::Mon,
            1 => Weekday::Tue,
            2 => Weekday::Wed,
            3 => Weekday::Thu,
            4 => Weekday::Fri,
            5 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }

    /// Tries to read a weekday from the first three ASCII letters of an
    /// English name, as region files write them (`Mon` … `Sun`, with longer
    /// forms such as `Monday` also accepted).
    pub(crate) fn from_name(s: &str) -> Option<Weekday> {
        if s.len() < 3 {
            return None;
        }
        let buf = s.as_bytes();
        match [buf[0] | 32, buf[1] | 32, buf[2] | 32] {
            [b'm', b'o', b'n'] => Some(Weekday::Mon),
            [b't', b'u', b'e'] => Some(Weekday::Tue),
            [b'w', b'e', b'd'] => Some(Weekday::Wed),
            [b't', b'h', b'u'] => Some(Weekday::Thu),
            [b'f', b'r', b'i'] => Some(Weekday::Fri),
            [b's', b'a', b't'] => Some(Weekday::Sat),
            [b's', b'u', b'n'] => Some(Weekday::Sun),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Weekday;

    #[test]
    fn test_from_name() {
        assert_eq!(Weekday::from_name("Sun"), Some(Weekday::Sun));
        assert_eq!(Weekday::from_name("sunday"), Some(Weekday::Sun));
        assert_eq!(Weekday::from_name("THU"), Some(Weekday::Thu));
        assert_eq!(Weekday::from_name("Su"), None);
        assert_eq!(Weekday::from_name("Xyz"), None);
    }

    #[test]
    fn test_num_days_from() {
        assert_eq!(Weekday::Sun.num_days_from(Weekday::Mon), 6);
        assert_eq!(Weekday::Mon.num_days_from(Weekday::Sun), 1);
        assert_eq!(Weekday::Wed.num_days_from(Weekday::Wed), 0);
        assert_eq!(Weekday::Sat.succ(), Weekday::Sun);
        assert_eq!(Weekday::Sun.succ(), Weekday::Mon);
    }
}
