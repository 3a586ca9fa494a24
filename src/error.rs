//! Error type

/// A convenience alias, used by every fallible operation in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for parsing and resolving Olson time-zone data.
///
/// Parse errors are fatal to the file that produced them; resolution errors
/// are fatal to the zone that produced them. Suspicious-but-usable values
/// (offsets or savings outside their customary ranges, unknown stanza kinds)
/// are reported through the `tracing` side channel instead and never appear
/// here.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A time-of-day or offset string did not match `[-]H[:MM[:SS]]`.
    #[error("malformed time `{0}`")]
    InvalidTime(String),

    /// A year or calendar date field could not be interpreted.
    #[error("malformed date field `{0}`")]
    InvalidDate(String),

    /// A day-of-month specification was not a day number, `lastDOW`,
    /// `DOW>=N` or `DOW<=N`.
    #[error("unparseable day specification `{0}`")]
    InvalidDaySpec(String),

    /// A trailing clock-kind letter was not one of `w`, `s` or `u`.
    #[error("unknown clock kind `{0}`")]
    UnknownTimeKind(char),

    /// A rule's FROM year was later than its TO year.
    #[error("rule FROM year {from} is after TO year {to}")]
    InvalidYearRange {
        /// First year of the rule.
        from: i32,
        /// Last year of the rule.
        to: i32,
    },

    /// Expanding a rule found no date in the month satisfying its day
    /// specification.
    #[error("no matching day in {year}-{month:02}")]
    NoMatchingDay {
        /// Year being expanded.
        year: i32,
        /// Month being expanded.
        month: u32,
    },

    /// Zone periods were out of order, or their UNTIL times were too close
    /// together to compare across different clock kinds.
    #[error("periods are not safely ordered by UNTIL in zone `{zone}`")]
    PeriodOrder {
        /// The zone whose periods could not be ordered.
        zone: String,
    },

    /// Consecutive expanded rule dates were close enough that applying
    /// offsets could invert their order.
    #[error("expanded dates for rule set `{rule_set}` are probably not in order")]
    RuleOrder {
        /// The rule set whose expansion failed the separation check.
        rule_set: String,
    },

    /// A zone period named a rule set that no region file declared.
    #[error("zone `{zone}` references unknown rule set `{rule_set}`")]
    UnknownRuleSet {
        /// The referring zone.
        zone: String,
        /// The missing rule set.
        rule_set: String,
    },

    /// A zone name was requested that no region file declared.
    #[error("unknown zone `{0}`")]
    UnknownZone(String),

    /// A line of a region file could not be tokenised into its stanza.
    #[error("{file}:{line}: {reason}")]
    MalformedLine {
        /// Region file name.
        file: String,
        /// One-based line number.
        line: usize,
        /// What went wrong, including the offending token.
        reason: String,
    },

    /// A region file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A resolved zone could not be serialised to the destination directory.
    #[error("failed to serialise zone data")]
    Serialize(#[from] serde_json::Error),
}
