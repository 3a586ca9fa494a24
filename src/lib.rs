//! Compiles IANA/Olson time-zone source files into resolved transition
//! tables.
//!
//! The Olson database describes worldwide civil time as plain-text *region
//! files* (`africa`, `europe`, …) in which a zone is a sequence of
//! *periods*, each a stretch of time with one standard offset, and
//! recurring DST transitions live in separately declared *rule sets*. Nothing
//! in that format says directly when a clock changes; working it out is
//! this crate's job.
//!
//! Compilation has three stages:
//!
//! 1. [`parse_source`] tokenises a region file into [`Rule`], [`ZonePeriod`]
//!    and link records.
//! 2. [`order_rules`](rule::order_rules) materialises a rule set into the
//!    concrete dates it fires on, once per rule set.
//! 3. [`Resolver`] walks each zone's periods, interleaves the applicable
//!    rules, converts every wall-, standard- or UTC-clock instant onto the
//!    UTC timeline and emits a strictly increasing list of
//!    [`Transition`]s.
//!
//! A zone whose timeline holds more than one transition resolves to a
//! [`VariableTimeZone`]; a zone that never changes collapses to a single
//! [`FixedTimeZone`].
//!
//! ## Example
//!
//! Compiling a full release from disk:
//!
//! ```no_run
//! use zoneinfo_compile::{compile, Config, TimeZone};
//!
//! # fn main() -> Result<(), zoneinfo_compile::Error> {
//! let zones = compile(&Config {
//!     olsen_dir: "tz/src".into(),
//!     dest_dir: Some("tz/compiled".into()),
//!     debug: false,
//! })?;
//! match &zones["Europe/Warsaw"] {
//!     TimeZone::Variable(zone) => println!("{} transitions", zone.transitions.len()),
//!     TimeZone::Fixed(zone) => println!("always {}", zone.abbreviation),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Single zones can be resolved from memory as well:
//!
//! ```
//! use zoneinfo_compile::{parse_source, Resolver, TimeZone};
//!
//! # fn main() -> Result<(), zoneinfo_compile::Error> {
//! let data = parse_source("etcetera", "Zone\tEtc/GMT\t0\t-\tGMT\n")?;
//! let zone = Resolver::new(&data.zones, &data.rules).resolve("Etc/GMT")?;
//! assert!(matches!(zone, TimeZone::Fixed(ref fixed) if fixed.abbreviation == "GMT"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Limitations
//!
//! Leap seconds are ignored, as is the TZif binary format; the output is an
//! in-memory (optionally JSON-persisted) transition table per zone. Rules
//! are expanded over 1800–2038 only.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub use crate::compiler::{compile, Config};
pub use crate::date::{Date, DateTime};
pub use crate::error::{Error, Result};
pub use crate::parse::{parse_source, LinkSet, OlsonData, RuleSet, ZoneSet};
pub use crate::resolve::Resolver;
pub use crate::rule::{DaySpec, Rule};
pub use crate::time::{TimeDelta, TimeKind};
pub use crate::timezone::{FixedTimeZone, TimeZone, Transition, VariableTimeZone};
pub use crate::weekday::Weekday;
pub use crate::zone::{Until, ZonePeriod, ZoneRules};

pub mod compiler;
pub mod date;
pub mod error;
pub mod parse;
pub mod resolve;
pub mod rule;
pub mod time;
pub mod timezone;
pub mod weekday;
pub mod zone;
