//! Line-oriented parsing of Olson region files.
//!
//! A region file is a sequence of `Rule`, `Zone` and `Link` stanzas. `Zone`
//! stanzas continue over multiple lines: a line beginning with whitespace
//! reuses the kind and name of the previous one. Comments run from `#` to
//! the end of the line; unknown stanza kinds are reported and skipped.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{Error, Result};
use crate::rule::{Rule, MAX_SAVE, MIN_SAVE};
use crate::time::TimeDelta;
use crate::zone::{ZonePeriod, ZoneRules, MAX_OFFSET, MIN_OFFSET};

pub(crate) mod scan;

/// Zone periods by zone name.
pub type ZoneSet = BTreeMap<String, Vec<ZonePeriod>>;
/// Rules by rule-set name.
pub type RuleSet = BTreeMap<String, Vec<Rule>>;
/// Canonical zone names by alias.
pub type LinkSet = BTreeMap<String, String>;

/// Everything one or more region files declare.
#[derive(Default, Debug)]
pub struct OlsonData {
    /// Zone periods by zone name.
    pub zones: ZoneSet,
    /// Rules by rule-set name.
    pub rules: RuleSet,
    /// Canonical zone names by alias.
    pub links: LinkSet,
}

impl OlsonData {
    /// Folds another file's records into this set.
    pub fn merge(&mut self, other: OlsonData) {
        for (name, periods) in other.zones {
            self.zones.entry(name).or_default().extend(periods);
        }
        for (name, rules) in other.rules {
            self.rules.entry(name).or_default().extend(rules);
        }
        self.links.extend(other.links);
    }
}

#[derive(Copy, Clone, Debug)]
enum LineKind {
    Rule,
    Zone,
    Link,
    Unknown,
}

/// Parses one region file. `file` is used in diagnostics only.
///
/// Any malformed line is fatal for the whole file; unknown stanza kinds are
/// merely reported and their lines (and continuations) skipped.
pub fn parse_source(file: &str, text: &str) -> Result<OlsonData> {
    let mut data = OlsonData::default();
    let mut context: Option<(LineKind, String)> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("");
        if content.trim().is_empty() {
            continue;
        }
        let malformed = |reason: String| Error::MalformedLine {
            file: file.to_owned(),
            line,
            reason,
        };

        let fields: Vec<&str> = content.split_whitespace().collect();
        let continuation = content.starts_with(|c: char| c.is_whitespace());
        let (kind, name, payload) = if continuation {
            match context.clone() {
                Some((kind, name)) => (kind, name, &fields[..]),
                None => {
                    return Err(malformed("continuation line without a preceding stanza".into()))
                }
            }
        } else {
            let kind = match fields[0] {
                "Rule" => LineKind::Rule,
                "Zone" => LineKind::Zone,
                "Link" => LineKind::Link,
                other => {
                    warn!(file, line, kind = other, "unknown line kind, skipping");
                    LineKind::Unknown
                }
            };
            if fields.len() < 2 && !matches!(kind, LineKind::Unknown) {
                return Err(malformed(format!("`{}` line without a name", fields[0])));
            }
            let name = fields.get(1).copied().unwrap_or_default().to_owned();
            context = Some((kind, name.clone()));
            (kind, name, &fields[2..])
        };

        match kind {
            LineKind::Rule => {
                let &[from, to, _rule_type, month, on, at, save, letter] = payload else {
                    return Err(malformed(format!(
                        "expected 8 fields in a Rule line, found {}",
                        payload.len()
                    )));
                };
                let rule = scan::rule(from, to, month, on, at, save, letter)
                    .map_err(|e| malformed(e.to_string()))?;
                if rule.save < MIN_SAVE || rule.save > MAX_SAVE {
                    warn!(rule_set = %name, save = %rule.save, "saving outside the customary range");
                }
                data.rules.entry(name).or_default().push(rule);
            }
            LineKind::Zone => {
                if payload.len() < 3 {
                    return Err(malformed(format!(
                        "expected at least 3 fields in a Zone line, found {}",
                        payload.len()
                    )));
                }
                let period = parse_period(payload).map_err(|e| malformed(e.to_string()))?;
                if period.offset < MIN_OFFSET || period.offset > MAX_OFFSET {
                    warn!(zone = %name, offset = %period.offset, "GMT offset outside the customary range");
                }
                data.zones.entry(name).or_default().push(period);
            }
            LineKind::Link => {
                let &[alias] = payload else {
                    return Err(malformed(format!(
                        "expected 1 field in a Link line, found {}",
                        payload.len()
                    )));
                };
                data.links.insert(alias.to_owned(), name);
            }
            LineKind::Unknown => {}
        }
    }
    Ok(data)
}

/// Parses one zone period: `GMTOFF RULES FORMAT [UNTIL…]`. The caller has
/// already checked for at least three fields.
fn parse_period(fields: &[&str]) -> Result<ZonePeriod> {
    let offset: TimeDelta = fields[0].parse()?;
    let rules = match fields[1] {
        "-" => ZoneRules::Save(TimeDelta::zero()),
        field => match field.parse::<TimeDelta>() {
            Ok(save) => ZoneRules::Save(save),
            Err(_) => ZoneRules::Named(field.to_owned()),
        },
    };
    let format = match fields[2] {
        "zzz" => String::new(),
        format => format.to_owned(),
    };
    let until = if fields.len() > 3 { Some(scan::until(&fields[3..])?) } else { None };
    Ok(ZonePeriod { offset, rules, format, until })
}
