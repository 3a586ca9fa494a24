//! The zone resolver: correlates zone periods with expanded rule sets and
//! emits each zone's transition timeline on the UTC clock.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::{debug, error, warn};

use crate::date::DateTime;
use crate::error::{Error, Result};
use crate::parse::{LinkSet, RuleSet, ZoneSet};
use crate::rule::{order_rules, RuleInstance};
use crate::time::TimeDelta;
use crate::timezone::{FixedTimeZone, TimeZone, Transition, VariableTimeZone};
use crate::zone::{check_period_order, ZoneRules};

/// Resolves zones against a parsed rule table.
///
/// A resolver owns the per-rule-set expansion cache; each rule set named by
/// a zone is expanded at most once per resolver, on first use.
pub struct Resolver<'a> {
    zones: &'a ZoneSet,
    rules: &'a RuleSet,
    expanded: HashMap<String, Rc<Vec<RuleInstance>>>,
}

impl<'a> Resolver<'a> {
    /// Makes a resolver over parsed zone and rule tables.
    pub fn new(zones: &'a ZoneSet, rules: &'a RuleSet) -> Resolver<'a> {
        Resolver { zones, rules, expanded: HashMap::new() }
    }

    fn expand(&mut self, zone: &str, rule_set: &str) -> Result<Rc<Vec<RuleInstance>>> {
        if let Some(instances) = self.expanded.get(rule_set) {
            return Ok(Rc::clone(instances));
        }
        let rules = self.rules.get(rule_set).ok_or_else(|| Error::UnknownRuleSet {
            zone: zone.to_owned(),
            rule_set: rule_set.to_owned(),
        })?;
        let instances = Rc::new(order_rules(rule_set, rules)?);
        self.expanded.insert(rule_set.to_owned(), Rc::clone(&instances));
        Ok(instances)
    }

    /// Resolves one zone into its transition timeline.
    ///
    /// Walks the zone's periods in `UNTIL` order, carrying the saving and
    /// abbreviation letter in force across period boundaries. Every period
    /// opens with a transition at the instant it begins; a rule-driven
    /// period then emits one transition per rule firing inside it. A zone
    /// that ends up with a single transition collapses to a fixed zone
    /// (whose abbreviation need not match the zone name).
    pub fn resolve(&mut self, name: &str) -> Result<TimeZone> {
        let periods =
            self.zones.get(name).ok_or_else(|| Error::UnknownZone(name.to_owned()))?;
        check_period_order(name, periods)?;

        let mut start_utc = DateTime::MIN;
        let mut save = TimeDelta::zero();
        let mut letter = String::new();
        let mut transitions: Vec<Transition> = Vec::new();

        for period in periods {
            let offset = period.offset;
            let until = period.until_datetime();
            let until_kind = period.until_kind();
            debug!(zone = name, %offset, format = %period.format, %until, "period");

            match &period.rules {
                ZoneRules::Save(fixed_save) => {
                    save = *fixed_save;
                    transitions.push(Transition {
                        utc: start_utc,
                        timezone: FixedTimeZone {
                            abbreviation: period.format.clone(),
                            offset,
                            save,
                        },
                    });
                }
                ZoneRules::Named(rule_set) => {
                    let instances = self.expand(name, rule_set)?;

                    // How many instances have already fired when the period
                    // opens, treating each local date as a datetime at
                    // midnight. The up-to-one-offset slack this introduces
                    // is a documented approximation.
                    let fired = instances
                        .iter()
                        .take_while(|instance| {
                            DateTime::at_midnight(instance.date) <= start_utc
                        })
                        .count();
                    match fired.checked_sub(1) {
                        Some(last) => {
                            save = instances[last].rule.save;
                            letter = instances[last].rule.letter.clone();
                        }
                        // The period begins before any rule fires: no saving
                        // yet, and the letter of the first standard-time rule.
                        None => {
                            save = TimeDelta::zero();
                            letter = instances
                                .iter()
                                .find(|instance| instance.rule.save.is_zero())
                                .map(|instance| instance.rule.letter.clone())
                                .unwrap_or_default();
                        }
                    }
                    transitions.push(Transition {
                        utc: start_utc,
                        timezone: FixedTimeZone::from_format(
                            &period.format,
                            &letter,
                            offset,
                            save,
                        ),
                    });

                    // Re-walk from the last fired instance so it can restate
                    // the saving in force, then emit everything up to the
                    // period end. Conversions use the saving just before
                    // each instance fires.
                    for instance in &instances[fired.saturating_sub(1)..] {
                        let local = DateTime::at_midnight(instance.date) + instance.rule.at;
                        let utc = instance.rule.at_kind.to_utc(local, offset, save);
                        let until_utc = until_kind.to_utc(until, offset, save);
                        if utc >= until_utc {
                            break;
                        }
                        save = instance.rule.save;
                        letter = instance.rule.letter.clone();
                        debug!(zone = name, %utc, %save, letter = %letter, "rule application");
                        if utc >= start_utc {
                            transitions.push(Transition {
                                utc,
                                timezone: FixedTimeZone::from_format(
                                    &period.format,
                                    &letter,
                                    offset,
                                    save,
                                ),
                            });
                        }
                    }
                }
            }

            start_utc = until_kind.to_utc(until, offset, save);
            if start_utc >= DateTime::MAX {
                break;
            }
        }

        if transitions.len() > 1 {
            Ok(TimeZone::Variable(VariableTimeZone { name: name.to_owned(), transitions }))
        } else {
            match transitions.pop() {
                Some(transition) => Ok(TimeZone::Fixed(transition.timezone)),
                None => Err(Error::UnknownZone(name.to_owned())),
            }
        }
    }

    /// Resolves every zone, then applies the links.
    ///
    /// A zone that fails to resolve is reported and skipped; it never
    /// suppresses the remaining zones. Each alias receives a copy of its
    /// canonical zone's resolved data under the alias name.
    pub fn resolve_all(&mut self, links: &LinkSet) -> BTreeMap<String, TimeZone> {
        let mut resolved = BTreeMap::new();
        for name in self.zones.keys() {
            match self.resolve(name) {
                Ok(zone) => {
                    resolved.insert(name.clone(), zone);
                }
                Err(err) => error!(zone = %name, %err, "failed to resolve zone"),
            }
        }
        for (alias, canonical) in links {
            match resolved.get(canonical) {
                Some(zone) => {
                    let aliased = zone.renamed(alias);
                    resolved.insert(alias.clone(), aliased);
                }
                None => warn!(%alias, %canonical, "link to an unresolved zone, skipping"),
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::Resolver;
    use crate::date::DateTime;
    use crate::parse::parse_source;
    use crate::time::TimeDelta;
    use crate::timezone::TimeZone;

    fn resolve_one(text: &str, name: &str) -> TimeZone {
        let data = parse_source("test", text).unwrap();
        Resolver::new(&data.zones, &data.rules).resolve(name).unwrap()
    }

    #[test]
    fn test_fixed_only_zone() {
        let zone = resolve_one("Zone\tEtc/GMT\t0\t-\tGMT\n", "Etc/GMT");
        match zone {
            TimeZone::Fixed(fixed) => {
                assert_eq!(fixed.abbreviation, "GMT");
                assert_eq!(fixed.offset, TimeDelta::zero());
                assert_eq!(fixed.save, TimeDelta::zero());
            }
            TimeZone::Variable(_) => panic!("expected a fixed zone"),
        }
    }

    #[test]
    fn test_rule_driven_zone() {
        // A compressed America/New_York: local mean time until the 1883
        // standardisation, then two years of wartime-era DST rules.
        let text = "\
Rule\tUS\t1918\t1919\t-\tMar\tlastSun\t2:00\t1:00\tD
Rule\tUS\t1918\t1919\t-\tOct\tlastSun\t2:00\t0\tS
Zone America/New_York\t-4:56:02\t-\tLMT\t1883 Nov 18 12:03:58
\t\t\t-5:00\tUS\tE%sT
";
        let zone = resolve_one(text, "America/New_York");
        let variable = match zone {
            TimeZone::Variable(variable) => variable,
            TimeZone::Fixed(_) => panic!("expected a variable zone"),
        };
        assert!(variable.is_monotonic());

        let expected = [
            ("1800-01-01 00:00:00", "LMT", -17762, 0),
            ("1883-11-18 17:00:00", "EST", -18000, 0),
            ("1918-03-31 07:00:00", "EDT", -18000, 3600),
            ("1918-10-27 06:00:00", "EST", -18000, 0),
            ("1919-03-30 07:00:00", "EDT", -18000, 3600),
            ("1919-10-26 06:00:00", "EST", -18000, 0),
        ];
        assert_eq!(variable.transitions.len(), expected.len());
        for (transition, (utc, abbreviation, offset, save)) in
            variable.transitions.iter().zip(expected)
        {
            assert_eq!(transition.utc.to_string(), utc);
            assert_eq!(transition.timezone.abbreviation, abbreviation);
            assert_eq!(transition.timezone.offset, TimeDelta::seconds(offset));
            assert_eq!(transition.timezone.save, TimeDelta::seconds(save));
        }
    }

    #[test]
    fn test_period_end_cuts_rules_off() {
        // The period ends mid-1918, so only the March transition fires; the
        // following fixed period restates standard time.
        let text = "\
Rule\tUS\t1918\t1919\t-\tMar\tlastSun\t2:00\t1:00\tD
Rule\tUS\t1918\t1919\t-\tOct\tlastSun\t2:00\t0\tS
Zone Test/Cutoff\t-5:00\tUS\tE%sT\t1918 Jun 1
\t\t\t-5:00\t-\tEST
";
        let zone = resolve_one(text, "Test/Cutoff");
        let variable = match zone {
            TimeZone::Variable(variable) => variable,
            TimeZone::Fixed(_) => panic!("expected a variable zone"),
        };
        let abbreviations: Vec<_> = variable
            .transitions
            .iter()
            .map(|transition| transition.timezone.abbreviation.as_str())
            .collect();
        assert_eq!(abbreviations, ["EST", "EDT", "EST"]);
        // The wall-clock period end is converted with the saving in force.
        assert_eq!(
            variable.transitions[2].utc,
            DateTime::from_ymd_hms_opt(1918, 6, 1, 4, 0, 0).unwrap()
        );
        assert!(variable.is_monotonic());
    }

    #[test]
    fn test_saving_carries_into_next_period() {
        // A period that ends while DST is in force hands a non-zero saving
        // to the UNTIL conversion of step 4.
        let text = "\
Rule\tX\t1920\tonly\t-\tApr\t1\t2:00\t1:00\tD
Rule\tX\t1920\tonly\t-\tNov\t1\t2:00\t0\tS
Zone Test/Handoff\t-5:00\tX\tE%sT\t1920 Jun 1
\t\t\t-6:00\t-\tCST
";
        let zone = resolve_one(text, "Test/Handoff");
        let variable = match zone {
            TimeZone::Variable(variable) => variable,
            TimeZone::Fixed(_) => panic!("expected a variable zone"),
        };
        // 1920-06-01 00:00 wall, offset -5:00, save 1:00 -> 04:00 UTC.
        assert_eq!(
            variable.transitions.last().unwrap().utc,
            DateTime::from_ymd_hms_opt(1920, 6, 1, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_utc_flagged_until() {
        let text = "\
Zone Test/Utc\t-5:00\t-\tEST\t1920 Jun 1 0:00u
\t\t\t-6:00\t-\tCST
";
        let zone = resolve_one(text, "Test/Utc");
        let variable = match zone {
            TimeZone::Variable(variable) => variable,
            TimeZone::Fixed(_) => panic!("expected a variable zone"),
        };
        assert_eq!(
            variable.transitions[1].utc,
            DateTime::from_ymd_hms_opt(1920, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_links_alias_resolved_zones() {
        let text = "\
Zone Etc/GMT\t0\t-\tGMT
Link\tEtc/GMT\tGMT
";
        let data = parse_source("test", text).unwrap();
        let mut resolver = Resolver::new(&data.zones, &data.rules);
        let resolved = resolver.resolve_all(&data.links);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["GMT"], resolved["Etc/GMT"]);
    }

    #[test]
    fn test_unknown_rule_set_is_fatal() {
        let data = parse_source("test", "Zone Test/Bad\t0\tGhost\tG%sT\n").unwrap();
        let mut resolver = Resolver::new(&data.zones, &data.rules);
        assert!(resolver.resolve("Test/Bad").is_err());
        // resolve_all skips the bad zone instead of failing.
        assert!(resolver.resolve_all(&data.links).is_empty());
    }

    #[test]
    fn test_expansion_cache_is_shared() {
        let text = "\
Rule\tEU\t1980\t1990\t-\tMar\tlastSun\t1:00u\t1:00\tS
Rule\tEU\t1980\t1990\t-\tSep\tlastSun\t1:00u\t0\t-
Zone Europe/Paris\t1:00\tEU\tCE%sT
Zone Europe/Berlin\t1:00\tEU\tCE%sT
";
        let data = parse_source("test", text).unwrap();
        let mut resolver = Resolver::new(&data.zones, &data.rules);
        let paris = resolver.resolve("Europe/Paris").unwrap();
        let berlin = resolver.resolve("Europe/Berlin").unwrap();
        assert_eq!(resolver.expanded.len(), 1);
        match (paris, berlin) {
            (TimeZone::Variable(paris), TimeZone::Variable(berlin)) => {
                assert_eq!(paris.transitions, berlin.transitions);
            }
            _ => panic!("expected variable zones"),
        }
    }
}
