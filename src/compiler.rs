//! The compilation driver: reads region files, resolves every zone and
//! optionally persists the result.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::parse::{self, OlsonData};
use crate::resolve::Resolver;
use crate::timezone::TimeZone;

/// The region files of an Olson release this compiler reads.
pub const REGION_FILES: &[&str] = &[
    "africa",
    "antarctica",
    "asia",
    "australasia",
    "europe",
    "northamerica",
    "southamerica",
];

/// Compiler configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Directory containing the Olson region files.
    pub olsen_dir: PathBuf,
    /// Directory to write one file per resolved zone into; `None` keeps the
    /// result in memory only.
    #[serde(default)]
    pub dest_dir: Option<PathBuf>,
    /// Emit a human-readable trace of each period and rule application.
    /// The trace itself goes through `tracing::debug!`; this flag is how
    /// callers ask the subscriber to show it.
    #[serde(default)]
    pub debug: bool,
}

/// Compiles a full Olson release.
///
/// Reads every region file under `olsen_dir`, resolves every zone and
/// applies the links. An unreadable or malformed region file aborts the
/// compilation; a zone that fails to resolve is reported and skipped. When
/// `dest_dir` is set the resolved zones are also written to disk, one JSON
/// document per zone.
pub fn compile(config: &Config) -> Result<BTreeMap<String, TimeZone>> {
    let mut data = OlsonData::default();
    for file in REGION_FILES {
        let text = fs::read_to_string(config.olsen_dir.join(file))?;
        data.merge(parse::parse_source(file, &text)?);
        info!(file, "parsed region file");
    }

    let zones = Resolver::new(&data.zones, &data.rules).resolve_all(&data.links);
    info!(zones = zones.len(), links = data.links.len(), "resolved all zones");

    if let Some(dest_dir) = &config.dest_dir {
        write_zones(dest_dir, &zones)?;
    }
    Ok(zones)
}

/// Writes one JSON document per zone under `dest_dir`, the `/` in zone
/// names becoming directory separators.
pub fn write_zones(dest_dir: &Path, zones: &BTreeMap<String, TimeZone>) -> Result<()> {
    for (name, zone) in zones {
        let path = dest_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(zone)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;

    use super::write_zones;
    use crate::time::TimeDelta;
    use crate::timezone::{FixedTimeZone, TimeZone};

    #[test]
    fn test_write_zones_nests_directories() {
        let dest = tempfile::tempdir().unwrap();
        let mut zones = BTreeMap::new();
        zones.insert(
            "Etc/GMT".to_owned(),
            TimeZone::Fixed(FixedTimeZone {
                abbreviation: "GMT".to_owned(),
                offset: TimeDelta::zero(),
                save: TimeDelta::zero(),
            }),
        );
        write_zones(dest.path(), &zones).unwrap();

        let written = fs::read_to_string(dest.path().join("Etc/GMT")).unwrap();
        assert!(written.contains("\"abbreviation\": \"GMT\""));
        assert!(written.contains("\"offset\": 0"));
    }
}
