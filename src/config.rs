use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// on-disk shape of the config file: a single `[intervals]` table of
/// name -> whole minutes
#[derive(Debug, Serialize, Deserialize)]
struct RawConfig {
    intervals: BTreeMap<String, i64>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            intervals: [
                ("every_15_minutes".to_string(), 15),
                ("every_30_minutes".to_string(), 30),
                ("every_hour".to_string(), 60),
            ]
            .into_iter()
            .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read config file: {0}")]
    Read(#[from] io::Error),
    #[error("couldn't parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no usable intervals in config")]
    Empty,
}

/// the interval choices offered in the gui, longest first
///
/// never empty: any load failure is absorbed into the fallback table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    entries: Vec<(String, u32)>,
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::fallback()
    }
}

impl IntervalTable {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            entries: vec![("Every hour".to_string(), 60)],
        }
    }

    /// load the interval table from `path`, absorbing every failure into
    /// the fallback table
    #[must_use]
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            log::warn!(
                "couldn't load intervals from {}: {e}; using default intervals",
                path.display()
            );
            Self::fallback()
        })
    }

    fn try_load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// parse an `[intervals]` table, normalizing labels (underscores become
    /// spaces) and sorting by duration descending
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut entries: Vec<(String, u32)> = raw
            .intervals
            .into_iter()
            .filter_map(|(name, minutes)| match u32::try_from(minutes) {
                Ok(minutes) if minutes >= 1 => Some((name.replace('_', " "), minutes)),
                _ => {
                    log::warn!(
                        "ignoring interval {name:?}: {minutes} is not a positive minute count"
                    );
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        if entries.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// resolve a label into its minute count
    #[must_use]
    pub fn minutes_of(&self, label: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|&(_, minutes)| minutes)
    }

    /// the longest interval, shown as the default selection
    #[must_use]
    pub fn first_label(&self) -> &str {
        self.entries
            .first()
            .map_or("Every hour", |(label, _)| label)
    }
}

/// write the default `[intervals]` table, used by `init`
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string(&RawConfig::default())?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, text)?;
    Ok(())
}

#[must_use]
pub fn config_path() -> PathBuf {
    let mut path = directories::ProjectDirs::from("", "", "ticktocktone")
        .expect("couldn't get config path")
        .config_dir()
        .to_path_buf();
    path.push("config.toml");
    path
}

#[must_use]
pub fn chimes_path() -> PathBuf {
    let mut path = directories::ProjectDirs::from("", "", "ticktocktone")
        .expect("couldn't get chime directory path")
        .data_dir()
        .to_path_buf();
    path.push("chimes");
    path
}

#[must_use]
pub fn is_config_present() -> bool {
    config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "ticktocktone-{tag}-{}.toml",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_normalized_and_sorted_longest_first() {
        let table = IntervalTable::from_toml_str(
            "[intervals]\nevery_hour = 60\nevery_15_minutes = 15\n",
        )
        .unwrap();
        assert_eq!(
            table.entries(),
            [
                ("every hour".to_string(), 60),
                ("every 15 minutes".to_string(), 15)
            ]
        );
        assert_eq!(table.first_label(), "every hour");
        assert_eq!(table.minutes_of("every 15 minutes"), Some(15));
        assert_eq!(table.minutes_of("every_15_minutes"), None);
    }

    #[test]
    fn missing_file_falls_back_to_every_hour() {
        let table = IntervalTable::load(Path::new("/nonexistent/ticktocktone/config.toml"));
        assert_eq!(table, IntervalTable::fallback());
        assert_eq!(table.entries(), [("Every hour".to_string(), 60)]);
    }

    #[test]
    fn malformed_file_falls_back() {
        let path = temp_config("malformed", "intervals = \"not a table\"");
        let table = IntervalTable::load(&path);
        assert_eq!(table, IntervalTable::fallback());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_intervals_table_is_an_error() {
        assert!(IntervalTable::from_toml_str("[other]\nx = 1\n").is_err());
    }

    #[test]
    fn non_positive_entries_are_dropped() {
        let table = IntervalTable::from_toml_str(
            "[intervals]\nnever = 0\nbroken = -5\nevery_hour = 60\n",
        )
        .unwrap();
        assert_eq!(table.entries(), [("every hour".to_string(), 60)]);
    }

    #[test]
    fn only_invalid_entries_is_an_error() {
        let result = IntervalTable::from_toml_str("[intervals]\nnever = 0\n");
        assert!(matches!(result, Err(ConfigError::Empty)));
    }

    #[test]
    fn default_config_round_trips() {
        let path = std::env::temp_dir().join(format!(
            "ticktocktone-default-{}.toml",
            std::process::id()
        ));
        write_default(&path).unwrap();
        let table = IntervalTable::load(&path);
        assert_eq!(
            table.entries(),
            [
                ("every hour".to_string(), 60),
                ("every 30 minutes".to_string(), 30),
                ("every 15 minutes".to_string(), 15)
            ]
        );
        fs::remove_file(path).unwrap();
    }
}
