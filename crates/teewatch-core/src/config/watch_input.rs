use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::read_toml;
use crate::error::ConfigError;
use crate::watchlist::{WatchEntry, Watchlist};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchInputEntry {
    /// Day as the site spells it in URLs, e.g. `2022/10/15`.
    pub date: String,
    /// Times of day, e.g. `13:10`.
    pub times: Vec<String>,
}

/// What to watch for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchInput {
    #[serde(default = "default_spots_required")]
    pub spots_required: usize,
    #[serde(default)]
    pub watch_list: Vec<WatchInputEntry>,
}

fn default_spots_required() -> usize {
    1
}

impl WatchInput {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input: WatchInput = read_toml(path)?;
        input.validate()?;
        Ok(input)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let input: WatchInput =
            toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spots_required == 0 {
            return Err(ConfigError::InvalidValue {
                key: "spots_required".into(),
                message: "must be at least 1".into(),
            });
        }
        for entry in &self.watch_list {
            if entry.date.trim().is_empty() {
                return Err(ConfigError::MissingKey("watch_list.date".into()));
            }
            if entry.times.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("watch_list[{}].times", entry.date),
                    message: "times must not be blank".into(),
                });
            }
        }
        if self.watchlist().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "watch_list".into(),
                message: "nothing to watch".into(),
            });
        }
        Ok(())
    }

    /// Normalised watchlist: duplicate dates merged, duplicate times dropped.
    pub fn watchlist(&self) -> Watchlist {
        Watchlist::from_entries(
            self.watch_list
                .iter()
                .map(|e| WatchEntry::new(e.date.trim(), e.times.iter().map(|t| t.trim()))),
        )
    }
}
