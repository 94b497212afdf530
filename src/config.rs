use anyhow::{Context, Result};
use fs_err::read_to_string;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::queries::MergeStrategy;

/// Contents of `config/timetables.toml`:
///
/// ```toml
/// schedules = ["data/tram_1.txt", "data/tram_8.txt"]
/// merge_strategy = "lock-step"
/// ```
///
/// Relative schedule paths are taken from the working directory, like the CLI's `--schedule`.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schedules: Vec<PathBuf>,
    pub merge_strategy: MergeStrategy,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let file = read_to_string(path)?;
        let config: Config =
            toml::from_str(&file).with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}
