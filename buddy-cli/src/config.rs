use anyhow::{Context, Result};
use buddy_core::forecast::DEFAULT_HORIZON_DAYS;
use buddy_ingest::DEFAULT_DATE_FORMAT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_data_dir, ensure_buddy_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whose ledger and goals to use.
    pub user: String,
    /// Defaults to `~/.buddy/user_data`.
    pub data_dir: Option<PathBuf>,
    /// One stopword per line; replaces the built-in English list.
    pub stopwords_file: Option<PathBuf>,
    /// Used when RUST_LOG is not set.
    pub log_level: String,
    pub forecast: ForecastSection,
    pub upload: UploadSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
    pub default_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSection {
    /// chrono format string for the `date` column.
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: "default".to_string(),
            data_dir: None,
            stopwords_file: None,
            log_level: "info".to_string(),
            forecast: ForecastSection::default(),
            upload: UploadSection::default(),
        }
    }
}

impl Default for ForecastSection {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// `~/.buddy/config.toml`
    pub fn path() -> Result<PathBuf> {
        Ok(ensure_buddy_home()?.join("config.toml"))
    }

    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config.toml")
    }

    /// Defaults when no config file exists yet.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&s)
    }

    /// Writes the defaults unless a config is already there. Returns the path
    /// and whether it was created.
    pub fn init() -> Result<(PathBuf, bool)> {
        let path = Self::path()?;
        if path.exists() {
            return Ok((path, false));
        }
        Self::default().write_to(&path)?;
        Ok((path, true))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize config")
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?).with_context(|| format!("write {}", path.display()))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}
