//! Per-user JSON files: `data_<user>.json` for the ledger and
//! `goals_<user>.json` for monthly goals.
//!
//! [`Store::system_stats`] totals every ledger in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use buddy_core::{GoalBook, Ledger};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Totals across every user's ledger in one data directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SystemStats {
    /// Ledger files found, readable or not.
    pub users: usize,
    pub transactions: usize,
    /// Sum of every amount, income and expense alike.
    pub volume: f64,
    pub unreadable: usize,
}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    user: String,
}

impl Store {
    /// Creates `root` if needed. User names are limited to `[A-Za-z0-9_-]`.
    pub fn open(root: impl Into<PathBuf>, user: &str) -> Result<Self> {
        if user.is_empty()
            || !user
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("invalid user name {user:?}");
        }
        let root = root.into();
        fs::create_dir_all(&root).with_context(|| format!("create {}", root.display()))?;
        Ok(Self {
            root,
            user: user.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.join(format!("data_{}.json", self.user))
    }

    pub fn goals_path(&self) -> PathBuf {
        self.root.join(format!("goals_{}.json", self.user))
    }

    /// A missing file is an empty ledger; a corrupt one is an error.
    pub fn load_ledger(&self) -> Result<Ledger> {
        read_json(&self.ledger_path())
    }

    pub fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        write_json(&self.ledger_path(), ledger)
    }

    pub fn load_goals(&self) -> Result<GoalBook> {
        read_json(&self.goals_path())
    }

    pub fn save_goals(&self, goals: &GoalBook) -> Result<()> {
        write_json(&self.goals_path(), goals)
    }

    /// Scan every `data_*.json` under the root. Unreadable ledgers are
    /// counted and skipped.
    pub fn system_stats(&self) -> Result<SystemStats> {
        let root = self.root();
        let entries =
            fs::read_dir(root).with_context(|| format!("list {}", root.display()))?;

        let mut stats = SystemStats::default();
        for entry in entries {
            let path = entry.with_context(|| format!("list {}", root.display()))?.path();
            let is_ledger = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("data_") && n.ends_with(".json"));
            if !is_ledger {
                continue;
            }
            stats.users += 1;
            match read_json::<Ledger>(&path) {
                Ok(ledger) => {
                    stats.transactions += ledger.len();
                    stats.volume += ledger.iter().map(|t| t.amount).sum::<f64>();
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{e:#}"), "skipping unreadable ledger");
                    stats.unreadable += 1;
                }
            }
        }
        debug!(users = stats.users, transactions = stats.transactions, "system stats");
        Ok(stats)
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!(path = %path.display(), "no file yet, starting empty");
        return Ok(T::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Write to a sibling temp file, then rename over the target.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
    debug!(path = %path.display(), "saved");
    Ok(())
}
