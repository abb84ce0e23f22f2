use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$BUDDY_HOME`, else `~/.buddy`.
pub fn buddy_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("BUDDY_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".buddy"))
}

pub fn ensure_buddy_home() -> Result<PathBuf> {
    let dir = buddy_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_data_dir() -> Result<PathBuf> {
    Ok(buddy_home()?.join("user_data"))
}
