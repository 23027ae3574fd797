//! Scripted command input.
//!
//! A script is a YAML list of commands, each tagged with the frame after
//! which it is applied:
//!
//! ```yaml
//! - frame: 120
//!   command: set_restitution
//!   restitution: 0.6
//! - frame: 300
//!   command: close
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use bounce_core::simulation::Command;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledCommand {
    pub frame: u64,
    #[serde(flatten)]
    pub command: Command,
}

pub fn parse(source: &str) -> Result<Vec<(u64, Command)>> {
    let entries: Vec<ScheduledCommand> =
        serde_yaml::from_str(source).context("malformed command script")?;
    Ok(entries
        .into_iter()
        .map(|entry| (entry.frame, entry.command))
        .collect())
}

pub fn load(path: &Path) -> Result<Vec<(u64, Command)>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading command script {}", path.display()))?;
    parse(&contents)
}
