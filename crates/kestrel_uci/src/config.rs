//! Engine options: defaults, an optional TOML file and `setoption`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "KESTREL_CONFIG";
/// Configuration file looked for in the working directory.
pub const CONFIG_FILE: &str = "kestrel.toml";

pub const HASH_RANGE: (usize, usize) = (1, 65536);
pub const THREADS_RANGE: (usize, usize) = (1, 256);
pub const MULTI_PV_RANGE: (usize, usize) = (1, 16);
pub const OVERHEAD_RANGE: (u64, u64) = (0, 5000);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Transposition table size in megabytes
    pub hash_mb: usize,
    pub threads: usize,
    pub multi_pv: usize,
    /// Time kept back from every move for communication lag
    pub move_overhead_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            hash_mb: 16,
            threads: 1,
            multi_pv: 1,
            move_overhead_ms: 10,
        }
    }
}

/// An option change requested through `setoption`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionChange {
    Hash(usize),
    Threads(usize),
    MultiPv(usize),
    MoveOverhead(u64),
    ClearHash,
}

impl EngineOptions {
    /// Options from the file named by `KESTREL_CONFIG`, else from
    /// `kestrel.toml` if it exists, else the defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let options: Self = toml::from_str(text)?;
        Ok(options.clamped())
    }

    /// Pull every value into its advertised range.
    pub fn clamped(self) -> Self {
        Self {
            hash_mb: self.hash_mb.clamp(HASH_RANGE.0, HASH_RANGE.1),
            threads: self.threads.clamp(THREADS_RANGE.0, THREADS_RANGE.1),
            multi_pv: self.multi_pv.clamp(MULTI_PV_RANGE.0, MULTI_PV_RANGE.1),
            move_overhead_ms: self
                .move_overhead_ms
                .clamp(OVERHEAD_RANGE.0, OVERHEAD_RANGE.1),
        }
    }

    /// Record a `setoption` and return what changed, clamped to range.
    pub fn set(&mut self, name: &str, value: Option<&str>) -> Result<OptionChange> {
        let change = match name.to_ascii_lowercase().as_str() {
            "hash" => OptionChange::Hash(spin(name, value, HASH_RANGE)?),
            "threads" => OptionChange::Threads(spin(name, value, THREADS_RANGE)?),
            "multipv" => OptionChange::MultiPv(spin(name, value, MULTI_PV_RANGE)?),
            "move overhead" => OptionChange::MoveOverhead(spin(name, value, OVERHEAD_RANGE)?),
            "clear hash" => OptionChange::ClearHash,
            _ => bail!("unknown option '{name}'"),
        };

        match change {
            OptionChange::Hash(mb) => self.hash_mb = mb,
            OptionChange::Threads(n) => self.threads = n,
            OptionChange::MultiPv(n) => self.multi_pv = n,
            OptionChange::MoveOverhead(ms) => self.move_overhead_ms = ms,
            OptionChange::ClearHash => {}
        }
        Ok(change)
    }

    /// `option` lines announced in reply to `uci`.
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!(
                "option name Hash type spin default {} min {} max {}",
                self.hash_mb, HASH_RANGE.0, HASH_RANGE.1
            ),
            format!(
                "option name Threads type spin default {} min {} max {}",
                self.threads, THREADS_RANGE.0, THREADS_RANGE.1
            ),
            format!(
                "option name MultiPV type spin default {} min {} max {}",
                self.multi_pv, MULTI_PV_RANGE.0, MULTI_PV_RANGE.1
            ),
            format!(
                "option name Move Overhead type spin default {} min {} max {}",
                self.move_overhead_ms, OVERHEAD_RANGE.0, OVERHEAD_RANGE.1
            ),
            "option name Clear Hash type button".to_string(),
        ]
    }
}

fn spin<T>(name: &str, value: Option<&str>, range: (T, T)) -> Result<T>
where
    T: std::str::FromStr + Ord,
{
    let value = value.with_context(|| format!("option '{name}' needs a value"))?;
    let n: T = value
        .trim()
        .parse()
        .ok()
        .with_context(|| format!("invalid value '{value}' for option '{name}'"))?;
    Ok(n.clamp(range.0, range.1))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
