//! Run configuration and its TOML-backed store.
//!
//! The core only ever reads a [`Config`] value handed to it. Loading and
//! persisting it is the job of [`ConfigStore`], driven by the binary.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "PICK_RISK_CONFIG";

/// Ratio cut points; must satisfy `safe > low > high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub safe: f64,
    pub low: f64,
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds { safe: 1.35, low: 1.25, high: 1.00 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Average minutes to work one pick list
    pub avg_pl_min: f64,
    /// Shown in the summary only
    pub shift_end_display: String,
    /// Presentation filter for Safe rows
    pub show_safe_rows: bool,
    // kept last so the TOML table follows the plain keys
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            avg_pl_min: 13.5,
            shift_end_display: "11:50".to_string(),
            show_safe_rows: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !self.avg_pl_min.is_finite() || self.avg_pl_min <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "avg_pl_min must be a positive number, got {}",
                self.avg_pl_min
            )));
        }
        let t = &self.thresholds;
        if ![t.safe, t.low, t.high].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidConfig("thresholds must be finite".to_string()));
        }
        if !(t.safe > t.low && t.low > t.high) {
            return Err(Error::InvalidConfig(format!(
                "thresholds must satisfy safe > low > high, got {} / {} / {}",
                t.safe, t.low, t.high
            )));
        }
        Ok(())
    }

    /// Apply a user-typed average. Text that is not a positive number keeps
    /// the current value.
    pub fn with_avg_pl_min_input(&self, raw: &str) -> Config {
        let mut next = self.clone();
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => next.avg_pl_min = v,
            _ => debug!(input = raw, kept = self.avg_pl_min, "ignoring avg pick-list minutes input"),
        }
        next
    }

    /// Apply a user-typed shift end. Blank input keeps the current value.
    pub fn with_shift_end_input(&self, raw: &str) -> Config {
        let mut next = self.clone();
        let raw = raw.trim();
        if !raw.is_empty() {
            next.shift_end_display = raw.to_string();
        }
        next
    }

    pub fn with_show_safe_rows(&self, show: bool) -> Config {
        Config { show_safe_rows: show, ..self.clone() }
    }
}

/// TOML file holding the persisted [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Store at `$PICK_RISK_CONFIG`, else the user config dir, else the
    /// working directory.
    pub fn default_location() -> Self {
        if let Ok(p) = std::env::var(CONFIG_ENV_VAR) {
            return ConfigStore::new(p);
        }
        let path = dirs::config_dir()
            .map(|d| d.join("pick-risk").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("pick-risk.toml"));
        ConfigStore::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored config over the defaults. A missing file gives the
    /// defaults; so does an unreadable one, with a warning.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored config, using defaults");
            return Config::default();
        }
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config file");
                Config::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<Config> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let s = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, s)?;
        debug!(path = %self.path.display(), "saved config");
        Ok(())
    }
}
