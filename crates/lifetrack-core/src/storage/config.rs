//! TOML-based application configuration.
//!
//! Stores engine settings:
//! - Timeline row heights and the default compact flag
//! - Default and minimum task durations
//! - Default quadrant mode and the undated-task policy
//! - Day-part boundaries for the time mode
//! - Refresh interval for `watch`
//!
//! Configuration is stored at `~/.config/lifetrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::TickInterval;
use crate::error::{ConfigError, Result};
use crate::pass::Engine;
use crate::quadrant::{DayParts, QuadrantMode, QuadrantPolicy, UndatedPolicy};
use crate::task::DurationPolicy;
use crate::timeline::TimelineMetrics;

/// Timeline rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_hour_height")]
    pub hour_height: f64,
    #[serde(default = "default_compact_hour_height")]
    pub compact_hour_height: f64,
    /// Use compact mode when the command line does not say.
    #[serde(default)]
    pub compact: bool,
}

/// Quadrant board settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantsConfig {
    #[serde(default = "default_mode")]
    pub default_mode: QuadrantMode,
    #[serde(default)]
    pub undated: UndatedPolicy,
}

/// Refresh cadence settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClockConfig {
    #[serde(default)]
    pub tick_seconds: TickInterval,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lifetrack/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub durations: DurationPolicy,
    #[serde(default)]
    pub quadrants: QuadrantsConfig,
    #[serde(default)]
    pub day_parts: DayParts,
    #[serde(default)]
    pub clock: ClockConfig,
}

// Default functions
fn default_hour_height() -> f64 {
    60.0
}
fn default_compact_hour_height() -> f64 {
    20.0
}
fn default_mode() -> QuadrantMode {
    QuadrantMode::UrgentImportant
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            hour_height: default_hour_height(),
            compact_hour_height: default_compact_hour_height(),
            compact: false,
        }
    }
}

impl Default for QuadrantsConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            undated: UndatedPolicy::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => {
                        // Sections are replaced wholesale from a JSON literal.
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// `<data dir>/config.toml`
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit file. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let cfg: Config = toml::from_str(&content)?;
        if let Err(e) = cfg.validate() {
            tracing::warn!("config at {} is invalid: {}", path.display(), e);
        }
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory. The change is rejected, leaving `self`
    /// untouched, if the key is unknown or the result does not validate.
    ///
    /// # Errors
    /// Returns an error for unknown keys, unparsable values, or values that
    /// make the configuration invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn metrics(&self) -> TimelineMetrics {
        TimelineMetrics {
            hour_height: self.timeline.hour_height,
            compact_hour_height: self.timeline.compact_hour_height,
        }
    }

    pub fn quadrant_policy(&self) -> QuadrantPolicy {
        QuadrantPolicy {
            undated: self.quadrants.undated,
            day_parts: self.day_parts,
            durations: self.durations,
        }
    }

    /// # Errors
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.engine().map(|_| ())
    }

    /// Build an engine from these settings.
    ///
    /// # Errors
    /// Returns an error if the metrics, day parts, or durations are invalid.
    pub fn engine(&self) -> Result<Engine> {
        Ok(Engine::new(self.quadrant_policy(), self.metrics())?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {}", e);
            Self::default()
        })
    }
}
