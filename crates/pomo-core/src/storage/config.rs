//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and break task titles and durations
//! - Whether to prompt before starting the next interval
//! - Whether completed intervals are persisted for statistics
//!
//! Configuration is stored at `~/.config/pomo/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::stats::MAX_HEATMAP_MONTHS;
use crate::timer::{EngineOptions, Task, TaskSet};

/// Title and length of one task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub title: String,
    pub duration_min: u32,
}

/// Statistics persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// When false, no database is opened and only the run summary is kept.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whole months shown before the current one in the heat-map window.
    #[serde(default = "default_heatmap_months")]
    pub heatmap_months: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomo/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub ask_to_continue: bool,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_work")]
    pub work: TaskConfig,
    #[serde(rename = "break", default = "default_break")]
    pub break_: TaskConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_heatmap_months() -> u32 {
    3
}
fn default_work() -> TaskConfig {
    TaskConfig {
        title: "work session".into(),
        duration_min: 25,
    }
}
fn default_break() -> TaskConfig {
    TaskConfig {
        title: "break session".into(),
        duration_min: 5,
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heatmap_months: default_heatmap_months(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ask_to_continue: true,
            tick_interval_ms: default_tick_interval_ms(),
            work: default_work(),
            break_: default_break(),
            stats: StatsConfig::default(),
        }
    }
}

impl Config {
    /// `config.toml` inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/pomo"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))?;
        Ok(())
    }

    /// Reject values the timer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        };
        if self.work.duration_min == 0 {
            return Err(invalid("work.duration_min", "must be greater than zero"));
        }
        if self.break_.duration_min == 0 {
            return Err(invalid("break.duration_min", "must be greater than zero"));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be greater than zero"));
        }
        if i64::try_from(self.tick_interval_ms).is_err() {
            return Err(invalid("tick_interval_ms", "out of range"));
        }
        if self.stats.heatmap_months > MAX_HEATMAP_MONTHS {
            return Err(ConfigError::InvalidValue {
                key: "stats.heatmap_months".into(),
                message: format!("must be at most {MAX_HEATMAP_MONTHS}"),
            });
        }
        Ok(())
    }

    pub fn tasks(&self) -> TaskSet {
        TaskSet {
            work: Task::new(self.work.title.clone(), self.work.duration_min),
            break_: Task::new(self.break_.title.clone(), self.break_.duration_min),
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            tasks: self.tasks(),
            ask_to_continue: self.ask_to_continue,
            tick_interval: Duration::milliseconds(
                i64::try_from(self.tick_interval_ms).unwrap_or(i64::MAX),
            ),
        }
    }

    /// Read a value by dot-separated key, e.g. `work.duration_min`.
    pub fn get(&self, key: &str) -> Option<String> {
        let root = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&root, |node, part| node.get(part))?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The existing value's JSON type
    /// decides how `value` is parsed.
    ///
    /// # Errors
    /// Returns an error for unknown keys, unparsable values, or a result that
    /// fails validation. `self` is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.into(),
            message: "unknown config key".into(),
        };
        let bad_value = |message: String| ConfigError::InvalidValue {
            key: key.into(),
            message,
        };

        let mut root = serde_json::to_value(&*self).map_err(|e| bad_value(e.to_string()))?;
        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        let mut parent = &mut root;
        if let Some(path) = parent_path {
            for part in path.split('.') {
                parent = parent.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let slot = parent
            .as_object_mut()
            .and_then(|obj| obj.get_mut(leaf))
            .ok_or_else(unknown)?;

        *slot = match &*slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| bad_value(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value
                    .parse::<u64>()
                    .map_err(|e| bad_value(format!("cannot parse '{value}' as number: {e}")))?
                    .into(),
            ),
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            _ => return Err(unknown()),
        };

        let updated: Config =
            serde_json::from_value(root).map_err(|e| bad_value(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml_str.contains("[break]"));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            ask_to_continue = false

            [work]
            title = "deep work"
            duration_min = 50
            "#,
        )
        .unwrap();
        assert!(!cfg.ask_to_continue);
        assert_eq!(cfg.work.duration_min, 50);
        assert_eq!(cfg.break_.duration_min, 5);
        assert!(cfg.stats.enabled);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.break_.title = "stretch".into();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[work]\ntitle = \"w\"\nduration_min = 0\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "work.duration_min"));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("work.duration_min").as_deref(), Some("25"));
        assert_eq!(cfg.get("break.title").as_deref(), Some("break session"));
        assert_eq!(cfg.get("stats.enabled").as_deref(), Some("true"));
        assert!(cfg.get("nope.nothing").is_none());
    }

    #[test]
    fn set_parses_by_existing_type() {
        let mut cfg = Config::default();
        cfg.set("break.duration_min", "10").unwrap();
        cfg.set("ask_to_continue", "false").unwrap();
        cfg.set("work.title", "focus").unwrap();
        assert_eq!(cfg.break_.duration_min, 10);
        assert!(!cfg.ask_to_continue);
        assert_eq!(cfg.work.title, "focus");
    }

    #[test]
    fn set_rejects_unknown_or_invalid() {
        let mut cfg = Config::default();
        assert!(cfg.set("work.color", "red").is_err());
        assert!(cfg.set("stats.enabled", "maybe").is_err());
        assert!(cfg.set("work.duration_min", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_out_of_range_numbers() {
        let mut cfg = Config::default();
        let err = cfg.set("tick_interval_ms", &u64::MAX.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "tick_interval_ms"));

        let err = cfg.set("stats.heatmap_months", "121").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "stats.heatmap_months"));

        cfg.set("stats.heatmap_months", "120").unwrap();
        assert_eq!(cfg.stats.heatmap_months, MAX_HEATMAP_MONTHS);
    }

    #[test]
    fn oversized_heatmap_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[stats]\nheatmap_months = 5000\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "stats.heatmap_months"));
    }

    #[test]
    fn engine_options_follow_config() {
        let mut cfg = Config::default();
        cfg.tick_interval_ms = 250;
        cfg.ask_to_continue = false;
        let options = cfg.engine_options();
        assert_eq!(options.tick_interval, Duration::milliseconds(250));
        assert!(!options.ask_to_continue);
        assert_eq!(options.tasks.work.duration, Duration::minutes(25));
    }
}
