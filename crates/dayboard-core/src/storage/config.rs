//! TOML-based application configuration.
//!
//! Holds the tunables of the core:
//! - Priority scoring weights
//! - Point values and streak rules
//! - Achievement thresholds
//! - Defaults for newly planned tasks
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, ValidationError};
use crate::gamification::{AchievementThresholds, GamificationEngine, PointsTable, StreakConfig};
use crate::task::{parse_clock, TimeConstraint, MIN_ESTIMATED_DURATION};
use crate::timeline::{PriorityScorer, ScoringWeights};

const CONFIG_FILE: &str = "config.toml";

/// Defaults applied when a task is added without explicit timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_window_start")]
    pub window_start: String,
    #[serde(default = "default_window_end")]
    pub window_end: String,
    /// Minutes.
    #[serde(default = "default_duration")]
    pub default_duration: u32,
}

fn default_window_start() -> String {
    "09:00".into()
}
fn default_window_end() -> String {
    "17:00".into()
}
fn default_duration() -> u32 {
    30
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            window_start: default_window_start(),
            window_end: default_window_end(),
            default_duration: default_duration(),
        }
    }
}

impl PlannerConfig {
    /// The default flexible window.
    pub fn window(&self) -> Result<TimeConstraint, ValidationError> {
        TimeConstraint::flexible(
            parse_clock("planner.window_start", &self.window_start)?,
            parse_clock("planner.window_end", &self.window_end)?,
        )
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub points: PointsTable,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub achievements: AchievementThresholds,
    #[serde(default)]
    pub planner: PlannerConfig,
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

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }

        let obj = current.as_object_mut().ok_or_else(unknown)?;
        let existing = obj.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
            ),
            serde_json::Value::Number(_) => {
                if let Ok(n) = value.parse::<u64>() {
                    serde_json::Value::Number(n.into())
                } else if let Ok(n) = value.parse::<f64>() {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                } else {
                    return Err(invalid(format!("cannot parse '{value}' as number")));
                }
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Location of the config file inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load from the data directory, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&data_dir()?)
    }

    /// Same as [`Config::load`] for an explicit directory.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "writing default config");
                let cfg = Self::default();
                cfg.save_to(dir)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&data_dir()?)
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(dir);
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Every leaf key with its current value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Set a value by key in memory, type-checked against the current value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
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

    /// Set a value by key and persist. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.planner.window()?;
        let weights = [
            ("scoring.priority_weight", self.scoring.priority_weight),
            ("scoring.urgency_weight", self.scoring.urgency_weight),
            ("scoring.duration_weight", self.scoring.duration_weight),
        ];
        for (field, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be between 0 and 1, got {weight}"),
                });
            }
        }

        if self.planner.default_duration < MIN_ESTIMATED_DURATION {
            return Err(ValidationError::InvalidValue {
                field: "planner.default_duration".to_string(),
                message: format!(
                    "must be at least {MIN_ESTIMATED_DURATION} minutes, got {}",
                    self.planner.default_duration
                ),
            });
        }

        let thresholds = [
            ("achievements.task_master_tasks", self.achievements.task_master_tasks),
            ("achievements.early_bird_tasks", self.achievements.early_bird_tasks),
            ("achievements.priority_handler_run", self.achievements.priority_handler_run),
        ];
        for (field, threshold) in thresholds {
            if threshold == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn scorer(&self) -> PriorityScorer {
        PriorityScorer::with_weights(self.scoring.clone())
    }

    pub fn engine(&self) -> GamificationEngine {
        GamificationEngine::with_config(
            self.points.clone(),
            &self.streak,
            self.achievements.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::WeekStreakRule;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.points.completed, 100);
        assert_eq!(parsed.streak.week_rule, WeekStreakRule::WeekNumberDelta);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[streak]\nweek_rule = \"calendar_weeks\"\n").unwrap();
        assert_eq!(cfg.streak.week_rule, WeekStreakRule::CalendarWeeks);
        assert_eq!(cfg.achievements.task_master_tasks, 10);
        assert_eq!(cfg.planner.window_start, "09:00");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("points.completed").as_deref(), Some("100"));
        assert_eq!(cfg.get("scoring.levels.medium").as_deref(), Some("0.7"));
        assert_eq!(cfg.get("streak.week_rule").as_deref(), Some("week_number_delta"));
        assert!(cfg.get("points.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_numbers_and_enums() {
        let mut cfg = Config::default();
        cfg.apply("points.completed", "150").unwrap();
        cfg.apply("scoring.duration_weight", "0.25").unwrap();
        cfg.apply("streak.week_rule", "calendar_weeks").unwrap();
        assert_eq!(cfg.points.completed, 150);
        assert_eq!(cfg.scoring.duration_weight, 0.25);
        assert_eq!(cfg.streak.week_rule, WeekStreakRule::CalendarWeeks);
    }

    #[test]
    fn apply_rejects_unknown_keys() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.apply("points.bogus", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.apply("nope.completed", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("points.completed", "lots"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.apply("points.completed", "1.5").is_err());
        assert!(cfg.apply("streak.week_rule", "fortnightly").is_err());
        assert!(cfg.apply("planner.window_end", "08:00").is_err());
        assert!(cfg.apply("scoring.urgency_weight", "3").is_err());
        assert!(matches!(
            cfg.apply("planner.default_duration", "2"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());

        cfg.apply("planner.default_duration", "5").unwrap();
        assert_eq!(cfg.planner.default_duration, 5);
    }

    #[test]
    fn apply_rejects_zero_achievement_thresholds() {
        let mut cfg = Config::default();
        for key in [
            "achievements.task_master_tasks",
            "achievements.early_bird_tasks",
            "achievements.priority_handler_run",
        ] {
            assert!(
                matches!(cfg.apply(key, "0"), Err(ConfigError::InvalidValue { .. })),
                "{key} accepted 0"
            );
        }
        assert_eq!(cfg, Config::default());

        cfg.apply("achievements.priority_handler_run", "1").unwrap();
        let mut stats = crate::gamification::UserStats::new();
        let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let checker = crate::gamification::AchievementChecker::with_thresholds(cfg.achievements);
        assert!(checker.check(&mut stats, &[], today).is_empty());
    }

    #[test]
    fn entries_lists_leaf_keys() {
        let entries = Config::default().entries();
        assert!(entries.iter().any(|(k, v)| k == "points.weekly_streak" && v == "200"));
        assert!(entries.iter().any(|(k, _)| k == "scoring.levels.high"));
        assert!(entries.iter().all(|(k, _)| k.contains('.')));
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(Config::path_in(dir.path()).exists());

        let mut changed = cfg.clone();
        changed.apply("achievements.early_bird_hour", "9").unwrap();
        changed.save_to(dir.path()).unwrap();
        assert_eq!(Config::load_from(dir.path()).unwrap().achievements.early_bird_hour, 9);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::path_in(dir.path()), "[points\ncompleted = ").unwrap();
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
