//! Settings file for the presence tracker.
//!
//! Settings are read once at startup from JSON. Every key is optional; the
//! keys of the legacy `setting.json` (`minDist`, `maxDist`, `timer`) are
//! accepted as aliases and unrelated keys are ignored.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::tracker::{DEFAULT_DEPTH_SCALE, TrackerConfig};

/// Tracker settings as stored on disk. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceSettings {
    /// Exclusive lower admission distance in millimeters.
    #[serde(alias = "minDist")]
    pub min_dist: i32,
    /// Exclusive upper admission distance in millimeters.
    #[serde(alias = "maxDist")]
    pub max_dist: i32,
    #[serde(alias = "timer")]
    pub promotion_dwell_secs: f64,
    pub provisional_grace_secs: f64,
    pub confirmed_grace_secs: f64,
    /// Detector pixels per distance sample, per axis.
    pub depth_scale: usize,
    /// Minimum time between count reports.
    pub report_interval_secs: f64,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            min_dist: 500,
            max_dist: 1500,
            promotion_dwell_secs: 2.0,
            provisional_grace_secs: 0.5,
            confirmed_grace_secs: 2.0,
            depth_scale: DEFAULT_DEPTH_SCALE,
            report_interval_secs: 1.0,
        }
    }
}

impl PresenceSettings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            min_dist = settings.min_dist,
            max_dist = settings.max_dist,
            promotion_dwell_secs = settings.promotion_dwell_secs,
            "loaded presence settings"
        );
        Ok(settings)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into the tracker's configuration.
    pub fn tracker_config(&self) -> Result<TrackerConfig, ConfigError> {
        let config = TrackerConfig {
            min_dist: self.min_dist,
            max_dist: self.max_dist,
            depth_scale: self.depth_scale,
            promotion_dwell: seconds("promotion_dwell_secs", self.promotion_dwell_secs)?,
            provisional_grace: seconds("provisional_grace_secs", self.provisional_grace_secs)?,
            confirmed_grace: seconds("confirmed_grace_secs", self.confirmed_grace_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn report_interval(&self) -> Result<Duration, ConfigError> {
        seconds("report_interval_secs", self.report_interval_secs)
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let settings = PresenceSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, PresenceSettings::default());
        assert_eq!(settings.tracker_config().unwrap(), TrackerConfig::default());
    }

    #[test]
    fn test_legacy_keys() {
        let json = r#"{
            "minDist": 400,
            "maxDist": 1200,
            "timer": 3,
            "Xdepth": 640,
            "Ydepth": 480
        }"#;
        let config = PresenceSettings::from_json_str(json)
            .unwrap()
            .tracker_config()
            .unwrap();

        assert_eq!(config.min_dist, 400);
        assert_eq!(config.max_dist, 1200);
        assert_eq!(config.promotion_dwell, Duration::from_secs(3));
        assert_eq!(config.confirmed_grace, Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_empty_range() {
        let settings =
            PresenceSettings::from_json_str(r#"{ "min_dist": 900, "max_dist": 900 }"#).unwrap();
        assert!(matches!(
            settings.tracker_config(),
            Err(ConfigError::EmptyDistanceRange {
                min_dist: 900,
                max_dist: 900
            })
        ));
    }

    #[test]
    fn test_rejects_negative_duration() {
        let settings =
            PresenceSettings::from_json_str(r#"{ "confirmed_grace_secs": -1.0 }"#).unwrap();
        assert!(matches!(
            settings.tracker_config(),
            Err(ConfigError::InvalidDuration {
                name: "confirmed_grace_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_report_interval() {
        let settings =
            PresenceSettings::from_json_str(r#"{ "report_interval_secs": 0.25 }"#).unwrap();
        assert_eq!(settings.report_interval().unwrap(), Duration::from_millis(250));

        let settings =
            PresenceSettings::from_json_str(r#"{ "report_interval_secs": -2 }"#).unwrap();
        assert!(matches!(
            settings.report_interval(),
            Err(ConfigError::InvalidDuration {
                name: "report_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            PresenceSettings::from_json_str(r#"{ "min_dist": "near" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PresenceSettings::load("/nonexistent/setting.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let name = format!("presence-settings-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        let settings = PresenceSettings {
            min_dist: 300,
            ..PresenceSettings::default()
        };
        fs::write(&path, settings.to_json_pretty().unwrap()).unwrap();

        let loaded = PresenceSettings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
