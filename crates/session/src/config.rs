use std::env;

use formats::{DEFAULT_MAX_UPLOAD_BYTES, IngestLimits};
use layers::PointSizeSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_MAX_UPLOAD_BYTES: &str = "DASHBOARD_MAX_UPLOAD_BYTES";
pub const ENV_TICK_PERIOD_S: &str = "DASHBOARD_TICK_PERIOD_S";
pub const ENV_POINT_SIZE_FACTOR: &str = "DASHBOARD_POINT_SIZE_FACTOR";
pub const ENV_MIN_POINT_SIZE: &str = "DASHBOARD_MIN_POINT_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid config JSON: {0}")]
    InvalidJson(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub max_upload_bytes: u64,
    pub tick_period_s: f64,
    pub point_size_factor: f64,
    pub min_point_size: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            tick_period_s: 1.0,
            point_size_factor: 0.001,
            min_point_size: 0.0001,
        }
    }
}

impl DashboardConfig {
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_upload_bytes: parse_var(&lookup, ENV_MAX_UPLOAD_BYTES, defaults.max_upload_bytes)?,
            tick_period_s: parse_var(&lookup, ENV_TICK_PERIOD_S, defaults.tick_period_s)?,
            point_size_factor: parse_var(
                &lookup,
                ENV_POINT_SIZE_FACTOR,
                defaults.point_size_factor,
            )?,
            min_point_size: parse_var(&lookup, ENV_MIN_POINT_SIZE, defaults.min_point_size)?,
        };
        config.validated()
    }

    /// Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.validated()
    }

    pub fn ingest_limits(&self) -> IngestLimits {
        IngestLimits {
            max_bytes: self.max_upload_bytes,
        }
    }

    pub fn point_size_settings(&self) -> PointSizeSettings {
        PointSizeSettings {
            factor: self.point_size_factor,
            min_size: self.min_point_size,
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let positive = |key: &'static str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    key,
                    value: v.to_string(),
                })
            }
        };
        positive("tick_period_s", self.tick_period_s)?;
        positive("point_size_factor", self.point_size_factor)?;
        positive("min_point_size", self.min_point_size)?;
        Ok(self)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DashboardConfig, ENV_MAX_UPLOAD_BYTES, ENV_TICK_PERIOD_S};
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.max_upload_bytes, 52_428_800);
        assert_eq!(config.ingest_limits().max_bytes, 52_428_800);
    }

    #[test]
    fn reads_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENV_MAX_UPLOAD_BYTES, "1024"),
            (ENV_TICK_PERIOD_S, " 0.5 "),
        ]))
        .unwrap();
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.tick_period_s, 0.5);
    }

    #[test]
    fn rejects_unparsable_and_non_positive_values() {
        let err = DashboardConfig::from_lookup(lookup(&[(ENV_MAX_UPLOAD_BYTES, "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_MAX_UPLOAD_BYTES,
                value: "lots".to_string()
            }
        );
        assert!(DashboardConfig::from_lookup(lookup(&[(ENV_TICK_PERIOD_S, "0")])).is_err());
    }

    #[test]
    fn json_fills_missing_keys() {
        let config = DashboardConfig::from_json(r#"{"tick_period_s": 2.0}"#).unwrap();
        assert_eq!(config.tick_period_s, 2.0);
        assert_eq!(config.min_point_size, 0.0001);
        assert!(matches!(
            DashboardConfig::from_json(r#"{"tick_period_s": "fast"}"#),
            Err(ConfigError::InvalidJson(_))
        ));
    }
}
