//! Validator configuration.
//!
//! Defaults match the canonical catalog. A YAML or JSON file can override them;
//! `ValidatorConfig::from_env` reads the file named by `SOCCER_SCHEMA_CONFIG_PATH`.

use std::{env, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::position::POSITION_CODES;

pub const CONFIG_PATH_ENV: &str = "SOCCER_SCHEMA_CONFIG_PATH";

/// Player id used by tracking exports for ball samples.
pub const DEFAULT_BALL_SENTINEL: &str = "ball";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Report fields not declared by the entity spec
    pub reject_unknown_fields: bool,
    /// Coordinate range check, disabled when absent
    pub pitch_bounds: Option<PitchBounds>,
    /// Replaces the canonical position codes for `PlayerPosition.position`
    pub allowed_positions: Option<Vec<String>>,
    /// `PlayerTracking.player_id` value that denotes the ball
    pub ball_sentinel: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            reject_unknown_fields: false,
            pitch_bounds: None,
            allowed_positions: None,
            ball_sentinel: DEFAULT_BALL_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PitchBounds {
    /// Metric pitch, origin at a corner flag.
    pub fn metric(length_m: f64, width_m: f64) -> Self {
        Self {
            x_min: 0.0,
            x_max: length_m,
            y_min: 0.0,
            y_max: width_m,
        }
    }

    /// Normalized 0..1 coordinates.
    pub fn normalized() -> Self {
        Self::metric(1.0, 1.0)
    }
}

impl ValidatorConfig {
    /// Strict preset: unknown fields rejected, 105x68 m pitch.
    pub fn strict() -> Self {
        Self {
            reject_unknown_fields: true,
            pitch_bounds: Some(PitchBounds::metric(105.0, 68.0)),
            ..Self::default()
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Defaults unless `SOCCER_SCHEMA_CONFIG_PATH` names a config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        tracing::info!("loading validator config from {CONFIG_PATH_ENV}='{path}'");
        Self::from_path(Path::new(path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bounds) = &self.pitch_bounds {
            if !(bounds.x_min < bounds.x_max && bounds.y_min < bounds.y_max) {
                return Err(ConfigError::Invalid(format!(
                    "pitch bounds must satisfy min < max, got x [{}, {}] y [{}, {}]",
                    bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
                )));
            }
        }

        if let Some(positions) = &self.allowed_positions {
            if positions.is_empty() {
                return Err(ConfigError::Invalid(
                    "allowed_positions must not be empty".to_string(),
                ));
            }
        }

        if self.ball_sentinel.trim().is_empty() {
            return Err(ConfigError::Invalid("ball_sentinel must not be blank".to_string()));
        }

        Ok(())
    }

    /// Position codes accepted for `PlayerPosition.position`.
    pub fn position_codes(&self) -> Vec<String> {
        match &self.allowed_positions {
            Some(custom) => {
                tracing::debug!("using {} custom position codes", custom.len());
                custom.clone()
            }
            None => POSITION_CODES.iter().map(|c| c.to_string()).collect(),
        }
    }
}
