use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("min_spawn_rate {min} cannot be greater than max_spawn_rate {max}")]
    SpawnRateOrder { min: f32, max: f32 },
    #[error("decrease threshold {decrease} must be less than increase threshold {increase}")]
    ThresholdOrder { decrease: f32, increase: f32 },
}

/// Playfield size in world units. Fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("viewport.width", self.width, 320.0, 3840.0)?;
        check_range("viewport.height", self.height, 240.0, 2160.0)
    }
}

/// Accuracy thresholds that move the difficulty target.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccuracyThresholds {
    /// Raise the target when accuracy is at or above this.
    pub increase: f32,
    /// Lower the target when accuracy is at or below this.
    pub decrease: f32,
}

impl Default for AccuracyThresholds {
    fn default() -> Self {
        Self {
            increase: 0.8,
            decrease: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Spawns per second the scheduler starts from.
    pub base_spawn_rate: f32,
    pub min_spawn_rate: f32,
    pub max_spawn_rate: f32,
    /// Step applied to the target on each adjustment.
    pub scaling_factor: f32,
    /// Seconds between target recomputations.
    pub adjustment_window: f32,
    pub accuracy_thresholds: AccuracyThresholds,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            base_spawn_rate: 2.5,
            min_spawn_rate: 1.5,
            max_spawn_rate: 5.0,
            scaling_factor: 0.1,
            adjustment_window: 10.0,
            accuracy_thresholds: AccuracyThresholds::default(),
        }
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("difficulty.base_spawn_rate", self.base_spawn_rate, 0.1, 10.0)?;
        check_range("difficulty.min_spawn_rate", self.min_spawn_rate, 0.1, 10.0)?;
        check_range("difficulty.max_spawn_rate", self.max_spawn_rate, 0.1, 10.0)?;
        check_range("difficulty.scaling_factor", self.scaling_factor, 0.01, 1.0)?;
        check_range("difficulty.adjustment_window", self.adjustment_window, 1.0, 60.0)?;
        let t = &self.accuracy_thresholds;
        check_range("difficulty.accuracy_thresholds.increase", t.increase, 0.0, 1.0)?;
        check_range("difficulty.accuracy_thresholds.decrease", t.decrease, 0.0, 1.0)?;

        if self.min_spawn_rate > self.max_spawn_rate {
            return Err(ConfigError::SpawnRateOrder {
                min: self.min_spawn_rate,
                max: self.max_spawn_rate,
            });
        }
        if t.decrease >= t.increase {
            return Err(ConfigError::ThresholdOrder {
                decrease: t.decrease,
                increase: t.increase,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub schooling_radius: f32,
    pub flee_radius: f32,
    /// Seconds a startled fish keeps fleeing.
    pub flee_duration: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            schooling_radius: 100.0,
            flee_radius: 150.0,
            flee_duration: 2.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
        }
    }
}

impl BehaviorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("behavior.schooling_radius", self.schooling_radius, 10.0, 500.0)?;
        check_range("behavior.flee_radius", self.flee_radius, 10.0, 500.0)?;
        check_range("behavior.flee_duration", self.flee_duration, 0.1, 10.0)?;
        check_range("behavior.separation_weight", self.separation_weight, 0.0, 10.0)?;
        check_range("behavior.alignment_weight", self.alignment_weight, 0.0, 10.0)?;
        check_range("behavior.cohesion_weight", self.cohesion_weight, 0.0, 10.0)
    }
}

/// Full configuration for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,
    pub difficulty: DifficultyConfig,
    pub behavior: BehaviorConfig,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.difficulty.validate()?;
        self.behavior.validate()
    }

    /// Parse a (possibly partial) JSON document over the defaults, then validate.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let config = GameConfig::from_json(
            r#"{ "difficulty": { "adjustment_window": 5 }, "viewport": { "width": 1024 } }"#,
        )
        .unwrap();
        assert_eq!(config.difficulty.adjustment_window, 5.0);
        assert_eq!(config.difficulty.max_spawn_rate, 5.0);
        assert_eq!(config.viewport.width, 1024.0);
        assert_eq!(config.viewport.height, 600.0);
        assert_eq!(config.behavior, BehaviorConfig::default());
    }

    #[test]
    fn rejects_out_of_range() {
        let err = GameConfig::from_json(r#"{ "behavior": { "flee_radius": 5 } }"#).unwrap_err();
        match err {
            ConfigError::OutOfRange { field, value, .. } => {
                assert_eq!(field, "behavior.flee_radius");
                assert_eq!(value, 5.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_inverted_spawn_rates() {
        let config = DifficultyConfig {
            min_spawn_rate: 6.0,
            max_spawn_rate: 2.0,
            ..DifficultyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnRateOrder { .. })
        ));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = DifficultyConfig {
            accuracy_thresholds: AccuracyThresholds {
                increase: 0.5,
                decrease: 0.5,
            },
            ..DifficultyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn rejects_nan() {
        let config = DifficultyConfig {
            scaling_factor: f32::NAN,
            ..DifficultyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
