//! Pipeline configuration, loaded from TOML with environment overrides.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gesture::GestureBindings;
use crate::tracker::MAX_BODIES;

const DEFAULT_MIN_CONFIDENCE: f32 = 0.0;
const DEFAULT_QUEUE_CAPACITY: usize = 64;

const ENV_MAX_BODIES: &str = "SWIPE_DECK_MAX_BODIES";
const ENV_MIN_CONFIDENCE: &str = "SWIPE_DECK_MIN_CONFIDENCE";

/// Configuration for the gesture pipeline.
///
/// ```toml
/// max_bodies = 6
/// min_confidence = 0.3
/// queue_capacity = 64
///
/// [gestures]
/// swipe_right = "advance"
/// swipe_left = "retreat"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of detector slots, one per body the sensor can track
    pub max_bodies: usize,
    /// Detections below this confidence count as not detected
    pub min_confidence: f32,
    /// Capacity of the sensor event queue
    pub queue_capacity: usize,
    pub gestures: GestureBindings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_bodies: MAX_BODIES,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            gestures: GestureBindings::default(),
        }
    }
}

impl PipelineConfig {
    /// Read `path`, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.apply_overrides(|var| std::env::var(var).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply_overrides(|var| std::env::var(var).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply overrides looked up by variable name. Blank values are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(ENV_MAX_BODIES).filter(|v| !v.trim().is_empty()) {
            self.max_bodies = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_MAX_BODIES,
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_MIN_CONFIDENCE).filter(|v| !v.trim().is_empty()) {
            self.min_confidence = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_MIN_CONFIDENCE,
                value,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bodies == 0 || self.max_bodies > MAX_BODIES {
            return Err(ConfigError::MaxBodies(self.max_bodies));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::MinConfidence(self.min_confidence));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::QueueCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Command;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = PipelineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_bodies, 6);
        assert_eq!(cfg.gestures.swipe_right, Command::Advance);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: PipelineConfig = toml::from_str(
            r#"
            min_confidence = 0.6

            [gestures]
            swipe_right = "retreat"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.min_confidence, 0.6);
        assert_eq!(cfg.max_bodies, 6);
        assert_eq!(cfg.gestures.swipe_right, Command::Retreat);
        assert_eq!(cfg.gestures.swipe_left, Command::Retreat);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<PipelineConfig>("max_body = 3").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides(|var| match var {
            ENV_MAX_BODIES => Some("2".to_string()),
            ENV_MIN_CONFIDENCE => Some("  ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(cfg.max_bodies, 2);
        assert_eq!(cfg.min_confidence, DEFAULT_MIN_CONFIDENCE);
    }

    #[test]
    fn test_bad_override() {
        let mut cfg = PipelineConfig::default();
        let err = cfg
            .apply_overrides(|var| (var == ENV_MIN_CONFIDENCE).then(|| "high".to_string()))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: ENV_MIN_CONFIDENCE,
                ..
            }
        ));
    }

    #[test]
    fn test_validation() {
        let too_many = PipelineConfig {
            max_bodies: 7,
            ..Default::default()
        };
        assert!(matches!(too_many.validate(), Err(ConfigError::MaxBodies(7))));

        let bad_floor = PipelineConfig {
            min_confidence: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad_floor.validate(),
            Err(ConfigError::MinConfidence(_))
        ));

        let no_queue = PipelineConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(no_queue.validate(), Err(ConfigError::QueueCapacity)));
    }
}
