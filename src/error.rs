//! Error types shared across the crate.

use std::path::PathBuf;

use crate::tracker::{MAX_BODIES, TrackingId};

/// Rejected body frame contents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame reports {count} bodies, sensor supports at most {max}", max = MAX_BODIES)]
    TooManyBodies { count: usize },
    #[error("tracking id {id} appears at body {first} and body {second}")]
    DuplicateTrackingId {
        id: TrackingId,
        first: usize,
        second: usize,
    },
}

/// Failure to load or validate a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{var} has invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("max_bodies must be between 1 and {max}, got {0}", max = MAX_BODIES)]
    MaxBodies(usize),
    #[error("min_confidence must be within [0.0, 1.0], got {0}")]
    MinConfidence(f32),
    #[error("queue_capacity must be greater than zero")]
    QueueCapacity,
    #[error("expected {expected} gesture classifiers, got {got}")]
    ClassifierCount { expected: usize, got: usize },
}

/// Failure to bring up a [`GestureService`](crate::GestureService).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to spawn pipeline worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
