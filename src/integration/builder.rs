//! Builder for assembling a GesturePipeline.

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::gesture::{Command, Gesture};
use crate::integration::{CommandSink, GestureClassifier, GesturePipeline};

/// Builder for [`GesturePipeline`] starting from the default configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Set the number of detector slots.
    pub fn max_bodies(mut self, max_bodies: usize) -> Self {
        self.config.max_bodies = max_bodies;
        self
    }

    /// Set the confidence floor for detections.
    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.config.min_confidence = min_confidence;
        self
    }

    /// Set the sensor event queue capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Map a gesture to a command.
    pub fn bind(mut self, gesture: Gesture, command: Command) -> Self {
        self.config.gestures.bind(gesture, command);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the pipeline, creating one classifier per slot with `make`.
    pub fn build<C, K>(
        self,
        make: impl FnMut(usize) -> C,
        sink: K,
    ) -> Result<GesturePipeline<C, K>, ConfigError>
    where
        C: GestureClassifier,
        K: CommandSink,
    {
        self.config.validate()?;
        let classifiers = (0..self.config.max_bodies).map(make).collect();
        GesturePipeline::new(&self.config, classifiers, sink)
    }
}
