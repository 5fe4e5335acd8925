//! Debounced slideshow navigation from depth-sensor body tracking.
//!
//! A tracking source delivers frames of up to [`MAX_BODIES`] tracked bodies.
//! The [`DetectorPool`] keeps one gesture detector slot per potential body,
//! rebinding slots whose body changed and pausing slots with no body. Armed
//! slots poll their [`GestureClassifier`] every frame and feed the results
//! through per-direction [`CommandLatch`]es, so a held swipe produces exactly
//! one [`Command`] for the [`CommandSink`].
//!
//! [`GestureService`] runs the whole pipeline on a dedicated worker thread
//! fed by a channel, which is how sensor callbacks are expected to reach it.

pub mod config;
pub mod error;
pub mod gesture;
pub mod integration;
pub mod tracker;

pub use config::PipelineConfig;
pub use error::{ConfigError, FrameError, ServiceError};
pub use gesture::{Command, CommandLatch, Gesture, GestureBindings, GestureObservation};
pub use integration::{
    ChannelSink, CommandSink, GestureClassifier, GesturePipeline, GestureService,
    PipelineBuilder, PlaybackState, PoolSnapshot, Presentation, SensorEvent, SlideShowSink,
    SlotSnapshot, SnapshotHandle, Subscription, TrackingSource,
};
pub use tracker::{BodyFrame, DetectorPool, GestureSlot, MAX_BODIES, SlotState, TrackingId};
