//! Integration module connecting sensors, gesture classifiers and presentations.
//!
//! This module provides the traits external collaborators implement
//! ([`TrackingSource`], [`GestureClassifier`], [`CommandSink`]), the
//! [`GesturePipeline`] that ties them to the detector pool, and the
//! [`GestureService`] that runs it on a worker thread.

mod builder;
mod classifier;
mod pipeline;
pub mod scripted;
mod service;
mod sink;
mod snapshot;
mod source;

pub use builder::PipelineBuilder;
pub use classifier::GestureClassifier;
pub use pipeline::GesturePipeline;
pub use service::GestureService;
pub use sink::{ChannelSink, CommandSink, PlaybackState, Presentation, SlideShowSink};
pub use snapshot::{PoolSnapshot, SlotSnapshot, SnapshotHandle};
pub use source::{SensorEvent, Subscription, TrackingSource};
