//! Trait for body tracking sources.

use std::fmt::{self, Display};

use crossbeam_channel::Sender;

use crate::tracker::BodyFrame;

/// Notification pushed by a tracking source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    /// The sensor became available or unavailable (unplugged, paused, closed).
    AvailabilityChanged { available: bool },
    /// A frame notification arrived. `None` when no frame could be acquired.
    FrameArrived(Option<BodyFrame>),
}

/// Handle for a source's event registration.
///
/// Dropping it revokes the registration; after that the source must not
/// send any further events.
#[must_use = "dropping a subscription revokes it immediately"]
pub struct Subscription {
    revoke: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(revoke: impl FnOnce() + Send + 'static) -> Self {
        Self {
            revoke: Some(Box::new(revoke)),
        }
    }

    /// Revoke now instead of at drop.
    pub fn revoke(mut self) {
        self.run_revoke();
    }

    fn run_revoke(&mut self) {
        if let Some(revoke) = self.revoke.take() {
            revoke();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_revoke();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.revoke.is_some())
            .finish()
    }
}

/// Depth sensor producing body frames.
///
/// Events are delivered on the source's own thread by sending into the
/// channel passed to [`subscribe`](Self::subscribe). Sources should use
/// `try_send` and drop a frame when the queue is full; the pipeline treats
/// that like any other missed frame.
pub trait TrackingSource {
    /// Error type for failures to open the sensor.
    type Error: Display;

    /// Number of body entries per frame (the pool size).
    fn body_count(&self) -> usize;

    /// Register for availability and frame notifications.
    fn subscribe(&mut self, events: Sender<SensorEvent>) -> Subscription;

    /// Open the sensor. On failure the source keeps its registration and may
    /// still report availability later.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Release the sensor.
    fn close(&mut self);
}
