//! Trait for gesture classification backends.

use std::fmt::Display;

use crate::gesture::GestureObservation;
use crate::tracker::{BodyFrame, TrackingId};

/// Per-body gesture classifier.
///
/// One instance exists per detector slot. The pool binds it to a tracking id
/// and pauses it while no body is bound; while paused it is never polled.
/// Classifiers may keep smoothing state between polls, which survives for as
/// long as the bound id does not change.
///
/// # Example
///
/// ```ignore
/// use swipe_deck::{BodyFrame, GestureClassifier, GestureObservation, TrackingId};
///
/// struct MyClassifier {
///     tracking_id: TrackingId,
///     paused: bool,
/// }
///
/// impl GestureClassifier for MyClassifier {
///     type Error = std::io::Error;
///
///     fn tracking_id(&self) -> TrackingId { self.tracking_id }
///     fn set_tracking_id(&mut self, id: TrackingId) { self.tracking_id = id; }
///     fn is_paused(&self) -> bool { self.paused }
///     fn set_paused(&mut self, paused: bool) { self.paused = paused; }
///
///     fn poll(&mut self, frame: &BodyFrame, out: &mut Vec<GestureObservation>) -> Result<(), Self::Error> {
///         // Run the gesture model for `self.tracking_id` and push its results
///         Ok(())
///     }
/// }
/// ```
pub trait GestureClassifier {
    /// Error type for classification failures.
    type Error: Display;

    fn tracking_id(&self) -> TrackingId;

    fn set_tracking_id(&mut self, id: TrackingId);

    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    /// Append the observations available for `frame` to `out`.
    ///
    /// Pushing nothing is valid and means no result this frame. An error
    /// drops this frame's results for the slot and nothing else.
    fn poll(
        &mut self,
        frame: &BodyFrame,
        out: &mut Vec<GestureObservation>,
    ) -> Result<(), Self::Error>;
}
