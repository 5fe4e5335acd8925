//! Gesture detector slot bound to at most one tracked body.

use tracing::{debug, info, trace};

use crate::gesture::{Command, CommandLatch, Gesture, GestureBindings, GestureObservation};
use crate::integration::GestureClassifier;
use crate::tracker::body_frame::BodyFrame;
use crate::tracker::slot_state::SlotState;
use crate::tracker::tracking_id::TrackingId;

/// Pool entry pairing one classifier with one tracked body.
#[derive(Debug)]
pub struct GestureSlot<C> {
    /// Position in the pool, aligned with the frame's body index
    index: usize,
    tracking_id: TrackingId,
    state: SlotState,
    classifier: C,
    /// One latch per gesture, indexed by `Gesture::index`
    latches: [CommandLatch; Gesture::COUNT],
    /// Last confidence reported per gesture
    confidence: [f32; Gesture::COUNT],
    /// Reused across polls
    observations: Vec<GestureObservation>,
}

impl<C: GestureClassifier> GestureSlot<C> {
    /// Create an unbound slot. The classifier is reset to no body and paused.
    pub fn new(index: usize, mut classifier: C, bindings: &GestureBindings) -> Self {
        classifier.set_tracking_id(TrackingId::NONE);
        classifier.set_paused(true);

        Self {
            index,
            tracking_id: TrackingId::NONE,
            state: SlotState::Unbound,
            classifier,
            latches: Gesture::ALL.map(|gesture| CommandLatch::new(bindings.command_for(gesture))),
            confidence: [0.0; Gesture::COUNT],
            observations: Vec::with_capacity(Gesture::COUNT),
        }
    }

    /// Position of this slot in the pool.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Body this slot is bound to, or `TrackingId::NONE`.
    pub fn tracking_id(&self) -> TrackingId {
        self.tracking_id
    }

    /// Get the slot lifecycle state.
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Whether the slot is bound to a body and evaluating gestures.
    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// Get the latch for `gesture`.
    pub fn latch(&self, gesture: Gesture) -> &CommandLatch {
        &self.latches[gesture.index()]
    }

    /// Last confidence seen for `gesture` from the current body.
    pub fn confidence(&self, gesture: Gesture) -> f32 {
        self.confidence[gesture.index()]
    }

    /// Get a reference to the underlying classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Get a mutable reference to the underlying classifier.
    pub fn classifier_mut(&mut self) -> &mut C {
        &mut self.classifier
    }

    /// Bind this slot to `id`, or unbind it when `id` is [`TrackingId::NONE`].
    ///
    /// Any identity change starts from re-armed latches, so a gesture held
    /// by the previous body is never attributed to the new one.
    pub fn rebind(&mut self, id: TrackingId) {
        if id == self.tracking_id {
            return;
        }

        let previous = self.tracking_id;
        self.tracking_id = id;
        self.state = if id.is_none() {
            SlotState::Unbound
        } else {
            SlotState::Armed
        };

        for latch in &mut self.latches {
            latch.reset();
        }
        self.confidence = [0.0; Gesture::COUNT];

        self.classifier.set_tracking_id(id);
        self.classifier.set_paused(id.is_none());

        if id.is_none() {
            debug!(slot = self.index, %previous, "body lost, detector paused");
        } else {
            debug!(slot = self.index, %previous, tracking_id = %id, "detector bound to body");
        }
    }

    /// Poll the classifier and run each observation through its latch.
    ///
    /// Does nothing while unarmed. `emit` receives each command produced on
    /// a rising edge.
    pub fn evaluate(
        &mut self,
        frame: &BodyFrame,
        min_confidence: f32,
        mut emit: impl FnMut(Command),
    ) {
        if !self.is_armed() {
            return;
        }

        self.observations.clear();
        if let Err(err) = self.classifier.poll(frame, &mut self.observations) {
            debug!(slot = self.index, tracking_id = %self.tracking_id, %err, "gesture poll failed");
            return;
        }

        for observation in &self.observations {
            let i = observation.gesture.index();
            self.confidence[i] = observation.confidence;

            let detected = observation.is_detected(min_confidence);
            trace!(
                slot = self.index,
                gesture = %observation.gesture,
                detected,
                confidence = observation.confidence,
                "gesture observation"
            );

            if let Some(command) = self.latches[i].evaluate(detected) {
                info!(
                    slot = self.index,
                    tracking_id = %self.tracking_id,
                    gesture = %observation.gesture,
                    %command,
                    "gesture recognized"
                );
                emit(command);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Debug, Default)]
    struct FixedClassifier {
        tracking_id: TrackingId,
        paused: bool,
        polls: usize,
        next: Vec<GestureObservation>,
    }

    impl GestureClassifier for FixedClassifier {
        type Error = Infallible;

        fn tracking_id(&self) -> TrackingId {
            self.tracking_id
        }

        fn set_tracking_id(&mut self, id: TrackingId) {
            self.tracking_id = id;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn set_paused(&mut self, paused: bool) {
            self.paused = paused;
        }

        fn poll(
            &mut self,
            _frame: &BodyFrame,
            out: &mut Vec<GestureObservation>,
        ) -> Result<(), Self::Error> {
            self.polls += 1;
            out.extend_from_slice(&self.next);
            Ok(())
        }
    }

    fn slot() -> GestureSlot<FixedClassifier> {
        GestureSlot::new(0, FixedClassifier::default(), &GestureBindings::default())
    }

    #[test]
    fn test_new_slot_is_unbound_and_paused() {
        let slot = slot();

        assert_eq!(slot.state(), SlotState::Unbound);
        assert!(slot.classifier().is_paused());
        assert_eq!(slot.classifier().tracking_id(), TrackingId::NONE);
    }

    #[test]
    fn test_unarmed_slot_never_polls() {
        let mut slot = slot();
        slot.classifier_mut().next = vec![GestureObservation::new(Gesture::SwipeRight, true, 1.0)];

        let mut commands = Vec::new();
        slot.evaluate(&BodyFrame::empty(0, 6), 0.0, |c| commands.push(c));

        assert_eq!(slot.classifier().polls, 0);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_rebind_updates_classifier() {
        let mut slot = slot();

        slot.rebind(TrackingId::new(42));
        assert!(slot.is_armed());
        assert!(!slot.classifier().is_paused());
        assert_eq!(slot.classifier().tracking_id(), TrackingId::new(42));

        slot.rebind(TrackingId::NONE);
        assert!(!slot.is_armed());
        assert!(slot.classifier().is_paused());
    }

    #[test]
    fn test_gestures_latch_independently() {
        let mut slot = slot();
        slot.rebind(TrackingId::new(1));
        slot.classifier_mut().next = vec![
            GestureObservation::new(Gesture::SwipeRight, true, 0.9),
            GestureObservation::new(Gesture::SwipeLeft, true, 0.8),
        ];

        let frame = BodyFrame::empty(0, 6);
        let mut commands = Vec::new();
        slot.evaluate(&frame, 0.0, |c| commands.push(c));
        slot.evaluate(&frame, 0.0, |c| commands.push(c));

        assert_eq!(commands, vec![Command::Advance, Command::Retreat]);
        assert_eq!(slot.confidence(Gesture::SwipeLeft), 0.8);
    }

    #[test]
    fn test_low_confidence_rearms_latch() {
        let mut slot = slot();
        slot.rebind(TrackingId::new(1));
        let frame = BodyFrame::empty(0, 6);
        let mut commands = Vec::new();

        slot.classifier_mut().next = vec![GestureObservation::new(Gesture::SwipeRight, true, 0.9)];
        slot.evaluate(&frame, 0.5, |c| commands.push(c));
        assert!(slot.latch(Gesture::SwipeRight).is_fired());

        slot.classifier_mut().next = vec![GestureObservation::new(Gesture::SwipeRight, true, 0.2)];
        slot.evaluate(&frame, 0.5, |c| commands.push(c));
        assert!(!slot.latch(Gesture::SwipeRight).is_fired());

        assert_eq!(commands, vec![Command::Advance]);
    }
}
