//! Detector pool: keeps one gesture slot per potential body in sync with tracking frames.

use tracing::{trace, warn};

use crate::gesture::{Command, GestureBindings};
use crate::integration::GestureClassifier;
use crate::tracker::body_frame::BodyFrame;
use crate::tracker::gesture_slot::GestureSlot;
use crate::tracker::tracking_id::TrackingId;

/// Fixed arena of gesture slots addressed by body index.
#[derive(Debug)]
pub struct DetectorPool<C> {
    slots: Vec<GestureSlot<C>>,
    min_confidence: f32,
}

impl<C: GestureClassifier> DetectorPool<C> {
    /// One slot per classifier, in order. The slot count never changes afterwards.
    pub fn new(
        classifiers: impl IntoIterator<Item = C>,
        bindings: &GestureBindings,
        min_confidence: f32,
    ) -> Self {
        let slots = classifiers
            .into_iter()
            .enumerate()
            .map(|(index, classifier)| GestureSlot::new(index, classifier, bindings))
            .collect();

        Self {
            slots,
            min_confidence,
        }
    }

    /// Number of slots in the pool.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get a reference to every slot, in index order.
    pub fn slots(&self) -> &[GestureSlot<C>] {
        &self.slots
    }

    /// Get a reference to the slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&GestureSlot<C>> {
        self.slots.get(index)
    }

    /// Get a mutable reference to the slot at `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut GestureSlot<C>> {
        self.slots.get_mut(index)
    }

    /// Confidence below which a detection counts as not detected.
    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Rebind every slot whose body changed since the last frame.
    ///
    /// `bodies` is index-aligned with the slots; missing entries count as
    /// untracked. A nonzero id already claimed by a lower index in the same
    /// snapshot is treated as untracked, so no two slots ever share a body.
    /// Returns the number of slots rebound.
    pub fn reconcile(&mut self, bodies: &[TrackingId]) -> usize {
        let mut rebound = 0;

        for i in 0..self.slots.len() {
            let mut id = bodies.get(i).copied().unwrap_or(TrackingId::NONE);

            if !id.is_none() && bodies[..i].contains(&id) {
                warn!(slot = i, tracking_id = %id, "duplicate tracking id in snapshot, ignoring");
                id = TrackingId::NONE;
            }

            let slot = &mut self.slots[i];
            if slot.tracking_id() != id {
                slot.rebind(id);
                rebound += 1;
            }
        }

        if rebound > 0 {
            trace!(rebound, "detector pool reconciled");
        }
        rebound
    }

    /// Evaluate every armed slot against `frame`.
    ///
    /// `emit` receives the slot index and command for each rising edge.
    pub fn evaluate(&mut self, frame: &BodyFrame, mut emit: impl FnMut(usize, Command)) {
        let min_confidence = self.min_confidence;
        for slot in &mut self.slots {
            let index = slot.index();
            slot.evaluate(frame, min_confidence, |command| emit(index, command));
        }
    }

    /// Unbind every slot and pause its classifier.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.rebind(TrackingId::NONE);
        }
    }

    /// Number of slots currently bound to a body.
    pub fn armed_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_armed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Gesture, GestureObservation};
    use std::convert::Infallible;

    #[derive(Debug, Default)]
    struct AlwaysSwiping {
        tracking_id: TrackingId,
        paused: bool,
        rebinds: usize,
    }

    impl GestureClassifier for AlwaysSwiping {
        type Error = Infallible;

        fn tracking_id(&self) -> TrackingId {
            self.tracking_id
        }

        fn set_tracking_id(&mut self, id: TrackingId) {
            self.tracking_id = id;
            self.rebinds += 1;
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
            out.push(GestureObservation::new(Gesture::SwipeRight, true, 1.0));
            Ok(())
        }
    }

    fn pool(n: usize) -> DetectorPool<AlwaysSwiping> {
        DetectorPool::new(
            (0..n).map(|_| AlwaysSwiping::default()),
            &GestureBindings::default(),
            0.0,
        )
    }

    fn ids(raw: &[u64]) -> Vec<TrackingId> {
        raw.iter().copied().map(TrackingId::new).collect()
    }

    #[test]
    fn test_short_snapshot_unbinds_remaining_slots() {
        let mut pool = pool(6);
        pool.reconcile(&ids(&[1, 2, 3, 4, 5, 6]));
        assert_eq!(pool.armed_count(), 6);

        pool.reconcile(&ids(&[1, 2]));
        assert_eq!(pool.armed_count(), 2);
        assert_eq!(pool.slot(5).unwrap().tracking_id(), TrackingId::NONE);
    }

    #[test]
    fn test_unchanged_snapshot_is_noop() {
        let mut pool = pool(3);
        assert_eq!(pool.reconcile(&ids(&[7, 0, 9])), 2);

        let rebinds_before = pool.slot(0).unwrap().classifier().rebinds;
        assert_eq!(pool.reconcile(&ids(&[7, 0, 9])), 0);
        assert_eq!(pool.slot(0).unwrap().classifier().rebinds, rebinds_before);
    }

    #[test]
    fn test_duplicate_id_binds_lowest_index_only() {
        let mut pool = pool(3);
        pool.reconcile(&ids(&[4, 4, 0]));

        assert_eq!(pool.slot(0).unwrap().tracking_id(), TrackingId::new(4));
        assert!(!pool.slot(1).unwrap().is_armed());
    }

    #[test]
    fn test_evaluate_reports_slot_index() {
        let mut pool = pool(3);
        pool.reconcile(&ids(&[0, 0, 11]));

        let mut emitted = Vec::new();
        pool.evaluate(&BodyFrame::empty(0, 3), |slot, command| {
            emitted.push((slot, command))
        });

        assert_eq!(emitted, vec![(2, Command::Advance)]);
    }

    #[test]
    fn test_clear_pauses_everything() {
        let mut pool = pool(2);
        pool.reconcile(&ids(&[1, 2]));
        pool.clear();

        assert_eq!(pool.armed_count(), 0);
        assert!(pool.slots().iter().all(|slot| slot.classifier().is_paused()));
    }
}
