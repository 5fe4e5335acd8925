//! Read-only views of pipeline state for other threads.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::gesture::Gesture;
use crate::integration::GestureClassifier;
use crate::tracker::{GestureSlot, MAX_BODIES, TrackingId};

/// State of one detector slot at publish time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlotSnapshot {
    pub index: usize,
    pub tracking_id: TrackingId,
    pub armed: bool,
    /// Last confidence per gesture, indexed by `Gesture::index`
    pub confidence: [f32; Gesture::COUNT],
    /// Latch state per gesture, indexed by `Gesture::index`
    pub fired: [bool; Gesture::COUNT],
}

impl SlotSnapshot {
    pub fn capture<C: GestureClassifier>(slot: &GestureSlot<C>) -> Self {
        Self {
            index: slot.index(),
            tracking_id: slot.tracking_id(),
            armed: slot.is_armed(),
            confidence: Gesture::ALL.map(|gesture| slot.confidence(gesture)),
            fired: Gesture::ALL.map(|gesture| slot.latch(gesture).is_fired()),
        }
    }
}

/// Pipeline state at publish time.
///
/// Fixed-size and `Copy`, so publishing one never allocates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoolSnapshot {
    pub available: bool,
    /// Frames reconciled so far
    pub frames: u64,
    /// Frame notifications that carried no frame
    pub missed_frames: u64,
    /// Commands dispatched to the sink
    pub commands: u64,
    slots: [SlotSnapshot; MAX_BODIES],
    slot_count: usize,
}

impl PoolSnapshot {
    /// Capture every slot of `slots`, up to [`MAX_BODIES`].
    pub fn capture<'a, C: GestureClassifier + 'a>(
        slots: impl IntoIterator<Item = &'a GestureSlot<C>>,
    ) -> Self {
        let mut snapshot = Self::default();
        for (entry, slot) in snapshot.slots.iter_mut().zip(slots) {
            *entry = SlotSnapshot::capture(slot);
            snapshot.slot_count += 1;
        }
        snapshot
    }

    /// Per-slot state, one entry per detector slot.
    pub fn slots(&self) -> &[SlotSnapshot] {
        &self.slots[..self.slot_count]
    }
}

/// Shared handle to the most recently published snapshot.
///
/// The pipeline worker is the only publisher; readers get a copy that may
/// lag the worker by one event.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    current: Arc<RwLock<PoolSnapshot>>,
}

impl SnapshotHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> PoolSnapshot {
        *self.current.read()
    }

    pub(crate) fn publish(&self, snapshot: PoolSnapshot) {
        *self.current.write() = snapshot;
    }
}
