//! Body frame snapshots delivered by the tracking source.

use crate::error::FrameError;
use crate::tracker::tracking_id::TrackingId;

/// Maximum number of bodies the sensor tracks simultaneously.
pub const MAX_BODIES: usize = 6;

/// One tracking frame: the tracking id of every body slot the sensor reports.
///
/// Fixed capacity, so frames are `Copy` and crossing a channel never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyFrame {
    /// Monotonic frame counter assigned by the source
    sequence: u64,
    /// Number of body entries the sensor reported
    body_count: usize,
    ids: [TrackingId; MAX_BODIES],
}

impl BodyFrame {
    /// Build a frame from index-aligned tracking ids.
    ///
    /// Nonzero ids must be unique within a frame.
    pub fn from_ids(sequence: u64, ids: &[TrackingId]) -> Result<Self, FrameError> {
        if ids.len() > MAX_BODIES {
            return Err(FrameError::TooManyBodies { count: ids.len() });
        }

        for (second, id) in ids.iter().enumerate() {
            if id.is_none() {
                continue;
            }
            if let Some(first) = ids[..second].iter().position(|other| other == id) {
                return Err(FrameError::DuplicateTrackingId {
                    id: *id,
                    first,
                    second,
                });
            }
        }

        let mut frame = Self::empty(sequence, ids.len());
        frame.ids[..ids.len()].copy_from_slice(ids);
        Ok(frame)
    }

    /// Frame in which none of the `body_count` bodies is tracked.
    pub fn empty(sequence: u64, body_count: usize) -> Self {
        Self {
            sequence,
            body_count: body_count.min(MAX_BODIES),
            ids: [TrackingId::NONE; MAX_BODIES],
        }
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.body_count
    }

    /// Tracking id at `index`, or [`TrackingId::NONE`] past the reported bodies.
    #[inline]
    pub fn tracking_id(&self, index: usize) -> TrackingId {
        if index < self.body_count {
            self.ids[index]
        } else {
            TrackingId::NONE
        }
    }

    pub fn ids(&self) -> &[TrackingId] {
        &self.ids[..self.body_count]
    }

    /// Copy this frame's ids into a caller-owned buffer, reusing it across frames.
    ///
    /// Entries past the reported bodies are cleared to [`TrackingId::NONE`].
    pub fn refresh_into(&self, bodies: &mut [TrackingId]) {
        for (index, slot) in bodies.iter_mut().enumerate() {
            *slot = self.tracking_id(index);
        }
    }
}
