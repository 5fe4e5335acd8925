mod body_frame;
mod detector_pool;
mod gesture_slot;
mod slot_state;
mod tracking_id;

pub use body_frame::{BodyFrame, MAX_BODIES};
pub use detector_pool::DetectorPool;
pub use gesture_slot::GestureSlot;
pub use slot_state::SlotState;
pub use tracking_id::TrackingId;
