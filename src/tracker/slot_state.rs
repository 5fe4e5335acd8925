/// Detector slot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// No body bound, classifier paused
    #[default]
    Unbound,
    /// Bound to a tracked body, classifier running
    Armed,
}

impl SlotState {
    pub fn is_armed(self) -> bool {
        matches!(self, Self::Armed)
    }
}
