use std::fmt;

use serde::Deserialize;

/// Gesture kinds a slot watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    SwipeRight,
    SwipeLeft,
}

impl Gesture {
    pub const COUNT: usize = 2;
    pub const ALL: [Gesture; Gesture::COUNT] = [Gesture::SwipeRight, Gesture::SwipeLeft];

    /// Position of this gesture in per-gesture arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::SwipeRight => 0,
            Self::SwipeLeft => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SwipeRight => "swipe_right",
            Self::SwipeLeft => "swipe_left",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier result for one body and one gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureObservation {
    pub gesture: Gesture,
    pub detected: bool,
    /// Classifier confidence in [0.0, 1.0]
    pub confidence: f32,
}

impl GestureObservation {
    pub fn new(gesture: Gesture, detected: bool, confidence: f32) -> Self {
        Self {
            gesture,
            detected,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Whether this observation counts as a detection at the given confidence floor.
    #[inline]
    pub fn is_detected(&self, min_confidence: f32) -> bool {
        self.detected && self.confidence >= min_confidence
    }
}
