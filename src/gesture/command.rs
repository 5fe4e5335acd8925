use std::fmt;

use serde::Deserialize;

use super::Gesture;

/// Navigation command sent to the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Next slide
    Advance,
    /// Previous slide
    Retreat,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Retreat => "retreat",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which command each gesture triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureBindings {
    pub swipe_right: Command,
    pub swipe_left: Command,
}

impl Default for GestureBindings {
    fn default() -> Self {
        Self {
            swipe_right: Command::Advance,
            swipe_left: Command::Retreat,
        }
    }
}

impl GestureBindings {
    pub fn command_for(&self, gesture: Gesture) -> Command {
        match gesture {
            Gesture::SwipeRight => self.swipe_right,
            Gesture::SwipeLeft => self.swipe_left,
        }
    }

    pub fn bind(&mut self, gesture: Gesture, command: Command) {
        match gesture {
            Gesture::SwipeRight => self.swipe_right = command,
            Gesture::SwipeLeft => self.swipe_left = command,
        }
    }
}
