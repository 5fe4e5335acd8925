//! Gesture observations and their debounced translation into commands.

mod command;
mod latch;
mod observation;

pub use command::{Command, GestureBindings};
pub use latch::CommandLatch;
pub use observation::{Gesture, GestureObservation};
