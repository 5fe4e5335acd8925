//! Edge-triggered command latch.

use super::Command;

/// One-shot gate turning a level "detected" signal into a single command.
///
/// A classifier keeps reporting a held pose as detected; the latch emits its
/// command on the rising edge only and re-arms once the signal drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLatch {
    command: Command,
    fired: bool,
}

impl CommandLatch {
    pub const fn new(command: Command) -> Self {
        Self {
            command,
            fired: false,
        }
    }

    #[inline]
    pub fn command(&self) -> Command {
        self.command
    }

    #[inline]
    pub fn is_fired(&self) -> bool {
        self.fired
    }

    /// Feed one observation; returns the command on a false -> true edge.
    pub fn evaluate(&mut self, detected: bool) -> Option<Command> {
        match (detected, self.fired) {
            (true, false) => {
                self.fired = true;
                Some(self.command)
            }
            (true, true) => None,
            (false, _) => {
                self.fired = false;
                None
            }
        }
    }

    /// Force the latch back to its re-armed state.
    pub fn reset(&mut self) {
        self.fired = false;
    }
}
