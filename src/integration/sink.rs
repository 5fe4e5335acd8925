//! Command sinks: where recognized gestures end up.

use std::fmt::Display;

use crossbeam_channel::Sender;
use tracing::debug;

use crate::gesture::Command;

/// Navigation surface receiving commands.
///
/// Calls are fire-and-forget. Implementations decide whether navigation is
/// currently possible and silently ignore commands when it is not.
pub trait CommandSink {
    fn advance(&mut self);

    fn retreat(&mut self);

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Advance => self.advance(),
            Command::Retreat => self.retreat(),
        }
    }
}

impl<K: CommandSink + ?Sized> CommandSink for Box<K> {
    fn advance(&mut self) {
        (**self).advance();
    }

    fn retreat(&mut self) {
        (**self).retreat();
    }
}

/// Slideshow playback state as reported by the presentation host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Paused,
    BlackScreen,
    WhiteScreen,
    Done,
}

/// Presentation host hosting the slideshow.
pub trait Presentation {
    type Error: Display;

    /// State of the active slideshow view, `None` if no slideshow window exists.
    fn playback_state(&self) -> Result<Option<PlaybackState>, Self::Error>;

    fn next_slide(&mut self) -> Result<(), Self::Error>;

    fn previous_slide(&mut self) -> Result<(), Self::Error>;
}

/// Sink forwarding commands to a running slideshow and swallowing everything else.
#[derive(Debug)]
pub struct SlideShowSink<P> {
    presentation: P,
}

impl<P: Presentation> SlideShowSink<P> {
    pub fn new(presentation: P) -> Self {
        Self { presentation }
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn into_inner(self) -> P {
        self.presentation
    }

    fn execute(&mut self, command: Command, action: fn(&mut P) -> Result<(), P::Error>) {
        match self.presentation.playback_state() {
            Ok(Some(PlaybackState::Running)) => {
                if let Err(err) = action(&mut self.presentation) {
                    debug!(%command, %err, "slideshow navigation failed");
                }
            }
            Ok(Some(state)) => debug!(%command, ?state, "slideshow not running, ignoring"),
            Ok(None) => debug!(%command, "no slideshow window, ignoring"),
            Err(err) => debug!(%command, %err, "slideshow lookup failed"),
        }
    }
}

impl<P: Presentation> CommandSink for SlideShowSink<P> {
    fn advance(&mut self) {
        self.execute(Command::Advance, P::next_slide);
    }

    fn retreat(&mut self) {
        self.execute(Command::Retreat, P::previous_slide);
    }
}

/// Sink forwarding commands into a channel.
///
/// A full or disconnected channel drops the command.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    commands: Sender<Command>,
}

impl ChannelSink {
    pub fn new(commands: Sender<Command>) -> Self {
        Self { commands }
    }

    fn send(&self, command: Command) {
        if let Err(err) = self.commands.try_send(command) {
            debug!(%command, %err, "command dropped");
        }
    }
}

impl CommandSink for ChannelSink {
    fn advance(&mut self) {
        self.send(Command::Advance);
    }

    fn retreat(&mut self) {
        self.send(Command::Retreat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakePresentation {
        state: Option<PlaybackState>,
        fail_navigation: bool,
        slide: i32,
    }

    impl Presentation for FakePresentation {
        type Error = &'static str;

        fn playback_state(&self) -> Result<Option<PlaybackState>, Self::Error> {
            Ok(self.state)
        }

        fn next_slide(&mut self) -> Result<(), Self::Error> {
            if self.fail_navigation {
                return Err("rpc rejected");
            }
            self.slide += 1;
            Ok(())
        }

        fn previous_slide(&mut self) -> Result<(), Self::Error> {
            if self.fail_navigation {
                return Err("rpc rejected");
            }
            self.slide -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_running_slideshow_navigates() {
        let mut sink = SlideShowSink::new(FakePresentation {
            state: Some(PlaybackState::Running),
            ..Default::default()
        });

        sink.dispatch(Command::Advance);
        sink.dispatch(Command::Advance);
        sink.dispatch(Command::Retreat);

        assert_eq!(sink.presentation().slide, 1);
    }

    #[test]
    fn test_inactive_slideshow_is_noop() {
        for state in [None, Some(PlaybackState::Paused), Some(PlaybackState::Done)] {
            let mut sink = SlideShowSink::new(FakePresentation {
                state,
                ..Default::default()
            });
            sink.advance();
            assert_eq!(sink.presentation().slide, 0);
        }
    }

    #[test]
    fn test_navigation_failure_is_swallowed() {
        let mut sink = SlideShowSink::new(FakePresentation {
            state: Some(PlaybackState::Running),
            fail_navigation: true,
            slide: 0,
        });

        sink.retreat();
        assert_eq!(sink.into_inner().slide, 0);
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let mut sink = ChannelSink::new(tx);

        sink.advance();
        sink.retreat();

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Command::Advance]);
    }
}
