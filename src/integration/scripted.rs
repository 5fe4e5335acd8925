//! Scripted tracking sessions for replay and tests.
//!
//! A [`SessionScript`] lists frames with their tracking ids and the gesture
//! observations each tracked body produces. It splits into a
//! [`ScriptedSource`] that replays the frames and [`ScriptedClassifier`]s
//! that answer polls from the same script.

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::error::FrameError;
use crate::gesture::{Gesture, GestureObservation};
use crate::integration::{GestureClassifier, SensorEvent, Subscription, TrackingSource};
use crate::tracker::{BodyFrame, MAX_BODIES, TrackingId};

/// Errors loading a session script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read session script {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid session script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: FrameError,
    },
}

/// Scripted source refusing to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("sensor not connected")]
pub struct NotConnected;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    #[serde(default = "default_body_count")]
    pub body_count: usize,
    #[serde(default)]
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptFrame {
    /// Index-aligned tracking ids, 0 for untracked
    pub bodies: Vec<u64>,
    /// Deliver a notification without frame data
    pub missing: bool,
    /// Availability change delivered before this frame
    pub available: Option<bool>,
    pub observations: Vec<ScriptObservation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptObservation {
    /// Tracking id the observation belongs to
    pub body: u64,
    pub gesture: Gesture,
    pub detected: bool,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_body_count() -> usize {
    MAX_BODIES
}

fn default_confidence() -> f32 {
    1.0
}

impl SessionScript {
    pub fn from_toml_str(raw: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Split into the event stream and the observations classifiers report.
    ///
    /// Frame sequence numbers are the frame's position in the script.
    pub fn compile(&self) -> Result<(ScriptedSource, Arc<ObservationScript>), ScriptError> {
        let mut events = Vec::with_capacity(self.frames.len());
        let mut observations = ObservationScript::default();

        for (index, frame) in self.frames.iter().enumerate() {
            if let Some(available) = frame.available {
                events.push(SensorEvent::AvailabilityChanged { available });
            }
            if frame.missing {
                events.push(SensorEvent::FrameArrived(None));
                continue;
            }

            let sequence = index as u64;
            let mut ids = [TrackingId::NONE; MAX_BODIES];
            let count = frame.bodies.len().max(self.body_count.min(MAX_BODIES));
            for (slot, raw) in ids.iter_mut().zip(&frame.bodies) {
                *slot = TrackingId::new(*raw);
            }
            let ids = ids.get(..count).ok_or(ScriptError::Frame {
                index,
                source: FrameError::TooManyBodies { count },
            })?;
            let body_frame = BodyFrame::from_ids(sequence, ids)
                .map_err(|source| ScriptError::Frame { index, source })?;
            events.push(SensorEvent::FrameArrived(Some(body_frame)));

            for obs in &frame.observations {
                observations.insert(
                    sequence,
                    TrackingId::new(obs.body),
                    GestureObservation::new(obs.gesture, obs.detected, obs.confidence),
                );
            }
        }

        let source = ScriptedSource::new(self.body_count.min(MAX_BODIES), events);
        Ok((source, Arc::new(observations)))
    }
}

/// Observations keyed by frame sequence and tracking id.
#[derive(Debug, Clone, Default)]
pub struct ObservationScript {
    entries: HashMap<(u64, TrackingId), Vec<GestureObservation>>,
}

impl ObservationScript {
    pub fn insert(&mut self, sequence: u64, id: TrackingId, observation: GestureObservation) {
        self.entries
            .entry((sequence, id))
            .or_default()
            .push(observation);
    }

    pub fn get(&self, sequence: u64, id: TrackingId) -> &[GestureObservation] {
        self.entries
            .get(&(sequence, id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Classifier answering polls from an [`ObservationScript`].
#[derive(Debug, Clone)]
pub struct ScriptedClassifier {
    script: Arc<ObservationScript>,
    tracking_id: TrackingId,
    paused: bool,
    polls: u64,
}

impl ScriptedClassifier {
    pub fn new(script: Arc<ObservationScript>) -> Self {
        Self {
            script,
            tracking_id: TrackingId::NONE,
            paused: true,
            polls: 0,
        }
    }

    /// Number of times the pool polled this classifier.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl GestureClassifier for ScriptedClassifier {
    type Error = Infallible;

    fn tracking_id(&self) -> TrackingId {
        self.tracking_id
    }

    fn set_tracking_id(&mut self, id: TrackingId) {
        self.tracking_id = id;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn poll(
        &mut self,
        frame: &BodyFrame,
        out: &mut Vec<GestureObservation>,
    ) -> Result<(), Self::Error> {
        self.polls += 1;
        out.extend_from_slice(self.script.get(frame.sequence(), self.tracking_id));
        Ok(())
    }
}

/// Tracking source replaying a fixed event list when opened.
#[derive(Debug)]
pub struct ScriptedSource {
    body_count: usize,
    events: Vec<SensorEvent>,
    sender: Arc<Mutex<Option<Sender<SensorEvent>>>>,
    refuse_open: bool,
    lossless: bool,
    open: bool,
}

/// Outcome of handing one event to the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Sent,
    Dropped,
    Unsubscribed,
}

impl ScriptedSource {
    pub fn new(body_count: usize, events: Vec<SensorEvent>) -> Self {
        Self {
            body_count,
            events,
            sender: Arc::new(Mutex::new(None)),
            refuse_open: false,
            lossless: false,
            open: false,
        }
    }

    /// Make `open` fail, as with an unplugged sensor.
    pub fn refuse_open(mut self) -> Self {
        self.refuse_open = true;
        self
    }

    /// Wait for queue space instead of dropping events when the queue is full.
    ///
    /// Replays use this so every scripted frame reaches the pipeline.
    pub fn lossless(mut self) -> Self {
        self.lossless = true;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_subscribed(&self) -> bool {
        self.sender.lock().is_some()
    }

    /// Deliver one event to the current subscriber, if any.
    ///
    /// A full queue drops the event unless the source is [`lossless`](Self::lossless).
    /// Returns true only when the event was queued.
    pub fn emit(&self, event: SensorEvent) -> bool {
        self.deliver(event) == Delivery::Sent
    }

    fn deliver(&self, event: SensorEvent) -> Delivery {
        let Some(sender) = self.sender.lock().clone() else {
            return Delivery::Unsubscribed;
        };
        if self.lossless {
            return match sender.send(event) {
                Ok(()) => Delivery::Sent,
                Err(_) => Delivery::Unsubscribed,
            };
        }
        match sender.try_send(event) {
            Ok(()) => Delivery::Sent,
            Err(TrySendError::Full(event)) => {
                debug!(?event, "event queue full, dropping");
                Delivery::Dropped
            }
            Err(TrySendError::Disconnected(_)) => Delivery::Unsubscribed,
        }
    }
}

impl TrackingSource for ScriptedSource {
    type Error = NotConnected;

    fn body_count(&self) -> usize {
        self.body_count
    }

    fn subscribe(&mut self, events: Sender<SensorEvent>) -> Subscription {
        *self.sender.lock() = Some(events);
        let sender = Arc::clone(&self.sender);
        Subscription::new(move || {
            sender.lock().take();
        })
    }

    fn open(&mut self) -> Result<(), Self::Error> {
        if self.refuse_open {
            return Err(NotConnected);
        }
        self.open = true;

        self.deliver(SensorEvent::AvailabilityChanged { available: true });
        let events = std::mem::take(&mut self.events);
        for event in events {
            if self.deliver(event) == Delivery::Unsubscribed {
                debug!("scripted source lost its subscriber");
                break;
            }
        }
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }
}
