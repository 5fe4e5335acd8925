//! GesturePipeline: body frames in, debounced commands out.

use tracing::{debug, info, trace, warn};

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::integration::{
    CommandSink, GestureClassifier, PoolSnapshot, SensorEvent, SnapshotHandle,
};
use crate::tracker::{BodyFrame, DetectorPool, TrackingId};

/// Single-threaded core of the system.
///
/// Owns the detector pool and the command sink. Every sensor event goes
/// through [`handle_event`](Self::handle_event) in arrival order; nothing in
/// here blocks.
pub struct GesturePipeline<C, K> {
    pool: DetectorPool<C>,
    sink: K,
    /// Body buffer, sized on the first frame and reused afterwards
    bodies: Vec<TrackingId>,
    available: bool,
    frames: u64,
    missed_frames: u64,
    commands: u64,
    snapshots: Option<SnapshotHandle>,
}

impl<C: GestureClassifier, K: CommandSink> GesturePipeline<C, K> {
    /// Create a pipeline with one classifier per configured body slot.
    pub fn new(
        config: &PipelineConfig,
        classifiers: Vec<C>,
        sink: K,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if classifiers.len() != config.max_bodies {
            return Err(ConfigError::ClassifierCount {
                expected: config.max_bodies,
                got: classifiers.len(),
            });
        }

        Ok(Self::from_parts(config, classifiers, sink))
    }

    /// Create a pipeline with default configuration, building classifiers with `make`.
    pub fn with_default_config(make: impl FnMut(usize) -> C, sink: K) -> Self {
        let config = PipelineConfig::default();
        let classifiers = (0..config.max_bodies).map(make).collect();
        Self::from_parts(&config, classifiers, sink)
    }

    fn from_parts(config: &PipelineConfig, classifiers: Vec<C>, sink: K) -> Self {
        Self {
            pool: DetectorPool::new(classifiers, &config.gestures, config.min_confidence),
            sink,
            bodies: Vec::new(),
            available: false,
            frames: 0,
            missed_frames: 0,
            commands: 0,
            snapshots: None,
        }
    }

    /// Handle to the snapshots this pipeline publishes after every event.
    pub fn snapshot_handle(&mut self) -> SnapshotHandle {
        let handle = self.snapshots.get_or_insert_with(SnapshotHandle::new).clone();
        handle.publish(self.snapshot());
        handle
    }

    pub fn handle_event(&mut self, event: SensorEvent) {
        match event {
            SensorEvent::AvailabilityChanged { available } => self.set_available(available),
            SensorEvent::FrameArrived(frame) => {
                self.process_frame(frame.as_ref());
            }
        }
        self.publish();
    }

    /// Record a sensor availability change. Bindings are left untouched.
    pub fn set_available(&mut self, available: bool) {
        if self.available == available {
            return;
        }
        self.available = available;
        if available {
            info!("tracking source available");
        } else {
            warn!("tracking source unavailable");
        }
    }

    /// Reconcile the pool against `frame` and evaluate every armed slot.
    ///
    /// A missing frame leaves all bindings and latches as they were.
    /// Returns the number of commands dispatched.
    pub fn process_frame(&mut self, frame: Option<&BodyFrame>) -> usize {
        let Some(frame) = frame else {
            self.missed_frames += 1;
            trace!("frame notification without data");
            return 0;
        };

        if self.bodies.is_empty() {
            let len = frame.body_count().max(self.pool.len());
            debug!(bodies = len, "allocating body buffer");
            self.bodies = vec![TrackingId::NONE; len];
        }
        frame.refresh_into(&mut self.bodies);

        self.pool.reconcile(&self.bodies);
        self.frames += 1;

        let sink = &mut self.sink;
        let mut dispatched = 0;
        self.pool.evaluate(frame, |_, command| {
            sink.dispatch(command);
            dispatched += 1;
        });
        self.commands += dispatched as u64;
        dispatched
    }

    /// Whether the tracking source last reported itself available.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Get a reference to the underlying detector pool.
    pub fn pool(&self) -> &DetectorPool<C> {
        &self.pool
    }

    /// Get a mutable reference to the underlying detector pool.
    pub fn pool_mut(&mut self) -> &mut DetectorPool<C> {
        &mut self.pool
    }

    /// Get a reference to the command sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get a mutable reference to the command sink.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Copy of the current counters and slot states.
    pub fn snapshot(&self) -> PoolSnapshot {
        let mut snapshot = PoolSnapshot::capture(self.pool.slots());
        snapshot.available = self.available;
        snapshot.frames = self.frames;
        snapshot.missed_frames = self.missed_frames;
        snapshot.commands = self.commands;
        snapshot
    }

    fn publish(&self) {
        if let Some(handle) = &self.snapshots {
            handle.publish(self.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Gesture, GestureObservation};
    use std::convert::Infallible;

    #[derive(Debug, Default)]
    struct HeldSwipe {
        tracking_id: TrackingId,
        paused: bool,
    }

    impl GestureClassifier for HeldSwipe {
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
            _frame: &BodyFrame,
            out: &mut Vec<GestureObservation>,
        ) -> Result<(), Self::Error> {
            out.push(GestureObservation::new(Gesture::SwipeLeft, true, 0.9));
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct CountingSink {
        advanced: usize,
        retreated: usize,
    }

    impl CommandSink for CountingSink {
        fn advance(&mut self) {
            self.advanced += 1;
        }

        fn retreat(&mut self) {
            self.retreated += 1;
        }
    }

    fn frame(sequence: u64, raw: &[u64]) -> BodyFrame {
        let ids: Vec<TrackingId> = raw.iter().copied().map(TrackingId::new).collect();
        BodyFrame::from_ids(sequence, &ids).unwrap()
    }

    #[test]
    fn test_gesture_pipeline() {
        let mut pipeline =
            GesturePipeline::with_default_config(|_| HeldSwipe::default(), CountingSink::default());

        for seq in 0..10 {
            pipeline.handle_event(SensorEvent::FrameArrived(Some(frame(seq, &[0, 3]))));
        }

        assert_eq!(pipeline.sink().retreated, 1);
        assert_eq!(pipeline.sink().advanced, 0);
        assert_eq!(pipeline.snapshot().frames, 10);
    }

    #[test]
    fn test_classifier_count_must_match() {
        let config = PipelineConfig {
            max_bodies: 2,
            ..Default::default()
        };
        let err = GesturePipeline::new(&config, vec![HeldSwipe::default()], CountingSink::default())
            .err()
            .unwrap();

        assert!(matches!(
            err,
            ConfigError::ClassifierCount {
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_availability_is_recorded() {
        let mut pipeline =
            GesturePipeline::with_default_config(|_| HeldSwipe::default(), CountingSink::default());
        let snapshots = pipeline.snapshot_handle();
        assert!(!snapshots.load().available);

        pipeline.handle_event(SensorEvent::AvailabilityChanged { available: true });
        assert!(snapshots.load().available);
    }

    #[test]
    fn test_published_snapshot_tracks_events() {
        let mut pipeline =
            GesturePipeline::with_default_config(|_| HeldSwipe::default(), CountingSink::default());
        let snapshots = pipeline.snapshot_handle();
        let before = snapshots.load();

        pipeline.handle_event(SensorEvent::FrameArrived(Some(frame(0, &[4]))));
        let after = snapshots.load();

        assert_eq!(before.slots()[0].tracking_id, TrackingId::NONE);
        assert_eq!(after, pipeline.snapshot());
        assert_eq!(after.slots()[0].tracking_id, TrackingId::new(4));
        assert_eq!(after.slots()[0].fired, [false, true]);
        assert_eq!(after.commands, 1);
    }

    #[test]
    fn test_missing_frames_counted() {
        let mut pipeline =
            GesturePipeline::with_default_config(|_| HeldSwipe::default(), CountingSink::default());

        pipeline.handle_event(SensorEvent::FrameArrived(None));
        let snapshot = pipeline.snapshot();

        assert_eq!(snapshot.missed_frames, 1);
        assert_eq!(snapshot.frames, 0);
        assert_eq!(snapshot.slots().len(), 6);
        assert_eq!(snapshot.commands, 0);
    }
}
