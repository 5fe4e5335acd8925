//! GestureService: runs a pipeline on its own thread, fed by a tracking source.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, select};
use tracing::{debug, error, info, warn};

use crate::error::{ConfigError, ServiceError};
use crate::integration::{
    CommandSink, GestureClassifier, GesturePipeline, PoolSnapshot, SensorEvent, SnapshotHandle,
    Subscription, TrackingSource,
};

const WORKER_NAME: &str = "swipe-deck-pipeline";

/// A tracking source wired to a pipeline worker.
///
/// The worker is the only thread touching slot and latch state. Other
/// threads observe it through [`snapshots`](Self::snapshots).
pub struct GestureService<S: TrackingSource> {
    source: S,
    subscription: Option<Subscription>,
    /// Dropping this tells the worker to stop
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<PoolSnapshot>>,
    snapshots: SnapshotHandle,
    closed: bool,
}

impl<S: TrackingSource> GestureService<S> {
    /// Spawn the worker, subscribe to `source` and open it.
    ///
    /// A source that fails to open is not fatal: the service stays up and
    /// the pipeline idles until the source starts delivering events. A zero
    /// `queue_capacity` is rejected before anything is spawned.
    pub fn start<C, K>(
        mut source: S,
        mut pipeline: GesturePipeline<C, K>,
        queue_capacity: usize,
    ) -> Result<Self, ServiceError>
    where
        C: GestureClassifier + Send + 'static,
        K: CommandSink + Send + 'static,
    {
        if queue_capacity == 0 {
            return Err(ConfigError::QueueCapacity.into());
        }
        let (events_tx, events_rx) = crossbeam_channel::bounded(queue_capacity);
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        let snapshots = pipeline.snapshot_handle();

        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || run_worker(pipeline, events_rx, shutdown_rx))?;

        let subscription = source.subscribe(events_tx);
        match source.open() {
            Ok(()) => info!(bodies = source.body_count(), "tracking source opened"),
            Err(err) => warn!(%err, "tracking source failed to open, waiting for availability"),
        }

        Ok(Self {
            source,
            subscription: Some(subscription),
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
            snapshots,
            closed: false,
        })
    }

    pub fn snapshots(&self) -> SnapshotHandle {
        self.snapshots.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Stop the service and return the final pipeline state.
    ///
    /// The subscription is revoked first, then the worker drains whatever
    /// was already queued and exits, and only then is the source closed.
    pub fn shutdown(mut self) -> PoolSnapshot {
        match self.stop() {
            Some(snapshot) => snapshot,
            None => self.snapshots.load(),
        }
    }

    fn stop(&mut self) -> Option<PoolSnapshot> {
        if let Some(subscription) = self.subscription.take() {
            subscription.revoke();
        }
        drop(self.shutdown.take());

        let snapshot = self.worker.take().and_then(|worker| match worker.join() {
            Ok(snapshot) => Some(snapshot),
            Err(_) => {
                error!("pipeline worker panicked");
                None
            }
        });

        if !self.closed {
            self.source.close();
            self.closed = true;
            debug!("tracking source closed");
        }
        snapshot
    }
}

impl<S: TrackingSource> Drop for GestureService<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker<C, K>(
    mut pipeline: GesturePipeline<C, K>,
    events: Receiver<SensorEvent>,
    shutdown: Receiver<()>,
) -> PoolSnapshot
where
    C: GestureClassifier,
    K: CommandSink,
{
    debug!("pipeline worker started");
    loop {
        select! {
            recv(events) -> event => match event {
                Ok(event) => pipeline.handle_event(event),
                Err(_) => break,
            },
            recv(shutdown) -> _ => break,
        }
    }

    // Events queued before the subscription was revoked still count.
    for event in events.try_iter() {
        pipeline.handle_event(event);
    }

    let snapshot = pipeline.snapshot();
    pipeline.pool_mut().clear();
    debug!(
        frames = snapshot.frames,
        commands = snapshot.commands,
        "pipeline worker stopped"
    );
    snapshot
}
