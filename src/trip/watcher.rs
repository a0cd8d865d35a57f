//! Background task bridging a server stream into the correlator.

use std::sync::Arc;

use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::{sync::oneshot, task};

use super::correlator::TripCorrelator;
use crate::client::EventStream;

/// Drives a [`watch_trip`](crate::client::TripService::watch_trip) stream
/// into a shared [`TripCorrelator`] on a background task.
///
/// At most one task is live at a time: [`watch`](Self::watch) shuts the
/// previous one down before spawning the next, and the correlator's
/// generation token makes any still-draining deliveries from the old
/// stream inert. Subscription teardown is an explicit method (or `Drop`),
/// not a rendering framework's effect cleanup.
pub struct TripWatcher {
    correlator: Arc<Mutex<TripCorrelator>>,
    active: Option<WatcherTask>,
}

struct WatcherTask {
    shutdown_tx: oneshot::Sender<()>,
    handle: task::JoinHandle<()>,
}

impl Default for TripWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TripWatcher {
    /// Creates a watcher with an idle correlator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            correlator: Arc::new(Mutex::new(TripCorrelator::new())),
            active: None,
        }
    }

    /// Shared handle to the correlator this watcher feeds.
    #[must_use]
    pub fn correlator(&self) -> Arc<Mutex<TripCorrelator>> {
        Arc::clone(&self.correlator)
    }

    /// Subscribes to a run, canceling any previous subscription first.
    ///
    /// The stream is consumed on a spawned task; events are folded into
    /// the correlator, a stream error closes the subscription without
    /// discarding received events, and exhaustion marks completion.
    pub fn watch(&mut self, trip_id: impl Into<String>, mut stream: EventStream) {
        self.cancel();

        let generation = self.correlator.lock().begin(trip_id);
        let correlator = Arc::clone(&self.correlator);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = task::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    next = stream.next() => match next {
                        Some(Ok(event)) => {
                            correlator.lock().deliver(generation, event);
                        }
                        Some(Err(error)) => {
                            correlator.lock().fail(generation, error.to_string());
                            break;
                        }
                        None => {
                            correlator.lock().complete(generation);
                            break;
                        }
                    },
                }
            }
        });

        self.active = Some(WatcherTask {
            shutdown_tx,
            handle,
        });
    }

    /// Stops the active subscription task, if any.
    ///
    /// Does not touch the correlator: the caller decides whether the view
    /// is cleared ([`TripCorrelator::clear`]) or left showing the last run.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.shutdown_tx.send(());
            active.handle.abort();
        }
    }

    /// Stops the active subscription and waits for its task to finish.
    pub async fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.shutdown_tx.send(());
            let _ = active.handle.await;
        }
    }
}

impl Drop for TripWatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
