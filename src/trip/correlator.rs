//! The per-run subscription state machine.

use super::event::TripEvent;
use super::view::TripView;

/// Lifecycle phase of the run subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WatchPhase {
    /// No run selected; the view is empty.
    #[default]
    Idle,
    /// An open subscription is feeding the reducer.
    Subscribed,
    /// The subscription ended (completion, error, or navigation). No
    /// further events are accepted for this run.
    Closed,
}

/// Correlates one run's event deliveries into a [`TripView`].
///
/// State machine: `Idle -> Subscribed` when a run id becomes active
/// ([`begin`](Self::begin)), `Subscribed -> Closed` on completion, error, or
/// run change. Every `begin` bumps a generation counter and hands the token
/// to the subscription driving deliveries; a delivery carrying a stale
/// token is ignored, so at most one subscription is ever live and a
/// canceled stream can never bleed events into the next run's view.
///
/// The correlator itself is synchronous; see
/// [`TripWatcher`](super::TripWatcher) for the stream-driving wrapper.
#[derive(Clone, Debug, Default)]
pub struct TripCorrelator {
    phase: WatchPhase,
    trip_id: Option<String>,
    generation: u64,
    view: TripView,
    last_error: Option<String>,
}

impl TripCorrelator {
    /// Creates an idle correlator with an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    /// The active run id, if any.
    #[must_use]
    pub fn trip_id(&self) -> Option<&str> {
        self.trip_id.as_deref()
    }

    /// The reduced view of the active run.
    #[must_use]
    pub fn view(&self) -> &TripView {
        &self.view
    }

    /// The terminal stream error, if the subscription failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Activates a run id and returns the generation token its
    /// subscription must present with every delivery.
    ///
    /// Resets the view (run view state is torn down when the active run
    /// changes) and invalidates any token handed out earlier.
    pub fn begin(&mut self, trip_id: impl Into<String>) -> u64 {
        let trip_id = trip_id.into();
        tracing::debug!(trip = %trip_id, "subscribing to run");
        self.generation += 1;
        self.phase = WatchPhase::Subscribed;
        self.trip_id = Some(trip_id);
        self.view.clear();
        self.last_error = None;
        self.generation
    }

    /// Folds one delivery into the view.
    ///
    /// Returns `false` (and leaves the view untouched) for a stale
    /// generation token, a non-subscribed phase, or an event belonging to a
    /// different run.
    pub fn deliver(&mut self, generation: u64, event: TripEvent) -> bool {
        if generation != self.generation || self.phase != WatchPhase::Subscribed {
            tracing::debug!(event = %event.id, "ignoring stale delivery");
            return false;
        }
        if self.trip_id.as_deref() != Some(event.trip.as_str()) {
            tracing::debug!(
                event_trip = %event.trip,
                "ignoring delivery for a different run"
            );
            return false;
        }
        self.view.apply(event);
        true
    }

    /// Records a terminal stream error: `Subscribed -> Closed`.
    ///
    /// Already-received events are preserved: partial progress is shown
    /// as-is, not discarded.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) {
        if generation != self.generation || self.phase != WatchPhase::Subscribed {
            return;
        }
        let message = message.into();
        tracing::warn!(trip = ?self.trip_id, error = %message, "run subscription failed");
        self.last_error = Some(message);
        self.phase = WatchPhase::Closed;
    }

    /// Records stream completion: `Subscribed -> Closed`.
    pub fn complete(&mut self, generation: u64) {
        if generation != self.generation || self.phase != WatchPhase::Subscribed {
            return;
        }
        tracing::debug!(trip = ?self.trip_id, "run subscription completed");
        self.phase = WatchPhase::Closed;
    }

    /// Deselects the run: back to `Idle` with an empty view.
    ///
    /// Also invalidates outstanding generation tokens, so an in-flight
    /// subscription for the old run goes quiet immediately.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.phase = WatchPhase::Idle;
        self.trip_id = None;
        self.view.clear();
        self.last_error = None;
    }
}
