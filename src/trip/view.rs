//! The pure per-run reducer.

use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

use super::event::{EventKey, TripEvent};

/// The renderable view of one run, reduced from its event stream.
///
/// Three derived projections are maintained together:
///
/// - the deduplicated event list, sorted ascending by timestamp;
/// - `merged_state`, a timestamp-ordered fold of every event's snapshot
///   where later values win on key collision;
/// - `fired_positions`, the distinct position names across all events.
///
/// All three are recomputed from the full deduplicated set after every
/// upsert, never appended to, so out-of-order or replayed delivery
/// cannot corrupt them.
#[derive(Clone, Debug, Default)]
pub struct TripView {
    by_key: FxHashMap<EventKey, TripEvent>,
    events: Vec<TripEvent>,
    merged_state: FxHashMap<String, Value>,
    fired_positions: FxHashSet<String>,
}

impl TripView {
    /// Folds one delivery into the view.
    ///
    /// An event whose identity is already known **replaces** the prior
    /// entry (idempotent upsert); it never duplicates it.
    pub fn apply(&mut self, event: TripEvent) {
        self.by_key.insert(event.key(), event);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.events = self.by_key.values().cloned().collect();
        self.events.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.position.cmp(&b.position))
                .then_with(|| a.id.cmp(&b.id))
        });

        self.merged_state.clear();
        for event in &self.events {
            for (key, value) in &event.state {
                self.merged_state.insert(key.clone(), value.clone());
            }
        }

        self.fired_positions = self.events.iter().map(|e| e.position.clone()).collect();
    }

    /// The deduplicated events, ascending by timestamp.
    #[must_use]
    pub fn events(&self) -> &[TripEvent] {
        &self.events
    }

    /// The cumulative state snapshot across all events so far.
    #[must_use]
    pub fn merged_state(&self) -> &FxHashMap<String, Value> {
        &self.merged_state
    }

    /// The distinct position names that have produced an event.
    #[must_use]
    pub fn fired_positions(&self) -> &FxHashSet<String> {
        &self.fired_positions
    }

    /// Whether the named position has fired in this run.
    #[must_use]
    pub fn has_fired(&self, position: &str) -> bool {
        self.fired_positions.contains(position)
    }

    /// Number of distinct events observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when no events have been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every event and derived projection.
    pub fn clear(&mut self) {
        self.by_key.clear();
        self.events.clear();
        self.merged_state.clear();
        self.fired_positions.clear();
    }
}
