//! Wire-stable run and event records.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ExitLabel;

/// One observed step completion within a run.
///
/// Timestamps are epoch milliseconds, monotonically non-decreasing per run
/// on the service side. Events may still arrive out of order or be
/// retransmitted, which is why the [`TripView`](super::TripView) reducer
/// keys them by identity rather than arrival.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripEvent {
    pub id: String,
    /// Run this event belongs to.
    pub trip: String,
    /// Display name of the position that fired.
    pub position: String,
    /// Epoch milliseconds.
    pub timestamp: u64,
    #[serde(default)]
    pub exit_label: ExitLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_message: Option<String>,
    /// Key -> opaque value snapshot at this point in execution.
    #[serde(default)]
    pub state: FxHashMap<String, Value>,
}

impl TripEvent {
    /// Creates an event with an empty state snapshot.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        trip: impl Into<String>,
        position: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            trip: trip.into(),
            position: position.into(),
            timestamp,
            exit_label: ExitLabel::Unset,
            exit_message: None,
            state: FxHashMap::default(),
        }
    }

    /// Sets the outcome label and optional diagnostic message.
    #[must_use]
    pub fn with_exit(mut self, label: ExitLabel, message: Option<&str>) -> Self {
        self.exit_label = label;
        self.exit_message = message.map(str::to_string);
        self
    }

    /// Adds one key to the state snapshot.
    #[must_use]
    pub fn with_state(mut self, key: impl Into<String>, value: Value) -> Self {
        self.state.insert(key.into(), value);
        self
    }

    /// The identity this event deduplicates under.
    ///
    /// The stable id when the service provides one; otherwise the
    /// (position, timestamp) composite.
    #[must_use]
    pub fn key(&self) -> EventKey {
        if self.id.is_empty() {
            EventKey::Composite {
                position: self.position.clone(),
                timestamp: self.timestamp,
            }
        } else {
            EventKey::Id(self.id.clone())
        }
    }
}

/// Deduplication identity of a [`TripEvent`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// The service-assigned event id.
    Id(String),
    /// Fallback identity for events delivered without an id.
    Composite { position: String, timestamp: u64 },
}

/// Terminal state of a run as reported by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

/// A named principal a run acts as.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
}

impl Entity {
    /// Creates an entity from its type and name.
    #[must_use]
    pub fn new(entity_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            name: name.into(),
        }
    }
}

/// One execution instance of a flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    /// Name of the route this run executes.
    pub route: String,
    pub route_version: u32,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Final (or latest known) state map of the run.
    #[serde(default)]
    pub state: FxHashMap<String, Value>,
}

impl Trip {
    /// Creates a running trip record.
    #[must_use]
    pub fn new(id: impl Into<String>, route: impl Into<String>, route_version: u32) -> Self {
        Self {
            id: id.into(),
            route: route.into(),
            route_version,
            status: TripStatus::Running,
            entity: None,
            started_at: None,
            completed_at: None,
            state: FxHashMap::default(),
        }
    }
}
