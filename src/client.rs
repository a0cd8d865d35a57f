//! Collaborator contracts for the remote workflow service.
//!
//! The editor core consumes four external capabilities, specified only at
//! their interface: route persistence, trip execution, the handler
//! catalog, and an optional entity directory. Implementations live with
//! the transport (gRPC, HTTP, in-memory test doubles); this crate treats
//! them as opaque request/response and server-streaming services.
//!
//! All traits are object-safe and taken as `Arc<dyn Trait>` handles by
//! [`FlowSession`](crate::session::FlowSession), keeping the dependency
//! injection explicit; there is no ambient client singleton.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use crate::handler::Handler;
use crate::trip::{Entity, Trip, TripEvent};
use crate::wire::Route;

/// Server-streamed run events, as delivered by
/// [`TripService::watch_trip`].
pub type EventStream = BoxStream<'static, Result<TripEvent, ServiceError>>;

/// Failures reported by the remote service collaborators.
///
/// Service errors are never fatal to an editing session: the session
/// surfaces them and leaves local state untouched.
#[derive(Debug, Error, Diagnostic)]
pub enum ServiceError {
    /// The requested route does not exist at that version.
    #[error("route not found: {name} (version {version})")]
    #[diagnostic(code(routeloom::client::route_not_found))]
    RouteNotFound { name: String, version: u32 },

    /// The requested run does not exist.
    #[error("trip not found: {id}")]
    #[diagnostic(code(routeloom::client::trip_not_found))]
    TripNotFound { id: String },

    /// The call could not reach the service or was rejected by it.
    #[error("transport failure: {message}")]
    #[diagnostic(
        code(routeloom::client::transport),
        help("The service may be unreachable; local edits are preserved.")
    )]
    Transport { message: String },

    /// An open server stream ended abnormally.
    #[error("stream interrupted: {message}")]
    #[diagnostic(code(routeloom::client::stream))]
    Stream { message: String },
}

impl ServiceError {
    /// Convenience constructor for transport-level failures.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Route persistence: the durable home of flow definitions.
#[async_trait]
pub trait RouteService: Send + Sync {
    /// Registers (creates or overwrites) a route definition.
    async fn register_route(&self, route: &Route) -> Result<(), ServiceError>;

    /// Fetches one route at an exact version.
    async fn get_route(&self, name: &str, version: u32) -> Result<Route, ServiceError>;

    /// Lists every known route.
    async fn list_routes(&self) -> Result<Vec<Route>, ServiceError>;
}

/// Trip execution: starting runs and observing their progress.
#[async_trait]
pub trait TripService: Send + Sync {
    /// Starts a run of the given route with initial state, acting as the
    /// optional entity.
    async fn start_trip(
        &self,
        route: &Route,
        initial_state: FxHashMap<String, Value>,
        entity: Option<Entity>,
    ) -> Result<Trip, ServiceError>;

    /// Fetches one run record.
    async fn get_trip(&self, trip_id: &str) -> Result<Trip, ServiceError>;

    /// Opens a server stream of the run's execution events.
    async fn watch_trip(&self, trip_id: &str) -> Result<EventStream, ServiceError>;
}

/// The catalog of remote capabilities a step can be bound to.
#[async_trait]
pub trait HandlerCatalog: Send + Sync {
    /// Lists every invocable handler with its declared fields.
    async fn list_handlers(&self) -> Result<Vec<Handler>, ServiceError>;
}

/// Optional lookup populating the entity-selection affordance.
///
/// Not required for core correctness; a session works without one.
#[async_trait]
pub trait EntityDirectory: Send + Sync {
    /// Lists named candidates a run may act as.
    async fn list_entities(&self) -> Result<Vec<Entity>, ServiceError>;
}
