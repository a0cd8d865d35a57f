//! The editing session: explicit dependency injection and optimistic sync.
//!
//! A [`FlowSession`] is constructed once per editing context and owns
//! everything that context needs: the canonical graph, its layout, the
//! service handles, the run correlator, and the notice channel surfacing
//! background failures. Nothing here is ambient: collaborators are passed
//! in, not discovered.
//!
//! # Optimistic persistence
//!
//! Every structural edit re-serializes the graph and dispatches
//! `register_route` as a fire-and-forget background task. The local graph
//! is the source of truth: a persistence failure is surfaced as a
//! [`SyncNotice`] and logged, never rolled back. Multiple calls may be in
//! flight at once; last-write-wins is the service's responsibility.
//!
//! # Layout policy
//!
//! Structural edits (and label changes, which feed the layout weights)
//! trigger a full layout recomputation. Coordinate-only changes (manual
//! drags via [`move_node`](FlowSession::move_node)) never do, so user
//! adjustments survive within the session.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::client::{RouteService, ServiceError, TripService};
use crate::config::SessionConfig;
use crate::graph::{EditError, FlowGraph, ParameterMapping};
use crate::handler::Handler;
use crate::layout;
use crate::trip::{Entity, Trip, TripCorrelator, TripWatcher};
use crate::types::{EdgeId, ExitLabel, NodeId, Point};
use crate::wire::{self, Route, WireWarning};

/// Outcome of one background persistence attempt.
///
/// Non-fatal by construction: the session keeps editing either way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncNotice {
    /// The route was registered with the service.
    Persisted { name: String },
    /// Registration failed; the local graph is unchanged and still ahead
    /// of the service.
    PersistFailed { name: String, error: String },
}

/// One editing/viewing session over one flow.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use routeloom::client::{RouteService, TripService};
/// # use routeloom::config::SessionConfig;
/// # use routeloom::handler::Handler;
/// # use routeloom::session::FlowSession;
/// # fn demo(routes: Arc<dyn RouteService>, trips: Arc<dyn TripService>) {
/// let mut session = FlowSession::create("deploy", "infra", routes, trips, SessionConfig::default());
///
/// let fetch = session.add_node(Handler::new("infra", "fetch"), None);
/// let build = session.add_node(Handler::new("infra", "build"), None);
/// session.connect(&fetch, &build).unwrap();
/// # }
/// ```
pub struct FlowSession {
    graph: FlowGraph,
    config: SessionConfig,
    routes: Arc<dyn RouteService>,
    trips: Arc<dyn TripService>,
    watcher: TripWatcher,
    notice_tx: flume::Sender<SyncNotice>,
    notice_rx: flume::Receiver<SyncNotice>,
}

impl FlowSession {
    /// Creates a session over an existing canonical graph.
    #[must_use]
    pub fn new(
        mut graph: FlowGraph,
        routes: Arc<dyn RouteService>,
        trips: Arc<dyn TripService>,
        config: SessionConfig,
    ) -> Self {
        layout::assign(&mut graph);
        let (notice_tx, notice_rx) = flume::unbounded();
        Self {
            graph,
            config,
            routes,
            trips,
            watcher: TripWatcher::new(),
            notice_tx,
            notice_rx,
        }
    }

    /// Creates a session over a new, empty flow.
    #[must_use]
    pub fn create(
        name: impl Into<String>,
        context: impl Into<String>,
        routes: Arc<dyn RouteService>,
        trips: Arc<dyn TripService>,
        config: SessionConfig,
    ) -> Self {
        Self::new(FlowGraph::new(name, context), routes, trips, config)
    }

    /// Creates a session from a fetched wire route.
    ///
    /// Integrity warnings from decoding are returned alongside the session
    /// so the shell can surface them; the degraded graph is still fully
    /// editable for repair.
    #[must_use]
    pub fn open(
        route: &Route,
        routes: Arc<dyn RouteService>,
        trips: Arc<dyn TripService>,
        config: SessionConfig,
    ) -> (Self, Vec<WireWarning>) {
        let (graph, warnings) = wire::route_to_graph_with(route, config.label_match);
        (Self::new(graph, routes, trips, config), warnings)
    }

    /// The canonical graph this session edits.
    #[must_use]
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// Receiver for background persistence notices.
    ///
    /// The channel is unbounded and clone-cheap; a shell typically drains
    /// it into a toast/log surface.
    #[must_use]
    pub fn notices(&self) -> flume::Receiver<SyncNotice> {
        self.notice_rx.clone()
    }

    /// Shared handle to the run correlator this session's watcher feeds.
    #[must_use]
    pub fn correlator(&self) -> Arc<Mutex<TripCorrelator>> {
        self.watcher.correlator()
    }

    // ------------------------------------------------------------------
    // Edit operations
    // ------------------------------------------------------------------

    /// Adds a node; see [`FlowGraph::add_node`].
    pub fn add_node(&mut self, handler: Handler, position: Option<Point>) -> NodeId {
        let id = self.graph.add_node(handler, position);
        self.after_structural_edit();
        id
    }

    /// Connects two nodes; see [`FlowGraph::add_edge`].
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, EditError> {
        let id = self.graph.add_edge(source, target)?;
        self.after_structural_edit();
        Ok(id)
    }

    /// Renames a node; see [`FlowGraph::rename_node`].
    ///
    /// Names key the wire-level adjacency, so a successful rename
    /// re-serializes the route even though the topology is unchanged.
    pub fn rename_node(&mut self, id: &NodeId, new_name: &str) -> Result<(), EditError> {
        self.graph.rename_node(id, new_name)?;
        self.resync();
        Ok(())
    }

    /// Labels an edge; see [`FlowGraph::set_edge_label`].
    ///
    /// Labels are both persisted route content and layout input, so this
    /// re-syncs and re-lays-out.
    pub fn set_edge_label(&mut self, id: &EdgeId, label: ExitLabel) -> Result<(), EditError> {
        self.graph.set_edge_label(id, label)?;
        self.after_structural_edit();
        Ok(())
    }

    /// Replaces an edge's parameter mappings; see
    /// [`FlowGraph::set_edge_mappings`].
    pub fn set_edge_mappings(
        &mut self,
        id: &EdgeId,
        mappings: Vec<ParameterMapping>,
    ) -> Result<(), EditError> {
        self.graph.set_edge_mappings(id, mappings)?;
        self.resync();
        Ok(())
    }

    /// Moves a node (manual drag). Coordinate-only: no re-layout, no sync.
    pub fn move_node(&mut self, id: &NodeId, position: Point) -> Result<(), EditError> {
        self.graph.move_node(id, position)
    }

    /// Deletes a node and its incident edges; see
    /// [`FlowGraph::delete_node`].
    pub fn delete_node(&mut self, id: &NodeId) -> Result<(), EditError> {
        self.graph.delete_node(id)?;
        self.after_structural_edit();
        Ok(())
    }

    /// Deletes an edge; see [`FlowGraph::delete_edge`].
    pub fn delete_edge(&mut self, id: &EdgeId) -> Result<(), EditError> {
        self.graph.delete_edge(id)?;
        self.after_structural_edit();
        Ok(())
    }

    /// Persists the current graph and waits for the result.
    ///
    /// The synchronous edits never wait on this; it exists for explicit
    /// save points and deterministic tests.
    pub async fn flush(&self) -> Result<(), ServiceError> {
        let route = wire::graph_to_route(&self.graph);
        self.routes.register_route(&route).await
    }

    fn after_structural_edit(&mut self) {
        layout::assign(&mut self.graph);
        self.resync();
    }

    /// Dispatches a fire-and-forget persistence attempt.
    ///
    /// Not awaited: the next local edit is accepted immediately, and
    /// several attempts may be in flight at once.
    fn resync(&self) {
        if !self.config.auto_sync {
            return;
        }
        let route = wire::graph_to_route(&self.graph);
        let routes = Arc::clone(&self.routes);
        let notice_tx = self.notice_tx.clone();
        tokio::spawn(async move {
            let name = route.name.clone();
            match routes.register_route(&route).await {
                Ok(()) => {
                    tracing::debug!(route = %name, "route persisted");
                    let _ = notice_tx.send(SyncNotice::Persisted { name });
                }
                Err(error) => {
                    tracing::warn!(route = %name, %error, "route persistence failed");
                    let _ = notice_tx.send(SyncNotice::PersistFailed {
                        name,
                        error: error.to_string(),
                    });
                }
            }
        });
    }

    // ------------------------------------------------------------------
    // Run selection
    // ------------------------------------------------------------------

    /// Starts a run of the current graph.
    pub async fn start_trip(
        &self,
        initial_state: FxHashMap<String, Value>,
        entity: Option<Entity>,
    ) -> Result<Trip, ServiceError> {
        let route = wire::graph_to_route(&self.graph);
        self.trips.start_trip(&route, initial_state, entity).await
    }

    /// Makes a run the active viewing context.
    ///
    /// Fetches the run record, opens its event stream, and hands the
    /// stream to the watcher, canceling any previous subscription first,
    /// so at most one is open per session.
    pub async fn select_trip(&mut self, trip_id: &str) -> Result<Trip, ServiceError> {
        let trip = self.trips.get_trip(trip_id).await?;
        let stream = self.trips.watch_trip(trip_id).await?;
        self.watcher.watch(trip_id, stream);
        Ok(trip)
    }

    /// Clears the active run: cancels the subscription and empties the
    /// view.
    pub fn clear_trip(&mut self) {
        self.watcher.cancel();
        self.correlator().lock().clear();
    }
}
