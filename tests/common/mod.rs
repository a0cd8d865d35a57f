//! Shared test doubles for the remote service collaborators.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use routeloom::client::{
    EntityDirectory, EventStream, HandlerCatalog, RouteService, ServiceError, TripService,
};
use routeloom::handler::Handler;
use routeloom::trip::{Entity, Trip, TripEvent};
use routeloom::wire::Route;

/// Route store that accepts everything and remembers what it saw.
#[derive(Default)]
pub struct InMemoryRoutes {
    pub registered: Mutex<Vec<Route>>,
}

impl InMemoryRoutes {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The most recently registered route, if any.
    pub fn latest(&self) -> Option<Route> {
        self.registered.lock().last().cloned()
    }
}

#[async_trait]
impl RouteService for InMemoryRoutes {
    async fn register_route(&self, route: &Route) -> Result<(), ServiceError> {
        self.registered.lock().push(route.clone());
        Ok(())
    }

    async fn get_route(&self, name: &str, version: u32) -> Result<Route, ServiceError> {
        self.registered
            .lock()
            .iter()
            .rev()
            .find(|r| r.name == name && r.version == version)
            .cloned()
            .ok_or(ServiceError::RouteNotFound {
                name: name.to_string(),
                version,
            })
    }

    async fn list_routes(&self) -> Result<Vec<Route>, ServiceError> {
        Ok(self.registered.lock().clone())
    }
}

/// Route store that fails every call at the transport level.
pub struct UnreachableRoutes;

#[async_trait]
impl RouteService for UnreachableRoutes {
    async fn register_route(&self, _route: &Route) -> Result<(), ServiceError> {
        Err(ServiceError::transport("connection refused"))
    }

    async fn get_route(&self, _name: &str, _version: u32) -> Result<Route, ServiceError> {
        Err(ServiceError::transport("connection refused"))
    }

    async fn list_routes(&self) -> Result<Vec<Route>, ServiceError> {
        Err(ServiceError::transport("connection refused"))
    }
}

/// Trip service that replays scripted events for every watched run.
#[derive(Default)]
pub struct ScriptedTrips {
    pub trips: Mutex<FxHashMap<String, Trip>>,
    pub events: Mutex<FxHashMap<String, Vec<TripEvent>>>,
    /// When set, streams end with this error instead of completing.
    pub fail_streams_with: Mutex<Option<String>>,
    started: Mutex<u32>,
}

impl ScriptedTrips {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, trip: Trip, events: Vec<TripEvent>) {
        self.events.lock().insert(trip.id.clone(), events);
        self.trips.lock().insert(trip.id.clone(), trip);
    }
}

#[async_trait]
impl TripService for ScriptedTrips {
    async fn start_trip(
        &self,
        route: &Route,
        initial_state: FxHashMap<String, Value>,
        entity: Option<Entity>,
    ) -> Result<Trip, ServiceError> {
        let mut counter = self.started.lock();
        *counter += 1;
        let mut trip = Trip::new(
            format!("trip-{}", *counter),
            route.name.clone(),
            route.version,
        );
        trip.entity = entity;
        trip.state = initial_state;
        self.trips.lock().insert(trip.id.clone(), trip.clone());
        Ok(trip)
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Trip, ServiceError> {
        self.trips
            .lock()
            .get(trip_id)
            .cloned()
            .ok_or(ServiceError::TripNotFound {
                id: trip_id.to_string(),
            })
    }

    async fn watch_trip(&self, trip_id: &str) -> Result<EventStream, ServiceError> {
        let events = self
            .events
            .lock()
            .get(trip_id)
            .cloned()
            .unwrap_or_default();
        let mut items: Vec<Result<TripEvent, ServiceError>> =
            events.into_iter().map(Ok).collect();
        if let Some(message) = self.fail_streams_with.lock().clone() {
            items.push(Err(ServiceError::Stream { message }));
        }
        Ok(futures_util::stream::iter(items).boxed())
    }
}

/// Fixed handler catalog.
pub struct StaticCatalog {
    pub handlers: Vec<Handler>,
}

#[async_trait]
impl HandlerCatalog for StaticCatalog {
    async fn list_handlers(&self) -> Result<Vec<Handler>, ServiceError> {
        Ok(self.handlers.clone())
    }
}

/// Fixed entity directory.
pub struct StaticDirectory {
    pub entities: Vec<Entity>,
}

#[async_trait]
impl EntityDirectory for StaticDirectory {
    async fn list_entities(&self) -> Result<Vec<Entity>, ServiceError> {
        Ok(self.entities.clone())
    }
}
