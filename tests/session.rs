//! Session-level behavior: optimistic sync, layout policy, run selection.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use routeloom::client::{EntityDirectory, HandlerCatalog};
use routeloom::config::SessionConfig;
use routeloom::handler::Handler;
use routeloom::session::{FlowSession, SyncNotice};
use routeloom::trip::{Entity, Trip, TripEvent, WatchPhase};
use routeloom::types::{ExitLabel, Point};
use routeloom::utils::collections::new_state_map;
use routeloom::wire::graph_to_route;

mod common;
use common::{InMemoryRoutes, ScriptedTrips, StaticCatalog, StaticDirectory, UnreachableRoutes};

async fn next_notice(session: &FlowSession) -> SyncNotice {
    tokio::time::timeout(Duration::from_secs(2), session.notices().recv_async())
        .await
        .expect("no sync notice arrived")
        .expect("notice channel closed")
}

#[tokio::test]
async fn edits_persist_in_the_background() {
    let routes = InMemoryRoutes::shared();
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        routes.clone(),
        ScriptedTrips::shared(),
        SessionConfig::default(),
    );

    let fetch = session.add_node(Handler::new("infra", "fetch"), None);
    assert!(matches!(
        next_notice(&session).await,
        SyncNotice::Persisted { .. }
    ));

    let build = session.add_node(Handler::new("infra", "build"), None);
    next_notice(&session).await;
    let edge = session.connect(&fetch, &build).unwrap();
    next_notice(&session).await;
    session.set_edge_label(&edge, ExitLabel::Success).unwrap();
    next_notice(&session).await;

    let latest = routes.latest().unwrap();
    assert_eq!(latest.positions.len(), 2);
    assert_eq!(latest.transitions.len(), 1);
    assert_eq!(latest.transitions[0].from, "fetch");
    assert_eq!(latest.transitions[0].to, "build");
    assert!(latest.transitions[0].label.is_success());
}

#[tokio::test]
async fn persistence_failure_is_surfaced_but_never_rolls_back() {
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        Arc::new(UnreachableRoutes),
        ScriptedTrips::shared(),
        SessionConfig::default(),
    );

    let id = session.add_node(Handler::new("infra", "fetch"), None);
    let notice = next_notice(&session).await;
    assert!(matches!(
        notice,
        SyncNotice::PersistFailed { ref name, .. } if name == "deploy"
    ));

    // The optimistic local model keeps the edit.
    assert!(session.graph().contains_node(&id));

    // And the session keeps editing; failures are not fatal.
    session.rename_node(&id, "fetch sources").unwrap();
    assert!(matches!(
        next_notice(&session).await,
        SyncNotice::PersistFailed { .. }
    ));
    assert_eq!(session.graph().node(&id).unwrap().display_name(), "fetch sources");
}

#[tokio::test]
async fn rename_rederives_wire_adjacency() {
    let routes = InMemoryRoutes::shared();
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        routes.clone(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );

    let fetch = session.add_node(Handler::new("infra", "fetch"), None);
    let build = session.add_node(Handler::new("infra", "build"), None);
    session.connect(&fetch, &build).unwrap();
    session.rename_node(&fetch, "download").unwrap();

    session.flush().await.unwrap();
    let latest = routes.latest().unwrap();
    assert_eq!(latest.transitions[0].from, "download");
    assert_eq!(latest.transitions[0].to, "build");
}

#[tokio::test]
async fn structural_edits_relayout_but_drags_survive() {
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        InMemoryRoutes::shared(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );

    let fetch = session.add_node(Handler::new("infra", "fetch"), None);
    let build = session.add_node(Handler::new("infra", "build"), None);
    session.connect(&fetch, &build).unwrap();

    // A manual drag is coordinate-only: no layout pass runs.
    let parked = Point::new(-500.0, 42.0);
    session.move_node(&fetch, parked).unwrap();
    session.rename_node(&fetch, "download").unwrap();
    assert_eq!(session.graph().node(&fetch).unwrap().position, parked);

    // A structural edit recomputes the whole arrangement.
    let notify = session.add_node(Handler::new("ops", "notify"), None);
    session.connect(&build, &notify).unwrap();
    let position = session.graph().node(&fetch).unwrap().position;
    assert_ne!(position, parked);
}

#[tokio::test]
async fn cascading_delete_flows_through_to_the_wire() {
    let routes = InMemoryRoutes::shared();
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        routes.clone(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );

    let fetch = session.add_node(Handler::new("infra", "fetch"), None);
    let build = session.add_node(Handler::new("infra", "build"), None);
    let notify = session.add_node(Handler::new("ops", "notify"), None);
    session.connect(&fetch, &build).unwrap();
    session.connect(&build, &notify).unwrap();

    session.delete_node(&build).unwrap();
    session.flush().await.unwrap();

    let latest = routes.latest().unwrap();
    assert_eq!(latest.positions.len(), 2);
    assert!(latest.transitions.is_empty());
}

#[tokio::test]
async fn opening_a_degraded_route_stays_editable() {
    let mut graph = routeloom::graph::FlowGraph::new("deploy", "infra");
    let fetch = graph.add_node(Handler::new("infra", "fetch"), None);
    let build = graph.add_node(Handler::new("infra", "build"), None);
    graph.add_edge(&fetch, &build).unwrap();
    let mut route = graph_to_route(&graph);
    route.transitions.push(routeloom::wire::RouteTransition {
        from: "build".into(),
        to: "vanished".into(),
        label: ExitLabel::Unset,
        mappings: Vec::new(),
    });

    let (mut session, warnings) = FlowSession::open(
        &route,
        InMemoryRoutes::shared(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );
    assert_eq!(warnings.len(), 1);

    // The surviving topology is intact and repairable.
    assert_eq!(session.graph().edges().len(), 1);
    let build = session.graph().node_named("build").unwrap().id().clone();
    session.rename_node(&build, "compile").unwrap();
}

#[tokio::test]
async fn runs_start_from_the_catalog_and_correlate_live() {
    let catalog = StaticCatalog {
        handlers: vec![
            Handler::new("infra", "fetch"),
            Handler::new("infra", "build"),
        ],
    };
    let directory = StaticDirectory {
        entities: vec![Entity::new("repository", "acme/widget")],
    };
    let trips = ScriptedTrips::shared();
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        InMemoryRoutes::shared(),
        trips.clone(),
        SessionConfig::default().with_auto_sync(false),
    );

    // Build the flow from catalog handlers, as the shell would.
    let handlers = catalog.list_handlers().await.unwrap();
    let ids: Vec<_> = handlers
        .into_iter()
        .map(|h| session.add_node(h, None))
        .collect();
    session.connect(&ids[0], &ids[1]).unwrap();

    let entity = directory.list_entities().await.unwrap().pop();
    let mut initial = new_state_map();
    initial.insert("region".into(), json!("eu-west-1"));
    let trip = session.start_trip(initial, entity.clone()).await.unwrap();
    assert_eq!(trip.entity, entity);

    trips.script(
        Trip::new("r1", "deploy", 0),
        vec![
            TripEvent::new("1", "r1", "fetch", 10).with_state("phase", json!("fetch")),
            TripEvent::new("2", "r1", "build", 20).with_state("phase", json!("build")),
        ],
    );
    let fetched = session.select_trip("r1").await.unwrap();
    assert_eq!(fetched.id, "r1");

    let correlator = session.correlator();
    tokio::time::timeout(Duration::from_secs(2), async {
        while correlator.lock().phase() != WatchPhase::Closed {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("scripted stream never completed");

    {
        let correlator = correlator.lock();
        assert!(correlator.view().has_fired("fetch"));
        assert!(correlator.view().has_fired("build"));
        assert_eq!(correlator.view().merged_state()["phase"], json!("build"));
    }

    // Navigating away tears the run view down.
    session.clear_trip();
    assert_eq!(correlator.lock().phase(), WatchPhase::Idle);
    assert!(correlator.lock().view().is_empty());
}

#[tokio::test]
async fn registered_routes_are_listable_and_reopenable() {
    use routeloom::client::RouteService;

    let routes = InMemoryRoutes::shared();
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        routes.clone(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );
    let fetch = session.add_node(Handler::new("infra", "fetch"), None);
    let build = session.add_node(Handler::new("infra", "build"), None);
    session.connect(&fetch, &build).unwrap();
    session.flush().await.unwrap();

    let listed = routes.list_routes().await.unwrap();
    assert_eq!(listed.len(), 1);

    let fetched = routes.get_route("deploy", 0).await.unwrap();
    let (reopened, warnings) = FlowSession::open(
        &fetched,
        routes.clone(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );
    assert!(warnings.is_empty());
    assert_eq!(reopened.graph().nodes().len(), 2);
    assert!(
        routes
            .get_route("deploy", 99)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn unknown_trip_selection_is_a_descriptive_failure() {
    let mut session = FlowSession::create(
        "deploy",
        "infra",
        InMemoryRoutes::shared(),
        ScriptedTrips::shared(),
        SessionConfig::default().with_auto_sync(false),
    );
    let error = session.select_trip("ghost").await.unwrap_err();
    assert!(error.to_string().contains("ghost"));
}
