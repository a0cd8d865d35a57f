//! Layout engine properties: determinism, ranking, cycles, spacing.

use routeloom::graph::FlowGraph;
use routeloom::handler::Handler;
use routeloom::layout::{self, NODE_SEP};
use routeloom::types::{ExitLabel, NodeId};

fn chain(names: &[&str]) -> (FlowGraph, Vec<NodeId>) {
    let mut graph = FlowGraph::new("layout", "test");
    let ids: Vec<_> = names
        .iter()
        .map(|n| graph.add_node(Handler::new("test", *n), None))
        .collect();
    for pair in ids.windows(2) {
        let edge = graph.add_edge(&pair[0], &pair[1]).unwrap();
        graph.set_edge_label(&edge, ExitLabel::Success).unwrap();
    }
    (graph, ids)
}

#[test]
fn empty_graph_yields_empty_coordinates() {
    let graph = FlowGraph::new("empty", "test");
    assert!(layout::positions(&graph).is_empty());
    assert!(layout::ranks(&graph).is_empty());
}

#[test]
fn layout_is_deterministic() {
    let (graph, _) = chain(&["a", "b", "c", "d"]);
    assert_eq!(layout::positions(&graph), layout::positions(&graph));
}

#[test]
fn extending_the_happy_path_adds_a_rank() {
    // A -SUCCESS-> B, then C appended behind B with a FAILURE edge:
    // three strictly increasing ranks.
    let (mut graph, ids) = chain(&["a", "b"]);
    let c = graph.add_node(Handler::new("test", "c"), None);
    let edge = graph.add_edge(&ids[1], &c).unwrap();
    graph.set_edge_label(&edge, ExitLabel::Failure).unwrap();

    let ranks = layout::ranks(&graph);
    assert_eq!(ranks[&ids[0]], 0);
    assert_eq!(ranks[&ids[1]], 1);
    assert_eq!(ranks[&c], 2);

    let positions = layout::positions(&graph);
    assert!(positions[&ids[0]].y < positions[&ids[1]].y);
    assert!(positions[&ids[1]].y < positions[&c].y);
}

#[test]
fn ranks_follow_the_longest_path() {
    // a -> b -> d and a -> d: d sits below b, not beside it.
    let mut graph = FlowGraph::new("layout", "test");
    let a = graph.add_node(Handler::new("test", "a"), None);
    let b = graph.add_node(Handler::new("test", "b"), None);
    let d = graph.add_node(Handler::new("test", "d"), None);
    graph.add_edge(&a, &b).unwrap();
    graph.add_edge(&b, &d).unwrap();
    graph.add_edge(&a, &d).unwrap();

    let ranks = layout::ranks(&graph);
    assert_eq!(ranks[&a], 0);
    assert_eq!(ranks[&b], 1);
    assert_eq!(ranks[&d], 2);
}

#[test]
fn cycles_terminate_and_still_rank_every_node() {
    let (mut graph, ids) = chain(&["a", "b", "c"]);
    // Close the loop.
    graph.add_edge(&ids[2], &ids[0]).unwrap();

    let ranks = layout::ranks(&graph);
    assert_eq!(ranks.len(), 3);
    assert_eq!(ranks[&ids[0]], 0);
    assert_eq!(ranks[&ids[2]], 2);

    let positions = layout::positions(&graph);
    assert_eq!(positions.len(), 3);
}

#[test]
fn nodes_within_a_rank_never_overlap() {
    let mut graph = FlowGraph::new("layout", "test");
    let root = graph.add_node(Handler::new("test", "root"), None);
    let children: Vec<_> = (0..5)
        .map(|i| {
            let child = graph.add_node(Handler::new("test", format!("child{i}")), None);
            graph.add_edge(&root, &child).unwrap();
            child
        })
        .collect();

    let positions = layout::positions(&graph);
    for (i, a) in children.iter().enumerate() {
        for b in &children[i + 1..] {
            assert_eq!(positions[a].y, positions[b].y);
            assert!(
                (positions[a].x - positions[b].x).abs() >= NODE_SEP,
                "children {i} crowd each other"
            );
        }
    }
}

#[test]
fn happy_path_stays_vertically_aligned() {
    // a's success chain continues through b to d while a failure branch
    // hangs off to the side: the chain shares one x column.
    let (mut graph, ids) = chain(&["a", "b", "d"]);
    let oops = graph.add_node(Handler::new("test", "oops"), None);
    let edge = graph.add_edge(&ids[0], &oops).unwrap();
    graph.set_edge_label(&edge, ExitLabel::Failure).unwrap();

    let positions = layout::positions(&graph);
    assert_eq!(positions[&ids[0]].x, positions[&ids[1]].x);
    assert_eq!(positions[&ids[1]].x, positions[&ids[2]].x);
    assert_ne!(positions[&oops].x, positions[&ids[1]].x);
}

#[test]
fn recomputation_matches_between_equal_graphs() {
    // Two graphs built the same way (distinct ids) produce the same
    // arrangement, keyed by their own ids.
    let (first, first_ids) = chain(&["a", "b", "c"]);
    let (second, second_ids) = chain(&["a", "b", "c"]);

    let p1 = layout::positions(&first);
    let p2 = layout::positions(&second);
    for (x, y) in first_ids.iter().zip(&second_ids) {
        assert_eq!(p1[x], p2[y]);
    }
}
