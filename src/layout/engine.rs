//! The ranking, ordering, and positioning passes.

use rustc_hash::FxHashMap;

use crate::graph::FlowGraph;
use crate::types::{ExitLabel, NodeId, Point};

/// Vertical distance between adjacent ranks.
pub const RANK_SEP: f64 = 70.0;
/// Horizontal distance between adjacent nodes within a rank.
pub const NODE_SEP: f64 = 70.0;

/// Fixed number of barycenter passes; enough to settle the small graphs an
/// interactive editor produces while staying deterministic.
const ORDERING_SWEEPS: usize = 4;

/// Ordering weight of an edge by its outcome label.
///
/// Success edges pull hardest so the happy path lays out straight; failure
/// edges yield to everything else.
fn edge_weight(label: &ExitLabel) -> f64 {
    match label {
        ExitLabel::Success => 3.0,
        ExitLabel::Failure => 1.0,
        ExitLabel::Unset | ExitLabel::Custom(_) => 2.0,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// The sole success predecessor a node may be snapped under, if any.
#[derive(Clone, Copy, PartialEq)]
enum Snap {
    None,
    One(usize),
    Contested,
}

/// Assigns each node its layout rank: the longest acyclic path from the
/// source frontier.
///
/// Cycles are permitted: edges closing a cycle (as found by a depth-first
/// pass in insertion order) are excluded from the layering, so a loop back
/// to an earlier step keeps that step's rank instead of looping the pass.
/// A zero-node graph yields an empty map.
#[must_use]
pub fn ranks(graph: &FlowGraph) -> FxHashMap<NodeId, u32> {
    let nodes = graph.nodes();
    let index: FxHashMap<&NodeId, usize> =
        nodes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect();

    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in graph.edges() {
        let (Some(&s), Some(&t)) = (index.get(edge.source()), index.get(edge.target())) else {
            panic!("edge endpoint does not resolve to a graph node");
        };
        succs[s].push(t);
    }

    // Pass 1: classify back edges depth-first, starting from each node in
    // insertion order so the result is deterministic.
    let mut state = vec![Visit::Unvisited; nodes.len()];
    let mut back = rustc_hash::FxHashSet::default();
    for v in 0..nodes.len() {
        if state[v] == Visit::Unvisited {
            find_back_edges(v, &succs, &mut state, &mut back);
        }
    }

    // Pass 2: longest path over the remaining acyclic edges.
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (s, targets) in succs.iter().enumerate() {
        for &t in targets {
            if !back.contains(&(s, t)) {
                preds[t].push(s);
            }
        }
    }
    let mut rank: Vec<Option<u32>> = vec![None; nodes.len()];
    for v in 0..nodes.len() {
        rank_of(v, &preds, &mut rank);
    }

    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id().clone(), rank[i].unwrap_or(0)))
        .collect()
}

fn find_back_edges(
    v: usize,
    succs: &[Vec<usize>],
    state: &mut [Visit],
    back: &mut rustc_hash::FxHashSet<(usize, usize)>,
) {
    state[v] = Visit::InProgress;
    for &w in &succs[v] {
        match state[w] {
            Visit::InProgress => {
                back.insert((v, w));
            }
            Visit::Unvisited => find_back_edges(w, succs, state, back),
            Visit::Done => {}
        }
    }
    state[v] = Visit::Done;
}

fn rank_of(v: usize, preds: &[Vec<usize>], rank: &mut [Option<u32>]) -> u32 {
    if let Some(r) = rank[v] {
        return r;
    }
    // The back-edge pass left `preds` acyclic, so this recursion bottoms
    // out; seed 0 first anyway so corrupted input cannot loop it.
    rank[v] = Some(0);
    let r = preds[v]
        .iter()
        .map(|&u| rank_of(u, preds, rank) + 1)
        .max()
        .unwrap_or(0);
    rank[v] = Some(r);
    r
}

/// Computes coordinates for every node.
///
/// A pure function of the graph's nodes, edges, and labels: calling it
/// twice on an unchanged graph yields identical coordinates. No two nodes
/// within a rank overlap.
#[must_use]
pub fn positions(graph: &FlowGraph) -> FxHashMap<NodeId, Point> {
    let nodes = graph.nodes();
    if nodes.is_empty() {
        return FxHashMap::default();
    }

    let index: FxHashMap<&NodeId, usize> =
        nodes.iter().enumerate().map(|(i, n)| (n.id(), i)).collect();
    let node_ranks = ranks(graph);
    let rank: Vec<u32> = nodes.iter().map(|n| node_ranks[n.id()]).collect();

    // Weighted neighbor lists for the ordering passes, plus the snap
    // candidate for the straightening pass.
    let mut preds: Vec<Vec<(usize, f64)>> = vec![Vec::new(); nodes.len()];
    let mut succs: Vec<Vec<(usize, f64)>> = vec![Vec::new(); nodes.len()];
    let mut snap: Vec<Snap> = vec![Snap::None; nodes.len()];
    for edge in graph.edges() {
        let (s, t) = (index[edge.source()], index[edge.target()]);
        let w = edge_weight(edge.label());
        preds[t].push((s, w));
        succs[s].push((t, w));
        if edge.label().is_success() && rank[s] < rank[t] {
            snap[t] = match snap[t] {
                Snap::None => Snap::One(s),
                Snap::One(prev) if prev == s => Snap::One(prev),
                _ => Snap::Contested,
            };
        }
    }

    // Group nodes by rank, in insertion order.
    let max_rank = rank.iter().copied().max().unwrap_or(0);
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank as usize + 1];
    for (i, &r) in rank.iter().enumerate() {
        layers[r as usize].push(i);
    }

    // Weighted barycenter sweeps, alternating direction.
    let mut order = vec![0usize; nodes.len()];
    for layer in &layers {
        for (pos, &v) in layer.iter().enumerate() {
            order[v] = pos;
        }
    }
    for sweep in 0..ORDERING_SWEEPS {
        let downward = sweep % 2 == 0;
        for li in 0..layers.len() {
            let mut keyed: Vec<(f64, usize, usize)> = layers[li]
                .iter()
                .map(|&v| {
                    let neighbors = if downward { &preds[v] } else { &succs[v] };
                    let total: f64 = neighbors.iter().map(|&(_, w)| w).sum();
                    let bary = if total > 0.0 {
                        neighbors
                            .iter()
                            .map(|&(u, w)| w * order[u] as f64)
                            .sum::<f64>()
                            / total
                    } else {
                        order[v] as f64
                    };
                    (bary, order[v], v)
                })
                .collect();
            keyed.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.1.cmp(&b.1))
            });
            layers[li] = keyed.into_iter().map(|(_, _, v)| v).collect();
            for (pos, &v) in layers[li].iter().enumerate() {
                order[v] = pos;
            }
        }
    }

    // Coordinates: fixed spacing per rank, then snap a node under its sole
    // success predecessor when the rank has room for it.
    let mut xs = vec![0.0f64; nodes.len()];
    for layer in &layers {
        if layer.is_empty() {
            continue;
        }
        let width = (layer.len() - 1) as f64;
        for (i, &v) in layer.iter().enumerate() {
            let default_x = (i as f64 - width / 2.0) * NODE_SEP;
            let desired = match snap[v] {
                Snap::One(u) => xs[u],
                Snap::None | Snap::Contested => default_x,
            };
            let min_x = if i == 0 {
                f64::NEG_INFINITY
            } else {
                xs[layer[i - 1]] + NODE_SEP
            };
            xs[v] = desired.max(min_x);
        }
    }

    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            (
                n.id().clone(),
                Point::new(xs[i], f64::from(rank[i]) * RANK_SEP),
            )
        })
        .collect()
}

/// Computes coordinates and writes them into the graph's nodes.
///
/// The session calls this after every structural change; coordinate-only
/// changes (manual drags) never pass through here.
pub fn assign(graph: &mut FlowGraph) {
    let computed = positions(graph);
    for node in graph.nodes.iter_mut() {
        if let Some(point) = computed.get(node.id()) {
            node.position = *point;
        }
    }
}
