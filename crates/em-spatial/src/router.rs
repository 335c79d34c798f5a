//! Shortest-path trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The movement scheduler calls path finding via the [`PathFinder`] trait,
//! so applications can swap in A*, contraction hierarchies, or a path cache
//! without touching the scheduler.
//!
//! # Result shape
//!
//! A path is the ordered list of graph nodes from source to destination,
//! both included.  `from == to` yields `[from]`; an unreachable destination
//! yields an empty list, which the scheduler treats as fatal.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use em_core::{EdgeId, NodeId};

use crate::network::TopologyGraph;

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path service.
pub trait PathFinder: Send + Sync {
    /// Nodes of a shortest path from `from` to `to`, or empty if unreachable.
    fn find_path(&self, graph: &TopologyGraph, from: NodeId, to: NodeId) -> Vec<NodeId>;
}

// ── DijkstraPathFinder ────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR graph, using Euclidean edge
/// length as cost.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraPathFinder;

impl PathFinder for DijkstraPathFinder {
    fn find_path(&self, graph: &TopologyGraph, from: NodeId, to: NodeId) -> Vec<NodeId> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap key: path cost with a total order (costs are finite sums of lengths).
#[derive(Copy, Clone, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(graph: &TopologyGraph, from: NodeId, to: NodeId) -> Vec<NodeId> {
    if !graph.contains(from) || !graph.contains(to) {
        return Vec::new();
    }
    if from == to {
        return vec![from];
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap via Reverse; NodeId as secondary key for deterministic ties.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return reconstruct(graph, &prev_edge, from, to);
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_length[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(graph: &TopologyGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        cur = graph.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
