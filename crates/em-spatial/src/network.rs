//! Topology graph representation, builder, and coordinate resolution.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays (`edge_from`, `edge_to`, `edge_length`) are sorted by source
//! node and indexed by `EdgeId`, so a node's outgoing edges are a contiguous
//! memory scan in Dijkstra's inner loop.  Edge length is the Euclidean
//! distance between the endpoints and is the only routing cost.
//!
//! # Coordinate resolution
//!
//! An R-tree (via `rstar`) maps `(x, y)` to a `NodeId`.  Trace points are
//! resolved once per canonical location when routes are built, either
//! exactly or by snapping to the nearest node within a tolerance.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use em_core::{Coord, EdgeId, NodeId};

use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── CoordResolver ─────────────────────────────────────────────────────────────

/// Maps a topology-space coordinate to the graph node standing there.
///
/// Implementations must be `Send + Sync`: route pools may resolve entities
/// on Rayon worker threads.
pub trait CoordResolver: Send + Sync {
    /// `None` means no node matches `coord`.
    fn graph_node_for(&self, coord: Coord) -> Option<NodeId>;
}

// ── TopologyGraph ─────────────────────────────────────────────────────────────

/// Directed topology graph in CSR format plus a spatial index.
///
/// Do not construct directly; use [`TopologyGraphBuilder`].
pub struct TopologyGraph {
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge, for path reconstruction.
    pub edge_from: Vec<NodeId>,

    pub edge_to: Vec<NodeId>,

    /// Euclidean length of each edge.
    pub edge_length: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl TopologyGraph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` indexes a node of this graph.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Position of `node`, or `None` if it is not part of the graph.
    #[inline]
    pub fn node_coord(&self, node: NodeId) -> Option<Coord> {
        self.node_pos.get(node.index()).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node standing exactly at `pos`, if any.
    pub fn node_at(&self, pos: Coord) -> Option<NodeId> {
        self.spatial_idx.locate_at_point(&[pos.x, pos.y]).map(|e| e.id)
    }

    /// The node nearest to `pos` if it lies within `tolerance`.
    pub fn nearest_within(&self, pos: Coord, tolerance: f64) -> Option<NodeId> {
        let p = [pos.x, pos.y];
        self.spatial_idx
            .nearest_neighbor(&p)
            .filter(|e| e.distance_2(&p) <= tolerance * tolerance)
            .map(|e| e.id)
    }

    /// A resolver that snaps trace points within `tolerance` of a node.
    /// A tolerance of `0.0` degrades to exact lookup.
    pub fn resolver(&self, tolerance: f64) -> GraphResolver<'_> {
        GraphResolver { graph: self, tolerance }
    }
}

impl CoordResolver for TopologyGraph {
    fn graph_node_for(&self, coord: Coord) -> Option<NodeId> {
        self.node_at(coord)
    }
}

/// [`CoordResolver`] over a [`TopologyGraph`] with a snapping tolerance.
#[derive(Copy, Clone)]
pub struct GraphResolver<'a> {
    graph:     &'a TopologyGraph,
    tolerance: f64,
}

impl CoordResolver for GraphResolver<'_> {
    fn graph_node_for(&self, coord: Coord) -> Option<NodeId> {
        if self.tolerance > 0.0 {
            self.graph.nearest_within(coord, self.tolerance)
        } else {
            self.graph.node_at(coord)
        }
    }
}

// ── TopologyGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`TopologyGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes are keyed by position: adding a node where one already stands
/// returns the existing `NodeId`.
///
/// # Example
///
/// ```
/// use em_core::Coord;
/// use em_spatial::TopologyGraphBuilder;
///
/// let mut b = TopologyGraphBuilder::new();
/// let a = b.add_node(Coord::new(0.0, 0.0));
/// let c = b.add_node(Coord::new(30.0, 40.0));
/// b.add_road(a, c).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // bidirectional
/// assert_eq!(g.edge_length[0], 50.0);
/// ```
#[derive(Default)]
pub struct TopologyGraphBuilder {
    nodes:     Vec<Coord>,
    by_pos:    HashMap<(u64, u64), NodeId>,
    raw_edges: Vec<(NodeId, NodeId)>,
}

impl TopologyGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at `pos` and return its `NodeId` (sequential from 0), or
    /// the id of the node already at `pos`.
    pub fn add_node(&mut self, pos: Coord) -> NodeId {
        // +0.0 folds -0.0 into 0.0 so both spellings share one key.
        let key = ((pos.x + 0.0).to_bits(), (pos.y + 0.0).to_bits());
        let next = NodeId(self.nodes.len() as u32);
        let id = *self.by_pos.entry(key).or_insert(next);
        if id == next {
            self.nodes.push(pos);
        }
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) -> SpatialResult<()> {
        for n in [from, to] {
            if n.index() >= self.nodes.len() {
                return Err(SpatialError::NodeNotFound(n));
            }
        }
        self.raw_edges.push((from, to));
        Ok(())
    }

    /// Add edges in **both directions** between `a` and `b`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) -> SpatialResult<()> {
        self.add_directed_edge(a, b)?;
        self.add_directed_edge(b, a)
    }

    /// Convenience for polyline map data: add every consecutive pair of
    /// `points` as a two-way road, creating nodes as needed.
    pub fn add_polyline(&mut self, points: &[Coord]) {
        let ids: Vec<NodeId> = points.iter().map(|&p| self.add_node(p)).collect();
        for w in ids.windows(2) {
            if w[0] != w[1] {
                self.raw_edges.push((w[0], w[1]));
                self.raw_edges.push((w[1], w[0]));
            }
        }
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`TopologyGraph`].
    pub fn build(self) -> TopologyGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|&(from, to)| (from.0, to.0));

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.0).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_length: Vec<f64>  = raw
            .iter()
            .map(|&(a, b)| self.nodes[a.index()].distance(self.nodes[b.index()]))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for (from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        TopologyGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            spatial_idx,
        }
    }
}
