//! Weighted undirected road-network graph.
//!
//! A [`RoadNetwork`] is built once from segment records, mutated only by
//! [`RoadNetwork::split_edge`] during point integration, and then frozen
//! into a [`FrozenNetwork`] for querying. The freeze is the phase boundary:
//! a frozen network exposes no mutation, so shortest-path queries and
//! solvers may run against it concurrently.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Coord;

/// Coordinates are deduplicated at 1e-6 degrees (roughly 10 cm), matching
/// the precision of the segment input.
const COORD_QUANTUM: f64 = 1e6;

/// Identifier of a network node. Stable for the lifetime of one graph;
/// never reused after a split inserts new nodes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(u32);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    /// Dense index of this node, usable for per-node arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a network edge. Ids are assigned in insertion order and
/// retired (never reused) when an edge is removed by a split.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Dense index of this edge id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A road-segment input record: two endpoint coordinates and a measured
/// length in meters. Produced externally by parsing a line-feature format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First endpoint.
    pub a: Coord,
    /// Second endpoint.
    pub b: Coord,
    /// Real-world length in meters.
    pub length_m: f64,
}

impl Segment {
    /// Creates a segment record.
    pub fn new(a: Coord, b: Coord, length_m: f64) -> Self {
        Self { a, b, length_m }
    }
}

/// One adjacency entry: a neighbor reachable over a single edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Neighboring node.
    pub to: NodeId,
    /// Edge weight in meters.
    pub weight: f64,
    /// Edge carrying this link.
    pub edge: EdgeId,
}

/// A live edge with its endpoints, for edge scans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView {
    /// Edge identifier.
    pub id: EdgeId,
    /// First endpoint.
    pub a: NodeId,
    /// Second endpoint.
    pub b: NodeId,
    /// Weight in meters.
    pub weight: f64,
    /// Index of the input segment this edge descends from; preserved
    /// through splits so provenance survives integration.
    pub segment: usize,
}

/// Errors raised while building or mutating the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A segment carried a non-finite or negative length.
    #[error("segment {segment_index} has invalid weight {weight}")]
    InvalidEdgeWeight {
        /// Index of the offending segment in the input collection.
        segment_index: usize,
        /// The rejected weight.
        weight: f64,
    },
    /// A segment's endpoints deduplicate to the same node.
    #[error("segment {segment_index} is a self-loop")]
    SelfLoop {
        /// Index of the offending segment in the input collection.
        segment_index: usize,
    },
    /// The input collection contained no segments.
    #[error("network input contains no segments")]
    EmptyNetwork,
    /// The edge id does not exist or was already removed by a split.
    #[error("edge {0:?} not found")]
    EdgeNotFound(EdgeId),
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    coord: Coord,
    is_poi: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct EdgeRecord {
    a: NodeId,
    b: NodeId,
    weight: f64,
    segment_index: usize,
}

/// Mutable road network, alive during the build and integration phases.
///
/// # Examples
///
/// ```
/// use road_tsp::graph::{RoadNetwork, Segment};
/// use road_tsp::models::Coord;
///
/// let segments = vec![
///     Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
///     Segment::new(Coord::new(0.0, 1.0), Coord::new(1.0, 1.0), 1.0),
/// ];
/// let network = RoadNetwork::from_segments(&segments).unwrap();
/// assert_eq!(network.node_count(), 3);
/// assert_eq!(network.edge_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RoadNetwork {
    nodes: Vec<Node>,
    adjacency: Vec<Vec<Link>>,
    edges: Vec<Option<EdgeRecord>>,
    live_edges: usize,
    coord_index: HashMap<(i64, i64), NodeId>,
}

impl RoadNetwork {
    /// Builds a network from segment records.
    ///
    /// Node ids are assigned in first-seen order of distinct coordinates;
    /// deduplication uses the input precision (1e-6 degrees), with no
    /// geometric snapping. Parallel edges between the same node pair are
    /// kept; self-loops and invalid weights are rejected.
    pub fn from_segments(segments: &[Segment]) -> Result<Self, GraphError> {
        if segments.is_empty() {
            return Err(GraphError::EmptyNetwork);
        }

        let mut network = Self {
            nodes: Vec::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
            live_edges: 0,
            coord_index: HashMap::new(),
        };

        for (segment_index, segment) in segments.iter().enumerate() {
            if !segment.length_m.is_finite() || segment.length_m < 0.0 {
                return Err(GraphError::InvalidEdgeWeight {
                    segment_index,
                    weight: segment.length_m,
                });
            }

            let a = network.intern_node(segment.a);
            let b = network.intern_node(segment.b);
            if a == b {
                return Err(GraphError::SelfLoop { segment_index });
            }

            network.add_edge(a, b, segment.length_m, segment_index);
        }

        info!(
            "road network built: {} nodes, {} edges from {} segments",
            network.node_count(),
            network.edge_count(),
            segments.len()
        );
        Ok(network)
    }

    fn intern_node(&mut self, coord: Coord) -> NodeId {
        let key = quantize(coord);
        if let Some(&id) = self.coord_index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            coord,
            is_poi: false,
        });
        self.adjacency.push(Vec::new());
        self.coord_index.insert(key, id);
        id
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64, segment_index: usize) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Some(EdgeRecord {
            a,
            b,
            weight,
            segment_index,
        }));
        self.adjacency[a.index()].push(Link {
            to: b,
            weight,
            edge: id,
        });
        self.adjacency[b.index()].push(Link {
            to: a,
            weight,
            edge: id,
        });
        self.live_edges += 1;
        id
    }

    /// Removes `edge` and inserts a node at `at`, connected to the old
    /// endpoints by edges weighing `fraction * w` and `(1 - fraction) * w`.
    ///
    /// Returns the new node's id. Fails with [`GraphError::EdgeNotFound`]
    /// if the edge no longer exists (for example, it was already split).
    pub fn split_edge(
        &mut self,
        edge: EdgeId,
        at: Coord,
        fraction: f64,
    ) -> Result<NodeId, GraphError> {
        debug_assert!((0.0..=1.0).contains(&fraction));

        let record = self
            .edges
            .get_mut(edge.index())
            .and_then(Option::take)
            .ok_or(GraphError::EdgeNotFound(edge))?;
        self.live_edges -= 1;

        self.adjacency[record.a.index()].retain(|link| link.edge != edge);
        self.adjacency[record.b.index()].retain(|link| link.edge != edge);

        // The new node is inserted directly; coordinate interning only
        // applies to bulk construction.
        let node = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            coord: at,
            is_poi: false,
        });
        self.adjacency.push(Vec::new());

        self.add_edge(record.a, node, fraction * record.weight, record.segment_index);
        self.add_edge(node, record.b, (1.0 - fraction) * record.weight, record.segment_index);

        debug!(
            "split edge {:?} at fraction {:.6}; new node {:?}",
            edge, fraction, node
        );
        Ok(node)
    }

    /// Number of nodes (integrated points included).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Coordinate of a node.
    pub fn coord(&self, node: NodeId) -> Coord {
        self.nodes[node.index()].coord
    }

    /// Returns `true` if the node was materialized for a point of interest.
    pub fn is_poi(&self, node: NodeId) -> bool {
        self.nodes[node.index()].is_poi
    }

    /// Adjacency list of a node.
    pub fn neighbors(&self, node: NodeId) -> &[Link] {
        &self.adjacency[node.index()]
    }

    /// Iterates node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Iterates live edges in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        self.edges.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref().map(|record| EdgeView {
                id: EdgeId(i as u32),
                a: record.a,
                b: record.b,
                weight: record.weight,
                segment: record.segment_index,
            })
        })
    }

    /// Weight of a live edge, if it still exists.
    pub fn edge_weight(&self, edge: EdgeId) -> Option<f64> {
        self.edges
            .get(edge.index())
            .and_then(|slot| slot.as_ref())
            .map(|record| record.weight)
    }

    pub(crate) fn mark_poi(&mut self, node: NodeId) {
        self.nodes[node.index()].is_poi = true;
    }

    /// Ends the mutation phases. The returned network is read-only and
    /// safe to share across solver threads.
    pub fn freeze(self) -> FrozenNetwork {
        info!(
            "network frozen: {} nodes, {} edges",
            self.node_count(),
            self.edge_count()
        );
        FrozenNetwork { inner: self }
    }
}

/// Geographic extent of a network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Minimum latitude.
    pub lat_min: f64,
    /// Maximum latitude.
    pub lat_max: f64,
    /// Minimum longitude.
    pub lon_min: f64,
    /// Maximum longitude.
    pub lon_max: f64,
}

/// Summary of a frozen network, for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfo {
    /// Total node count.
    pub node_count: usize,
    /// Live edge count.
    pub edge_count: usize,
    /// Extent of all node coordinates, if any nodes exist.
    pub bbox: Option<BoundingBox>,
    /// Nodes that back integrated points of interest.
    pub poi_nodes: Vec<NodeId>,
}

/// A road network frozen for querying.
///
/// Produced by [`RoadNetwork::freeze`]; exposes only read access, so the
/// distance matrix builder and the solvers can share it freely.
#[derive(Debug, Clone)]
pub struct FrozenNetwork {
    inner: RoadNetwork,
}

impl FrozenNetwork {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Coordinate of a node.
    pub fn coord(&self, node: NodeId) -> Coord {
        self.inner.coord(node)
    }

    /// Returns `true` if the node backs an integrated point of interest.
    pub fn is_poi(&self, node: NodeId) -> bool {
        self.inner.is_poi(node)
    }

    /// Adjacency list of a node.
    pub fn neighbors(&self, node: NodeId) -> &[Link] {
        self.inner.neighbors(node)
    }

    /// Iterates node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.inner.node_ids()
    }

    /// Shortest path between two nodes as (node sequence, distance in
    /// meters), or `None` if the nodes are disconnected.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<(Vec<NodeId>, f64)> {
        crate::distance::shortest_path(self, from, to)
    }

    /// Summary of this network.
    pub fn info(&self) -> NetworkInfo {
        let mut bbox: Option<BoundingBox> = None;
        let mut poi_nodes = Vec::new();

        for (index, node) in self.inner.nodes.iter().enumerate() {
            let c = node.coord;
            bbox = Some(match bbox {
                None => BoundingBox {
                    lat_min: c.lat,
                    lat_max: c.lat,
                    lon_min: c.lon,
                    lon_max: c.lon,
                },
                Some(current) => BoundingBox {
                    lat_min: current.lat_min.min(c.lat),
                    lat_max: current.lat_max.max(c.lat),
                    lon_min: current.lon_min.min(c.lon),
                    lon_max: current.lon_max.max(c.lon),
                },
            });
            if node.is_poi {
                poi_nodes.push(NodeId(index as u32));
            }
        }

        NetworkInfo {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            bbox,
            poi_nodes,
        }
    }
}

fn quantize(coord: Coord) -> (i64, i64) {
    (
        (coord.lat * COORD_QUANTUM).round() as i64,
        (coord.lon * COORD_QUANTUM).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_segments() -> Vec<Segment> {
        vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(0.0, 1.0), Coord::new(1.0, 1.0), 1.0),
            Segment::new(Coord::new(1.0, 1.0), Coord::new(1.0, 0.0), 1.0),
            Segment::new(Coord::new(1.0, 0.0), Coord::new(0.0, 0.0), 1.0),
        ]
    }

    /// Every live edge id must appear in exactly two adjacency lists.
    fn assert_adjacency_invariant(network: &RoadNetwork) {
        for view in network.edges() {
            let mut appearances = 0;
            for node_index in 0..network.node_count() {
                let node = NodeId(node_index as u32);
                appearances += network
                    .neighbors(node)
                    .iter()
                    .filter(|link| link.edge == view.id)
                    .count();
            }
            assert_eq!(appearances, 2, "edge {:?} adjacency count", view.id);
        }
    }

    #[test]
    fn test_build_square() {
        let network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        assert_eq!(network.node_count(), 4);
        assert_eq!(network.edge_count(), 4);
        assert_adjacency_invariant(&network);
    }

    #[test]
    fn test_node_ids_first_seen_order() {
        let network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        assert_eq!(network.coord(NodeId(0)), Coord::new(0.0, 0.0));
        assert_eq!(network.coord(NodeId(1)), Coord::new(0.0, 1.0));
        assert_eq!(network.coord(NodeId(2)), Coord::new(1.0, 1.0));
        assert_eq!(network.coord(NodeId(3)), Coord::new(1.0, 0.0));
    }

    #[test]
    fn test_coordinate_dedup_at_input_precision() {
        // Differs by less than the 1e-6 quantum: same node.
        let segments = vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(0.0, 1.0 + 4e-8), Coord::new(1.0, 1.0), 1.0),
        ];
        let network = RoadNetwork::from_segments(&segments).expect("valid");
        assert_eq!(network.node_count(), 3);
    }

    #[test]
    fn test_parallel_edges_kept() {
        let segments = vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.5),
        ];
        let network = RoadNetwork::from_segments(&segments).expect("valid");
        assert_eq!(network.node_count(), 2);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(
            RoadNetwork::from_segments(&[]),
            Err(GraphError::EmptyNetwork)
        );
    }

    #[test]
    fn test_rejects_self_loop() {
        let segments = vec![Segment::new(
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 2e-8),
            0.0,
        )];
        assert_eq!(
            RoadNetwork::from_segments(&segments),
            Err(GraphError::SelfLoop { segment_index: 0 })
        );
    }

    #[test]
    fn test_rejects_invalid_weight() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let segments = vec![Segment::new(
                Coord::new(0.0, 0.0),
                Coord::new(0.0, 1.0),
                bad,
            )];
            let err = RoadNetwork::from_segments(&segments).expect_err("rejected");
            assert!(matches!(err, GraphError::InvalidEdgeWeight { segment_index: 0, .. }));
        }
    }

    #[test]
    fn test_split_preserves_total_length() {
        let mut network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        let edge = network.edges().next().expect("has edges").id;
        let original = network.edge_weight(edge).expect("live");

        let node = network
            .split_edge(edge, Coord::new(0.0, 0.3), 0.3)
            .expect("split ok");

        let halves: Vec<f64> = network
            .neighbors(node)
            .iter()
            .map(|link| link.weight)
            .collect();
        assert_eq!(halves.len(), 2);
        assert!((halves[0] + halves[1] - original).abs() < 1e-12);
        assert_adjacency_invariant(&network);
    }

    #[test]
    fn test_split_updates_counts_and_ids() {
        let mut network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        let edge = network.edges().next().expect("has edges").id;

        let node = network
            .split_edge(edge, Coord::new(0.0, 0.5), 0.5)
            .expect("split ok");

        assert_eq!(node, NodeId(4));
        assert_eq!(network.node_count(), 5);
        // One edge removed, two added.
        assert_eq!(network.edge_count(), 5);
        assert_eq!(network.edge_weight(edge), None);

        // Both halves keep the original segment's provenance.
        let halves: Vec<usize> = network
            .edges()
            .filter(|view| view.a == node || view.b == node)
            .map(|view| view.segment)
            .collect();
        assert_eq!(halves, vec![0, 0]);
    }

    #[test]
    fn test_split_missing_edge_fails() {
        let mut network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        let edge = network.edges().next().expect("has edges").id;
        network
            .split_edge(edge, Coord::new(0.0, 0.5), 0.5)
            .expect("first split ok");

        let err = network
            .split_edge(edge, Coord::new(0.0, 0.25), 0.25)
            .expect_err("edge is gone");
        assert_eq!(err, GraphError::EdgeNotFound(edge));
    }

    #[test]
    fn test_frozen_info() {
        let mut network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        let edge = network.edges().next().expect("has edges").id;
        let node = network
            .split_edge(edge, Coord::new(0.0, 0.5), 0.5)
            .expect("split ok");
        network.mark_poi(node);

        let frozen = network.freeze();
        let info = frozen.info();
        assert_eq!(info.node_count, 5);
        assert_eq!(info.edge_count, 5);
        assert_eq!(info.poi_nodes, vec![node]);
        let bbox = info.bbox.expect("has nodes");
        assert_eq!(bbox.lat_min, 0.0);
        assert_eq!(bbox.lat_max, 1.0);
        assert_eq!(bbox.lon_min, 0.0);
        assert_eq!(bbox.lon_max, 1.0);
    }

    #[test]
    fn test_edges_iterate_in_id_order() {
        let network = RoadNetwork::from_segments(&square_segments()).expect("valid");
        let ids: Vec<usize> = network.edges().map(|view| view.id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
