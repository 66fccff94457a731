//! Single-source shortest paths over a frozen network.
//!
//! Dijkstra's algorithm with a binary heap keyed by tentative distance.
//! Edge weights are validated non-negative at graph construction, which is
//! the precondition for the greedy frontier rule.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{FrozenNetwork, NodeId};

/// Heap entry ordered so the smallest tentative distance pops first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f64,
    node: NodeId,
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; distances are finite by construction.
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Distances from `source` to every node, `f64::INFINITY` where unreachable.
pub fn distances_from(network: &FrozenNetwork, source: NodeId) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; network.node_count()];
    let mut heap = BinaryHeap::new();

    dist[source.index()] = 0.0;
    heap.push(Frontier {
        dist: 0.0,
        node: source,
    });

    while let Some(Frontier { dist: d, node }) = heap.pop() {
        if d > dist[node.index()] {
            continue; // stale entry
        }
        for link in network.neighbors(node) {
            let next = d + link.weight;
            if next < dist[link.to.index()] {
                dist[link.to.index()] = next;
                heap.push(Frontier {
                    dist: next,
                    node: link.to,
                });
            }
        }
    }

    dist
}

/// Shortest path from `source` to `target` as (node sequence, total
/// distance), or `None` if the two nodes are disconnected.
///
/// # Examples
///
/// ```
/// use road_tsp::distance::shortest_path;
/// use road_tsp::graph::{RoadNetwork, Segment};
/// use road_tsp::models::Coord;
///
/// let segments = vec![
///     Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 10.0),
///     Segment::new(Coord::new(0.0, 1.0), Coord::new(1.0, 1.0), 20.0),
/// ];
/// let network = RoadNetwork::from_segments(&segments).unwrap().freeze();
/// let ids: Vec<_> = network.node_ids().collect();
///
/// let (path, dist) = shortest_path(&network, ids[0], ids[2]).unwrap();
/// assert_eq!(path, ids);
/// assert_eq!(dist, 30.0);
/// ```
pub fn shortest_path(
    network: &FrozenNetwork,
    source: NodeId,
    target: NodeId,
) -> Option<(Vec<NodeId>, f64)> {
    let mut dist = vec![f64::INFINITY; network.node_count()];
    let mut prev: Vec<Option<NodeId>> = vec![None; network.node_count()];
    let mut heap = BinaryHeap::new();

    dist[source.index()] = 0.0;
    heap.push(Frontier {
        dist: 0.0,
        node: source,
    });

    while let Some(Frontier { dist: d, node }) = heap.pop() {
        if node == target {
            break;
        }
        if d > dist[node.index()] {
            continue;
        }
        for link in network.neighbors(node) {
            let next = d + link.weight;
            if next < dist[link.to.index()] {
                dist[link.to.index()] = next;
                prev[link.to.index()] = Some(node);
                heap.push(Frontier {
                    dist: next,
                    node: link.to,
                });
            }
        }
    }

    let total = dist[target.index()];
    if !total.is_finite() {
        return None;
    }

    let mut path = vec![target];
    let mut current = target;
    while current != source {
        current = prev[current.index()]?;
        path.push(current);
    }
    path.reverse();

    Some((path, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RoadNetwork, Segment};
    use crate::models::Coord;

    /// Unit-weight ring 0-1-2-3-0 plus a weight-10 chord between 0 and 2.
    fn diamond() -> FrozenNetwork {
        let segments = vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(0.0, 1.0), Coord::new(1.0, 1.0), 1.0),
            Segment::new(Coord::new(1.0, 1.0), Coord::new(1.0, 0.0), 1.0),
            Segment::new(Coord::new(1.0, 0.0), Coord::new(0.0, 0.0), 1.0),
            Segment::new(Coord::new(0.0, 0.0), Coord::new(1.0, 1.0), 10.0),
        ];
        RoadNetwork::from_segments(&segments).expect("valid").freeze()
    }

    fn node(n: u32) -> NodeId {
        NodeId::new(n)
    }

    #[test]
    fn test_distances_from_corner() {
        let network = diamond();
        let dist = distances_from(&network, node(0));
        assert_eq!(dist[0], 0.0);
        assert_eq!(dist[1], 1.0);
        // Around the ring, not over the weight-10 chord.
        assert_eq!(dist[2], 2.0);
        assert_eq!(dist[3], 1.0);
    }

    #[test]
    fn test_shortest_path_prefers_ring() {
        let network = diamond();
        let (path, dist) = shortest_path(&network, node(0), node(2)).expect("connected");
        assert_eq!(dist, 2.0);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], node(0));
        assert_eq!(path[2], node(2));
    }

    #[test]
    fn test_shortest_path_to_self() {
        let network = diamond();
        let (path, dist) = shortest_path(&network, node(1), node(1)).expect("trivial");
        assert_eq!(path, vec![node(1)]);
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_disconnected_components() {
        let segments = vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(5.0, 5.0), Coord::new(5.0, 6.0), 1.0),
        ];
        let network = RoadNetwork::from_segments(&segments).expect("valid").freeze();

        let dist = distances_from(&network, node(0));
        assert!(dist[2].is_infinite());
        assert!(shortest_path(&network, node(0), node(2)).is_none());
    }

    #[test]
    fn test_path_distance_matches_edge_weights() {
        let network = diamond();
        let (path, dist) = shortest_path(&network, node(1), node(3)).expect("connected");
        // 1 -> 0 -> 3 or 1 -> 2 -> 3, both length 2.
        assert_eq!(dist, 2.0);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_frozen_network_delegates() {
        let network = diamond();
        let (path, dist) = network.shortest_path(node(0), node(2)).expect("connected");
        assert_eq!(dist, 2.0);
        assert_eq!(path.len(), 3);
    }
}
