//! Binds points of interest to the road network.
//!
//! Each POI coordinate is projected onto the nearest edge; the edge is
//! split at the projection foot and the POI bound to the inserted node.
//! A POI is collapsed onto its road projection: the bound node sits on the
//! road itself and no stub edge is added. The perpendicular snap distance
//! is kept on the binding as metadata.

use std::collections::HashMap;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::distance::distances_from;
use crate::graph::{
    haversine_m, project_onto_segment, EdgeId, FrozenNetwork, GraphError, NodeId, RoadNetwork,
};
use crate::models::PointOfInterest;

/// Projection fractions closer than this to an endpoint bind to the
/// existing node instead of splitting, avoiding zero-length edges.
const ENDPOINT_EPS: f64 = 1e-6;

/// Edges whose projection distance is within this tolerance of the best
/// are ties; the lowest edge id wins.
const TIE_EPS_DEG: f64 = 1e-9;

/// The result of integrating one point of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiBinding {
    poi_id: u64,
    node: NodeId,
    snap_distance_m: f64,
}

impl PoiBinding {
    /// External id of the bound point.
    pub fn poi_id(&self) -> u64 {
        self.poi_id
    }

    /// The network node this point was bound to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Perpendicular distance from the raw coordinate to the road, in
    /// meters.
    pub fn snap_distance_m(&self) -> f64 {
        self.snap_distance_m
    }
}

/// Errors raised while binding points to the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// The network has no edges to project onto. Fatal for the whole
    /// pipeline: no distances can ever be computed.
    #[error("network has no edges to project onto")]
    NoNearbyEdge,
    /// The nearest edge is farther away than the configured limit.
    #[error("point {poi_id} is {distance_m:.1} m from the network (limit {limit_m:.1} m)")]
    TooFarFromNetwork {
        /// External id of the offending point.
        poi_id: u64,
        /// Measured snap distance in meters.
        distance_m: f64,
        /// Configured maximum in meters.
        limit_m: f64,
    },
    /// The selected edge disappeared before it could be split.
    #[error("edge {0:?} vanished before the split")]
    EdgeVanished(EdgeId),
    /// A bound node has no incident edges.
    #[error("bound node for point {poi_id} is isolated")]
    IsolatedPoint {
        /// External id of the offending point.
        poi_id: u64,
    },
    /// Two bound points lie in different network components.
    #[error("no path between bound points {from} and {to}")]
    UnreachablePoint {
        /// External id of the source point.
        from: u64,
        /// External id of the unreachable point.
        to: u64,
    },
}

/// Integrates points of interest into a mutable network.
///
/// Holds the network exclusively for the duration of the integration
/// phase; freezing the network afterwards guarantees solvers never observe
/// a half-integrated graph.
///
/// Integration is idempotent per external id: re-integrating an id returns
/// the existing binding unchanged.
///
/// # Examples
///
/// ```
/// use road_tsp::graph::{RoadNetwork, Segment};
/// use road_tsp::integration::Integrator;
/// use road_tsp::models::{Coord, PointOfInterest};
///
/// let segments = vec![
///     Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 100.0),
/// ];
/// let mut network = RoadNetwork::from_segments(&segments).unwrap();
///
/// let poi = PointOfInterest::new(1, "stop", Coord::new(0.0, 0.25));
/// let binding = {
///     let mut integrator = Integrator::new(&mut network);
///     integrator.integrate(&poi).unwrap()
/// };
///
/// // The edge was split 25% of the way along.
/// assert_eq!(network.node_count(), 3);
/// assert_eq!(network.edge_count(), 2);
/// assert!(network.is_poi(binding.node()));
/// ```
pub struct Integrator<'a> {
    network: &'a mut RoadNetwork,
    max_snap_distance_m: Option<f64>,
    bindings: HashMap<u64, PoiBinding>,
}

impl<'a> Integrator<'a> {
    /// Creates an integrator over the given network.
    pub fn new(network: &'a mut RoadNetwork) -> Self {
        Self {
            network,
            max_snap_distance_m: None,
            bindings: HashMap::new(),
        }
    }

    /// Rejects points whose snap distance exceeds `meters`.
    pub fn with_max_snap_distance(mut self, meters: f64) -> Self {
        self.max_snap_distance_m = Some(meters);
        self
    }

    /// Binds a single point to the network.
    pub fn integrate(&mut self, poi: &PointOfInterest) -> Result<PoiBinding, IntegrationError> {
        if let Some(existing) = self.bindings.get(&poi.id()) {
            debug!("point {} already integrated; reusing binding", poi.id());
            return Ok(existing.clone());
        }

        let (edge, projection) = self.nearest_edge(poi)?;
        let snap_distance_m = haversine_m(poi.coord(), projection.coord);

        if let Some(limit_m) = self.max_snap_distance_m {
            if snap_distance_m > limit_m {
                return Err(IntegrationError::TooFarFromNetwork {
                    poi_id: poi.id(),
                    distance_m: snap_distance_m,
                    limit_m,
                });
            }
        }

        let node = if projection.fraction <= ENDPOINT_EPS {
            edge.a
        } else if projection.fraction >= 1.0 - ENDPOINT_EPS {
            edge.b
        } else {
            self.network
                .split_edge(edge.id, projection.coord, projection.fraction)
                .map_err(|err| match err {
                    GraphError::EdgeNotFound(id) => IntegrationError::EdgeVanished(id),
                    // split_edge raises no other error kind
                    _ => IntegrationError::EdgeVanished(edge.id),
                })?
        };
        self.network.mark_poi(node);

        let binding = PoiBinding {
            poi_id: poi.id(),
            node,
            snap_distance_m,
        };
        debug!(
            "point {} ({}) bound to node {:?}, snap {:.2} m",
            poi.id(),
            poi.name(),
            node,
            snap_distance_m
        );
        self.bindings.insert(poi.id(), binding.clone());
        Ok(binding)
    }

    /// Binds every point in order, failing on the first error.
    ///
    /// Whether a failed point aborts the whole request or is skipped is the
    /// caller's decision; this method implements the abort choice, while
    /// [`Integrator::integrate`] lets a caller skip per point.
    pub fn integrate_all(
        &mut self,
        pois: &[PointOfInterest],
    ) -> Result<Vec<PoiBinding>, IntegrationError> {
        let bindings = pois
            .iter()
            .map(|poi| self.integrate(poi))
            .collect::<Result<Vec<_>, _>>()?;
        info!("integrated {} points into the network", bindings.len());
        Ok(bindings)
    }

    fn nearest_edge(
        &self,
        poi: &PointOfInterest,
    ) -> Result<(crate::graph::EdgeView, crate::graph::Projection), IntegrationError> {
        let mut best: Option<(crate::graph::EdgeView, crate::graph::Projection)> = None;

        // Edges iterate in ascending id order, so keeping the incumbent on
        // a tie selects the lowest edge id.
        for view in self.network.edges() {
            let projection = project_onto_segment(
                poi.coord(),
                self.network.coord(view.a),
                self.network.coord(view.b),
            );
            let improves = match &best {
                None => true,
                Some((_, incumbent)) => {
                    projection.separation_deg + TIE_EPS_DEG < incumbent.separation_deg
                }
            };
            if improves {
                best = Some((view, projection));
            }
        }

        best.ok_or(IntegrationError::NoNearbyEdge)
    }
}

/// Validates a completed integration: every bound node must carry at least
/// one edge and all bound nodes must be mutually reachable.
pub fn verify_bindings(
    network: &FrozenNetwork,
    bindings: &[PoiBinding],
) -> Result<(), IntegrationError> {
    for binding in bindings {
        if network.neighbors(binding.node()).is_empty() {
            return Err(IntegrationError::IsolatedPoint {
                poi_id: binding.poi_id(),
            });
        }
    }

    // The network is undirected, so reachability from any one binding
    // covers every pair.
    if let Some(first) = bindings.first() {
        let dist = distances_from(network, first.node());
        for other in &bindings[1..] {
            if !dist[other.node().index()].is_finite() {
                return Err(IntegrationError::UnreachablePoint {
                    from: first.poi_id(),
                    to: other.poi_id(),
                });
            }
        }
    }

    Ok(())
}
