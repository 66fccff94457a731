//! Expands an abstract tour into the concrete node path it follows.

use serde::Serialize;
use thiserror::Error;

use crate::distance::shortest_path;
use crate::graph::{FrozenNetwork, NodeId};
use crate::integration::PoiBinding;
use crate::models::{Coord, Tour};

/// Errors raised while expanding a tour onto the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpandError {
    /// The tour was solved over a different number of points.
    #[error("tour covers {found} points but {expected} are bound")]
    BindingCountMismatch {
        /// Number of bound points.
        expected: usize,
        /// Number of points the tour covers.
        found: usize,
    },
    /// The tour is not a closed cycle over the bound points.
    #[error("tour is not a closed cycle over the bound points")]
    MalformedTour,
    /// Two consecutive tour points are disconnected on the network.
    #[error("no path between points {from} and {to}")]
    NoPath {
        /// External id of the leg's source point.
        from: u64,
        /// External id of the leg's target point.
        to: u64,
    },
}

/// One tour leg between consecutive points of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TourLeg {
    /// POI index the leg departs from.
    pub from: usize,
    /// POI index the leg arrives at.
    pub to: usize,
    /// Leg distance in meters.
    pub distance_m: f64,
}

/// A tour mapped onto the concrete sequence of network nodes.
///
/// Consumed by rendering and geographic export; the solvers never need it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedTour {
    nodes: Vec<NodeId>,
    coords: Vec<Coord>,
    legs: Vec<TourLeg>,
    total_distance: f64,
}

impl ExpandedTour {
    /// Node ids along the full tour, shared leg endpoints deduplicated.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Coordinates of [`ExpandedTour::nodes`], in the same order.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Per-leg breakdown in visitation order.
    pub fn legs(&self) -> &[TourLeg] {
        &self.legs
    }

    /// Cumulative distance over all legs, in meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }
}

/// Maps a tour's visitation order back onto the road network.
///
/// Re-runs a shortest-path search per consecutive POI pair and
/// concatenates the resulting node sequences, de-duplicating the shared
/// endpoint between legs.
pub fn expand_tour(
    network: &FrozenNetwork,
    bindings: &[PoiBinding],
    tour: &Tour,
) -> Result<ExpandedTour, ExpandError> {
    let n = bindings.len();
    let order = tour.order();

    if order.len() != n + 1 {
        return Err(ExpandError::BindingCountMismatch {
            expected: n,
            found: order.len().saturating_sub(1),
        });
    }
    if n < 2 || order[0] != order[n] || order.iter().any(|&idx| idx >= n) {
        return Err(ExpandError::MalformedTour);
    }

    let mut nodes: Vec<NodeId> = Vec::new();
    let mut legs = Vec::with_capacity(n);
    let mut total_distance = 0.0;

    for pair in order.windows(2) {
        let from = &bindings[pair[0]];
        let to = &bindings[pair[1]];

        let (path, distance) =
            shortest_path(network, from.node(), to.node()).ok_or(ExpandError::NoPath {
                from: from.poi_id(),
                to: to.poi_id(),
            })?;

        let skip = usize::from(!nodes.is_empty());
        nodes.extend(path.into_iter().skip(skip));

        legs.push(TourLeg {
            from: pair[0],
            to: pair[1],
            distance_m: distance,
        });
        total_distance += distance;
    }

    let coords = nodes.iter().map(|&node| network.coord(node)).collect();

    Ok(ExpandedTour {
        nodes,
        coords,
        legs,
        total_distance,
    })
}
