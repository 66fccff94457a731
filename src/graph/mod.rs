//! Road-network graph model.
//!
//! - [`RoadNetwork`] — weighted undirected graph built from segment records,
//!   mutable only through construction and [`RoadNetwork::split_edge`]
//! - [`FrozenNetwork`] — read-only phase of the same graph, safe to share
//! - [`haversine_m`] / [`project_onto_segment`] — geodesic helpers

mod geo;
mod network;

pub use geo::{haversine_m, project_onto_segment, Projection};
pub use network::{
    BoundingBox, EdgeId, EdgeView, FrozenNetwork, GraphError, Link, NetworkInfo, NodeId,
    RoadNetwork, Segment,
};
