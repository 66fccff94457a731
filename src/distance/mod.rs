//! Shortest-path distances between integrated points.
//!
//! - [`DistanceMatrix`] — dense n×n matrix the solvers consume
//! - [`build_matrix`] — one Dijkstra run per point over the frozen network
//! - [`distances_from`] / [`shortest_path`] — single-source queries

mod builder;
mod dijkstra;
mod matrix;

pub use builder::{build_matrix, MatrixError};
pub use dijkstra::{distances_from, shortest_path};
pub use matrix::DistanceMatrix;
