//! Builds the all-pairs POI distance matrix.

use log::info;
use thiserror::Error;

use super::dijkstra::distances_from;
use super::matrix::DistanceMatrix;
use crate::graph::FrozenNetwork;
use crate::integration::PoiBinding;

/// Errors raised while deriving the distance matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No bindings were supplied.
    #[error("no integrated points to build a matrix from")]
    NoPoints,
    /// Two integrated points lie in different components of the network.
    ///
    /// Detected before any solver runs; none of the solvers is defined for
    /// infinite distances.
    #[error("no path between points {from} and {to}")]
    DisconnectedPoints {
        /// External id of the source point.
        from: u64,
        /// External id of the unreachable point.
        to: u64,
    },
}

/// Computes the N×N shortest-path distance matrix for the bound points.
///
/// Runs one single-source Dijkstra search per point. Every row is written
/// from its own search; symmetry is a consequence of the network being
/// undirected, not an assumption of the builder.
pub fn build_matrix(
    network: &FrozenNetwork,
    bindings: &[PoiBinding],
) -> Result<DistanceMatrix, MatrixError> {
    if bindings.is_empty() {
        return Err(MatrixError::NoPoints);
    }

    let n = bindings.len();
    let mut matrix = DistanceMatrix::new(n);

    for (i, from) in bindings.iter().enumerate() {
        let dist = distances_from(network, from.node());
        for (j, to) in bindings.iter().enumerate() {
            if i == j {
                matrix.set(i, j, 0.0);
                continue;
            }
            let d = dist[to.node().index()];
            if !d.is_finite() {
                return Err(MatrixError::DisconnectedPoints {
                    from: from.poi_id(),
                    to: to.poi_id(),
                });
            }
            matrix.set(i, j, d);
        }
    }

    info!("distance matrix built for {} points", n);
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::Integrator;
    use crate::graph::{RoadNetwork, Segment};
    use crate::models::{Coord, PointOfInterest};

    fn unit_square() -> RoadNetwork {
        let segments = vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(0.0, 1.0), Coord::new(1.0, 1.0), 1.0),
            Segment::new(Coord::new(1.0, 1.0), Coord::new(1.0, 0.0), 1.0),
            Segment::new(Coord::new(1.0, 0.0), Coord::new(0.0, 0.0), 1.0),
        ];
        RoadNetwork::from_segments(&segments).expect("valid")
    }

    #[test]
    fn test_matrix_over_square_corners() {
        let mut network = unit_square();
        let pois = vec![
            PointOfInterest::new(1, "a", Coord::new(0.0, 0.0)),
            PointOfInterest::new(2, "b", Coord::new(0.0, 1.0)),
            PointOfInterest::new(3, "c", Coord::new(1.0, 1.0)),
        ];
        let bindings = {
            let mut integrator = Integrator::new(&mut network);
            integrator.integrate_all(&pois).expect("integrates")
        };
        let frozen = network.freeze();

        let matrix = build_matrix(&frozen, &bindings).expect("connected");
        assert_eq!(matrix.size(), 3);
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-10);
        assert!((matrix.get(0, 2) - 2.0).abs() < 1e-10);
        assert!((matrix.get(1, 2) - 1.0).abs() < 1e-10);
        assert!(matrix.is_symmetric(1e-10));
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.0);
        }
    }

    #[test]
    fn test_empty_bindings_rejected() {
        let frozen = unit_square().freeze();
        assert_eq!(build_matrix(&frozen, &[]), Err(MatrixError::NoPoints));
    }

    #[test]
    fn test_disconnected_points_fail_fast() {
        let segments = vec![
            Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
            Segment::new(Coord::new(5.0, 5.0), Coord::new(5.0, 6.0), 1.0),
        ];
        let mut network = RoadNetwork::from_segments(&segments).expect("valid");
        let pois = vec![
            PointOfInterest::new(10, "west", Coord::new(0.0, 0.0)),
            PointOfInterest::new(20, "east", Coord::new(5.0, 5.0)),
        ];
        let bindings = {
            let mut integrator = Integrator::new(&mut network);
            integrator.integrate_all(&pois).expect("integrates")
        };
        let frozen = network.freeze();

        assert_eq!(
            build_matrix(&frozen, &bindings),
            Err(MatrixError::DisconnectedPoints { from: 10, to: 20 })
        );
    }
}
