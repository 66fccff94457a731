//! # road-tsp
//!
//! Road-network TSP engine: snaps points of interest onto a street
//! network, computes true shortest-path distances between every pair, and
//! solves the resulting Traveling-Salesman instance with exact and
//! heuristic solvers.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Coord, PointOfInterest, Algorithm, Tour)
//! - [`graph`] — Road network graph: bulk construction, edge splitting, freezing
//! - [`integration`] — POI-to-network binding via nearest-edge projection
//! - [`distance`] — Dijkstra shortest paths and the all-pairs distance matrix
//! - [`solvers`] — Brute force, Held–Karp, and nearest-neighbor + 2-opt
//! - [`expansion`] — Mapping solved tours back onto concrete node paths
//!
//! ## Pipeline
//!
//! The phases are ordered by the type system: a [`graph::RoadNetwork`] is
//! mutable during construction and integration, then
//! [`graph::RoadNetwork::freeze`] produces the read-only
//! [`graph::FrozenNetwork`] the matrix builder and solvers consume. The
//! engine holds no process-wide state, so independent requests can run
//! concurrently.
//!
//! ```
//! use road_tsp::distance::build_matrix;
//! use road_tsp::expansion::expand_tour;
//! use road_tsp::graph::{RoadNetwork, Segment};
//! use road_tsp::integration::Integrator;
//! use road_tsp::models::{Algorithm, Coord, PointOfInterest};
//! use road_tsp::solvers::{solve, SolverOptions};
//!
//! // A unit square of roads.
//! let segments = vec![
//!     Segment::new(Coord::new(0.0, 0.0), Coord::new(0.0, 1.0), 1.0),
//!     Segment::new(Coord::new(0.0, 1.0), Coord::new(1.0, 1.0), 1.0),
//!     Segment::new(Coord::new(1.0, 1.0), Coord::new(1.0, 0.0), 1.0),
//!     Segment::new(Coord::new(1.0, 0.0), Coord::new(0.0, 0.0), 1.0),
//! ];
//! let mut network = RoadNetwork::from_segments(&segments).unwrap();
//!
//! // Three stops: two corners and the midpoint of the western street.
//! let pois = vec![
//!     PointOfInterest::new(1, "north-west", Coord::new(0.0, 1.0)),
//!     PointOfInterest::new(2, "south-east", Coord::new(1.0, 0.0)),
//!     PointOfInterest::new(3, "west-mid", Coord::new(0.0, 0.5)),
//! ];
//! let bindings = {
//!     let mut integrator = Integrator::new(&mut network);
//!     integrator.integrate_all(&pois).unwrap()
//! };
//!
//! let network = network.freeze();
//! let matrix = build_matrix(&network, &bindings).unwrap();
//! let tour = solve(&matrix, Algorithm::HeldKarp, &SolverOptions::default()).unwrap();
//! assert!(tour.is_optimal());
//!
//! let expanded = expand_tour(&network, &bindings, &tour).unwrap();
//! assert!((expanded.total_distance() - tour.total_distance()).abs() < 1e-10);
//! ```

pub mod distance;
pub mod expansion;
pub mod graph;
pub mod integration;
pub mod models;
pub mod solvers;
