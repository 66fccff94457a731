//! Tour result and algorithm selection types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of tour solvers.
///
/// Selection at the API boundary happens by name; the set is closed because
/// each variant has distinct capacity and timeout semantics.
///
/// # Examples
///
/// ```
/// use road_tsp::models::Algorithm;
///
/// let alg: Algorithm = "held_karp".parse().unwrap();
/// assert_eq!(alg, Algorithm::HeldKarp);
/// assert_eq!(alg.name(), "held_karp");
/// assert!("simulated_annealing".parse::<Algorithm>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Exhaustive permutation search. Optimal, O(n!·n).
    BruteForce,
    /// Held–Karp subset dynamic programming. Optimal, O(n²·2ⁿ).
    HeldKarp,
    /// Nearest-neighbor construction plus 2-opt local search. Heuristic.
    #[serde(rename = "2opt")]
    TwoOpt,
}

impl Algorithm {
    /// Stable external name of this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BruteForce => "brute_force",
            Self::HeldKarp => "held_karp",
            Self::TwoOpt => "2opt",
        }
    }

    /// Returns `true` if this solver guarantees an optimal tour.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::BruteForce | Self::HeldKarp)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an algorithm name is not one of the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm `{0}`; expected one of brute_force, held_karp, 2opt")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute_force" => Ok(Self::BruteForce),
            "held_karp" => Ok(Self::HeldKarp),
            "2opt" => Ok(Self::TwoOpt),
            other => Err(ParseAlgorithmError(other.to_owned())),
        }
    }
}

/// A closed visitation order over point-of-interest indices.
///
/// The order has length N+1: it starts and ends at the same fixed start
/// index and visits every other index exactly once. Tours are immutable
/// once constructed; a new evaluation produces new tours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    order: Vec<usize>,
    total_distance: f64,
    elapsed: Duration,
    optimal: bool,
    algorithm: Algorithm,
}

impl Tour {
    pub(crate) fn new(
        order: Vec<usize>,
        total_distance: f64,
        elapsed: Duration,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            order,
            total_distance,
            elapsed,
            optimal: algorithm.is_exact(),
            algorithm,
        }
    }

    /// Visitation order over POI indices, start index repeated at both ends.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Total tour distance in meters.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Wall-clock time the solver spent.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// `true` only for tours produced by an exact solver.
    pub fn is_optimal(&self) -> bool {
        self.optimal
    }

    /// The solver that produced this tour.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of distinct points visited (excluding the closing repeat).
    pub fn len(&self) -> usize {
        self.order.len().saturating_sub(1)
    }

    /// Returns `true` if the tour visits no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
