//! Tour solvers over a distance matrix.
//!
//! - [`brute_force`] — exhaustive permutation search, optimal, O(n!·n)
//! - [`held_karp`] — subset dynamic programming, optimal, O(n²·2ⁿ)
//! - [`nearest_neighbor_two_opt`] — greedy construction + 2-opt local
//!   search, fast but not guaranteed optimal
//!
//! All solvers read only the shared [`DistanceMatrix`] and write only
//! their own result, so they are safe to run sequentially or on parallel
//! worker threads against the same matrix.

mod brute_force;
mod held_karp;
mod nearest_2opt;

pub use brute_force::brute_force;
pub use held_karp::held_karp;
pub use nearest_2opt::nearest_neighbor_two_opt;

use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

use crate::distance::DistanceMatrix;
use crate::models::{Algorithm, Tour};

/// Errors raised by the tour solvers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// A tour needs at least two points.
    #[error("need at least 2 points, found {found}")]
    TooFewPoints {
        /// Number of points in the matrix.
        found: usize,
    },
    /// The fixed start index does not exist in the matrix.
    #[error("start index {start} out of range for {size} points")]
    StartOutOfRange {
        /// Requested start index.
        start: usize,
        /// Number of points in the matrix.
        size: usize,
    },
    /// The instance exceeds the solver's configured ceiling.
    ///
    /// Expected and recoverable: the caller picks a cheaper algorithm.
    #[error("{algorithm} refuses {size} points (ceiling {limit})")]
    ProblemTooLarge {
        /// The refusing solver.
        algorithm: Algorithm,
        /// Number of points in the matrix.
        size: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// The time budget ran out before an exact solver finished.
    ///
    /// Exact solvers cannot return partial tours; the heuristic solver
    /// never raises this — it keeps its best tour so far instead.
    #[error("{algorithm} exceeded the time budget of {budget:?}")]
    TimeLimitExceeded {
        /// The aborted solver.
        algorithm: Algorithm,
        /// The exhausted budget.
        budget: Duration,
    },
}

/// Solver invocation parameters.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use road_tsp::solvers::SolverOptions;
///
/// let options = SolverOptions::default()
///     .with_start(2)
///     .with_time_budget(Duration::from_secs(30));
/// assert_eq!(options.start(), 2);
/// assert_eq!(options.brute_force_limit(), 10);
/// assert_eq!(options.held_karp_limit(), 18);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    start: usize,
    time_budget: Option<Duration>,
    brute_force_limit: usize,
    held_karp_limit: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            start: 0,
            time_budget: None,
            brute_force_limit: 10,
            held_karp_limit: 18,
        }
    }
}

impl SolverOptions {
    /// Fixed start index for every tour (default 0).
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Wall-clock budget per solver invocation (default unlimited).
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Largest instance brute force accepts (default 10).
    pub fn with_brute_force_limit(mut self, limit: usize) -> Self {
        self.brute_force_limit = limit;
        self
    }

    /// Largest instance Held–Karp accepts (default 18).
    pub fn with_held_karp_limit(mut self, limit: usize) -> Self {
        self.held_karp_limit = limit;
        self
    }

    /// The fixed start index.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The time budget, if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    /// Brute-force capacity ceiling.
    pub fn brute_force_limit(&self) -> usize {
        self.brute_force_limit
    }

    /// Held–Karp capacity ceiling.
    pub fn held_karp_limit(&self) -> usize {
        self.held_karp_limit
    }
}

/// Runs the selected solver against the matrix.
///
/// # Examples
///
/// ```
/// use road_tsp::distance::DistanceMatrix;
/// use road_tsp::models::Algorithm;
/// use road_tsp::solvers::{solve, SolverOptions};
///
/// let matrix = DistanceMatrix::from_data(3, vec![
///     0.0, 1.0, 2.0,
///     1.0, 0.0, 1.0,
///     2.0, 1.0, 0.0,
/// ]).unwrap();
///
/// let tour = solve(&matrix, Algorithm::HeldKarp, &SolverOptions::default()).unwrap();
/// assert_eq!(tour.order().len(), 4);
/// assert!(tour.is_optimal());
/// assert!((tour.total_distance() - 4.0).abs() < 1e-10);
/// ```
pub fn solve(
    matrix: &DistanceMatrix,
    algorithm: Algorithm,
    options: &SolverOptions,
) -> Result<Tour, SolveError> {
    debug!(
        "solving {} points with {}",
        matrix.size(),
        algorithm.name()
    );
    match algorithm {
        Algorithm::BruteForce => brute_force(matrix, options),
        Algorithm::HeldKarp => held_karp(matrix, options),
        Algorithm::TwoOpt => nearest_neighbor_two_opt(matrix, options),
    }
}

/// Total distance of a closed visitation order.
pub fn tour_distance(order: &[usize], matrix: &DistanceMatrix) -> f64 {
    order
        .windows(2)
        .map(|pair| matrix.get(pair[0], pair[1]))
        .sum()
}

pub(crate) fn validate(matrix: &DistanceMatrix, options: &SolverOptions) -> Result<(), SolveError> {
    let size = matrix.size();
    if size < 2 {
        return Err(SolveError::TooFewPoints { found: size });
    }
    if options.start() >= size {
        return Err(SolveError::StartOutOfRange {
            start: options.start(),
            size,
        });
    }
    Ok(())
}

/// Wall-clock cutoff shared by the solvers.
pub(crate) struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub(crate) fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub(crate) fn exceeded(&self) -> bool {
        match self.budget {
            Some(budget) => self.started.elapsed() > budget,
            None => false,
        }
    }

    pub(crate) fn budget(&self) -> Duration {
        self.budget.unwrap_or(Duration::MAX)
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
