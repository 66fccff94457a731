//! Nearest-neighbor construction with 2-opt improvement.
//!
//! Construction greedily appends the closest unvisited index (ties to the
//! lowest index). Improvement repeatedly reverses tour segments under a
//! first-improvement rule, restarting the scan after every accepted
//! reversal, until a full scan finds no improving move.
//!
//! Never guaranteed optimal, but always returns a valid Hamiltonian cycle
//! — including when the time budget expires mid-improvement, where the
//! current tour is kept instead of reporting an error.

use log::debug;

use crate::distance::DistanceMatrix;
use crate::models::{Algorithm, Tour};

use super::{tour_distance, validate, SolveError, Deadline, SolverOptions};

/// Improvements smaller than this are treated as float noise and rejected.
const IMPROVE_EPS: f64 = 1e-10;

/// Solves the instance heuristically.
///
/// # Examples
///
/// ```
/// use road_tsp::distance::DistanceMatrix;
/// use road_tsp::solvers::{nearest_neighbor_two_opt, SolverOptions};
///
/// let matrix = DistanceMatrix::from_data(4, vec![
///     0.0, 1.0, 2.0, 1.0,
///     1.0, 0.0, 1.0, 2.0,
///     2.0, 1.0, 0.0, 1.0,
///     1.0, 2.0, 1.0, 0.0,
/// ]).unwrap();
///
/// let tour = nearest_neighbor_two_opt(&matrix, &SolverOptions::default()).unwrap();
/// assert_eq!(tour.order().len(), 5);
/// assert!(!tour.is_optimal());
/// ```
pub fn nearest_neighbor_two_opt(
    matrix: &DistanceMatrix,
    options: &SolverOptions,
) -> Result<Tour, SolveError> {
    validate(matrix, options)?;

    let deadline = Deadline::start(options.time_budget());
    let mut order = construct(matrix, options.start());
    improve(&mut order, matrix, &deadline);

    let distance = tour_distance(&order, matrix);
    Ok(Tour::new(
        order,
        distance,
        deadline.elapsed(),
        Algorithm::TwoOpt,
    ))
}

/// Greedy nearest-neighbor tour, closed back to the start.
fn construct(matrix: &DistanceMatrix, start: usize) -> Vec<usize> {
    let n = matrix.size();
    let mut visited = vec![false; n];
    visited[start] = true;

    let mut order = Vec::with_capacity(n + 1);
    order.push(start);
    let mut current = start;

    for _ in 1..n {
        if let Some(next) = matrix.nearest_unvisited(current, &visited) {
            visited[next] = true;
            order.push(next);
            current = next;
        }
    }

    order.push(start);
    order
}

/// First-improvement 2-opt over the closed tour.
///
/// Reversal windows cover interior positions only; the fixed start/end
/// wrap point is never a reversal boundary. With three or fewer points no
/// window exists and the tour is returned unchanged.
fn improve(order: &mut [usize], matrix: &DistanceMatrix, deadline: &Deadline) {
    let n = order.len() - 1;

    'scan: loop {
        if deadline.exceeded() {
            debug!("2-opt stopped by time budget; keeping current tour");
            return;
        }

        for i in 1..n.saturating_sub(1) {
            for j in (i + 1)..n {
                // Reversing order[i..=j] swaps edges (i-1, i) and (j, j+1)
                // for (i-1, j) and (i, j+1).
                let delta = matrix.get(order[i - 1], order[j])
                    + matrix.get(order[i], order[j + 1])
                    - matrix.get(order[i - 1], order[i])
                    - matrix.get(order[j], order[j + 1]);
                if delta < -IMPROVE_EPS {
                    order[i..=j].reverse();
                    continue 'scan;
                }
            }
        }
        return; // full scan without improvement
    }
}
