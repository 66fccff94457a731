//! Exhaustive permutation search.
//!
//! Enumerates every permutation of the non-start indices in lexicographic
//! order and keeps the first-found minimum. Guaranteed optimal; refuses
//! instances beyond the configured ceiling because the candidate count
//! grows as (n-1)!.

use crate::distance::DistanceMatrix;
use crate::models::{Algorithm, Tour};

use super::{validate, Deadline, SolveError, SolverOptions};

/// Permutations evaluated between time-budget checks.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Solves the instance by trying every visitation order.
///
/// # Examples
///
/// ```
/// use road_tsp::distance::DistanceMatrix;
/// use road_tsp::solvers::{brute_force, SolverOptions};
///
/// let matrix = DistanceMatrix::from_data(4, vec![
///     0.0, 1.0, 2.0, 1.0,
///     1.0, 0.0, 1.0, 2.0,
///     2.0, 1.0, 0.0, 1.0,
///     1.0, 2.0, 1.0, 0.0,
/// ]).unwrap();
///
/// let tour = brute_force(&matrix, &SolverOptions::default()).unwrap();
/// assert_eq!(tour.order(), &[0, 1, 2, 3, 0]);
/// assert!((tour.total_distance() - 4.0).abs() < 1e-10);
/// assert!(tour.is_optimal());
/// ```
pub fn brute_force(matrix: &DistanceMatrix, options: &SolverOptions) -> Result<Tour, SolveError> {
    validate(matrix, options)?;

    let n = matrix.size();
    if n > options.brute_force_limit() {
        return Err(SolveError::ProblemTooLarge {
            algorithm: Algorithm::BruteForce,
            size: n,
            limit: options.brute_force_limit(),
        });
    }

    let deadline = Deadline::start(options.time_budget());
    let start = options.start();

    // Ascending order is the lexicographically first permutation.
    let mut candidate: Vec<usize> = (0..n).filter(|&i| i != start).collect();
    let mut best = candidate.clone();
    let mut best_distance = cycle_distance(start, &candidate, matrix);
    let mut evaluated: u64 = 1;

    while next_permutation(&mut candidate) {
        if evaluated % DEADLINE_CHECK_INTERVAL == 0 && deadline.exceeded() {
            return Err(SolveError::TimeLimitExceeded {
                algorithm: Algorithm::BruteForce,
                budget: deadline.budget(),
            });
        }

        let distance = cycle_distance(start, &candidate, matrix);
        // Strict improvement only, so equal-cost tours keep the first found.
        if distance < best_distance {
            best_distance = distance;
            best.copy_from_slice(&candidate);
        }
        evaluated += 1;
    }

    let mut order = Vec::with_capacity(n + 1);
    order.push(start);
    order.extend_from_slice(&best);
    order.push(start);

    Ok(Tour::new(
        order,
        best_distance,
        deadline.elapsed(),
        Algorithm::BruteForce,
    ))
}

/// Distance of `start -> middle[0] -> ... -> middle[last] -> start`.
fn cycle_distance(start: usize, middle: &[usize], matrix: &DistanceMatrix) -> f64 {
    let mut distance = matrix.get(start, middle[0]);
    for pair in middle.windows(2) {
        distance += matrix.get(pair[0], pair[1]);
    }
    distance + matrix.get(middle[middle.len() - 1], start)
}

/// Advances `items` to its lexicographic successor in place.
///
/// Returns `false` once `items` is the final (descending) permutation.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }

    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let pivot = pivot - 1;

    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot] {
        successor -= 1;
    }
    items.swap(pivot, successor);
    items[pivot + 1..].reverse();
    true
}
