//! Held–Karp subset dynamic programming.
//!
//! State: (last-visited index, bitmask of visited non-start indices).
//! Base case: single-index masks cost `d(start, i)`. Transition: extend the
//! best predecessor state by one index. The table stores a predecessor per
//! state so the optimal order can be reconstructed. Always at least as
//! fast as exhaustive search and produces the identical optimal distance;
//! memory grows as n·2ⁿ, hence the capacity ceiling.

use crate::distance::DistanceMatrix;
use crate::models::{Algorithm, Tour};

use super::{validate, Deadline, SolveError, SolverOptions};

/// Masks processed between time-budget checks.
const DEADLINE_CHECK_MASK: usize = 0xFF;

/// Sentinel predecessor for base-case states.
const NO_PREDECESSOR: u8 = u8::MAX;

/// Solves the instance exactly with bitmask dynamic programming.
///
/// # Examples
///
/// ```
/// use road_tsp::distance::DistanceMatrix;
/// use road_tsp::solvers::{held_karp, SolverOptions};
///
/// let matrix = DistanceMatrix::from_data(4, vec![
///     0.0, 1.0, 2.0, 1.0,
///     1.0, 0.0, 1.0, 2.0,
///     2.0, 1.0, 0.0, 1.0,
///     1.0, 2.0, 1.0, 0.0,
/// ]).unwrap();
///
/// let tour = held_karp(&matrix, &SolverOptions::default()).unwrap();
/// assert!((tour.total_distance() - 4.0).abs() < 1e-10);
/// assert!(tour.is_optimal());
/// ```
pub fn held_karp(matrix: &DistanceMatrix, options: &SolverOptions) -> Result<Tour, SolveError> {
    validate(matrix, options)?;

    let n = matrix.size();
    if n > options.held_karp_limit() {
        return Err(SolveError::ProblemTooLarge {
            algorithm: Algorithm::HeldKarp,
            size: n,
            limit: options.held_karp_limit(),
        });
    }

    let deadline = Deadline::start(options.time_budget());
    let start = options.start();
    let cities: Vec<usize> = (0..n).filter(|&i| i != start).collect();
    let m = cities.len();
    let full: usize = 1 << m;

    // cost[mask * m + k]: cheapest way to leave start, visit exactly the
    // cities in `mask`, and stand at city k.
    let mut cost = vec![f64::INFINITY; full * m];
    let mut parent = vec![NO_PREDECESSOR; full * m];

    for k in 0..m {
        cost[(1 << k) * m + k] = matrix.get(start, cities[k]);
    }

    for mask in 1..full {
        if mask & DEADLINE_CHECK_MASK == 0 && deadline.exceeded() {
            return Err(SolveError::TimeLimitExceeded {
                algorithm: Algorithm::HeldKarp,
                budget: deadline.budget(),
            });
        }
        if mask.count_ones() < 2 {
            continue; // base cases
        }

        for k in 0..m {
            if mask & (1 << k) == 0 {
                continue;
            }
            let prev_mask = mask & !(1 << k);
            let mut best = f64::INFINITY;
            let mut best_prev = NO_PREDECESSOR;

            for j in 0..m {
                if prev_mask & (1 << j) == 0 {
                    continue;
                }
                let candidate = cost[prev_mask * m + j] + matrix.get(cities[j], cities[k]);
                if candidate < best {
                    best = candidate;
                    best_prev = j as u8;
                }
            }

            cost[mask * m + k] = best;
            parent[mask * m + k] = best_prev;
        }
    }

    // Close the cycle back to the start.
    let full_mask = full - 1;
    let mut best_distance = f64::INFINITY;
    let mut last = 0;
    for k in 0..m {
        let candidate = cost[full_mask * m + k] + matrix.get(cities[k], start);
        if candidate < best_distance {
            best_distance = candidate;
            last = k;
        }
    }

    // Walk predecessors from the final state back to the base case.
    let mut reversed = Vec::with_capacity(m);
    let mut mask = full_mask;
    let mut k = last;
    loop {
        reversed.push(cities[k]);
        let next_mask = mask & !(1 << k);
        if next_mask == 0 {
            break;
        }
        k = parent[mask * m + k] as usize;
        mask = next_mask;
    }

    let mut order = Vec::with_capacity(n + 1);
    order.push(start);
    order.extend(reversed.into_iter().rev());
    order.push(start);

    Ok(Tour::new(
        order,
        best_distance,
        deadline.elapsed(),
        Algorithm::HeldKarp,
    ))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::tests::{assert_hamiltonian, ring_matrix};
    use super::super::{brute_force, tour_distance};
    use super::*;

    #[test]
    fn test_two_points() {
        let matrix = ring_matrix(2);
        let tour = held_karp(&matrix, &SolverOptions::default()).expect("solves");
        assert_eq!(tour.order(), &[0, 1, 0]);
        assert!((tour.total_distance() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_ring_optimum() {
        let matrix = ring_matrix(5);
        let tour = held_karp(&matrix, &SolverOptions::default()).expect("solves");
        assert_eq!(tour.total_distance(), 5.0);
        assert_hamiltonian(tour.order(), 5, 0);
        // The reconstructed order's distance matches the reported optimum.
        assert!((tour_distance(tour.order(), &matrix) - tour.total_distance()).abs() < 1e-10);
    }

    #[test]
    fn test_matches_brute_force() {
        // An asymmetric-looking but symmetric instance with distinct optima.
        let matrix = DistanceMatrix::from_data(
            6,
            vec![
                0.0, 3.0, 9.0, 8.0, 5.0, 6.0, //
                3.0, 0.0, 4.0, 7.0, 9.0, 2.0, //
                9.0, 4.0, 0.0, 3.0, 8.0, 7.0, //
                8.0, 7.0, 3.0, 0.0, 4.0, 9.0, //
                5.0, 9.0, 8.0, 4.0, 0.0, 3.0, //
                6.0, 2.0, 7.0, 9.0, 3.0, 0.0, //
            ],
        )
        .expect("valid");
        let options = SolverOptions::default();

        let exhaustive = brute_force(&matrix, &options).expect("solves");
        let dynamic = held_karp(&matrix, &options).expect("solves");
        assert!((exhaustive.total_distance() - dynamic.total_distance()).abs() < 1e-9);
        assert_hamiltonian(dynamic.order(), 6, 0);
    }

    #[test]
    fn test_nonzero_start() {
        let matrix = ring_matrix(6);
        let options = SolverOptions::default().with_start(2);
        let tour = held_karp(&matrix, &options).expect("solves");
        assert_hamiltonian(tour.order(), 6, 2);
        assert_eq!(tour.total_distance(), 6.0);
    }

    #[test]
    fn test_problem_too_large() {
        let matrix = ring_matrix(19);
        let err = held_karp(&matrix, &SolverOptions::default()).expect_err("refuses");
        assert_eq!(
            err,
            SolveError::ProblemTooLarge {
                algorithm: Algorithm::HeldKarp,
                size: 19,
                limit: 18,
            }
        );
    }

    #[test]
    fn test_time_limit_exceeded() {
        let matrix = ring_matrix(17);
        let options = SolverOptions::default().with_time_budget(Duration::ZERO);
        let err = held_karp(&matrix, &options).expect_err("times out");
        assert!(matches!(
            err,
            SolveError::TimeLimitExceeded {
                algorithm: Algorithm::HeldKarp,
                ..
            }
        ));
    }
}
