//! Minimum-cost assignment for rectangular cost matrices.
//!
//! Pads to a square with zero-cost rows or columns and hands the result to
//! the Kuhn-Munkres solver of the `munkres` crate, so every original row is
//! matched whenever rows <= columns. Ties resolve toward the lowest column
//! for the lowest row: an all-equal matrix is assigned along its diagonal.

use munkres::{WeightMatrix, solve_assignment};

use crate::error::MatchError;

/// Solves the assignment problem for `costs` (rows x columns).
///
/// Returns `(row, column)` pairs sorted by row. Rows matched only to padding
/// are omitted. Every cost must be finite; negative costs are fine.
pub fn solve(costs: &[Vec<f64>]) -> Result<Vec<(usize, usize)>, MatchError> {
    let rows = costs.len();
    let cols = costs.iter().map(Vec::len).max().unwrap_or(0);
    let n = rows.max(cols);
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut square = vec![0.0; n * n];
    for (i, row) in costs.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(MatchError::NonFiniteCost { row: i, column: j, value });
            }
            square[i * n + j] = value;
        }
    }

    let mut weights = WeightMatrix::from_row_vec(n, square);
    let positions = solve_assignment(&mut weights).map_err(|e| MatchError::Unsolvable {
        reason: format!("{e:?}"),
    })?;

    let mut pairs: Vec<(usize, usize)> = positions
        .into_iter()
        .map(|p| (p.row, p.column))
        .filter(|&(i, j)| i < rows && j < costs[i].len())
        .collect();
    pairs.sort_unstable();
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(costs: &[Vec<f64>], pairs: &[(usize, usize)]) -> f64 {
        pairs.iter().map(|&(i, j)| costs[i][j]).sum()
    }

    #[test]
    fn empty_matrix() {
        assert!(solve(&[]).unwrap().is_empty());
        assert!(solve(&[vec![], vec![]]).unwrap().is_empty());
    }

    #[test]
    fn single_cell() {
        assert_eq!(solve(&[vec![3.5]]).unwrap(), vec![(0, 0)]);
    }

    #[test]
    fn classic_square() {
        let costs = vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ];
        let pairs = solve(&costs).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(total(&costs, &pairs), 5.0);
        assert_eq!(pairs, vec![(0, 1), (1, 0), (2, 2)]);
    }

    #[test]
    fn needs_cost_adjustment() {
        let costs = vec![
            vec![5.0, 9.0, 1.0],
            vec![10.0, 3.0, 2.0],
            vec![8.0, 7.0, 4.0],
        ];
        let pairs = solve(&costs).unwrap();
        assert_eq!(total(&costs, &pairs), 12.0);
        assert_eq!(pairs, vec![(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn ties_follow_the_diagonal() {
        let costs = vec![vec![1.0; 4]; 3];
        assert_eq!(solve(&costs).unwrap(), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn negative_costs() {
        let costs = vec![vec![-1.0, -2.0, 0.0], vec![-3.0, -1.0, 0.0]];
        let pairs = solve(&costs).unwrap();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
        assert_eq!(total(&costs, &pairs), -5.0);
    }

    #[test]
    fn more_rows_than_columns_leaves_rows_unmatched() {
        let costs = vec![vec![5.0], vec![1.0], vec![3.0]];
        assert_eq!(solve(&costs).unwrap(), vec![(1, 0)]);
    }

    #[test]
    fn non_finite_cost_is_rejected() {
        let err = solve(&[vec![0.0, f64::NAN]]).unwrap_err();
        assert!(matches!(err, MatchError::NonFiniteCost { row: 0, column: 1, .. }));
        assert!(solve(&[vec![f64::INFINITY]]).is_err());
    }

    #[test]
    fn matches_brute_force_on_small_matrices() {
        fn permutations(n: usize) -> Vec<Vec<usize>> {
            if n == 0 {
                return vec![Vec::new()];
            }
            let mut out = Vec::new();
            for p in permutations(n - 1) {
                for pos in 0..=p.len() {
                    let mut q = p.clone();
                    q.insert(pos, n - 1);
                    out.push(q);
                }
            }
            out
        }

        let mut state: u64 = 7;
        for n in 1..=5 {
            for _ in 0..20 {
                let costs: Vec<Vec<f64>> = (0..n)
                    .map(|_| {
                        (0..n)
                            .map(|_| {
                                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                                ((state >> 33) % 21) as f64 - 10.0
                            })
                            .collect()
                    })
                    .collect();

                let best = permutations(n)
                    .iter()
                    .map(|p| p.iter().enumerate().map(|(i, &j)| costs[i][j]).sum::<f64>())
                    .fold(f64::INFINITY, f64::min);

                let pairs = solve(&costs).unwrap();
                assert_eq!(pairs.len(), n);
                assert_eq!(total(&costs, &pairs), best);
            }
        }
    }
}
