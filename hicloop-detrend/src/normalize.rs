//! Sequential component normalization (SCN) of contact maps.
//!
//! Bins whose row sum does not exceed the activity threshold are dropped:
//! every entry in their row and column ends up zero. The remaining sub-matrix
//! is alternately rescaled column by column and row by row so its row and
//! column sums approach one.

use hicloop_core::config::DEFAULT_SCN_ITERATIONS;
use hicloop_core::models::ContactMatrix;
use ndarray::Array2;

///
/// Flag every bin whose row sum exceeds `threshold`.
///
pub fn active_bins(matrix: &ContactMatrix, threshold: f64) -> Vec<bool> {
    matrix.row_sums().iter().map(|&s| s > threshold).collect()
}

///
/// Normalize a contact map with the default number of passes.
///
/// # Arguments
/// - matrix: the contact map, consumed
/// - threshold: bins with a row sum at or below this value are zeroed out
///
pub fn scn(matrix: ContactMatrix, threshold: f64) -> ContactMatrix {
    scn_with_iterations(matrix, threshold, DEFAULT_SCN_ITERATIONS)
}

///
/// Normalize a contact map with an explicit number of column+row passes.
///
/// Scaling factors that come out undefined (a zero sum over the active bins)
/// are replaced by 0 after each half pass.
///
pub fn scn_with_iterations(
    mut matrix: ContactMatrix,
    threshold: f64,
    iterations: usize,
) -> ContactMatrix {
    let active = active_bins(&matrix, threshold);
    let data = matrix.as_array_mut();

    for _ in 0..iterations {
        for mut column in data.columns_mut() {
            let total: f64 = column
                .iter()
                .zip(active.iter())
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| *v)
                .sum();
            for (v, keep) in column.iter_mut().zip(active.iter()) {
                *v = if *keep { *v / total } else { 0.0 };
            }
        }
        zero_nans(data);

        for mut row in data.rows_mut() {
            let total: f64 = row
                .iter()
                .zip(active.iter())
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| *v)
                .sum();
            for (v, keep) in row.iter_mut().zip(active.iter()) {
                *v = if *keep { *v / total } else { 0.0 };
            }
        }
        zero_nans(data);
    }

    matrix
}

fn zero_nans(data: &mut Array2<f64>) {
    data.mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn smooth_map() -> ContactMatrix {
        let n: usize = 6;
        let values = (0..n * n)
            .map(|k| {
                let (i, j) = (k / n, k % n);
                1.0 + 1.0 / (1.0 + i.abs_diff(j) as f64) + 0.1 * ((i + j) % 3) as f64
            })
            .collect();
        ContactMatrix::from_shape_vec(n, values).unwrap()
    }

    #[rstest]
    fn test_rows_sum_to_one(smooth_map: ContactMatrix) {
        let normalized = scn(smooth_map, 0.0);
        for s in normalized.row_sums().iter() {
            assert!((s - 1.0).abs() < 1e-12);
        }
        for s in normalized.col_sums().iter() {
            assert!((s - 1.0).abs() < 1e-6);
        }
    }

    #[rstest]
    fn test_second_pass_is_a_fixed_point(smooth_map: ContactMatrix) {
        let once = scn(smooth_map, 0.0);
        let twice = scn(once.clone(), 0.0);

        let max_diff = once
            .as_array()
            .iter()
            .zip(twice.as_array().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(max_diff < 1e-6, "max diff {max_diff}");
    }

    #[rstest]
    fn test_inactive_bins_are_zeroed(smooth_map: ContactMatrix) {
        let mut data = smooth_map.into_inner();
        data.row_mut(2).fill(0.0);
        data.column_mut(2).fill(0.0);
        let matrix = ContactMatrix::try_from(data).unwrap();

        assert_eq!(active_bins(&matrix, 0.0)[2], false);

        let normalized = scn(matrix, 0.0);
        for k in 0..normalized.n_bins() {
            assert_eq!(normalized.get(2, k), Some(0.0));
            assert_eq!(normalized.get(k, 2), Some(0.0));
        }
        assert!(normalized.as_array().iter().all(|v| v.is_finite()));
    }

    #[rstest]
    fn test_all_inactive_gives_zero_matrix() {
        let matrix = ContactMatrix::try_from(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let normalized = scn_with_iterations(matrix, 5.0, 3);
        assert!(normalized.as_array().iter().all(|v| *v == 0.0));
    }
}
