//! Genomic distance law: mean contact intensity as a function of the
//! distance between two bins.

use hicloop_core::models::ContactMatrix;
use ndarray::{Array1, Array2};

///
/// Average every lower diagonal of a contact map.
///
/// Entry `d` of the result is the mean of the values `(i, i - d)`, so entry 0
/// is the main diagonal. Only the lower triangle is sampled; the map is
/// assumed symmetric.
///
/// # Example
///
/// ```rust
/// use hicloop_core::models::ContactMatrix;
/// use hicloop_detrend::distance_law;
///
/// let matrix = ContactMatrix::try_from(vec![
///     vec![2.0, 3.0, 4.0],
///     vec![2.0, 3.0, 4.0],
///     vec![2.0, 3.0, 4.0],
/// ]).unwrap();
///
/// assert_eq!(distance_law(&matrix).to_vec(), vec![3.0, 2.5, 2.0]);
/// ```
pub fn distance_law(matrix: &ContactMatrix) -> Array1<f64> {
    let data = matrix.view();
    let n = matrix.n_bins();

    (0..n)
        .map(|d| {
            let total: f64 = (d..n).map(|i| data[[i, i - d]]).sum();
            total / (n - d) as f64
        })
        .collect()
}

///
/// Broadcast a distance law into a full n x n lookup: cell (i, j) holds
/// `law[|i - j|]`.
///
pub fn distance_law_matrix(law: &Array1<f64>) -> Array2<f64> {
    let n = law.len();
    Array2::from_shape_fn((n, n), |(i, j)| law[i.abs_diff(j)])
}
