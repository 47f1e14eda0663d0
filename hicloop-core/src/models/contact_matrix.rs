use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::errors::{MatrixError, MatrixResult};

///
/// A square Hi-C contact map: entry (i, j) holds the interaction strength
/// between genomic bins i and j.
///
/// The matrix is expected to be symmetric with non-negative entries, but only
/// squareness is enforced. Pipeline stages take a [ContactMatrix] by value and
/// hand back a new one, so a map is never aliased between two stages.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ContactMatrix {
    data: Array2<f64>,
}

impl TryFrom<Array2<f64>> for ContactMatrix {
    type Error = MatrixError;

    fn try_from(data: Array2<f64>) -> MatrixResult<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(MatrixError::NotSquare { rows, cols });
        }
        if rows == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(ContactMatrix { data })
    }
}

impl TryFrom<Vec<Vec<f64>>> for ContactMatrix {
    type Error = MatrixError;

    ///
    /// Build a matrix from nested rows. Every row must have as many entries as
    /// there are rows.
    ///
    fn try_from(rows: Vec<Vec<f64>>) -> MatrixResult<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(MatrixError::NotSquare {
                rows: n,
                cols: bad.len(),
            });
        }
        let values: Vec<f64> = rows.into_iter().flatten().collect();
        ContactMatrix::from_shape_vec(n, values)
    }
}

impl From<ContactMatrix> for Array2<f64> {
    fn from(value: ContactMatrix) -> Self {
        value.data
    }
}

impl ContactMatrix {
    ///
    /// Build an n x n matrix from row-major values.
    ///
    pub fn from_shape_vec(n: usize, values: Vec<f64>) -> MatrixResult<Self> {
        let len = values.len();
        let data =
            Array2::from_shape_vec((n, n), values).map_err(|_| MatrixError::ShapeMismatch { n, len })?;
        ContactMatrix::try_from(data)
    }

    /// Number of genomic bins (rows == columns).
    pub fn n_bins(&self) -> usize {
        self.data.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    ///
    /// Mutable access to the underlying values. The shape cannot change through
    /// this handle, so the square invariant holds.
    ///
    pub fn as_array_mut(&mut self) -> &mut Array2<f64> {
        &mut self.data
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Sum of every row.
    pub fn row_sums(&self) -> Array1<f64> {
        self.data.sum_axis(Axis(1))
    }

    /// Sum of every column.
    pub fn col_sums(&self) -> Array1<f64> {
        self.data.sum_axis(Axis(0))
    }
}
