//! Sliding cross-correlation of a 2D signal with a small kernel.
//!
//! Direct accumulation over kernel offsets: for every kernel cell (ki, kj)
//! the shifted signal window is scaled by the kernel weight and added to the
//! output. Kernels are small pattern templates, so this stays cheap and
//! exact without an FFT.

use ndarray::{Array1, Array2, ArrayView2, s};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::errors::{PatternError, PatternResult};

/// Where correlation values are placed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Output has the signal's shape; each value sits under the kernel
    /// centre `((Mk - 1) / 2, (Nk - 1) / 2)` and cells the kernel cannot
    /// fully cover are `NaN`.
    #[default]
    Centered,
    /// Output has shape `(Ms - Mk + 1) x (Ns - Nk + 1)`, no padding.
    Valid,
}

///
/// Check that `kernel` fits inside `signal` and is not empty.
///
pub fn check_kernel(signal: &ArrayView2<f64>, kernel: &ArrayView2<f64>) -> PatternResult<()> {
    let (ms, ns) = signal.dim();
    let (mk, nk) = kernel.dim();

    if mk > ms || nk > ns {
        return Err(PatternError::KernelTooLarge {
            kernel: (mk, nk),
            signal: (ms, ns),
        });
    }
    if mk == 0 || nk == 0 {
        return Err(PatternError::EmptyKernel);
    }
    Ok(())
}

///
/// Cross-correlate `signal` (Ms x Ns) with `kernel` (Mk x Nk).
///
/// # Arguments
/// - signal: the (detrended) contact map
/// - kernel: the pattern template, no larger than the signal in either axis
/// - alignment: [Alignment::Centered] or [Alignment::Valid]
///
/// # Returns
/// The correlation map, or [PatternError::KernelTooLarge] when the kernel
/// does not fit.
///
pub fn xcorr2(
    signal: ArrayView2<f64>,
    kernel: ArrayView2<f64>,
    alignment: Alignment,
) -> PatternResult<Array2<f64>> {
    check_kernel(&signal, &kernel)?;

    let valid = valid_xcorr(&signal, &kernel);
    match alignment {
        Alignment::Valid => Ok(valid),
        Alignment::Centered => {
            let (mk, nk) = kernel.dim();
            let (mo, no) = valid.dim();
            let (ki, kj) = ((mk - 1) / 2, (nk - 1) / 2);

            let mut out = Array2::from_elem(signal.dim(), f64::NAN);
            out.slice_mut(s![ki..ki + mo, kj..kj + no]).assign(&valid);
            Ok(out)
        }
    }
}

fn valid_xcorr(signal: &ArrayView2<f64>, kernel: &ArrayView2<f64>) -> Array2<f64> {
    let (ms, ns) = signal.dim();
    let (mk, nk) = kernel.dim();
    let (mo, no) = (ms - mk + 1, ns - nk + 1);

    // one output row at a time; per cell the kernel offsets are summed in
    // row-major order whether or not rows run in parallel
    let row = |r: usize| -> Array1<f64> {
        let mut acc = Array1::<f64>::zeros(no);
        for ((ki, kj), &w) in kernel.indexed_iter() {
            acc.scaled_add(w, &signal.slice(s![r + ki, kj..kj + no]));
        }
        acc
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Array1<f64>> = (0..mo).into_par_iter().map(row).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Array1<f64>> = (0..mo).map(row).collect();

    let mut out = Array2::<f64>::zeros((mo, no));
    for (mut dst, src) in out.rows_mut().into_iter().zip(rows.iter()) {
        dst.assign(src);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ramp() -> Array2<f64> {
        Array2::from_shape_fn((6, 7), |(i, j)| (i * 7 + j) as f64)
    }

    #[rstest]
    #[case((3, 3))]
    #[case((2, 4))]
    #[case((1, 1))]
    #[case((6, 7))]
    fn test_valid_shape(ramp: Array2<f64>, #[case] shape: (usize, usize)) {
        let kernel = Array2::<f64>::ones(shape);
        let out = xcorr2(ramp.view(), kernel.view(), Alignment::Valid).unwrap();
        assert_eq!(out.dim(), (6 - shape.0 + 1, 7 - shape.1 + 1));
    }

    #[rstest]
    #[case((3, 3))]
    #[case((2, 4))]
    #[case((4, 1))]
    fn test_centered_defined_region(ramp: Array2<f64>, #[case] shape: (usize, usize)) {
        let (mk, nk) = shape;
        let kernel = Array2::<f64>::ones(shape);
        let out = xcorr2(ramp.view(), kernel.view(), Alignment::Centered).unwrap();
        assert_eq!(out.dim(), (6, 7));

        let (ki, kj) = ((mk - 1) / 2, (nk - 1) / 2);
        let rows = ki..6 - (mk - 1 - ki);
        let cols = kj..7 - (nk - 1 - kj);
        for ((i, j), v) in out.indexed_iter() {
            let inside = rows.contains(&i) && cols.contains(&j);
            assert_eq!(v.is_nan(), !inside, "cell ({i}, {j})");
        }
    }

    #[rstest]
    fn test_mean_filter_on_constant_signal() {
        let signal = Array2::<f64>::from_elem((8, 8), 3.5);
        let kernel = Array2::<f64>::from_elem((3, 3), 1.0 / 9.0);

        let out = xcorr2(signal.view(), kernel.view(), Alignment::Centered).unwrap();
        for v in out.iter().filter(|v| !v.is_nan()) {
            assert!((v - 3.5).abs() < 1e-12);
        }
    }

    #[rstest]
    fn test_known_values() {
        let signal = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let kernel = array![[1.0, 0.0], [0.0, -1.0]];

        let out = xcorr2(signal.view(), kernel.view(), Alignment::Valid).unwrap();
        assert_eq!(out, array![[-4.0, -4.0], [-4.0, -4.0]]);

        let centered = xcorr2(signal.view(), kernel.view(), Alignment::Centered).unwrap();
        assert_eq!(centered[[0, 0]], -4.0);
        assert_eq!(centered[[1, 1]], -4.0);
        assert!(centered[[2, 2]].is_nan());
    }

    #[rstest]
    fn test_kernel_too_large(ramp: Array2<f64>) {
        let kernel = Array2::<f64>::ones((7, 2));
        let result = xcorr2(ramp.view(), kernel.view(), Alignment::Valid);
        assert_eq!(
            result,
            Err(PatternError::KernelTooLarge {
                kernel: (7, 2),
                signal: (6, 7),
            })
        );
    }

    #[rstest]
    fn test_empty_kernel(ramp: Array2<f64>) {
        let kernel = Array2::<f64>::zeros((0, 3));
        let result = xcorr2(ramp.view(), kernel.view(), Alignment::Centered);
        assert_eq!(result, Err(PatternError::EmptyKernel));
    }
}
