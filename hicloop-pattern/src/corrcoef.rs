//! Local Pearson correlation between a contact map and a pattern template.

use ndarray::{Array2, ArrayView2, Zip};

use crate::errors::PatternResult;
use crate::xcorr::{Alignment, check_kernel, xcorr2};

///
/// Pearson correlation coefficient between `kernel` and the signal window
/// under it, at every position.
///
/// The signal mean and variance are taken over the kernel footprint; the
/// kernel mean and (population) standard deviation are computed once. Shape
/// and placement follow [xcorr2] with the same `alignment`.
///
/// Positions where either standard deviation is zero are `NaN`, as are the
/// uncovered borders in [Alignment::Centered] mode.
///
pub fn corrcoef2d(
    signal: ArrayView2<f64>,
    kernel: ArrayView2<f64>,
    alignment: Alignment,
) -> PatternResult<Array2<f64>> {
    check_kernel(&signal, &kernel)?;

    let size = kernel.len() as f64;
    let uniform = Array2::from_elem(kernel.dim(), 1.0 / size);

    let mean_signal = xcorr2(signal, uniform.view(), alignment)?;
    let squared = signal.mapv(|v| v * v);
    let mean_squared = xcorr2(squared.view(), uniform.view(), alignment)?;

    let mean_kernel = kernel.mean().unwrap_or(f64::NAN);
    let std_kernel = kernel.std(0.0);

    let scaled_kernel = kernel.mapv(|v| v / size);
    let mut corr = xcorr2(signal, scaled_kernel.view(), alignment)?;

    Zip::from(&mut corr)
        .and(&mean_signal)
        .and(&mean_squared)
        .for_each(|c, &mean, &mean_sq| {
            let std_signal = (mean_sq - mean * mean).sqrt();
            let denom = std_signal * std_kernel;
            *c = if denom == 0.0 {
                f64::NAN
            } else {
                (*c - mean * mean_kernel) / denom
            };
        });

    Ok(corr)
}

///
/// Turn a correlation map into a probability map for the peak picker:
/// undefined cells become 0 and values are clamped to [0, 1].
///
pub fn correlation_to_probability(map: &Array2<f64>) -> Array2<f64> {
    map.mapv(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cross_kernel() -> Array2<f64> {
        array![[0.0, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 0.0]]
    }

    #[fixture]
    fn signal_with_cross(cross_kernel: Array2<f64>) -> Array2<f64> {
        let mut signal = Array2::from_shape_fn((9, 9), |(i, j)| ((i * 5 + j * 3) % 7) as f64);
        signal
            .slice_mut(ndarray::s![3..6, 4..7])
            .assign(&cross_kernel.mapv(|v| 3.0 * v + 5.0));
        signal
    }

    #[rstest]
    fn test_perfect_match_at_pattern_centre(
        signal_with_cross: Array2<f64>,
        cross_kernel: Array2<f64>,
    ) {
        let corr =
            corrcoef2d(signal_with_cross.view(), cross_kernel.view(), Alignment::Centered).unwrap();
        assert_eq!(corr.dim(), (9, 9));
        assert!((corr[[4, 5]] - 1.0).abs() < 1e-9, "{}", corr[[4, 5]]);
    }

    #[rstest]
    fn test_valid_alignment_shape(signal_with_cross: Array2<f64>, cross_kernel: Array2<f64>) {
        let corr =
            corrcoef2d(signal_with_cross.view(), cross_kernel.view(), Alignment::Valid).unwrap();
        assert_eq!(corr.dim(), (7, 7));
        assert!((corr[[3, 4]] - 1.0).abs() < 1e-9);
        assert!(corr.iter().filter(|v| !v.is_nan()).all(|v| v.abs() <= 1.0 + 1e-9));
    }

    #[rstest]
    fn test_constant_kernel_is_undefined(signal_with_cross: Array2<f64>) {
        let kernel = Array2::<f64>::ones((3, 3));
        let corr = corrcoef2d(signal_with_cross.view(), kernel.view(), Alignment::Valid).unwrap();
        assert!(corr.iter().all(|v| v.is_nan()));
    }

    #[rstest]
    fn test_kernel_too_large_is_rejected(cross_kernel: Array2<f64>) {
        let signal = Array2::<f64>::ones((2, 5));
        assert_eq!(
            corrcoef2d(signal.view(), cross_kernel.view(), Alignment::Centered).is_err(),
            true
        );
    }

    #[rstest]
    fn test_correlation_to_probability() {
        let map = array![[f64::NAN, -0.4], [0.5, 1.0000001]];
        assert_eq!(correlation_to_probability(&map), array![[0.0, 0.0], [0.5, 1.0]]);
    }
}
