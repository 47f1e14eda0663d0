//! Savitzky-Golay smoothing.
//!
//! Each interior point is replaced by the value at the window centre of a
//! least-squares polynomial fitted over `window` consecutive samples. The
//! first and last `window / 2` points are read off a single polynomial fitted
//! to the first (last) `window` samples instead of being padded.

use log::debug;

///
/// Smooth `y` with a Savitzky-Golay filter.
///
/// `window` must be odd and larger than `polyorder`, otherwise the input is
/// returned unchanged. If `y` is shorter than the window, the window shrinks
/// to the largest odd length that fits; when no such length exceeds
/// `polyorder` the input is returned unchanged as well.
///
pub fn savgol_filter(y: &[f64], window: usize, polyorder: usize) -> Vec<f64> {
    let n = y.len();
    let window = match effective_window(n, window, polyorder) {
        Some(w) => w,
        None => {
            debug!(
                "Cannot smooth {} points with window {} and order {}, left unsmoothed",
                n, window, polyorder
            );
            return y.to_vec();
        }
    };
    let half = window / 2;

    let mut smoothed = vec![0.0; n];

    let Some(centre) = fit_weights(window, half, polyorder) else {
        return y.to_vec();
    };
    for i in half..n - half {
        smoothed[i] = dot(&centre, &y[i - half..i + half + 1]);
    }

    // edges: evaluate the fits over the first and last full windows
    let head = &y[..window];
    let tail = &y[n - window..];
    for k in 0..half {
        let (Some(left), Some(right)) = (
            fit_weights(window, k, polyorder),
            fit_weights(window, window - half + k, polyorder),
        ) else {
            return y.to_vec();
        };
        smoothed[k] = dot(&left, head);
        smoothed[n - half + k] = dot(&right, tail);
    }

    smoothed
}

fn effective_window(n: usize, window: usize, polyorder: usize) -> Option<usize> {
    if window % 2 == 0 || window <= polyorder {
        return None;
    }
    if n >= window {
        return Some(window);
    }
    let shrunk = if n % 2 == 1 { n } else { n.saturating_sub(1) };
    if shrunk > polyorder {
        debug!("Smoothing window shrunk from {} to {}", window, shrunk);
        Some(shrunk)
    } else {
        None
    }
}

fn dot(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}

///
/// Weights `w` such that `sum(w[i] * y[i])` is the value at sample `at` of the
/// least-squares polynomial of order `polyorder` through samples `0..window`.
///
/// Positions are rescaled to [-1, 1] to keep the normal equations well
/// conditioned.
///
fn fit_weights(window: usize, at: usize, polyorder: usize) -> Option<Vec<f64>> {
    let order = polyorder.min(window - 1) + 1;
    let centre = (window - 1) as f64 / 2.0;
    let scale = if centre > 0.0 { centre } else { 1.0 };
    let x = |i: usize| (i as f64 - centre) / scale;

    let design: Vec<Vec<f64>> = (0..window).map(|i| powers(x(i), order)).collect();

    let mut gram = vec![vec![0.0; order]; order];
    for row in &design {
        for a in 0..order {
            for b in 0..order {
                gram[a][b] += row[a] * row[b];
            }
        }
    }

    let z = solve(gram, powers(x(at), order))?;
    Some(
        design
            .iter()
            .map(|row| row.iter().zip(&z).map(|(a, b)| a * b).sum())
            .collect(),
    )
}

fn powers(x: f64, order: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(order);
    let mut p = 1.0;
    for _ in 0..order {
        out.push(p);
        p *= x;
    }
    out
}

/// Gaussian elimination with partial pivoting. `None` if `a` is singular.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        let pivot_row = a[col].clone();
        let pivot_b = b[col];
        for row in col + 1..n {
            let factor = a[row][col] / pivot_row[col];
            for k in col..n {
                a[row][k] -= factor * pivot_row[k];
            }
            b[row] -= factor * pivot_b;
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            let tol = 1e-8 * e.abs().max(1.0);
            assert!((a - e).abs() < tol, "{a} != {e}");
        }
    }

    #[rstest]
    fn test_preserves_polynomials_up_to_order() {
        let y: Vec<f64> = (0..40)
            .map(|i| {
                let x = i as f64 / 10.0;
                x.powi(5) - 3.0 * x.powi(3) + x - 2.0
            })
            .collect();
        assert_close(&savgol_filter(&y, 17, 5), &y);
    }

    #[rstest]
    fn test_flattens_alternating_noise() {
        let y: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let smoothed = savgol_filter(&y, 17, 2);
        for v in &smoothed[8..22] {
            assert!(v.abs() < 0.2, "{v}");
        }
    }

    #[rstest]
    fn test_matches_known_quadratic_coefficients() {
        // classic 5-point quadratic smoothing weights: (-3, 12, 17, 12, -3) / 35
        let y = vec![0.0, 0.0, 35.0, 0.0, 0.0, 0.0, 0.0];
        let smoothed = savgol_filter(&y, 5, 2);
        assert!((smoothed[2] - 17.0).abs() < 1e-9);
        assert!((smoothed[3] - 12.0).abs() < 1e-9);
        assert!((smoothed[4] + 3.0).abs() < 1e-9);
    }

    #[rstest]
    fn test_short_series_shrinks_window() {
        let y: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        assert_close(&savgol_filter(&y, 17, 5), &y);
    }

    #[rstest]
    fn test_invalid_window_is_unchanged() {
        let y = vec![1.0, 4.0, 2.0, 8.0, 5.0, 7.0];
        assert_eq!(savgol_filter(&y, 4, 2), y);
        assert_eq!(savgol_filter(&y, 3, 3), y);
        assert_eq!(savgol_filter(&y, 0, 0), y);
    }

    #[rstest]
    #[case(vec![1.0, 4.0, 2.0, 8.0])]
    #[case(vec![3.0])]
    #[case(vec![])]
    fn test_too_short_is_unchanged(#[case] y: Vec<f64>) {
        assert_eq!(savgol_filter(&y, 17, 5), y);
    }
}
