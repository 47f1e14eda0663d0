//! Distance-law detrending of a raw contact map.
//!
//! Pipeline: poor-bin detection → SCN normalization → despeckling →
//! distance law → Savitzky-Golay smoothing → division by the expected
//! contact matrix. Cells that come out undefined or negative, and every row
//! and column of a poor bin, are set to the neutral value 1.0.

use hicloop_core::config::DetrendConfig;
use hicloop_core::errors::ConfigResult;
use hicloop_core::models::ContactMatrix;
use hicloop_core::utils::{median, std_dev};
use log::{debug, info};
use ndarray::{Array1, Zip};

use crate::despeckle::despeckle;
use crate::distance_law::{distance_law, distance_law_matrix};
use crate::normalize::scn_with_iterations;
use crate::savgol::savgol_filter;

/// Output of a detrending run.
#[derive(Debug, Clone)]
pub struct DetrendResult {
    /// Observed / expected contact map.
    pub detrended: ContactMatrix,
    /// Column-sum cutoff used to flag poor bins.
    pub threshold: f64,
    /// Bins whose rows and columns were neutralized, ascending.
    pub poor_bins: Vec<usize>,
    /// Number of speckles removed before estimating the distance law.
    pub speckles: usize,
    /// Smoothed distance law the map was divided by.
    pub expected: Array1<f64>,
}

///
/// Column-sum cutoff for poor bins: `median - stddevs * stddev` of the column
/// sums.
///
pub fn poor_bin_threshold(matrix: &ContactMatrix, stddevs: f64) -> f64 {
    let sums = matrix.col_sums().to_vec();
    median(&sums) - stddevs * std_dev(&sums)
}

/// Bins whose column sum is at or below `threshold`.
pub fn poor_bins(matrix: &ContactMatrix, threshold: f64) -> Vec<usize> {
    matrix
        .col_sums()
        .iter()
        .enumerate()
        .filter(|(_, s)| **s <= threshold)
        .map(|(i, _)| i)
        .collect()
}

///
/// Detrend a contact map with the default constants.
///
/// # Example
///
/// ```rust
/// use hicloop_core::models::ContactMatrix;
/// use hicloop_detrend::detrend;
///
/// let n: usize = 24;
/// let values = (0..n * n)
///     .map(|k| 100.0 / (1.0 + (k / n).abs_diff(k % n) as f64))
///     .collect();
/// let matrix = ContactMatrix::from_shape_vec(n, values).unwrap();
///
/// let result = detrend(matrix);
/// assert_eq!(result.detrended.n_bins(), n);
/// ```
pub fn detrend(matrix: ContactMatrix) -> DetrendResult {
    Detrender::default().detrend(matrix)
}

/// Observed over expected, with undefined or negative ratios set to 1.
fn neutral_ratio(observed: f64, expected: f64) -> f64 {
    let ratio = observed / expected;
    if ratio.is_nan() || ratio < 0.0 { 1.0 } else { ratio }
}

/// Detrending with validated, possibly non-default constants.
#[derive(Debug, Clone, Default)]
pub struct Detrender {
    config: DetrendConfig,
}

impl Detrender {
    pub fn new(config: DetrendConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Detrender { config })
    }

    pub fn config(&self) -> &DetrendConfig {
        &self.config
    }

    pub fn detrend(&self, matrix: ContactMatrix) -> DetrendResult {
        let n = matrix.n_bins();

        let threshold = poor_bin_threshold(&matrix, self.config.poor_bin_stddevs);
        let poor = poor_bins(&matrix, threshold);
        info!(
            "Poor bin threshold {:.4}: {} of {} bins neutralized",
            threshold,
            poor.len(),
            n
        );

        let normalized = scn_with_iterations(matrix, threshold, self.config.scn_iterations);
        let despeckled = despeckle(normalized, self.config.speckle_threshold);
        debug!("Removed {} speckles", despeckled.n_speckles);
        let speckles = despeckled.n_speckles;
        let matrix = despeckled.matrix;

        let mut law = distance_law(&matrix);
        law.mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
        let expected = Array1::from(savgol_filter(
            &law.to_vec(),
            self.config.savgol_window,
            self.config.savgol_polyorder,
        ));

        let trend = distance_law_matrix(&expected);
        let mut detrended = matrix;
        Zip::from(detrended.as_array_mut())
            .and(&trend)
            .for_each(|obs, exp| *obs = neutral_ratio(*obs, *exp));

        let data = detrended.as_array_mut();
        for &bin in &poor {
            data.row_mut(bin).fill(1.0);
            data.column_mut(bin).fill(1.0);
        }

        DetrendResult {
            detrended,
            threshold,
            poor_bins: poor,
            speckles,
            expected,
        }
    }
}
