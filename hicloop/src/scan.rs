//! End-to-end loop scan: detrend a contact map, correlate it with a loop
//! template and pick one pixel per blob of high correlation.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use ndarray::{Array2, ArrayView2};

use hicloop_core::config::ScanConfig;
use hicloop_core::models::ContactMatrix;
use hicloop_detrend::{DetrendResult, Detrender};
use hicloop_pattern::{
    Alignment, Peaks, check_kernel, corrcoef2d, correlation_to_probability, pick_peaks,
};

/// Everything produced by [LoopScanner::scan].
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub detrend: DetrendResult,
    /// Pearson correlation between the detrended map and the kernel.
    pub correlation: Array2<f64>,
    /// `correlation` with undefined cells set to 0 and values clamped to [0, 1].
    pub probabilities: Array2<f64>,
    pub peaks: Peaks,
}

#[derive(Debug, Clone, Default)]
pub struct LoopScanner {
    config: ScanConfig,
    detrender: Detrender,
}

impl TryFrom<&Path> for LoopScanner {
    type Error = anyhow::Error;

    ///
    /// Create a new [LoopScanner] from a TOML configuration file.
    ///
    fn try_from(path: &Path) -> Result<Self> {
        let config = ScanConfig::try_from(path)
            .with_context(|| format!("Failed to load scan configuration from {}", path.display()))?;
        LoopScanner::new(config)
    }
}

impl LoopScanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate().context("Invalid scan configuration")?;
        let detrender = Detrender::new(config.detrend.clone())?;
        Ok(LoopScanner { config, detrender })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn alignment(&self) -> Alignment {
        if self.config.centered {
            Alignment::Centered
        } else {
            Alignment::Valid
        }
    }

    ///
    /// Scan a raw contact map for occurrences of `kernel`.
    ///
    /// The kernel is checked against the map before any work is done.
    ///
    pub fn scan(&self, matrix: ContactMatrix, kernel: ArrayView2<f64>) -> Result<ScanResult> {
        check_kernel(&matrix.view(), &kernel).context("Kernel does not fit the contact map")?;

        let detrend = self.detrender.detrend(matrix);

        let correlation = corrcoef2d(detrend.detrended.view(), kernel, self.alignment())
            .context("Failed to correlate the detrended map with the kernel")?;
        let probabilities = correlation_to_probability(&correlation);

        let peaks = pick_peaks(probabilities.view(), self.config.picker.threshold)
            .context("Failed to pick peaks")?;

        match &peaks {
            Peaks::Found(coords) => info!("Detected {} loops", coords.len()),
            Peaks::NoCandidates => info!(
                "No pixel correlates above {}",
                self.config.picker.threshold
            ),
        }

        Ok(ScanResult {
            detrend,
            correlation,
            probabilities,
            peaks,
        })
    }
}
