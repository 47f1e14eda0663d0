//! # hicloop-detrend
//!
//! Turns a raw, noisy Hi-C contact map into an observed / expected map in
//! which every cell measures enrichment relative to the genomic distance law.
//!
//! ## Main Components
//!
//! - **`normalize`**: SCN row/column balancing with removal of low-signal bins
//! - **`despeckle`**: per-diagonal outlier clipping
//! - **`distance_law`**: mean contact intensity per diagonal and its matrix expansion
//! - **`savgol`**: Savitzky-Golay smoothing of the distance law
//! - **`detrend`**: the full pipeline, returning the detrended map and the poor-bin cutoff
//!
//! ## Example
//!
//! ```rust
//! use hicloop_core::models::ContactMatrix;
//! use hicloop_detrend::detrend;
//!
//! let n: usize = 20;
//! let values = (0..n * n)
//!     .map(|k| 50.0 / (1.0 + (k / n).abs_diff(k % n) as f64))
//!     .collect();
//! let matrix = ContactMatrix::from_shape_vec(n, values).unwrap();
//!
//! let result = detrend(matrix);
//! for &bin in &result.poor_bins {
//!     assert!(result.detrended.as_array().row(bin).iter().all(|v| *v == 1.0));
//! }
//! ```
pub mod despeckle;
pub mod detrend;
pub mod distance_law;
pub mod normalize;
pub mod savgol;

// re-exports
pub use despeckle::{DespeckleResult, despeckle};
pub use detrend::{DetrendResult, Detrender, detrend, poor_bin_threshold, poor_bins};
pub use distance_law::{distance_law, distance_law_matrix};
pub use normalize::{scn, scn_with_iterations};
pub use savgol::savgol_filter;
