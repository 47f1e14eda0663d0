//! # hicloop-pattern
//!
//! Template matching on detrended contact maps.
//!
//! ## Main Components
//!
//! - **`xcorr`**: sliding 2D cross-correlation, centered or valid-only
//! - **`corrcoef`**: local Pearson correlation between the map and a kernel
//! - **`label`**: 4-connected component labeling of boolean masks
//! - **`picker`**: one representative pixel per blob of a probability map
//!
//! ## Example
//!
//! ```rust
//! use ndarray::Array2;
//! use hicloop_pattern::{Peaks, pick_peaks};
//!
//! let mut probas = Array2::<f64>::zeros((5, 5));
//! probas[[2, 2]] = 0.9;
//! probas[[2, 3]] = 0.95;
//!
//! let peaks = pick_peaks(probas.view(), 0.8).unwrap();
//! assert_eq!(peaks, Peaks::Found(vec![(2, 3)]));
//! ```
pub mod corrcoef;
pub mod errors;
pub mod label;
pub mod picker;
pub mod xcorr;

// re-export things
pub use corrcoef::*;
pub use errors::*;
pub use label::*;
pub use picker::*;
pub use xcorr::*;
