//! # hicloop-core
//!
//! Shared building blocks for the hicloop crates.
//!
//! ## Main Components
//!
//! - **`ContactMatrix`**: a square Hi-C contact map backed by an `ndarray::Array2<f64>`
//! - **`utils`**: median, mean and population standard deviation
//! - **`config`**: tunable constants for detrending and peak picking, loadable from TOML
//!
//! ## Example
//!
//! ```rust
//! use hicloop_core::models::ContactMatrix;
//!
//! let matrix = ContactMatrix::try_from(vec![
//!     vec![4.0, 1.0],
//!     vec![1.0, 4.0],
//! ]).unwrap();
//!
//! assert_eq!(matrix.n_bins(), 2);
//! ```
pub mod config;
pub mod errors;
pub mod models;
pub mod utils;

pub use config::*;
pub use errors::*;
