//! # hicloop
//!
//! Detrending and loop detection for Hi-C contact maps.
//!
//! The individual stages live in their own crates and are re-exported here
//! behind features:
//!
//! - `core` (always on): [ContactMatrix](core::models::ContactMatrix), statistics, configuration
//! - `detrend`: normalization, despeckling and distance-law detrending
//! - `pattern`: template correlation and peak picking
//!
//! With both `detrend` and `pattern` enabled, [scan::LoopScanner] runs the
//! whole pipeline from a raw contact map to loop coordinates.

#[doc(inline)]
pub use hicloop_core as core;

#[cfg(feature = "detrend")]
#[doc(inline)]
pub use hicloop_detrend as detrend;

#[cfg(feature = "pattern")]
#[doc(inline)]
pub use hicloop_pattern as pattern;

#[cfg(all(feature = "detrend", feature = "pattern"))]
pub mod scan;

#[cfg(all(feature = "detrend", feature = "pattern"))]
pub use scan::{LoopScanner, ScanResult};
