//! Peak picking on probability maps.

use hicloop_core::config::DEFAULT_PICKER_THRESHOLD;
use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::errors::{PatternError, PatternResult};
use crate::label::label_components;

///
/// Outcome of [pick_peaks].
///
/// `NoCandidates` means no pixel passed the threshold at all, so no blob was
/// ever labeled. `Found` may still be empty when every blob was discarded.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Peaks {
    Found(Vec<(usize, usize)>),
    NoCandidates,
}

impl Peaks {
    /// Coordinates of the picked pixels, empty for `NoCandidates`.
    pub fn coords(&self) -> &[(usize, usize)] {
        match self {
            Peaks::Found(coords) => coords,
            Peaks::NoCandidates => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.coords().len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords().is_empty()
    }
}

///
/// Reject probability maps with values outside [0, 1]. Values above one are
/// reported first. `NaN` cells are accepted and never become candidates.
///
pub fn validate_probabilities(probas: &ArrayView2<f64>) -> PatternResult<()> {
    if let Some(((row, col), &value)) = probas.indexed_iter().find(|(_, v)| **v > 1.0) {
        return Err(PatternError::ProbabilityAboveOne { row, col, value });
    }
    if let Some(((row, col), &value)) = probas.indexed_iter().find(|(_, v)| **v < 0.0) {
        return Err(PatternError::ProbabilityBelowZero { row, col, value });
    }
    Ok(())
}

/// [pick_peaks] at the default threshold of 0.8.
pub fn pick_peaks_default(probas: ArrayView2<f64>) -> PatternResult<Peaks> {
    pick_peaks(probas, DEFAULT_PICKER_THRESHOLD)
}

///
/// Pick one pixel per blob of high probability.
///
/// Pixels strictly above `threshold` are grouped into 4-connected blobs.
/// Single-pixel blobs are dropped as noise; every other blob contributes its
/// most probable pixel (the first one in raster order on ties). Peaks are
/// returned in raster order of each blob's first pixel.
///
/// # Arguments
/// - probas: probability of each pixel being a loop, all values in [0, 1]
/// - threshold: candidate cutoff
///
/// # Returns
/// [Peaks::NoCandidates] when no pixel exceeds `threshold`, otherwise the
/// picked coordinates. Fails before any labeling if a value lies outside
/// [0, 1].
///
pub fn pick_peaks(probas: ArrayView2<f64>, threshold: f64) -> PatternResult<Peaks> {
    validate_probabilities(&probas)?;

    let candidates: Vec<(usize, usize)> = probas
        .indexed_iter()
        .filter(|(_, v)| **v > threshold)
        .map(|(ij, _)| ij)
        .collect();

    if candidates.is_empty() {
        debug!("No pixel above {}", threshold);
        return Ok(Peaks::NoCandidates);
    }

    // the mask only needs to reach the bottom-right-most candidate
    let max_i = candidates.iter().map(|(i, _)| *i).max().unwrap_or(0);
    let max_j = candidates.iter().map(|(_, j)| *j).max().unwrap_or(0);
    let mut mask = Array2::<bool>::from_elem((max_i + 1, max_j + 1), false);
    for &(i, j) in &candidates {
        mask[[i, j]] = true;
    }

    let (labels, n_labels) = label_components(mask.view());

    let mut blobs: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n_labels];
    for ((i, j), &label) in labels.indexed_iter() {
        if label > 0 {
            blobs[label - 1].push((i, j));
        }
    }

    let mut peaks = Vec::with_capacity(n_labels);
    for blob in &blobs {
        let n_candidates = blob.iter().filter(|&&(i, j)| mask[[i, j]]).count();
        if n_candidates == 0 || blob.len() == 1 {
            continue;
        }

        let mut best = blob[0];
        for &(i, j) in &blob[1..] {
            if probas[[i, j]] > probas[[best.0, best.1]] {
                best = (i, j);
            }
        }
        peaks.push(best);
    }

    debug!(
        "{} candidates in {} blobs, {} peaks kept",
        candidates.len(),
        n_labels,
        peaks.len()
    );

    Ok(Peaks::Found(peaks))
}
