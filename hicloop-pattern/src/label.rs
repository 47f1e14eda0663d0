//! Connected-component labeling of boolean masks.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};

///
/// Label the 4-connected foreground components of `mask`.
///
/// Background cells get label 0. Components are numbered from 1 in raster
/// order of their first (top-most, then left-most) cell.
///
/// # Returns
/// The label image and the number of components.
///
pub fn label_components(mask: ArrayView2<bool>) -> (Array2<usize>, usize) {
    let (rows, cols) = mask.dim();
    let mut labels = Array2::<usize>::zeros((rows, cols));
    let mut n_labels = 0;
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for ((i, j), &fg) in mask.indexed_iter() {
        if !fg || labels[[i, j]] != 0 {
            continue;
        }
        n_labels += 1;
        labels[[i, j]] = n_labels;
        queue.push_back((i, j));

        while let Some((ci, cj)) = queue.pop_front() {
            let neighbours = [
                ci.checked_sub(1).map(|ni| (ni, cj)),
                (ci + 1 < rows).then_some((ci + 1, cj)),
                cj.checked_sub(1).map(|nj| (ci, nj)),
                (cj + 1 < cols).then_some((ci, cj + 1)),
            ];
            for (ni, nj) in neighbours.into_iter().flatten() {
                if mask[[ni, nj]] && labels[[ni, nj]] == 0 {
                    labels[[ni, nj]] = n_labels;
                    queue.push_back((ni, nj));
                }
            }
        }
    }

    (labels, n_labels)
}
