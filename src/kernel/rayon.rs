//! Rayon-parallel kernel (feature-gated).
//!
//! Only overlap evaluation is parallel: one anchor against its remaining
//! targets, or whole rows of an overlap matrix. Selection stays sequential
//! through the trait's default `greedy_select`.

use crate::geometry::bbox::{check_same_convention, fill_overlap_row, BoxSet, OverlapMode};
use crate::geometry::PairwiseOverlap;
use crate::kernel::Kernel;
use crate::util::{Element, NmsResult};
use ndarray::{Array2, Axis};
use rayon::prelude::*;

/// Below this many targets the kernel stays on the calling thread.
const PAR_MIN_TARGETS: usize = 64;

/// Data-parallel kernel backing accelerator-resident inputs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonKernel;

impl Kernel for RayonKernel {
    fn pairwise_overlap<T: Element, M: PairwiseOverlap<T>>(
        measure: &M,
        anchor: usize,
        targets: &[usize],
        out: &mut Vec<T>,
    ) {
        if targets.len() < PAR_MIN_TARGETS {
            out.clear();
            out.extend(targets.iter().map(|&j| measure.overlap(anchor, j)));
            return;
        }
        targets
            .par_iter()
            .map(|&j| measure.overlap(anchor, j))
            .collect_into_vec(out);
    }
}

/// Row-parallel version of [`crate::overlap_matrix`] with identical output.
pub fn overlap_matrix_par<T: Element>(
    a: &BoxSet<T>,
    b: &BoxSet<T>,
    mode: OverlapMode,
) -> NmsResult<Array2<T>> {
    check_same_convention(a, b)?;
    let mut out = Array2::zeros((a.len(), b.len()));
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, row)| fill_overlap_row(a, i, b, mode, row));
    Ok(out)
}
