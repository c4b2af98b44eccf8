//! Single-threaded reference kernel.

use crate::geometry::PairwiseOverlap;
use crate::kernel::Kernel;
use crate::util::Element;

/// Plain loop over targets; the reference every other kernel must match.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn pairwise_overlap<T: Element, M: PairwiseOverlap<T>>(
        measure: &M,
        anchor: usize,
        targets: &[usize],
        out: &mut Vec<T>,
    ) {
        out.clear();
        out.extend(targets.iter().map(|&j| measure.overlap(anchor, j)));
    }
}
