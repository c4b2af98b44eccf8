//! Execution kernels for the greedy suppression engines.
//!
//! A kernel supplies the two capabilities suppression needs:
//! `pairwise_overlap` scores one anchor against many targets and may run in
//! parallel; `greedy_select` walks a score order and is always sequential,
//! since each removal depends on the previous selection. Every kernel must
//! produce bit-identical overlaps, so kept sets never depend on the backend.

use crate::geometry::PairwiseOverlap;
use crate::util::Element;

/// Backend trait for overlap evaluation and greedy selection.
pub trait Kernel {
    /// Writes `measure.overlap(anchor, t)` for every target into `out`,
    /// replacing its contents and keeping target order.
    fn pairwise_overlap<T: Element, M: PairwiseOverlap<T>>(
        measure: &M,
        anchor: usize,
        targets: &[usize],
        out: &mut Vec<T>,
    );

    /// Hard greedy selection over `order` (best first).
    ///
    /// Each surviving candidate is kept, then every later candidate whose
    /// overlap with it exceeds `thr` is removed. Returns kept indices in
    /// selection order.
    fn greedy_select<T: Element, M: PairwiseOverlap<T>>(
        measure: &M,
        order: &[usize],
        thr: T,
    ) -> Vec<usize> {
        let mut suppressed = vec![false; measure.len()];
        let mut keep = Vec::new();
        let mut targets = Vec::with_capacity(order.len());
        let mut overlaps = Vec::with_capacity(order.len());

        for (pos, &anchor) in order.iter().enumerate() {
            if suppressed[anchor] {
                continue;
            }
            keep.push(anchor);

            targets.clear();
            targets.extend(order[pos + 1..].iter().copied().filter(|&j| !suppressed[j]));
            if targets.is_empty() {
                break;
            }
            Self::pairwise_overlap(measure, anchor, &targets, &mut overlaps);
            for (&j, &ov) in targets.iter().zip(overlaps.iter()) {
                if ov > thr {
                    suppressed[j] = true;
                }
            }
        }

        keep
    }
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use scalar::ScalarKernel;

#[cfg(feature = "rayon")]
pub use self::rayon::RayonKernel;
