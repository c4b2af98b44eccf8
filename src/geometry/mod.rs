//! Geometric overlap engine: box IoU/IoF and keypoint OKS.
//!
//! Both measures are exposed through [`PairwiseOverlap`], the seam the
//! execution kernels and the greedy suppression loop are written against.

pub mod bbox;
pub mod oks;

use crate::util::Element;

/// A candidate set that can score the overlap between two of its members.
///
/// `overlap(kept, other)` is not required to be symmetric: the gated OKS
/// measure reads visibility from the kept member only.
pub trait PairwiseOverlap<T: Element>: Sync {
    /// Number of candidates in the set.
    fn len(&self) -> usize;

    /// Returns true when the set is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overlap of candidate `other` against the kept candidate `kept`.
    fn overlap(&self, kept: usize, other: usize) -> T;
}
