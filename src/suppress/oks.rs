//! Keypoint NMS driven by Object Keypoint Similarity.
//!
//! The plain and visibility-gated variants differ only in the
//! [`VisibilityPolicy`](crate::geometry::oks::VisibilityPolicy) baked into
//! the [`KeypointSet`]; both run the same greedy loop as hard NMS.

use crate::geometry::oks::KeypointSet;
use crate::kernel::Kernel;
use crate::suppress::hard::greedy_nms;
use crate::util::{Element, NmsResult};

/// OKS-NMS: keeps the best instance, drops every remaining instance whose
/// OKS with it exceeds `oks_thr`, and repeats.
pub fn oks_nms_scores<K: Kernel, T: Element>(
    keypoints: &KeypointSet<T>,
    scores: &[T],
    oks_thr: f64,
) -> NmsResult<Vec<usize>> {
    greedy_nms::<K, T, _>(keypoints, scores, oks_thr)
}
