//! Hard non-maximum suppression.

use crate::candidate::order::order_desc;
use crate::geometry::bbox::BoxSet;
use crate::geometry::PairwiseOverlap;
use crate::kernel::Kernel;
use crate::util::math::{cast, check_unit_interval};
use crate::util::{Element, NmsError, NmsResult};

/// Greedy suppression over any pairwise measure.
///
/// Returns kept indices by descending score, ties in input order.
pub(crate) fn greedy_nms<K: Kernel, T: Element, M: PairwiseOverlap<T>>(
    measure: &M,
    scores: &[T],
    thr: f64,
) -> NmsResult<Vec<usize>> {
    check_unit_interval("iou_thr", thr)?;
    if measure.len() != scores.len() {
        return Err(NmsError::LengthMismatch {
            candidates: measure.len(),
            scores: scores.len(),
        });
    }
    if scores.is_empty() {
        return Ok(Vec::new());
    }
    let order = order_desc(scores);
    Ok(K::greedy_select(measure, &order, cast(thr)))
}

/// Hard NMS on boxes: keeps the best box, drops every remaining box whose
/// IoU with it exceeds `iou_thr`, and repeats.
///
/// The output lists kept indices by descending score; equal scores keep
/// their input order.
pub fn hard_nms<K: Kernel, T: Element>(
    boxes: &BoxSet<T>,
    scores: &[T],
    iou_thr: f64,
) -> NmsResult<Vec<usize>> {
    greedy_nms::<K, T, _>(boxes, scores, iou_thr)
}
