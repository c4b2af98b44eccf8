//! Soft-NMS: overlapping candidates are down-weighted instead of removed.
//!
//! Selection pops the best current score from an indexed heap. Every
//! still-queued candidate that overlaps the selection (IoU > 0) is rescaled
//! by the decay policy and re-sifted; a candidate decayed below `min_score`
//! leaves the queue for good. Candidates that never overlap a selection keep
//! their input score, even when it is below `min_score`.

use crate::candidate::heap::ScoreHeap;
use crate::geometry::bbox::BoxSet;
use crate::kernel::Kernel;
use crate::suppress::SoftNmsConfig;
use crate::util::math::cast;
use crate::util::{Element, NmsError, NmsResult};

/// One soft-NMS survivor: its input index and decayed score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftKept<T> {
    pub index: usize,
    pub score: T,
}

/// Runs soft-NMS and returns survivors in selection order.
///
/// The box convention of `boxes` is used as-is; `cfg.convention` only
/// matters to callers that build the [`BoxSet`] from rows.
pub fn soft_nms_scores<K: Kernel, T: Element>(
    boxes: &BoxSet<T>,
    scores: &[T],
    cfg: &SoftNmsConfig,
) -> NmsResult<Vec<SoftKept<T>>> {
    cfg.validate()?;
    if boxes.len() != scores.len() {
        return Err(NmsError::LengthMismatch {
            candidates: boxes.len(),
            scores: scores.len(),
        });
    }

    let iou_thr: T = cast(cfg.iou_thr);
    let sigma: T = cast(cfg.sigma);
    let min_score: T = cast(cfg.min_score);

    let mut heap = ScoreHeap::new(scores.to_vec());
    let mut kept = Vec::with_capacity(heap.len());
    let mut queued: Vec<usize> = (0..scores.len()).collect();
    let mut overlaps = Vec::with_capacity(scores.len());

    while let Some((index, score)) = heap.pop() {
        kept.push(SoftKept { index, score });

        queued.retain(|&j| heap.contains(j));
        if queued.is_empty() {
            break;
        }
        K::pairwise_overlap(boxes, index, &queued, &mut overlaps);
        for (&j, &ov) in queued.iter().zip(overlaps.iter()) {
            if ov <= T::zero() {
                continue;
            }
            let decayed = heap.score(j) * cfg.method.weight(ov, iou_thr, sigma);
            if decayed < min_score {
                heap.remove(j);
            } else {
                heap.set_score(j, decayed);
            }
        }
    }

    Ok(kept)
}
