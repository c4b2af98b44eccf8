//! Container-level entry points.
//!
//! Each function reads rows from a [`Detections`] value, picks the kernel
//! from the input's device, runs the matching suppression engine and returns
//! the kept rows in the input's container family together with their input
//! indices.

pub mod repr;

use crate::candidate::BOX_SCORE_COLUMN;
use crate::geometry::bbox::BoxSet;
use crate::geometry::oks::{keypoint_row_width, KeypointSet, KeypointSigmas, VisibilityPolicy};
use crate::kernel::ScalarKernel;
use crate::suppress::decay::DecayMethod;
use crate::suppress::hard::hard_nms;
use crate::suppress::oks::oks_nms_scores;
use crate::suppress::soft::{soft_nms_scores, SoftKept};
use crate::suppress::{NmsConfig, OksNmsConfig, SoftNmsConfig};
use crate::trace::{trace_event, trace_span};
use crate::util::{Element, NmsError, NmsResult};
use ndarray::{ArrayView2, Axis};
pub use repr::{Detections, Device, Tensor};

#[cfg(feature = "rayon")]
use crate::kernel::RayonKernel;

/// Kept candidates and their 0-based input indices.
pub type Suppressed<T> = (Detections<T>, Vec<usize>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    Scalar,
    #[cfg(feature = "rayon")]
    Parallel,
}

fn resolve_backend(device: Device) -> NmsResult<Backend> {
    match device {
        Device::Host => Ok(Backend::Scalar),
        #[cfg(feature = "rayon")]
        Device::Accelerator(_) => Ok(Backend::Parallel),
        #[cfg(not(feature = "rayon"))]
        Device::Accelerator(_) => Err(NmsError::BackendUnavailable(
            "accelerator placement requires the `rayon` feature",
        )),
    }
}

fn check_box_rows<T>(rows: ArrayView2<'_, T>) -> NmsResult<()> {
    if rows.ncols() <= BOX_SCORE_COLUMN {
        return Err(NmsError::ShapeMismatch {
            what: "box detection rows",
            expected: BOX_SCORE_COLUMN + 1,
            got: rows.ncols(),
        });
    }
    Ok(())
}

fn gather<T: Element>(dets: &Detections<T>, indices: &[usize]) -> Detections<T> {
    dets.like(dets.view().select(Axis(0), indices))
}

/// Hard NMS with the default box convention.
///
/// Rows are `[x1, y1, x2, y2, score, extra...]`; extra columns are carried
/// through untouched.
pub fn nms<T: Element>(
    dets: &Detections<T>,
    iou_thr: f64,
    device_id: Option<usize>,
) -> NmsResult<Suppressed<T>> {
    nms_with(dets, &NmsConfig::new(iou_thr), device_id)
}

/// Hard NMS with an explicit configuration.
pub fn nms_with<T: Element>(
    dets: &Detections<T>,
    cfg: &NmsConfig,
    device_id: Option<usize>,
) -> NmsResult<Suppressed<T>> {
    let _span = trace_span!("nms", candidates = dets.nrows(), iou_thr = cfg.iou_thr).entered();
    cfg.validate()?;
    let backend = resolve_backend(dets.residency(device_id))?;
    if dets.is_empty() {
        return Ok((gather(dets, &[]), Vec::new()));
    }

    let rows = dets.view();
    check_box_rows(rows)?;
    let boxes = BoxSet::from_rows(rows, cfg.convention)?;
    let scores = rows.column(BOX_SCORE_COLUMN).to_vec();
    let keep = match backend {
        Backend::Scalar => hard_nms::<ScalarKernel, T>(&boxes, &scores, cfg.iou_thr)?,
        #[cfg(feature = "rayon")]
        Backend::Parallel => hard_nms::<RayonKernel, T>(&boxes, &scores, cfg.iou_thr)?,
    };

    trace_event!("nms.done", candidates = rows.nrows(), kept = keep.len());
    Ok((gather(dets, &keep), keep))
}

/// Soft-NMS with the default box convention.
///
/// `method` is `"linear"` or `"gaussian"`. Kept rows carry their decayed
/// score in the score column and are listed in selection order.
pub fn soft_nms<T: Element>(
    dets: &Detections<T>,
    iou_thr: f64,
    method: &str,
    sigma: f64,
    min_score: f64,
) -> NmsResult<Suppressed<T>> {
    let cfg = SoftNmsConfig {
        iou_thr,
        method: method.parse::<DecayMethod>()?,
        sigma,
        min_score,
        ..SoftNmsConfig::default()
    };
    soft_nms_with(dets, &cfg)
}

/// Soft-NMS with an explicit configuration. The kernel follows the
/// container's own residency.
pub fn soft_nms_with<T: Element>(
    dets: &Detections<T>,
    cfg: &SoftNmsConfig,
) -> NmsResult<Suppressed<T>> {
    let _span = trace_span!(
        "soft_nms",
        candidates = dets.nrows(),
        method = cfg.method.as_str()
    )
    .entered();
    cfg.validate()?;
    let backend = resolve_backend(dets.residency(None))?;
    if dets.is_empty() {
        return Ok((gather(dets, &[]), Vec::new()));
    }

    let rows = dets.view();
    check_box_rows(rows)?;
    let boxes = BoxSet::from_rows(rows, cfg.convention)?;
    let scores = rows.column(BOX_SCORE_COLUMN).to_vec();
    let kept = match backend {
        Backend::Scalar => soft_nms_scores::<ScalarKernel, T>(&boxes, &scores, cfg)?,
        #[cfg(feature = "rayon")]
        Backend::Parallel => soft_nms_scores::<RayonKernel, T>(&boxes, &scores, cfg)?,
    };

    let indices: Vec<usize> = kept.iter().map(|k| k.index).collect();
    let mut out = rows.select(Axis(0), &indices);
    for (mut row, SoftKept { score, .. }) in out.axis_iter_mut(Axis(0)).zip(kept) {
        row[BOX_SCORE_COLUMN] = score;
    }

    trace_event!("soft_nms.done", candidates = rows.nrows(), kept = indices.len());
    Ok((dets.like(out), indices))
}

/// OKS-NMS over keypoint rows `[x, y, v] * K, score, area`.
///
/// `sigmas` are given in tenths, one per keypoint, as in the COCO table.
pub fn oks_nms<T: Element>(
    kpts: &Detections<T>,
    iou_thr: f64,
    sigmas: &[f64],
    device_id: Option<usize>,
) -> NmsResult<Suppressed<T>> {
    let cfg = OksNmsConfig {
        iou_thr,
        sigmas: KeypointSigmas::from_tenths(sigmas)?,
        visibility: VisibilityPolicy::Both,
    };
    oks_nms_with(kpts, &cfg, device_id)
}

/// OKS-NMS that only scores keypoints the kept instance sees with
/// visibility at least `vis_thr`.
pub fn oks_nms_vis<T: Element>(
    kpts: &Detections<T>,
    iou_thr: f64,
    sigmas: &[f64],
    vis_thr: f64,
    device_id: Option<usize>,
) -> NmsResult<Suppressed<T>> {
    let cfg = OksNmsConfig {
        iou_thr,
        sigmas: KeypointSigmas::from_tenths(sigmas)?,
        visibility: VisibilityPolicy::KeptAtLeast(vis_thr),
    };
    oks_nms_with(kpts, &cfg, device_id)
}

/// OKS-NMS with an explicit configuration.
pub fn oks_nms_with<T: Element>(
    kpts: &Detections<T>,
    cfg: &OksNmsConfig,
    device_id: Option<usize>,
) -> NmsResult<Suppressed<T>> {
    let _span = trace_span!(
        "oks_nms",
        candidates = kpts.nrows(),
        keypoints = cfg.sigmas.len()
    )
    .entered();
    cfg.validate()?;
    let backend = resolve_backend(kpts.residency(device_id))?;
    if kpts.is_empty() {
        return Ok((gather(kpts, &[]), Vec::new()));
    }

    let rows = kpts.view();
    let set = KeypointSet::from_rows(rows, &cfg.sigmas, cfg.visibility)?;
    let score_column = keypoint_row_width(set.num_keypoints()) - 2;
    let scores = rows.column(score_column).to_vec();
    let keep = match backend {
        Backend::Scalar => oks_nms_scores::<ScalarKernel, T>(&set, &scores, cfg.iou_thr)?,
        #[cfg(feature = "rayon")]
        Backend::Parallel => oks_nms_scores::<RayonKernel, T>(&set, &scores, cfg.iou_thr)?,
    };

    trace_event!("oks_nms.done", candidates = rows.nrows(), kept = keep.len());
    Ok((gather(kpts, &keep), keep))
}
