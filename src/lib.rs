//! detnms: non-maximum suppression for object and keypoint detections.
//!
//! The crate offers hard NMS, soft-NMS with linear or Gaussian decay, and
//! OKS-NMS over pose keypoints (optionally gated on keypoint visibility).
//! Entry points in [`dispatch`] take host arrays or device-tagged tensors and
//! return kept rows in the same container; the engines underneath work on
//! typed [`BoxSet`]/[`KeypointSet`] values and are generic over an execution
//! [`Kernel`]. The `rayon` feature adds a parallel kernel; the `tracing`
//! feature instruments every entry point.

pub mod candidate;
pub mod dispatch;
pub mod geometry;
pub mod kernel;
pub mod suppress;
mod trace;
pub mod util;

pub use candidate::order::order_desc;
pub use candidate::{
    candidates_to_array, keypoint_candidates_to_array, Candidate, KeypointCandidate,
    BOX_SCORE_COLUMN,
};
pub use dispatch::{
    nms, nms_with, oks_nms, oks_nms_vis, oks_nms_with, soft_nms, soft_nms_with, Detections,
    Device, Suppressed, Tensor,
};
pub use geometry::bbox::{iou, iou_matrix, overlap_matrix, BBox, BoxConvention, BoxSet, OverlapMode};
pub use geometry::oks::{
    keypoint_row_width, oks, Keypoint, KeypointSet, KeypointSigmas, VisibilityPolicy,
    COCO_SIGMAS_TENTHS,
};
pub use geometry::PairwiseOverlap;
#[cfg(feature = "rayon")]
pub use kernel::rayon::overlap_matrix_par;
#[cfg(feature = "rayon")]
pub use kernel::RayonKernel;
pub use kernel::{Kernel, ScalarKernel};
pub use suppress::decay::DecayMethod;
pub use suppress::hard::hard_nms;
pub use suppress::oks::oks_nms_scores;
pub use suppress::soft::{soft_nms_scores, SoftKept};
pub use suppress::{NmsConfig, OksNmsConfig, SoftNmsConfig};
pub use util::{Element, NmsError, NmsResult};
