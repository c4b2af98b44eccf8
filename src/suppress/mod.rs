//! Greedy suppression engines and their configuration.
//!
//! Hard NMS and OKS-NMS share one greedy loop over a precomputed score
//! order; soft-NMS re-ranks after every selection through an indexed heap.

pub mod decay;
pub mod hard;
pub mod oks;
pub mod soft;

use crate::geometry::bbox::BoxConvention;
use crate::geometry::oks::{KeypointSigmas, VisibilityPolicy};
use crate::util::math::{check_non_negative, check_positive, check_unit_interval};
use crate::util::{NmsError, NmsResult};
use decay::DecayMethod;

/// Configuration for hard NMS.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NmsConfig {
    /// Candidates whose IoU with a kept box exceeds this are removed.
    pub iou_thr: f64,
    /// Extent convention used for box areas.
    pub convention: BoxConvention,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            iou_thr: 0.5,
            convention: BoxConvention::Pixel,
        }
    }
}

impl NmsConfig {
    /// Default configuration with the given IoU threshold.
    pub fn new(iou_thr: f64) -> Self {
        Self {
            iou_thr,
            ..Self::default()
        }
    }

    /// Checks that `iou_thr` lies in `[0, 1]`.
    pub fn validate(&self) -> NmsResult<()> {
        check_unit_interval("iou_thr", self.iou_thr)
    }
}

/// Configuration for soft-NMS.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoftNmsConfig {
    /// Gate for linear decay; ignored by Gaussian decay.
    pub iou_thr: f64,
    /// Decay policy.
    pub method: DecayMethod,
    /// Spread of the Gaussian decay.
    pub sigma: f64,
    /// Candidates decayed below this score are discarded.
    pub min_score: f64,
    /// Extent convention used for box areas.
    pub convention: BoxConvention,
}

impl Default for SoftNmsConfig {
    fn default() -> Self {
        Self {
            iou_thr: 0.3,
            method: DecayMethod::Linear,
            sigma: 0.5,
            min_score: 1e-3,
            convention: BoxConvention::Pixel,
        }
    }
}

impl SoftNmsConfig {
    /// Validates thresholds: `iou_thr ∈ [0, 1]`, `sigma > 0`, `min_score ≥ 0`.
    pub fn validate(&self) -> NmsResult<()> {
        check_unit_interval("iou_thr", self.iou_thr)?;
        check_positive("sigma", self.sigma)?;
        check_non_negative("min_score", self.min_score)
    }
}

/// Configuration for OKS-NMS.
#[derive(Clone, Debug, PartialEq)]
pub struct OksNmsConfig {
    /// Candidates whose OKS with a kept instance exceeds this are removed.
    pub iou_thr: f64,
    /// Per-keypoint falloff constants; also fixes the keypoint count.
    pub sigmas: KeypointSigmas,
    /// Which keypoints take part in the similarity.
    pub visibility: VisibilityPolicy,
}

impl Default for OksNmsConfig {
    fn default() -> Self {
        Self {
            iou_thr: 0.9,
            sigmas: KeypointSigmas::coco(),
            visibility: VisibilityPolicy::Both,
        }
    }
}

impl OksNmsConfig {
    /// Checks the threshold and the visibility gate.
    pub fn validate(&self) -> NmsResult<()> {
        check_unit_interval("iou_thr", self.iou_thr)?;
        if let VisibilityPolicy::KeptAtLeast(vis_thr) = self.visibility {
            if !vis_thr.is_finite() {
                return Err(NmsError::InvalidThreshold {
                    name: "vis_thr",
                    value: vis_thr,
                    expected: "a finite value",
                });
            }
        }
        Ok(())
    }
}
