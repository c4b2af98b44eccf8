//! Object Keypoint Similarity between pose instances.
//!
//! Each keypoint contributes `exp(-d² / (2·area·σ² + ε))`, where `d` is the
//! distance between the two instances' keypoints and `σ` its falloff
//! constant. The score is the mean over the keypoints admitted by a
//! [`VisibilityPolicy`], and 0 when none is admitted.

use crate::geometry::PairwiseOverlap;
use crate::util::math::cast;
use crate::util::{Element, NmsError, NmsResult};
use ndarray::ArrayView2;

/// Per-keypoint falloff constants for the 17 COCO keypoints, as published
/// (ten times the value used in the similarity).
pub const COCO_SIGMAS_TENTHS: [f64; 17] = [
    0.26, 0.25, 0.25, 0.35, 0.35, 0.79, 0.79, 0.72, 0.72, 0.62, 0.62, 1.07, 1.07, 0.87, 0.87,
    0.89, 0.89,
];

/// One keypoint with its visibility flag or confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint<T> {
    pub x: T,
    pub y: T,
    pub v: T,
}

impl<T> Keypoint<T> {
    /// Creates a keypoint.
    pub fn new(x: T, y: T, v: T) -> Self {
        Self { x, y, v }
    }
}

/// Which keypoints take part in the similarity average.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum VisibilityPolicy {
    /// Symmetric: both instances must report visibility > 0.
    #[default]
    Both,
    /// Asymmetric: the kept instance must report visibility >= the
    /// threshold; the other instance's flag is ignored.
    KeptAtLeast(f64),
}

#[derive(Clone, Copy, Debug)]
enum Gate<T> {
    Both,
    KeptAtLeast(T),
}

impl<T: Element> Gate<T> {
    fn from_policy(policy: VisibilityPolicy) -> Self {
        match policy {
            VisibilityPolicy::Both => Gate::Both,
            VisibilityPolicy::KeptAtLeast(thr) => Gate::KeptAtLeast(cast(thr)),
        }
    }

    #[inline]
    fn admits(self, kept: &Keypoint<T>, other: &Keypoint<T>) -> bool {
        match self {
            Gate::Both => kept.v > T::zero() && other.v > T::zero(),
            Gate::KeptAtLeast(thr) => kept.v >= thr,
        }
    }
}

/// Validated per-keypoint falloff constants.
#[derive(Clone, Debug, PartialEq)]
pub struct KeypointSigmas {
    values: Vec<f64>,
}

impl KeypointSigmas {
    /// Wraps sigmas used as-is in the similarity.
    pub fn new(values: Vec<f64>) -> NmsResult<Self> {
        if values.is_empty() {
            return Err(NmsError::InvalidSigmas("at least one sigma is required"));
        }
        if values.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(NmsError::InvalidSigmas("sigmas must be finite and > 0"));
        }
        Ok(Self { values })
    }

    /// Wraps sigmas given in the published ×10 form, dividing each by 10.
    pub fn from_tenths(values: &[f64]) -> NmsResult<Self> {
        Self::new(values.iter().map(|s| s / 10.0).collect())
    }

    /// Sigmas of the 17 COCO person keypoints.
    pub fn coco() -> Self {
        Self {
            values: COCO_SIGMAS_TENTHS.iter().map(|s| s / 10.0).collect(),
        }
    }

    /// Number of keypoints per instance.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated set; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sigma values in keypoint order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn cast_all<T: Element>(&self) -> Vec<T> {
        self.values.iter().map(|&s| cast(s)).collect()
    }
}

/// OKS between a kept instance and another instance, in `[0, 1]`.
///
/// `area` is the scale normalizer; negative areas are treated as zero.
pub fn oks<T: Element>(
    kept: &[Keypoint<T>],
    other: &[Keypoint<T>],
    sigmas: &KeypointSigmas,
    area: T,
    policy: VisibilityPolicy,
) -> NmsResult<T> {
    for instance in [kept, other] {
        if instance.len() != sigmas.len() {
            return Err(NmsError::ShapeMismatch {
                what: "keypoint instance",
                expected: sigmas.len(),
                got: instance.len(),
            });
        }
    }
    Ok(oks_unchecked(
        kept,
        other,
        &sigmas.cast_all::<T>(),
        area,
        Gate::from_policy(policy),
    ))
}

fn oks_unchecked<T: Element>(
    kept: &[Keypoint<T>],
    other: &[Keypoint<T>],
    sigmas: &[T],
    area: T,
    gate: Gate<T>,
) -> T {
    let two = T::one() + T::one();
    let area = area.max(T::zero());
    let mut sum = T::zero();
    let mut count = 0usize;
    for ((a, b), &sigma) in kept.iter().zip(other).zip(sigmas) {
        if !gate.admits(a, b) {
            continue;
        }
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        let e = (dx * dx + dy * dy) / (two * area * sigma * sigma + T::epsilon());
        sum = sum + (-e).exp();
        count += 1;
    }
    if count == 0 {
        return T::zero();
    }
    sum / cast(count as f64)
}

/// Keypoint instances of one candidate set with their areas and sigmas.
#[derive(Clone, Debug)]
pub struct KeypointSet<T> {
    keypoints: Vec<Keypoint<T>>,
    num_keypoints: usize,
    areas: Vec<T>,
    sigmas: Vec<T>,
    gate: Gate<T>,
}

impl<T: Element> KeypointSet<T> {
    /// Builds a set from typed instances; every instance needs one keypoint
    /// per sigma.
    pub fn new(
        instances: &[Vec<Keypoint<T>>],
        areas: Vec<T>,
        sigmas: &KeypointSigmas,
        policy: VisibilityPolicy,
    ) -> NmsResult<Self> {
        if instances.len() != areas.len() {
            return Err(NmsError::LengthMismatch {
                candidates: instances.len(),
                scores: areas.len(),
            });
        }
        let k = sigmas.len();
        let mut keypoints = Vec::with_capacity(instances.len() * k);
        for instance in instances {
            if instance.len() != k {
                return Err(NmsError::ShapeMismatch {
                    what: "keypoint instance",
                    expected: k,
                    got: instance.len(),
                });
            }
            keypoints.extend_from_slice(instance);
        }
        Ok(Self {
            keypoints,
            num_keypoints: k,
            areas,
            sigmas: sigmas.cast_all(),
            gate: Gate::from_policy(policy),
        })
    }

    /// Builds a set from rows laid out as `[x, y, v] * K, score, area`.
    pub fn from_rows(
        rows: ArrayView2<'_, T>,
        sigmas: &KeypointSigmas,
        policy: VisibilityPolicy,
    ) -> NmsResult<Self> {
        let k = sigmas.len();
        let expected = keypoint_row_width(k);
        if rows.ncols() != expected {
            return Err(NmsError::ShapeMismatch {
                what: "keypoint rows",
                expected,
                got: rows.ncols(),
            });
        }
        let mut keypoints = Vec::with_capacity(rows.nrows() * k);
        let mut areas = Vec::with_capacity(rows.nrows());
        for row in rows.rows() {
            for kp in 0..k {
                keypoints.push(Keypoint::new(row[3 * kp], row[3 * kp + 1], row[3 * kp + 2]));
            }
            areas.push(row[3 * k + 1]);
        }
        Ok(Self {
            keypoints,
            num_keypoints: k,
            areas,
            sigmas: sigmas.cast_all(),
            gate: Gate::from_policy(policy),
        })
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Returns true when the set holds no instances.
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Keypoints per instance.
    pub fn num_keypoints(&self) -> usize {
        self.num_keypoints
    }

    /// Keypoints of instance `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn instance(&self, index: usize) -> &[Keypoint<T>] {
        let start = index * self.num_keypoints;
        &self.keypoints[start..start + self.num_keypoints]
    }

    /// Reference area of instance `index`.
    pub fn area(&self, index: usize) -> T {
        self.areas[index]
    }

    /// OKS of instance `other` against kept instance `kept`, normalized by
    /// the mean of their areas.
    pub fn oks(&self, kept: usize, other: usize) -> T {
        let two = T::one() + T::one();
        let area = (self.areas[kept] + self.areas[other]) / two;
        oks_unchecked(
            self.instance(kept),
            self.instance(other),
            &self.sigmas,
            area,
            self.gate,
        )
    }
}

impl<T: Element> PairwiseOverlap<T> for KeypointSet<T> {
    fn len(&self) -> usize {
        self.areas.len()
    }

    fn overlap(&self, kept: usize, other: usize) -> T {
        self.oks(kept, other)
    }
}

/// Column count of a keypoint detection row with `k` keypoints.
pub fn keypoint_row_width(k: usize) -> usize {
    3 * k + 2
}
