//! Typed detection candidates and score ordering.
//!
//! Candidates convert to and from the row layouts the dispatch layer works
//! on: `[x1, y1, x2, y2, score]` for boxes and
//! `[x, y, v] * K, score, area` for keypoint instances.

pub(crate) mod heap;
pub mod order;

use crate::geometry::bbox::BBox;
use crate::geometry::oks::{keypoint_row_width, Keypoint};
use crate::util::{Element, NmsError, NmsResult};
use ndarray::{Array2, ArrayView1};

/// Column holding the score in a box detection row.
pub const BOX_SCORE_COLUMN: usize = 4;

/// One box detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<T> {
    pub bbox: BBox<T>,
    pub score: T,
}

impl<T: Element> Candidate<T> {
    /// Creates a candidate.
    pub fn new(bbox: BBox<T>, score: T) -> Self {
        Self { bbox, score }
    }

    /// Reads `[x1, y1, x2, y2, score, ...]`; extra columns are ignored.
    pub fn from_row(row: ArrayView1<'_, T>) -> NmsResult<Self> {
        if row.len() <= BOX_SCORE_COLUMN {
            return Err(NmsError::ShapeMismatch {
                what: "box detection row",
                expected: BOX_SCORE_COLUMN + 1,
                got: row.len(),
            });
        }
        Ok(Self::new(BBox::from_row(row)?, row[BOX_SCORE_COLUMN]))
    }

    /// Row form `[x1, y1, x2, y2, score]`.
    pub fn to_row(&self) -> [T; 5] {
        [self.bbox.x1, self.bbox.y1, self.bbox.x2, self.bbox.y2, self.score]
    }
}

/// Packs candidates into an `N×5` detection array.
pub fn candidates_to_array<T: Element>(candidates: &[Candidate<T>]) -> Array2<T> {
    Array2::from_shape_fn((candidates.len(), BOX_SCORE_COLUMN + 1), |(i, j)| {
        candidates[i].to_row()[j]
    })
}

/// One pose instance with its score and reference area.
#[derive(Clone, Debug, PartialEq)]
pub struct KeypointCandidate<T> {
    pub keypoints: Vec<Keypoint<T>>,
    pub score: T,
    pub area: T,
}

impl<T: Element> KeypointCandidate<T> {
    /// Creates a keypoint candidate.
    pub fn new(keypoints: Vec<Keypoint<T>>, score: T, area: T) -> Self {
        Self {
            keypoints,
            score,
            area,
        }
    }

    /// Reads a row with `k` keypoints.
    pub fn from_row(row: ArrayView1<'_, T>, k: usize) -> NmsResult<Self> {
        let expected = keypoint_row_width(k);
        if row.len() != expected {
            return Err(NmsError::ShapeMismatch {
                what: "keypoint detection row",
                expected,
                got: row.len(),
            });
        }
        let keypoints = (0..k)
            .map(|kp| Keypoint::new(row[3 * kp], row[3 * kp + 1], row[3 * kp + 2]))
            .collect();
        Ok(Self::new(keypoints, row[3 * k], row[3 * k + 1]))
    }

    fn value(&self, column: usize) -> T {
        let k = self.keypoints.len();
        if column == 3 * k {
            return self.score;
        }
        if column == 3 * k + 1 {
            return self.area;
        }
        let kp = &self.keypoints[column / 3];
        match column % 3 {
            0 => kp.x,
            1 => kp.y,
            _ => kp.v,
        }
    }
}

/// Packs keypoint candidates with `k` keypoints each into an array.
pub fn keypoint_candidates_to_array<T: Element>(
    candidates: &[KeypointCandidate<T>],
    k: usize,
) -> NmsResult<Array2<T>> {
    if let Some(bad) = candidates.iter().find(|c| c.keypoints.len() != k) {
        return Err(NmsError::ShapeMismatch {
            what: "keypoint candidate",
            expected: k,
            got: bad.keypoints.len(),
        });
    }
    Ok(Array2::from_shape_fn(
        (candidates.len(), keypoint_row_width(k)),
        |(i, j)| candidates[i].value(j),
    ))
}
