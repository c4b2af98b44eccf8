//! Axis-aligned boxes and the IoU/IoF overlap engine.
//!
//! Box areas are cached once per [`BoxSet`], so suppression loops and crop
//! checks never re-derive them per pair.

use crate::geometry::PairwiseOverlap;
use crate::util::{Element, NmsError, NmsResult};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

/// Coordinate convention used to measure box extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoxConvention {
    /// Extents are `x2 - x1`; boxes live on a continuous plane.
    Continuous,
    /// Extents are `x2 - x1 + 1`; corners are inclusive pixel indices.
    #[default]
    Pixel,
}

impl BoxConvention {
    /// Returns the value added to every extent.
    pub fn offset<T: Element>(self) -> T {
        match self {
            BoxConvention::Continuous => T::zero(),
            BoxConvention::Pixel => T::one(),
        }
    }
}

/// Denominator used when normalizing an intersection area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapMode {
    /// Intersection over union.
    #[default]
    Iou,
    /// Intersection over the area of the first (foreground) box.
    Iof,
}

/// Axis-aligned box given by its top-left and bottom-right corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Element> BBox<T> {
    /// Creates a box from corner coordinates.
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Reads the first four columns of a detection row.
    pub fn from_row(row: ArrayView1<'_, T>) -> NmsResult<Self> {
        if row.len() < 4 {
            return Err(NmsError::ShapeMismatch {
                what: "box row",
                expected: 4,
                got: row.len(),
            });
        }
        Ok(Self::new(row[0], row[1], row[2], row[3]))
    }

    /// Horizontal extent under `convention`.
    pub fn width(&self, convention: BoxConvention) -> T {
        self.x2 - self.x1 + convention.offset()
    }

    /// Vertical extent under `convention`.
    pub fn height(&self, convention: BoxConvention) -> T {
        self.y2 - self.y1 + convention.offset()
    }

    /// Box area; zero when either extent is non-positive.
    pub fn area(&self, convention: BoxConvention) -> T {
        let w = self.width(convention);
        let h = self.height(convention);
        if w <= T::zero() || h <= T::zero() {
            return T::zero();
        }
        w * h
    }

    /// Area shared with `other`; zero when the boxes are disjoint.
    pub fn intersection(&self, other: &Self, convention: BoxConvention) -> T {
        let offset = convention.offset();
        let w = self.x2.min(other.x2) - self.x1.max(other.x1) + offset;
        let h = self.y2.min(other.y2) - self.y1.max(other.y1) + offset;
        w.max(T::zero()) * h.max(T::zero())
    }

    /// Overlap ratio with `other`, treating `self` as the foreground box.
    pub fn overlap(&self, other: &Self, mode: OverlapMode, convention: BoxConvention) -> T {
        overlap_from_parts(
            self.intersection(other, convention),
            self.area(convention),
            other.area(convention),
            mode,
        )
    }
}

/// Intersection over union of two boxes, in `[0, 1]`.
///
/// Returns 0 for disjoint boxes and for boxes with non-positive area.
pub fn iou<T: Element>(a: &BBox<T>, b: &BBox<T>, convention: BoxConvention) -> T {
    a.overlap(b, OverlapMode::Iou, convention)
}

fn overlap_from_parts<T: Element>(inter: T, area_a: T, area_b: T, mode: OverlapMode) -> T {
    if area_a <= T::zero() || area_b <= T::zero() || inter <= T::zero() {
        return T::zero();
    }
    let denom = match mode {
        OverlapMode::Iou => area_a + area_b - inter,
        OverlapMode::Iof => area_a,
    };
    if denom <= T::zero() {
        return T::zero();
    }
    let ratio = inter / denom;
    // NaN coordinates overlap nothing.
    if !ratio.is_finite() {
        return T::zero();
    }
    ratio.min(T::one())
}

/// Boxes of one candidate set with their areas cached.
#[derive(Clone, Debug)]
pub struct BoxSet<T> {
    boxes: Vec<BBox<T>>,
    areas: Vec<T>,
    convention: BoxConvention,
}

impl<T: Element> BoxSet<T> {
    /// Builds a set and caches each box area under `convention`.
    pub fn new(boxes: Vec<BBox<T>>, convention: BoxConvention) -> Self {
        let areas = boxes.iter().map(|b| b.area(convention)).collect();
        Self {
            boxes,
            areas,
            convention,
        }
    }

    /// Builds a set from detection rows whose first four columns are corners.
    pub fn from_rows(rows: ArrayView2<'_, T>, convention: BoxConvention) -> NmsResult<Self> {
        if rows.ncols() < 4 {
            return Err(NmsError::ShapeMismatch {
                what: "box rows",
                expected: 4,
                got: rows.ncols(),
            });
        }
        let boxes = rows
            .rows()
            .into_iter()
            .map(|row| BBox::new(row[0], row[1], row[2], row[3]))
            .collect();
        Ok(Self::new(boxes, convention))
    }

    /// Number of boxes in the set.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns true when the set holds no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Convention used for the cached areas.
    pub fn convention(&self) -> BoxConvention {
        self.convention
    }

    /// Returns the boxes in input order.
    pub fn boxes(&self) -> &[BBox<T>] {
        &self.boxes
    }

    /// Returns box `index` if it exists.
    pub fn get(&self, index: usize) -> Option<&BBox<T>> {
        self.boxes.get(index)
    }

    /// Cached area of box `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn area(&self, index: usize) -> T {
        self.areas[index]
    }

    /// IoU between boxes `i` and `j` using the cached areas.
    ///
    /// Panics if either index is out of bounds.
    pub fn iou(&self, i: usize, j: usize) -> T {
        self.overlap_against(&self.boxes[i], self.areas[i], j, OverlapMode::Iou)
    }

    fn overlap_against(&self, probe: &BBox<T>, probe_area: T, j: usize, mode: OverlapMode) -> T {
        let inter = probe.intersection(&self.boxes[j], self.convention);
        overlap_from_parts(inter, probe_area, self.areas[j], mode)
    }
}

impl<T: Element> PairwiseOverlap<T> for BoxSet<T> {
    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn overlap(&self, kept: usize, other: usize) -> T {
        self.iou(kept, other)
    }
}

/// Overlap of one patch against every box of a set.
///
/// The patch is the foreground box for [`OverlapMode::Iof`]. This is the
/// check a minimum-IoU random crop runs against the ground-truth boxes.
pub fn iou_matrix<T: Element>(patch: &BBox<T>, boxes: &BoxSet<T>, mode: OverlapMode) -> Vec<T> {
    let patch_area = patch.area(boxes.convention);
    (0..boxes.len())
        .map(|j| boxes.overlap_against(patch, patch_area, j, mode))
        .collect()
}

/// Full `a.len() × b.len()` overlap matrix; rows follow `a`.
pub fn overlap_matrix<T: Element>(
    a: &BoxSet<T>,
    b: &BoxSet<T>,
    mode: OverlapMode,
) -> NmsResult<Array2<T>> {
    check_same_convention(a, b)?;
    let mut out = Array2::zeros((a.len(), b.len()));
    for (i, row) in out.axis_iter_mut(Axis(0)).enumerate() {
        fill_overlap_row(a, i, b, mode, row);
    }
    Ok(out)
}

/// Writes the overlaps of box `i` of `a` against every box of `b`.
pub(crate) fn fill_overlap_row<T: Element>(
    a: &BoxSet<T>,
    i: usize,
    b: &BoxSet<T>,
    mode: OverlapMode,
    mut row: ArrayViewMut1<'_, T>,
) {
    let probe = &a.boxes[i];
    let probe_area = a.areas[i];
    for (j, value) in row.iter_mut().enumerate() {
        *value = b.overlap_against(probe, probe_area, j, mode);
    }
}

pub(crate) fn check_same_convention<T: Element>(a: &BoxSet<T>, b: &BoxSet<T>) -> NmsResult<()> {
    if a.convention != b.convention {
        return Err(NmsError::InvalidInput(
            "box sets use different coordinate conventions",
        ));
    }
    Ok(())
}
