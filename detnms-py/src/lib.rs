//! Python bindings for the detnms suppression library.
//!
//! Every function takes a float32 or float64 2-D numpy array and returns
//! `(kept, indices)`: the kept rows with the input dtype and an int64 array
//! of their input positions.

use detnms::{Detections, Element as NmsElement, NmsError, NmsResult, Suppressed};
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;

type PyKept<'py> = (Bound<'py, PyAny>, Bound<'py, PyArray1<i64>>);

/// Convert an NmsError to a Python exception.
fn to_py_err(err: NmsError) -> PyErr {
    match err {
        NmsError::BackendUnavailable(_) => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn to_py<'py, T>(py: Python<'py>, result: NmsResult<Suppressed<T>>) -> PyResult<PyKept<'py>>
where
    T: NmsElement + numpy::Element,
{
    let (kept, indices) = result.map_err(to_py_err)?;
    let kept = kept.into_array().into_pyarray(py).into_any();
    let indices: Vec<i64> = indices.into_iter().map(|i| i as i64).collect();
    Ok((kept, PyArray1::from_vec(py, indices)))
}

/// Runs `$body` with `$rows` bound to a `Detections` of the array's dtype.
macro_rules! with_dets {
    ($py:expr, $obj:expr, |$rows:ident| $body:expr) => {{
        if let Ok(array) = $obj.extract::<PyReadonlyArray2<'_, f32>>() {
            let $rows: Detections<f32> = array.as_array().to_owned().into();
            to_py($py, $body)
        } else if let Ok(array) = $obj.extract::<PyReadonlyArray2<'_, f64>>() {
            let $rows: Detections<f64> = array.as_array().to_owned().into();
            to_py($py, $body)
        } else {
            Err(PyTypeError::new_err(
                "dets must be a 2-D numpy array of float32 or float64",
            ))
        }
    }};
}

/// Hard NMS over rows `[x1, y1, x2, y2, score, ...]`.
///
/// Args:
///     dets: (N, >=5) float array
///     iou_thr: IoU above which lower-scored boxes are dropped
///     device_id: run on the parallel backend when set (default: None)
#[pyfunction]
#[pyo3(signature = (dets, iou_thr, device_id = None))]
fn nms<'py>(
    py: Python<'py>,
    dets: &Bound<'py, PyAny>,
    iou_thr: f64,
    device_id: Option<usize>,
) -> PyResult<PyKept<'py>> {
    with_dets!(py, dets, |rows| detnms::nms(&rows, iou_thr, device_id))
}

/// Soft-NMS; kept rows carry their decayed scores.
///
/// Args:
///     dets: (N, >=5) float array
///     iou_thr: linear-decay gate
///     method: "linear" or "gaussian" (default: "linear")
///     sigma: Gaussian spread (default: 0.5)
///     min_score: discard threshold after decay (default: 1e-3)
#[pyfunction]
#[pyo3(signature = (dets, iou_thr, method = "linear", sigma = 0.5, min_score = 1e-3))]
fn soft_nms<'py>(
    py: Python<'py>,
    dets: &Bound<'py, PyAny>,
    iou_thr: f64,
    method: &str,
    sigma: f64,
    min_score: f64,
) -> PyResult<PyKept<'py>> {
    with_dets!(py, dets, |rows| detnms::soft_nms(
        &rows, iou_thr, method, sigma, min_score
    ))
}

/// OKS-NMS over rows `[x, y, v] * K, score, area`.
///
/// Args:
///     kpts: (N, 3K+2) float array
///     iou_thr: OKS above which lower-scored instances are dropped
///     sigmas: K per-keypoint sigmas in the published x10 form
///     device_id: run on the parallel backend when set (default: None)
#[pyfunction]
#[pyo3(signature = (kpts, iou_thr, sigmas, device_id = None))]
fn oks_nms<'py>(
    py: Python<'py>,
    kpts: &Bound<'py, PyAny>,
    iou_thr: f64,
    sigmas: Vec<f64>,
    device_id: Option<usize>,
) -> PyResult<PyKept<'py>> {
    with_dets!(py, kpts, |rows| detnms::oks_nms(
        &rows, iou_thr, &sigmas, device_id
    ))
}

/// OKS-NMS that ignores keypoints the kept instance sees below `vis_thr`.
#[pyfunction]
#[pyo3(signature = (kpts, iou_thr, sigmas, vis_thr = 0.1, device_id = None))]
fn oks_nms_vis<'py>(
    py: Python<'py>,
    kpts: &Bound<'py, PyAny>,
    iou_thr: f64,
    sigmas: Vec<f64>,
    vis_thr: f64,
    device_id: Option<usize>,
) -> PyResult<PyKept<'py>> {
    with_dets!(py, kpts, |rows| detnms::oks_nms_vis(
        &rows, iou_thr, &sigmas, vis_thr, device_id
    ))
}

/// Python module for detnms.
#[pymodule]
fn _detnms(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(nms, m)?)?;
    m.add_function(wrap_pyfunction!(soft_nms, m)?)?;
    m.add_function(wrap_pyfunction!(oks_nms, m)?)?;
    m.add_function(wrap_pyfunction!(oks_nms_vis, m)?)?;
    m.add("COCO_SIGMAS", detnms::COCO_SIGMAS_TENTHS.to_vec())?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
