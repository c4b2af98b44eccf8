use detnms::{nms, soft_nms, Detections, Device, NmsError, Tensor};
use ndarray::{array, Array2};
use std::sync::Arc;

fn rows_f64() -> Array2<f64> {
    array![
        [0.0, 0.0, 10.0, 10.0, 0.9],
        [1.0, 1.0, 10.0, 10.0, 0.8],
        [20.0, 20.0, 30.0, 30.0, 0.7],
    ]
}

#[test]
fn array_in_array_out() {
    let dets: Detections<f64> = rows_f64().into();
    let (kept, indices) = nms(&dets, 0.5, None).unwrap();
    assert_eq!(indices, vec![0, 2]);
    match kept {
        Detections::Array(rows) => {
            assert_eq!(rows, array![[0.0, 0.0, 10.0, 10.0, 0.9], [20.0, 20.0, 30.0, 30.0, 0.7]]);
        }
        Detections::Tensor(_) => panic!("array input must give an array"),
    }
}

#[test]
fn tensor_in_tensor_out_without_touching_the_input() {
    let shared = Arc::new(rows_f64().mapv(|v| v as f32));
    let dets = Detections::from(Tensor::from_shared(Arc::clone(&shared), Device::Host));
    let (kept, indices) = soft_nms(&dets, 0.3, "linear", 0.5, 1e-3).unwrap();
    assert_eq!(indices[0], 0);
    match kept {
        Detections::Tensor(t) => assert_eq!(t.device(), Device::Host),
        Detections::Array(_) => panic!("tensor input must give a tensor"),
    }
    assert_eq!(*shared, rows_f64().mapv(|v| v as f32));
    drop(dets);
    assert_eq!(Arc::strong_count(&shared), 1);
}

#[test]
fn empty_tensor_keeps_family() {
    let dets = Detections::from(Tensor::new(Array2::<f32>::zeros((0, 5)), Device::Host));
    let (kept, indices) = nms(&dets, 0.5, None).unwrap();
    assert!(indices.is_empty());
    assert!(matches!(kept, Detections::Tensor(ref t) if t.view().nrows() == 0));
}

#[test]
fn host_runs_are_deterministic() {
    let dets: Detections<f64> = rows_f64().into();
    let first = nms(&dets, 0.3, None).unwrap();
    for _ in 0..5 {
        assert_eq!(nms(&dets, 0.3, None).unwrap(), first);
    }
}

#[cfg(not(feature = "rayon"))]
#[test]
fn accelerator_placement_requires_rayon() {
    let dets: Detections<f64> = rows_f64().into();
    assert!(matches!(
        nms(&dets, 0.5, Some(0)),
        Err(NmsError::BackendUnavailable(_))
    ));
    let tensor = Detections::from(Tensor::new(rows_f64(), Device::Accelerator(1)));
    assert!(matches!(
        soft_nms(&tensor, 0.3, "linear", 0.5, 1e-3),
        Err(NmsError::BackendUnavailable(_))
    ));
}

#[cfg(feature = "rayon")]
#[test]
fn accelerator_tensor_stays_on_its_device() {
    let tensor = Detections::from(Tensor::new(rows_f64(), Device::Accelerator(1)));
    let (kept, indices) = nms(&tensor, 0.5, None).unwrap();
    assert_eq!(indices, vec![0, 2]);
    assert!(matches!(kept, Detections::Tensor(ref t) if t.device() == Device::Accelerator(1)));
}

#[test]
fn invalid_threshold_is_reported_before_work() {
    let dets: Detections<f64> = rows_f64().into();
    assert!(matches!(
        nms(&dets, f64::NAN, None),
        Err(NmsError::InvalidThreshold { name: "iou_thr", .. })
    ));
}
