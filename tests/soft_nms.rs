use detnms::{
    soft_nms, soft_nms_scores, soft_nms_with, BoxConvention, BoxSet, DecayMethod, Detections,
    NmsError, ScalarKernel, SoftNmsConfig,
};
use ndarray::{array, Array2};

fn example_rows() -> Array2<f32> {
    array![
        [49.1, 32.4, 51.0, 35.9, 0.9],
        [49.3, 32.9, 51.0, 35.3, 0.9],
        [49.2, 31.8, 51.0, 35.4, 0.5],
        [35.1, 11.5, 39.1, 15.7, 0.5],
        [35.6, 11.8, 39.3, 14.2, 0.5],
        [35.3, 11.5, 39.9, 14.5, 0.4],
        [35.2, 11.7, 39.7, 15.7, 0.3],
    ]
}

fn assert_scores(kept: &Detections<f32>, expected: &[f32]) {
    let got = kept.view().column(4).to_vec();
    assert_eq!(got.len(), expected.len());
    for (g, e) in got.iter().zip(expected) {
        assert!((g - e).abs() < 1e-4, "scores {got:?} vs {expected:?}");
    }
}

#[test]
fn linear_decay_on_example() {
    let dets: Detections<f32> = example_rows().into();
    let (kept, indices) = soft_nms(&dets, 0.7, "linear", 0.5, 1e-3).unwrap();
    assert_eq!(indices, vec![0, 3, 4, 1, 5, 6, 2]);
    assert_scores(
        &kept,
        &[0.9, 0.5, 0.5, 0.266_897, 0.114_643, 0.046_552, 0.034_422],
    );

    // Runners-up are strictly decayed; nothing ever gains score.
    let input = example_rows();
    for (row, &i) in kept.view().rows().into_iter().zip(&indices) {
        assert!(row[4] <= input[[i, 4]]);
        assert_eq!(row.slice(ndarray::s![..4]), input.row(i).slice(ndarray::s![..4]));
    }
    for &i in &[1usize, 5, 6, 2] {
        let pos = indices.iter().position(|&k| k == i).unwrap();
        assert!(kept.view()[[pos, 4]] < input[[i, 4]]);
    }
}

#[test]
fn gaussian_decay_on_example() {
    let dets: Detections<f32> = example_rows().into();
    let (kept, indices) = soft_nms(&dets, 0.3, "gaussian", 0.5, 1e-3).unwrap();
    assert_eq!(indices, vec![0, 3, 1, 4, 5, 2, 6]);
    assert_scores(
        &kept,
        &[0.9, 0.5, 0.334_527, 0.259_016, 0.060_880, 0.056_961, 0.013_810],
    );
}

#[test]
fn continuous_linear_decay_only_touches_one_box() {
    let cfg = SoftNmsConfig {
        iou_thr: 0.7,
        convention: BoxConvention::Continuous,
        ..SoftNmsConfig::default()
    };
    let dets: Detections<f32> = example_rows().into();
    let (kept, indices) = soft_nms_with(&dets, &cfg).unwrap();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_scores(&kept, &[0.9, 0.9, 0.5, 0.5, 0.5, 0.4, 0.056_250]);
}

#[test]
fn degenerate_boxes_are_discarded_or_kept_by_overlap() {
    let rows: Array2<f32> = array![
        [4.0, 3.0, 5.0, 3.0, 0.9],
        [4.0, 3.0, 5.0, 4.0, 0.9],
        [3.0, 1.0, 3.0, 1.0, 0.5],
        [3.0, 1.0, 3.0, 1.0, 0.5],
        [3.0, 1.0, 3.0, 1.0, 0.4],
        [3.0, 1.0, 3.0, 1.0, 0.0],
    ];
    let dets: Detections<f32> = rows.clone().into();
    let (kept, indices) = soft_nms(&dets, 0.5, "linear", 0.5, 1e-3).unwrap();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_scores(&kept, &[0.9, 0.9, 0.5]);

    // Zero-area boxes never overlap on a continuous plane, so every row
    // survives with its input score.
    let cfg = SoftNmsConfig {
        iou_thr: 0.5,
        convention: BoxConvention::Continuous,
        ..SoftNmsConfig::default()
    };
    let (kept, indices) = soft_nms_with(&dets, &cfg).unwrap();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    assert_scores(&kept, &[0.9, 0.9, 0.5, 0.5, 0.4, 0.0]);
}

#[test]
fn linear_with_unit_threshold_is_identity() {
    let dets: Detections<f32> = example_rows().into();
    let (kept, indices) = soft_nms(&dets, 1.0, "linear", 0.5, 1e-3).unwrap();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(kept.into_array(), example_rows());
}

#[test]
fn extra_columns_survive_rescoring() {
    let dets: Detections<f64> = array![
        [0.0, 0.0, 10.0, 10.0, 0.9, 3.0],
        [0.0, 0.0, 10.0, 10.0, 0.8, 4.0],
    ]
    .into();
    let (kept, indices) = soft_nms(&dets, 0.3, "gaussian", 0.5, 1e-3).unwrap();
    assert_eq!(indices, vec![0, 1]);
    let kept = kept.into_array();
    assert_eq!(kept.column(5).to_vec(), vec![3.0, 4.0]);
    assert!((kept[[1, 4]] - 0.8 * (-2.0f64).exp()).abs() < 1e-12);
}

#[test]
fn parameters_are_validated() {
    let dets: Detections<f32> = example_rows().into();
    assert_eq!(
        soft_nms(&dets, 0.3, "Linear", 0.5, 1e-3).unwrap_err(),
        NmsError::UnknownDecayMethod("Linear".to_owned())
    );
    assert!(matches!(
        soft_nms(&dets, 0.3, "gaussian", 0.0, 1e-3),
        Err(NmsError::InvalidThreshold { name: "sigma", .. })
    ));
    assert!(matches!(
        soft_nms(&dets, 0.3, "linear", 0.5, -1.0),
        Err(NmsError::InvalidThreshold { name: "min_score", .. })
    ));
    assert!(matches!(
        soft_nms(&dets, 1.2, "linear", 0.5, 1e-3),
        Err(NmsError::InvalidThreshold { name: "iou_thr", .. })
    ));
}

#[test]
fn low_level_scores_match_dispatch() {
    let rows = example_rows();
    let cfg = SoftNmsConfig {
        iou_thr: 0.3,
        method: DecayMethod::Gaussian,
        ..SoftNmsConfig::default()
    };
    let set = BoxSet::from_rows(rows.view(), cfg.convention).unwrap();
    let kept = soft_nms_scores::<ScalarKernel, f32>(&set, &rows.column(4).to_vec(), &cfg).unwrap();
    let dets: Detections<f32> = rows.clone().into();
    let (out, indices) = soft_nms_with(&dets, &cfg).unwrap();
    assert_eq!(kept.iter().map(|k| k.index).collect::<Vec<_>>(), indices);
    assert_eq!(
        kept.iter().map(|k| k.score).collect::<Vec<_>>(),
        out.view().column(4).to_vec()
    );
}
