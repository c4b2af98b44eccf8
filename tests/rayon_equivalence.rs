#![cfg(feature = "rayon")]

use detnms::{
    hard_nms, nms, oks_nms, oks_nms_scores, overlap_matrix, overlap_matrix_par, soft_nms,
    soft_nms_scores, BoxConvention, BoxSet, DecayMethod, Detections, KeypointSet, KeypointSigmas,
    OverlapMode, RayonKernel, ScalarKernel, SoftNmsConfig, VisibilityPolicy,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_boxes(rng: &mut StdRng, n: usize) -> Array2<f64> {
    let mut rows = Array2::zeros((n, 5));
    for mut row in rows.rows_mut() {
        let x1 = rng.random_range(0.0..300.0);
        let y1 = rng.random_range(0.0..300.0);
        row[0] = x1;
        row[1] = y1;
        row[2] = x1 + rng.random_range(5.0..80.0);
        row[3] = y1 + rng.random_range(5.0..80.0);
        row[4] = rng.random_range(0.0..1.0);
    }
    rows
}

fn random_poses(rng: &mut StdRng, n: usize, k: usize) -> Array2<f32> {
    let mut rows = Array2::zeros((n, 3 * k + 2));
    for mut row in rows.rows_mut() {
        let cx = rng.random_range(0.0f32..100.0);
        let cy = rng.random_range(0.0f32..100.0);
        for kp in 0..k {
            row[3 * kp] = cx + rng.random_range(-5.0f32..5.0);
            row[3 * kp + 1] = cy + rng.random_range(-5.0f32..5.0);
            row[3 * kp + 2] = rng.random_range(0.0f32..1.0);
        }
        row[3 * k] = rng.random_range(0.0f32..1.0);
        row[3 * k + 1] = rng.random_range(50.0f32..500.0);
    }
    rows
}

#[test]
fn hard_nms_matches_across_kernels() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in [10, 200, 700] {
        let rows = random_boxes(&mut rng, n);
        let set = BoxSet::from_rows(rows.view(), BoxConvention::Pixel).unwrap();
        let scores = rows.column(4).to_vec();
        for thr in [0.3, 0.5, 0.7] {
            assert_eq!(
                hard_nms::<ScalarKernel, f64>(&set, &scores, thr).unwrap(),
                hard_nms::<RayonKernel, f64>(&set, &scores, thr).unwrap()
            );
        }

        let dets: Detections<f64> = rows.into();
        let (host, host_idx) = nms(&dets, 0.5, None).unwrap();
        let (accel, accel_idx) = nms(&dets, 0.5, Some(0)).unwrap();
        assert_eq!(host_idx, accel_idx);
        assert_eq!(host.into_array(), accel.into_array());
    }
}

#[test]
fn soft_nms_matches_across_kernels() {
    let mut rng = StdRng::seed_from_u64(7);
    let rows = random_boxes(&mut rng, 400);
    let set = BoxSet::from_rows(rows.view(), BoxConvention::Pixel).unwrap();
    let scores = rows.column(4).to_vec();
    for method in [DecayMethod::Linear, DecayMethod::Gaussian] {
        let cfg = SoftNmsConfig {
            method,
            ..SoftNmsConfig::default()
        };
        assert_eq!(
            soft_nms_scores::<ScalarKernel, f64>(&set, &scores, &cfg).unwrap(),
            soft_nms_scores::<RayonKernel, f64>(&set, &scores, &cfg).unwrap()
        );
    }

    let dets: Detections<f64> = rows.into();
    let (_, indices) = soft_nms(&dets, 0.3, "gaussian", 0.5, 1e-3).unwrap();
    assert!(indices.len() <= 400);
}

#[test]
fn oks_nms_matches_across_kernels() {
    let mut rng = StdRng::seed_from_u64(99);
    let k = 5;
    let rows = random_poses(&mut rng, 300, k);
    let sigmas = KeypointSigmas::from_tenths(&[0.26, 0.25, 0.35, 0.79, 0.72]).unwrap();
    let scores = rows.column(3 * k).to_vec();
    for policy in [VisibilityPolicy::Both, VisibilityPolicy::KeptAtLeast(0.3)] {
        let set = KeypointSet::from_rows(rows.view(), &sigmas, policy).unwrap();
        assert_eq!(
            oks_nms_scores::<ScalarKernel, f32>(&set, &scores, 0.5).unwrap(),
            oks_nms_scores::<RayonKernel, f32>(&set, &scores, 0.5).unwrap()
        );
    }

    let dets: Detections<f32> = rows.into();
    let tenths = [0.26, 0.25, 0.35, 0.79, 0.72];
    assert_eq!(
        oks_nms(&dets, 0.5, &tenths, None).unwrap(),
        oks_nms(&dets, 0.5, &tenths, Some(3)).unwrap()
    );
}

#[test]
fn parallel_overlap_matrix_is_identical() {
    let mut rng = StdRng::seed_from_u64(3);
    let a_rows = random_boxes(&mut rng, 120);
    let b_rows = random_boxes(&mut rng, 90);
    let a = BoxSet::from_rows(a_rows.view(), BoxConvention::Continuous).unwrap();
    let b = BoxSet::from_rows(b_rows.view(), BoxConvention::Continuous).unwrap();
    for mode in [OverlapMode::Iou, OverlapMode::Iof] {
        assert_eq!(
            overlap_matrix(&a, &b, mode).unwrap(),
            overlap_matrix_par(&a, &b, mode).unwrap()
        );
    }
}
