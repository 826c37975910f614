use gaze_core::synthetic::{EyeRatioModel, GazeAngleModel};
use gaze_core::{Pt2, Real, ScreenGeometry, Vec2};
use gaze_linear::{CalibrationError, MIN_CALIBRATION_PAIRS, PolynomialCalibrator};

fn scenario() -> (Vec<Vec2>, Vec<Pt2>) {
    let pairs = [
        ((-0.5, -0.5), (0.0, 0.0)),
        ((0.5, -0.5), (1.0, 0.0)),
        ((0.0, 0.0), (0.5, 0.5)),
        ((-0.5, 0.5), (0.0, 1.0)),
        ((0.5, 0.5), (1.0, 1.0)),
        ((0.0, -0.5), (0.5, 0.0)),
    ];
    pairs
        .iter()
        .map(|((rx, ry), (tx, ty))| (Vec2::new(*rx, *ry), Pt2::new(*tx, *ty)))
        .unzip()
}

fn grid_targets(n: usize) -> Vec<Pt2> {
    let mut targets = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let step = 1.0 / (n - 1) as Real;
            targets.push(Pt2::new(0.1 + 0.8 * step * i as Real, 0.1 + 0.8 * step * j as Real));
        }
    }
    targets
}

#[test]
fn six_point_scenario_predicts_center() {
    let (raw, targets) = scenario();
    let mut cal = PolynomialCalibrator::default();
    cal.fit(&raw, &targets).unwrap();
    assert!(cal.is_calibrated());

    let p = cal.predict(&Vec2::new(0.0, 0.0));
    assert!((p.x - 0.5).abs() < 0.05, "x={}", p.x);
    assert!((p.y - 0.5).abs() < 0.05, "y={}", p.y);
}

#[test]
fn five_pairs_rejected_six_accepted() {
    let (raw, targets) = scenario();
    let mut cal = PolynomialCalibrator::default();

    let err = cal.fit(&raw[..5], &targets[..5]).unwrap_err();
    assert_eq!(
        err,
        CalibrationError::InsufficientSamples {
            required: MIN_CALIBRATION_PAIRS,
            got: 5
        }
    );
    assert!(!cal.is_calibrated());

    cal.fit(&raw, &targets).unwrap();
    assert!(cal.is_calibrated());
}

#[test]
fn failed_fit_keeps_previous_model() {
    let (raw, targets) = scenario();
    let mut cal = PolynomialCalibrator::default();
    cal.fit(&raw, &targets).unwrap();
    let query = Vec2::new(0.2, -0.1);
    let before = cal.predict(&query);
    let blob_before = cal.to_blob();

    assert!(cal.fit(&raw[..5], &targets[..5]).is_err());
    assert_eq!(cal.predict(&query), before);
    assert_eq!(cal.to_blob(), blob_before);
}

#[test]
fn exact_quadratic_is_recovered_without_regularization() {
    let truth = |r: &Vec2| {
        Pt2::new(
            200.0 + 1500.0 * r.x - 300.0 * r.x * r.x + 80.0 * r.x * r.y,
            -50.0 + 900.0 * r.y + 120.0 * r.y * r.y - 40.0 * r.x,
        )
    };
    let raw: Vec<Vec2> = grid_targets(5)
        .iter()
        .map(|t| Vec2::new(0.3 + 0.4 * t.x, 0.35 + 0.3 * t.y))
        .collect();
    let targets: Vec<Pt2> = raw.iter().map(truth).collect();

    let mut cal = PolynomialCalibrator::new(0.0);
    cal.fit(&raw, &targets).unwrap();

    let query = Vec2::new(0.47, 0.52);
    let p = cal.predict(&query);
    let expected = truth(&query);
    assert!(
        (p - expected).norm() < 1e-6,
        "p={p:?} expected={expected:?}"
    );
}

#[test]
fn eye_ratio_model_is_inverted_within_tolerance() {
    let screen = ScreenGeometry::default();
    let model = EyeRatioModel::default();
    let targets = grid_targets(5);
    let raw: Vec<Vec2> = targets.iter().map(|t| model.raw_for_target(t)).collect();
    let pixels: Vec<Pt2> = targets.iter().map(|t| screen.to_pixels(t)).collect();

    let mut cal = PolynomialCalibrator::default();
    let stats = cal.fit(&raw, &pixels).unwrap();
    assert_eq!(stats.count, 25);

    for (r, t) in raw.iter().zip(targets.iter()) {
        let n = screen.to_normalized(&cal.predict(r));
        assert!((n - t).norm() < 0.02, "target={t:?} got={n:?}");
    }
}

#[test]
fn gaze_angle_model_is_inverted_within_tolerance() {
    let screen = ScreenGeometry::default();
    let model = GazeAngleModel::default();
    let targets = grid_targets(4);
    let raw: Vec<Vec2> = targets.iter().map(|t| model.raw_for_target(t)).collect();
    let pixels: Vec<Pt2> = targets.iter().map(|t| screen.to_pixels(t)).collect();

    let mut cal = PolynomialCalibrator::default();
    cal.fit(&raw, &pixels).unwrap();

    let center = screen.to_normalized(&cal.predict(&model.raw_for_target(&Pt2::new(0.5, 0.5))));
    assert!(
        (center - Pt2::new(0.5, 0.5)).norm() < 0.02,
        "center={center:?}"
    );
}

#[test]
fn collinear_raw_input_still_fits() {
    // All raw samples on one horizontal line: the q direction is degenerate.
    let raw: Vec<Vec2> = (0..8).map(|i| Vec2::new(0.1 * i as Real, 0.5)).collect();
    let targets: Vec<Pt2> = raw.iter().map(|r| Pt2::new(r.x * 100.0, 10.0)).collect();

    let mut cal = PolynomialCalibrator::new(0.0);
    cal.fit(&raw, &targets).unwrap();
    let p = cal.predict(&Vec2::new(0.35, 0.5));
    assert!((p.x - 35.0).abs() < 1e-6, "x={}", p.x);
    assert!((p.y - 10.0).abs() < 1e-6, "y={}", p.y);
}
