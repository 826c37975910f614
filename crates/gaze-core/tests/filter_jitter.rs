use gaze_core::synthetic::{DetectorNoise, EyeRatioModel, fixation_stream};
use gaze_core::{FilterPreset, MovingAverage, OneEuroFilter2D, Pt2, Real, Vec2};

fn spread(values: &[Vec2], center: Vec2) -> Real {
    values
        .iter()
        .map(|v| (v - center).norm())
        .fold(0.0, Real::max)
}

#[test]
fn presets_reduce_fixation_jitter() {
    let raw = EyeRatioModel::default().raw_for_target(&Pt2::new(0.3, 0.6));
    let frames = fixation_stream(raw, 0.0, 30.0, 300, &DetectorNoise::new(5, 0.01), 0);
    let input: Vec<Vec2> = frames[100..].iter().map(|m| m.raw).collect();

    for preset in [
        FilterPreset::Smooth,
        FilterPreset::Balanced,
        FilterPreset::Responsive,
        FilterPreset::Child,
    ] {
        let mut filter = OneEuroFilter2D::new(preset.params().unwrap());
        let output: Vec<Vec2> = frames
            .iter()
            .map(|m| filter.filter(m.raw, m.timestamp))
            .collect();
        let settled = &output[100..];
        assert!(
            spread(settled, raw) < spread(&input, raw),
            "{} did not reduce jitter",
            preset.as_str()
        );
    }
}

#[test]
fn smoother_presets_lag_more_on_saccade() {
    let from = Vec2::new(0.4, 0.5);
    let to = Vec2::new(0.6, 0.5);
    let run = |preset: FilterPreset| {
        let mut filter = OneEuroFilter2D::new(preset.params().unwrap());
        for i in 0..30 {
            filter.filter(from, i as Real / 30.0);
        }
        let mut out = from;
        for i in 30..35 {
            out = filter.filter(to, i as Real / 30.0);
        }
        (to - out).norm()
    };
    let smooth = run(FilterPreset::Smooth);
    let responsive = run(FilterPreset::Responsive);
    assert!(
        responsive < smooth,
        "responsive={responsive} smooth={smooth}"
    );
}

#[test]
fn moving_average_settles_on_fixation() {
    let raw = Vec2::new(0.55, 0.45);
    let frames = fixation_stream(raw, 0.0, 60.0, 120, &DetectorNoise::new(9, 0.01), 1);
    let mut ma = MovingAverage::new(10);
    let output: Vec<Vec2> = frames.iter().map(|m| ma.filter(m.raw)).collect();
    assert!(ma.is_full());
    assert!(spread(&output[20..], raw) < 0.01);
}
