//! Preset persistence and curve property tests.

use isotone_spec::{
    AutomationCurve, CarrierWaveform, ModulationShape, SegmentPreset, TimelineSegment,
    TonePreset, TransitionKind, POINT_MERGE_TOLERANCE,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::tempdir;

fn sample_preset() -> TonePreset {
    let mut preset = TonePreset::new("Theta Descent");
    preset.entrainment.add_point(0.0, 14.0).unwrap();
    preset.entrainment.add_point(120.0, 6.0).unwrap();
    preset.entrainment.add_point(240.0, 4.5).unwrap();
    preset.volume.add_point(0.0, 0.3).unwrap();
    preset.volume.add_point(240.0, 0.6).unwrap();
    preset.base_freq.add_point(0.0, 200.0).unwrap();
    preset.carrier = CarrierWaveform::Triangle;
    preset.modulation = ModulationShape::Gaussian;
    preset.subsonic.enabled = true;
    preset
}

#[test]
fn test_save_and_load_curve_preset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("theta.json");

    let preset = sample_preset();
    preset.save(&path).unwrap();
    let loaded = TonePreset::load(&path).unwrap();

    assert_eq!(loaded, preset);
    assert_eq!(loaded.canonical_hash().unwrap(), preset.canonical_hash().unwrap());
}

#[test]
fn test_loaded_curve_hits_control_points_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("theta.json");
    sample_preset().save(&path).unwrap();

    let loaded = TonePreset::load(&path).unwrap();
    for point in loaded.entrainment.points() {
        assert_eq!(loaded.entrainment.value_at(point.time), point.value);
    }
    assert_eq!(loaded.entrainment.value_at(60.0), 10.0);
    assert_eq!(loaded.duration(), 240.0);
}

#[test]
fn test_missing_fields_use_defaults() {
    let preset = TonePreset::from_json(r#"{"carrier_type": "noise"}"#).unwrap();
    assert_eq!(preset.name, "Imported Preset");
    assert_eq!(preset.carrier, CarrierWaveform::Noise);
    assert_eq!(preset.entrainment.value_at(0.0), 10.0);
    assert_eq!(preset.tone_volume, 0.8);
    assert_eq!(preset.duration(), TonePreset::MIN_DURATION);
}

#[test]
fn test_out_of_range_points_are_clamped_on_load() {
    let preset = TonePreset::from_json(
        r#"{"entrainment_points": [{"time": 0.0, "value": 90.0}, {"time": 10.0, "value": 0.1}]}"#,
    )
    .unwrap();
    assert_eq!(preset.entrainment.value_at(0.0), 40.0);
    assert_eq!(preset.entrainment.value_at(10.0), 0.5);
}

#[test]
fn test_save_and_load_segment_preset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("timeline.json");

    let mut preset = SegmentPreset::new("Focus Ramp");
    preset.add_segment(TimelineSegment::sweep(
        8.0,
        14.0,
        180.0,
        90.0,
        0.6,
        TransitionKind::Logarithmic,
    ));
    preset.add_segment(TimelineSegment::constant(14.0, 180.0, 60.0, 0.6));
    preset.save(&path).unwrap();

    let loaded = SegmentPreset::load(&path).unwrap();
    assert_eq!(loaded, preset);
    assert_eq!(loaded.total_duration(), 150.0);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = TonePreset::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, isotone_spec::SpecError::Io(_)));
}

proptest! {
    #[test]
    fn prop_points_stay_in_range(
        points in prop::collection::vec((0.0f64..600.0, -100.0f64..100.0), 1..20)
    ) {
        let mut curve = AutomationCurve::try_new(0.5, 40.0, 10.0).unwrap();
        for (time, value) in points {
            curve.add_point(time, value).unwrap();
        }
        for point in curve.points() {
            prop_assert!(point.value >= 0.5 && point.value <= 40.0);
        }
        for pair in curve.points().windows(2) {
            prop_assert!(pair[1].time - pair[0].time >= POINT_MERGE_TOLERANCE);
        }
    }

    #[test]
    fn prop_value_holds_past_ends(
        points in prop::collection::vec((0.0f64..600.0, 0.5f64..40.0), 1..10),
        offset in 0.0f64..1000.0,
    ) {
        let mut curve = AutomationCurve::try_new(0.5, 40.0, 10.0).unwrap();
        for (time, value) in points {
            curve.add_point(time, value).unwrap();
        }
        let first = curve.points()[0];
        let last = curve.points()[curve.len() - 1];
        prop_assert_eq!(curve.value_at(first.time - offset), first.value);
        prop_assert_eq!(curve.value_at(last.time + offset), last.value);
    }

    #[test]
    fn prop_interpolation_between_bracketing_values(
        a in 0.5f64..40.0,
        b in 0.5f64..40.0,
        t in 0.0f64..100.0,
    ) {
        let curve = AutomationCurve::from_points(
            0.5,
            40.0,
            10.0,
            [isotone_spec::ControlPoint::new(0.0, a), isotone_spec::ControlPoint::new(100.0, b)],
        )
        .unwrap();
        let v = curve.value_at(t);
        prop_assert!(v >= a.min(b) - 1e-9 && v <= a.max(b) + 1e-9);
    }
}
