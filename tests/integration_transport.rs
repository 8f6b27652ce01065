//! Integration tests: parameter model + resolver + evaluator
//!
//! Every scenario goes through the public entry points only. Reference values were
//! computed independently with 30-digit arithmetic.

use approx::assert_relative_eq;
use plume_rs::error::EngineError;
use plume_rs::output::Thresholds;
use plume_rs::physics::{Axis, Dimensionality, GridSpec, QueryPoint, SourceKind, SpatialPoint, TransportParameters};
use plume_rs::solver::{
    evaluate_curve, evaluate_field, evaluate_grid, evaluate_point, evaluate_steady_state, field_iter,
    EvaluationOptions,
};

mod common;
use common::{continuous_1d, plane_source_2d, relative_error, slug_1d};

fn on_axis(x: f64, t: f64) -> QueryPoint {
    QueryPoint::on_axis(x, t).unwrap()
}

// =================================================================================================
// Reference values
// =================================================================================================

#[test]
fn test_continuous_reference_values() {
    let params = continuous_1d().build().unwrap();
    let options = EvaluationOptions::default();

    let cases = [
        (10.0, 5.0, 1.7453372140657151887),
        (10.0, 8.0, 28.744569183488445802),
        (10.0, 10.0, 56.16069700439461128),
        (10.0, 1.0, 2.0555739317770773945e-17),
    ];

    for (x, t, expected) in cases {
        let c = evaluate_point(&params, &on_axis(x, t), &options).unwrap();
        assert!(
            relative_error(c, expected) < 1e-6,
            "C({x}, {t}) = {c}, expected {expected}"
        );
    }
}

#[test]
fn test_slug_reference_value() {
    let params = slug_1d().build().unwrap();
    let c = evaluate_point(&params, &on_axis(3.0, 4.0), &EvaluationOptions::default()).unwrap();
    assert_relative_eq!(c, 3.694962364888628, max_relative = 1e-10);
}

#[test]
fn test_plane_source_reference_value() {
    let params = plane_source_2d().build().unwrap();
    let point = QueryPoint::new(10.0, 1.0, 0.0, 5.0).unwrap();
    let c = evaluate_point(&params, &point, &EvaluationOptions::default()).unwrap();
    assert_relative_eq!(c, 1.4660742679022992698, max_relative = 1e-6);
}

// =================================================================================================
// Superposition
// =================================================================================================

#[test]
fn test_finite_duration_is_switched_off_continuous_source() {
    let finite = continuous_1d()
        .source_profile(SourceKind::FiniteDuration)
        .injection_duration(2.0)
        .build()
        .unwrap();
    let options = EvaluationOptions::default();

    // Before t0 the source is indistinguishable from a continuous one
    let early = evaluate_point(&finite, &on_axis(10.0, 1.0), &options).unwrap();
    let continuous_early = evaluate_point(&continuous_1d().build().unwrap(), &on_axis(10.0, 1.0), &options).unwrap();
    assert_eq!(early, continuous_early);

    let late = evaluate_point(&finite, &on_axis(10.0, 10.0), &options).unwrap();
    assert_relative_eq!(late, 56.16069700439461128 - 28.744569183488445802, max_relative = 1e-6);
}

#[test]
fn test_finite_duration_pulse_passes_and_vanishes() {
    let finite = continuous_1d()
        .source_profile(SourceKind::FiniteDuration)
        .injection_duration(2.0)
        .build()
        .unwrap();
    let times: Vec<f64> = (0..=200).map(|i| i as f64 * 0.25).collect();
    let curve = evaluate_curve(&finite, &SpatialPoint::new(10.0, 0.0, 0.0), &times, &EvaluationOptions::default())
        .unwrap();

    let peak = curve.max().unwrap();
    assert!(peak.t > 8.0 && peak.t < 14.0, "peak at t = {}", peak.t);
    assert!(peak.concentration < 100.0);
    assert!(curve.samples().last().unwrap().concentration < 1e-6);
}

// =================================================================================================
// Long-time behaviour
// =================================================================================================

#[test]
fn test_continuous_solution_converges_to_steady_state() {
    let params = continuous_1d().decay_rate(0.05).build().unwrap();
    let well = SpatialPoint::new(10.0, 0.0, 0.0);
    let steady = evaluate_steady_state(&params, &well, &EvaluationOptions::default()).unwrap();
    assert_relative_eq!(steady, 61.379856069898978693, max_relative = 1e-10);

    let times = [20.0, 50.0, 100.0, 200.0];
    let curve = evaluate_curve(&params, &well, &times, &EvaluationOptions::default()).unwrap();
    let errors: Vec<f64> = curve.concentrations().iter().map(|c| (steady - c).abs()).collect();

    assert!(errors[1] < errors[0], "errors {errors:?}");
    assert!(errors[2] < 1e-9 * steady && errors[3] < 1e-9 * steady, "errors {errors:?}");
}

#[test]
fn test_plane_source_steady_state() {
    let params = plane_source_2d().build().unwrap();
    let steady =
        evaluate_steady_state(&params, &SpatialPoint::new(10.0, 1.0, 0.0), &EvaluationOptions::default()).unwrap();
    assert_relative_eq!(steady, 83.999484803691285406, max_relative = 1e-8);
}

// =================================================================================================
// Geometry
// =================================================================================================

#[test]
fn test_rotated_flow_matches_axis_aligned_flow() {
    let aligned = plane_source_2d().build().unwrap();
    let rotated = plane_source_2d().flow_angle_deg(90.0).source_position(5.0, 5.0, 0.0).build().unwrap();
    let options = EvaluationOptions::default();

    // 10 downstream and 1 to the side, in each frame
    let a = evaluate_point(&aligned, &QueryPoint::new(10.0, 1.0, 0.0, 5.0).unwrap(), &options).unwrap();
    let b = evaluate_point(&rotated, &QueryPoint::new(4.0, 15.0, 0.0, 5.0).unwrap(), &options).unwrap();

    assert_relative_eq!(a, b, max_relative = 1e-10);
}

#[test]
fn test_upstream_of_source_is_clean() {
    let params = plane_source_2d().build().unwrap();
    let grid = GridSpec::plane(Axis::linspace(-20.0, -0.5, 40), Axis::linspace(-5.0, 5.0, 11), 50.0);
    let field = evaluate_grid(&params, &grid, &EvaluationOptions::default()).unwrap();

    assert!(field.concentrations().iter().all(|&c| c == 0.0));
}

#[test]
fn test_source_origin_at_time_zero() {
    let params = continuous_1d().build().unwrap();
    let options = EvaluationOptions::default();

    assert_eq!(evaluate_point(&params, &on_axis(0.0, 0.0), &options).unwrap(), 100.0);
    assert_eq!(evaluate_point(&params, &on_axis(1.0, 0.0), &options).unwrap(), 0.0);
}

#[test]
fn test_point_release_at_vanishing_time_stays_finite() {
    let params = TransportParameters::builder()
        .dimensionality(Dimensionality::ThreeD)
        .source_profile(SourceKind::Instantaneous)
        .injected_mass(1.0)
        .seepage_velocity(1.0)
        .dispersion(1.0, 1.0, 1.0)
        .build()
        .unwrap();
    let options = EvaluationOptions::default();

    for t in [1e-100, 1e-210, 1e-300] {
        let c = evaluate_point(&params, &QueryPoint::new(0.0, 0.0, 0.0, t).unwrap(), &options);
        assert!(matches!(c, Ok(c) if c.is_finite() && c > 0.0), "t = {t}: {c:?}");
    }
}

#[test]
fn test_grid_field_reshapes_to_array() {
    let params = TransportParameters::builder()
        .dimensionality(Dimensionality::ThreeD)
        .source_profile(SourceKind::Continuous)
        .source_concentration(100.0)
        .seepage_velocity(1.0)
        .dispersion(0.5, 0.05, 0.01)
        .source_width(4.0)
        .source_depth(2.0)
        .build()
        .unwrap();
    let grid = GridSpec::volume(
        Axis::linspace(0.0, 20.0, 11),
        Axis::linspace(-4.0, 4.0, 5),
        Axis::linspace(-1.0, 1.0, 3),
        15.0,
    );

    let field = evaluate_grid(&params, &grid, &EvaluationOptions::default()).unwrap();
    let array = field.to_array(&grid).unwrap();

    assert_eq!(array.shape(), &[3, 5, 11]);
    // Centre line is the most concentrated row, and it decreases downstream
    let centre = array.slice(ndarray::s![1, 2, ..]);
    assert!(centre.windows(2).into_iter().all(|w| w[0] >= w[1]));
    assert!(array[[1, 2, 5]] > array[[0, 0, 5]]);
}

#[test]
fn test_volume_grid_exceedance_area_matches_plane() {
    // A source deeper than the grid exceeds equally on every layer
    let params = TransportParameters::builder()
        .dimensionality(Dimensionality::ThreeD)
        .source_profile(SourceKind::Continuous)
        .source_concentration(100.0)
        .seepage_velocity(1.0)
        .dispersion(0.5, 0.05, 0.01)
        .source_width(4.0)
        .source_depth(100.0)
        .build()
        .unwrap();
    let x = Axis::linspace(0.0, 20.0, 21);
    let y = Axis::linspace(-5.0, 5.0, 11);
    let plane = GridSpec::plane(x, y, 15.0);
    let volume = GridSpec::volume(x, y, Axis::linspace(-1.0, 1.0, 3), 15.0);
    let thresholds = Thresholds::new(1.0, 0.01).unwrap();
    let options = EvaluationOptions::default();

    let flat = evaluate_grid(&params, &plane, &options).unwrap().summary(&thresholds).above_standard;
    let layered = evaluate_grid(&params, &volume, &options).unwrap().summary(&thresholds).above_standard;

    assert!(flat.count > 0);
    assert_eq!(layered.count, 3 * flat.count);
    assert_eq!(layered.area(&volume), flat.area(&plane));
}

// =================================================================================================
// Evaluation paths
// =================================================================================================

#[test]
fn test_parallel_threshold_does_not_change_results() {
    let params = slug_1d().build().unwrap();
    let points: Vec<QueryPoint> = (0..2500).map(|i| on_axis(i as f64 * 0.01, 4.0)).collect();

    let sequential = evaluate_field(&params, &points, &EvaluationOptions::sequential()).unwrap();
    let parallel = evaluate_field(&params, &points, &EvaluationOptions::default().with_parallel_threshold(16)).unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn test_lazy_iterator_stops_early() {
    let params = continuous_1d().build().unwrap();
    let points: Vec<QueryPoint> = (0..1_000_000).map(|i| on_axis(i as f64 * 1e-3, 5.0)).collect();

    let first_below = field_iter(&params, points, &EvaluationOptions::default())
        .unwrap()
        .map(|sample| sample.unwrap())
        .find(|sample| sample.concentration < 50.0)
        .unwrap();

    // The 50 % front of a continuous source sits near x = v·t
    assert!((first_below.point.x() - 5.0).abs() < 1.0);
}

#[test]
fn test_validation_errors_name_the_field() {
    let err = continuous_1d().dispersion_longitudinal(0.0).build().unwrap_err();
    assert_eq!(err.to_string(), "dispersion_longitudinal must be > 0 (got 0)");

    let err = plane_source_2d().source_width(-1.0).build().unwrap_err();
    assert_eq!(err.field, "source_width");

    let err: EngineError = TransportParameters::builder().build().unwrap_err().into();
    assert!(err.is_validation());
}
