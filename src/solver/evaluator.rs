//! Grid and series evaluator
//!
//! Applies a resolved formula to many query points. Every entry point is a pure function
//! of its arguments: the only state is request-scoped (the superposition memo of
//! [`evaluate_curve`], the cursor of a [`FieldIter`]).
//!
//! # Clamping
//!
//! Closed forms built from differences of error functions can land a few ulps below
//! zero. With ε = `clamp_tolerance_factor · f64::EPSILON · scale`:
//!
//! | raw value        | result                         |
//! |------------------|--------------------------------|
//! | ≥ 0              | kept                           |
//! | in (-ε, 0)       | 0                              |
//! | ≤ -ε             | `NegativeConcentration` error  |
//! | NaN or infinite  | `NonFinite` error              |
//!
//! # Parallelism
//!
//! With the `parallel` feature, fields larger than `parallel_threshold` are evaluated on
//! the rayon pool. Points are independent and results are collected in input order with
//! no reduction, so both paths return bitwise identical fields.

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{EngineError, EngineResult, ValidationError};
use crate::output::{BreakthroughCurve, ConcentrationField, CurveSample, FieldSample};
use crate::physics::{AnalyticalSolution, GridSpec, QueryPoint, SourceKind, SpatialPoint, TransportParameters};
use crate::solver::scenario::{resolve, superpose, Kernel, ResolvedFormula};
use crate::solver::EvaluationOptions;

// =================================================================================================
// Clamp policy
// =================================================================================================

/// Apply the clamp policy to a raw formula value
pub(crate) fn clamp(value: f64, tolerance: f64, point: &QueryPoint) -> EngineResult<f64> {
    if !value.is_finite() {
        return Err(EngineError::NonFinite { point: *point });
    }
    if value > 0.0 {
        return Ok(value);
    }
    if value == 0.0 {
        return Ok(0.0);
    }
    if value > -tolerance {
        log::trace!("clamped rounding residue {value:e} to zero at {point}");
        return Ok(0.0);
    }
    Err(EngineError::NegativeConcentration {
        point: *point,
        value,
        tolerance,
    })
}

// =================================================================================================
// Field evaluation
// =================================================================================================

#[cfg(feature = "parallel")]
fn map_points<T, F>(points: &[QueryPoint], parallel: bool, f: F) -> EngineResult<Vec<T>>
where
    T: Send,
    F: Fn(&QueryPoint) -> EngineResult<T> + Sync + Send,
{
    if parallel {
        points.par_iter().map(f).collect()
    } else {
        points.iter().map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_points<T, F>(points: &[QueryPoint], _parallel: bool, f: F) -> EngineResult<Vec<T>>
where
    F: Fn(&QueryPoint) -> EngineResult<T>,
{
    points.iter().map(f).collect()
}

/// Concentration at every point of `points`, in input order
///
/// # Errors
///
/// Invalid options, an unresolvable scenario, or a value the clamp policy rejects.
///
/// # Example
///
/// ```rust
/// use plume_rs::physics::{Dimensionality, QueryPoint, SourceKind, TransportParameters};
/// use plume_rs::solver::{evaluate_field, EvaluationOptions};
///
/// let params = TransportParameters::builder()
///     .dimensionality(Dimensionality::OneD)
///     .source_profile(SourceKind::Continuous)
///     .source_concentration(100.0)
///     .seepage_velocity(1.0)
///     .dispersion_longitudinal(0.5)
///     .build()
///     .unwrap();
///
/// let points: Vec<_> = (0..=20).map(|i| QueryPoint::on_axis(i as f64, 5.0).unwrap()).collect();
/// let field = evaluate_field(&params, &points, &EvaluationOptions::default()).unwrap();
///
/// assert_eq!(field.len(), 21);
/// assert!(field.concentrations().windows(2).all(|w| w[0] >= w[1]));
/// ```
pub fn evaluate_field(
    params: &TransportParameters,
    points: &[QueryPoint],
    options: &EvaluationOptions,
) -> EngineResult<ConcentrationField> {
    options.validate()?;
    let formula = resolve(params)?;
    let tolerance = options.tolerance(formula.scale());
    let parallel = options.is_parallel(points.len());

    log::debug!(
        "evaluating {} points with {formula} ({})",
        points.len(),
        if parallel { "parallel" } else { "sequential" }
    );

    let samples = map_points(points, parallel, |point| {
        let concentration = clamp(formula.evaluate(point), tolerance, point)?;
        Ok(FieldSample { point: *point, concentration })
    })?;

    Ok(ConcentrationField::new(params.clone(), samples))
}

/// [`evaluate_field`] over the points of a rectilinear grid
pub fn evaluate_grid(
    params: &TransportParameters,
    grid: &GridSpec,
    options: &EvaluationOptions,
) -> EngineResult<ConcentrationField> {
    let points = grid.points()?;
    evaluate_field(params, &points, options)
}

/// Concentration at a single query point
pub fn evaluate_point(params: &TransportParameters, point: &QueryPoint, options: &EvaluationOptions) -> EngineResult<f64> {
    options.validate()?;
    let formula = resolve(params)?;
    clamp(formula.evaluate(point), options.tolerance(formula.scale()), point)
}

/// Limit of the concentration at `location` as t → ∞ for a continuous source
///
/// # Errors
///
/// `ValidationError` on `source_profile` for instantaneous and finite-duration sources,
/// whose late-time limit is zero rather than a steady plume.
pub fn evaluate_steady_state(
    params: &TransportParameters,
    location: &SpatialPoint,
    options: &EvaluationOptions,
) -> EngineResult<f64> {
    options.validate()?;
    let point = location.at(0.0)?;
    match resolve(params)? {
        ResolvedFormula::Single(Kernel::Continuous(kernel)) => {
            let tolerance = options.tolerance(kernel.source_concentration());
            clamp(kernel.steady_state(&point), tolerance, &point)
        }
        _ => Err(ValidationError::new(
            "source_profile",
            format!("must be {} for a steady-state limit", SourceKind::Continuous),
            None,
        )
        .into()),
    }
}

// =================================================================================================
// Lazy field iterator
// =================================================================================================

/// Lazy, restartable evaluation of a field
///
/// Nothing is computed until the iterator is advanced; dropping it stops the work.
/// Cloning is cheap and gives an independent cursor over the same points.
#[derive(Debug, Clone)]
pub struct FieldIter {
    formula: Arc<ResolvedFormula>,
    points: Arc<[QueryPoint]>,
    position: usize,
    tolerance: f64,
}

impl FieldIter {
    /// Go back to the first point
    pub fn restart(&mut self) {
        self.position = 0;
    }
}

impl Iterator for FieldIter {
    type Item = EngineResult<FieldSample>;

    fn next(&mut self) -> Option<Self::Item> {
        let point = *self.points.get(self.position)?;
        self.position += 1;

        Some(
            clamp(self.formula.evaluate(&point), self.tolerance, &point)
                .map(|concentration| FieldSample { point, concentration }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FieldIter {}

/// Lazy counterpart of [`evaluate_field`]
pub fn field_iter(
    params: &TransportParameters,
    points: Vec<QueryPoint>,
    options: &EvaluationOptions,
) -> EngineResult<FieldIter> {
    options.validate()?;
    let formula = resolve(params)?;
    let tolerance = options.tolerance(formula.scale());

    Ok(FieldIter {
        formula: Arc::new(formula),
        points: points.into(),
        position: 0,
        tolerance,
    })
}

// =================================================================================================
// Breakthrough curve
// =================================================================================================

fn validate_times(times: &[f64]) -> Result<(), ValidationError> {
    for (i, &t) in times.iter().enumerate() {
        if !t.is_finite() || t < 0.0 {
            return Err(ValidationError::new(format!("times[{i}]"), "must be finite and >= 0", Some(t)));
        }
        if i > 0 && t < times[i - 1] {
            return Err(ValidationError::new(
                format!("times[{i}]"),
                format!("must not precede times[{}] = {}", i - 1, times[i - 1]),
                Some(t),
            ));
        }
    }
    Ok(())
}

/// Concentration at a fixed location for each time of `times`
///
/// `times` must be finite, non-negative and non-decreasing; the curve follows it exactly.
///
/// For finite-duration sources the continuous solution is memoized for the duration of
/// the call, so `Cc(t - t0)` reuses `Cc(t')` whenever `t - t0` falls on an earlier time.
///
/// # Errors
///
/// `ValidationError` on `times[i]` for the first offending time, plus the errors of
/// [`evaluate_field`].
pub fn evaluate_curve(
    params: &TransportParameters,
    location: &SpatialPoint,
    times: &[f64],
    options: &EvaluationOptions,
) -> EngineResult<BreakthroughCurve> {
    options.validate()?;
    validate_times(times)?;
    let anchor = location.at(0.0)?;

    let formula = resolve(params)?;
    let tolerance = options.tolerance(formula.scale());

    log::debug!("evaluating breakthrough curve of {} times at {anchor} with {formula}", times.len());

    let samples = match &formula {
        ResolvedFormula::Single(kernel) => {
            times
                .iter()
                .map(|&t| {
                    let point = anchor.shifted_to(t);
                    let concentration = clamp(kernel.concentration(&point), tolerance, &point)?;
                    Ok(CurveSample { t, concentration })
                })
                .collect::<EngineResult<Vec<_>>>()?
        }
        ResolvedFormula::Superposed { base, duration } => {
            let mut memo: HashMap<u64, f64> = HashMap::with_capacity(times.len());
            let mut lookups = 0usize;
            let mut samples = Vec::with_capacity(times.len());

            for &t in times {
                let raw = superpose(t, *duration, |s| {
                    lookups += 1;
                    *memo
                        .entry(s.to_bits())
                        .or_insert_with(|| base.concentration(&anchor.shifted_to(s)))
                });
                let point = anchor.shifted_to(t);
                samples.push(CurveSample { t, concentration: clamp(raw, tolerance, &point)? });
            }

            log::debug!("superposition memo: {} evaluations for {lookups} lookups", memo.len());
            samples
        }
    };

    Ok(BreakthroughCurve::new(params.clone(), *location, samples))
}

// =================================================================================================
// Tests
// =================================================================================================
