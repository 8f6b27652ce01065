//! Exceedance analysis
//!
//! Reduces a curve or a field to the figures a compliance table reports: the peak, and
//! where or when the concentration is above a water-quality standard and above the
//! analytical detection limit.
//!
//! A span runs from the first to the last sample strictly above the threshold. A curve
//! that dips below the threshold and rises again still reports one span.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{non_negative, ValidationError};
use crate::output::{BreakthroughCurve, ConcentrationField, CurveSample, FieldSample};
use crate::physics::{GridSpec, SpatialPoint};

/// Concentration thresholds of an exceedance analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Water-quality standard
    pub standard: f64,

    /// Analytical detection limit
    pub detection_limit: f64,
}

impl Thresholds {
    pub fn new(standard: f64, detection_limit: f64) -> Result<Self, ValidationError> {
        let thresholds = Self { standard, detection_limit };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("thresholds.standard", self.standard)?;
        non_negative("thresholds.detection_limit", self.detection_limit)?;
        Ok(())
    }
}

// =================================================================================================
// Curve summary
// =================================================================================================

/// Time interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSummary {
    /// Highest sample, `None` for an empty curve
    pub peak: Option<CurveSample>,

    /// First to last time above the standard
    pub above_standard: Option<Span>,

    /// First to last time above the detection limit
    pub above_detection: Option<Span>,
}

fn span_above(samples: &[CurveSample], threshold: f64) -> Option<Span> {
    let first = samples.iter().find(|sample| sample.concentration > threshold)?;
    let last = samples.iter().rev().find(|sample| sample.concentration > threshold)?;
    Some(Span { start: first.t, end: last.t })
}

impl BreakthroughCurve {
    /// Peak and exceedance spans of the curve
    ///
    /// # Example
    ///
    /// ```rust
    /// use plume_rs::output::Thresholds;
    /// use plume_rs::physics::{Dimensionality, SourceKind, SpatialPoint, TransportParameters};
    /// use plume_rs::solver::{evaluate_curve, EvaluationOptions};
    ///
    /// let params = TransportParameters::builder()
    ///     .dimensionality(Dimensionality::OneD)
    ///     .source_profile(SourceKind::FiniteDuration)
    ///     .source_concentration(100.0)
    ///     .injection_duration(5.0)
    ///     .seepage_velocity(1.0)
    ///     .dispersion_longitudinal(0.5)
    ///     .build()
    ///     .unwrap();
    ///
    /// let times: Vec<f64> = (0..=60).map(f64::from).collect();
    /// let curve = evaluate_curve(&params, &SpatialPoint::new(10.0, 0.0, 0.0), &times, &EvaluationOptions::default()).unwrap();
    ///
    /// let summary = curve.summary(&Thresholds::new(10.0, 0.01).unwrap());
    /// let standard = summary.above_standard.unwrap();
    /// let detection = summary.above_detection.unwrap();
    /// assert!(detection.start <= standard.start && standard.end <= detection.end);
    /// ```
    pub fn summary(&self, thresholds: &Thresholds) -> CurveSummary {
        CurveSummary {
            peak: self.max().copied(),
            above_standard: span_above(self.samples(), thresholds.standard),
            above_detection: span_above(self.samples(), thresholds.detection_limit),
        }
    }
}

// =================================================================================================
// Field summary
// =================================================================================================

/// Axis-aligned box enclosing a set of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: SpatialPoint,
    pub max: SpatialPoint,
}

impl BoundingBox {
    fn around(point: SpatialPoint) -> Self {
        Self { min: point, max: point }
    }

    fn include(&mut self, point: SpatialPoint) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }
}

/// Points of a field above one threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exceedance {
    pub count: usize,

    /// Distinct (x, y) columns with at least one point above the threshold
    pub columns: usize,

    /// `None` when no point is above the threshold
    pub extent: Option<BoundingBox>,
}

impl Exceedance {
    fn collect(samples: &[FieldSample], threshold: f64) -> Self {
        let mut count = 0;
        let mut columns = HashSet::new();
        let mut extent: Option<BoundingBox> = None;

        for sample in samples.iter().filter(|sample| sample.concentration > threshold) {
            count += 1;
            let location = sample.point.location();
            columns.insert((location.x.to_bits(), location.y.to_bits()));
            match extent.as_mut() {
                Some(extent) => extent.include(location),
                None => extent = Some(BoundingBox::around(location)),
            }
        }

        Self { count, columns: columns.len(), extent }
    }

    /// Plan area of the exceedance on a regular grid: `columns · dx · dy`
    ///
    /// Layers of a volume grid project onto the same column, so a column counts once
    /// however many of its z samples exceed. `None` unless both horizontal axes of
    /// `grid` are spaced.
    pub fn area(&self, grid: &GridSpec) -> Option<f64> {
        Some(self.columns as f64 * grid.x.spacing()? * grid.y.spacing()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummary {
    /// Highest sample, `None` for an empty field
    pub peak: Option<FieldSample>,
    pub above_standard: Exceedance,
    pub above_detection: Exceedance,
}

impl ConcentrationField {
    /// Peak and exceedance extents of the field
    pub fn summary(&self, thresholds: &Thresholds) -> FieldSummary {
        FieldSummary {
            peak: self.max().copied(),
            above_standard: Exceedance::collect(self.samples(), thresholds.standard),
            above_detection: Exceedance::collect(self.samples(), thresholds.detection_limit),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Axis, Dimensionality, QueryPoint, SourceKind, TransportParameters};

    fn parameters() -> TransportParameters {
        TransportParameters::builder()
            .dimensionality(Dimensionality::OneD)
            .source_profile(SourceKind::Continuous)
            .source_concentration(1.0)
            .seepage_velocity(1.0)
            .dispersion_longitudinal(1.0)
            .build()
            .unwrap()
    }

    fn curve(values: &[f64]) -> BreakthroughCurve {
        let samples = values
            .iter()
            .enumerate()
            .map(|(i, &concentration)| CurveSample { t: i as f64, concentration })
            .collect();
        BreakthroughCurve::new(parameters(), SpatialPoint::new(1.0, 0.0, 0.0), samples)
    }

    #[test]
    fn test_thresholds_must_be_non_negative() {
        assert_eq!(Thresholds::new(-1.0, 0.0).unwrap_err().field, "thresholds.standard");
        assert_eq!(Thresholds::new(1.0, f64::NAN).unwrap_err().field, "thresholds.detection_limit");
    }

    #[test]
    fn test_curve_spans_run_from_first_to_last_exceedance() {
        let summary = curve(&[0.0, 0.2, 2.0, 0.5, 3.0, 0.2, 0.0]).summary(&Thresholds::new(1.0, 0.1).unwrap());

        assert_eq!(summary.peak.unwrap().t, 4.0);
        assert_eq!(summary.above_standard, Some(Span { start: 2.0, end: 4.0 }));
        assert_eq!(summary.above_detection, Some(Span { start: 1.0, end: 5.0 }));
        assert_eq!(summary.above_detection.unwrap().duration(), 4.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let summary = curve(&[0.0, 1.0, 1.0]).summary(&Thresholds::new(1.0, 0.0).unwrap());
        assert_eq!(summary.above_standard, None);
        assert_eq!(summary.above_detection, Some(Span { start: 1.0, end: 2.0 }));
    }

    #[test]
    fn test_field_exceedance_extent_and_area() {
        let grid = GridSpec::plane(Axis::linspace(0.0, 4.0, 5), Axis::linspace(0.0, 2.0, 3), 1.0);
        let samples = grid
            .points()
            .unwrap()
            .into_iter()
            .map(|point: QueryPoint| FieldSample {
                concentration: if point.x() >= 2.0 && point.y() <= 1.0 { 5.0 } else { 0.5 },
                point,
            })
            .collect();
        let field = ConcentrationField::new(parameters(), samples);

        let summary = field.summary(&Thresholds::new(1.0, 0.1).unwrap());
        let standard = summary.above_standard;

        assert_eq!(standard.count, 6);
        assert_eq!(standard.columns, 6);
        let extent = standard.extent.unwrap();
        assert_eq!((extent.min.x, extent.min.y), (2.0, 0.0));
        assert_eq!((extent.max.x, extent.max.y), (4.0, 1.0));
        assert_eq!(standard.area(&grid), Some(6.0));

        assert_eq!(summary.above_detection.count, 15);
        assert_eq!(summary.peak.unwrap().concentration, 5.0);
    }

    #[test]
    fn test_area_needs_spaced_axes() {
        let grid = GridSpec::line(Axis::linspace(0.0, 4.0, 5), 1.0);
        let exceedance = Exceedance { count: 3, columns: 3, extent: None };
        assert_eq!(exceedance.area(&grid), None);
    }

    #[test]
    fn test_volume_area_counts_each_column_once() {
        let x = Axis::linspace(0.0, 4.0, 5);
        let y = Axis::linspace(0.0, 2.0, 3);
        let plane = GridSpec::plane(x, y, 1.0);
        let volume = GridSpec::volume(x, y, Axis::linspace(-1.0, 1.0, 3), 1.0);

        let summarize = |grid: &GridSpec| {
            let samples = grid
                .points()
                .unwrap()
                .into_iter()
                .map(|point: QueryPoint| FieldSample {
                    concentration: if point.x() >= 2.0 && point.y() <= 1.0 { 5.0 } else { 0.5 },
                    point,
                })
                .collect();
            ConcentrationField::new(parameters(), samples).summary(&Thresholds::new(1.0, 0.1).unwrap())
        };

        let flat = summarize(&plane).above_standard;
        let layered = summarize(&volume).above_standard;

        assert_eq!(layered.count, 3 * flat.count);
        assert_eq!(layered.columns, flat.columns);
        assert_eq!(layered.area(&volume), flat.area(&plane));
        assert_eq!(layered.area(&volume), Some(6.0));
    }
}
