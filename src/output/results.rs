//! Result objects
//!
//! Immutable values handed back to the caller. Each one carries the parameters it was
//! computed from, so recording a computation means serializing the result verbatim.

use ndarray::Array3;
use serde::Serialize;

use crate::error::ValidationError;
use crate::physics::{GridSpec, QueryPoint, SpatialPoint, TransportParameters};

// =================================================================================================
// Concentration field
// =================================================================================================

/// Concentration at one query point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSample {
    pub point: QueryPoint,
    pub concentration: f64,
}

/// Concentrations over an ordered set of query points, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationField {
    parameters: TransportParameters,
    samples: Vec<FieldSample>,
}

impl ConcentrationField {
    pub(crate) fn new(parameters: TransportParameters, samples: Vec<FieldSample>) -> Self {
        Self { parameters, samples }
    }

    pub fn parameters(&self) -> &TransportParameters {
        &self.parameters
    }

    pub fn samples(&self) -> &[FieldSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSample> {
        self.samples.iter()
    }

    /// Concentrations alone, in sample order
    pub fn concentrations(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.concentration).collect()
    }

    /// Sample of highest concentration (first one on ties)
    pub fn max(&self) -> Option<&FieldSample> {
        self.samples
            .iter()
            .reduce(|best, sample| if sample.concentration > best.concentration { sample } else { best })
    }

    /// Reshape a field evaluated over `grid` into an array indexed `[z, y, x]`
    ///
    /// # Errors
    ///
    /// The number of samples does not match the grid shape.
    pub fn to_array(&self, grid: &GridSpec) -> Result<Array3<f64>, ValidationError> {
        let shape = grid.shape();
        let expected = shape.0 * shape.1 * shape.2;
        if expected != self.samples.len() {
            return Err(ValidationError::new(
                "grid",
                format!("shape {shape:?} holds {expected} points but the field has {}", self.samples.len()),
                None,
            ));
        }

        Array3::from_shape_vec(shape, self.concentrations())
            .map_err(|err| ValidationError::new("grid", err.to_string(), None))
    }
}

impl<'a> IntoIterator for &'a ConcentrationField {
    type Item = &'a FieldSample;
    type IntoIter = std::slice::Iter<'a, FieldSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

// =================================================================================================
// Breakthrough curve
// =================================================================================================

/// Concentration at one time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSample {
    pub t: f64,
    pub concentration: f64,
}

/// Concentration over time at a fixed location, in input time order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakthroughCurve {
    parameters: TransportParameters,
    location: SpatialPoint,
    samples: Vec<CurveSample>,
}

impl BreakthroughCurve {
    pub(crate) fn new(parameters: TransportParameters, location: SpatialPoint, samples: Vec<CurveSample>) -> Self {
        Self { parameters, location, samples }
    }

    pub fn parameters(&self) -> &TransportParameters {
        &self.parameters
    }

    pub fn location(&self) -> SpatialPoint {
        self.location
    }

    pub fn samples(&self) -> &[CurveSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.t).collect()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.concentration).collect()
    }

    /// Sample of highest concentration (earliest one on ties)
    pub fn max(&self) -> Option<&CurveSample> {
        self.samples
            .iter()
            .reduce(|best, sample| if sample.concentration > best.concentration { sample } else { best })
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Axis, Dimensionality, SourceKind};

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

    fn field(grid: &GridSpec) -> ConcentrationField {
        let samples = grid
            .points()
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, point)| FieldSample { point, concentration: i as f64 })
            .collect();
        ConcentrationField::new(parameters(), samples)
    }

    #[test]
    fn test_to_array_is_indexed_z_y_x() {
        let grid = GridSpec::plane(Axis::linspace(0.0, 2.0, 3), Axis::linspace(0.0, 1.0, 2), 1.0);
        let array = field(&grid).to_array(&grid).unwrap();

        assert_eq!(array.shape(), &[1, 2, 3]);
        assert_eq!(array[[0, 1, 2]], 5.0);
        assert_eq!(array[[0, 0, 1]], 1.0);
    }

    #[test]
    fn test_to_array_rejects_other_grid() {
        let grid = GridSpec::line(Axis::linspace(0.0, 2.0, 3), 1.0);
        let other = GridSpec::line(Axis::linspace(0.0, 2.0, 4), 1.0);
        assert_eq!(field(&grid).to_array(&other).unwrap_err().field, "grid");
    }

    #[test]
    fn test_max_keeps_first_on_ties() {
        let curve = BreakthroughCurve::new(
            parameters(),
            SpatialPoint::new(1.0, 0.0, 0.0),
            vec![
                CurveSample { t: 0.0, concentration: 1.0 },
                CurveSample { t: 1.0, concentration: 3.0 },
                CurveSample { t: 2.0, concentration: 3.0 },
            ],
        );
        assert_eq!(curve.max().unwrap().t, 1.0);
        assert_eq!(curve.times(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_field() {
        let empty = ConcentrationField::new(parameters(), Vec::new());
        assert!(empty.is_empty());
        assert!(empty.max().is_none());
    }

    #[test]
    fn test_field_serializes_with_parameters() {
        let grid = GridSpec::line(Axis::linspace(0.0, 1.0, 2), 1.0);
        let json = serde_json::to_value(field(&grid)).unwrap();

        assert_eq!(json["samples"].as_array().unwrap().len(), 2);
        assert_eq!(json["parameters"]["key"]["profile"], "continuous");
    }
}
