//! JSON scenario files
//!
//! A scenario file holds the raw parameter set and, optionally, evaluation options and
//! the requests to run:
//!
//! ```json
//! {
//!   "parameters": {
//!     "dimensionality": "2D",
//!     "source_profile": "continuous",
//!     "source_concentration": 100.0,
//!     "seepage_velocity": 0.5,
//!     "dispersion_longitudinal": 5.0,
//!     "dispersion_transverse": 0.5,
//!     "source_width": 10.0
//!   },
//!   "options": { "parallel_threshold": 5000 },
//!   "grid": {
//!     "x": { "linspace": { "min": 0.0, "max": 200.0, "count": 101 } },
//!     "y": { "linspace": { "min": -50.0, "max": 50.0, "count": 51 } },
//!     "z": { "fixed": 0.0 },
//!     "t": 365.0
//!   },
//!   "curve": { "location": { "x": 100.0, "y": 0.0, "z": 0.0 }, "times": [30.0, 90.0, 365.0] }
//! }
//! ```
//!
//! Parameters are validated by [`ScenarioConfig::parameters`], not by deserialization,
//! so a file with a bad value still loads and reports the offending field by name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::output::{BreakthroughCurve, ConcentrationField};
use crate::physics::{GridSpec, SpatialPoint, TransportParameters, TransportParametersBuilder};
use crate::solver::{evaluate_curve, evaluate_grid, EvaluationOptions};

/// Monitoring location and sampling times of a breakthrough curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveRequest {
    pub location: SpatialPoint,
    pub times: Vec<f64>,
}

/// Contents of a scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub parameters: TransportParametersBuilder,

    #[serde(default)]
    pub options: EvaluationOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve: Option<CurveRequest>,
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        log::debug!("loaded scenario file {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validated parameters of the scenario
    pub fn parameters(&self) -> EngineResult<TransportParameters> {
        Ok(self.parameters.build()?)
    }

    /// Evaluate the `grid` request of the file
    pub fn run_grid(&self) -> EngineResult<ConcentrationField> {
        let grid = self
            .grid
            .as_ref()
            .ok_or_else(|| EngineError::Config("scenario file has no grid request".to_string()))?;
        evaluate_grid(&self.parameters()?, grid, &self.options)
    }

    /// Evaluate the `curve` request of the file
    pub fn run_curve(&self) -> EngineResult<BreakthroughCurve> {
        let curve = self
            .curve
            .as_ref()
            .ok_or_else(|| EngineError::Config("scenario file has no curve request".to_string()))?;
        evaluate_curve(&self.parameters()?, &curve.location, &curve.times, &self.options)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
