//! Scenario identifiers and the analytical solution trait
//!
//! This module defines the core vocabulary shared by the parameter model and the
//! formula library:
//! - `Dimensionality`: number of spatial axes the solution spreads along
//! - `SourceKind`: temporal profile of the source
//! - `ScenarioKey`: the (dimensionality, profile) pair formulas are looked up by
//! - `AnalyticalSolution`: trait implemented by every closed-form kernel

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::physics::QueryPoint;

// =================================================================================================
// Scenario identifiers (type-safe)
// =================================================================================================

/// Spatial dimensionality of a groundwater scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimensionality {
    /// Spreading along the flow axis only
    #[serde(rename = "1D", alias = "OneD")]
    OneD,

    /// Spreading along the flow axis and transversally (depth-averaged aquifer)
    #[serde(rename = "2D", alias = "TwoD")]
    TwoD,

    /// Spreading along all three axes
    #[serde(rename = "3D", alias = "ThreeD")]
    ThreeD,
}

impl Dimensionality {
    /// Number of spatial axes
    pub fn axes(&self) -> usize {
        match self {
            Dimensionality::OneD => 1,
            Dimensionality::TwoD => 2,
            Dimensionality::ThreeD => 3,
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.axes())
    }
}

/// Temporal profile of the contaminant source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// One-time injection of a fixed mass at t = 0
    Instantaneous,

    /// Constant source concentration for all t ≥ 0
    Continuous,

    /// Constant source concentration for 0 ≤ t ≤ t0, then stopped
    FiniteDuration,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Instantaneous => "instantaneous",
            SourceKind::Continuous => "continuous",
            SourceKind::FiniteDuration => "finite-duration",
        };
        f.write_str(label)
    }
}

/// Lookup key of the formula library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScenarioKey {
    pub dimensionality: Dimensionality,
    pub profile: SourceKind,
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.dimensionality, self.profile)
    }
}

// =================================================================================================
// Analytical Solution Trait
// =================================================================================================

/// Trait for closed-form solutions of the advection-dispersion equation
///
/// # Responsibility
///
/// Evaluates the concentration at one query point. Does NOT iterate over grids,
/// clamp cancellation residue or validate input: those are the evaluator's and the
/// parameter model's jobs.
///
/// Implementations are pure: same point, same bits out, on any thread.
pub trait AnalyticalSolution: Send + Sync {
    /// Raw concentration at a query point (may carry rounding residue around zero)
    fn concentration(&self, point: &QueryPoint) -> f64;

    /// Magnitude used to scale the clamp tolerance
    fn scale(&self) -> f64;

    /// Name of the solution (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the solution (option)
    fn description(&self) -> Option<&str> {
        None
    }
}

// =================================================================================================
// Tests
// =================================================================================================
