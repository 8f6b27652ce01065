//! plume-rs: Analytical Contaminant Transport
//!
//! Closed-form predictions of dissolved contaminant concentrations in groundwater and
//! surface water. Given a validated description of a release (where, how much, for how
//! long) and of the medium carrying it (velocity, dispersion, retardation, decay),
//! plume-rs evaluates concentration at arbitrary points in space and time.
//!
//! # Architecture
//!
//! plume-rs is built on two core principles:
//!
//! 1. **Separation of Parameters and Evaluation**
//!    - The parameter model validates input once (what to compute)
//!    - The evaluator applies the selected formula to many points (how to compute)
//!
//! 2. **Closed forms only**
//!    - Every scenario maps to an analytical solution or a superposition of them
//!    - No time stepping, no mesh: points are independent and evaluated in any order
//!
//! # Quick Start
//!
//! ```rust
//! use plume_rs::prelude::*;
//!
//! # fn main() -> Result<(), EngineError> {
//! // 1. Describe the release and the aquifer
//! let params = TransportParameters::builder()
//!     .dimensionality(Dimensionality::OneD)
//!     .source_profile(SourceKind::Continuous)
//!     .source_concentration(100.0)
//!     .seepage_velocity(1.0)
//!     .dispersion_longitudinal(0.5)
//!     .build()?;
//!
//! // 2. Evaluate a breakthrough curve at a monitoring well
//! let well = SpatialPoint::new(10.0, 0.0, 0.0);
//! let times: Vec<f64> = (0..=30).map(f64::from).collect();
//! let curve = evaluate_curve(&params, &well, &times, &EvaluationOptions::default())?;
//!
//! // 3. Access results
//! let peak = curve.max().map(|sample| sample.concentration).unwrap_or(0.0);
//! assert!(peak > 99.0 && peak <= 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: parameter model, query points and grids
//! - [`models`]: closed-form solutions (groundwater and surface water)
//! - [`solver`]: scenario resolution and evaluation
//! - [`output`]: result objects, exceedance analysis and CSV export
//! - [`config`]: JSON scenario files
//! - [`error`]: error taxonomy
//!
//! # Features
//!
//! - `parallel` (default): evaluate large fields on the rayon thread pool

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod physics;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use plume_rs::prelude::*;
    //! ```
    pub use crate::config::ScenarioConfig;
    pub use crate::error::{EngineError, EngineResult, ValidationError};
    pub use crate::output::{BreakthroughCurve, ConcentrationField, Thresholds};
    pub use crate::physics::{
        Axis, Dimensionality, GridSpec, QueryPoint, SourceKind, SpatialPoint, TransportParameters,
    };
    pub use crate::solver::{evaluate_curve, evaluate_field, evaluate_grid, evaluate_point, EvaluationOptions};
    pub use crate::models::SurfaceWaterScenario;
}
