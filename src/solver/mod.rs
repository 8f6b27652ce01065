//! Scenario resolution and evaluation
//!
//! # Core Concepts
//!
//! The solver layer separates WHAT is computed from HOW it is computed:
//!
//! 1. **Scenario** ([`resolve`]): WHAT to compute
//!    - Dimensionality and source profile select a closed form
//!    - Finite-duration sources become a superposition of continuous solutions
//!
//! 2. **Options** ([`EvaluationOptions`]): HOW to compute
//!    - Parallel threshold
//!    - Clamp tolerance around zero
//!
//! 3. **Evaluator** ([`evaluate_field`], [`evaluate_curve`], ...): the loop
//!    - Applies the formula to every point, in parallel above the threshold
//!    - Clamps rounding residue and rejects invalid values
//!    - Returns immutable result objects
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────────┐
//! │ TransportParameters  │  (validated)
//! └──────────┬───────────┘
//!            │ resolve
//! ┌──────────▼───────────┐
//! │ ResolvedFormula      │ ← Single kernel or superposition
//! └──────────┬───────────┘
//!            │ + points / times + EvaluationOptions
//! ┌──────────▼───────────┐
//! │ Evaluator            │ ← sequential or rayon
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │ ConcentrationField / │
//! │ BreakthroughCurve    │
//! └──────────────────────┘
//! ```
//!
//! # Quick Start Example
//!
//! ```rust
//! use plume_rs::physics::{Axis, Dimensionality, GridSpec, SourceKind, TransportParameters};
//! use plume_rs::solver::{evaluate_grid, EvaluationOptions};
//!
//! let params = TransportParameters::builder()
//!     .dimensionality(Dimensionality::TwoD)
//!     .source_profile(SourceKind::Continuous)
//!     .source_concentration(100.0)
//!     .seepage_velocity(0.5)
//!     .dispersion(5.0, 0.5, 0.0)
//!     .source_width(10.0)
//!     .build()
//!     .unwrap();
//!
//! let grid = GridSpec::plane(Axis::linspace(0.0, 200.0, 101), Axis::linspace(-50.0, 50.0, 51), 365.0);
//! let field = evaluate_grid(&params, &grid, &EvaluationOptions::default()).unwrap();
//!
//! assert_eq!(field.len(), 101 * 51);
//! let plan = field.to_array(&grid).unwrap();
//! assert_eq!(plan.shape(), &[1, 51, 101]);
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod evaluator;
pub mod scenario;
pub mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use evaluator::{
    evaluate_curve, evaluate_field, evaluate_grid, evaluate_point, evaluate_steady_state, field_iter, FieldIter,
};
pub use scenario::{resolve, Kernel, ResolvedFormula};
pub use traits::{EvaluationOptions, DEFAULT_CLAMP_TOLERANCE_FACTOR, DEFAULT_PARALLEL_THRESHOLD};
