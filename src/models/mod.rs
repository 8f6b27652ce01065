//! Formula library
//!
//! Closed-form solutions of the advection-dispersion equation. The groundwater
//! kernels implement [`AnalyticalSolution`](crate::physics::AnalyticalSolution); the
//! evaluator calls `concentration` for every query point. Kernels are responsible for
//! the mathematics only: input is validated beforehand by the parameter model, and
//! rounding residue around zero is handled by the evaluator.
//!
//! # Groundwater
//!
//! ## [`InstantaneousKernel`]: slug release
//!
//! Gaussian pulse in every spatial dimension of the scenario, moving with the
//! retarded velocity. Point or finite-extent source.
//!
//! ## [`ContinuousKernel`]: constant-concentration source
//!
//! Error-function breakthrough front along the flow with lateral spreading over the
//! source window. Finite-duration sources reuse it through superposition (see
//! [`crate::solver::scenario`]).
//!
//! # Surface water
//!
//! [`SurfaceWaterScenario`] mixes inflows into a river by mass balance and decays the
//! result downstream. [`RiverSteadyState`] and [`ShorelinePlume`] are the steady 1D and
//! 2D discharge models.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod continuous;
pub mod instantaneous;
pub mod river;
pub mod special;
pub mod surface;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use continuous::ContinuousKernel;
pub use instantaneous::InstantaneousKernel;
pub use river::{MixingRegime, RiverDischarge, RiverSteadyState, ShorelinePlume};
pub use surface::{Inflow, SurfaceWaterScenario, SurfaceWaterScenarioBuilder};
