//! Scenario resolver
//!
//! Maps validated parameters to the formula that computes them. Resolution is an
//! exhaustive match over `(dimensionality, source profile)`: adding a variant to either
//! enum stops the crate from compiling until the library covers the new pair.
//!
//! Finite-duration sources have no formula of their own. They are the continuous
//! solution switched off after t0:
//!
//! ```text
//! C(t) = Cc(t)                  0 ≤ t ≤ t0
//! C(t) = Cc(t) - Cc(t - t0)     t > t0
//! ```

use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::models::{ContinuousKernel, InstantaneousKernel};
use crate::physics::{AnalyticalSolution, Dimensionality, QueryPoint, SourceKind, TransportParameters};

/// One closed-form kernel
#[derive(Debug, Clone)]
pub enum Kernel {
    Instantaneous(InstantaneousKernel),
    Continuous(ContinuousKernel),
}

impl AnalyticalSolution for Kernel {
    fn concentration(&self, point: &QueryPoint) -> f64 {
        match self {
            Kernel::Instantaneous(kernel) => kernel.concentration(point),
            Kernel::Continuous(kernel) => kernel.concentration(point),
        }
    }

    fn scale(&self) -> f64 {
        match self {
            Kernel::Instantaneous(kernel) => kernel.scale(),
            Kernel::Continuous(kernel) => kernel.scale(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Kernel::Instantaneous(kernel) => kernel.name(),
            Kernel::Continuous(kernel) => kernel.name(),
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            Kernel::Instantaneous(kernel) => kernel.description(),
            Kernel::Continuous(kernel) => kernel.description(),
        }
    }
}

/// Formula selected for a scenario
#[derive(Debug, Clone)]
pub enum ResolvedFormula {
    /// Direct evaluation of one kernel
    Single(Kernel),

    /// Continuous kernel switched off after `duration`
    Superposed { base: ContinuousKernel, duration: f64 },
}

impl ResolvedFormula {
    /// Raw concentration at a point (before clamping)
    pub fn evaluate(&self, point: &QueryPoint) -> f64 {
        match self {
            ResolvedFormula::Single(kernel) => kernel.concentration(point),
            ResolvedFormula::Superposed { base, duration } => {
                superpose(point.t(), *duration, |t| base.concentration(&point.shifted_to(t)))
            }
        }
    }

    /// Magnitude used to scale the clamp tolerance
    pub fn scale(&self) -> f64 {
        match self {
            ResolvedFormula::Single(kernel) => kernel.scale(),
            ResolvedFormula::Superposed { base, .. } => base.scale(),
        }
    }
}

impl fmt::Display for ResolvedFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedFormula::Single(kernel) => f.write_str(kernel.name()),
            ResolvedFormula::Superposed { base, duration } => {
                write!(f, "{} switched off after t0 = {duration}", base.name())
            }
        }
    }
}

/// Finite-duration superposition of a continuous solution `continuous(t)`
///
/// The shifted term is only evaluated for `t > t0`, so it never sees a negative time.
pub(crate) fn superpose<F>(t: f64, duration: f64, mut continuous: F) -> f64
where
    F: FnMut(f64) -> f64,
{
    if t <= duration {
        continuous(t)
    } else {
        continuous(t) - continuous(t - duration)
    }
}

/// Select the formula for validated parameters
///
/// # Errors
///
/// `InternalInconsistency` when a kernel's preconditions do not hold. Parameters built
/// through [`TransportParametersBuilder::build`](crate::physics::TransportParametersBuilder::build)
/// always satisfy them.
pub fn resolve(params: &TransportParameters) -> EngineResult<ResolvedFormula> {
    use Dimensionality::{OneD, ThreeD, TwoD};

    let key = params.key();
    let resolved = match (key.dimensionality, key.profile) {
        (OneD | TwoD | ThreeD, SourceKind::Instantaneous) => {
            ResolvedFormula::Single(Kernel::Instantaneous(InstantaneousKernel::new(params)?))
        }
        (OneD | TwoD | ThreeD, SourceKind::Continuous) => {
            ResolvedFormula::Single(Kernel::Continuous(ContinuousKernel::new(params)?))
        }
        (OneD | TwoD | ThreeD, SourceKind::FiniteDuration) => {
            let duration = params.injection_duration().ok_or_else(|| EngineError::InternalInconsistency {
                dimensionality: key.dimensionality,
                profile: key.profile,
                reason: "finite-duration source without an injection duration".to_string(),
            })?;
            ResolvedFormula::Superposed {
                base: ContinuousKernel::new(params)?,
                duration,
            }
        }
    };

    log::debug!("resolved {key} scenario to {resolved}");
    Ok(resolved)
}

// ================================================================================================
// Tests
// ================================================================================================
