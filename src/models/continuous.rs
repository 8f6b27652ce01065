//! Continuous source of constant concentration
//!
//! The source plane sits at ξ = 0 and holds concentration C0 from t = 0 on. Downstream
//! (ξ ≥ 0) the front follows the Ogata–Banks solution with first-order decay, and
//! spreads laterally over a source window of width W (2D, 3D) and depth Z (3D) following
//! Domenico:
//!
//! ```text
//! C(ξ, η, ζ, t) = C0 · L(ξ, t) · Y(ξ, η) · Z(ξ, ζ)
//!
//! L = ½ [ e^{(u-w)ξ/2D} erfc((ξ - wt)/(2√(Dt))) + e^{(u+w)ξ/2D} erfc((ξ + wt)/(2√(Dt))) ]
//! Y = ½ [ erf((η + W/2)/(2√(Dy ξ/u))) - erf((η - W/2)/(2√(Dy ξ/u))) ]
//! w = √(u² + 4λD)
//! ```
//!
//! `u`, `D`, `Dy` and `Dz` are the retarded velocity and dispersion coefficients. As t → ∞
//! the longitudinal factor tends to `e^{(u-w)ξ/2D}`, independent of t (see [`ContinuousKernel::steady_state`]).
//!
//! # Singularity at the source
//!
//! The solution is discontinuous at (ξ = 0, t = 0). The convention here: at t = 0 the
//! concentration is C0 at the source origin (ξ = 0, inside the lateral window, ½ on its
//! edge) and 0 everywhere else. For t > 0 the formula itself gives the same value at
//! ξ = 0, so a breakthrough curve at the source is continuous from the right.
//!
//! Upstream of the source plane (ξ < 0) the concentration is 0.

use crate::error::{EngineError, EngineResult};
use crate::models::special::{erf_diff, exp_erfc};
use crate::physics::{
    AnalyticalSolution,
    Dimensionality,
    Dispersion,
    FlowFrame,
    LocalCoordinates,
    QueryPoint,
    SourceKind,
    TransportParameters, };

/// Closed-form solution for a source of constant concentration
#[derive(Debug, Clone)]
pub struct ContinuousKernel {
    frame: FlowFrame,
    dimensionality: Dimensionality,
    concentration: f64,
    /// Retarded velocity u = v/R
    velocity: f64,
    /// Retarded dispersion D/R
    dispersion: Dispersion,
    /// √(u² + 4λD)
    decay_velocity: f64,
    width: f64,
    depth: f64,
    name: String,
}

impl ContinuousKernel {
    /// Build the kernel from validated parameters
    ///
    /// Finite-duration scenarios build the same kernel: their source is a continuous
    /// one switched off by superposition.
    ///
    /// # Errors
    ///
    /// `InternalInconsistency` when a geometric precondition of the closed form fails
    /// (no source concentration, non-positive velocity, a zero-sized source window or
    /// a non-dispersive lateral axis).
    pub fn new(params: &TransportParameters) -> EngineResult<Self> {
        let key = params.key();
        let inconsistency = |reason: &str| EngineError::InternalInconsistency {
            dimensionality: key.dimensionality,
            profile: key.profile,
            reason: reason.to_string(),
        };

        let concentration = params
            .source_concentration()
            .ok_or_else(|| inconsistency("continuous kernel needs a source concentration"))?;

        let velocity = params.retarded_velocity();
        if velocity <= 0.0 {
            return Err(inconsistency("continuous kernel needs a positive velocity"));
        }

        let dispersion = params.retarded_dispersion();
        let geometry = params.geometry();
        let lateral_ok = match key.dimensionality {
            Dimensionality::OneD => true,
            Dimensionality::TwoD => dispersion.transverse > 0.0 && geometry.width > 0.0,
            Dimensionality::ThreeD => {
                dispersion.transverse > 0.0 && geometry.width > 0.0 && dispersion.vertical > 0.0 && geometry.depth > 0.0
            }
        };
        if dispersion.longitudinal <= 0.0 || !lateral_ok {
            return Err(inconsistency("source window and dispersion must be positive on every used axis"));
        }

        let decay_velocity = (velocity * velocity + 4.0 * params.decay_rate() * dispersion.longitudinal).sqrt();

        Ok(Self {
            frame: params.frame(),
            dimensionality: key.dimensionality,
            concentration,
            velocity,
            dispersion,
            decay_velocity,
            width: geometry.width,
            depth: geometry.depth,
            name: format!("{} {}", key.dimensionality, SourceKind::Continuous),
        })
    }

    /// C0
    pub fn source_concentration(&self) -> f64 {
        self.concentration
    }

    /// Time-invariant limit of the concentration as t → ∞
    pub fn steady_state(&self, point: &QueryPoint) -> f64 {
        let local = self.frame.to_local(point);
        if local.longitudinal < 0.0 {
            return 0.0;
        }

        let d = self.dispersion.longitudinal;
        let attenuation = ((self.velocity - self.decay_velocity) * local.longitudinal / (2.0 * d)).exp();
        self.concentration * attenuation * self.lateral(&local)
    }

    fn longitudinal(&self, xi: f64, t: f64) -> f64 {
        let d = self.dispersion.longitudinal;
        let u = self.velocity;
        let w = self.decay_velocity;
        let root = 2.0 * (d * t).sqrt();

        0.5 * (exp_erfc((u - w) * xi / (2.0 * d), (xi - w * t) / root)
            + exp_erfc((u + w) * xi / (2.0 * d), (xi + w * t) / root))
    }

    /// Product of the lateral spreading factors (1 in 1D)
    fn lateral(&self, local: &LocalCoordinates) -> f64 {
        let xi = local.longitudinal;
        match self.dimensionality {
            Dimensionality::OneD => 1.0,
            Dimensionality::TwoD => window(local.transverse, self.width, self.dispersion.transverse, xi, self.velocity),
            Dimensionality::ThreeD => {
                window(local.transverse, self.width, self.dispersion.transverse, xi, self.velocity)
                    * window(local.vertical, self.depth, self.dispersion.vertical, xi, self.velocity)
            }
        }
    }
}

/// Fraction of a source window of size `size` seen at `offset` after travelling `xi`
fn window(offset: f64, size: f64, dispersion: f64, xi: f64, velocity: f64) -> f64 {
    let half = 0.5 * size;

    if xi <= 0.0 {
        let distance = offset.abs();
        return if distance < half {
            1.0
        } else if distance == half {
            0.5
        } else {
            0.0
        };
    }
    if dispersion <= 0.0 {
        return 0.0;
    }

    let root = 2.0 * (dispersion * xi / velocity).sqrt();
    0.5 * erf_diff((offset - half) / root, (offset + half) / root)
}

impl AnalyticalSolution for ContinuousKernel {
    fn concentration(&self, point: &QueryPoint) -> f64 {
        let local = self.frame.to_local(point);
        if local.longitudinal < 0.0 {
            return 0.0;
        }

        let t = point.t();
        if t <= 0.0 {
            return if local.longitudinal == 0.0 {
                self.concentration * self.lateral(&local)
            } else {
                0.0
            };
        }

        self.concentration * self.longitudinal(local.longitudinal, t) * self.lateral(&local)
    }

    fn scale(&self) -> f64 {
        self.concentration
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Error-function front from a constant-concentration source")
    }
}

// =================================================================================================
// Tests
// =================================================================================================
