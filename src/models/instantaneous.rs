//! Instantaneous (slug) source
//!
//! A mass M released at t = 0 spreads as a Gaussian along every axis the scenario
//! uses, centred on the source and carried downstream along the flow axis:
//!
//! ```text
//! C = M / (n·R·G) · e^{-λt} · Π F_i
//! F_i = exp(-s_i² / (4 D_i' t)) / √(4π D_i' t)        point source
//! F_i = [erf((s_i + L_i/2)/(2√(D_i' t))) - erf((s_i - L_i/2)/(2√(D_i' t)))] / (2 L_i)
//! ```
//!
//! with `s = ξ - u·t` on the flow axis, `s = η` and `s = ζ` laterally, `u = v/R`,
//! `D' = D/R`, and G the cross-section area (1D), the aquifer thickness (2D) or 1 (3D).
//! A source of extent `L_i > 0` along an axis is the Gaussian averaged over that extent.

use crate::error::{EngineError, EngineResult};
use crate::models::special::erf_diff;
use crate::physics::{
    AnalyticalSolution,
    Dimensionality,
    Dispersion,
    FlowFrame,
    QueryPoint,
    SourceKind,
    SourceProfile,
    TransportParameters, };

use std::f64::consts::PI;

/// Closed-form solution for an instantaneous release
#[derive(Debug, Clone)]
pub struct InstantaneousKernel {
    frame: FlowFrame,
    dimensionality: Dimensionality,
    /// Retarded velocity u = v/R
    velocity: f64,
    /// Retarded dispersion D/R
    dispersion: Dispersion,
    /// Source extent (along flow, transverse, vertical)
    extent: [f64; 3],
    /// M / (n·R·G)
    amplitude: f64,
    decay_rate: f64,
    name: String,
}

impl InstantaneousKernel {
    /// Build the kernel from validated parameters
    ///
    /// # Errors
    ///
    /// `InternalInconsistency` when the parameters do not describe an instantaneous
    /// source with positive dispersion on every axis of the scenario.
    pub fn new(params: &TransportParameters) -> EngineResult<Self> {
        let key = params.key();
        let inconsistency = |reason: &str| EngineError::InternalInconsistency {
            dimensionality: key.dimensionality,
            profile: key.profile,
            reason: reason.to_string(),
        };

        let SourceProfile::Instantaneous { mass } = *params.source() else {
            return Err(inconsistency("instantaneous kernel needs an injected mass"));
        };

        let dispersion = params.retarded_dispersion();
        let geometry = params.geometry();
        let lateral_ok = match key.dimensionality {
            Dimensionality::OneD => true,
            Dimensionality::TwoD => dispersion.transverse > 0.0,
            Dimensionality::ThreeD => dispersion.transverse > 0.0 && dispersion.vertical > 0.0,
        };
        if dispersion.longitudinal <= 0.0 || !lateral_ok {
            return Err(inconsistency("dispersion must be positive on every used axis"));
        }

        let section = match key.dimensionality {
            Dimensionality::OneD => geometry.cross_section_area,
            Dimensionality::TwoD => geometry.aquifer_thickness,
            Dimensionality::ThreeD => 1.0,
        };

        Ok(Self {
            frame: params.frame(),
            dimensionality: key.dimensionality,
            velocity: params.retarded_velocity(),
            dispersion,
            extent: [geometry.length, geometry.width, geometry.depth],
            amplitude: mass / (params.porosity() * params.retardation() * section),
            decay_rate: params.decay_rate(),
            name: format!("{} {}", key.dimensionality, SourceKind::Instantaneous),
        })
    }

    /// M / (n·R·G)
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

/// Spreading factor along one axis [1/L]
///
/// Zero for t = 0 or a non-dispersive axis, never NaN. Infinite only at the centre
/// of a point source once D·t underflows.
pub(crate) fn axis_factor(offset: f64, dispersion: f64, extent: f64, t: f64) -> f64 {
    if t <= 0.0 || dispersion <= 0.0 {
        return 0.0;
    }

    let spread = dispersion * t;
    if spread == 0.0 {
        // D·t underflowed: the Gaussian has collapsed onto the source
        let distance = offset.abs();
        return if extent > 0.0 {
            let half = 0.5 * extent;
            if distance < half {
                1.0 / extent
            } else if distance == half {
                0.5 / extent
            } else {
                0.0
            }
        } else if distance == 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
    }
    if extent > 0.0 {
        let root = 2.0 * spread.sqrt();
        erf_diff((offset - 0.5 * extent) / root, (offset + 0.5 * extent) / root) / (2.0 * extent)
    } else {
        (-offset * offset / (4.0 * spread)).exp() / (4.0 * PI * spread).sqrt()
    }
}

impl AnalyticalSolution for InstantaneousKernel {
    fn concentration(&self, point: &QueryPoint) -> f64 {
        let t = point.t();
        if t <= 0.0 {
            return 0.0;
        }

        let local = self.frame.to_local(point);
        let [length, width, depth] = self.extent;

        let mut factors = [1.0; 3];
        factors[0] = axis_factor(local.longitudinal - self.velocity * t, self.dispersion.longitudinal, length, t);
        if self.dimensionality.axes() >= 2 {
            factors[1] = axis_factor(local.transverse, self.dispersion.transverse, width, t);
        }
        if self.dimensionality.axes() >= 3 {
            factors[2] = axis_factor(local.vertical, self.dispersion.vertical, depth, t);
        }
        if factors.contains(&0.0) {
            return 0.0;
        }

        let scale = self.amplitude * (-self.decay_rate * t).exp();
        let value = factors.iter().fold(scale, |value, factor| value * factor);
        if value.is_finite() {
            return value;
        }

        // Point release at t -> 0+: the product of the axis peaks leaves the f64 range
        let log_value = scale.ln() + factors.iter().map(|factor| factor.ln()).sum::<f64>();
        log_value.exp().min(f64::MAX)
    }

    fn scale(&self) -> f64 {
        self.amplitude
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some("Gaussian pulse from an instantaneous release")
    }
}

// =================================================================================================
// Tests
// =================================================================================================
