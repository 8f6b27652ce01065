//! Steady-state river models for a point discharge
//!
//! Two classical closed forms of surface water assessment:
//!
//! - [`RiverSteadyState`]: fully mixed 1D reach with longitudinal dispersion and decay.
//!   Two dimensionless numbers pick the solution:
//!   `α = k·Ex / u²` (decay against dispersion) and `Pe = u·B / Ex` (advection against
//!   dispersion over the river width).
//! - [`ShorelinePlume`]: 2D plume of a bank discharge before full transverse mixing.
//!
//! Distances are signed along the flow, the discharge sits at x = 0, negative x is upstream.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{finite, non_negative, positive, ValidationError};

/// α at or below which dispersion against decay is negligible
pub const ALPHA_NEGLIGIBLE: f64 = 0.027;

/// α above which decay dominates
pub const ALPHA_DECAY_DOMINATED: f64 = 380.0;

// =================================================================================================
// 1D steady state
// =================================================================================================

/// Discharge into a river reach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiverDischarge {
    /// Cp
    pub discharge_concentration: f64,
    /// Qp
    pub discharge_flow: f64,
    /// Ch, background concentration upstream
    pub river_concentration: f64,
    /// Qh
    pub river_flow: f64,
    /// k, first-order decay rate
    pub decay_rate: f64,
    /// u, mean river velocity
    pub velocity: f64,
    /// Ex, longitudinal dispersion coefficient
    pub dispersion: f64,
    /// B, river width
    pub width: f64,
    /// A, cross-section area
    pub area: f64,
}

impl RiverDischarge {
    fn validate(&self) -> Result<(), ValidationError> {
        non_negative("discharge_concentration", self.discharge_concentration)?;
        positive("discharge_flow", self.discharge_flow)?;
        non_negative("river_concentration", self.river_concentration)?;
        positive("river_flow", self.river_flow)?;
        non_negative("decay_rate", self.decay_rate)?;
        positive("velocity", self.velocity)?;
        positive("dispersion", self.dispersion)?;
        positive("width", self.width)?;
        positive("area", self.area)?;
        Ok(())
    }

    /// Pollutant load Cp·Qp + Ch·Qh
    fn load(&self) -> f64 {
        self.discharge_concentration * self.discharge_flow + self.river_concentration * self.river_flow
    }
}

/// Solution regime selected by α and Pe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixingRegime {
    /// α ≤ 0.027, Pe ≥ 1: plug flow with decay, background upstream
    Advective,
    /// α ≤ 0.027, Pe < 1: plug flow downstream, dispersive back-mixing upstream
    UpstreamDispersion,
    /// 0.027 < α ≤ 380: dispersion and decay both matter
    DispersiveDecay,
    /// α > 380: decay dominates, symmetric exponential profile
    DecayDominated,
}

/// Steady concentration profile of a fully mixed river reach
///
/// # Example
///
/// ```rust
/// use plume_rs::models::{MixingRegime, RiverDischarge, RiverSteadyState};
///
/// let model = RiverSteadyState::new(RiverDischarge {
///     discharge_concentration: 50.0,
///     discharge_flow: 1.0,
///     river_concentration: 2.0,
///     river_flow: 10.0,
///     decay_rate: 1e-5,
///     velocity: 0.5,
///     dispersion: 1.0,
///     width: 20.0,
///     area: 30.0,
/// })
/// .unwrap();
///
/// assert_eq!(model.regime(), MixingRegime::Advective);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RiverSteadyState {
    discharge: RiverDischarge,
    alpha: f64,
    peclet: f64,
    regime: MixingRegime,
    /// Concentration at the discharge point
    initial: f64,
}

impl RiverSteadyState {
    /// # Errors
    ///
    /// Negative concentrations or decay rate, non-positive flows, velocity, dispersion or geometry.
    pub fn new(discharge: RiverDischarge) -> Result<Self, ValidationError> {
        discharge.validate()?;

        let d = &discharge;
        let alpha = d.decay_rate * d.dispersion / (d.velocity * d.velocity);
        let peclet = d.velocity * d.width / d.dispersion;
        let mixed = d.load() / (d.discharge_flow + d.river_flow);

        let (regime, initial) = if alpha <= ALPHA_NEGLIGIBLE {
            let regime = if peclet >= 1.0 {
                MixingRegime::Advective
            } else {
                MixingRegime::UpstreamDispersion
            };
            (regime, mixed)
        } else if alpha <= ALPHA_DECAY_DOMINATED {
            (MixingRegime::DispersiveDecay, mixed / (1.0 + 4.0 * alpha).sqrt())
        } else {
            let initial = d.load() / (2.0 * d.area * (d.decay_rate * d.dispersion).sqrt());
            (MixingRegime::DecayDominated, initial)
        };

        log::debug!("river steady state: alpha = {alpha:e}, Pe = {peclet:e}, regime {regime:?}");

        Ok(Self { discharge, alpha, peclet, regime, initial })
    }

    pub fn regime(&self) -> MixingRegime {
        self.regime
    }

    /// α = k·Ex / u²
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Pe = u·B / Ex
    pub fn peclet(&self) -> f64 {
        self.peclet
    }

    /// Concentration at the discharge point (x = 0)
    pub fn initial_concentration(&self) -> f64 {
        self.initial
    }

    /// Concentration at signed distance `x` from the discharge
    ///
    /// # Errors
    ///
    /// `x` not finite.
    pub fn concentration(&self, x: f64) -> Result<f64, ValidationError> {
        let x = finite("x", x)?;
        let d = &self.discharge;
        let c0 = self.initial;

        let value = match self.regime {
            MixingRegime::Advective | MixingRegime::UpstreamDispersion if x >= 0.0 => {
                c0 * (-d.decay_rate * x / d.velocity).exp()
            }
            MixingRegime::Advective => d.river_concentration,
            MixingRegime::UpstreamDispersion => c0 * (d.velocity * x / d.dispersion).exp(),
            MixingRegime::DispersiveDecay => {
                let root = (1.0 + 4.0 * self.alpha).sqrt();
                let branch = if x < 0.0 { 1.0 + root } else { 1.0 - root };
                c0 * (d.velocity * x / (2.0 * d.dispersion) * branch).exp()
            }
            MixingRegime::DecayDominated => c0 * (-x.abs() * (d.decay_rate / d.dispersion).sqrt()).exp(),
        };
        Ok(value)
    }

    /// Concentration at each distance, in input order
    pub fn profile(&self, distances: &[f64]) -> Result<Vec<f64>, ValidationError> {
        distances.iter().map(|&x| self.concentration(x)).collect()
    }
}

// =================================================================================================
// 2D shoreline plume
// =================================================================================================

/// Bank discharge spreading across the river
///
/// ```text
/// C(x, y) = Ch + 2·Cp·Qp / (H·√(π·My·x·u)) · exp(-u·y² / (4·My·x))     x > 0
/// C(x, y) = Ch                                                          x ≤ 0
/// ```
///
/// y is the distance from the discharging bank; the factor 2 reflects the plume off that bank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShorelinePlume {
    pub discharge_concentration: f64,
    pub discharge_flow: f64,
    pub river_concentration: f64,
    /// H, mean depth
    pub depth: f64,
    /// My, transverse mixing coefficient
    pub transverse_dispersion: f64,
    pub velocity: f64,
}

impl ShorelinePlume {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("discharge_concentration", self.discharge_concentration)?;
        positive("discharge_flow", self.discharge_flow)?;
        non_negative("river_concentration", self.river_concentration)?;
        positive("depth", self.depth)?;
        positive("transverse_dispersion", self.transverse_dispersion)?;
        positive("velocity", self.velocity)?;
        Ok(())
    }

    /// Concentration at distance `x` downstream and `y` from the bank
    ///
    /// # Errors
    ///
    /// Invalid plume parameters or non-finite coordinates.
    pub fn concentration(&self, x: f64, y: f64) -> Result<f64, ValidationError> {
        self.validate()?;
        let x = finite("x", x)?;
        let y = finite("y", y)?;

        if x <= 0.0 {
            return Ok(self.river_concentration);
        }

        let spread = self.transverse_dispersion * x;
        let plume = 2.0 * self.discharge_concentration * self.discharge_flow
            / (self.depth * (PI * spread * self.velocity).sqrt())
            * (-self.velocity * y * y / (4.0 * spread)).exp();

        Ok(self.river_concentration + plume)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
