//! Surface water: mass-balance mixing and first-order decay along a river reach
//!
//! The river enters the reach at distance 0 with flow `Q` and concentration `C`.
//! Inflows (point discharges, tributaries) join at fixed positions along the reach.
//! Walking downstream:
//!
//! ```text
//! between mixing points:  C ← C · exp(-k Δx / u)
//! at a mixing point:      C ← (Q·C + q·c) / (Q + q),   Q ← Q + q
//! ```
//!
//! Inflows are applied in the order given, which must follow the flow path. Because
//! decay acts between mixing points, exchanging two inflows at different positions
//! changes the outlet concentration whenever `k > 0`.
//!
//! # Example
//!
//! ```rust
//! use plume_rs::models::SurfaceWaterScenario;
//!
//! let river = SurfaceWaterScenario::builder()
//!     .river_flow(10.0)
//!     .river_concentration(0.0)
//!     .velocity(0.5)
//!     .decay_rate(0.1)
//!     .reach_length(1.0)
//!     .inflow(0.0, 1.0, 50.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(river.travel_time(), 2.0);
//! assert!((river.mixed_concentration() - 50.0 / 11.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, required, ValidationError};

/// Discharge or tributary joining the river
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inflow {
    /// Distance from the start of the reach
    pub position: f64,
    /// Volumetric flow rate q
    pub flow: f64,
    /// Concentration of the inflow
    pub concentration: f64,
}

/// Raw surface water input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceWaterScenarioBuilder {
    pub river_flow: Option<f64>,
    pub river_concentration: Option<f64>,
    pub velocity: Option<f64>,
    pub decay_rate: Option<f64>,
    pub reach_length: Option<f64>,
    pub inflows: Vec<Inflow>,
}

impl SurfaceWaterScenarioBuilder {
    pub fn river_flow(mut self, flow: f64) -> Self {
        self.river_flow = Some(flow);
        self
    }

    pub fn river_concentration(mut self, concentration: f64) -> Self {
        self.river_concentration = Some(concentration);
        self
    }

    pub fn velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn decay_rate(mut self, k: f64) -> Self {
        self.decay_rate = Some(k);
        self
    }

    pub fn reach_length(mut self, length: f64) -> Self {
        self.reach_length = Some(length);
        self
    }

    /// Append an inflow downstream of the ones already added
    pub fn inflow(mut self, position: f64, flow: f64, concentration: f64) -> Self {
        self.inflows.push(Inflow { position, flow, concentration });
        self
    }

    /// Validate and freeze the scenario
    ///
    /// # Errors
    ///
    /// Missing or out-of-range values, an inflow outside the reach, or inflows out of
    /// flow-path order (they are never reordered).
    pub fn build(&self) -> Result<SurfaceWaterScenario, ValidationError> {
        let context = "surface water scenario";

        let river_flow = positive("river_flow", required("river_flow", self.river_flow, context)?)?;
        let river_concentration = non_negative(
            "river_concentration",
            required("river_concentration", self.river_concentration, context)?,
        )?;
        let velocity = positive("velocity", required("velocity", self.velocity, context)?)?;
        let decay_rate = non_negative("decay_rate", self.decay_rate.unwrap_or(0.0))?;
        let reach_length = non_negative("reach_length", required("reach_length", self.reach_length, context)?)?;

        let mut previous = 0.0;
        for (i, inflow) in self.inflows.iter().enumerate() {
            let position = non_negative(&format!("inflows[{i}].position"), inflow.position)?;
            if position > reach_length {
                return Err(ValidationError::new(
                    format!("inflows[{i}].position"),
                    format!("must be <= reach_length ({reach_length})"),
                    Some(position),
                ));
            }
            if position < previous {
                return Err(ValidationError::new(
                    format!("inflows[{i}].position"),
                    format!("must not precede the previous inflow ({previous}) along the flow path"),
                    Some(position),
                ));
            }
            positive(&format!("inflows[{i}].flow"), inflow.flow)?;
            non_negative(&format!("inflows[{i}].concentration"), inflow.concentration)?;
            previous = position;
        }

        Ok(SurfaceWaterScenario {
            river_flow,
            river_concentration,
            velocity,
            decay_rate,
            reach_length,
            inflows: self.inflows.clone(),
        })
    }
}

/// Validated river reach with its inflows in flow-path order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceWaterScenario {
    river_flow: f64,
    river_concentration: f64,
    velocity: f64,
    decay_rate: f64,
    reach_length: f64,
    inflows: Vec<Inflow>,
}

impl SurfaceWaterScenario {
    pub fn builder() -> SurfaceWaterScenarioBuilder {
        SurfaceWaterScenarioBuilder::default()
    }

    pub fn inflows(&self) -> &[Inflow] {
        &self.inflows
    }

    pub fn reach_length(&self) -> f64 {
        self.reach_length
    }

    /// Time for the water to travel the whole reach
    pub fn travel_time(&self) -> f64 {
        self.reach_length / self.velocity
    }

    /// River flow leaving the reach
    pub fn outlet_flow(&self) -> f64 {
        self.river_flow + self.inflows.iter().map(|inflow| inflow.flow).sum::<f64>()
    }

    /// Concentration just downstream of the first mixing point
    ///
    /// Without inflows this is the river concentration.
    pub fn mixed_concentration(&self) -> f64 {
        match self.inflows.first() {
            Some(first) => {
                let arriving = self.river_concentration * self.decay(first.position);
                mix(self.river_flow, arriving, first.flow, first.concentration)
            }
            None => self.river_concentration,
        }
    }

    /// Concentration at `distance` from the start of the reach
    ///
    /// An inflow located exactly at `distance` is already mixed in. Distances beyond the
    /// reach extrapolate the decay law.
    ///
    /// # Errors
    ///
    /// `distance` negative or not finite.
    pub fn concentration_at(&self, distance: f64) -> Result<f64, ValidationError> {
        let distance = non_negative("distance", distance)?;
        if distance > self.reach_length {
            log::warn!(
                "distance {distance} lies beyond the reach end {}, extrapolating decay",
                self.reach_length
            );
        }
        Ok(self.walk(distance))
    }

    /// Concentration at the end of the reach
    pub fn outlet_concentration(&self) -> f64 {
        self.walk(self.reach_length)
    }

    fn walk(&self, distance: f64) -> f64 {
        let mut flow = self.river_flow;
        let mut concentration = self.river_concentration;
        let mut position = 0.0;

        for inflow in self.inflows.iter().take_while(|inflow| inflow.position <= distance) {
            concentration *= self.decay(inflow.position - position);
            concentration = mix(flow, concentration, inflow.flow, inflow.concentration);
            flow += inflow.flow;
            position = inflow.position;
        }

        concentration * self.decay(distance - position)
    }

    /// Decay factor over a travelled distance
    fn decay(&self, distance: f64) -> f64 {
        (-self.decay_rate * distance / self.velocity).exp()
    }
}

/// Flow-weighted mass balance of two streams
pub fn mix(flow_a: f64, concentration_a: f64, flow_b: f64, concentration_b: f64) -> f64 {
    (flow_a * concentration_a + flow_b * concentration_b) / (flow_a + flow_b)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reach() -> SurfaceWaterScenarioBuilder {
        SurfaceWaterScenario::builder()
            .river_flow(10.0)
            .river_concentration(0.0)
            .velocity(0.5)
            .decay_rate(0.1)
            .reach_length(1.0)
    }

    #[test]
    fn test_single_discharge_mixing_and_decay() {
        let river = reach().inflow(0.0, 1.0, 50.0).build().unwrap();

        assert_relative_eq!(river.travel_time(), 2.0);
        assert_relative_eq!(river.mixed_concentration(), 50.0 / 11.0, max_relative = 1e-12);
        assert_relative_eq!(
            river.outlet_concentration(),
            50.0 / 11.0 * (-0.2f64).exp(),
            max_relative = 1e-12
        );
        assert_relative_eq!(river.outlet_flow(), 11.0);
    }

    #[test]
    fn test_no_inflows_decays_river_concentration() {
        let river = reach().river_concentration(8.0).build().unwrap();
        assert_eq!(river.mixed_concentration(), 8.0);
        assert_relative_eq!(river.outlet_concentration(), 8.0 * (-0.2f64).exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_inflow_order_changes_outlet() {
        let first = reach()
            .reach_length(10.0)
            .inflow(0.0, 1.0, 50.0)
            .inflow(5.0, 2.0, 5.0)
            .build()
            .unwrap();
        let swapped = reach()
            .reach_length(10.0)
            .inflow(0.0, 2.0, 5.0)
            .inflow(5.0, 1.0, 50.0)
            .build()
            .unwrap();

        let a = first.outlet_concentration();
        let b = swapped.outlet_concentration();
        assert!((a - b).abs() > 1e-3, "outlet {a} vs swapped {b}");

        // Same total load, so the later discharge of the strong source decays less
        assert!(b > a);
    }

    #[test]
    fn test_two_inflows_by_hand() {
        let river = reach()
            .reach_length(10.0)
            .inflow(2.0, 1.0, 50.0)
            .inflow(6.0, 4.0, 10.0)
            .build()
            .unwrap();

        let decay = |dx: f64| (-0.1 * dx / 0.5f64).exp();
        let after_first = mix(10.0, 0.0, 1.0, 50.0);
        let after_second = mix(11.0, after_first * decay(4.0), 4.0, 10.0);

        assert_relative_eq!(river.concentration_at(2.0).unwrap(), after_first, max_relative = 1e-12);
        assert_relative_eq!(river.concentration_at(6.0).unwrap(), after_second, max_relative = 1e-12);
        assert_relative_eq!(river.outlet_concentration(), after_second * decay(4.0), max_relative = 1e-12);
        assert_eq!(river.concentration_at(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_unordered_inflows_are_rejected() {
        let err = reach()
            .reach_length(10.0)
            .inflow(5.0, 1.0, 50.0)
            .inflow(2.0, 1.0, 10.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "inflows[1].position");
        assert_eq!(err.value, Some(2.0));
    }

    #[test]
    fn test_inflow_outside_reach_is_rejected() {
        let err = reach().inflow(3.0, 1.0, 50.0).build().unwrap_err();
        assert_eq!(err.field, "inflows[0].position");
    }

    #[test]
    fn test_invalid_river_values() {
        assert_eq!(reach().river_flow(0.0).build().unwrap_err().field, "river_flow");
        assert_eq!(reach().decay_rate(-0.1).build().unwrap_err().field, "decay_rate");
        assert_eq!(reach().velocity(0.0).build().unwrap_err().field, "velocity");
        assert_eq!(
            reach().inflow(0.0, 0.0, 1.0).build().unwrap_err().field,
            "inflows[0].flow"
        );
    }

    #[test]
    fn test_negative_distance_is_rejected() {
        let river = reach().build().unwrap();
        assert_eq!(river.concentration_at(-1.0).unwrap_err().field, "distance");
    }

    #[test]
    fn test_deserialize_from_json() {
        let builder: SurfaceWaterScenarioBuilder = serde_json::from_str(
            r#"{
                "river_flow": 10.0,
                "river_concentration": 0.0,
                "velocity": 0.5,
                "decay_rate": 0.1,
                "reach_length": 1.0,
                "inflows": [{ "position": 0.0, "flow": 1.0, "concentration": 50.0 }]
            }"#,
        )
        .unwrap();

        let river = builder.build().unwrap();
        assert_eq!(river.inflows().len(), 1);
    }
}
