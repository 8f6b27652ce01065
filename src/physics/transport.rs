//! Transport scenario parameters
//!
//! [`TransportParametersBuilder`] collects raw scalar input (typically deserialized
//! from a form or a JSON file) and [`TransportParametersBuilder::build`] turns it into
//! an immutable, fully validated [`TransportParameters`]. Nothing downstream
//! re-checks the input: the resolver and the formulas trust this module.
//!
//! # Example
//!
//! ```rust
//! use plume_rs::physics::{Dimensionality, SourceKind, TransportParameters};
//!
//! let params = TransportParameters::builder()
//!     .dimensionality(Dimensionality::OneD)
//!     .source_profile(SourceKind::Continuous)
//!     .source_concentration(100.0)
//!     .seepage_velocity(1.0)
//!     .dispersion_longitudinal(0.5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.source_concentration(), Some(100.0));
//! ```

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{finite, non_negative, positive, required, ValidationError};
use crate::physics::frame::FlowFrame;
use crate::physics::{Dimensionality, ScenarioKey, SourceKind};

// =================================================================================================
// Builder (raw input)
// =================================================================================================

/// Raw, unvalidated scenario input
///
/// Every field is optional so that partially filled forms deserialize; `build()`
/// decides which fields the selected scenario requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportParametersBuilder {
    pub dimensionality: Option<Dimensionality>,
    pub source_profile: Option<SourceKind>,

    /// C0, continuous and finite-duration sources
    pub source_concentration: Option<f64>,
    /// M, instantaneous sources
    pub injected_mass: Option<f64>,
    /// t0, finite-duration sources
    pub injection_duration: Option<f64>,

    pub seepage_velocity: Option<f64>,
    /// Flow direction, degrees counter-clockwise from +x
    pub flow_angle_deg: Option<f64>,

    pub source_x: Option<f64>,
    pub source_y: Option<f64>,
    pub source_z: Option<f64>,
    pub source_length: Option<f64>,
    pub source_width: Option<f64>,
    pub source_depth: Option<f64>,

    /// A, 1D instantaneous sources
    pub cross_section_area: Option<f64>,
    /// H, 2D instantaneous sources
    pub aquifer_thickness: Option<f64>,

    pub dispersion_longitudinal: Option<f64>,
    pub dispersion_transverse: Option<f64>,
    pub dispersion_vertical: Option<f64>,

    pub porosity: Option<f64>,
    pub retardation: Option<f64>,
    pub decay_rate: Option<f64>,
}

macro_rules! setter {
    ($($(#[$doc:meta])* $name:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(mut self, value: $ty) -> Self {
                self.$name = Some(value);
                self
            }
        )*
    };
}

impl TransportParametersBuilder {
    setter! {
        dimensionality: Dimensionality;
        source_profile: SourceKind;
        source_concentration: f64;
        injected_mass: f64;
        injection_duration: f64;
        seepage_velocity: f64;
        flow_angle_deg: f64;
        source_x: f64;
        source_y: f64;
        source_z: f64;
        source_length: f64;
        source_width: f64;
        source_depth: f64;
        cross_section_area: f64;
        aquifer_thickness: f64;
        dispersion_longitudinal: f64;
        dispersion_transverse: f64;
        dispersion_vertical: f64;
        porosity: f64;
        retardation: f64;
        decay_rate: f64;
    }

    /// Builder pattern: set source centre
    pub fn source_position(self, x: f64, y: f64, z: f64) -> Self {
        self.source_x(x).source_y(y).source_z(z)
    }

    /// Builder pattern: set the three dispersion coefficients
    pub fn dispersion(self, longitudinal: f64, transverse: f64, vertical: f64) -> Self {
        self.dispersion_longitudinal(longitudinal)
            .dispersion_transverse(transverse)
            .dispersion_vertical(vertical)
    }

    /// Validate and freeze the parameters
    ///
    /// # Errors
    ///
    /// The first violated constraint, naming the builder field and the offending value.
    pub fn build(&self) -> Result<TransportParameters, ValidationError> {
        let dimensionality = self
            .dimensionality
            .ok_or_else(|| ValidationError::missing("dimensionality", "every scenario"))?;
        let profile = self
            .source_profile
            .ok_or_else(|| ValidationError::missing("source_profile", "every scenario"))?;
        let key = ScenarioKey { dimensionality, profile };
        let context = format!("{key} scenario");

        // ====== Source strength and temporal profile ======

        let source = match profile {
            SourceKind::Instantaneous => SourceProfile::Instantaneous {
                mass: positive("injected_mass", required("injected_mass", self.injected_mass, &context)?)?,
            },
            SourceKind::Continuous => SourceProfile::Continuous {
                concentration: positive(
                    "source_concentration",
                    required("source_concentration", self.source_concentration, &context)?,
                )?,
            },
            SourceKind::FiniteDuration => SourceProfile::FiniteDuration {
                concentration: positive(
                    "source_concentration",
                    required("source_concentration", self.source_concentration, &context)?,
                )?,
                duration: positive(
                    "injection_duration",
                    required("injection_duration", self.injection_duration, "finite-duration profile")?,
                )?,
            },
        };

        // ====== Flow ======

        let velocity = required("seepage_velocity", self.seepage_velocity, &context)?;
        let seepage_velocity = match profile {
            SourceKind::Instantaneous => non_negative("seepage_velocity", velocity)?,
            SourceKind::Continuous | SourceKind::FiniteDuration => positive("seepage_velocity", velocity)?,
        };
        let flow_angle_deg = finite("flow_angle_deg", self.flow_angle_deg.unwrap_or(0.0))?;

        // ====== Dispersion ======

        let longitudinal = positive(
            "dispersion_longitudinal",
            required("dispersion_longitudinal", self.dispersion_longitudinal, &context)?,
        )?;
        let transverse = match dimensionality {
            Dimensionality::OneD => non_negative("dispersion_transverse", self.dispersion_transverse.unwrap_or(0.0))?,
            Dimensionality::TwoD | Dimensionality::ThreeD => positive(
                "dispersion_transverse",
                required("dispersion_transverse", self.dispersion_transverse, &context)?,
            )?,
        };
        let vertical = match dimensionality {
            Dimensionality::ThreeD => positive(
                "dispersion_vertical",
                required("dispersion_vertical", self.dispersion_vertical, &context)?,
            )?,
            Dimensionality::OneD | Dimensionality::TwoD => {
                non_negative("dispersion_vertical", self.dispersion_vertical.unwrap_or(0.0))?
            }
        };

        // ====== Source geometry ======

        let plane_source = matches!(profile, SourceKind::Continuous | SourceKind::FiniteDuration);
        let width = match (dimensionality, plane_source) {
            (Dimensionality::TwoD | Dimensionality::ThreeD, true) => {
                positive("source_width", required("source_width", self.source_width, &context)?)?
            }
            _ => non_negative("source_width", self.source_width.unwrap_or(0.0))?,
        };
        let depth = match (dimensionality, plane_source) {
            (Dimensionality::ThreeD, true) => {
                positive("source_depth", required("source_depth", self.source_depth, &context)?)?
            }
            _ => non_negative("source_depth", self.source_depth.unwrap_or(0.0))?,
        };

        let geometry = SourceGeometry {
            x: finite("source_x", self.source_x.unwrap_or(0.0))?,
            y: finite("source_y", self.source_y.unwrap_or(0.0))?,
            z: finite("source_z", self.source_z.unwrap_or(0.0))?,
            flow_angle_deg,
            length: non_negative("source_length", self.source_length.unwrap_or(0.0))?,
            width,
            depth,
            cross_section_area: positive("cross_section_area", self.cross_section_area.unwrap_or(1.0))?,
            aquifer_thickness: positive("aquifer_thickness", self.aquifer_thickness.unwrap_or(1.0))?,
        };

        // ====== Medium ======

        let porosity = finite("porosity", self.porosity.unwrap_or(1.0))?;
        if porosity <= 0.0 || porosity > 1.0 {
            return Err(ValidationError::new("porosity", "must be in (0, 1]", Some(porosity)));
        }
        let retardation = positive("retardation", self.retardation.unwrap_or(1.0))?;
        let decay_rate = non_negative("decay_rate", self.decay_rate.unwrap_or(0.0))?;

        if self.injection_duration.is_some() && profile != SourceKind::FiniteDuration {
            log::debug!("injection_duration ignored for {key} scenario");
        }

        Ok(TransportParameters {
            key,
            source,
            geometry,
            seepage_velocity,
            dispersion: Dispersion { longitudinal, transverse, vertical },
            porosity,
            retardation,
            decay_rate,
        })
    }
}

// =================================================================================================
// Validated parameters
// =================================================================================================

/// Source strength and temporal profile, with the data each profile needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "profile", rename_all = "kebab-case")]
pub enum SourceProfile {
    Instantaneous { mass: f64 },
    Continuous { concentration: f64 },
    FiniteDuration { concentration: f64, duration: f64 },
}

impl SourceProfile {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceProfile::Instantaneous { .. } => SourceKind::Instantaneous,
            SourceProfile::Continuous { .. } => SourceKind::Continuous,
            SourceProfile::FiniteDuration { .. } => SourceKind::FiniteDuration,
        }
    }
}

/// Position, orientation and extent of the source
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SourceGeometry {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub flow_angle_deg: f64,
    /// Extent along the flow axis (instantaneous sources)
    pub length: f64,
    /// Transverse extent
    pub width: f64,
    /// Vertical extent
    pub depth: f64,
    pub cross_section_area: f64,
    pub aquifer_thickness: f64,
}

/// Dispersion coefficients along the flow-aligned axes \[L²/T\]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dispersion {
    pub longitudinal: f64,
    pub transverse: f64,
    pub vertical: f64,
}

/// Immutable, validated description of one transport scenario
///
/// Only [`TransportParametersBuilder::build`] creates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportParameters {
    key: ScenarioKey,
    source: SourceProfile,
    geometry: SourceGeometry,
    seepage_velocity: f64,
    dispersion: Dispersion,
    porosity: f64,
    retardation: f64,
    decay_rate: f64,
}

impl TransportParameters {
    /// Start a new builder
    pub fn builder() -> TransportParametersBuilder {
        TransportParametersBuilder::default()
    }

    pub fn key(&self) -> ScenarioKey {
        self.key
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.key.dimensionality
    }

    pub fn source(&self) -> &SourceProfile {
        &self.source
    }

    pub fn geometry(&self) -> &SourceGeometry {
        &self.geometry
    }

    pub fn dispersion(&self) -> &Dispersion {
        &self.dispersion
    }

    pub fn seepage_velocity(&self) -> f64 {
        self.seepage_velocity
    }

    pub fn porosity(&self) -> f64 {
        self.porosity
    }

    pub fn retardation(&self) -> f64 {
        self.retardation
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    /// C0 for continuous and finite-duration sources
    pub fn source_concentration(&self) -> Option<f64> {
        match self.source {
            SourceProfile::Instantaneous { .. } => None,
            SourceProfile::Continuous { concentration }
            | SourceProfile::FiniteDuration { concentration, .. } => Some(concentration),
        }
    }

    /// t0 for finite-duration sources
    pub fn injection_duration(&self) -> Option<f64> {
        match self.source {
            SourceProfile::FiniteDuration { duration, .. } => Some(duration),
            _ => None,
        }
    }

    /// Solute velocity v / R
    pub fn retarded_velocity(&self) -> f64 {
        self.seepage_velocity / self.retardation
    }

    /// Dispersion coefficients divided by R
    pub fn retarded_dispersion(&self) -> Dispersion {
        Dispersion {
            longitudinal: self.dispersion.longitudinal / self.retardation,
            transverse: self.dispersion.transverse / self.retardation,
            vertical: self.dispersion.vertical / self.retardation,
        }
    }

    /// Frame centred on the source and aligned with the flow
    pub fn frame(&self) -> FlowFrame {
        FlowFrame::new(
            Point3::new(self.geometry.x, self.geometry.y, self.geometry.z),
            self.geometry.flow_angle_deg,
            self.key.dimensionality,
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn continuous_1d() -> TransportParametersBuilder {
        TransportParameters::builder()
            .dimensionality(Dimensionality::OneD)
            .source_profile(SourceKind::Continuous)
            .source_concentration(100.0)
            .seepage_velocity(1.0)
            .dispersion_longitudinal(0.5)
    }

    #[test]
    fn test_minimal_continuous_scenario() {
        let params = continuous_1d().build().unwrap();

        assert_eq!(params.key().profile, SourceKind::Continuous);
        assert_eq!(params.porosity(), 1.0);
        assert_eq!(params.retardation(), 1.0);
        assert_eq!(params.decay_rate(), 0.0);
        assert_eq!(params.injection_duration(), None);
    }

    #[test]
    fn test_zero_longitudinal_dispersion_is_rejected() {
        let err = continuous_1d().dispersion_longitudinal(0.0).build().unwrap_err();
        assert_eq!(err.field, "dispersion_longitudinal");
        assert_eq!(err.to_string(), "dispersion_longitudinal must be > 0 (got 0)");
    }

    #[test]
    fn test_finite_duration_requires_duration() {
        let err = continuous_1d()
            .source_profile(SourceKind::FiniteDuration)
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "injection_duration required for finite-duration profile but missing"
        );
    }

    #[test]
    fn test_finite_duration_rejects_zero_duration() {
        let err = continuous_1d()
            .source_profile(SourceKind::FiniteDuration)
            .injection_duration(0.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "injection_duration");
    }

    #[test]
    fn test_continuous_requires_positive_velocity() {
        let err = continuous_1d().seepage_velocity(0.0).build().unwrap_err();
        assert_eq!(err.field, "seepage_velocity");
    }

    #[test]
    fn test_instantaneous_accepts_stagnant_water() {
        let params = TransportParameters::builder()
            .dimensionality(Dimensionality::OneD)
            .source_profile(SourceKind::Instantaneous)
            .injected_mass(100.0)
            .seepage_velocity(0.0)
            .dispersion_longitudinal(0.5)
            .build()
            .unwrap();
        assert_eq!(params.retarded_velocity(), 0.0);
        assert_eq!(params.source_concentration(), None);
    }

    #[test]
    fn test_instantaneous_requires_mass() {
        let err = TransportParameters::builder()
            .dimensionality(Dimensionality::ThreeD)
            .source_profile(SourceKind::Instantaneous)
            .seepage_velocity(0.1)
            .dispersion(0.5, 0.1, 0.01)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "injected_mass");
    }

    #[test]
    fn test_two_dimensional_requires_transverse_dispersion() {
        let err = continuous_1d()
            .dimensionality(Dimensionality::TwoD)
            .source_width(5.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "dispersion_transverse");
        assert!(err.value.is_none());

        let err = continuous_1d()
            .dimensionality(Dimensionality::TwoD)
            .source_width(5.0)
            .dispersion_transverse(0.0)
            .build()
            .unwrap_err();
        assert_eq!(err.value, Some(0.0));
    }

    #[test]
    fn test_plane_sources_require_width_and_depth() {
        let err = continuous_1d()
            .dimensionality(Dimensionality::ThreeD)
            .dispersion(0.5, 0.1, 0.01)
            .source_width(4.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field, "source_depth");
    }

    #[test]
    fn test_porosity_bounds() {
        assert!(continuous_1d().porosity(1.0).build().is_ok());
        assert_eq!(continuous_1d().porosity(0.0).build().unwrap_err().field, "porosity");
        assert_eq!(continuous_1d().porosity(1.2).build().unwrap_err().field, "porosity");
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let err = continuous_1d().decay_rate(f64::NAN).build().unwrap_err();
        assert_eq!(err.field, "decay_rate");
        assert_eq!(err.constraint, "must be finite");
    }

    #[test]
    fn test_missing_dimensionality() {
        let err = TransportParametersBuilder::default().build().unwrap_err();
        assert_eq!(err.field, "dimensionality");
    }

    #[test]
    fn test_retardation_scales_velocity_and_dispersion() {
        let params = continuous_1d().retardation(2.0).build().unwrap();
        assert_eq!(params.retarded_velocity(), 0.5);
        assert_eq!(params.retarded_dispersion().longitudinal, 0.25);
    }

    #[test]
    fn test_builder_deserializes_from_json() {
        let builder: TransportParametersBuilder = serde_json::from_str(
            r#"{
                "dimensionality": "1D",
                "source_profile": "finite-duration",
                "source_concentration": 100.0,
                "injection_duration": 2.0,
                "seepage_velocity": 1.0,
                "dispersion_longitudinal": 0.5
            }"#,
        )
        .unwrap();

        let params = builder.build().unwrap();
        assert_eq!(params.injection_duration(), Some(2.0));
    }

    #[test]
    fn test_unknown_json_field_is_rejected() {
        let result: Result<TransportParametersBuilder, _> = serde_json::from_str(r#"{"velocity": 1.0}"#);
        assert!(result.is_err());
    }
}
