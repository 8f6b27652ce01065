//! Error taxonomy of the engine
//!
//! Three families of failure can reach a caller:
//!
//! - [`ValidationError`]: malformed or physically inconsistent input. Always raised
//!   before any formula runs, always recoverable by correcting the input.
//! - [`EngineError::InternalInconsistency`]: the scenario resolver found no usable
//!   formula for a validated scenario. Indicates a library gap, fatal to the request.
//! - Computation errors ([`EngineError::NegativeConcentration`], [`EngineError::NonFinite`]):
//!   a formula produced a value the clamp policy refuses to hide.
//!
//! The behaviour at the continuous-source singularity (t = 0 at the source origin) is a
//! numeric convention, not an error: see [`crate::models::continuous`].

use thiserror::Error;

use crate::physics::{Dimensionality, QueryPoint, SourceKind};

/// Offending field, violated constraint and, when there is one, the offending value
///
/// # Example
///
/// ```rust
/// use plume_rs::error::ValidationError;
///
/// let err = ValidationError::new("dispersion_longitudinal", "must be > 0", Some(0.0));
/// assert_eq!(err.to_string(), "dispersion_longitudinal must be > 0 (got 0)");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} {constraint}{}", describe_value(.value))]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `"injection_duration"`, `"times[3]"`)
    pub field: String,

    /// Human readable constraint (e.g. `"must be > 0"`)
    pub constraint: String,

    /// Offending value, absent when the field itself is missing
    pub value: Option<f64>,
}

fn describe_value(value: &Option<f64>) -> String {
    match value {
        Some(v) => format!(" (got {v})"),
        None => String::new(),
    }
}

impl ValidationError {
    /// Create a validation error
    pub fn new(field: impl Into<String>, constraint: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            value,
        }
    }

    /// A required field is absent for the selected scenario
    pub fn missing(field: impl Into<String>, context: &str) -> Self {
        Self::new(field, format!("required for {context} but missing"), None)
    }
}

// Field checks shared by the parameter builders

pub(crate) fn required(field: &str, value: Option<f64>, context: &str) -> Result<f64, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field, context))
}

pub(crate) fn finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::new(field, "must be finite", Some(value)))
    }
}

pub(crate) fn positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::new(field, "must be > 0", Some(value)))
    }
}

pub(crate) fn non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
    if finite(field, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::new(field, "must be >= 0", Some(value)))
    }
}

/// Every failure the engine reports
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("no formula available for {dimensionality} {profile} source: {reason}")]
    InternalInconsistency {
        dimensionality: Dimensionality,
        profile: SourceKind,
        reason: String,
    },

    #[error("concentration {value:e} at {point} is below the clamp tolerance -{tolerance:e}")]
    NegativeConcentration {
        point: QueryPoint,
        value: f64,
        tolerance: f64,
    },

    #[error("non-finite concentration at {point}")]
    NonFinite { point: QueryPoint },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// `true` for errors caused by caller input (worth re-prompting for)
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }
}

/// Result alias used across the crate
pub type EngineResult<T> = Result<T, EngineError>;
