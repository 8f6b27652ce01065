//! Evaluation options
//!
//! # Design Philosophy
//!
//! Options travel with each request: nothing in the engine is process-wide, so two
//! callers evaluating with different thresholds on different threads never see each
//! other's settings.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of points above which a field is evaluated in parallel
///
/// Below it, dispatching to the thread pool costs more than the closed forms themselves.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// Multiple of `f64::EPSILON · scale` below zero that still counts as rounding residue
pub const DEFAULT_CLAMP_TOLERANCE_FACTOR: f64 = 1e4;

// =================================================================================================
// Evaluation options
// =================================================================================================

/// How a field or curve is evaluated
///
/// # Examples
///
/// ```rust
/// use plume_rs::solver::EvaluationOptions;
///
/// let options = EvaluationOptions::default().with_parallel_threshold(5000);
/// assert!(options.validate().is_ok());
///
/// let sequential = EvaluationOptions::sequential();
/// assert_eq!(sequential.parallel_threshold, usize::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationOptions {
    /// Fields with more points than this go to the rayon pool (`parallel` feature)
    pub parallel_threshold: usize,

    /// ε = factor · f64::EPSILON · scale, scale being C0 or the pulse amplitude
    pub clamp_tolerance_factor: f64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            clamp_tolerance_factor: DEFAULT_CLAMP_TOLERANCE_FACTOR,
        }
    }
}

impl EvaluationOptions {
    /// Never dispatch to the thread pool
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Default::default()
        }
    }

    /// Builder pattern: set parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builder pattern: set clamp tolerance factor
    pub fn with_clamp_tolerance_factor(mut self, factor: f64) -> Self {
        self.clamp_tolerance_factor = factor;
        self
    }

    /// Validate options
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.parallel_threshold == 0 {
            return Err(ValidationError::new(
                "options.parallel_threshold",
                "must be >= 1",
                Some(0.0),
            ));
        }
        if !self.clamp_tolerance_factor.is_finite() || self.clamp_tolerance_factor < 0.0 {
            return Err(ValidationError::new(
                "options.clamp_tolerance_factor",
                "must be finite and >= 0",
                Some(self.clamp_tolerance_factor),
            ));
        }
        Ok(())
    }

    /// Clamp tolerance ε for a solution of magnitude `scale`
    pub fn tolerance(&self, scale: f64) -> f64 {
        self.clamp_tolerance_factor * f64::EPSILON * scale.abs()
    }

    /// Whether `points` evaluations should run in parallel
    pub(crate) fn is_parallel(&self, points: usize) -> bool {
        points > self.parallel_threshold
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EvaluationOptions::default();
        assert_eq!(options.parallel_threshold, 1000);
        assert_eq!(options.clamp_tolerance_factor, 1e4);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let err = EvaluationOptions::default().with_parallel_threshold(0).validate().unwrap_err();
        assert_eq!(err.field, "options.parallel_threshold");
    }

    #[test]
    fn test_negative_factor_is_rejected() {
        let err = EvaluationOptions::default()
            .with_clamp_tolerance_factor(-1.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, "options.clamp_tolerance_factor");
    }

    #[test]
    fn test_tolerance_scales_with_magnitude() {
        let options = EvaluationOptions::default();
        assert_eq!(options.tolerance(100.0), 1e4 * f64::EPSILON * 100.0);
        assert!(options.tolerance(1.0) < options.tolerance(100.0));
    }

    #[test]
    fn test_parallel_switch() {
        let options = EvaluationOptions::default();
        assert!(!options.is_parallel(1000));
        assert!(options.is_parallel(1001));
        assert!(!EvaluationOptions::sequential().is_parallel(usize::MAX - 1));
    }

    #[test]
    fn test_partial_json() {
        let options: EvaluationOptions = serde_json::from_str(r#"{"parallel_threshold": 64}"#).unwrap();
        assert_eq!(options.parallel_threshold, 64);
        assert_eq!(options.clamp_tolerance_factor, DEFAULT_CLAMP_TOLERANCE_FACTOR);
    }
}
