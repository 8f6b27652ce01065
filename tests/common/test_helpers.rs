//! Helper functions for integration tests
//!
//! Standard scenarios shared by the integration tests. Each returns a builder so a test
//! can override one or two fields before calling `build()`.

#![allow(dead_code)]

use plume_rs::physics::{Dimensionality, SourceKind, TransportParameters, TransportParametersBuilder};

/// 1D continuous source: C0 = 100, v = 1, D = 0.5
pub fn continuous_1d() -> TransportParametersBuilder {
    TransportParameters::builder()
        .dimensionality(Dimensionality::OneD)
        .source_profile(SourceKind::Continuous)
        .source_concentration(100.0)
        .seepage_velocity(1.0)
        .dispersion_longitudinal(0.5)
}

/// 1D slug: M = 10, n = 0.3, A = 2, v = 0.5, D = 0.2, λ = 0.01
pub fn slug_1d() -> TransportParametersBuilder {
    TransportParameters::builder()
        .dimensionality(Dimensionality::OneD)
        .source_profile(SourceKind::Instantaneous)
        .injected_mass(10.0)
        .porosity(0.3)
        .cross_section_area(2.0)
        .seepage_velocity(0.5)
        .dispersion_longitudinal(0.2)
        .decay_rate(0.01)
}

/// 2D continuous plane source of width 4: C0 = 100, v = 1, D = (0.5, 0.05)
pub fn plane_source_2d() -> TransportParametersBuilder {
    TransportParameters::builder()
        .dimensionality(Dimensionality::TwoD)
        .source_profile(SourceKind::Continuous)
        .source_concentration(100.0)
        .seepage_velocity(1.0)
        .dispersion(0.5, 0.05, 0.0)
        .source_width(4.0)
}

/// Relative error |a - b| / |b| (absolute error when b is zero)
pub fn relative_error(computed: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        computed.abs()
    } else {
        ((computed - expected) / expected).abs()
    }
}
