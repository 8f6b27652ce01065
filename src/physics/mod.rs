//! Parameter model
//!
//! This module holds everything a closed-form solution needs to know about a
//! scenario, independent of how the concentration is computed.
//!
//! # Core Concepts
//!
//! - **Scenario key**: the (dimensionality, source profile) pair formulas are chosen by
//! - **Transport parameters**: validated, immutable source, flow and medium description
//! - **Query point**: coordinates plus elapsed time where a concentration is requested
//! - **Flow frame**: mapping from field coordinates to the source-centred, flow-aligned frame
//!
//! # Architecture
//!
//! Parameters are **separate from formulas**:
//! - This module validates input once, at construction
//! - [`crate::models`] provides the closed-form kernels and trusts their input
//! - [`crate::solver`] picks the kernel for a scenario and evaluates it over many points
//!
//! # Example
//!
//! ```rust
//! use plume_rs::physics::{Dimensionality, QueryPoint, SourceKind, TransportParameters};
//!
//! let params = TransportParameters::builder()
//!     .dimensionality(Dimensionality::TwoD)
//!     .source_profile(SourceKind::Continuous)
//!     .source_concentration(50.0)
//!     .seepage_velocity(0.2)
//!     .dispersion(2.0, 0.2, 0.0)
//!     .source_width(10.0)
//!     .flow_angle_deg(30.0)
//!     .build()
//!     .unwrap();
//!
//! let point = QueryPoint::new(40.0, 25.0, 0.0, 365.0).unwrap();
//! let local = params.frame().to_local(&point);
//! assert!(local.longitudinal > 0.0);
//! ```

// module declaration
pub mod frame;
pub mod query;
pub mod traits;
pub mod transport;

// re-export commonly used types for convenience
pub use frame::{FlowFrame, LocalCoordinates};
pub use query::{Axis, GridSpec, QueryPoint, SpatialPoint};
pub use traits::{AnalyticalSolution, Dimensionality, ScenarioKey, SourceKind};
pub use transport::{
    Dispersion,
    SourceGeometry,
    SourceProfile,
    TransportParameters,
    TransportParametersBuilder, };
