//! Result objects and their outputs
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs
//! ├── results.rs   ← ConcentrationField, BreakthroughCurve
//! ├── summary.rs   ← peak and exceedance analysis
//! └── export/      ← table export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use plume_rs::output::Thresholds;
//! use plume_rs::output::export::{CsvExporter, Exporter};
//!
//! let summary = curve.summary(&Thresholds::new(0.05, 0.001)?);
//! CsvExporter::default().export_curve(&curve, "well_7.csv")?;
//! ```

pub mod export;
pub mod results;
pub mod summary;

pub use results::{BreakthroughCurve, ConcentrationField, CurveSample, FieldSample};
pub use summary::{BoundingBox, CurveSummary, Exceedance, FieldSummary, Span, Thresholds};
