//! Table export of result objects.
//!
//! # Architecture
//!
//! The [`Exporter`] trait abstracts the export format. Each format is an independent
//! implementation in its own sub-module, so adding a format means adding a file.
//!
//! | Format  | Module    |
//! |---------|-----------|
//! | CSV     | [`csv`]   |
//!
//! # Usage example
//!
//! ```rust,no_run
//! use plume_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
//! # fn run(field: &plume_rs::output::ConcentrationField) -> Result<(), Box<dyn std::error::Error>> {
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_parameters(field.parameters()));
//! CsvExporter::new(config).export_field(field, "plume.csv")?;
//! # Ok(())
//! # }
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::output::{BreakthroughCurve, ConcentrationField};

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so the caller can react
/// precisely without boxing. It must absorb `io::Error` for the path helpers.
///
/// # Implementing this trait
///
/// A new format implements [`write_field`](Exporter::write_field) and
/// [`write_curve`](Exporter::write_curve); writing to a file comes for free.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error + From<std::io::Error>;

    /// Writes one row per sample: `x`, `y`, `z`, `t`, concentration.
    fn write_field<W: Write>(&self, field: &ConcentrationField, writer: W) -> Result<(), Self::Error>;

    /// Writes one row per sample: `t`, concentration.
    fn write_curve<W: Write>(&self, curve: &BreakthroughCurve, writer: W) -> Result<(), Self::Error>;

    /// Creates (or truncates) `path` and writes the field to it.
    fn export_field<P: AsRef<Path>>(&self, field: &ConcentrationField, path: P) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_field(field, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Creates (or truncates) `path` and writes the curve to it.
    fn export_curve<P: AsRef<Path>>(&self, curve: &BreakthroughCurve, path: P) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_curve(curve, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
