//! CSV export of concentration fields and breakthrough curves
//!
//! Tables open in spreadsheets, pandas and most GIS tools.
//!
//! # Field output
//!
//! ```csv
//! # Groundwater Transport Prediction
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Model: 2D continuous
//! # Seepage Velocity: 0.5
//! # Porosity: 0.3
//! # Retardation: 1
//! # Decay Rate: 0
//! #
//! x,y,z,t,concentration
//! 0.000000,-5.000000,0.000000,365.000000,12.345678
//! ...
//! ```
//!
//! The metadata block is only written when `include_metadata` is set. Curves have the
//! columns `t` and `concentration`.

use std::io::Write;

use crate::output::export::Exporter;
use crate::output::{BreakthroughCurve, ConcentrationField};
use crate::physics::TransportParameters;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("delimiter {0:?} is also the decimal separator")]
    AmbiguousDelimiter(char),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use plume_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     precision: 10,
///     ..CsvConfig::european()
/// };
/// assert_eq!(config.delimiter, ';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "t")
    pub time_header: String,

    /// Header of the concentration column (default: "concentration")
    pub concentration_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "t".to_string(),
            concentration_header: "concentration".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: set column headers
    pub fn headers(mut self, time: impl Into<String>, concentration: impl Into<String>) -> Self {
        self.time_header = time.into();
        self.concentration_header = concentration.into();
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }

    fn validate(&self) -> Result<(), CsvError> {
        if self.delimiter == self.decimal_separator {
            return Err(CsvError::AmbiguousDelimiter(self.delimiter));
        }
        Ok(())
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set appear in the header.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Scenario label (e.g. "2D continuous")
    pub model_name: Option<String>,

    pub seepage_velocity: Option<f64>,

    pub porosity: Option<f64>,

    pub retardation: Option<f64>,

    pub decay_rate: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Label and aquifer properties of a scenario
    pub fn from_parameters(params: &TransportParameters) -> Self {
        Self {
            model_name: Some(params.key().to_string()),
            seepage_velocity: Some(params.seepage_velocity()),
            porosity: Some(params.porosity()),
            retardation: Some(params.retardation()),
            decay_rate: Some(params.decay_rate()),
            custom: Vec::new(),
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(writer: &mut W, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(writer, "# Groundwater Transport Prediction")?;

    let now = chrono::Utc::now();
    writeln!(writer, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(writer, "# Model: {model}")?;
    }
    if let Some(velocity) = metadata.seepage_velocity {
        writeln!(writer, "# Seepage Velocity: {velocity}")?;
    }
    if let Some(porosity) = metadata.porosity {
        writeln!(writer, "# Porosity: {porosity}")?;
    }
    if let Some(retardation) = metadata.retardation {
        writeln!(writer, "# Retardation: {retardation}")?;
    }
    if let Some(decay) = metadata.decay_rate {
        writeln!(writer, "# Decay Rate: {decay}")?;
    }

    for (key, value) in &metadata.custom {
        writeln!(writer, "# {key}: {value}")?;
    }

    writeln!(writer, "#")
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    fn write_preamble<W: Write>(&self, writer: &mut W) -> Result<(), CsvError> {
        self.config.validate()?;
        if self.config.include_metadata {
            if let Some(metadata) = &self.config.metadata {
                write_metadata_header(writer, metadata)?;
            }
        }
        Ok(())
    }

    fn write_row<W: Write>(&self, writer: &mut W, values: &[f64]) -> std::io::Result<()> {
        let delimiter = self.config.delimiter.to_string();
        let row: Vec<String> = values.iter().map(|&value| format_number(value, &self.config)).collect();
        writeln!(writer, "{}", row.join(&delimiter))
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn write_field<W: Write>(&self, field: &ConcentrationField, mut writer: W) -> Result<(), CsvError> {
        self.write_preamble(&mut writer)?;

        let d = self.config.delimiter;
        writeln!(
            writer,
            "x{d}y{d}z{d}{}{d}{}",
            self.config.time_header, self.config.concentration_header
        )?;

        for sample in field {
            let point = &sample.point;
            self.write_row(&mut writer, &[point.x(), point.y(), point.z(), point.t(), sample.concentration])?;
        }

        log::debug!("wrote {} field rows as CSV", field.len());
        Ok(())
    }

    fn write_curve<W: Write>(&self, curve: &BreakthroughCurve, mut writer: W) -> Result<(), CsvError> {
        self.write_preamble(&mut writer)?;

        writeln!(
            writer,
            "{}{}{}",
            self.config.time_header, self.config.delimiter, self.config.concentration_header
        )?;

        for sample in curve.samples() {
            self.write_row(&mut writer, &[sample.t, sample.concentration])?;
        }

        log::debug!("wrote {} curve rows as CSV", curve.len());
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
