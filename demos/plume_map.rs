//! Example: Solvent plume from a leaking tank
//!
//! Predicts the dissolved plume of a solvent leaking from an underground storage tank
//! for two years, then stopping:
//!
//! - Plan-view concentration map one year after the leak stopped
//! - Breakthrough curve at a downstream monitoring well
//! - Exceedance of the drinking-water standard, exported as CSV
//!
//! **Aquifer** (sandy, regional flow towards north-east):
//! - v = 0.3 m/d (seepage velocity), flow at 30° from the x axis
//! - αL = 10 m, αT = 1 m → D = α·v
//! - n = 0.3 (effective porosity), R = 1.5 (retardation)
//! - λ = 2·10⁻⁴ 1/d (first-order biodegradation)
//!
//! **Source**: 10 m wide, C0 = 50 mg/L for 730 days.

use plume_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
use plume_rs::prelude::*;

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("═══════════════════════════════════════════════════════");
    println!("  Solvent Plume - Finite-Duration Leak");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Aquifer and source ======

    let velocity = 0.3; // [m/d]
    let longitudinal_dispersivity = 10.0; // [m]
    let transverse_dispersivity = 1.0; // [m]

    let params = TransportParameters::builder()
        .dimensionality(Dimensionality::TwoD)
        .source_profile(SourceKind::FiniteDuration)
        .source_concentration(50.0)
        .injection_duration(730.0)
        .seepage_velocity(velocity)
        .flow_angle_deg(30.0)
        .dispersion(longitudinal_dispersivity * velocity, transverse_dispersivity * velocity, 0.0)
        .source_width(10.0)
        .porosity(0.3)
        .retardation(1.5)
        .decay_rate(2e-4)
        .build()?;

    println!("Scenario: {}", params.key());
    println!("  v (velocity)    : {} m/d", params.seepage_velocity());
    println!("  R (retardation) : {}", params.retardation());
    println!("  λ (decay)       : {} 1/d\n", params.decay_rate());

    let thresholds = Thresholds::new(0.005, 0.0005)?;
    let options = EvaluationOptions::default();
    let tmp_dir = std::env::temp_dir();

    // ====== Plan-view map ======

    let grid = GridSpec::plane(Axis::linspace(-50.0, 400.0, 226), Axis::linspace(-100.0, 300.0, 201), 1095.0);

    let start = Instant::now();
    let field = evaluate_grid(&params, &grid, &options)?;
    println!("Map: {} points in {:.1?}", field.len(), start.elapsed());

    let summary = field.summary(&thresholds);
    if let Some(peak) = summary.peak {
        println!("  Peak        : {:.4} mg/L at {}", peak.concentration, peak.point);
    }
    println!("  > standard  : {} points", summary.above_standard.count);
    if let Some(area) = summary.above_standard.area(&grid) {
        println!("  Plume area  : {:.0} m²", area);
    }
    if let Some(extent) = summary.above_standard.extent {
        println!(
            "  Extent      : x ∈ [{:.0}, {:.0}], y ∈ [{:.0}, {:.0}]\n",
            extent.min.x, extent.max.x, extent.min.y, extent.max.y
        );
    }

    let map_path = tmp_dir.join("plume_map.csv");
    let exporter = CsvExporter::new(CsvConfig::default().with_metadata(CsvMetadata::from_parameters(&params)));
    exporter.export_field(&field, &map_path)?;
    println!("  Written to {}\n", map_path.display());

    // ====== Monitoring well ======

    let well = SpatialPoint::new(150.0, 87.0, 0.0);
    let times: Vec<f64> = (0..=120).map(|month| f64::from(month) * 30.0).collect();
    let curve = evaluate_curve(&params, &well, &times, &options)?;

    let summary = curve.summary(&thresholds);
    println!("Well at ({}, {}):", well.x, well.y);
    if let Some(peak) = summary.peak {
        println!("  Peak        : {:.4} mg/L on day {}", peak.concentration, peak.t);
    }
    match summary.above_standard {
        Some(span) => println!("  > standard  : day {} to day {} ({} days)", span.start, span.end, span.duration()),
        None => println!("  > standard  : never"),
    }

    let curve_path = tmp_dir.join("plume_well.csv");
    exporter.export_curve(&curve, &curve_path)?;
    println!("  Written to {}", curve_path.display());

    Ok(())
}
