//! Per-mesh record assembly
//!
//! Runs the decoders and statistics over one mesh's rasters and series.

use crate::error::Result;
use crate::geology::{GeologyCell, GeologyLookup, classify_rgb, count_categories};
use crate::models::MeshRecord;
use crate::raster::decode_rgb;
use crate::stats::{MonthlyAggregator, climate_means, summarize_direction, summarize_grid};
use crate::store::{MeshSource, RasterLayer};
use tracing::debug;

/// Build the output record of one mesh
pub fn build_record(
    source: &dyn MeshSource,
    mesh_code: &str,
    lookup: &GeologyLookup,
    aggregator: &MonthlyAggregator,
) -> Result<MeshRecord> {
    let attributes = source.attributes(mesh_code)?;

    let elevation = decode_rgb(&source.raster(mesh_code, RasterLayer::Elevation)?);
    let slope = decode_rgb(&source.raster(mesh_code, RasterLayer::Slope)?);
    let direction = decode_rgb(&source.raster(mesh_code, RasterLayer::Direction)?);
    let geology = classify_rgb(&source.raster(mesh_code, RasterLayer::Geology)?, lookup);

    debug!(
        "Mesh {}: {}x{} grid, {} elevation cells missing",
        mesh_code,
        elevation.width(),
        elevation.height(),
        elevation.missing_count()
    );

    let geology_counts = count_categories(&geology);
    let unmapped: usize = geology_counts
        .iter()
        .filter(|(cell, _)| matches!(cell, GeologyCell::Unmapped(_)))
        .map(|(_, count)| count)
        .sum();
    if unmapped > 0 {
        debug!(
            "Mesh {}: {} geology cells have colors outside the table",
            mesh_code, unmapped
        );
    }

    Ok(MeshRecord {
        mesh_code: mesh_code.to_string(),
        climate: climate_means(&attributes.series, aggregator)?,
        elevation: summarize_grid(&elevation),
        slope: summarize_grid(&slope),
        direction: summarize_direction(&direction),
        geology_counts,
        extent: attributes.extent,
        landuse: attributes.landuse,
    })
}
