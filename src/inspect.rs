//! Single-mesh diagnostics.
//!
//! Loads one mesh through a [`MeshSource`] and reports its attributes,
//! grid shape and optionally the decoded values of one cell.

use crate::error::{MeshStatsError, Result};
use crate::geology::{GeologyCell, classify_rgb};
use crate::models::{BoundingBox, LandUse, MeshGrid};
use crate::raster::decode_rgb;
use crate::stats::series_date;
use crate::store::{MeshSource, RasterLayer};
use chrono::NaiveDate;
use serde::Serialize;

/// Decoded values of one grid cell; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellValues {
    pub row: usize,
    pub col: usize,
    pub elevation: Option<f64>,
    pub slope: Option<f64>,
    pub direction: Option<f64>,
    pub geology: Option<String>,
}

/// Per-layer grid shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerShape {
    pub layer: String,
    pub width: usize,
    pub height: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshInspection {
    pub mesh_code: String,
    pub extent: BoundingBox,
    pub landuse: LandUse,
    /// `(series name, days)`
    pub series_lengths: Vec<(String, usize)>,
    /// Calendar dates of the first and last day of the precipitation series
    pub series_span: Option<(NaiveDate, NaiveDate)>,
    pub layers: Vec<LayerShape>,
    pub cell: Option<CellValues>,
}

/// Inspect one mesh, decoding the cell at `cell` when given
pub fn inspect_mesh(
    source: &dyn MeshSource,
    mesh_code: &str,
    cell: Option<(usize, usize)>,
) -> Result<MeshInspection> {
    let attributes = source.attributes(mesh_code)?;
    let lookup = source.geology_lookup()?;

    let elevation = decode_rgb(&source.raster(mesh_code, RasterLayer::Elevation)?);
    let slope = decode_rgb(&source.raster(mesh_code, RasterLayer::Slope)?);
    let direction = decode_rgb(&source.raster(mesh_code, RasterLayer::Direction)?);
    let geology = classify_rgb(&source.raster(mesh_code, RasterLayer::Geology)?, &lookup);

    let series = &attributes.series;
    let series_lengths = [
        ("precipitation", series.precipitation.len()),
        ("daylight_hours", series.daylight_hours.len()),
        ("solar_radiation", series.solar_radiation.len()),
        ("average_temperature", series.average_temperature.len()),
        ("maximum_temperature", series.maximum_temperature.len()),
        ("minimum_temperature", series.minimum_temperature.len()),
    ]
    .into_iter()
    .map(|(name, len)| (name.to_string(), len))
    .collect();

    let series_span = series
        .precipitation
        .len()
        .checked_sub(1)
        .and_then(|last| Some((series_date(0)?, series_date(last)?)));

    let layers = vec![
        shape(RasterLayer::Elevation, &elevation),
        shape(RasterLayer::Slope, &slope),
        shape(RasterLayer::Direction, &direction),
        shape(RasterLayer::Geology, &geology),
    ];

    let cell = match cell {
        Some((row, col)) => {
            if row >= elevation.height() || col >= elevation.width() {
                return Err(MeshStatsError::configuration(format!(
                    "cell ({}, {}) is outside the {}x{} grid of mesh {}",
                    row,
                    col,
                    elevation.width(),
                    elevation.height(),
                    mesh_code
                )));
            }
            Some(CellValues {
                row,
                col,
                elevation: elevation.get(row, col).copied(),
                slope: slope.get(row, col).copied(),
                direction: direction.get(row, col).copied(),
                geology: geology.get(row, col).map(GeologyCell::to_string),
            })
        }
        None => None,
    };

    Ok(MeshInspection {
        mesh_code: mesh_code.to_string(),
        extent: attributes.extent,
        landuse: attributes.landuse,
        series_lengths,
        series_span,
        layers,
        cell,
    })
}

fn shape<T>(layer: RasterLayer, grid: &MeshGrid<T>) -> LayerShape {
    LayerShape {
        layer: layer.to_string(),
        width: grid.width(),
        height: grid.height(),
        missing: grid.missing_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SERIES_LENGTH_DAYS;
    use crate::geology::GeologyLookup;
    use crate::models::{ClimateSeries, DailySeries};
    use crate::raster::encode_cell;
    use crate::store::MeshAttributes;
    use image::{Rgb, RgbImage};

    /// In-memory 2x1 mesh
    struct MemorySource;

    impl MeshSource for MemorySource {
        fn attributes(&self, _mesh_code: &str) -> Result<MeshAttributes> {
            let series = DailySeries::new(vec![0.0; SERIES_LENGTH_DAYS]);
            Ok(MeshAttributes {
                extent: BoundingBox {
                    minx: 1.0,
                    miny: 2.0,
                    maxx: 3.0,
                    maxy: 4.0,
                },
                landuse: serde_json::from_value(serde_json::json!({
                    "paddy": 1.0, "other_agricultural": 0.0, "forest": 0.0, "wasteland": 0.0,
                    "building": 0.0, "road": 0.0, "railway": 0.0, "other": 0.0,
                    "inland_water": 0.0, "beach": 0.0, "sea": 0.0, "golf_course": 0.0
                }))
                .unwrap(),
                series: ClimateSeries {
                    precipitation: series.clone(),
                    daylight_hours: series.clone(),
                    solar_radiation: series.clone(),
                    average_temperature: series.clone(),
                    maximum_temperature: series.clone(),
                    minimum_temperature: series,
                },
            })
        }

        fn raster(&self, _mesh_code: &str, layer: RasterLayer) -> Result<RgbImage> {
            let pixels = match layer {
                RasterLayer::Geology => [[0xab, 0xcd, 0xef], [0xff, 0xff, 0xff]],
                _ => [encode_cell(Some(12.5)).unwrap(), encode_cell(None).unwrap()],
            };
            Ok(RgbImage::from_fn(2, 1, |x, _| Rgb(pixels[x as usize])))
        }

        fn geology_lookup(&self) -> Result<GeologyLookup> {
            Ok(GeologyLookup::from_entries([(4, "#ffffff")]))
        }
    }

    #[test]
    fn test_inspect_cell() {
        let inspection = inspect_mesh(&MemorySource, "54382129", Some((0, 0))).unwrap();

        assert_eq!(inspection.extent.maxy, 4.0);
        assert_eq!(inspection.series_lengths.len(), 6);
        assert!(inspection.series_lengths.iter().all(|(_, len)| *len == SERIES_LENGTH_DAYS));
        assert_eq!(
            inspection.series_span,
            Some((
                NaiveDate::from_ymd_opt(1978, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2016, 12, 31).unwrap()
            ))
        );
        assert_eq!(inspection.layers[0].width, 2);
        assert_eq!(inspection.layers[0].missing, 1);
        assert_eq!(inspection.layers[3].missing, 0);

        let cell = inspection.cell.unwrap();
        assert_eq!(cell.elevation, Some(12.5));
        assert_eq!(cell.geology.as_deref(), Some("#abcdef"));
    }

    #[test]
    fn test_inspect_missing_cell_and_mapped_geology() {
        let cell = inspect_mesh(&MemorySource, "54382129", Some((0, 1)))
            .unwrap()
            .cell
            .unwrap();

        assert_eq!(cell.elevation, None);
        assert_eq!(cell.direction, None);
        assert_eq!(cell.geology.as_deref(), Some("4"));
    }

    #[test]
    fn test_inspect_out_of_bounds_cell() {
        assert!(matches!(
            inspect_mesh(&MemorySource, "54382129", Some((1, 0))),
            Err(MeshStatsError::Configuration { .. })
        ));
    }
}
