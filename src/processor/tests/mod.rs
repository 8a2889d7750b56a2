//! Integration tests for the processor module
//!
//! Tests the complete processing pipeline over temporary mesh bundles.

pub mod basic_processing;

use crate::constants::{GEOLOGY_TABLE_FILE_NAME, MESHDATA_FILE_NAME, SERIES_LENGTH_DAYS};
use crate::raster::encode_cell;
use crate::store::RasterLayer;
use image::{Rgb, RgbImage};
use serde_json::json;
use std::fs;
use std::path::Path;

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const BLACK: [u8; 3] = [0, 0, 0];
pub const RED: [u8; 3] = [255, 0, 0];

/// Contents of one fixture mesh
pub struct MeshFixture {
    pub elevation: Vec<Vec<Option<f64>>>,
    pub slope: Vec<Vec<Option<f64>>>,
    pub direction: Vec<Vec<Option<f64>>>,
    pub geology: Vec<Vec<[u8; 3]>>,
    /// Constant value of every daily series
    pub daily_value: f64,
}

impl Default for MeshFixture {
    fn default() -> Self {
        Self {
            elevation: vec![vec![Some(100.0), Some(102.0)], vec![Some(100.0), None]],
            slope: vec![vec![Some(5.0), Some(15.0)], vec![Some(10.0), Some(10.0)]],
            direction: vec![vec![Some(350.0), Some(10.0)], vec![None, None]],
            geology: vec![vec![WHITE, BLACK], vec![WHITE, WHITE]],
            daily_value: 1.0,
        }
    }
}

fn write_rgb(path: &Path, rows: &[Vec<[u8; 3]>]) {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, Vec::len) as u32;
    let image = RgbImage::from_fn(width, height, |x, y| Rgb(rows[y as usize][x as usize]));
    image.save(path).unwrap();
}

fn write_values(path: &Path, rows: &[Vec<Option<f64>>]) {
    let pixels: Vec<Vec<[u8; 3]>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| encode_cell(*cell).unwrap()).collect())
        .collect();
    write_rgb(path, &pixels);
}

/// Write the shared geology table as `[hex, code]` pairs
pub fn write_geology_table(root: &Path, entries: &[(&str, i64)]) {
    let rows: Vec<_> = entries.iter().map(|(hex, code)| json!([hex, code])).collect();
    fs::write(
        root.join(GEOLOGY_TABLE_FILE_NAME),
        serde_json::to_string(&rows).unwrap(),
    )
    .unwrap();
}

/// Write one mesh directory
pub fn write_mesh(root: &Path, mesh_code: &str, mesh: &MeshFixture) {
    let dir = root.join(mesh_code);
    fs::create_dir_all(&dir).unwrap();

    write_values(&dir.join(RasterLayer::Elevation.file_name()), &mesh.elevation);
    write_values(&dir.join(RasterLayer::Slope.file_name()), &mesh.slope);
    write_values(&dir.join(RasterLayer::Direction.file_name()), &mesh.direction);
    write_rgb(&dir.join(RasterLayer::Geology.file_name()), &mesh.geology);

    let series = vec![mesh.daily_value; SERIES_LENGTH_DAYS];
    let meshdata = json!({
        "minx": 139.0, "miny": 35.0, "maxx": 139.0125, "maxy": 35.0125,
        "paddy": 10.0, "other_agricultural": 0.0, "forest": 20.0, "wasteland": 0.0,
        "building": 5.0, "road": 1.0, "railway": 0.0, "other": 0.0,
        "inland_water": 0.0, "beach": 0.0, "sea": 0.0, "golf_course": 0.0,
        "precipitation": series,
        "daylight_hours": series,
        "solar_radiation": series,
        "average_temperature": series,
        "maximum_temperature": series,
        "minimum_temperature": series,
    });
    fs::write(dir.join(MESHDATA_FILE_NAME), meshdata.to_string()).unwrap();
}

/// Read a written TSV into rows of fields
pub fn read_tsv(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Value of `column` in a data row
pub fn field<'a>(rows: &'a [Vec<String>], row: usize, column: &str) -> &'a str {
    let index = rows[0]
        .iter()
        .position(|name| name == column)
        .unwrap_or_else(|| panic!("column {} missing", column));
    &rows[row][index]
}
