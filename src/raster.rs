//! RGB data raster decoding.
//!
//! Elevation, slope and direction rasters pack a value into the three
//! 8-bit channels of each pixel: `raw = R*65536 + G*256 + B` scaled by
//! 0.01. `(128, 0, 0)` marks a cell with no data, and pixels with
//! `R >= 128 && B >= 1` are in the overflow range and have 2^24
//! subtracted from their scaled value.

use crate::constants::encoding::{
    MAX_DIRECT_RAW, NULL_PIXEL, OVERFLOW_OFFSET, OVERFLOW_RED_MIN, VALUE_SCALE,
};
use crate::error::{MeshStatsError, Result};
use crate::models::MeshGrid;
use image::RgbImage;
use std::path::Path;
use tracing::debug;

/// Decode a single pixel; `None` for the no-data pixel
pub fn decode_pixel([r, g, b]: [u8; 3]) -> Option<f64> {
    if [r, g, b] == NULL_PIXEL {
        return None;
    }

    let raw = (r as u32) << 16 | (g as u32) << 8 | b as u32;
    let mut value = raw as f64 * VALUE_SCALE;

    if r >= OVERFLOW_RED_MIN && b >= 1 {
        value -= OVERFLOW_OFFSET;
    }

    Some(value)
}

/// Decode an RGB image into a grid of the same width and height
pub fn decode_rgb(image: &RgbImage) -> MeshGrid<f64> {
    let (width, height) = image.dimensions();
    let cells = image.pixels().map(|pixel| decode_pixel(pixel.0)).collect();

    MeshGrid::from_pixels(width as usize, height as usize, cells)
}

/// Read an image file as 8-bit RGB, naming the mesh in any failure
pub fn read_rgb(path: &Path, mesh_code: &str) -> Result<RgbImage> {
    let image = image::open(path).map_err(|source| MeshStatsError::RasterDecode {
        mesh_code: mesh_code.to_string(),
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Read {}x{} raster for mesh {}: {}",
        image.width(),
        image.height(),
        mesh_code,
        path.display()
    );

    Ok(image.to_rgb8())
}

/// Encode a non-negative value below the overflow range.
///
/// Returns `None` for negative, non-finite or too-large values, which this
/// encoding cannot represent without going through the overflow branch.
pub fn encode_pixel(value: f64) -> Option<[u8; 3]> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    let raw = (value / VALUE_SCALE).round();
    if raw > MAX_DIRECT_RAW as f64 {
        return None;
    }

    let raw = raw as u32;
    Some([(raw >> 16) as u8, (raw >> 8) as u8, raw as u8])
}

/// Encode an optional value, using the no-data pixel for `None`
pub fn encode_cell(value: Option<f64>) -> Option<[u8; 3]> {
    match value {
        Some(value) => encode_pixel(value),
        None => Some(NULL_PIXEL),
    }
}
