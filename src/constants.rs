//! Application constants for the mesh statistics processor
//!
//! This module contains bundle file names, the fixed daily series range,
//! raster encoding constants and output defaults used throughout the crate.

// =============================================================================
// Bundle Layout
// =============================================================================

/// Per-mesh attribute file inside each mesh directory
pub const MESHDATA_FILE_NAME: &str = "meshdata.json";

/// Geology color table shared by every mesh under a bundle root
pub const GEOLOGY_TABLE_FILE_NAME: &str = "geology_hex.json";

/// Raster file names inside each mesh directory
pub const ELEVATION_FILE_NAME: &str = "dem.png";
pub const SLOPE_FILE_NAME: &str = "slope.png";
pub const DIRECTION_FILE_NAME: &str = "direction.png";
pub const GEOLOGY_FILE_NAME: &str = "geology.png";

/// Output file written into the output directory
pub const OUTPUT_FILE_NAME: &str = "mesh_stats.tsv";

// =============================================================================
// Daily Series Range
// =============================================================================

/// First day covered by every daily series: 1978-01-01
pub const SERIES_START_YEAR: i32 = 1978;

/// Last day covered by every daily series: 2016-12-31
pub const SERIES_END_YEAR: i32 = 2016;

/// Number of days from 1978-01-01 through 2016-12-31 inclusive
pub const SERIES_LENGTH_DAYS: usize = 14_245;

/// Default inclusive aggregation window
pub const DEFAULT_START_YEAR: i32 = 1986;
pub const DEFAULT_END_YEAR: i32 = 2015;

/// Days per year assumed by the legacy offset rule
pub const LEGACY_DAYS_PER_YEAR: usize = 365;

pub const MONTHS_PER_YEAR: usize = 12;

// =============================================================================
// Raster Encoding
// =============================================================================

pub mod encoding {
    /// Scale applied to the packed 24-bit RGB integer
    pub const VALUE_SCALE: f64 = 0.01;

    /// Subtracted from the scaled value of pixels in the overflow range
    pub const OVERFLOW_OFFSET: f64 = 16_777_216.0;

    /// Reserved "no data" pixel
    pub const NULL_PIXEL: [u8; 3] = [128, 0, 0];

    /// Red channel at or above which a pixel is in the overflow range
    pub const OVERFLOW_RED_MIN: u8 = 128;

    /// Largest packed integer the encoder will emit without entering the overflow range
    pub const MAX_DIRECT_RAW: u32 = 0x7F_FF_FF;
}

// =============================================================================
// Export
// =============================================================================

/// Text written for statistics that are structurally absent
pub const ABSENT_VALUE: &str = "None";

/// Prefix of geology count columns
pub const GEOLOGY_COLUMN_PREFIX: &str = "geol_";

/// Land-use categories in export order: (column suffix, original key)
pub const LANDUSE_CATEGORIES: &[(&str, &str)] = &[
    ("paddy", "田"),
    ("other_agricultural", "他農用地"),
    ("forest", "森林"),
    ("wasteland", "荒地"),
    ("building", "建物用地"),
    ("road", "道路"),
    ("railway", "鉄道"),
    ("other", "他用地"),
    ("inland_water", "河川湖沼"),
    ("beach", "海浜"),
    ("sea", "海水域"),
    ("golf_course", "ゴルフ場"),
];

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of meshes processed concurrently
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}
