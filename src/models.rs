//! Core data structures and types for mesh statistics processing.
//!
//! Defines the decoded grids, daily climate series, statistic summaries
//! and the per-mesh output record shared across the library.

use crate::constants::{LANDUSE_CATEGORIES, MONTHS_PER_YEAR};
use crate::geology::GeologyCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Row-major 2-D grid where each cell either holds a value or is missing
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid<T> {
    width: usize,
    height: usize,
    cells: Vec<Option<T>>,
}

impl<T> MeshGrid<T> {
    /// Build a grid from row-major cells.
    ///
    /// Returns `None` when `cells.len() != width * height`.
    pub fn new(width: usize, height: usize, cells: Vec<Option<T>>) -> Option<Self> {
        if cells.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from decoded image pixels, which always match the dimensions
    pub(crate) fn from_pixels(width: usize, height: usize, cells: Vec<Option<T>>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Build a grid from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<Option<T>>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Self::new(width, height, rows.into_iter().flatten().collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(row, col)`; `None` when out of bounds or missing
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells[row * self.width + col].as_ref()
    }

    /// Values of non-missing cells in row-major order
    pub fn present(&self) -> impl Iterator<Item = &T> {
        self.cells.iter().flatten()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

/// Daily observations starting at 1978-01-01, addressed by day offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeries(Vec<f64>);

impl DailySeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Sum of days `start..end`; `None` when the window runs past the series
    pub fn window_sum(&self, start: usize, end: usize) -> Option<f64> {
        self.0.get(start..end).map(|days| days.iter().sum())
    }
}

impl From<Vec<f64>> for DailySeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Exactly twelve monthly values, index 0 = January
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMeans(pub [f64; MONTHS_PER_YEAR]);

impl MonthlyMeans {
    /// Value for a 1-based month.
    ///
    /// # Panics
    ///
    /// Panics if `month` is outside `1..=12`.
    pub fn month(&self, month: u32) -> f64 {
        self.0[month as usize - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

/// Full summary of a scalar grid after integer truncation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveSummary {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub median: f64,
    /// Most frequent value, smallest on ties
    pub mode: f64,
}

/// Mean direction of a bearing grid, degrees in `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircularSummary {
    pub mean: f64,
}

/// Statistic shape for a grid. `None` payloads mean every field is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StatSummary {
    Descriptive(Option<DescriptiveSummary>),
    Circular(Option<CircularSummary>),
}

impl StatSummary {
    pub fn mean(&self) -> Option<f64> {
        match self {
            StatSummary::Descriptive(summary) => summary.map(|s| s.mean),
            StatSummary::Circular(summary) => summary.map(|s| s.mean),
        }
    }

    /// Always absent for circular data
    pub fn std(&self) -> Option<f64> {
        match self {
            StatSummary::Descriptive(summary) => summary.map(|s| s.std),
            StatSummary::Circular(_) => None,
        }
    }

    pub fn median(&self) -> Option<f64> {
        match self {
            StatSummary::Descriptive(summary) => summary.map(|s| s.median),
            StatSummary::Circular(_) => None,
        }
    }

    pub fn mode(&self) -> Option<f64> {
        match self {
            StatSummary::Descriptive(summary) => summary.map(|s| s.mode),
            StatSummary::Circular(_) => None,
        }
    }
}

/// Geographic extent of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl BoundingBox {
    /// `[minx, miny, maxx, maxy]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.minx, self.miny, self.maxx, self.maxy]
    }
}

/// Land-use areas per category. Japanese keys are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandUse {
    #[serde(alias = "田")]
    pub paddy: f64,
    #[serde(alias = "他農用地")]
    pub other_agricultural: f64,
    #[serde(alias = "森林")]
    pub forest: f64,
    #[serde(alias = "荒地")]
    pub wasteland: f64,
    #[serde(alias = "建物用地")]
    pub building: f64,
    #[serde(alias = "道路")]
    pub road: f64,
    #[serde(alias = "鉄道")]
    pub railway: f64,
    #[serde(alias = "他用地")]
    pub other: f64,
    #[serde(alias = "河川湖沼")]
    pub inland_water: f64,
    #[serde(alias = "海浜")]
    pub beach: f64,
    #[serde(alias = "海水域")]
    pub sea: f64,
    #[serde(alias = "ゴルフ場")]
    pub golf_course: f64,
}

impl LandUse {
    /// Areas in `LANDUSE_CATEGORIES` order
    pub fn areas(&self) -> [f64; 12] {
        [
            self.paddy,
            self.other_agricultural,
            self.forest,
            self.wasteland,
            self.building,
            self.road,
            self.railway,
            self.other,
            self.inland_water,
            self.beach,
            self.sea,
            self.golf_course,
        ]
    }

    /// `(column suffix, area)` pairs
    pub fn named_areas(&self) -> impl Iterator<Item = (&'static str, f64)> {
        LANDUSE_CATEGORIES
            .iter()
            .map(|(name, _)| *name)
            .zip(self.areas())
    }
}

/// The six daily climate series of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateSeries {
    pub precipitation: DailySeries,
    pub daylight_hours: DailySeries,
    pub solar_radiation: DailySeries,
    pub average_temperature: DailySeries,
    pub maximum_temperature: DailySeries,
    pub minimum_temperature: DailySeries,
}

/// Multi-year monthly climate means of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateMeans {
    pub temperature_mean: MonthlyMeans,
    pub temperature_max: MonthlyMeans,
    pub temperature_min: MonthlyMeans,
    pub precipitation: MonthlyMeans,
    pub daylight_hours: MonthlyMeans,
    pub solar_radiation: MonthlyMeans,
}

impl ClimateMeans {
    /// Blocks in export column order
    pub fn blocks(&self) -> [&MonthlyMeans; 6] {
        [
            &self.temperature_mean,
            &self.temperature_max,
            &self.temperature_min,
            &self.precipitation,
            &self.daylight_hours,
            &self.solar_radiation,
        ]
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRecord {
    pub mesh_code: String,
    pub climate: ClimateMeans,
    pub elevation: StatSummary,
    pub slope: StatSummary,
    pub direction: StatSummary,
    pub geology_counts: BTreeMap<GeologyCell, usize>,
    pub extent: BoundingBox,
    pub landuse: LandUse,
}

impl MeshRecord {
    /// Cell count for a category code, zero when the mesh lacks it
    pub fn geology_count(&self, code: i64) -> usize {
        self.geology_counts
            .get(&GeologyCell::Category(code))
            .copied()
            .unwrap_or(0)
    }
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub meshes_processed: usize,
    pub geology_columns: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_mismatched_dimensions() {
        assert!(MeshGrid::new(2, 2, vec![Some(1.0); 3]).is_none());
        assert!(MeshGrid::<f64>::from_rows(vec![vec![Some(1.0)], vec![]]).is_none());
    }

    #[test]
    fn test_grid_row_major_access() {
        let grid = MeshGrid::from_rows(vec![
            vec![Some(1.0), Some(2.0), None],
            vec![Some(4.0), Some(5.0), Some(6.0)],
        ])
        .unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 0), Some(&4.0));
        assert_eq!(grid.get(0, 2), None);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.missing_count(), 1);
        assert_eq!(grid.present().count(), 5);
    }

    #[test]
    fn test_window_sum_bounds() {
        let series = DailySeries::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(series.window_sum(0, 2), Some(3.0));
        assert_eq!(series.window_sum(1, 4), None);
    }

    #[test]
    fn test_circular_summary_reports_absent_spread() {
        let summary = StatSummary::Circular(Some(CircularSummary { mean: 12.5 }));
        assert_eq!(summary.mean(), Some(12.5));
        assert_eq!(summary.std(), None);
        assert_eq!(summary.median(), None);
        assert_eq!(summary.mode(), None);
    }
}
