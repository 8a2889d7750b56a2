//! Mesh bundle access.
//!
//! The statistics engine reads meshes through [`MeshSource`], so the
//! directory convention of a bundle lives only in [`FsMeshStore`]. The
//! store resolves a mesh code to its directory through an injectable
//! resolver; by default `<root>/<mesh_code>`.

use crate::constants::{
    DIRECTION_FILE_NAME, ELEVATION_FILE_NAME, GEOLOGY_FILE_NAME, GEOLOGY_TABLE_FILE_NAME,
    MESHDATA_FILE_NAME, SERIES_LENGTH_DAYS, SLOPE_FILE_NAME,
};
use crate::error::{MeshStatsError, Result};
use crate::geology::GeologyLookup;
use crate::models::{BoundingBox, ClimateSeries, DailySeries, LandUse};
use crate::raster::read_rgb;
use image::RgbImage;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Raster layers stored per mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterLayer {
    Elevation,
    Slope,
    Direction,
    Geology,
}

impl RasterLayer {
    pub fn file_name(&self) -> &'static str {
        match self {
            RasterLayer::Elevation => ELEVATION_FILE_NAME,
            RasterLayer::Slope => SLOPE_FILE_NAME,
            RasterLayer::Direction => DIRECTION_FILE_NAME,
            RasterLayer::Geology => GEOLOGY_FILE_NAME,
        }
    }
}

impl fmt::Display for RasterLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RasterLayer::Elevation => "elevation",
            RasterLayer::Slope => "slope",
            RasterLayer::Direction => "direction",
            RasterLayer::Geology => "geology",
        };
        f.write_str(name)
    }
}

/// Tabular attributes of one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAttributes {
    pub extent: BoundingBox,
    pub landuse: LandUse,
    pub series: ClimateSeries,
}

/// On-disk shape of `meshdata.json`. Japanese keys are accepted.
#[derive(Debug, Deserialize)]
struct MeshDataFile {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
    #[serde(flatten)]
    landuse: LandUse,
    #[serde(alias = "日降水量")]
    precipitation: Vec<f64>,
    #[serde(alias = "日照時間")]
    daylight_hours: Vec<f64>,
    #[serde(alias = "日積算日射量")]
    solar_radiation: Vec<f64>,
    #[serde(alias = "日平均気温")]
    average_temperature: Vec<f64>,
    #[serde(alias = "日最高気温")]
    maximum_temperature: Vec<f64>,
    #[serde(alias = "日最低気温")]
    minimum_temperature: Vec<f64>,
}

impl MeshDataFile {
    fn into_attributes(self, mesh_code: &str) -> Result<MeshAttributes> {
        let series = |name: &str, values: Vec<f64>| -> Result<DailySeries> {
            if values.len() != SERIES_LENGTH_DAYS {
                return Err(MeshStatsError::SeriesLength {
                    mesh_code: mesh_code.to_string(),
                    series: name.to_string(),
                    expected: SERIES_LENGTH_DAYS,
                    found: values.len(),
                });
            }
            Ok(DailySeries::new(values))
        };

        Ok(MeshAttributes {
            extent: BoundingBox {
                minx: self.minx,
                miny: self.miny,
                maxx: self.maxx,
                maxy: self.maxy,
            },
            landuse: self.landuse,
            series: ClimateSeries {
                precipitation: series("precipitation", self.precipitation)?,
                daylight_hours: series("daylight_hours", self.daylight_hours)?,
                solar_radiation: series("solar_radiation", self.solar_radiation)?,
                average_temperature: series("average_temperature", self.average_temperature)?,
                maximum_temperature: series("maximum_temperature", self.maximum_temperature)?,
                minimum_temperature: series("minimum_temperature", self.minimum_temperature)?,
            },
        })
    }
}

/// Read access to mesh attributes, rasters and the shared geology table
pub trait MeshSource: Send + Sync {
    /// Bounding box, land use and daily series of a mesh
    fn attributes(&self, mesh_code: &str) -> Result<MeshAttributes>;

    /// One raster layer of a mesh as 8-bit RGB
    fn raster(&self, mesh_code: &str, layer: RasterLayer) -> Result<RgbImage>;

    /// Geology color table shared by every mesh of the dataset
    fn geology_lookup(&self) -> Result<GeologyLookup>;
}

/// Maps a bundle root and mesh code to the mesh directory
pub type MeshDirResolver = Arc<dyn Fn(&Path, &str) -> PathBuf + Send + Sync>;

/// Filesystem bundle: one directory per mesh plus a root-level geology table
#[derive(Clone)]
pub struct FsMeshStore {
    root: PathBuf,
    resolver: MeshDirResolver,
}

impl fmt::Debug for FsMeshStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsMeshStore")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl FsMeshStore {
    /// Open a bundle root using the `<root>/<mesh_code>` layout
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(MeshStatsError::DatasetNotFound { path: root });
        }

        Ok(Self {
            root,
            resolver: Arc::new(|root: &Path, mesh_code: &str| root.join(mesh_code)),
        })
    }

    /// Replace the mesh directory convention
    pub fn with_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&Path, &str) -> PathBuf + Send + Sync + 'static,
    {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Directory holding a mesh's files
    pub fn mesh_dir(&self, mesh_code: &str) -> PathBuf {
        (self.resolver)(&self.root, mesh_code)
    }

    /// Path of one raster layer
    pub fn raster_path(&self, mesh_code: &str, layer: RasterLayer) -> PathBuf {
        self.mesh_dir(mesh_code).join(layer.file_name())
    }

    /// Path of the attribute file
    pub fn attributes_path(&self, mesh_code: &str) -> PathBuf {
        self.mesh_dir(mesh_code).join(MESHDATA_FILE_NAME)
    }

    /// Path of the geology color table
    pub fn geology_table_path(&self) -> PathBuf {
        self.root.join(GEOLOGY_TABLE_FILE_NAME)
    }
}

impl MeshSource for FsMeshStore {
    fn attributes(&self, mesh_code: &str) -> Result<MeshAttributes> {
        let path = self.attributes_path(mesh_code);
        let content = fs::read_to_string(&path)
            .map_err(|e| MeshStatsError::attribute_store(mesh_code, &path, e.to_string()))?;

        let data: MeshDataFile = serde_json::from_str(&content)
            .map_err(|e| MeshStatsError::attribute_store(mesh_code, &path, e.to_string()))?;

        debug!("Loaded attributes for mesh {} from {}", mesh_code, path.display());
        data.into_attributes(mesh_code)
    }

    fn raster(&self, mesh_code: &str, layer: RasterLayer) -> Result<RgbImage> {
        read_rgb(&self.raster_path(mesh_code, layer), mesh_code)
    }

    fn geology_lookup(&self) -> Result<GeologyLookup> {
        GeologyLookup::load(&self.geology_table_path())
    }
}
