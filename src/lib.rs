//! Mesh Statistics Library
//!
//! A Rust library for turning packaged mesh bundles (per-mesh terrain
//! rasters, geology rasters and daily climate series) into one row of
//! summary statistics per mesh.
//!
//! This library provides tools for:
//! - Decoding the RGB-packed elevation, slope and direction rasters
//! - Classifying geology rasters through a shared color table
//! - Circular means for bearings and descriptive statistics for grids
//! - Multi-year monthly climate means with a legacy or Gregorian calendar
//! - Concurrent per-mesh processing and TSV export

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geology;
pub mod inspect;
pub mod models;
pub mod processor;
pub mod raster;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use config::{CalendarMode, StatsConfig};
pub use error::{MeshStatsError, Result};
pub use geology::{GeologyCell, GeologyLookup};
pub use models::{MeshGrid, MeshRecord, ProcessingStats, StatSummary};
pub use processor::MeshProcessor;
pub use store::{FsMeshStore, MeshSource, RasterLayer};
