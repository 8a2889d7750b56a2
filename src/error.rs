//! Error handling for mesh statistics operations.
//!
//! Provides error types with enough context (mesh code, file path) to
//! locate the offending input when a run fails.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshStatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("No mesh directories found under: {path}")]
    NoMeshes { path: PathBuf },

    #[error("Failed to decode raster for mesh {mesh_code}: {path} - {source}")]
    RasterDecode {
        mesh_code: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Attribute store error for mesh {mesh_code}: {path} - {reason}")]
    AttributeStore {
        mesh_code: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid geology table: {path} - {reason}")]
    GeologyTable { path: PathBuf, reason: String },

    #[error(
        "Series '{series}' for mesh {mesh_code} has {found} days, expected {expected}"
    )]
    SeriesLength {
        mesh_code: String,
        series: String,
        expected: usize,
        found: usize,
    },

    #[error("Series range error: month {year}-{month:02} needs days {start}..{end} but the series holds {len}")]
    SeriesRange {
        year: i32,
        month: u32,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl MeshStatsError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an attribute store error for a mesh
    pub fn attribute_store(
        mesh_code: impl Into<String>,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AttributeStore {
            mesh_code: mesh_code.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MeshStatsError>;
