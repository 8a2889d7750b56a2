//! Mesh discovery module
//!
//! Enumerates the mesh codes of a bundle root: every sub-directory that
//! holds a `meshdata.json` file, sorted by mesh code.

use crate::constants::MESHDATA_FILE_NAME;
use crate::error::{MeshStatsError, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Mesh discovery component for bundle roots
#[derive(Debug)]
pub struct MeshDiscovery {
    root: PathBuf,
}

impl MeshDiscovery {
    /// Create a new discovery instance for a bundle root
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Discover all mesh codes under the root
    ///
    /// Bundles follow this structure:
    /// ```text
    /// root/
    ///   geology_hex.json
    ///   54382129/
    ///     meshdata.json
    ///     dem.png
    ///     slope.png
    ///     direction.png
    ///     geology.png
    ///   54382130/
    ///     ...
    /// ```
    pub async fn discover_mesh_codes(&self) -> Result<Vec<String>> {
        if !fs::try_exists(&self.root).await? {
            return Err(MeshStatsError::DatasetNotFound {
                path: self.root.clone(),
            });
        }

        debug!("Searching for meshes in: {}", self.root.display());

        let mut codes = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }

            let Some(code) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 directory: {}", entry.path().display());
                continue;
            };

            if fs::try_exists(entry.path().join(MESHDATA_FILE_NAME)).await? {
                codes.push(code);
            } else {
                debug!("Skipping directory without {}: {}", MESHDATA_FILE_NAME, code);
            }
        }

        if codes.is_empty() {
            return Err(MeshStatsError::NoMeshes {
                path: self.root.clone(),
            });
        }

        codes.sort();
        debug!("Found {} meshes", codes.len());

        Ok(codes)
    }
}
