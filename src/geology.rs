//! Geology raster classification.
//!
//! Each geology pixel is formatted as a lowercase `#rrggbb` string and
//! replaced by the category code the shared color table assigns to it.
//! Colors missing from the table pass through as their hex string.

use crate::error::{MeshStatsError, Result};
use crate::models::MeshGrid;
use image::RgbImage;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A classified geology cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeologyCell {
    /// Category code from the color table
    Category(i64),
    /// Color with no table entry, kept as `#rrggbb`
    Unmapped(String),
}

impl fmt::Display for GeologyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeologyCell::Category(code) => write!(f, "{}", code),
            GeologyCell::Unmapped(hex) => f.write_str(hex),
        }
    }
}

/// One row of the geology color table as stored on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeologyTableEntry {
    Record { hex: String, code: i64 },
    Pair(String, i64),
}

impl GeologyTableEntry {
    fn into_parts(self) -> (i64, String) {
        match self {
            GeologyTableEntry::Record { hex, code } => (code, hex),
            GeologyTableEntry::Pair(hex, code) => (code, hex),
        }
    }
}

/// Color → category lookup shared read-only by every mesh of a dataset
#[derive(Debug, Clone, Default)]
pub struct GeologyLookup {
    /// `(hex, code)` in first-seen hex order
    entries: Vec<(String, i64)>,
    index: HashMap<String, usize>,
}

impl GeologyLookup {
    /// Build from `(category code, hex color)` rows.
    ///
    /// A hex color listed more than once keeps the code of its last row.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: AsRef<str>,
    {
        let mut lookup = Self::default();

        for (code, hex) in entries {
            let hex = hex.as_ref().trim().to_ascii_lowercase();
            match lookup.index.get(&hex) {
                Some(&position) => {
                    debug!(
                        "Geology color {} remapped from {} to {}",
                        hex, lookup.entries[position].1, code
                    );
                    lookup.entries[position].1 = code;
                }
                None => {
                    lookup.index.insert(hex.clone(), lookup.entries.len());
                    lookup.entries.push((hex, code));
                }
            }
        }

        lookup
    }

    /// Load the color table JSON: an array of `{"hex", "code"}` records or `[hex, code]` pairs
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MeshStatsError::GeologyTable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let rows: Vec<GeologyTableEntry> =
            serde_json::from_str(&content).map_err(|e| MeshStatsError::GeologyTable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let lookup = Self::from_entries(rows.into_iter().map(GeologyTableEntry::into_parts));

        if lookup.is_empty() {
            warn!("Geology table {} has no entries", path.display());
        }
        debug!(
            "Loaded {} geology colors ({} categories) from {}",
            lookup.len(),
            lookup.category_codes().len(),
            path.display()
        );

        Ok(lookup)
    }

    /// Category code for a `#rrggbb` string
    pub fn get(&self, hex: &str) -> Option<i64> {
        self.index.get(hex).map(|&position| self.entries[position].1)
    }

    /// Distinct category codes in table order; this fixes the export columns
    pub fn category_codes(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|(_, code)| *code)
            .filter(|code| seen.insert(*code))
            .collect()
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace a hex string by its category code when the table has one
    pub fn resolve(&self, hex: &str) -> GeologyCell {
        match self.get(hex) {
            Some(code) => GeologyCell::Category(code),
            None => GeologyCell::Unmapped(hex.to_string()),
        }
    }

    /// Classify one pixel
    pub fn classify(&self, rgb: [u8; 3]) -> GeologyCell {
        self.resolve(&rgb_to_hex(rgb))
    }
}

/// Lowercase, zero-padded `#rrggbb`
pub fn rgb_to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Classify every pixel of a geology raster
pub fn classify_rgb(image: &RgbImage, lookup: &GeologyLookup) -> MeshGrid<GeologyCell> {
    let (width, height) = image.dimensions();
    let cells = image
        .pixels()
        .map(|pixel| Some(lookup.classify(pixel.0)))
        .collect();

    MeshGrid::from_pixels(width as usize, height as usize, cells)
}

/// Cells per category, missing cells excluded
pub fn count_categories(grid: &MeshGrid<GeologyCell>) -> BTreeMap<GeologyCell, usize> {
    let mut counts = BTreeMap::new();
    for cell in grid.present() {
        *counts.entry(cell.clone()).or_insert(0) += 1;
    }
    counts
}
