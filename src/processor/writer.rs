//! TSV writing module for mesh statistics
//!
//! Writes one row per mesh with a header row. Floats are printed the way
//! Python's `repr` prints them and absent statistics as the literal
//! `None`, so existing downstream readers of the export keep working.

use crate::constants::{ABSENT_VALUE, GEOLOGY_COLUMN_PREFIX, LANDUSE_CATEGORIES};
use crate::error::Result;
use crate::models::{MeshRecord, StatSummary};

use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Monthly block column prefixes in export order
const MONTHLY_PREFIXES: [&str; 6] = [
    "temp_mean",
    "temp_max",
    "temp_min",
    "prec_mean",
    "daylight_mean",
    "solar_mean",
];

const EXTENT_COLUMNS: [&str; 4] = ["minx", "miny", "maxx", "maxy"];

/// Column layout of an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSchema {
    /// Geology category codes, one column each
    pub geology_codes: Vec<i64>,
    pub include_extent: bool,
    pub include_landuse: bool,
}

impl ExportSchema {
    pub fn new(geology_codes: Vec<i64>) -> Self {
        Self {
            geology_codes,
            include_extent: false,
            include_landuse: false,
        }
    }

    pub fn with_extent(mut self, include: bool) -> Self {
        self.include_extent = include;
        self
    }

    pub fn with_landuse(mut self, include: bool) -> Self {
        self.include_landuse = include;
        self
    }

    /// Header row
    pub fn header(&self) -> Vec<String> {
        let mut columns = vec!["mesh_code".to_string()];

        for prefix in MONTHLY_PREFIXES {
            columns.extend((1..=12).map(|month| format!("{}{:02}", prefix, month)));
        }

        for prefix in ["ele", "slp"] {
            columns.extend(
                ["mean", "std", "med", "mod"]
                    .iter()
                    .map(|stat| format!("{}_{}", prefix, stat)),
            );
        }
        columns.push("dir_mean".to_string());

        columns.extend(
            self.geology_codes
                .iter()
                .map(|code| format!("{}{}", GEOLOGY_COLUMN_PREFIX, code)),
        );

        if self.include_extent {
            columns.extend(EXTENT_COLUMNS.iter().map(|c| c.to_string()));
        }

        if self.include_landuse {
            columns.extend(
                LANDUSE_CATEGORIES
                    .iter()
                    .map(|(name, _)| format!("landuse_{}", name)),
            );
        }

        columns
    }

    /// Field values of one record, aligned with [`ExportSchema::header`]
    pub fn row(&self, record: &MeshRecord) -> Vec<String> {
        let mut fields = vec![record.mesh_code.clone()];

        for block in record.climate.blocks() {
            fields.extend(block.iter().map(format_float));
        }

        for summary in [&record.elevation, &record.slope] {
            fields.extend(summary_fields(summary));
        }
        fields.push(format_optional(record.direction.mean()));

        fields.extend(
            self.geology_codes
                .iter()
                .map(|code| record.geology_count(*code).to_string()),
        );

        if self.include_extent {
            fields.extend(record.extent.to_array().into_iter().map(format_float));
        }

        if self.include_landuse {
            fields.extend(record.landuse.areas().into_iter().map(format_float));
        }

        fields
    }
}

fn summary_fields(summary: &StatSummary) -> [String; 4] {
    [
        format_optional(summary.mean()),
        format_optional(summary.std()),
        format_optional(summary.median()),
        summary
            .mode()
            .map_or_else(|| ABSENT_VALUE.to_string(), format_mode),
    ]
}

/// TSV writer for mesh records
#[derive(Debug)]
pub struct TsvWriter {
    output_path: PathBuf,
    schema: ExportSchema,
}

impl TsvWriter {
    /// Create a new TSV writer
    pub fn new(output_path: PathBuf, schema: ExportSchema) -> Self {
        Self {
            output_path,
            schema,
        }
    }

    pub fn schema(&self) -> &ExportSchema {
        &self.schema
    }

    /// Write the header and all records to the output file, returning the row count
    pub fn write_records(&self, records: &[MeshRecord]) -> Result<usize> {
        if let Some(parent) = self.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.output_path)?;
        let rows = self.write_to(file, records)?;

        debug!(
            "Wrote {} rows with {} geology columns to {}",
            rows,
            self.schema.geology_codes.len(),
            self.output_path.display()
        );

        Ok(rows)
    }

    /// Write the header and all records to any writer
    pub fn write_to<W: Write>(&self, writer: W, records: &[MeshRecord]) -> Result<usize> {
        let mut tsv = WriterBuilder::new().delimiter(b'\t').from_writer(writer);

        tsv.write_record(self.schema.header())?;
        for record in records {
            tsv.write_record(self.schema.row(record))?;
        }
        tsv.flush()?;

        Ok(records.len())
    }
}

/// Format a float as Python's `repr` does.
///
/// Shortest round-trip digits, always with a decimal point or exponent;
/// scientific notation below `1e-4` and from `1e16` upwards with a signed
/// exponent of at least two digits.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// Format an optional float, `None` when absent
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| ABSENT_VALUE.to_string(), format_float)
}

/// Modes of truncated values are whole numbers and print without a fraction
pub fn format_mode(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format_float(value)
    }
}
