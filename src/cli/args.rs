//! Command-line argument definitions for the mesh statistics tool
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::config::{CalendarMode, StatsConfig};
use crate::constants::{DEFAULT_END_YEAR, DEFAULT_START_YEAR, default_workers};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the mesh statistics tool
///
/// Reads a mesh bundle (one directory per mesh code holding terrain and
/// geology rasters plus daily climate series) and exports one row of
/// summary statistics per mesh.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "meshstats",
    version,
    about = "Per-mesh terrain, geology and climate statistics exported as TSV",
    long_about = "Processes a mesh bundle into a tab-separated table with one row per mesh: \
                  multi-year monthly climate means, elevation and slope statistics, mean slope \
                  direction and geology category cell counts."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compute statistics for every mesh in a bundle and write a TSV
    Stats(StatsArgs),
    /// Show the attributes and decoded cells of one mesh
    Inspect(InspectArgs),
}

/// Arguments for the stats command
#[derive(Debug, Clone, Parser)]
pub struct StatsArgs {
    /// Bundle root containing one directory per mesh code
    #[arg(value_name = "BASE_DIR")]
    pub base_dir: PathBuf,

    /// Directory receiving mesh_stats.tsv; created if missing
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// First year of the aggregation window (inclusive)
    #[arg(long = "start-year", value_name = "YEAR", default_value_t = DEFAULT_START_YEAR)]
    pub start_year: i32,

    /// Last year of the aggregation window (inclusive)
    #[arg(long = "end-year", value_name = "YEAR", default_value_t = DEFAULT_END_YEAR)]
    pub end_year: i32,

    /// Month window rule
    ///
    /// `legacy` reproduces historical output: 365-day year offsets from the
    /// start year with February lengthened whenever year % 4 == 0.
    /// `gregorian` uses true calendar offsets from 1978-01-01.
    #[arg(long, value_enum, default_value_t = CalendarMode::Legacy)]
    pub calendar: CalendarMode,

    /// Append minx, miny, maxx, maxy columns
    #[arg(long = "include-extent")]
    pub include_extent: bool,

    /// Append landuse_<category> area columns
    #[arg(long = "include-landuse")]
    pub include_landuse: bool,

    /// Number of meshes processed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = default_workers(),
        help = "Number of parallel workers for processing"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl StatsArgs {
    /// Processing configuration from the command line
    pub fn to_config(&self) -> StatsConfig {
        let mut config = StatsConfig::default()
            .with_years(self.start_year, self.end_year)
            .with_calendar(self.calendar)
            .with_workers(self.workers)
            .with_progress(self.show_progress());
        if self.include_extent {
            config = config.with_extent();
        }
        if self.include_landuse {
            config = config.with_landuse();
        }
        config
    }

    /// Progress bars and banners are shown unless `--quiet`
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            log_level(self.verbose)
        }
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Bundle root containing one directory per mesh code
    #[arg(value_name = "BASE_DIR")]
    pub base_dir: PathBuf,

    /// Mesh code to inspect
    #[arg(value_name = "MESH_CODE")]
    pub mesh_code: String,

    /// Grid row of the cell to decode
    #[arg(long, requires = "col")]
    pub row: Option<usize>,

    /// Grid column of the cell to decode
    #[arg(long, requires = "row")]
    pub col: Option<usize>,

    /// Print the inspection as JSON
    #[arg(long)]
    pub json: bool,

    /// Logging verbosity level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl InspectArgs {
    /// Requested cell as `(row, col)`
    pub fn cell(&self) -> Option<(usize, usize)> {
        self.row.zip(self.col)
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose)
    }
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
