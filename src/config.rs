//! Configuration management and validation.
//!
//! Provides the processing configuration: the aggregation year window,
//! the calendar rule used to locate months inside a daily series,
//! worker count and optional export columns.

use crate::constants::{
    DEFAULT_END_YEAR, DEFAULT_START_YEAR, SERIES_END_YEAR, SERIES_START_YEAR, default_workers,
};
use crate::error::{MeshStatsError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How month windows are located inside a daily series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarMode {
    /// Offsets assume 365-day years counted from the aggregation start year,
    /// February has 29 days whenever `year % 4 == 0`. Matches historical output.
    #[default]
    Legacy,
    /// Offsets are true calendar days from the series start (1978-01-01)
    Gregorian,
}

/// Global configuration for mesh statistics processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// First year of the aggregation window (inclusive)
    pub start_year: i32,

    /// Last year of the aggregation window (inclusive)
    pub end_year: i32,

    /// Month window rule
    pub calendar: CalendarMode,

    /// Number of meshes processed concurrently
    pub workers: usize,

    /// Append bounding box columns to the export
    pub include_extent: bool,

    /// Append land-use area columns to the export
    pub include_landuse: bool,

    /// Print banners, the progress bar and the run summary
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_show_progress() -> bool {
    true
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            calendar: CalendarMode::default(),
            workers: default_workers(),
            include_extent: false,
            include_landuse: false,
            show_progress: default_show_progress(),
        }
    }
}

impl StatsConfig {
    /// Set the inclusive aggregation window
    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }

    /// Set the calendar rule
    pub fn with_calendar(mut self, calendar: CalendarMode) -> Self {
        self.calendar = calendar;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Export bounding box columns
    pub fn with_extent(mut self) -> Self {
        self.include_extent = true;
        self
    }

    /// Export land-use columns
    pub fn with_landuse(mut self) -> Self {
        self.include_landuse = true;
        self
    }

    /// Enable or silence console progress output
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Number of years in the aggregation window
    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }

    /// Reject settings that would make aggregation undefined
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(MeshStatsError::configuration(format!(
                "start year {} is after end year {}; the range must contain at least one year",
                self.start_year, self.end_year
            )));
        }

        if self.workers == 0 {
            return Err(MeshStatsError::configuration(
                "worker count must be at least 1",
            ));
        }

        if self.calendar == CalendarMode::Gregorian
            && (self.start_year < SERIES_START_YEAR || self.end_year > SERIES_END_YEAR)
        {
            return Err(MeshStatsError::configuration(format!(
                "years {}-{} fall outside the series range {}-{}",
                self.start_year, self.end_year, SERIES_START_YEAR, SERIES_END_YEAR
            )));
        }

        debug!(
            "Validated configuration: {}-{} ({:?}), {} workers",
            self.start_year, self.end_year, self.calendar, self.workers
        );
        Ok(())
    }
}
