//! Grid and time-series statistics.
//!
//! - [`descriptive`]: mean / std / median / mode of scalar grids
//! - [`circular`]: mean bearing of direction grids
//! - [`monthly`]: multi-year monthly means of daily climate series

pub mod circular;
pub mod descriptive;
pub mod monthly;

pub use circular::{mean_bearing, summarize_direction};
pub use descriptive::{describe, summarize_grid};
pub use monthly::{AggregationMode, MonthWindow, MonthlyAggregator, series_date};

use crate::error::Result;
use crate::models::{ClimateMeans, ClimateSeries};

/// Monthly means of all six climate series of a mesh
pub fn climate_means(series: &ClimateSeries, aggregator: &MonthlyAggregator) -> Result<ClimateMeans> {
    use AggregationMode::{MeanThenAverage, SumThenAverage};

    Ok(ClimateMeans {
        temperature_mean: aggregator.aggregate(&series.average_temperature, MeanThenAverage)?,
        temperature_max: aggregator.aggregate(&series.maximum_temperature, MeanThenAverage)?,
        temperature_min: aggregator.aggregate(&series.minimum_temperature, MeanThenAverage)?,
        precipitation: aggregator.aggregate(&series.precipitation, SumThenAverage)?,
        daylight_hours: aggregator.aggregate(&series.daylight_hours, SumThenAverage)?,
        solar_radiation: aggregator.aggregate(&series.solar_radiation, SumThenAverage)?,
    })
}
