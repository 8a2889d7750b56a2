//! Multi-year monthly means of daily climate series.
//!
//! For every year in the window each calendar month is reduced to one
//! value (its total, or its per-day mean), then those yearly values are
//! averaged per month.
//!
//! Month windows follow [`CalendarMode`]. In `Legacy` mode the day offset
//! of a month is `(year - start_year) * 365 + days of the preceding months
//! of a 365-day year`, while February is 29 days long whenever
//! `year % 4 == 0`. The two rules disagree in leap years (the February
//! window reaches one day into March) and offsets drift from the true
//! calendar across leap years; historical output depends on both.
//! `Gregorian` mode uses true calendar offsets from the series start.

use crate::config::{CalendarMode, StatsConfig};
use crate::constants::{LEGACY_DAYS_PER_YEAR, MONTHS_PER_YEAR, SERIES_START_YEAR};
use crate::error::{MeshStatsError, Result};
use crate::models::{DailySeries, MonthlyMeans};
use chrono::NaiveDate;

/// Month lengths of a 365-day year
const NON_LEAP_MONTH_DAYS: [usize; MONTHS_PER_YEAR] =
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// How a month is reduced within each year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Monthly total; precipitation, daylight hours, solar radiation
    SumThenAverage,
    /// Monthly total divided by the month length; temperatures
    MeanThenAverage,
}

/// Location of one month inside a daily series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// Day offset from the series start
    pub offset: usize,
    /// Days in the month
    pub days: usize,
}

impl MonthWindow {
    pub fn end(&self) -> usize {
        self.offset + self.days
    }
}

/// Reduces daily series to twelve multi-year monthly means
#[derive(Debug, Clone, Copy)]
pub struct MonthlyAggregator {
    start_year: i32,
    end_year: i32,
    calendar: CalendarMode,
}

impl MonthlyAggregator {
    /// Create an aggregator over `start_year..=end_year`.
    ///
    /// An empty range is rejected here so aggregation never divides by zero.
    pub fn new(start_year: i32, end_year: i32, calendar: CalendarMode) -> Result<Self> {
        if start_year > end_year {
            return Err(MeshStatsError::configuration(format!(
                "start year {} is after end year {}; the range must contain at least one year",
                start_year, end_year
            )));
        }

        if calendar == CalendarMode::Gregorian && start_year < SERIES_START_YEAR {
            return Err(MeshStatsError::configuration(format!(
                "start year {} precedes the series start {}",
                start_year, SERIES_START_YEAR
            )));
        }

        Ok(Self {
            start_year,
            end_year,
            calendar,
        })
    }

    /// Create an aggregator from the processing configuration
    pub fn from_config(config: &StatsConfig) -> Result<Self> {
        Self::new(config.start_year, config.end_year, config.calendar)
    }

    /// Number of years averaged per month
    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1) as usize
    }

    /// Where `year`-`month` (1-based month) sits in the series.
    ///
    /// Months outside `1..=12` are a configuration error.
    pub fn month_window(&self, year: i32, month: u32) -> Result<MonthWindow> {
        if !(1..=MONTHS_PER_YEAR as u32).contains(&month) {
            return Err(MeshStatsError::configuration(format!(
                "month {} is outside 1-12",
                month
            )));
        }

        match self.calendar {
            CalendarMode::Legacy => {
                let years_in = usize::try_from(year - self.start_year).map_err(|_| {
                    MeshStatsError::configuration(format!(
                        "year {} precedes the aggregation start {}",
                        year, self.start_year
                    ))
                })?;
                let year_offset = years_in * LEGACY_DAYS_PER_YEAR;
                let month_offset: usize = NON_LEAP_MONTH_DAYS[..month as usize - 1].iter().sum();
                Ok(MonthWindow {
                    offset: year_offset + month_offset,
                    days: legacy_days_in_month(year, month),
                })
            }
            CalendarMode::Gregorian => {
                let series_start = first_of_month(SERIES_START_YEAR, 1)?;
                let first = first_of_month(year, month)?;
                let next = if month == 12 {
                    first_of_month(year + 1, 1)?
                } else {
                    first_of_month(year, month + 1)?
                };
                Ok(MonthWindow {
                    offset: (first - series_start).num_days() as usize,
                    days: (next - first).num_days() as usize,
                })
            }
        }
    }

    /// Twelve multi-year means, index 0 = January
    pub fn aggregate(&self, series: &DailySeries, mode: AggregationMode) -> Result<MonthlyMeans> {
        let mut totals = [0.0f64; MONTHS_PER_YEAR];

        for year in self.start_year..=self.end_year {
            for month in 1..=MONTHS_PER_YEAR as u32 {
                let window = self.month_window(year, month)?;
                let sum = series
                    .window_sum(window.offset, window.end())
                    .ok_or_else(|| MeshStatsError::SeriesRange {
                        year,
                        month,
                        start: window.offset,
                        end: window.end(),
                        len: series.len(),
                    })?;

                totals[month as usize - 1] += match mode {
                    AggregationMode::SumThenAverage => sum,
                    AggregationMode::MeanThenAverage => sum / window.days as f64,
                };
            }
        }

        let years = self.year_count() as f64;
        Ok(MonthlyMeans(totals.map(|total| total / years)))
    }
}

/// Month length under the simplified `year % 4` leap rule.
///
/// # Panics
///
/// Panics if `month` is outside `1..=12`.
pub fn legacy_days_in_month(year: i32, month: u32) -> usize {
    if month == 2 && year % 4 == 0 {
        29
    } else {
        NON_LEAP_MONTH_DAYS[month as usize - 1]
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        MeshStatsError::configuration(format!("invalid calendar month {}-{:02}", year, month))
    })
}

/// Calendar date of a day offset from the series start
pub fn series_date(offset: usize) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(SERIES_START_YEAR, 1, 1)?
        .checked_add_days(chrono::Days::new(offset as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SERIES_LENGTH_DAYS;
    use approx::assert_abs_diff_eq;
    use chrono::Datelike;

    fn legacy(start: i32, end: i32) -> MonthlyAggregator {
        MonthlyAggregator::new(start, end, CalendarMode::Legacy).unwrap()
    }

    fn gregorian(start: i32, end: i32) -> MonthlyAggregator {
        MonthlyAggregator::new(start, end, CalendarMode::Gregorian).unwrap()
    }

    /// Series where each day holds `value_for(day offset)`
    fn series_from(len: usize, value_for: impl Fn(usize) -> f64) -> DailySeries {
        DailySeries::new((0..len).map(value_for).collect())
    }

    #[test]
    fn test_january_totals_average_across_years() {
        // Legacy year 0 January = days 0..31, year 1 January = days 365..396
        let series = series_from(800, |day| match day {
            0..=30 => 100.0 / 31.0,
            365..=395 => 200.0 / 31.0,
            _ => 0.0,
        });

        let means = legacy(2000, 2001)
            .aggregate(&series, AggregationMode::SumThenAverage)
            .unwrap();
        assert_abs_diff_eq!(means.month(1), 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mean_then_average_divides_by_month_length() {
        let series = series_from(800, |_| 2.0);
        let means = legacy(2001, 2002)
            .aggregate(&series, AggregationMode::MeanThenAverage)
            .unwrap();

        for month in 1..=12 {
            assert_abs_diff_eq!(means.month(month), 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_legacy_leap_february_borrows_march_day() {
        // 2000 % 4 == 0: February is 29 days but starts at offset 31 of a 365-day year
        let aggregator = legacy(2000, 2000);
        let february = aggregator.month_window(2000, 2).unwrap();
        let march = aggregator.month_window(2000, 3).unwrap();

        assert_eq!(february, MonthWindow { offset: 31, days: 29 });
        assert_eq!(march.offset, 59);
        assert_eq!(february.end(), march.offset + 1);

        let series = series_from(365, |day| if day == 59 { 29.0 } else { 0.0 });
        let totals = aggregator
            .aggregate(&series, AggregationMode::SumThenAverage)
            .unwrap();
        assert_eq!(totals.month(2), 29.0);
        assert_eq!(totals.month(3), 29.0);

        let means = aggregator
            .aggregate(&series, AggregationMode::MeanThenAverage)
            .unwrap();
        assert_abs_diff_eq!(means.month(2), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_legacy_offsets_ignore_leap_days() {
        let aggregator = legacy(1986, 2015);
        assert_eq!(aggregator.month_window(1986, 1).unwrap().offset, 0);
        assert_eq!(aggregator.month_window(1990, 1).unwrap().offset, 4 * 365);
        assert_eq!(aggregator.month_window(1986, 12).unwrap().offset, 334);
        assert_eq!(aggregator.month_window(1988, 2).unwrap().days, 29);
        assert!(aggregator.month_window(1985, 1).is_err());

        // The simplified rule also treats century years as leap years
        assert_eq!(legacy_days_in_month(1900, 2), 29);
        assert_eq!(legacy_days_in_month(1999, 2), 28);
    }

    #[test]
    fn test_gregorian_offsets_follow_calendar() {
        let aggregator = gregorian(1978, 2016);
        assert_eq!(
            aggregator.month_window(1978, 1).unwrap(),
            MonthWindow { offset: 0, days: 31 }
        );
        // 1978, 1979 are common years
        assert_eq!(aggregator.month_window(1980, 3).unwrap().offset, 730 + 31 + 29);
        assert_eq!(aggregator.month_window(1981, 2).unwrap().days, 28);

        let last = aggregator.month_window(2016, 12).unwrap();
        assert_eq!(last.end(), SERIES_LENGTH_DAYS);
    }

    #[test]
    fn test_gregorian_reads_calendar_year_from_series_start() {
        let series = series_from(SERIES_LENGTH_DAYS, |day| {
            series_date(day).map_or(0.0, |date| date.year() as f64)
        });

        let means = gregorian(1986, 1987)
            .aggregate(&series, AggregationMode::MeanThenAverage)
            .unwrap();
        for month in 1..=12 {
            assert_abs_diff_eq!(means.month(month), 1986.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_range_rejected() {
        match MonthlyAggregator::new(2016, 2015, CalendarMode::Legacy) {
            Err(MeshStatsError::Configuration { .. }) => {}
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_month_outside_year_rejected() {
        for calendar in [CalendarMode::Legacy, CalendarMode::Gregorian] {
            let aggregator = MonthlyAggregator::new(1986, 1987, calendar).unwrap();
            for month in [0, 13] {
                assert!(matches!(
                    aggregator.month_window(1986, month),
                    Err(MeshStatsError::Configuration { .. })
                ));
            }
        }
    }

    #[test]
    fn test_window_past_series_end() {
        let series = series_from(400, |_| 1.0);
        match legacy(2000, 2001).aggregate(&series, AggregationMode::SumThenAverage) {
            Err(MeshStatsError::SeriesRange { year, month, len, .. }) => {
                assert_eq!((year, month, len), (2001, 2, 400));
            }
            other => panic!("Expected SeriesRange error, got {:?}", other),
        }
    }

    #[test]
    fn test_series_date() {
        assert_eq!(series_date(0), NaiveDate::from_ymd_opt(1978, 1, 1));
        assert_eq!(series_date(SERIES_LENGTH_DAYS - 1), NaiveDate::from_ymd_opt(2016, 12, 31));
    }
}
