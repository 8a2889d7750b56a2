//! Mean, population standard deviation, median and mode.
//!
//! Elevation and slope values are truncated toward zero before any
//! statistic is taken, so results describe whole metres / degrees.

use crate::models::{DescriptiveSummary, MeshGrid, StatSummary};
use std::cmp::Ordering;

/// Summarise values; `None` when there are none
pub fn describe(values: &[f64]) -> Option<DescriptiveSummary> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Some(DescriptiveSummary {
        mean,
        std: variance.sqrt(),
        median: median_of_sorted(&sorted),
        mode: mode_of_sorted(&sorted),
    })
}

/// Truncate every present cell to its integer part.
///
/// Cells in (-1, 0) truncate to `-0.0`; adding `0.0` folds them into `0.0`.
pub fn truncated_values(grid: &MeshGrid<f64>) -> Vec<f64> {
    grid.present().map(|value| value.trunc() + 0.0).collect()
}

/// Full summary of an elevation or slope grid
pub fn summarize_grid(grid: &MeshGrid<f64>) -> StatSummary {
    StatSummary::Descriptive(describe(&truncated_values(grid)))
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Longest run of equal values; the first (smallest) run wins ties
fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_count = 0usize;

    for run in sorted.chunk_by(|a, b| a.total_cmp(b) == Ordering::Equal) {
        if run.len() > best_count {
            best = run[0];
            best_count = run.len();
        }
    }

    best
}
