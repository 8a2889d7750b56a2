//! Circular mean for bearing data.
//!
//! Bearings are averaged as unit vectors so that 350° and 10° meet at 0°
//! instead of 180°.

use crate::models::{CircularSummary, MeshGrid, StatSummary};

/// Mean bearing in degrees, normalised to `[0, 360)`; `None` for no input
pub fn mean_bearing<I>(bearings: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum_cos = 0.0f64;
    let mut sum_sin = 0.0f64;
    let mut count = 0usize;

    for bearing in bearings {
        let radians = bearing.to_radians();
        sum_cos += radians.cos();
        sum_sin += radians.sin();
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let degrees = sum_sin.atan2(sum_cos).to_degrees().rem_euclid(360.0);
    // rem_euclid of a tiny negative angle rounds up to exactly 360
    Some(if degrees >= 360.0 { 0.0 } else { degrees })
}

/// Mean-only summary of a direction grid, missing cells excluded.
///
/// A grid with no present cells has an absent mean, exported as `None`.
/// Legacy exports wrote `0.0` here, the bearing of a zero-length vector.
pub fn summarize_direction(grid: &MeshGrid<f64>) -> StatSummary {
    StatSummary::Circular(
        mean_bearing(grid.present().copied()).map(|mean| CircularSummary { mean }),
    )
}
