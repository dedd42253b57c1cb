//! Box-counting dimension estimator for grid snapshots.
//!
//! ## Algorithm
//! 1. For each box size `s`, tile the grid with `s x s` boxes anchored at
//!    (0, 0). Boxes cut off by the far edges keep whatever extent remains.
//! 2. Count `N(s)`, the boxes holding at least one active cell.
//! 3. Fit `ln N(s) = D * ln(1/s) + C` by ordinary least squares.
//! 4. The slope `D` is the estimate.
//!
//! Sizes with `N(s) = 0` have no logarithm. They are dropped from the fit,
//! reported in [`DimensionEstimate::skipped`], and logged as a warning.

use tracing::warn;

use super::grid::{Grid, ACTIVE};
use crate::error::{AutomataError, Result};

/// Box sizes used when the caller does not supply any.
pub const DEFAULT_BOX_SIZES: &[usize] = &[2, 4, 8, 16];

/// Result of a dimension fit.
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionEstimate {
    /// Fitted slope of `ln N` against `ln(1/s)`.
    pub dimension: f64,
    /// `(box size, occupied boxes)` pairs that entered the fit.
    pub samples: Vec<(usize, usize)>,
    /// Box sizes dropped because no box was occupied.
    ///
    /// Empty after a successful grid estimate: one active cell occupies a box
    /// at every size, and a grid with none fails with `InsufficientData`.
    /// Zero counts only reach a fit through [`fit_dimension`].
    pub skipped: Vec<usize>,
}

/// Count `size x size` boxes holding at least one active cell.
pub fn count_boxes(grid: &Grid, size: usize) -> Result<usize> {
    if size == 0 {
        return Err(AutomataError::config("box size must be positive"));
    }

    let box_rows = grid.rows.div_ceil(size);
    let box_cols = grid.cols.div_ceil(size);
    let mut occupied = vec![false; box_rows * box_cols];

    for (idx, &cell) in grid.cells.iter().enumerate() {
        if cell == ACTIVE {
            let (row, col) = (idx / grid.cols, idx % grid.cols);
            occupied[(row / size) * box_cols + col / size] = true;
        }
    }

    Ok(occupied.iter().filter(|&&b| b).count())
}

/// Estimate the box-counting dimension of the active cells in `grid`.
pub fn estimate_dimension(grid: &Grid, box_sizes: &[usize]) -> Result<DimensionEstimate> {
    let mut samples = Vec::with_capacity(box_sizes.len());
    let mut skipped = Vec::new();

    for &size in box_sizes {
        let count = count_boxes(grid, size)?;
        if count == 0 {
            warn!(box_size = size, "no occupied boxes; size excluded from dimension fit");
            skipped.push(size);
        } else {
            samples.push((size, count));
        }
    }

    let points: Vec<(f64, f64)> = samples
        .iter()
        .map(|&(size, count)| (size as f64, count as f64))
        .collect();
    let dimension = fit_dimension(&points)?;

    Ok(DimensionEstimate {
        dimension,
        samples,
        skipped,
    })
}

/// Fit the dimension to raw `(box size, count)` pairs.
///
/// Pairs with a non-positive count are excluded. Fewer than two remaining
/// points, or points that all share one box size, cannot define a slope.
pub fn fit_dimension(samples: &[(f64, f64)]) -> Result<f64> {
    let mut xs = Vec::with_capacity(samples.len());
    let mut ys = Vec::with_capacity(samples.len());

    for &(size, count) in samples {
        if !(size > 0.0) || !size.is_finite() {
            return Err(AutomataError::config(format!("box size must be positive, got {size}")));
        }
        if count > 0.0 && count.is_finite() {
            xs.push((1.0 / size).ln());
            ys.push(count.ln());
        }
    }

    ols_slope(&xs, &ys).ok_or(AutomataError::InsufficientData { usable: xs.len() })
}

/// Ordinary least-squares slope: Σ(x-x̄)(y-ȳ) / Σ(x-x̄)²
fn ols_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x: f64 = xs.iter().sum::<f64>() / n;
    let mean_y: f64 = ys.iter().sum::<f64>() / n;

    let num: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let den: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();

    if den.abs() < 1e-12 {
        None
    } else {
        Some(num / den)
    }
}
