//! Continuous nutrient field with toroidal diffusion.
//!
//! Two update formulas are supported, both computed from an unmodified
//! snapshot of the previous field:
//! - Weighted average: `(1 - rate) * c + rate * (sum of 8 neighbors) / 8`
//! - Laplacian: `c + rate * (sum of 8 neighbors - 8 * c)`
//!
//! Results are floored at zero. Rows are written in parallel; each output row
//! depends only on the frozen input.

use rayon::prelude::*;

use super::grid::{check_dimensions, wrap};
use crate::error::{AutomataError, Result};

/// A 2D field of non-negative nutrient concentrations.
#[derive(Clone, Debug, PartialEq)]
pub struct NutrientField {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<f64>, // row-major, every value >= 0
}

/// Which discrete diffusion operator to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffusionFormula {
    WeightedAverage,
    Laplacian,
}

/// Initialize a field with every cell set to `initial`.
pub fn create_field(rows: usize, cols: usize, initial: f64) -> Result<NutrientField> {
    let len = check_dimensions(rows, cols)?;
    check_concentration(initial)?;
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|e| AutomataError::config(format!("cannot allocate {rows}x{cols} field: {e}")))?;
    cells.resize(len, initial);
    Ok(NutrientField { rows, cols, cells })
}

/// Build a field from a row-major buffer of concentrations.
pub fn field_from_cells(rows: usize, cols: usize, cells: Vec<f64>) -> Result<NutrientField> {
    let field = NutrientField { rows, cols, cells };
    validate_field(&field)?;
    Ok(field)
}

fn check_concentration(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AutomataError::config(format!(
            "nutrient concentration must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Reject a field with a bad buffer length or negative/non-finite values.
pub fn validate_field(field: &NutrientField) -> Result<()> {
    let len = check_dimensions(field.rows, field.cols)?;
    if field.cells.len() != len {
        return Err(AutomataError::config(format!(
            "field buffer holds {} values, expected {len}",
            field.cells.len()
        )));
    }
    field.cells.iter().try_for_each(|&c| check_concentration(c))
}

/// Reject a diffusion rate outside the open interval (0, 1).
pub fn check_diffusion_rate(rate: f64) -> Result<()> {
    if !(rate > 0.0 && rate < 1.0) {
        return Err(AutomataError::config(format!(
            "diffusion rate must lie in (0, 1), got {rate}"
        )));
    }
    Ok(())
}

#[inline]
fn field_index_of(field: &NutrientField, row: isize, col: isize) -> usize {
    wrap(row, field.rows) * field.cols + wrap(col, field.cols)
}

/// Get a cell value; any coordinate is valid.
pub fn field_get(field: &NutrientField, row: isize, col: isize) -> f64 {
    field.cells[field_index_of(field, row, col)]
}

/// Set a cell value; any coordinate is valid.
pub fn field_set(field: &mut NutrientField, row: isize, col: isize, value: f64) -> Result<()> {
    check_concentration(value)?;
    let idx = field_index_of(field, row, col);
    field.cells[idx] = value;
    Ok(())
}

/// Sum of all concentrations.
pub fn field_total(field: &NutrientField) -> f64 {
    field.cells.iter().sum()
}

/// Floor every value at zero.
pub fn clamp_non_negative(cells: &mut [f64]) {
    for c in cells.iter_mut() {
        if *c < 0.0 {
            *c = 0.0;
        }
    }
}

fn neighbor_sum(field: &NutrientField, row: usize, col: usize) -> f64 {
    let mut sum = 0.0;
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            sum += field.cells[field_index_of(field, row as isize + dr, col as isize + dc)];
        }
    }
    sum
}

/// Compute the next field from `field` without touching it.
pub fn diffuse(
    field: &NutrientField,
    rate: f64,
    formula: DiffusionFormula,
) -> Result<NutrientField> {
    check_diffusion_rate(rate)?;
    validate_field(field)?;

    let mut next = vec![0.0; field.cells.len()];

    next.par_chunks_mut(field.cols)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, slot) in out.iter_mut().enumerate() {
                let center = field.cells[row * field.cols + col];
                let sum = neighbor_sum(field, row, col);
                let value = match formula {
                    DiffusionFormula::WeightedAverage => (1.0 - rate) * center + rate * sum / 8.0,
                    DiffusionFormula::Laplacian => center + rate * (sum - 8.0 * center),
                };
                *slot = value.max(0.0);
            }
        });

    Ok(NutrientField {
        rows: field.rows,
        cols: field.cols,
        cells: next,
    })
}
