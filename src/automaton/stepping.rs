//! Synchronous double-buffered stepping for every rule variant.
//!
//! Each call reads only the previous grid (and field) and returns freshly
//! allocated buffers. The inputs are never written, so a failed step leaves
//! the caller's state untouched.

use rayon::prelude::*;

use super::field::{validate_field, NutrientField};
use super::grid::{count_neighbors, validate_grid, Grid};
use super::growth;
use super::random::RandomStream;
use super::rules::{excitable_transition, life_transition, Rule};
use crate::error::{AutomataError, Result};

/// The outcome of one step: the next grid and, for field-coupled rules, the
/// next nutrient field.
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub grid: Grid,
    pub field: Option<NutrientField>,
}

/// Advance `grid` by one generation under `rule`.
///
/// `generation` is the index of the generation being read; only the gated
/// growth rule consults it. Fields passed to rules that do not use one are
/// returned unchanged.
pub fn step<S: RandomStream + ?Sized>(
    grid: &Grid,
    rule: &Rule,
    field: Option<&NutrientField>,
    generation: u64,
    stream: &mut S,
) -> Result<Generation> {
    rule.validate()?;
    validate_grid(grid, rule.max_state())?;

    if let Some(f) = field {
        validate_field(f)?;
        check_same_shape(grid, f)?;
    }

    let coupled = || {
        field.ok_or_else(|| {
            AutomataError::config(format!("rule {} requires a nutrient field", rule.name()))
        })
    };

    match rule {
        Rule::BinaryLife => Ok(Generation {
            grid: step_cells(grid, life_transition),
            field: field.cloned(),
        }),
        Rule::ThreeStateExcitable => Ok(Generation {
            grid: step_cells(grid, excitable_transition),
            field: field.cloned(),
        }),
        Rule::GatedInPlaceGrowth(p) => {
            growth::gated_in_place(grid, coupled()?, p, generation, stream)
        }
        Rule::PropagatingGrowthWithDeath(p) => growth::propagating(grid, coupled()?, p, stream),
        Rule::NutrientLimitedLife(p) => growth::nutrient_limited_life(grid, coupled()?, p),
    }
}

/// Reject a field whose dimensions differ from the grid's.
pub fn check_same_shape(grid: &Grid, field: &NutrientField) -> Result<()> {
    if grid.rows != field.rows || grid.cols != field.cols {
        return Err(AutomataError::DimensionMismatch {
            expected_rows: grid.rows,
            expected_cols: grid.cols,
            actual_rows: field.rows,
            actual_cols: field.cols,
        });
    }
    Ok(())
}

/// Apply a neighbor-count transition to every cell. Rows are computed in
/// parallel from the frozen input grid.
pub fn step_cells(grid: &Grid, transition: fn(u8, u8) -> u8) -> Grid {
    let mut next_cells = vec![0; grid.cells.len()];

    next_cells
        .par_chunks_mut(grid.cols)
        .enumerate()
        .for_each(|(row, out)| {
            for (col, slot) in out.iter_mut().enumerate() {
                let neighbors = count_neighbors(grid, row, col);
                *slot = transition(grid.cells[row * grid.cols + col], neighbors);
            }
        });

    Grid {
        rows: grid.rows,
        cols: grid.cols,
        cells: next_cells,
    }
}
