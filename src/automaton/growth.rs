//! Nutrient-coupled growth rules.
//!
//! All three rules diffuse the previous field into a new buffer first, then
//! apply cell transitions and nutrient debits against that buffer. Growth
//! decisions read occupancy and nutrient from the previous generation only.
//! Stochastic rules visit cells in row-major order so a fixed stream always
//! reproduces the same generation.

use rayon::prelude::*;
use tracing::trace;

use super::field::{clamp_non_negative, diffuse, DiffusionFormula, NutrientField};
use super::grid::{count_neighbors, empty_von_neumann_neighbors, Grid};
use super::random::{draw, pick, RandomStream};
use super::rules::{crowding, ALIVE, DEAD};
use super::stepping::Generation;
use crate::config::{GatedGrowthParams, NutrientLimitedLifeParams, PropagatingGrowthParams};
use crate::error::Result;

/// Empty cells may become occupied in place. Growth checks only pass on
/// generations divisible by the step modulus, but a draw is consumed for every
/// empty cell regardless.
pub fn gated_in_place<S: RandomStream + ?Sized>(
    grid: &Grid,
    field: &NutrientField,
    params: &GatedGrowthParams,
    generation: u64,
    stream: &mut S,
) -> Result<Generation> {
    params.validate()?;
    let p = &params.nutrient;
    let mut next_field = diffuse(field, p.diffusion_rate, DiffusionFormula::WeightedAverage)?;
    let mut next_cells = grid.cells.clone();
    let gate_open = generation % params.step_modulus as u64 == 0;
    let mut births = 0usize;

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let idx = row * grid.cols + col;

            if grid.cells[idx] == DEAD {
                let u = draw(stream)?;
                if u < p.growth_probability
                    && gate_open
                    && crowding(count_neighbors(grid, row, col)) * field.cells[idx] > p.threshold
                {
                    next_cells[idx] = ALIVE;
                    next_field.cells[idx] -= p.new_cell_cost;
                    births += 1;
                }
            } else {
                next_field.cells[idx] -= p.maintenance_cost;
            }
        }
    }

    clamp_non_negative(&mut next_field.cells);
    trace!(generation, births, gate_open, "gated growth pass");

    Ok(Generation {
        grid: Grid {
            rows: grid.rows,
            cols: grid.cols,
            cells: next_cells,
        },
        field: Some(next_field),
    })
}

/// Occupied cells spawn into a random empty orthogonal neighbor, then every
/// cell faces an independent death draw.
pub fn propagating<S: RandomStream + ?Sized>(
    grid: &Grid,
    field: &NutrientField,
    params: &PropagatingGrowthParams,
    stream: &mut S,
) -> Result<Generation> {
    params.validate()?;
    let p = &params.nutrient;
    let mut next_field = diffuse(field, p.diffusion_rate, DiffusionFormula::WeightedAverage)?;
    let mut next_cells = grid.cells.clone();
    let mut spawned = 0usize;
    let mut deaths = 0usize;

    // Growth pass
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let idx = row * grid.cols + col;
            if grid.cells[idx] != ALIVE {
                continue;
            }

            let u = draw(stream)?;
            if u < p.growth_probability
                && crowding(count_neighbors(grid, row, col)) * field.cells[idx] > p.threshold
            {
                let targets = empty_von_neumann_neighbors(grid, row, col);
                if !targets.is_empty() {
                    let (tr, tc) = targets[pick(stream, targets.len())?];
                    next_cells[tr * grid.cols + tc] = ALIVE;
                    next_field.cells[idx] -= p.new_cell_cost;
                    spawned += 1;
                }
            }

            next_field.cells[idx] -= p.maintenance_cost;
        }
    }

    // Death pass, over the post-growth buffer
    for cell in next_cells.iter_mut() {
        let u = draw(stream)?;
        if u < params.death_probability {
            if *cell == ALIVE {
                deaths += 1;
            }
            *cell = DEAD;
        }
    }

    clamp_non_negative(&mut next_field.cells);
    trace!(spawned, deaths, "propagating growth pass");

    Ok(Generation {
        grid: Grid {
            rows: grid.rows,
            cols: grid.cols,
            cells: next_cells,
        },
        field: Some(next_field),
    })
}

/// Life-like survival (2 or 3 neighbors) that also requires nutrient.
/// Dying cells release nutrient; births consume it. Deterministic, so rows
/// are computed in parallel.
pub fn nutrient_limited_life(
    grid: &Grid,
    field: &NutrientField,
    params: &NutrientLimitedLifeParams,
) -> Result<Generation> {
    params.validate()?;
    let mut next_field = diffuse(field, params.diffusion_rate, DiffusionFormula::Laplacian)?;
    let mut next_cells = vec![DEAD; grid.cells.len()];

    next_cells
        .par_chunks_mut(grid.cols)
        .zip(next_field.cells.par_chunks_mut(grid.cols))
        .enumerate()
        .for_each(|(row, (cells_out, nutrient_out))| {
            for col in 0..grid.cols {
                let n = count_neighbors(grid, row, col);
                let c = &mut nutrient_out[col];

                cells_out[col] = if grid.cells[row * grid.cols + col] == ALIVE {
                    if n < 2 || n > 3 || *c < params.starvation_level {
                        *c += params.death_release;
                        DEAD
                    } else {
                        ALIVE
                    }
                } else if n >= params.growth_neighbors && *c >= params.growth_cost {
                    *c -= params.growth_cost;
                    ALIVE
                } else {
                    DEAD
                };
            }
        });

    clamp_non_negative(&mut next_field.cells);

    Ok(Generation {
        grid: Grid {
            rows: grid.rows,
            cols: grid.cols,
            cells: next_cells,
        },
        field: Some(next_field),
    })
}
