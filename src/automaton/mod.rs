//! Core automaton logic: grid storage, nutrient diffusion, rule stepping and
//! dimension estimation.
//!
//! Everything here works on plain values and returns new buffers. The
//! `Simulation` context in `state` and the FFI layer in `ffi/` build on these
//! functions.

pub mod dimension;
pub mod field;
pub mod grid;
pub mod growth;
pub mod random;
pub mod region;
pub mod rules;
pub mod stepping;
pub mod trajectory;

pub use dimension::{
    count_boxes, estimate_dimension, fit_dimension, DimensionEstimate, DEFAULT_BOX_SIZES,
};
pub use field::{create_field, diffuse, field_get, field_set, DiffusionFormula, NutrientField};
pub use grid::{count_neighbors, create_grid, get_cell, index_of, set_cell, Grid};
pub use random::{seeded, RandomStream};
pub use region::{extract_region, import_region};
pub use rules::Rule;
pub use stepping::{step, Generation};
pub use trajectory::{Trajectory, TrajectoryEntry};
