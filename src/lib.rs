//! Lattice Automata - 2D toroidal cellular automata with nutrient coupling
//!
//! Steps binary life, a three-state excitable medium and two stochastic
//! bacterial-growth models on a wrapped grid, and estimates the box-counting
//! dimension of the resulting patterns.
//!
//! The `Simulation` context in `state` owns a grid, an optional nutrient
//! field, a seeded random stream and a worker pool. The `ffi` module exposes
//! it through a C ABI for hosts that drive the simulation and render frames.

pub mod automaton;
pub mod config;
pub mod error;
pub mod ffi;
pub mod state;


pub use automaton::{
    create_field, create_grid, estimate_dimension, step, DimensionEstimate, Generation, Grid,
    NutrientField, RandomStream, Rule, Trajectory,
};
pub use config::{
    GatedGrowthParams, NutrientLimitedLifeParams, NutrientParams, PropagatingGrowthParams,
    SimulationConfig,
};
pub use error::{AutomataError, Result};
pub use state::Simulation;
