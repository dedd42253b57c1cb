//! Simulation parameters.
//!
//! Everything is a plain scalar knob on a typed struct; there is no file
//! format. Defaults reproduce the reference parameter sets for each rule.

use crate::automaton::field::check_diffusion_rate;
use crate::automaton::rules::Rule;
use crate::error::{AutomataError, Result};

fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(AutomataError::config(format!(
            "{name} must lie in [0, 1], got {p}"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, v: f64) -> Result<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(AutomataError::config(format!(
            "{name} must be finite and non-negative, got {v}"
        )));
    }
    Ok(())
}

/// Knobs shared by both stochastic bacterial-growth rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NutrientParams {
    /// Diffusion rate `δ` in (0, 1).
    pub diffusion_rate: f64,
    /// Growth threshold `θ` compared against `crowding * nutrient`.
    pub threshold: f64,
    /// Nutrient debited when a new cell is created.
    pub new_cell_cost: f64,
    /// Nutrient debited from every occupied cell each generation.
    pub maintenance_cost: f64,
    /// Chance that a growth check is attempted at all.
    pub growth_probability: f64,
}

impl NutrientParams {
    pub fn validate(&self) -> Result<()> {
        check_diffusion_rate(self.diffusion_rate)?;
        check_non_negative("threshold", self.threshold)?;
        check_non_negative("new cell cost", self.new_cell_cost)?;
        check_non_negative("maintenance cost", self.maintenance_cost)?;
        check_probability("growth probability", self.growth_probability)
    }
}

/// In-place growth of empty cells, gated to every `step_modulus`-th generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GatedGrowthParams {
    pub nutrient: NutrientParams,
    pub step_modulus: u32,
}

impl Default for GatedGrowthParams {
    fn default() -> Self {
        GatedGrowthParams {
            nutrient: NutrientParams {
                diffusion_rate: 0.05,
                threshold: 0.4,
                new_cell_cost: 0.3,
                maintenance_cost: 0.1,
                growth_probability: 0.2,
            },
            step_modulus: 1,
        }
    }
}

impl GatedGrowthParams {
    pub fn validate(&self) -> Result<()> {
        self.nutrient.validate()?;
        if self.step_modulus == 0 {
            return Err(AutomataError::config("step modulus must be at least 1"));
        }
        Ok(())
    }
}

/// Occupied cells spawn into empty orthogonal neighbors; any cell may die.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropagatingGrowthParams {
    pub nutrient: NutrientParams,
    pub death_probability: f64,
}

impl Default for PropagatingGrowthParams {
    fn default() -> Self {
        PropagatingGrowthParams {
            nutrient: NutrientParams {
                diffusion_rate: 0.05,
                threshold: 0.5,
                new_cell_cost: 0.4,
                maintenance_cost: 0.2,
                growth_probability: 0.2,
            },
            death_probability: 0.05,
        }
    }
}

impl PropagatingGrowthParams {
    pub fn validate(&self) -> Result<()> {
        self.nutrient.validate()?;
        check_probability("death probability", self.death_probability)
    }
}

/// Deterministic life-like rule limited by a Laplacian-diffused nutrient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NutrientLimitedLifeParams {
    pub diffusion_rate: f64,
    /// Minimum live neighbors for an empty cell to grow.
    pub growth_neighbors: u8,
    /// Nutrient required for, and consumed by, growth.
    pub growth_cost: f64,
    /// Live cells below this nutrient level starve.
    pub starvation_level: f64,
    /// Nutrient returned to the cell when it dies.
    pub death_release: f64,
}

impl Default for NutrientLimitedLifeParams {
    fn default() -> Self {
        NutrientLimitedLifeParams {
            diffusion_rate: 0.1,
            growth_neighbors: 2,
            growth_cost: 0.5,
            starvation_level: 0.1,
            death_release: 0.1,
        }
    }
}

impl NutrientLimitedLifeParams {
    pub fn validate(&self) -> Result<()> {
        check_diffusion_rate(self.diffusion_rate)?;
        if self.growth_neighbors > 8 {
            return Err(AutomataError::config(format!(
                "growth neighbors must be at most 8, got {}",
                self.growth_neighbors
            )));
        }
        check_non_negative("growth cost", self.growth_cost)?;
        check_non_negative("starvation level", self.starvation_level)?;
        check_non_negative("death release", self.death_release)
    }
}

/// Everything needed to build a [`crate::Simulation`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub rows: usize,
    pub cols: usize,
    pub rule: Rule,
    pub seed: u64,
    /// Worker threads for the parallel write pass (0 is treated as 1).
    pub num_threads: usize,
}

impl SimulationConfig {
    pub fn new(rows: usize, cols: usize, rule: Rule) -> Self {
        SimulationConfig {
            rows,
            cols,
            rule,
            seed: 0,
            num_threads: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        crate::automaton::grid::check_dimensions(self.rows, self.cols)?;
        self.rule.validate()
    }
}
