//! Rule variants and their per-cell transition functions.

use super::field::DiffusionFormula;
use crate::config::{GatedGrowthParams, NutrientLimitedLifeParams, PropagatingGrowthParams};
use crate::error::Result;

pub const DEAD: u8 = 0;
pub const ALIVE: u8 = 1;

pub const RESTING: u8 = 0;
pub const FIRING: u8 = 1;
pub const REFRACTORY: u8 = 2;

/// The closed set of supported automata.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rule {
    /// Conway's B3/S23.
    BinaryLife,
    /// Brian's Brain: resting -> firing -> refractory -> resting.
    ThreeStateExcitable,
    /// Stochastic in-place growth gated by crowding and nutrient.
    GatedInPlaceGrowth(GatedGrowthParams),
    /// Stochastic growth that spreads into empty neighbors, with random death.
    PropagatingGrowthWithDeath(PropagatingGrowthParams),
    /// Life-like survival with nutrient-limited birth and starvation.
    NutrientLimitedLife(NutrientLimitedLifeParams),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::BinaryLife => "binary-life",
            Rule::ThreeStateExcitable => "three-state-excitable",
            Rule::GatedInPlaceGrowth(_) => "gated-in-place-growth",
            Rule::PropagatingGrowthWithDeath(_) => "propagating-growth-with-death",
            Rule::NutrientLimitedLife(_) => "nutrient-limited-life",
        }
    }

    /// Highest cell state this rule defines.
    pub fn max_state(&self) -> u8 {
        match self {
            Rule::ThreeStateExcitable => REFRACTORY,
            _ => ALIVE,
        }
    }

    /// Whether stepping requires a nutrient field.
    pub fn needs_field(&self) -> bool {
        self.diffusion().is_some()
    }

    /// The one diffusion operator this rule applies, if it has a field.
    pub fn diffusion_formula(&self) -> Option<DiffusionFormula> {
        self.diffusion().map(|(_, formula)| formula)
    }

    /// Diffusion rate and operator, for field-coupled rules.
    pub fn diffusion(&self) -> Option<(f64, DiffusionFormula)> {
        match self {
            Rule::BinaryLife | Rule::ThreeStateExcitable => None,
            Rule::GatedInPlaceGrowth(p) => {
                Some((p.nutrient.diffusion_rate, DiffusionFormula::WeightedAverage))
            }
            Rule::PropagatingGrowthWithDeath(p) => {
                Some((p.nutrient.diffusion_rate, DiffusionFormula::WeightedAverage))
            }
            Rule::NutrientLimitedLife(p) => Some((p.diffusion_rate, DiffusionFormula::Laplacian)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Rule::BinaryLife | Rule::ThreeStateExcitable => Ok(()),
            Rule::GatedInPlaceGrowth(p) => p.validate(),
            Rule::PropagatingGrowthWithDeath(p) => p.validate(),
            Rule::NutrientLimitedLife(p) => p.validate(),
        }
    }
}

/// B3/S23 transition.
#[inline]
pub fn life_transition(state: u8, neighbors: u8) -> u8 {
    match (state, neighbors) {
        (ALIVE, 2) | (ALIVE, 3) => ALIVE,
        (DEAD, 3) => ALIVE,
        _ => DEAD,
    }
}

/// Brian's Brain transition. Only resting cells look at their neighbors.
#[inline]
pub fn excitable_transition(state: u8, neighbors: u8) -> u8 {
    match state {
        RESTING if neighbors == 2 => FIRING,
        RESTING => RESTING,
        FIRING => REFRACTORY,
        _ => RESTING,
    }
}

/// Crowding factor `1 / (1 + n)`.
#[inline]
pub fn crowding(neighbors: u8) -> f64 {
    1.0 / (1.0 + neighbors as f64)
}
