//! Simulation creation, destruction, and generation queries.

use tracing::warn;

use crate::automaton::field::create_field;
use crate::automaton::grid::create_grid;
use crate::automaton::rules::Rule;
use crate::config::{
    GatedGrowthParams, NutrientLimitedLifeParams, PropagatingGrowthParams, SimulationConfig,
};
use crate::error::{AutomataError, Result};
use crate::state::Simulation;

/// Nutrient concentration every field starts with when created over FFI.
const INITIAL_NUTRIENT: f64 = 1.0;

fn rule_from_code(code: u32) -> Result<Rule> {
    match code {
        0 => Ok(Rule::BinaryLife),
        1 => Ok(Rule::ThreeStateExcitable),
        2 => Ok(Rule::GatedInPlaceGrowth(GatedGrowthParams::default())),
        3 => Ok(Rule::PropagatingGrowthWithDeath(PropagatingGrowthParams::default())),
        4 => Ok(Rule::NutrientLimitedLife(NutrientLimitedLifeParams::default())),
        other => Err(AutomataError::config(format!("unknown rule code {other}"))),
    }
}

fn build(rows: i64, cols: i64, rule_code: u32, seed: u64, num_threads: u32) -> Result<Simulation> {
    let (rows, cols) = match (usize::try_from(rows), usize::try_from(cols)) {
        (Ok(r), Ok(c)) => (r, c),
        _ => {
            return Err(AutomataError::config(format!(
                "grid dimensions must be positive, got {rows}x{cols}"
            )))
        }
    };
    let rule = rule_from_code(rule_code)?;
    let config = SimulationConfig::new(rows, cols, rule)
        .with_seed(seed)
        .with_threads(num_threads as usize);

    let grid = create_grid(rows, cols)?;
    let field = if rule.needs_field() {
        Some(create_field(rows, cols, INITIAL_NUTRIENT)?)
    } else {
        None
    };
    Simulation::new(config, grid, field)
}

/// Creates a new simulation with an all-empty grid and returns an opaque
/// pointer.
///
/// Rule codes: 0 binary life, 1 three-state excitable, 2 gated in-place
/// growth, 3 propagating growth with death, 4 nutrient-limited life. All use
/// default parameters; nutrient rules start with a uniform field of 1.0.
///
/// # Returns
/// A pointer to a new Simulation, or null if the dimensions or rule code are
/// invalid.
///
/// # Safety
/// The returned pointer must eventually be freed with `la_destroy()`.
#[no_mangle]
pub extern "C" fn la_create(
    rows: i64,
    cols: i64,
    rule_code: u32,
    seed: u64,
    num_threads: u32,
) -> *mut Simulation {
    match build(rows, cols, rule_code, seed, num_threads) {
        Ok(sim) => Box::into_raw(Box::new(sim)),
        Err(e) => {
            warn!(error = %e, rows, cols, rule_code, "la_create rejected");
            std::ptr::null_mut()
        }
    }
}

/// Destroys a simulation and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `la_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn la_destroy(ptr: *mut Simulation) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the current generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn la_get_generation(ptr: *const Simulation) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation()
}
