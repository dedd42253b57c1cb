//! Cell access and stepping.

use tracing::warn;

use crate::state::Simulation;

/// Sets a cell to `state`. Coordinates wrap around the torus.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// States the rule does not define are ignored.
#[no_mangle]
pub unsafe extern "C" fn la_set_cell(ptr: *mut Simulation, row: i64, col: i64, state: u8) {
    if ptr.is_null() {
        return;
    }

    let sim = &mut *ptr;
    if let Err(e) = sim.set_cell(row as isize, col as isize, state) {
        warn!(error = %e, row, col, "la_set_cell ignored");
    }
}

/// Gets the state of a cell. Coordinates wrap around the torus.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The cell state, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn la_get_cell(ptr: *const Simulation, row: i64, col: i64) -> u8 {
    if ptr.is_null() {
        return 0;
    }

    (*ptr).get_cell(row as isize, col as isize)
}

/// Advances the simulation by one generation.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer or a rejected step). A rejected
/// step leaves the simulation unchanged.
#[no_mangle]
pub unsafe extern "C" fn la_step(ptr: *mut Simulation) -> i32 {
    if ptr.is_null() {
        return 1;
    }

    let sim = &mut *ptr;
    match sim.step() {
        Ok(()) => 0,
        Err(e) => {
            warn!(error = %e, generation = sim.generation(), "la_step failed");
            1
        }
    }
}
