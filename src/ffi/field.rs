//! Nutrient field access for field-coupled rules.

use tracing::warn;

use crate::automaton::field::field_get;
use crate::state::Simulation;

/// Sets the nutrient concentration of one cell. Coordinates wrap.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// Negative or non-finite values are ignored, as are simulations whose rule
/// has no nutrient field.
#[no_mangle]
pub unsafe extern "C" fn la_field_set(ptr: *mut Simulation, row: i64, col: i64, value: f64) {
    if ptr.is_null() {
        return;
    }

    let sim = &mut *ptr;
    if let Err(e) = sim.set_nutrient(row as isize, col as isize, value) {
        warn!(error = %e, row, col, "la_field_set ignored");
    }
}

/// Gets the nutrient concentration of one cell. Coordinates wrap.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// # Returns
/// The concentration, or 0.0 for a null pointer or a rule without a field.
#[no_mangle]
pub unsafe extern "C" fn la_field_get(ptr: *const Simulation, row: i64, col: i64) -> f64 {
    if ptr.is_null() {
        return 0.0;
    }

    (*ptr)
        .field()
        .map(|f| field_get(f, row as isize, col as isize))
        .unwrap_or(0.0)
}

/// Sets every nutrient value to `value`.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
///
/// Ignored under the same conditions as `la_field_set`.
#[no_mangle]
pub unsafe extern "C" fn la_field_fill(ptr: *mut Simulation, value: f64) {
    if ptr.is_null() {
        return;
    }

    let sim = &mut *ptr;
    if let Err(e) = sim.fill_field(value) {
        warn!(error = %e, "la_field_fill ignored");
    }
}
