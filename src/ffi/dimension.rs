//! Box-counting dimension of the current grid.

use tracing::warn;

use crate::automaton::dimension::DEFAULT_BOX_SIZES;
use crate::state::Simulation;

/// Estimates the box-counting dimension of the active cells.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `sizes` must point to `n_sizes` values, or be null
/// - `out` must point to a writable `f64`
///
/// A null `sizes` or `n_sizes == 0` uses the default sizes (2, 4, 8, 16).
///
/// # Returns
/// 0 on success with the estimate written to `out`, 1 on failure (null
/// pointer, a zero box size, or too few occupied boxes to fit). `out` is left
/// untouched on failure.
#[no_mangle]
pub unsafe extern "C" fn la_estimate_dimension(
    ptr: *const Simulation,
    sizes: *const u32,
    n_sizes: u32,
    out: *mut f64,
) -> i32 {
    if ptr.is_null() || out.is_null() {
        return 1;
    }

    let sim = &*ptr;
    let box_sizes: Vec<usize> = if sizes.is_null() || n_sizes == 0 {
        DEFAULT_BOX_SIZES.to_vec()
    } else {
        std::slice::from_raw_parts(sizes, n_sizes as usize)
            .iter()
            .map(|&s| s as usize)
            .collect()
    };

    match sim.estimate_dimension(&box_sizes) {
        Ok(estimate) => {
            *out = estimate.dimension;
            0
        }
        Err(e) => {
            warn!(error = %e, generation = sim.generation(), "la_estimate_dimension failed");
            1
        }
    }
}
