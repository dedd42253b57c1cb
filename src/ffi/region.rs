//! Region extraction and import FFI functions.

use tracing::warn;

use crate::state::Simulation;

/// Cells in the requested (unclamped) rectangle, the size the caller's buffer
/// is promised to have.
fn requested_len(min_row: i64, min_col: i64, max_row: i64, max_col: i64) -> usize {
    let height = max_row.saturating_sub(min_row).max(0) as usize;
    let width = max_col.saturating_sub(min_col).max(0) as usize;
    height.saturating_mul(width)
}

/// Extracts a rectangular region of cells into a flat output buffer.
///
/// # Layout
/// Row-major (row changes slowest, column fastest), matching
/// `la_import_region`. The rectangle is half-open and clamped to the grid.
/// Output is packed at the clamped width: a request of (-2, -2, 4, 4) on a
/// 4x4 grid writes 16 bytes as four rows of four, not rows of six.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `out_buf` must point to a buffer with at least
///   `(max_row - min_row) * (max_col - min_col)` bytes
///
/// # Returns
/// Number of bytes written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn la_extract_region(
    ptr: *const Simulation,
    out_buf: *mut u8,
    min_row: i64,
    min_col: i64,
    max_row: i64,
    max_col: i64,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let sim = &*ptr;
    let len = requested_len(min_row, min_col, max_row, max_col);
    if len == 0 {
        return 0;
    }

    let buf_slice = std::slice::from_raw_parts_mut(out_buf, len);
    sim.extract_region(buf_slice, min_row, min_col, max_row, max_col)
}

/// Imports a rectangular region of cells from a flat buffer.
///
/// # Layout
/// The buffer is expected in row-major order (matching `la_extract_region`),
/// packed at the clamped width.
/// Every value must be a state the rule defines; otherwise nothing is
/// written.
///
/// # Safety
/// - `ptr` must be a valid pointer to a Simulation, or null
/// - `in_buf` must point to a buffer with at least
///   `(max_row - min_row) * (max_col - min_col)` bytes
///
/// # Returns
/// Number of bytes read, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn la_import_region(
    ptr: *mut Simulation,
    in_buf: *const u8,
    min_row: i64,
    min_col: i64,
    max_row: i64,
    max_col: i64,
) -> u64 {
    if ptr.is_null() || in_buf.is_null() {
        return 0;
    }

    let sim = &mut *ptr;
    let len = requested_len(min_row, min_col, max_row, max_col);
    if len == 0 {
        return 0;
    }

    let buf_slice = std::slice::from_raw_parts(in_buf, len);
    match sim.import_region(buf_slice, min_row, min_col, max_row, max_col) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "la_import_region rejected");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::grid::{la_get_cell, la_set_cell};
    use crate::ffi::lifecycle::{la_create, la_destroy};
    use std::ptr;

    #[test]
    fn test_extract_region() {
        unsafe {
            let sim = la_create(8, 8, 0, 0, 1);

            la_set_cell(sim, 2, 2, 1);
            la_set_cell(sim, 2, 3, 1);

            let mut buffer = vec![0u8; 16];
            let bytes = la_extract_region(sim, buffer.as_mut_ptr(), 2, 2, 6, 6);

            assert_eq!(bytes, 16);
            assert_eq!(buffer[0], 1);
            assert_eq!(buffer[1], 1);
            assert_eq!(buffer[4], 0);

            la_destroy(sim);
        }
    }

    #[test]
    fn test_extract_region_clamps() {
        unsafe {
            let sim = la_create(4, 4, 0, 0, 1);
            la_set_cell(sim, 0, 0, 1);
            la_set_cell(sim, 1, 0, 1);

            // Requested 6x6 buffer; only the 4x4 grid is written, packed
            let mut buffer = vec![9u8; 36];
            let bytes = la_extract_region(sim, buffer.as_mut_ptr(), -2, -2, 4, 4);

            assert_eq!(bytes, 16);
            assert_eq!(buffer[0], 1);
            assert_eq!(buffer[4], 1, "second row starts at the clamped width");
            assert_eq!(&buffer[1..4], &[0, 0, 0]);
            assert!(buffer[16..].iter().all(|&b| b == 9), "tail left untouched");

            la_destroy(sim);
        }
    }

    #[test]
    fn test_import_region() {
        unsafe {
            let sim = la_create(8, 8, 1, 0, 1);

            let mut buffer = vec![0u8; 16];
            buffer[0] = 1;
            buffer[1] = 2;

            let bytes = la_import_region(sim, buffer.as_ptr(), 2, 2, 6, 6);

            assert_eq!(bytes, 16);
            assert_eq!(la_get_cell(sim, 2, 2), 1);
            assert_eq!(la_get_cell(sim, 2, 3), 2);

            la_destroy(sim);
        }
    }

    #[test]
    fn test_import_region_rejects_undefined_state() {
        unsafe {
            let sim = la_create(4, 4, 0, 0, 1);

            let buffer = [1u8, 1, 1, 2];
            assert_eq!(la_import_region(sim, buffer.as_ptr(), 0, 0, 2, 2), 0);
            assert_eq!(la_get_cell(sim, 0, 0), 0, "nothing written on error");

            la_destroy(sim);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            let mut buffer = vec![0u8; 16];
            let sim = la_create(4, 4, 0, 0, 1);

            assert_eq!(la_extract_region(ptr::null(), buffer.as_mut_ptr(), 0, 0, 4, 4), 0);
            assert_eq!(la_extract_region(sim, ptr::null_mut(), 0, 0, 4, 4), 0);
            assert_eq!(la_import_region(ptr::null_mut(), buffer.as_ptr(), 0, 0, 4, 4), 0);
            assert_eq!(la_import_region(sim, ptr::null(), 0, 0, 4, 4), 0);

            la_destroy(sim);
        }
    }
}
