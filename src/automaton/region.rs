//! Region extraction and import operations.
//!
//! Used by the rendering side to pull frames out of the grid and by external
//! initializers to load a starting pattern.

use super::grid::Grid;
use crate::error::{AutomataError, Result};

/// Clamp a half-open rectangle to the grid and report its extent, or `None`
/// if it is empty after clamping.
fn clamp_region(
    grid: &Grid,
    min_row: i64,
    min_col: i64,
    max_row: i64,
    max_col: i64,
) -> Option<(usize, usize, usize, usize)> {
    let min_row = min_row.clamp(0, grid.rows as i64) as usize;
    let min_col = min_col.clamp(0, grid.cols as i64) as usize;
    let max_row = max_row.clamp(0, grid.rows as i64) as usize;
    let max_col = max_col.clamp(0, grid.cols as i64) as usize;

    if min_row >= max_row || min_col >= max_col {
        return None;
    }
    Some((min_row, min_col, max_row, max_col))
}

/// Extract a rectangular region of the grid into a flat buffer.
///
/// # Layout
/// Row-major (row changes slowest, column fastest), matching `import_region`.
/// Coordinates are clamped to the grid; they do not wrap.
///
/// # Returns
/// Number of bytes written, or 0 if the region is empty or the buffer is too
/// small.
pub fn extract_region(
    grid: &Grid,
    out_buf: &mut [u8],
    min_row: i64,
    min_col: i64,
    max_row: i64,
    max_col: i64,
) -> u64 {
    let (min_row, min_col, max_row, max_col) =
        match clamp_region(grid, min_row, min_col, max_row, max_col) {
            Some(r) => r,
            None => return 0,
        };

    let width = max_col - min_col;
    let total_size = (max_row - min_row) * width;

    // Ensure buffer is large enough
    if out_buf.len() < total_size {
        return 0;
    }

    for (offset, row) in (min_row..max_row).enumerate() {
        let src = &grid.cells[row * grid.cols + min_col..row * grid.cols + max_col];
        out_buf[offset * width..(offset + 1) * width].copy_from_slice(src);
    }

    total_size as u64
}

/// Import a rectangular region from a flat buffer into the grid.
///
/// Every value must be a legal state (`<= max_state`); otherwise nothing is
/// written.
///
/// # Returns
/// Number of bytes read. An empty region reads 0 bytes.
pub fn import_region(
    grid: &mut Grid,
    in_buf: &[u8],
    max_state: u8,
    min_row: i64,
    min_col: i64,
    max_row: i64,
    max_col: i64,
) -> Result<u64> {
    let (min_row, min_col, max_row, max_col) =
        match clamp_region(grid, min_row, min_col, max_row, max_col) {
            Some(r) => r,
            None => return Ok(0),
        };

    let width = max_col - min_col;
    let total_size = (max_row - min_row) * width;

    if in_buf.len() < total_size {
        return Err(AutomataError::config(format!(
            "import buffer holds {} values, region needs {}",
            in_buf.len(),
            total_size
        )));
    }

    let data = &in_buf[..total_size];
    if let Some(index) = data.iter().position(|&v| v > max_state) {
        return Err(AutomataError::InvalidState {
            state: data[index],
            index,
            max: max_state,
        });
    }

    for (offset, row) in (min_row..max_row).enumerate() {
        grid.cells[row * grid.cols + min_col..row * grid.cols + max_col]
            .copy_from_slice(&data[offset * width..(offset + 1) * width]);
    }

    Ok(total_size as u64)
}
