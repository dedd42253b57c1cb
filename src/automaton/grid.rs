//! Toroidal grid storage, wrapped cell access and neighbor counting.

use crate::error::{AutomataError, Result};

/// The state value counted as "active" by every neighborhood rule.
pub const ACTIVE: u8 = 1;

/// A 2D lattice of cell states with wraparound edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<u8>, // row-major, 0 = dead/resting
}

/// Initialize an empty grid with the given dimensions.
pub fn create_grid(rows: usize, cols: usize) -> Result<Grid> {
    let len = check_dimensions(rows, cols)?;
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|e| AutomataError::config(format!("cannot allocate {rows}x{cols} grid: {e}")))?;
    cells.resize(len, 0);
    Ok(Grid { rows, cols, cells })
}

/// Build a grid from an existing row-major cell buffer.
pub fn grid_from_cells(rows: usize, cols: usize, cells: Vec<u8>) -> Result<Grid> {
    let len = check_dimensions(rows, cols)?;
    if cells.len() != len {
        return Err(AutomataError::config(format!(
            "cell buffer holds {} values, expected {len}",
            cells.len()
        )));
    }
    Ok(Grid { rows, cols, cells })
}

/// Build a grid from a slice of equally long rows.
pub fn grid_from_rows(rows: &[&[u8]]) -> Result<Grid> {
    let cols = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.iter().any(|r| r.len() != cols) {
        return Err(AutomataError::config("rows have different lengths"));
    }
    grid_from_cells(rows.len(), cols, rows.concat())
}

/// Reject empty or unaddressable dimensions; returns the cell count.
pub(crate) fn check_dimensions(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(AutomataError::config(format!(
            "grid dimensions must be positive, got {rows}x{cols}"
        )));
    }
    // Coordinates wrap through isize, so the cell count must fit one
    rows.checked_mul(cols)
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or_else(|| AutomataError::config(format!("grid of {rows}x{cols} cells is too large")))
}

/// Wrap a signed coordinate onto `0..extent`.
#[inline]
pub fn wrap(coord: isize, extent: usize) -> usize {
    coord.rem_euclid(extent as isize) as usize
}

/// Calculate the linear index for a (possibly out-of-range) coordinate.
#[inline]
pub fn index_of(grid: &Grid, row: isize, col: isize) -> usize {
    wrap(row, grid.rows) * grid.cols + wrap(col, grid.cols)
}

/// Read a cell; any coordinate is valid.
#[inline]
pub fn get_cell(grid: &Grid, row: isize, col: isize) -> u8 {
    grid.cells[index_of(grid, row, col)]
}

/// Write a cell; any coordinate is valid.
pub fn set_cell(grid: &mut Grid, row: isize, col: isize, state: u8) {
    let idx = index_of(grid, row, col);
    grid.cells[idx] = state;
}

/// Count active neighbors using the Moore neighborhood (8 neighbors).
pub fn count_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let mut count = 0;

    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            // Skip the center cell
            if dr == 0 && dc == 0 {
                continue;
            }

            let idx = index_of(grid, row as isize + dr, col as isize + dc);
            if grid.cells[idx] == ACTIVE {
                count += 1;
            }
        }
    }

    count
}

/// Empty orthogonal neighbors of a cell as (row, col), in N, S, W, E order.
pub fn empty_von_neumann_neighbors(grid: &Grid, row: usize, col: usize) -> Vec<(usize, usize)> {
    let (r, c) = (row as isize, col as isize);
    [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)]
        .into_iter()
        .map(|(nr, nc)| (wrap(nr, grid.rows), wrap(nc, grid.cols)))
        .filter(|&(nr, nc)| grid.cells[nr * grid.cols + nc] == 0)
        .collect()
}

/// Number of cells holding `state`.
pub fn population(grid: &Grid, state: u8) -> usize {
    grid.cells.iter().filter(|&&c| c == state).count()
}

/// Reject a grid whose buffer does not match its dimensions or whose cells
/// exceed `max_state`.
pub fn validate_grid(grid: &Grid, max_state: u8) -> Result<()> {
    let len = check_dimensions(grid.rows, grid.cols)?;
    if grid.cells.len() != len {
        return Err(AutomataError::config(format!(
            "cell buffer holds {} values, expected {len}",
            grid.cells.len()
        )));
    }
    match grid.cells.iter().position(|&c| c > max_state) {
        Some(index) => Err(AutomataError::InvalidState {
            state: grid.cells[index],
            index,
            max: max_state,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_grid() {
        let grid = create_grid(6, 9).unwrap();
        assert_eq!(grid.rows, 6);
        assert_eq!(grid.cols, 9);
        assert_eq!(grid.cells.len(), 54);
        assert!(grid.cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(create_grid(0, 4), Err(AutomataError::Configuration(_))));
        assert!(matches!(create_grid(4, 0), Err(AutomataError::Configuration(_))));
        assert!(grid_from_cells(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert!(matches!(create_grid(1 << 33, 1 << 33), Err(AutomataError::Configuration(_))));
        assert!(create_grid(usize::MAX, 2).is_err());

        // 2^63 * 2 wraps to 0, which an empty buffer would otherwise match
        assert!(grid_from_cells(1 << 63, 2, Vec::new()).is_err());
        let grid = Grid {
            rows: 1 << 63,
            cols: 2,
            cells: Vec::new(),
        };
        assert!(validate_grid(&grid, ACTIVE).is_err());
    }

    #[test]
    fn test_index_of_wraps() {
        let grid = create_grid(4, 5).unwrap();

        assert_eq!(index_of(&grid, 0, 0), 0);
        assert_eq!(index_of(&grid, 3, 4), 19);
        // Wraparound on both axes
        assert_eq!(index_of(&grid, -1, 0), 15);
        assert_eq!(index_of(&grid, 0, -1), 4);
        assert_eq!(index_of(&grid, 4, 5), 0);
        assert_eq!(index_of(&grid, -9, 12), index_of(&grid, 3, 2));
    }

    #[test]
    fn test_count_neighbors_interior() {
        let mut grid = create_grid(8, 8).unwrap();

        // Plus shape around (4, 4)
        set_cell(&mut grid, 4, 4, 1);
        set_cell(&mut grid, 3, 4, 1);
        set_cell(&mut grid, 5, 4, 1);
        set_cell(&mut grid, 4, 3, 1);
        set_cell(&mut grid, 4, 5, 1);

        assert_eq!(count_neighbors(&grid, 4, 4), 4);
        // An arm sees the center and the two neighboring arms diagonally
        assert_eq!(count_neighbors(&grid, 3, 4), 3);
        assert_eq!(count_neighbors(&grid, 3, 3), 3);
        assert_eq!(count_neighbors(&grid, 0, 0), 0);
    }

    #[test]
    fn test_count_neighbors_across_corner() {
        let mut grid = create_grid(5, 5).unwrap();
        set_cell(&mut grid, 4, 4, 1);
        set_cell(&mut grid, 0, 4, 1);
        set_cell(&mut grid, 4, 0, 1);

        // (0,0) touches all three through the wrapped edges
        assert_eq!(count_neighbors(&grid, 0, 0), 3);
    }

    #[test]
    fn test_count_neighbors_ignores_refractory() {
        let mut grid = create_grid(3, 3).unwrap();
        grid.cells = vec![1, 2, 2, 2, 0, 1, 2, 2, 2];
        assert_eq!(count_neighbors(&grid, 1, 1), 2);
    }

    #[test]
    fn test_count_neighbors_full_torus() {
        // On a 3x3 torus every other cell is a neighbor exactly once
        let grid = grid_from_cells(3, 3, vec![1; 9]).unwrap();
        assert_eq!(count_neighbors(&grid, 1, 1), 8);
        assert_eq!(count_neighbors(&grid, 0, 0), 8);
    }

    #[test]
    fn test_empty_von_neumann_neighbors() {
        let grid = grid_from_rows(&[&[0, 1, 0], &[0, 1, 1], &[0, 0, 0]]).unwrap();
        // North of (1,1) is occupied, East is occupied
        assert_eq!(empty_von_neumann_neighbors(&grid, 1, 1), vec![(2, 1), (1, 0)]);
        // Wraps: north of (0,0) is (2,0)
        assert_eq!(
            empty_von_neumann_neighbors(&grid, 0, 0),
            vec![(2, 0), (1, 0), (0, 2)]
        );
    }

    #[test]
    fn test_validate_grid_states() {
        let grid = grid_from_cells(2, 2, vec![0, 1, 2, 0]).unwrap();
        assert!(validate_grid(&grid, 2).is_ok());
        assert_eq!(
            validate_grid(&grid, 1),
            Err(AutomataError::InvalidState { state: 2, index: 2, max: 1 })
        );
    }

    #[test]
    fn test_grid_from_rows_ragged() {
        assert!(grid_from_rows(&[&[0, 1], &[0]]).is_err());
        assert!(grid_from_rows(&[]).is_err());
    }
}
