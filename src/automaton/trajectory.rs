//! Append-only record of generations and their dimension estimates.

use super::grid::Grid;

#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryEntry {
    pub generation: u64,
    pub grid: Grid,
    pub dimension: Option<f64>,
}

/// Snapshots in the order they were recorded. Entries cannot be edited once
/// appended.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    entries: Vec<TrajectoryEntry>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of `grid` taken at `generation`.
    pub fn record(&mut self, generation: u64, grid: &Grid, dimension: Option<f64>) {
        self.entries.push(TrajectoryEntry {
            generation,
            grid: grid.clone(),
            dimension,
        });
    }

    pub fn entries(&self) -> &[TrajectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TrajectoryEntry> {
        self.entries.last()
    }

    /// Dimension estimates in recording order, skipping entries without one.
    pub fn dimensions(&self) -> Vec<f64> {
        self.entries.iter().filter_map(|e| e.dimension).collect()
    }
}
