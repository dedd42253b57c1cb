//! The simulation context: grid, nutrient field, rule, random stream and
//! worker pool, advanced one whole generation at a time.

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::automaton::dimension::{estimate_dimension, DimensionEstimate, DEFAULT_BOX_SIZES};
use crate::automaton::field::{field_set, field_total, validate_field, NutrientField};
use crate::automaton::grid::{index_of, population, validate_grid, Grid, ACTIVE};
use crate::automaton::random::seeded;
use crate::automaton::region::{extract_region, import_region};
use crate::automaton::rules::Rule;
use crate::automaton::stepping::{check_same_shape, step};
use crate::automaton::trajectory::Trajectory;
use crate::config::SimulationConfig;
use crate::error::{AutomataError, Result};

/// One running simulation. Owns all of its state; nothing is shared.
pub struct Simulation {
    grid: Grid,
    field: Option<NutrientField>,
    rule: Rule,
    generation: u64,
    rng: StdRng,
    thread_pool: rayon::ThreadPool,
}

impl Simulation {
    /// Validate the configuration and initial state, then build the context.
    ///
    /// Field-coupled rules require `field`; other rules reject one.
    pub fn new(config: SimulationConfig, grid: Grid, field: Option<NutrientField>) -> Result<Self> {
        config.validate()?;
        validate_grid(&grid, config.rule.max_state())?;

        if grid.rows != config.rows || grid.cols != config.cols {
            return Err(AutomataError::DimensionMismatch {
                expected_rows: config.rows,
                expected_cols: config.cols,
                actual_rows: grid.rows,
                actual_cols: grid.cols,
            });
        }

        match (&field, config.rule.needs_field()) {
            (Some(f), true) => {
                validate_field(f)?;
                check_same_shape(&grid, f)?;
            }
            (None, true) => {
                return Err(AutomataError::config(format!(
                    "rule {} requires a nutrient field",
                    config.rule.name()
                )))
            }
            (Some(_), false) => {
                return Err(AutomataError::config(format!(
                    "rule {} does not use a nutrient field",
                    config.rule.name()
                )))
            }
            (None, false) => {}
        }

        let num_threads = config.num_threads.max(1);
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| AutomataError::config(format!("cannot build thread pool: {e}")))?;

        info!(
            rule = config.rule.name(),
            rows = config.rows,
            cols = config.cols,
            seed = config.seed,
            threads = num_threads,
            "simulation created"
        );

        Ok(Simulation {
            grid,
            field,
            rule: config.rule,
            generation: 0,
            rng: seeded(config.seed),
            thread_pool,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn field(&self) -> Option<&NutrientField> {
        self.field.as_ref()
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance one generation. On error nothing is committed.
    pub fn step(&mut self) -> Result<()> {
        let Simulation {
            grid,
            field,
            rule,
            generation,
            rng,
            thread_pool,
        } = self;

        let next = thread_pool.install(|| step(grid, rule, field.as_ref(), *generation, rng))?;

        self.grid = next.grid;
        if self.rule.needs_field() {
            self.field = next.field;
        }
        self.generation += 1;

        debug!(
            generation = self.generation,
            population = population(&self.grid, ACTIVE),
            nutrient = ?self.field.as_ref().map(field_total),
            "step complete"
        );
        Ok(())
    }

    /// Advance `steps` generations, stopping at the first error.
    pub fn advance(&mut self, steps: u64) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Advance `steps` generations, appending every new generation to
    /// `trajectory`.
    ///
    /// With `box_sizes`, each entry carries a dimension estimate. A generation
    /// with too few occupied boxes to fit is recorded without one.
    pub fn advance_recording(
        &mut self,
        steps: u64,
        box_sizes: Option<&[usize]>,
        trajectory: &mut Trajectory,
    ) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
            let dimension = match box_sizes {
                Some(sizes) => match estimate_dimension(&self.grid, sizes) {
                    Ok(estimate) => Some(estimate.dimension),
                    Err(AutomataError::InsufficientData { .. }) => None,
                    Err(e) => return Err(e),
                },
                None => None,
            };
            trajectory.record(self.generation, &self.grid, dimension);
        }
        Ok(())
    }

    /// Box-counting dimension of the current grid; empty `box_sizes` uses
    /// [`DEFAULT_BOX_SIZES`].
    pub fn estimate_dimension(&self, box_sizes: &[usize]) -> Result<DimensionEstimate> {
        let sizes = if box_sizes.is_empty() { DEFAULT_BOX_SIZES } else { box_sizes };
        estimate_dimension(&self.grid, sizes)
    }

    /// Set a cell (coordinates wrap). Rejects states the rule does not define.
    pub fn set_cell(&mut self, row: isize, col: isize, state: u8) -> Result<()> {
        let max = self.rule.max_state();
        let index = index_of(&self.grid, row, col);
        if state > max {
            return Err(AutomataError::InvalidState { state, index, max });
        }
        self.grid.cells[index] = state;
        Ok(())
    }

    pub fn get_cell(&self, row: isize, col: isize) -> u8 {
        self.grid.cells[index_of(&self.grid, row, col)]
    }

    /// Set one nutrient value (coordinates wrap).
    pub fn set_nutrient(&mut self, row: isize, col: isize, value: f64) -> Result<()> {
        let name = self.rule.name();
        let field = self
            .field
            .as_mut()
            .ok_or_else(|| AutomataError::config(format!("rule {name} has no nutrient field")))?;
        field_set(field, row, col, value)
    }

    /// Set every nutrient value to `value`.
    pub fn fill_field(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(AutomataError::config(format!(
                "nutrient concentration must be finite and non-negative, got {value}"
            )));
        }
        let name = self.rule.name();
        let field = self
            .field
            .as_mut()
            .ok_or_else(|| AutomataError::config(format!("rule {name} has no nutrient field")))?;
        field.cells.fill(value);
        Ok(())
    }

    pub fn extract_region(
        &self,
        out_buf: &mut [u8],
        min_row: i64,
        min_col: i64,
        max_row: i64,
        max_col: i64,
    ) -> u64 {
        extract_region(&self.grid, out_buf, min_row, min_col, max_row, max_col)
    }

    pub fn import_region(
        &mut self,
        in_buf: &[u8],
        min_row: i64,
        min_col: i64,
        max_row: i64,
        max_col: i64,
    ) -> Result<u64> {
        let max = self.rule.max_state();
        import_region(&mut self.grid, in_buf, max, min_row, min_col, max_row, max_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::field::create_field;
    use crate::automaton::grid::{create_grid, grid_from_cells, set_cell};
    use crate::config::{GatedGrowthParams, NutrientLimitedLifeParams, PropagatingGrowthParams};

    fn glider_grid() -> Grid {
        let mut grid = create_grid(16, 16).unwrap();
        for (r, c) in [(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)] {
            set_cell(&mut grid, r, c, 1);
        }
        grid
    }

    #[test]
    fn test_new_validates_dimensions() {
        let grid = create_grid(8, 8).unwrap();
        let err = Simulation::new(SimulationConfig::new(8, 9, Rule::BinaryLife), grid, None)
            .err()
            .unwrap();
        assert!(matches!(err, AutomataError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_new_requires_field_for_nutrient_rules() {
        let rule = Rule::GatedInPlaceGrowth(GatedGrowthParams::default());
        let grid = create_grid(8, 8).unwrap();
        assert!(Simulation::new(SimulationConfig::new(8, 8, rule), grid.clone(), None).is_err());

        let field = create_field(8, 8, 1.0).unwrap();
        let config = SimulationConfig::new(8, 8, Rule::BinaryLife);
        assert!(Simulation::new(config, grid, Some(field)).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_states() {
        let grid = grid_from_cells(2, 2, vec![0, 0, 2, 0]).unwrap();
        let err = Simulation::new(SimulationConfig::new(2, 2, Rule::BinaryLife), grid, None)
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_generation_increments() {
        let grid = create_grid(4, 4).unwrap();
        let config = SimulationConfig::new(4, 4, Rule::BinaryLife);
        let mut sim = Simulation::new(config, grid, None).unwrap();

        assert_eq!(sim.generation(), 0);
        sim.step().unwrap();
        assert_eq!(sim.generation(), 1);
        sim.advance(5).unwrap();
        assert_eq!(sim.generation(), 6);
        assert!(sim.grid().cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let run = |threads: usize| {
            let config = SimulationConfig::new(16, 16, Rule::BinaryLife).with_threads(threads);
            let mut sim = Simulation::new(config, glider_grid(), None).unwrap();
            sim.advance(12).unwrap();
            sim.grid().clone()
        };
        assert_eq!(run(1), run(4));
    }

    #[test]
    fn test_thread_count_does_not_change_limited_life() {
        let run = |threads: usize| {
            let rule = Rule::NutrientLimitedLife(NutrientLimitedLifeParams::default());
            let mut grid = glider_grid();
            for (r, c) in [(10, 10), (10, 11), (11, 10), (12, 12), (12, 13)] {
                set_cell(&mut grid, r, c, 1);
            }
            let mut field = create_field(16, 16, 0.6).unwrap();
            field.cells[40] = 3.0;
            field.cells[170] = 0.05;

            let config = SimulationConfig::new(16, 16, rule).with_threads(threads);
            let mut sim = Simulation::new(config, grid, Some(field)).unwrap();
            sim.advance(15).unwrap();
            (sim.grid().clone(), sim.field().cloned())
        };
        assert_eq!(run(1), run(4));
    }

    #[test]
    fn test_seed_reproducibility() {
        let run = |seed: u64| {
            let rule = Rule::PropagatingGrowthWithDeath(PropagatingGrowthParams::default());
            let mut grid = create_grid(20, 20).unwrap();
            set_cell(&mut grid, 10, 10, 1);
            let field = create_field(20, 20, 5.0).unwrap();
            let config = SimulationConfig::new(20, 20, rule).with_seed(seed);
            let mut sim = Simulation::new(config, grid, Some(field)).unwrap();
            sim.advance(20).unwrap();
            (sim.grid().clone(), sim.field().cloned())
        };
        assert_eq!(run(2024), run(2024));
    }

    #[test]
    fn test_nutrients_stay_non_negative() {
        let rules = [
            Rule::GatedInPlaceGrowth(GatedGrowthParams::default()),
            Rule::PropagatingGrowthWithDeath(PropagatingGrowthParams::default()),
            Rule::NutrientLimitedLife(NutrientLimitedLifeParams::default()),
        ];
        for rule in rules {
            let mut grid = create_grid(24, 24).unwrap();
            for (r, c) in [(12, 12), (12, 13), (13, 12), (5, 5), (5, 6)] {
                set_cell(&mut grid, r, c, 1);
            }
            let field = create_field(24, 24, 0.8).unwrap();
            let config = SimulationConfig::new(24, 24, rule).with_seed(3);
            let mut sim = Simulation::new(config, grid, Some(field)).unwrap();

            for _ in 0..30 {
                sim.step().unwrap();
                let field = sim.field().unwrap();
                assert!(field.cells.iter().all(|&c| c >= 0.0), "{}", rule.name());
            }
        }
    }

    #[test]
    fn test_set_cell_validates_state() {
        let grid = create_grid(4, 4).unwrap();
        let config = SimulationConfig::new(4, 4, Rule::ThreeStateExcitable);
        let mut sim = Simulation::new(config, grid, None).unwrap();

        sim.set_cell(-1, -1, 2).unwrap();
        assert_eq!(sim.get_cell(3, 3), 2);
        assert!(sim.set_cell(0, 0, 3).is_err());
        assert_eq!(sim.get_cell(0, 0), 0);
    }

    #[test]
    fn test_nutrient_access_without_field() {
        let grid = create_grid(4, 4).unwrap();
        let config = SimulationConfig::new(4, 4, Rule::BinaryLife);
        let mut sim = Simulation::new(config, grid, None).unwrap();
        assert!(sim.set_nutrient(0, 0, 1.0).is_err());
        assert!(sim.fill_field(1.0).is_err());
    }

    #[test]
    fn test_advance_recording_tracks_dimension() {
        let config = SimulationConfig::new(16, 16, Rule::BinaryLife);
        let mut sim = Simulation::new(config, glider_grid(), None).unwrap();
        let mut trajectory = Trajectory::new();

        sim.advance_recording(8, Some(DEFAULT_BOX_SIZES), &mut trajectory).unwrap();

        assert_eq!(trajectory.len(), 8);
        assert_eq!(trajectory.entries()[0].generation, 1);
        assert_eq!(trajectory.last().map(|e| e.generation), Some(8));
        assert_eq!(trajectory.dimensions().len(), 8);
        assert!(trajectory.dimensions().iter().all(|d| (0.0..=2.0).contains(d)));
    }

    #[test]
    fn test_advance_recording_empty_pattern() {
        let grid = create_grid(8, 8).unwrap();
        let config = SimulationConfig::new(8, 8, Rule::BinaryLife);
        let mut sim = Simulation::new(config, grid, None).unwrap();
        let mut trajectory = Trajectory::new();

        sim.advance_recording(3, Some(DEFAULT_BOX_SIZES), &mut trajectory).unwrap();

        assert_eq!(trajectory.len(), 3);
        assert!(trajectory.dimensions().is_empty());
    }

    #[test]
    fn test_failed_step_commits_nothing() {
        // StdRng never yields an out-of-range draw; corrupt the grid instead.
        let rule = Rule::GatedInPlaceGrowth(GatedGrowthParams::default());
        let grid = create_grid(4, 4).unwrap();
        let field = create_field(4, 4, 1.0).unwrap();
        let config = SimulationConfig::new(4, 4, rule);
        let mut sim = Simulation::new(config, grid, Some(field)).unwrap();
        sim.step().unwrap();

        sim.grid.cells[0] = 7;
        let grid_before = sim.grid().clone();
        let field_before = sim.field().cloned();

        assert!(sim.step().is_err());
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.grid(), &grid_before);
        assert_eq!(sim.field().cloned(), field_before);
    }
}
