use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Computes the next generation of `grid` under `rules`.
///
/// Every cell is updated simultaneously from its Moore neighborhood. Cells outside
/// the board count as dead, the board does not wrap. Zero-sized grids are returned
/// unchanged.
pub fn step(grid: &Grid, rules: &RuleSet) -> Grid {
    if grid.is_empty() {
        return grid.clone();
    }

    let cells = grid.cells();
    let (height, width) = cells.dim();
    let mut next: Array2<bool> = Array2::default([height, width]);

    for y in 0..height {
        let rows = y.saturating_sub(1)..=(y + 1).min(height - 1);
        for x in 0..width {
            let cols = x.saturating_sub(1)..=(x + 1).min(width - 1);
            let alive = cells[[y, x]];

            let mut neighbors = 0u8;
            for ny in rows.clone() {
                for nx in cols.clone() {
                    neighbors += u8::from(cells[[ny, nx]]);
                }
            }
            neighbors -= u8::from(alive);

            next[[y, x]] = rules.next_state(alive, neighbors);
        }
    }

    Grid::from_trusted(next)
}

/// Applies [`step`] exactly `generations` times, without any early exit.
pub fn state_at_generation(grid: &Grid, rules: &RuleSet, generations: Generation) -> Grid {
    let mut state = grid.clone();
    for _ in 0..generations {
        state = step(&state, rules);
    }
    state
}

/// A grid is stable when it is its own successor.
pub fn is_stable(grid: &Grid, rules: &RuleSet) -> bool {
    step(grid, rules) == *grid
}

/// Transition function bound to one rule set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    rules: RuleSet,
}

impl Engine {
    pub const fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn step(&self, grid: &Grid) -> Grid {
        step(grid, &self.rules)
    }

    pub fn state_at_generation(&self, grid: &Grid, generations: Generation) -> Grid {
        state_at_generation(grid, &self.rules, generations)
    }

    pub fn is_stable(&self, grid: &Grid) -> bool {
        is_stable(grid, &self.rules)
    }

    /// Describes `cells` as the state at `generation`, without any convergence info.
    pub fn snapshot(&self, cells: Grid, generation: Generation) -> GameState {
        let is_stable = self.is_stable(&cells);
        GameState::new(generation, cells, is_stable, None)
    }

    /// Jumps `generations` steps ahead of `grid` and describes the result.
    pub fn jump(&self, grid: &Grid, generations: Generation) -> GameState {
        self.snapshot(self.state_at_generation(grid, generations), generations)
    }

    /// Endless sequence of generations starting with `grid` itself at generation 0.
    pub fn generations(&self, grid: Grid) -> Generations {
        Generations {
            engine: *self,
            next: Some((0, grid)),
        }
    }
}

impl From<RuleSet> for Engine {
    fn from(rules: RuleSet) -> Self {
        Self::new(rules)
    }
}

/// Iterator returned by [`Engine::generations`].
#[derive(Clone, Debug)]
pub struct Generations {
    engine: Engine,
    next: Option<(Generation, Grid)>,
}

impl Iterator for Generations {
    type Item = (Generation, Grid);

    fn next(&mut self) -> Option<Self::Item> {
        let (generation, grid) = self.next.take()?;
        // Stops instead of wrapping once the counter is exhausted.
        self.next = generation
            .checked_add(1)
            .map(|following| (following, self.engine.step(&grid)));
        Some((generation, grid))
    }
}
