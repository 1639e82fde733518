#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use convergence::*;
pub use engine::*;
pub use error::*;
pub use fingerprint::*;
pub use generator::*;
pub use grid::*;
pub use rules::*;
pub use runner::*;
pub use types::*;

mod convergence;
mod engine;
mod error;
mod fingerprint;
mod generator;
mod grid;
mod rules;
mod runner;
mod types;

pub const DEFAULT_MAX_ITERATIONS: Generation = 1000;

/// Everything a [`SimulationRunner`] needs besides the initial grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rules: RuleSet,
    pub max_iterations: Generation,
}

impl SimulationConfig {
    pub const fn new(rules: RuleSet, max_iterations: Generation) -> Self {
        Self {
            rules,
            max_iterations,
        }
    }

    pub const fn with_rules(self, rules: RuleSet) -> Self {
        Self { rules, ..self }
    }

    pub const fn with_max_iterations(self, max_iterations: Generation) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(RuleSet::conway(), DEFAULT_MAX_ITERATIONS)
    }
}

/// Point-in-time description of a simulation, handed to the caller by value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    generation: Generation,
    cells: Grid,
    is_stable: bool,
    population: CellCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    convergence: Option<Converged>,
}

/// When and how a run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Converged {
    pub at: Generation,
    pub kind: ConvergenceKind,
}

impl GameState {
    pub(crate) fn new(
        generation: Generation,
        cells: Grid,
        is_stable: bool,
        convergence: Option<Converged>,
    ) -> Self {
        let population = cells.population();
        Self {
            generation,
            cells,
            is_stable,
            population,
            convergence,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn cells(&self) -> &Grid {
        &self.cells
    }

    pub fn into_cells(self) -> Grid {
        self.cells
    }

    /// Whether one more step would leave the grid unchanged.
    pub fn is_stable(&self) -> bool {
        self.is_stable
    }

    pub fn population(&self) -> CellCount {
        self.population
    }

    pub fn convergence(&self) -> Option<Converged> {
        self.convergence
    }

    pub fn converged_at(&self) -> Option<Generation> {
        self.convergence.map(|converged| converged.at)
    }

    pub fn convergence_kind(&self) -> Option<ConvergenceKind> {
        self.convergence.map(|converged| converged.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_conway_with_bounded_budget() {
        let config = SimulationConfig::default();

        assert_eq!(config.rules, RuleSet::conway());
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(
            config.with_max_iterations(5).with_rules(RuleSet::high_life()),
            SimulationConfig::new(RuleSet::high_life(), 5)
        );
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"rules":"B36/S23"}"#).unwrap();

        assert_eq!(config.rules, RuleSet::high_life());
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn game_state_serializes_convergence_only_when_present() {
        let engine = Engine::new(RuleSet::conway());
        let state = engine.snapshot(Grid::parse("#").unwrap(), 0);

        let json = serde_json::to_string(&state).unwrap();

        assert_eq!(
            json,
            r#"{"generation":0,"cells":[[true]],"is_stable":false,"population":1}"#
        );
    }
}
