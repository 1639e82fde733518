use alloc::boxed::Box;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::*;

/// Polled once per generation by [`SimulationRunner::run_with_cancel`].
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<F: Fn() -> bool> CancelSignal for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Steps a grid until it dies out, repeats a previous state, or the iteration budget
/// is spent.
///
/// Each run owns its state and fingerprint history, so a runner can be shared freely
/// between concurrent runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimulationRunner {
    engine: Engine,
    max_iterations: Generation,
}

impl SimulationRunner {
    pub const fn new(config: SimulationConfig) -> Self {
        Self {
            engine: Engine::new(config.rules),
            max_iterations: config.max_iterations,
        }
    }

    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    pub const fn max_iterations(&self) -> Generation {
        self.max_iterations
    }

    pub fn run(&self, initial: Grid) -> core::result::Result<GameState, RunError> {
        self.run_with_cancel(initial, &NeverCancel)
    }

    /// Runs to a terminal state.
    ///
    /// Every examined generation is checked against the fingerprints of all earlier
    /// ones before its own fingerprint is recorded, so the initial grid can never
    /// match itself. Generations `0..=max_iterations` are examined; a zero budget
    /// examines nothing and times out straight away with the initial grid.
    pub fn run_with_cancel<C: CancelSignal + ?Sized>(
        &self,
        initial: Grid,
        cancel: &C,
    ) -> core::result::Result<GameState, RunError> {
        if self.max_iterations == 0 {
            log::debug!("Zero iteration budget, initial grid left unexamined");
            return Err(self.timeout(initial, 0));
        }

        let mut history = History::new();
        let mut state = initial;
        let mut generation: Generation = 0;

        loop {
            if cancel.is_cancelled() {
                log::debug!("Run cancelled at generation {}", generation);
                return Err(RunError::Cancelled { generation });
            }

            let fingerprint = Fingerprint::of(&state);
            let outcome = check_fingerprinted(&state, &fingerprint, &history);

            if let Some(kind) = outcome.kind_at(generation) {
                log::debug!("Converged at generation {}: {:?}", generation, kind);
                let is_stable = self.engine.is_stable(&state);
                let converged = Converged {
                    at: generation,
                    kind,
                };
                return Ok(GameState::new(generation, state, is_stable, Some(converged)));
            }

            if generation == self.max_iterations {
                log::debug!(
                    "No convergence after {} generations, population {}",
                    generation,
                    state.population()
                );
                return Err(self.timeout(state, generation));
            }

            history.record(fingerprint);
            state = self.engine.step(&state);
            generation += 1;
            log::trace!("Generation {}: population {}", generation, state.population());
        }
    }

    fn timeout(&self, state: Grid, generation: Generation) -> RunError {
        RunError::Timeout {
            state: Box::new(self.engine.snapshot(state, generation)),
        }
    }
}

impl Default for SimulationRunner {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl From<SimulationConfig> for SimulationRunner {
    fn from(config: SimulationConfig) -> Self {
        Self::new(config)
    }
}
