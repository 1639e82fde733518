use gridlife_core::{
    CancelSignal, Coord, ConvergenceKind, Engine, GameState, Generation, Grid, LifeError,
    NeverCancel, RuleSet, RunError, SimulationConfig, SimulationRunner,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_WIDTH: Coord = 200;
pub const DEFAULT_MAX_HEIGHT: Coord = 200;
pub const DEFAULT_MAX_GENERATIONS: Generation = 1000;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error(transparent)]
    Life(#[from] LifeError),
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Grid of {width}x{height} exceeds the {max_width}x{max_height} limit")]
    GridTooLarge {
        width: Coord,
        height: Coord,
        max_width: Coord,
        max_height: Coord,
    },
    #[error("{requested} generations exceed the limit of {max}")]
    TooManyGenerations {
        requested: Generation,
        max: Generation,
    },
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Caps applied to untrusted requests before they reach the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_width: Coord,
    pub max_height: Coord,
    pub max_generations: Generation,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }
}

impl Limits {
    pub fn check_grid(&self, grid: &Grid) -> Result<()> {
        let (width, height) = grid.size();
        if width > self.max_width || height > self.max_height {
            return Err(ProtocolError::GridTooLarge {
                width,
                height,
                max_width: self.max_width,
                max_height: self.max_height,
            });
        }
        Ok(())
    }

    pub fn check_generations(&self, requested: Generation) -> Result<()> {
        if requested > self.max_generations {
            return Err(ProtocolError::TooManyGenerations {
                requested,
                max: self.max_generations,
            });
        }
        Ok(())
    }

    /// Builds a grid from request rows and checks it against the size caps.
    pub fn decode_grid(&self, rows: Vec<Vec<bool>>) -> Result<Grid> {
        let grid = Grid::from_rows(rows)?;
        self.check_grid(&grid)?;
        Ok(grid)
    }
}

/// Resolves a preset name or rulestring; a missing name means Conway's rules.
pub fn decode_rules(name: Option<&str>) -> Result<RuleSet> {
    match name.map(str::trim) {
        None | Some("") => Ok(RuleSet::conway()),
        Some(name) => Ok(RuleSet::lookup(name)?),
    }
}

/// Advance a board by a fixed number of generations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    pub cells: Vec<Vec<bool>>,
    #[serde(default)]
    pub rules: Option<String>,
    /// Defaults to a single step.
    #[serde(default)]
    pub generations: Option<Generation>,
}

impl StepRequest {
    pub fn execute(self, limits: &Limits) -> Result<StateResponse> {
        let rules = decode_rules(self.rules.as_deref())?;
        let generations = self.generations.unwrap_or(1);
        limits.check_generations(generations)?;
        let grid = limits.decode_grid(self.cells)?;

        log::debug!(
            "Stepping {:?} grid {} generations under {}",
            grid.size(),
            generations,
            rules
        );
        Ok(Engine::new(rules).jump(&grid, generations).into())
    }
}

/// Run a board until it converges or the iteration budget is spent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub cells: Vec<Vec<bool>>,
    #[serde(default)]
    pub rules: Option<String>,
    /// Defaults to [`Limits::max_generations`].
    #[serde(default)]
    pub max_iterations: Option<Generation>,
}

impl RunRequest {
    pub fn config(&self, limits: &Limits) -> Result<SimulationConfig> {
        let rules = decode_rules(self.rules.as_deref())?;
        let max_iterations = self.max_iterations.unwrap_or(limits.max_generations);
        limits.check_generations(max_iterations)?;
        Ok(SimulationConfig::new(rules, max_iterations))
    }

    pub fn execute(self, limits: &Limits) -> Result<RunResponse> {
        self.execute_with_cancel(limits, &NeverCancel)
    }

    pub fn execute_with_cancel<C: CancelSignal + ?Sized>(
        self,
        limits: &Limits,
        cancel: &C,
    ) -> Result<RunResponse> {
        let config = self.config(limits)?;
        let grid = limits.decode_grid(self.cells)?;

        let outcome = SimulationRunner::new(config).run_with_cancel(grid, cancel);
        Ok(outcome.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    pub generation: Generation,
    pub cells: Vec<Vec<bool>>,
    pub population: u32,
    pub is_stable: bool,
}

impl From<&GameState> for StateResponse {
    fn from(state: &GameState) -> Self {
        Self {
            generation: state.generation(),
            cells: state.cells().rows(),
            population: state.population(),
            is_stable: state.is_stable(),
        }
    }
}

impl From<GameState> for StateResponse {
    fn from(state: GameState) -> Self {
        Self::from(&state)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunResponse {
    Converged {
        state: StateResponse,
        converged_at: Generation,
        convergence: ConvergenceKind,
    },
    /// Carries the last examined state so the caller can resume or display it.
    Timeout { state: StateResponse },
    Cancelled { generation: Generation },
}

impl From<core::result::Result<GameState, RunError>> for RunResponse {
    fn from(outcome: core::result::Result<GameState, RunError>) -> Self {
        match outcome {
            Ok(state) => match state.convergence() {
                Some(converged) => Self::Converged {
                    state: state.into(),
                    converged_at: converged.at,
                    convergence: converged.kind,
                },
                // Runner only returns Ok for converged runs.
                None => Self::Timeout {
                    state: state.into(),
                },
            },
            Err(RunError::Timeout { state }) => Self::Timeout {
                state: (*state).into(),
            },
            Err(RunError::Cancelled { generation }) => Self::Cancelled { generation },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ProtocolError> for ErrorResponse {
    fn from(err: &ProtocolError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Encodes either the response body or an [`ErrorResponse`] for a rejected request.
pub fn respond<T: Serialize>(outcome: Result<T>) -> serde_json::Result<String> {
    match outcome {
        Ok(body) => serde_json::to_string(&body),
        Err(err) => {
            log::warn!("Rejecting request: {}", err);
            serde_json::to_string(&ErrorResponse::from(&err))
        }
    }
}

pub fn handle_step(json: &str, limits: &Limits) -> serde_json::Result<String> {
    respond(
        serde_json::from_str::<StepRequest>(json)
            .map_err(ProtocolError::from)
            .and_then(|request| request.execute(limits)),
    )
}

pub fn handle_run(json: &str, limits: &Limits) -> serde_json::Result<String> {
    respond(
        serde_json::from_str::<RunRequest>(json)
            .map_err(ProtocolError::from)
            .and_then(|request| request.execute(limits)),
    )
}
