use alloc::boxed::Box;
use thiserror::Error;

use crate::{Generation, GameState};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LifeError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Grid dimensions exceed the supported maximum")]
    GridTooLarge,
    #[error("Neighbor count {0} is outside 0..=8")]
    NeighborCountOutOfRange(u8),
    #[error("Invalid rule string")]
    InvalidRuleString,
    #[error("Unknown rule preset")]
    UnknownPreset,
    #[error("Unexpected character {0:?} in pattern")]
    InvalidPatternChar(char),
}

pub type Result<T> = core::result::Result<T, LifeError>;

/// Non-converged endings of a budgeted simulation run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunError {
    /// The iteration budget ran out before the grid died out or repeated.
    #[error("No convergence within the iteration budget")]
    Timeout { state: Box<GameState> },
    #[error("Run cancelled at generation {generation}")]
    Cancelled { generation: Generation },
}

impl RunError {
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
