use crate::*;
pub use pattern::*;
pub use random::*;

mod pattern;
mod random;

/// Builds an initial grid of a given `(width, height)`.
pub trait GridGenerator {
    fn generate(self, size: Coord2) -> Grid;
}
