use alloc::string::String;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::*;

/// Well-known small patterns, as live-cell offsets from their top-left corner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    Block,
    Beehive,
    Blinker,
    Toad,
    Beacon,
    Glider,
    LightweightSpaceship,
}

impl Pattern {
    pub const ALL: [Pattern; 7] = [
        Self::Block,
        Self::Beehive,
        Self::Blinker,
        Self::Toad,
        Self::Beacon,
        Self::Glider,
        Self::LightweightSpaceship,
    ];

    pub const fn cells(self) -> &'static [Coord2] {
        match self {
            Self::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::Beehive => &[(1, 0), (2, 0), (0, 1), (3, 1), (1, 2), (2, 2)],
            Self::Blinker => &[(0, 0), (1, 0), (2, 0)],
            Self::Toad => &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
            Self::Beacon => &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
            Self::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Self::LightweightSpaceship => &[
                (1, 0),
                (4, 0),
                (0, 1),
                (0, 2),
                (4, 2),
                (0, 3),
                (1, 3),
                (2, 3),
                (3, 3),
            ],
        }
    }

    /// Bounding box `(width, height)`.
    pub fn size(self) -> Coord2 {
        self.cells()
            .iter()
            .fold((0, 0), |(w, h), &(x, y)| (w.max(x + 1), h.max(y + 1)))
    }

    /// Smallest grid holding the pattern.
    pub fn grid(self) -> Grid {
        PatternGenerator::new(self, (0, 0)).generate(self.size())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Beehive => "beehive",
            Self::Blinker => "blinker",
            Self::Toad => "toad",
            Self::Beacon => "beacon",
            Self::Glider => "glider",
            Self::LightweightSpaceship => "lwss",
        }
    }
}

impl FromStr for Pattern {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "lightweightspaceship" => Ok(Self::LightweightSpaceship),
            name => Self::ALL
                .into_iter()
                .find(|pattern| pattern.name() == name)
                .ok_or(LifeError::UnknownPreset),
        }
    }
}

/// Places a [`Pattern`] with its top-left corner at `origin` on an empty grid.
///
/// Cells falling outside the grid are dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PatternGenerator {
    pattern: Pattern,
    origin: Coord2,
}

impl PatternGenerator {
    pub fn new(pattern: Pattern, origin: Coord2) -> Self {
        Self { pattern, origin }
    }

    /// Centers the pattern on a grid of `size`.
    pub fn centered(pattern: Pattern, size: Coord2) -> Self {
        let (width, height) = pattern.size();
        let origin = (
            size.0.saturating_sub(width) / 2,
            size.1.saturating_sub(height) / 2,
        );
        Self::new(pattern, origin)
    }
}

impl GridGenerator for PatternGenerator {
    fn generate(self, size: Coord2) -> Grid {
        let (origin_x, origin_y) = self.origin;
        let mut cells = ndarray::Array2::default(size.to_nd_index());
        let mut truncated = 0;

        for &(dx, dy) in self.pattern.cells() {
            match (origin_x.checked_add(dx), origin_y.checked_add(dy)) {
                (Some(x), Some(y)) if x < size.0 && y < size.1 => {
                    cells[(x, y).to_nd_index()] = true;
                }
                _ => truncated += 1,
            }
        }

        if truncated > 0 {
            log::warn!(
                "{} of {} cells of {:?} fall outside a {:?} grid, dropped",
                truncated,
                self.pattern.cells().len(),
                self.pattern,
                size
            );
        }

        Grid::from_trusted(cells)
    }
}
