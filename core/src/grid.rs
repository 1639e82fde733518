use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular board of live/dead cells.
///
/// A grid is a value: every transition produces a new one. Shape is validated once
/// at construction, everything downstream relies on it being rectangular and no
/// wider or taller than [`Coord::MAX`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Grid {
    cells: Array2<bool>,
}

impl Grid {
    /// All-dead grid of the given `(width, height)`.
    pub fn empty((width, height): Coord2) -> Self {
        Self {
            cells: Array2::default([usize::from(height), usize::from(width)]),
        }
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(LifeError::RaggedRows {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }
        check_dimensions(width, height)?;

        Ok(Self {
            cells: Array2::from_shape_fn([height, width], |(y, x)| rows[y][x]),
        })
    }

    /// Wraps an existing `[height, width]` array.
    pub fn from_array(cells: Array2<bool>) -> Result<Self> {
        let (height, width) = cells.dim();
        check_dimensions(width, height)?;
        Ok(Self { cells })
    }

    /// For arrays produced by the engine from an already validated grid.
    pub(crate) fn from_trusted(cells: Array2<bool>) -> Self {
        Self { cells }
    }

    pub fn from_live_cells(size: Coord2, live_cells: &[Coord2]) -> Result<Self> {
        let mut grid = Self::empty(size);

        for &coords in live_cells {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(LifeError::InvalidCoords);
            }
            grid.cells[coords.to_nd_index()] = true;
        }

        Ok(grid)
    }

    /// Parses a plaintext pattern, one row per line.
    ///
    /// `#`, `O`, `*` and `1` are alive, `.`, `0` and spaces are dead. Lines starting
    /// with `!` are comments. Rows shorter than the widest one are padded with dead
    /// cells, and blank lines before the first and after the last row are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().filter(|line| !line.starts_with('!')).collect();
        let first = lines.iter().position(|line| !line.trim().is_empty());
        let last = lines.iter().rposition(|line| !line.trim().is_empty());
        let lines = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => &[][..],
        };

        let mut rows = Vec::with_capacity(lines.len());
        for line in lines {
            let row = line
                .chars()
                .map(|c| match c {
                    '#' | 'O' | '*' | '1' => Ok(true),
                    '.' | '0' | ' ' => Ok(false),
                    other => Err(LifeError::InvalidPatternChar(other)),
                })
                .collect::<Result<Vec<bool>>>()?;
            rows.push(row);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, false);
        }
        Self::from_rows(rows)
    }

    pub fn width(&self) -> Coord {
        // Bounded by `check_dimensions` at construction.
        self.cells.ncols() as Coord
    }

    pub fn height(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    /// `(width, height)`.
    pub fn size(&self) -> Coord2 {
        (self.width(), self.height())
    }

    /// True for a board with no cells at all, not for an all-dead board.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.width(), self.height())
    }

    pub fn get(&self, coords: Coord2) -> Option<bool> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    pub fn is_alive(&self, coords: Coord2) -> bool {
        self.get(coords).unwrap_or(false)
    }

    pub fn population(&self) -> CellCount {
        // At most `Coord::MAX²` cells, which fits in `CellCount`.
        self.cells.iter().filter(|&&alive| alive).count() as CellCount
    }

    pub fn live_neighbor_count(&self, coords: Coord2) -> u8 {
        self.cells
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    /// Live cells in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|&(_, &alive)| alive)
            .map(|((y, x), _)| (x as Coord, y as Coord))
    }

    /// Cells in row-major order, independent of the underlying memory layout.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.cells.iter().copied()
    }

    pub fn rows(&self) -> Vec<Vec<bool>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    pub fn cells(&self) -> &Array2<bool> {
        &self.cells
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    let max = usize::from(Coord::MAX);
    if width > max || height > max {
        Err(LifeError::GridTooLarge)
    } else {
        Ok(())
    }
}

impl Index<Coord2> for Grid {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl TryFrom<Vec<Vec<bool>>> for Grid {
    type Error = LifeError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<bool>> {
    fn from(grid: Grid) -> Self {
        grid.rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for &alive in row {
                f.write_str(if alive { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
