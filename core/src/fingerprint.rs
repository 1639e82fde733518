use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::*;

/// Exact, printable encoding of a grid's cells, used as a cycle-detection key.
///
/// Cells are packed one bit each in row-major order, most significant bit first,
/// and the bytes are base64 encoded. For a fixed board size the mapping is
/// injective. Boards of different sizes may share a fingerprint, so fingerprints
/// should only be compared within one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(grid: &Grid) -> Self {
        if grid.is_empty() {
            return Self::empty();
        }
        Self(STANDARD.encode(pack_cells(grid)))
    }

    /// Canonical fingerprint shared by every zero-sized grid.
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Reuses a previously stored fingerprint string.
    pub fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn fingerprint(grid: &Grid) -> Fingerprint {
    Fingerprint::of(grid)
}

/// Packs cells row-major, eight per byte, MSB first; the last byte is zero padded.
pub fn pack_cells(grid: &Grid) -> Vec<u8> {
    let total = grid.total_cells() as usize;
    let mut bytes = Vec::with_capacity(total.div_ceil(8));
    let mut current = 0u8;

    for (index, alive) in grid.iter().enumerate() {
        let bit = index % 8;
        if alive {
            current |= 0x80 >> bit;
        }
        if bit == 7 {
            bytes.push(current);
            current = 0;
        }
    }
    if total % 8 != 0 {
        bytes.push(current);
    }

    bytes
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn packs_msb_first_with_zero_padding() {
        let grid = Grid::parse("#..\n..#\n.##").unwrap();

        // #..|..#|.## -> 1000 0101 | 1000 0000
        assert_eq!(pack_cells(&grid), vec![0b1000_0101, 0b1000_0000]);
    }

    #[test]
    fn equal_grids_share_a_fingerprint() {
        let a = Grid::parse(".#.\n.#.\n.#.").unwrap();
        let b = Grid::from_live_cells((3, 3), &[(1, 0), (1, 1), (1, 2)]).unwrap();

        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn every_single_cell_flip_changes_the_fingerprint() {
        let base = Grid::parse("#.#.\n.##.\n#..#").unwrap();
        let reference = fingerprint(&base);

        for (x, y) in (0..3usize).flat_map(|y| (0..4usize).map(move |x| (x, y))) {
            let mut rows = base.rows();
            rows[y][x] = !rows[y][x];
            let flipped = Grid::from_rows(rows).unwrap();

            assert_ne!(fingerprint(&flipped), reference, "({x}, {y})");
        }
    }

    #[test]
    fn distinct_small_grids_never_collide() {
        // All 2^9 boards of size 3x3.
        let mut seen = hashbrown::HashSet::new();
        for bits in 0u16..512 {
            let rows = (0..3)
                .map(|y| (0..3).map(|x| bits & (1 << (y * 3 + x)) != 0).collect())
                .collect();
            let grid = Grid::from_rows(rows).unwrap();
            assert!(seen.insert(fingerprint(&grid)));
        }
    }

    #[test]
    fn empty_grids_map_to_the_canonical_fingerprint() {
        assert_eq!(fingerprint(&Grid::empty((0, 0))), Fingerprint::empty());
        assert_eq!(fingerprint(&Grid::empty((5, 0))), Fingerprint::empty());
        assert_eq!(Fingerprint::empty().as_str(), "");
    }

    #[test]
    fn encoding_is_printable_base64() {
        let grid = Grid::parse("########\n#.......").unwrap();

        assert_eq!(fingerprint(&grid).as_str(), "/4A=");
    }
}
