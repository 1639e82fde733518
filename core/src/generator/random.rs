use ndarray::Array2;

use super::*;

/// Resolution of the density threshold.
const DENSITY_SCALE: u32 = 1 << 20;

/// Fills each cell independently with probability `density`, reproducibly for a
/// given seed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
    density: f64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64, density: f64) -> Self {
        Self { seed, density }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, size: Coord2) -> Grid {
        use rand::prelude::*;

        let density = if self.density.is_nan() {
            log::warn!("Density is NaN, generating an empty grid");
            0.0
        } else if !(0.0..=1.0).contains(&self.density) {
            log::warn!("Density {} outside 0..=1, clamped", self.density);
            self.density.clamp(0.0, 1.0)
        } else {
            self.density
        };
        let threshold = (density * f64::from(DENSITY_SCALE)) as u32;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let cells = Array2::from_shape_fn(size.to_nd_index(), |_| {
            rng.random_range(0..DENSITY_SCALE) < threshold
        });

        Grid::from_trusted(cells)
    }
}
