use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;
use crate::error::{Result, ensure_nonzero, ensure_positive};

// Cellular noise: distance to the nearest feature point (F1).
// Feature points are drawn once from the seed and never move afterwards.
pub struct Voronoi2D {
    points: Vec<(f64, f64)>,
}

impl Voronoi2D {
    // count - number of feature points
    // extent - points are scattered inside [-extent, extent] on both axes
    pub fn new(seed: u64, count: usize, extent: f64) -> Result<Self> {
        let count = ensure_nonzero("voronoi point count", count)?;
        let extent = ensure_positive("voronoi extent", extent)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points = (0..count)
            .map(|_| {
                (
                    rng.random_range(-extent..extent),
                    rng.random_range(-extent..extent),
                )
            })
            .collect();
        Ok(Self { points })
    }

    // Use explicit feature points (must not be empty)
    pub fn from_points(points: Vec<(f64, f64)>) -> Result<Self> {
        ensure_nonzero("voronoi point count", points.len())?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

impl NoiseGenerator for Voronoi2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.points
            .iter()
            .map(|&(px, py)| (x - px).powi(2) + (y - py).powi(2))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}
