use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;
use crate::error::{Result, TerrainError, ensure_positive};

// Diamond–Square height grid on a torus.
// The grid is generated once in `new`; sampling only reads it.
pub struct DiamondSquare2D {
    size: usize, // must be 2^n + 1, e.g. 129, 257
    grid: Vec<f64>,
}

impl DiamondSquare2D {
    // roughness - multiplier applied to the random offset after every level
    // (values below 1.0 smooth out the finer levels)
    pub fn new(size: usize, seed: u64, roughness: f64) -> Result<Self> {
        if size < 3 || !(size - 1).is_power_of_two() {
            return Err(TerrainError::InvalidGridSize(size));
        }
        let roughness = ensure_positive("diamond-square roughness", roughness)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut field = Self {
            size,
            grid: vec![0.0; size * size],
        };

        // The torus repeats every `last` cells: row/column `last` mirror row/column 0,
        // so all four corners are the same sample
        let last = size - 1;
        let corner = rng.random_range(-1.0..1.0);
        field.set(0, 0, corner);

        let mut step = last;
        let mut offset = 1.0;

        while step > 1 {
            let half = step / 2;
            let (s, h) = (step as i64, half as i64);

            // Diamond step: centre of each square gets the corner average
            for y in (0..last).step_by(step) {
                for x in (0..last).step_by(step) {
                    let (xi, yi) = (x as i64, y as i64);
                    let avg = (field.wrapped(xi, yi)
                        + field.wrapped(xi + s, yi)
                        + field.wrapped(xi, yi + s)
                        + field.wrapped(xi + s, yi + s))
                        * 0.25;
                    let v = avg + rng.random_range(-1.0..1.0) * offset;
                    field.set(x + half, y + half, v);
                }
            }

            // Square step: edge midpoints average their four diamond neighbours,
            // wrapping across the border onto the opposite edge's centres
            for y in (0..last).step_by(half) {
                let start = if (y / half) % 2 == 0 { half } else { 0 };
                for x in (start..last).step_by(step) {
                    let (xi, yi) = (x as i64, y as i64);
                    let avg = (field.wrapped(xi - h, yi)
                        + field.wrapped(xi + h, yi)
                        + field.wrapped(xi, yi - h)
                        + field.wrapped(xi, yi + h))
                        * 0.25;
                    let v = avg + rng.random_range(-1.0..1.0) * offset;
                    field.set(x, y, v);
                }
            }

            step = half;
            offset *= roughness;
        }

        for j in 0..last {
            let left = field.get(0, j);
            field.set(last, j, left);
        }
        for i in 0..size {
            let top = field.get(i, 0);
            field.set(i, last, top);
        }

        Ok(field)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> f64 {
        self.grid[y * self.size + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, v: f64) {
        self.grid[y * self.size + x] = v;
    }

    // Lookup on the torus of period `size - 1`
    #[inline]
    fn wrapped(&self, x: i64, y: i64) -> f64 {
        let n = self.size as i64 - 1;
        self.get(x.rem_euclid(n) as usize, y.rem_euclid(n) as usize)
    }

    // Row-major copy of the generated grid
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }
}

impl NoiseGenerator for DiamondSquare2D {
    // Nearest grid cell at the floored coordinate, wrapped with period `size - 1`
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.wrapped(x.floor() as i64, y.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::DiamondSquare2D;
    use crate::NoiseGenerator;

    #[test]
    fn fractal2_dimensions() {
        let f = DiamondSquare2D::new(129, 0, 0.5).unwrap();
        assert_eq!(f.size(), 129);
        assert_eq!(f.grid().len(), 129 * 129);
    }

    #[test]
    fn fractal2_determinism() {
        let f1 = DiamondSquare2D::new(65, 42, 0.8).unwrap();
        let f2 = DiamondSquare2D::new(65, 42, 0.8).unwrap();
        assert_eq!(f1.grid(), f2.grid());
    }

    #[test]
    fn fractal2_value_range() {
        let f = DiamondSquare2D::new(33, 7, 0.5).unwrap();
        // corners in [-1, 1], each level adds at most 0.5x the previous offset
        for &v in f.grid() {
            assert!((-3.0..=3.0).contains(&v), "value {} out of expected range", v);
        }
    }

    #[test]
    fn fractal2_sampling_wraps() {
        let f = DiamondSquare2D::new(17, 3, 0.6).unwrap();
        assert_eq!(f.get2(2.7, 5.1), f.get2(2.0, 5.0));
        assert_eq!(f.get2(-1.0, 0.0), f.get2(15.0, 0.0));
        assert_eq!(f.get2(16.0, 3.0), f.get2(0.0, 3.0));
        assert_eq!(f.get2(16.0 + 4.0, 32.0 + 2.0), f.get2(4.0, 2.0));
        assert!(f.get2(-1e9, 1e9).is_finite());
    }

    #[test]
    fn fractal2_rejects_bad_size() {
        assert!(DiamondSquare2D::new(64, 0, 0.5).is_err());
        assert!(DiamondSquare2D::new(1, 0, 0.5).is_err());
        assert!(DiamondSquare2D::new(33, 0, 0.0).is_err());
    }

    #[test]
    fn fractal2_edges_repeat() {
        let f = DiamondSquare2D::new(33, 11, 0.7).unwrap();
        let g = f.grid();
        for i in 0..33 {
            assert_eq!(g[32 * 33 + i], g[i]);
            assert_eq!(g[i * 33 + 32], g[i * 33]);
        }
    }

    #[test]
    fn fractal2_square_step_uses_diamond_centres() {
        // Replay the draws for the smallest grid: one corner, one centre, two edges
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut draw = || -> f64 { rng.random_range(-1.0..1.0) };
        let corner = draw();
        let centre = (corner + corner + corner + corner) * 0.25 + draw() * 1.0;
        let top = (corner + corner + centre + centre) * 0.25 + draw() * 1.0;
        let left = (centre + centre + corner + corner) * 0.25 + draw() * 1.0;

        let f = DiamondSquare2D::new(3, 9, 0.5).unwrap();
        let g = f.grid();
        assert_eq!(g[4], centre);
        assert_eq!(g[1], top);
        assert_eq!(g[3], left);
        assert_eq!(g[7], top);
        assert_eq!(g[5], left);
        assert_eq!(g[8], corner);
    }
}
