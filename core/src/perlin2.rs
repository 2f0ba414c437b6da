use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;
use crate::error::{Result, ensure_positive};

// Single-octave 2D gradient noise.
// Octaves are layered on top by Fbm2D / RidgedMultifractal2D rather than here.
pub struct Perlin2D {
    frequency: f64,  // Input coordinates are multiplied by this before lookup
    perm: [u8; 512], // permutation table (256 duplicated)
}

impl Perlin2D {
    pub fn new(seed: u64, frequency: f64) -> Result<Self> {
        let frequency = ensure_positive("perlin frequency", frequency)?;

        let mut p: Vec<u8> = (0..=255).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        p.shuffle(&mut rng);

        // Duplicated so corner lookups never need a modulo
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }

        Ok(Self { frequency, perm })
    }

    // 6t^5 - 15t^4 + 10t^3, zero first and second derivative at both ends
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }

    // Picks one of 8 diagonal/axis gradients from the low bits of the hash
    #[inline]
    fn grad(hash: u8, x: f64, y: f64) -> f64 {
        let h = hash & 0x7;
        let (u, v) = if h < 4 { (x, y) } else { (y, x) };
        let u = if h & 1 == 0 { u } else { -u };
        let v = if h & 2 == 0 { v } else { -v };
        if h < 4 { u + v } else { u + 0.5 * v }
    }

    #[inline]
    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }

    // Raw noise at (x, y), roughly in [-1, 1]
    fn noise(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;
        let u = Self::fade(xf);
        let v = Self::fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let x1 = Self::lerp(Self::grad(aa, xf, yf), Self::grad(ba, xf - 1.0, yf), u);
        let x2 = Self::lerp(
            Self::grad(ab, xf, yf - 1.0),
            Self::grad(bb, xf - 1.0, yf - 1.0),
            u,
        );
        // The diagonal gradients can reach ~1.4 at cell centres
        Self::lerp(x1, x2, v) * std::f64::consts::FRAC_1_SQRT_2
    }
}

impl NoiseGenerator for Perlin2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.noise(x * self.frequency, y * self.frequency)
    }
}

#[cfg(test)]
mod tests {
    use crate::NoiseGenerator;

    use super::Perlin2D;

    #[test]
    fn perlin2_determinism() {
        let p1 = Perlin2D::new(1234, 0.25).unwrap();
        let p2 = Perlin2D::new(1234, 0.25).unwrap();
        // Same seed + params => same output
        assert_eq!(p1.get2(10.5, -3.7), p2.get2(10.5, -3.7));
    }

    #[test]
    fn perlin2_zero_on_lattice() {
        let p = Perlin2D::new(7, 1.0).unwrap();
        for &(x, y) in &[(0.0, 0.0), (3.0, -8.0), (200.0, 17.0)] {
            assert!(p.get2(x, y).abs() < 1e-12);
        }
    }

    #[test]
    fn perlin2_range() {
        let p = Perlin2D::new(0, 0.37).unwrap();
        for i in 0..400 {
            let x = i as f64 * 0.731 - 100.0;
            let y = i as f64 * -0.417 + 50.0;
            let v = p.get2(x, y);
            assert!(v.is_finite());
            assert!((-1.0..=1.0).contains(&v), "{v} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn perlin2_seeds_differ() {
        let a = Perlin2D::new(1, 0.1).unwrap();
        let b = Perlin2D::new(2, 0.1).unwrap();
        let differs = (0..50).any(|i| {
            let x = i as f64 * 1.37 + 0.5;
            (a.get2(x, x * 0.5) - b.get2(x, x * 0.5)).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn perlin2_rejects_zero_frequency() {
        assert!(Perlin2D::new(0, 0.0).is_err());
    }
}
