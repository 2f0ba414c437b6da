//! Fractal sums over a base provider: plain fBm and ridged multifractal.
//!
//! Both accumulate every octave first, divide by the accumulated amplitude once
//! at the end, then apply the output `amplitude`.

use serde::{Deserialize, Serialize};

use crate::NoiseGenerator;
use crate::error::{Result, ensure_nonzero, ensure_positive};

/// Octave layout shared by the fractal combinators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctaveParams {
    /// Number of octaves to sum.
    pub octaves: usize,
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Output scale applied after normalization.
    pub amplitude: f64,
}

impl Default for OctaveParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
            amplitude: 1.0,
        }
    }
}

impl OctaveParams {
    pub fn validate(self) -> Result<Self> {
        ensure_nonzero("octaves", self.octaves)?;
        ensure_positive("frequency", self.frequency)?;
        ensure_positive("lacunarity", self.lacunarity)?;
        ensure_positive("persistence", self.persistence)?;
        Ok(self)
    }

    // Sums `octave(sample)` over all octaves and normalizes by total amplitude
    #[inline]
    pub(crate) fn accumulate<N, F>(&self, base: &N, x: f64, y: f64, octave: F) -> f64
    where
        N: NoiseGenerator + ?Sized,
        F: Fn(f64) -> f64,
    {
        let mut amplitude = 1.0;
        let mut freq = self.frequency;
        let mut total = 0.0;
        let mut max_amp = 0.0;

        for _ in 0..self.octaves {
            total += octave(base.get2(x * freq, y * freq)) * amplitude;
            max_amp += amplitude;
            amplitude *= self.persistence;
            freq *= self.lacunarity;
        }

        total / max_amp * self.amplitude
    }
}

/// Fractional Brownian motion over `base`.
pub struct Fbm2D<N> {
    base: N,
    params: OctaveParams,
}

impl<N: NoiseGenerator> Fbm2D<N> {
    pub fn new(base: N, params: OctaveParams) -> Result<Self> {
        Ok(Self {
            base,
            params: params.validate()?,
        })
    }

    pub fn params(&self) -> &OctaveParams {
        &self.params
    }
}

impl<N: NoiseGenerator> NoiseGenerator for Fbm2D<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.params.accumulate(&self.base, x, y, |s| s)
    }
}

/// Ridged multifractal: each octave is folded to `(1 - |s|)^2` before summing,
/// which turns zero crossings of the base into sharp peaks.
pub struct RidgedMultifractal2D<N> {
    base: N,
    params: OctaveParams,
}

impl<N: NoiseGenerator> RidgedMultifractal2D<N> {
    pub fn new(base: N, params: OctaveParams) -> Result<Self> {
        Ok(Self {
            base,
            params: params.validate()?,
        })
    }
}

impl<N: NoiseGenerator> NoiseGenerator for RidgedMultifractal2D<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.params.accumulate(&self.base, x, y, |s| {
            let r = 1.0 - s.abs();
            r * r
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Constant2D, Perlin2D, shapes::FnNoise};

    #[test]
    fn fbm_of_constant_is_constant() {
        let f = Fbm2D::new(Constant2D(0.25), OctaveParams::default()).unwrap();
        assert!((f.get2(3.0, 4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn fbm_applies_amplitude_after_normalizing() {
        let params = OctaveParams {
            octaves: 3,
            amplitude: 10.0,
            ..Default::default()
        };
        let f = Fbm2D::new(Constant2D(1.0), params).unwrap();
        assert!((f.get2(0.0, 0.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn fbm_octave_frequencies() {
        // base returns its x input, so the sum exposes the per-octave frequency
        let params = OctaveParams {
            octaves: 2,
            frequency: 1.0,
            lacunarity: 3.0,
            persistence: 0.5,
            amplitude: 1.0,
        };
        let f = Fbm2D::new(FnNoise(|x: f64, _y: f64| x), params).unwrap();
        // (1*1 + 3*0.5) / 1.5
        assert!((f.get2(1.0, 0.0) - 2.5 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn ridged_folds_each_octave() {
        let params = OctaveParams {
            octaves: 3,
            ..Default::default()
        };
        // |s| = 0.5 -> (1 - 0.5)^2 = 0.25 in every octave
        let r = RidgedMultifractal2D::new(Constant2D(-0.5), params).unwrap();
        assert!((r.get2(1.0, 1.0) - 0.25).abs() < 1e-12);
        let peak = RidgedMultifractal2D::new(Constant2D(0.0), params).unwrap();
        assert!((peak.get2(1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ridged_stays_in_unit_range_over_perlin() {
        let base = Perlin2D::new(3, 0.05).unwrap();
        let r = RidgedMultifractal2D::new(base, OctaveParams::default()).unwrap();
        for i in 0..200 {
            let v = r.get2(i as f64 * 1.3, i as f64 * -0.7);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn zero_octaves_rejected() {
        let params = OctaveParams {
            octaves: 0,
            ..Default::default()
        };
        assert!(Fbm2D::new(Constant2D(0.0), params).is_err());
    }
}
