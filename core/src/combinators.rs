//! Provider combinators. Each one only holds values fixed at construction, so
//! the result is as deterministic as its inputs.

use crate::NoiseGenerator;
use crate::error::{Result, ensure_positive};
use crate::fbm2::OctaveParams;

/// Sum of `|s|` over octaves, normalized like [`crate::Fbm2D`].
pub struct Turbulence2D<N> {
    base: N,
    params: OctaveParams,
}

impl<N: NoiseGenerator> Turbulence2D<N> {
    pub fn new(base: N, params: OctaveParams) -> Result<Self> {
        Ok(Self {
            base,
            params: params.validate()?,
        })
    }
}

impl<N: NoiseGenerator> NoiseGenerator for Turbulence2D<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        self.params.accumulate(&self.base, x, y, f64::abs)
    }
}

/// Linear mix `a * (1 - weight) + b * weight`.
pub struct Blend2D<A, B> {
    a: A,
    b: B,
    weight: f64,
}

impl<A, B> Blend2D<A, B> {
    pub fn new(a: A, b: B, weight: f64) -> Self {
        Self { a, b, weight }
    }
}

impl<A: NoiseGenerator, B: NoiseGenerator> NoiseGenerator for Blend2D<A, B> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let a = self.a.get2(x, y);
        let b = self.b.get2(x, y);
        a + (b - a) * self.weight
    }
}

/// Adds a detail layer on top of a broad layer: `low(x, y) + high(x*f, y*f) * amp`.
pub struct OctaveCombine2D<A, B> {
    low: A,
    high: B,
    high_frequency: f64,
    high_amplitude: f64,
}

impl<A, B> OctaveCombine2D<A, B> {
    pub fn new(low: A, high: B, high_frequency: f64, high_amplitude: f64) -> Result<Self> {
        Ok(Self {
            low,
            high,
            high_frequency: ensure_positive("detail frequency", high_frequency)?,
            high_amplitude,
        })
    }
}

impl<A: NoiseGenerator, B: NoiseGenerator> NoiseGenerator for OctaveCombine2D<A, B> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let f = self.high_frequency;
        self.low.get2(x, y) + self.high.get2(x * f, y * f) * self.high_amplitude
    }
}

/// Flattens everything below `threshold` to `floor`; values at or above pass through.
pub struct Threshold2D<N> {
    base: N,
    threshold: f64,
    floor: f64,
}

impl<N> Threshold2D<N> {
    pub fn new(base: N, threshold: f64, floor: f64) -> Self {
        Self {
            base,
            threshold,
            floor,
        }
    }
}

impl<N: NoiseGenerator> NoiseGenerator for Threshold2D<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let v = self.base.get2(x, y);
        if v < self.threshold { self.floor } else { v }
    }
}
