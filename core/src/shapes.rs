//! Closed-form height shapes: constants, sine products, radial gradients and ridges.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::NoiseGenerator;
use crate::error::{Result, ensure_positive};

/// Returns the same value everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Constant2D(pub f64);

impl NoiseGenerator for Constant2D {
    fn get2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }
}

/// Adapts a plain function or closure into a provider.
pub struct FnNoise<F>(pub F);

impl<F> NoiseGenerator for FnNoise<F>
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn get2(&self, x: f64, y: f64) -> f64 {
        (self.0)(x, y)
    }
}

/// `sin((x + sx) * f) * cos((y + sy) * f)` with offsets fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Sine2D {
    frequency: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Sine2D {
    /// Draws the phase offsets from `seed`.
    pub fn new(seed: u64, frequency: f64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let offset_x = rng.random_range(0.0..100.0);
        let offset_y = rng.random_range(0.0..100.0);
        Self::with_offsets(frequency, offset_x, offset_y)
    }

    pub fn with_offsets(frequency: f64, offset_x: f64, offset_y: f64) -> Result<Self> {
        Ok(Self {
            frequency: ensure_positive("sine frequency", frequency)?,
            offset_x,
            offset_y,
        })
    }

    pub fn offsets(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }
}

impl NoiseGenerator for Sine2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        ((x + self.offset_x) * self.frequency).sin() * ((y + self.offset_y) * self.frequency).cos()
    }
}

/// Cone falling linearly from `peak` at the center to zero at `max_radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient2D {
    center: (f64, f64),
    max_radius: f64,
    peak: f64,
}

impl RadialGradient2D {
    pub fn new(center: (f64, f64), max_radius: f64, peak: f64) -> Result<Self> {
        Ok(Self {
            center,
            max_radius: ensure_positive("gradient max radius", max_radius)?,
            peak,
        })
    }
}

impl NoiseGenerator for RadialGradient2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let d = (x - self.center.0).hypot(y - self.center.1);
        self.peak * (1.0 - d / self.max_radius).max(0.0)
    }
}

/// Concentric ridges: `|sin(d * frequency)| * ridge_height`.
///
/// Never negative; the sharp creases sit where the sine crosses zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Ridge2D {
    center: (f64, f64),
    frequency: f64,
    ridge_height: f64,
}

impl Ridge2D {
    pub fn new(center: (f64, f64), frequency: f64, ridge_height: f64) -> Result<Self> {
        Ok(Self {
            center,
            frequency: ensure_positive("ridge frequency", frequency)?,
            ridge_height,
        })
    }
}

impl NoiseGenerator for Ridge2D {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let d = (x - self.center.0).hypot(y - self.center.1);
        (d * self.frequency).sin().abs() * self.ridge_height
    }
}
