use crate::NoiseGenerator;

// Offset the lookup into `base` by the output of `warp`.
// The second warp lookup is shifted so the x and y displacements are uncorrelated.
pub struct DomainWarp2D<B, W> {
    pub base: B,
    pub warp: W,
    pub warp_strength: f64,
}

const WARP_DECORRELATE: f64 = 5.2;

impl<B, W> DomainWarp2D<B, W> {
    pub fn new(base: B, warp: W, warp_strength: f64) -> Self {
        Self {
            base,
            warp,
            warp_strength,
        }
    }
}

impl<B: NoiseGenerator, W: NoiseGenerator> NoiseGenerator for DomainWarp2D<B, W> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        let dx = self.warp.get2(x, y);
        let dy = self.warp.get2(x + WARP_DECORRELATE, y + WARP_DECORRELATE);
        self.base
            .get2(x + dx * self.warp_strength, y + dy * self.warp_strength)
    }
}
