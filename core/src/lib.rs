// terrain-core holds the noise providers, heightfield meshes, basin carving,
// patch extraction and the terrain aggregate that ties them together
pub mod basin;
pub mod builder;
pub mod combinators;
pub mod config;
pub mod domain_warp;
pub mod error;
pub mod fbm2;
pub mod fractal2;
pub mod heightfield;
pub mod partial;
pub mod perlin2;
pub mod preview;
pub mod shapes;
pub mod terrain;
pub mod voronoi2;
pub mod water;

use std::sync::Arc;

pub use basin::{Basin, Falloff, apply_basins, basin_height};
pub use builder::{GeometryKind, NoiseParams, apply_noise, build_circular, build_rectangular};
pub use combinators::{Blend2D, OctaveCombine2D, Threshold2D, Turbulence2D};
pub use config::{NoiseConfig, TerrainConfig};
pub use domain_warp::DomainWarp2D;
pub use error::{Result, TerrainError};
pub use fbm2::{Fbm2D, OctaveParams, RidgedMultifractal2D};
pub use fractal2::DiamondSquare2D;
pub use heightfield::{Heightfield, MeshSurface};
pub use partial::extract;
pub use perlin2::Perlin2D;
pub use preview::render_preview;
pub use shapes::{Constant2D, FnNoise, RadialGradient2D, Ridge2D, Sine2D};
pub use terrain::{MaterialHandle, Patch, PatchRegion, Terrain, TerrainShape, TerrainState};
pub use voronoi2::Voronoi2D;
pub use water::{RippleParams, RippleSurface};

// A 2D height source sampled at (x, y).
// Terrain code calls it with the world X-Z plane, so `y` is world Z.
// Implementations must return the same value for the same input once constructed.
pub trait NoiseGenerator: Send + Sync {
    fn get2(&self, x: f64, y: f64) -> f64;
}

// Providers are shared by reference between terrains and combinators
pub type SharedNoise = Arc<dyn NoiseGenerator>;

impl<N: NoiseGenerator + ?Sized> NoiseGenerator for &N {
    fn get2(&self, x: f64, y: f64) -> f64 {
        (**self).get2(x, y)
    }
}

impl<N: NoiseGenerator + ?Sized> NoiseGenerator for Box<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        (**self).get2(x, y)
    }
}

impl<N: NoiseGenerator + ?Sized> NoiseGenerator for Arc<N> {
    fn get2(&self, x: f64, y: f64) -> f64 {
        (**self).get2(x, y)
    }
}
