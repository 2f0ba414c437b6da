//! Terrain descriptions as data: RON files and named presets.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::basin::{Basin, Falloff};
use crate::builder::NoiseParams;
use crate::combinators::{Blend2D, OctaveCombine2D, Threshold2D, Turbulence2D};
use crate::domain_warp::DomainWarp2D;
use crate::error::{Result, TerrainError};
use crate::fbm2::{Fbm2D, OctaveParams, RidgedMultifractal2D};
use crate::fractal2::DiamondSquare2D;
use crate::perlin2::Perlin2D;
use crate::shapes::{Constant2D, RadialGradient2D, Ridge2D, Sine2D};
use crate::terrain::{MaterialHandle, PatchRegion, Terrain, TerrainShape};
use crate::voronoi2::Voronoi2D;
use crate::{NoiseGenerator, SharedNoise};

/// Serializable description of a provider tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NoiseConfig {
    Constant {
        value: f64,
    },
    Sine {
        seed: u64,
        frequency: f64,
    },
    Radial {
        center: (f64, f64),
        max_radius: f64,
        peak: f64,
    },
    Ridge {
        center: (f64, f64),
        frequency: f64,
        ridge_height: f64,
    },
    Perlin {
        seed: u64,
        frequency: f64,
    },
    Voronoi {
        seed: u64,
        count: usize,
        extent: f64,
    },
    DiamondSquare {
        seed: u64,
        size: usize,
        roughness: f64,
    },
    Fbm {
        base: Box<NoiseConfig>,
        #[serde(default)]
        octaves: OctaveParams,
    },
    Ridged {
        base: Box<NoiseConfig>,
        #[serde(default)]
        octaves: OctaveParams,
    },
    Turbulence {
        base: Box<NoiseConfig>,
        #[serde(default)]
        octaves: OctaveParams,
    },
    Warp {
        base: Box<NoiseConfig>,
        warp: Box<NoiseConfig>,
        strength: f64,
    },
    Blend {
        a: Box<NoiseConfig>,
        b: Box<NoiseConfig>,
        weight: f64,
    },
    OctaveCombine {
        low: Box<NoiseConfig>,
        high: Box<NoiseConfig>,
        frequency: f64,
        amplitude: f64,
    },
    Threshold {
        base: Box<NoiseConfig>,
        threshold: f64,
        floor: f64,
    },
}

fn shared<N: NoiseGenerator + 'static>(noise: N) -> SharedNoise {
    Arc::new(noise)
}

impl NoiseConfig {
    /// Instantiate the provider tree. Seeded providers are generated here, once.
    pub fn build(&self) -> Result<SharedNoise> {
        Ok(match self {
            NoiseConfig::Constant { value } => shared(Constant2D(*value)),
            NoiseConfig::Sine { seed, frequency } => shared(Sine2D::new(*seed, *frequency)?),
            NoiseConfig::Radial {
                center,
                max_radius,
                peak,
            } => shared(RadialGradient2D::new(*center, *max_radius, *peak)?),
            NoiseConfig::Ridge {
                center,
                frequency,
                ridge_height,
            } => shared(Ridge2D::new(*center, *frequency, *ridge_height)?),
            NoiseConfig::Perlin { seed, frequency } => shared(Perlin2D::new(*seed, *frequency)?),
            NoiseConfig::Voronoi {
                seed,
                count,
                extent,
            } => shared(Voronoi2D::new(*seed, *count, *extent)?),
            NoiseConfig::DiamondSquare {
                seed,
                size,
                roughness,
            } => shared(DiamondSquare2D::new(*size, *seed, *roughness)?),
            NoiseConfig::Fbm { base, octaves } => shared(Fbm2D::new(base.build()?, *octaves)?),
            NoiseConfig::Ridged { base, octaves } => {
                shared(RidgedMultifractal2D::new(base.build()?, *octaves)?)
            }
            NoiseConfig::Turbulence { base, octaves } => {
                shared(Turbulence2D::new(base.build()?, *octaves)?)
            }
            NoiseConfig::Warp {
                base,
                warp,
                strength,
            } => shared(DomainWarp2D::new(base.build()?, warp.build()?, *strength)),
            NoiseConfig::Blend { a, b, weight } => {
                shared(Blend2D::new(a.build()?, b.build()?, *weight))
            }
            NoiseConfig::OctaveCombine {
                low,
                high,
                frequency,
                amplitude,
            } => shared(OctaveCombine2D::new(
                low.build()?,
                high.build()?,
                *frequency,
                *amplitude,
            )?),
            NoiseConfig::Threshold {
                base,
                threshold,
                floor,
            } => shared(Threshold2D::new(base.build()?, *threshold, *floor)),
        })
    }
}

/// Everything needed to build a [`Terrain`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub shape: TerrainShape,
    pub noise: NoiseConfig,
    #[serde(default)]
    pub params: NoiseParams,
    #[serde(default)]
    pub material: MaterialHandle,
    #[serde(default)]
    pub basins: Vec<Basin>,
    #[serde(default)]
    pub patches: Vec<PatchRegion>,
}

/// Names accepted by [`TerrainConfig::preset`].
pub const PRESETS: &[&str] = &["flat", "hills", "island", "crater_lake"];

impl TerrainConfig {
    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        let config = match name {
            "flat" => Self {
                shape: TerrainShape::Rectangular {
                    width: 100.0,
                    height: 100.0,
                    width_segments: 32,
                    height_segments: 32,
                },
                noise: NoiseConfig::Constant { value: 0.0 },
                params: NoiseParams::default(),
                material: MaterialHandle::default(),
                basins: Vec::new(),
                patches: Vec::new(),
            },
            "hills" => Self {
                shape: TerrainShape::Rectangular {
                    width: 200.0,
                    height: 200.0,
                    width_segments: 64,
                    height_segments: 64,
                },
                noise: NoiseConfig::Fbm {
                    base: Box::new(NoiseConfig::Perlin {
                        seed: 2025,
                        frequency: 1.0,
                    }),
                    octaves: OctaveParams {
                        octaves: 5,
                        ..Default::default()
                    },
                },
                params: NoiseParams {
                    scale: 60.0,
                    height_factor: 12.0,
                    base_height: 0.0,
                },
                material: MaterialHandle::default(),
                basins: Vec::new(),
                patches: Vec::new(),
            },
            "island" => Self {
                shape: TerrainShape::Circular {
                    radius: 80.0,
                    segments: 96,
                },
                noise: NoiseConfig::Blend {
                    a: Box::new(NoiseConfig::Radial {
                        center: (0.0, 0.0),
                        max_radius: 1.0,
                        peak: 1.0,
                    }),
                    b: Box::new(NoiseConfig::Ridged {
                        base: Box::new(NoiseConfig::Perlin {
                            seed: 7,
                            frequency: 3.0,
                        }),
                        octaves: OctaveParams::default(),
                    }),
                    weight: 0.3,
                },
                params: NoiseParams {
                    scale: 80.0,
                    height_factor: 20.0,
                    base_height: -1.0,
                },
                material: MaterialHandle::default(),
                basins: Vec::new(),
                patches: vec![
                    PatchRegion::new(Vec2::ZERO, 20.0, MaterialHandle(1)).with_smoothing(2.0),
                ],
            },
            "crater_lake" => Self {
                shape: TerrainShape::Circular {
                    radius: 60.0,
                    segments: 80,
                },
                noise: NoiseConfig::Turbulence {
                    base: Box::new(NoiseConfig::Perlin {
                        seed: 11,
                        frequency: 1.0,
                    }),
                    octaves: OctaveParams {
                        octaves: 3,
                        ..Default::default()
                    },
                },
                params: NoiseParams {
                    scale: 30.0,
                    height_factor: 8.0,
                    base_height: 2.0,
                },
                material: MaterialHandle::default(),
                basins: vec![
                    Basin {
                        center: Vec2::ZERO,
                        radius: 30.0,
                        depth: 6.0,
                        falloff: Falloff::Smooth,
                    },
                    Basin {
                        center: Vec2::new(18.0, -6.0),
                        radius: 12.0,
                        depth: 9.0,
                        falloff: Falloff::Linear,
                    },
                ],
                patches: vec![
                    PatchRegion::new(Vec2::ZERO, 24.0, MaterialHandle(2)).with_smoothing(3.0),
                ],
            },
            other => return Err(TerrainError::UnknownPreset(other.to_string())),
        };
        Ok(config)
    }

    pub fn from_ron_str(contents: &str) -> Result<Self> {
        ron::from_str(contents).map_err(TerrainError::ParseError)
    }

    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, pretty).map_err(TerrainError::SerializeError)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(TerrainError::ReadError)?;
        let config = Self::from_ron_str(&contents)?;
        info!("loaded terrain config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(TerrainError::WriteError)?;
        }
        std::fs::write(path, self.to_ron_string()?).map_err(TerrainError::WriteError)
    }

    pub fn build(&self) -> Result<Terrain> {
        Terrain::with_features(
            self.shape,
            self.noise.build()?,
            self.params,
            self.material,
            self.basins.clone(),
            self.patches.clone(),
        )
    }
}

impl Terrain {
    pub fn from_config(config: &TerrainConfig) -> Result<Self> {
        config.build()
    }
}
