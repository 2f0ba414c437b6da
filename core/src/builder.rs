use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::NoiseGenerator;
use crate::error::{Result, TerrainError, ensure_nonzero, ensure_positive};
use crate::heightfield::Heightfield;

// Lattice points this close to the rim (relative to r^2) still count as inside,
// otherwise rounding in `-r + i * step` drops points that sit exactly on the circle
pub(crate) const RIM_TOLERANCE: f64 = 1e-6;

// How raw noise samples become vertex heights
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub scale: f64,         // world coordinates are divided by this before sampling
    pub height_factor: f64, // raw sample multiplier
    pub base_height: f64,   // additive floor
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            height_factor: 1.0,
            base_height: 0.0,
        }
    }
}

impl NoiseParams {
    pub fn validate(self) -> Result<Self> {
        ensure_positive("noise scale", self.scale)?;
        Ok(self)
    }

    // Height at a world (x, z); vertices and point queries both go through here
    #[inline]
    pub fn height<N: NoiseGenerator + ?Sized>(&self, noise: &N, x: f64, z: f64) -> f32 {
        let sample = noise.get2(x / self.scale, z / self.scale);
        (self.base_height + sample * self.height_factor) as f32
    }
}

// Topology families a terrain can be built on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Rectangular,
    Circular,
}

impl GeometryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Rectangular => "rectangular",
            GeometryKind::Circular => "circular",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = TerrainError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "rectangular" | "plane" => Ok(GeometryKind::Rectangular),
            "circular" | "disc" => Ok(GeometryKind::Circular),
            other => Err(TerrainError::UnknownGeometry(other.to_string())),
        }
    }
}

// Flat grid in the X-Z plane centred on the origin, y = 0.
// (width_segments + 1) * (height_segments + 1) vertices, row-major along x,
// two triangles per quad wound counter-clockwise seen from +Y.
pub fn build_rectangular(
    width: f64,
    height: f64,
    width_segments: usize,
    height_segments: usize,
) -> Result<Heightfield> {
    let width = ensure_positive("width", width)?;
    let height = ensure_positive("height", height)?;
    let ws = ensure_nonzero("width segments", width_segments)?;
    let hs = ensure_nonzero("height segments", height_segments)?;

    let row = ws + 1;
    let mut positions = Vec::with_capacity(row * (hs + 1));
    let mut uvs = Vec::with_capacity(row * (hs + 1));

    for iz in 0..=hs {
        let v = iz as f64 / hs as f64;
        let z = -height / 2.0 + v * height;
        for ix in 0..=ws {
            let u = ix as f64 / ws as f64;
            let x = -width / 2.0 + u * width;
            positions.push(Vec3::new(x as f32, 0.0, z as f32));
            uvs.push(Vec2::new(u as f32, v as f32));
        }
    }

    let mut indices = Vec::with_capacity(ws * hs * 6);
    for iz in 0..hs {
        for ix in 0..ws {
            let tl = (iz * row + ix) as u32;
            let tr = tl + 1;
            let bl = tl + row as u32;
            let br = bl + 1;
            indices.extend([tl, bl, tr]);
            indices.extend([tr, bl, br]);
        }
    }

    trace!(
        vertices = positions.len(),
        triangles = indices.len() / 3,
        "built rectangular grid"
    );
    Ok(Heightfield::assemble(positions, Some(uvs), indices))
}

// Disc of `radius` sampled on a square lattice of spacing 2r / segments.
// Only lattice points inside the circle are kept, and only quads whose four
// corners were kept are triangulated, so the rim is stair-stepped.
pub fn build_circular(radius: f64, segments: usize) -> Result<Heightfield> {
    let radius = ensure_positive("radius", radius)?;
    let n = ensure_nonzero("segments", segments)?;

    let step = 2.0 * radius / n as f64;
    let limit = radius * radius * (1.0 + RIM_TOLERANCE);
    let row = n + 1;

    // lattice slot -> vertex index of kept points
    let mut slots: Vec<Option<u32>> = vec![None; row * row];
    let mut positions = Vec::new();
    let mut uvs = Vec::new();

    for j in 0..=n {
        let z = -radius + j as f64 * step;
        for i in 0..=n {
            let x = -radius + i as f64 * step;
            if x * x + z * z <= limit {
                slots[j * row + i] = Some(positions.len() as u32);
                positions.push(Vec3::new(x as f32, 0.0, z as f32));
                uvs.push(Vec2::new(
                    ((x + radius) / (2.0 * radius)) as f32,
                    ((z + radius) / (2.0 * radius)) as f32,
                ));
            }
        }
    }

    let mut indices = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let corners = (
                slots[j * row + i],
                slots[j * row + i + 1],
                slots[(j + 1) * row + i],
                slots[(j + 1) * row + i + 1],
            );
            if let (Some(tl), Some(tr), Some(bl), Some(br)) = corners {
                indices.extend([tl, bl, tr]);
                indices.extend([tr, bl, br]);
            }
        }
    }

    trace!(
        vertices = positions.len(),
        triangles = indices.len() / 3,
        "built circular disc"
    );
    Ok(Heightfield::assemble(positions, Some(uvs), indices))
}

// Overwrite every vertex height with `base + noise(x / scale, z / scale) * factor`.
// Heights are replaced, not accumulated, so repeated calls with a deterministic
// provider give identical meshes.
pub fn apply_noise<N: NoiseGenerator + ?Sized>(
    heightfield: &mut Heightfield,
    noise: &N,
    params: &NoiseParams,
) -> Result<()> {
    let params = params.validate()?;
    for p in heightfield.positions_mut() {
        p.y = params.height(noise, p.x as f64, p.z as f64);
    }
    heightfield.recompute_normals();
    Ok(())
}
