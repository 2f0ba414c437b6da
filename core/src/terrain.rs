//! The terrain aggregate: one heightfield, its basins and its patches.
//!
//! Every parameter change runs the whole pipeline again from the topology
//! forward (noise, snapshot, basins, patches). Nothing is patched
//! incrementally, so repeated edits cannot drift.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::SharedNoise;
use crate::basin::{Basin, apply_basins, basin_height};
use crate::builder::{
    GeometryKind, NoiseParams, RIM_TOLERANCE, apply_noise, build_circular, build_rectangular,
};
use crate::error::{Result, TerrainError, ensure_positive};
use crate::heightfield::{Heightfield, MeshSurface};
use crate::partial::extract;

/// Opaque appearance handle owned by the renderer. Passed through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Topology parameters. Changing any of them rebuilds the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TerrainShape {
    Rectangular {
        width: f64,
        height: f64,
        width_segments: usize,
        height_segments: usize,
    },
    Circular {
        radius: f64,
        segments: usize,
    },
}

impl TerrainShape {
    pub fn kind(&self) -> GeometryKind {
        match self {
            TerrainShape::Rectangular { .. } => GeometryKind::Rectangular,
            TerrainShape::Circular { .. } => GeometryKind::Circular,
        }
    }

    pub fn build(&self) -> Result<Heightfield> {
        match *self {
            TerrainShape::Rectangular {
                width,
                height,
                width_segments,
                height_segments,
            } => build_rectangular(width, height, width_segments, height_segments),
            TerrainShape::Circular { radius, segments } => build_circular(radius, segments),
        }
    }

    /// Whether `(x, z)` lies on the terrain's footprint.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        match *self {
            TerrainShape::Rectangular { width, height, .. } => {
                x.abs() <= width / 2.0 && z.abs() <= height / 2.0
            }
            TerrainShape::Circular { radius, .. } => {
                x * x + z * z <= radius * radius * (1.0 + RIM_TOLERANCE)
            }
        }
    }
}

/// Circular area of the base surface to copy into its own child surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchRegion {
    pub center: Vec2,
    pub radius: f32,
    pub material: MaterialHandle,
    /// Width of the rim band whose vertices are pulled onto the circle.
    #[serde(default)]
    pub smoothing: Option<f32>,
}

impl PatchRegion {
    pub fn new(center: Vec2, radius: f32, material: MaterialHandle) -> Self {
        Self {
            center,
            radius,
            material,
            smoothing: None,
        }
    }

    pub fn with_smoothing(mut self, band: f32) -> Self {
        self.smoothing = Some(band);
        self
    }

    fn validate(self) -> Result<Self> {
        ensure_positive("patch radius", self.radius as f64)?;
        if let Some(band) = self.smoothing {
            ensure_positive("patch smoothing radius", band as f64)?;
        }
        Ok(self)
    }
}

/// A materialized patch: its region and the geometry extracted for it.
#[derive(Clone, Debug)]
pub struct Patch {
    pub region: PatchRegion,
    pub geometry: Heightfield,
}

/// Lifecycle of a [`Terrain`].
///
/// `Dirty` only exists while a recompute is running. Every public call returns
/// with the terrain `Built`, or `Uninitialized` once it has been disposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainState {
    Uninitialized,
    Built,
    Dirty,
}

pub struct Terrain {
    shape: TerrainShape,
    noise: SharedNoise,
    params: NoiseParams,
    material: MaterialHandle,
    basins: Vec<Basin>,
    regions: Vec<PatchRegion>,
    heightfield: Heightfield,
    base_heights: Vec<f32>,
    patches: Vec<Patch>,
    state: TerrainState,
    generation: u64,
}

impl Terrain {
    pub fn new(
        shape: TerrainShape,
        noise: SharedNoise,
        params: NoiseParams,
        material: MaterialHandle,
    ) -> Result<Self> {
        Self::with_features(shape, noise, params, material, Vec::new(), Vec::new())
    }

    /// Build with basins and patch regions in place from the start.
    pub fn with_features(
        shape: TerrainShape,
        noise: SharedNoise,
        params: NoiseParams,
        material: MaterialHandle,
        basins: Vec<Basin>,
        regions: Vec<PatchRegion>,
    ) -> Result<Self> {
        let params = params.validate()?;
        let basins = basins
            .into_iter()
            .map(Basin::validate)
            .collect::<Result<Vec<_>>>()?;
        let regions = regions
            .into_iter()
            .map(PatchRegion::validate)
            .collect::<Result<Vec<_>>>()?;

        let mut terrain = Self {
            shape,
            noise,
            params,
            material,
            basins,
            regions,
            heightfield: Heightfield::empty(),
            base_heights: Vec::new(),
            patches: Vec::new(),
            state: TerrainState::Uninitialized,
            generation: 0,
        };
        terrain.heightfield = shape.build()?;
        terrain.recompute()?;

        info!(
            kind = %shape.kind(),
            vertices = terrain.heightfield.vertex_count(),
            basins = terrain.basins.len(),
            patches = terrain.patches.len(),
            "terrain built"
        );
        Ok(terrain)
    }

    // noise -> snapshot -> basins -> patches, over the current topology
    fn recompute(&mut self) -> Result<()> {
        self.state = TerrainState::Dirty;
        apply_noise(&mut self.heightfield, &*self.noise, &self.params)?;
        self.base_heights = self.heightfield.heights();
        apply_basins(&mut self.heightfield, &self.base_heights, &self.basins);
        self.materialize_patches();
        self.state = TerrainState::Built;
        self.generation += 1;
        debug!(generation = self.generation, "terrain recomputed");
        Ok(())
    }

    fn rebuild_topology(&mut self, shape: TerrainShape) -> Result<()> {
        self.ensure_live()?;
        let fresh = shape.build()?;
        self.heightfield.dispose();
        self.heightfield = fresh;
        self.shape = shape;
        self.recompute()
    }

    fn materialize_patches(&mut self) {
        for patch in self.patches.iter_mut() {
            patch.geometry.dispose();
        }
        self.patches.clear();

        for region in &self.regions {
            let geometry = extract(
                &self.heightfield,
                region.center,
                region.radius,
                region.smoothing,
            );
            if geometry.is_empty() {
                warn!(
                    center = ?region.center,
                    radius = region.radius,
                    "patch region covers no vertices, skipping"
                );
                continue;
            }
            self.patches.push(Patch {
                region: *region,
                geometry,
            });
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == TerrainState::Uninitialized {
            return Err(TerrainError::Disposed);
        }
        Ok(())
    }

    fn update_params(&mut self, params: NoiseParams) -> Result<()> {
        self.ensure_live()?;
        self.params = params.validate()?;
        self.recompute()
    }

    pub fn set_noise_scale(&mut self, scale: f64) -> Result<()> {
        self.update_params(NoiseParams {
            scale,
            ..self.params
        })
    }

    pub fn set_height_factor(&mut self, height_factor: f64) -> Result<()> {
        self.update_params(NoiseParams {
            height_factor,
            ..self.params
        })
    }

    pub fn set_base_height(&mut self, base_height: f64) -> Result<()> {
        self.update_params(NoiseParams {
            base_height,
            ..self.params
        })
    }

    pub fn set_noise(&mut self, noise: SharedNoise) -> Result<()> {
        self.ensure_live()?;
        self.noise = noise;
        self.recompute()
    }

    pub fn add_basin(&mut self, basin: Basin) -> Result<()> {
        self.ensure_live()?;
        self.basins.push(basin.validate()?);
        self.recompute()
    }

    pub fn update_basin(&mut self, index: usize, basin: Basin) -> Result<()> {
        self.ensure_live()?;
        let len = self.basins.len();
        let basin = basin.validate()?;
        let slot = self
            .basins
            .get_mut(index)
            .ok_or(TerrainError::BasinIndex { index, len })?;
        *slot = basin;
        self.recompute()
    }

    pub fn remove_basin(&mut self, index: usize) -> Result<Basin> {
        self.ensure_live()?;
        let len = self.basins.len();
        if index >= len {
            return Err(TerrainError::BasinIndex { index, len });
        }
        let removed = self.basins.remove(index);
        self.recompute()?;
        Ok(removed)
    }

    pub fn clear_basins(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.basins.clear();
        self.recompute()
    }

    /// Change the disc radius. Only valid on circular terrains.
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        match self.shape {
            TerrainShape::Circular { segments, .. } => {
                self.rebuild_topology(TerrainShape::Circular { radius, segments })
            }
            TerrainShape::Rectangular { .. } => Err(TerrainError::ShapeMismatch {
                operation: "set_radius",
                shape: "rectangular",
            }),
        }
    }

    /// Change the grid extent. Only valid on rectangular terrains.
    pub fn set_dimensions(&mut self, width: f64, height: f64) -> Result<()> {
        match self.shape {
            TerrainShape::Rectangular {
                width_segments,
                height_segments,
                ..
            } => self.rebuild_topology(TerrainShape::Rectangular {
                width,
                height,
                width_segments,
                height_segments,
            }),
            TerrainShape::Circular { .. } => Err(TerrainError::ShapeMismatch {
                operation: "set_dimensions",
                shape: "circular",
            }),
        }
    }

    /// Swap in a whole new topology.
    pub fn set_shape(&mut self, shape: TerrainShape) -> Result<()> {
        self.rebuild_topology(shape)
    }

    pub fn add_patch(&mut self, region: PatchRegion) -> Result<()> {
        self.ensure_live()?;
        self.regions.push(region.validate()?);
        self.state = TerrainState::Dirty;
        self.materialize_patches();
        self.state = TerrainState::Built;
        Ok(())
    }

    /// Drop every patch region and its attached geometry.
    pub fn clear_patches(&mut self) {
        self.regions.clear();
        self.materialize_patches();
    }

    pub fn set_material(&mut self, material: MaterialHandle) {
        self.material = material;
    }

    /// Height at an arbitrary point, evaluated from the provider and basins
    /// rather than interpolated from the mesh. `None` off the footprint or
    /// after disposal.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let (xf, zf) = (x as f64, z as f64);
        if self.state == TerrainState::Uninitialized || !self.shape.contains(xf, zf) {
            return None;
        }
        let base = self.params.height(&*self.noise, xf, zf);
        Some(basin_height(Vec3::new(x, base, z), base, &self.basins))
    }

    /// Base surface first, then one surface per attached patch.
    pub fn surfaces(&mut self) -> Vec<(MaterialHandle, MeshSurface)> {
        let mut out = Vec::with_capacity(1 + self.patches.len());
        out.push((self.material, self.heightfield.to_surface()));
        for patch in self.patches.iter_mut() {
            out.push((patch.region.material, patch.geometry.to_surface()));
        }
        out
    }

    /// Release the base mesh and every patch. Safe to call repeatedly.
    /// Later mutations fail with [`TerrainError::Disposed`].
    pub fn dispose(&mut self) {
        self.heightfield.dispose();
        for patch in self.patches.iter_mut() {
            patch.geometry.dispose();
        }
        self.patches.clear();
        self.base_heights = Vec::new();
        if self.state != TerrainState::Uninitialized {
            debug!(generation = self.generation, "terrain disposed");
        }
        self.state = TerrainState::Uninitialized;
    }

    pub fn shape(&self) -> &TerrainShape {
        &self.shape
    }

    pub fn noise(&self) -> &SharedNoise {
        &self.noise
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    pub fn basins(&self) -> &[Basin] {
        &self.basins
    }

    pub fn regions(&self) -> &[PatchRegion] {
        &self.regions
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.heightfield
    }

    /// Heights after noise and before basins.
    pub fn base_heights(&self) -> &[f32] {
        &self.base_heights
    }

    pub fn state(&self) -> TerrainState {
        self.state
    }

    /// Number of completed full recomputes.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
