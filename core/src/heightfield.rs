//! Triangle surface with height stored in `y`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Flat buffers ready for upload to a GPU vertex/index buffer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshSurface {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u32>,
}

impl MeshSurface {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Vertex positions, per-vertex normals, optional UVs and a triangle list.
///
/// Normals are derived data. Any height edit marks them stale; the mesh is
/// only clean for rendering after [`Heightfield::recompute_normals`].
#[derive(Clone, Debug, Default)]
pub struct Heightfield {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Option<Vec<Vec2>>,
    indices: Vec<u32>,
    normals_dirty: bool,
    disposed: bool,
}

impl Heightfield {
    /// Assemble from raw buffers and compute normals.
    ///
    /// Every index must reference an existing position, `indices.len()` must be
    /// a multiple of three and UVs, when present, must match the positions.
    pub fn from_buffers(
        positions: Vec<Vec3>,
        uvs: Option<Vec<Vec2>>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(TerrainError::IndexCount(indices.len()));
        }
        let len = positions.len();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= len) {
            return Err(TerrainError::InvalidIndex { index, len });
        }
        if let Some(uvs) = uvs.as_ref().filter(|uv| uv.len() != len) {
            return Err(TerrainError::UvCount {
                uvs: uvs.len(),
                positions: len,
            });
        }
        Ok(Self::assemble(positions, uvs, indices))
    }

    // Builders and the extractor produce consistent buffers by construction
    pub(crate) fn assemble(
        positions: Vec<Vec3>,
        uvs: Option<Vec<Vec2>>,
        indices: Vec<u32>,
    ) -> Self {
        let mut hf = Self {
            normals: vec![Vec3::Y; positions.len()],
            positions,
            uvs,
            indices,
            normals_dirty: true,
            disposed: false,
        };
        hf.recompute_normals();
        hf
    }

    /// A geometry with no vertices and no triangles.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn uvs(&self) -> Option<&[Vec2]> {
        self.uvs.as_deref()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Snapshot of every vertex height, in vertex order.
    pub fn heights(&self) -> Vec<f32> {
        self.positions.iter().map(|p| p.y).collect()
    }

    pub fn set_height(&mut self, index: usize, height: f32) {
        self.positions[index].y = height;
        self.normals_dirty = true;
    }

    /// Overwrite all heights from a snapshot of the same length.
    pub fn set_heights(&mut self, heights: &[f32]) {
        debug_assert_eq!(heights.len(), self.positions.len());
        for (p, &h) in self.positions.iter_mut().zip(heights) {
            p.y = h;
        }
        self.normals_dirty = true;
    }

    /// Mutable access to positions; marks normals stale.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        self.normals_dirty = true;
        &mut self.positions
    }

    /// True when normals match the current positions.
    pub fn is_clean(&self) -> bool {
        !self.normals_dirty
    }

    /// Area-weighted vertex normals from the triangle list.
    ///
    /// Vertices not used by any triangle, or whose faces cancel out, get +Y.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (p0, p1, p2) = (self.positions[a], self.positions[b], self.positions[c]);
            // unnormalized cross product weights each face by its area
            let face = (p1 - p0).cross(p2 - p0);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        for n in acc.iter_mut() {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
        self.normals = acc;
        self.normals_dirty = false;
    }

    /// Export flat buffers, refreshing stale normals first.
    pub fn to_surface(&mut self) -> MeshSurface {
        if self.normals_dirty {
            self.recompute_normals();
        }
        MeshSurface {
            positions: self.positions.iter().map(|p| p.to_array()).collect(),
            normals: self.normals.iter().map(|n| n.to_array()).collect(),
            uvs: self
                .uvs
                .as_ref()
                .map(|uvs| uvs.iter().map(|uv| uv.to_array()).collect()),
            indices: self.indices.clone(),
        }
    }

    /// Release all buffers. Calling it again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.positions = Vec::new();
        self.normals = Vec::new();
        self.uvs = None;
        self.indices = Vec::new();
        self.normals_dirty = false;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
