//! Circular sub-mesh extraction.
//!
//! The result owns its buffers; later edits to the source do not reach it.

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::heightfield::Heightfield;

/// Copy the part of `source` within `radius` of `center` (X-Z distance only).
///
/// Triangles are kept only when all three corners survive. With
/// `smoothing = Some(band)`, kept vertices in the last `band` units before the
/// rim are pulled toward the rim circle: not at all at the inner edge of the
/// band, fully onto the circle at the rim. Heights are left untouched.
///
/// No surviving vertex yields an empty geometry.
pub fn extract(
    source: &Heightfield,
    center: Vec2,
    radius: f32,
    smoothing: Option<f32>,
) -> Heightfield {
    let band = smoothing.filter(|s| *s > 0.0);
    let mut remap: Vec<Option<u32>> = vec![None; source.vertex_count()];
    let mut positions = Vec::new();
    let mut uvs = source.uvs().map(|_| Vec::new());

    for (i, &p) in source.positions().iter().enumerate() {
        let offset = Vec2::new(p.x, p.z) - center;
        let distance = offset.length();
        if distance > radius {
            continue;
        }

        remap[i] = Some(positions.len() as u32);
        positions.push(match band {
            Some(band) if distance >= radius - band && distance > 0.0 => {
                pull_to_rim(p, center, offset / distance, distance, radius, band)
            }
            _ => p,
        });
        if let (Some(out), Some(src)) = (uvs.as_mut(), source.uvs()) {
            out.push(src[i]);
        }
    }

    if positions.is_empty() {
        return Heightfield::empty();
    }

    let mut indices = Vec::new();
    for [a, b, c] in source.triangles() {
        let kept = (remap[a as usize], remap[b as usize], remap[c as usize]);
        if let (Some(a), Some(b), Some(c)) = kept {
            indices.extend([a, b, c]);
        }
    }

    trace!(
        kept = positions.len(),
        of = source.vertex_count(),
        triangles = indices.len() / 3,
        "extracted partial geometry"
    );
    Heightfield::assemble(positions, uvs, indices)
}

// Lerp toward the rim point along center -> vertex; weight grows from 0 at the
// band's inner edge to 1 at the rim
#[inline]
fn pull_to_rim(p: Vec3, center: Vec2, dir: Vec2, distance: f32, radius: f32, band: f32) -> Vec3 {
    let weight = (1.0 - (radius - distance) / band).clamp(0.0, 1.0);
    let rim = center + dir * radius;
    let xz = Vec2::new(p.x, p.z).lerp(rim, weight);
    Vec3::new(xz.x, p.y, xz.y)
}
