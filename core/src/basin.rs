//! Basin carving.
//!
//! A basin pulls vertices inside its radius down toward `-depth` measured from
//! world height zero, not from the local terrain height. Overlapping basins and
//! the base terrain are combined with `min`, so basins only ever carve down and
//! the deepest contribution wins.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError, ensure_positive};
use crate::heightfield::Heightfield;

/// How carving depth falls off from the basin center to its rim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    /// Depth scales with `t`.
    #[default]
    Linear,
    /// Depth scales with `t²`.
    Smooth,
}

impl Falloff {
    #[inline]
    fn weight(self, t: f32) -> f32 {
        match self {
            Falloff::Linear => t,
            Falloff::Smooth => t * t,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Falloff::Linear => "linear",
            Falloff::Smooth => "smooth",
        }
    }
}

impl fmt::Display for Falloff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Falloff {
    type Err = TerrainError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "linear" => Ok(Falloff::Linear),
            "smooth" => Ok(Falloff::Smooth),
            other => Err(TerrainError::UnknownFalloff(other.to_string())),
        }
    }
}

/// A circular depression in the X-Z plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Basin {
    pub center: Vec2,
    pub radius: f32,
    pub depth: f32,
    #[serde(default)]
    pub falloff: Falloff,
}

impl Basin {
    pub fn new(center: Vec2, radius: f32, depth: f32, falloff: Falloff) -> Result<Self> {
        ensure_positive("basin radius", radius as f64)?;
        Ok(Self {
            center,
            radius,
            depth,
            falloff,
        })
    }

    pub fn validate(self) -> Result<Self> {
        ensure_positive("basin radius", self.radius as f64)?;
        Ok(self)
    }

    /// Carved height at `xz`, or `None` when the point is at or past the rim.
    #[inline]
    pub fn depression(&self, xz: Vec2) -> Option<f32> {
        let d = xz.distance(self.center);
        if d < self.radius {
            // 1 at the center, 0 at the rim
            let t = (self.radius - d) / self.radius;
            Some(0.0 - self.depth * self.falloff.weight(t))
        } else {
            None
        }
    }
}

/// Combine `base` with every basin that covers `position`.
#[inline]
pub fn basin_height(position: Vec3, base: f32, basins: &[Basin]) -> f32 {
    let xz = Vec2::new(position.x, position.z);
    basins
        .iter()
        .filter_map(|b| b.depression(xz))
        .fold(base, f32::min)
}

/// Re-carve every vertex starting from `base_heights`, the pre-basin snapshot.
///
/// Starting from the snapshot instead of the current heights means applying
/// the same basins again gives the same mesh.
pub fn apply_basins(heightfield: &mut Heightfield, base_heights: &[f32], basins: &[Basin]) {
    debug_assert_eq!(base_heights.len(), heightfield.vertex_count());
    for (p, &base) in heightfield.positions_mut().iter_mut().zip(base_heights) {
        p.y = basin_height(*p, base, basins);
    }
    heightfield.recompute_normals();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_rectangular;

    fn basin(x: f32, z: f32, radius: f32, depth: f32, falloff: Falloff) -> Basin {
        Basin::new(Vec2::new(x, z), radius, depth, falloff).unwrap()
    }

    #[test]
    fn linear_profile() {
        let b = basin(0.0, 0.0, 10.0, 5.0, Falloff::Linear);
        assert_eq!(b.depression(Vec2::ZERO), Some(-5.0));
        assert_eq!(b.depression(Vec2::new(5.0, 0.0)), Some(-2.5));
        assert_eq!(b.depression(Vec2::new(0.0, 10.0)), None);
        assert_eq!(b.depression(Vec2::new(30.0, 0.0)), None);
    }

    #[test]
    fn smooth_profile_squares_t() {
        let b = basin(0.0, 0.0, 10.0, 8.0, Falloff::Smooth);
        assert_eq!(b.depression(Vec2::new(5.0, 0.0)), Some(-2.0));
    }

    #[test]
    fn never_raises_terrain() {
        // base already below the basin floor stays put
        let b = basin(0.0, 0.0, 10.0, 1.0, Falloff::Linear);
        assert_eq!(basin_height(Vec3::ZERO, -3.0, &[b]), -3.0);
    }

    #[test]
    fn overlapping_basins_take_minimum() {
        let shallow = basin(0.0, 0.0, 10.0, 2.0, Falloff::Linear);
        let deep = basin(4.0, 0.0, 10.0, 6.0, Falloff::Linear);
        let p = Vec3::new(2.0, 0.0, 0.0);
        let expected = shallow
            .depression(Vec2::new(2.0, 0.0))
            .unwrap()
            .min(deep.depression(Vec2::new(2.0, 0.0)).unwrap())
            .min(1.0);
        assert_eq!(basin_height(p, 1.0, &[shallow, deep]), expected);
        assert_eq!(basin_height(p, 1.0, &[deep, shallow]), expected);
    }

    #[test]
    fn reapplying_does_not_compound() {
        let mut hf = build_rectangular(20.0, 20.0, 4, 4).unwrap();
        let base = hf.heights();
        let basins = [basin(0.0, 0.0, 10.0, 5.0, Falloff::Smooth)];
        apply_basins(&mut hf, &base, &basins);
        let once = hf.heights();
        apply_basins(&mut hf, &base, &basins);
        assert_eq!(hf.heights(), once);
        assert!(hf.is_clean());
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(Basin::new(Vec2::ZERO, 0.0, 1.0, Falloff::Linear).is_err());
    }

    #[test]
    fn falloff_tags() {
        assert_eq!("smooth".parse::<Falloff>().unwrap(), Falloff::Smooth);
        assert!("cubic".parse::<Falloff>().is_err());
    }
}
