//! Animated ripples for water-like surfaces.
//!
//! `update` runs once per frame on the render thread and finishes (normals
//! included) before the buffers are read again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_positive};
use crate::heightfield::{Heightfield, MeshSurface};

/// Circular wave parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleParams {
    pub origin: Vec2,
    pub amplitude: f32,
    pub wavelength: f32,
    /// Phase speed in radians per second.
    pub speed: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            amplitude: 0.2,
            wavelength: 4.0,
            speed: 2.0,
        }
    }
}

/// A heightfield displaced in place around its rest heights.
pub struct RippleSurface {
    surface: Heightfield,
    rest: Vec<f32>,
    params: RippleParams,
    wave_number: f32,
}

impl RippleSurface {
    pub fn new(surface: Heightfield, params: RippleParams) -> Result<Self> {
        let wavelength = ensure_positive("ripple wavelength", params.wavelength as f64)? as f32;
        let rest = surface.heights();
        Ok(Self {
            surface,
            rest,
            params,
            wave_number: std::f32::consts::TAU / wavelength,
        })
    }

    /// Displace every vertex for time `time` (seconds) and refresh normals.
    pub fn update(&mut self, time: f32) {
        let RippleParams {
            origin,
            amplitude,
            speed,
            ..
        } = self.params;
        let k = self.wave_number;
        for (p, &rest) in self.surface.positions_mut().iter_mut().zip(&self.rest) {
            let d = Vec2::new(p.x, p.z).distance(origin);
            p.y = rest + amplitude * (d * k - time * speed).sin();
        }
        self.surface.recompute_normals();
    }

    /// Put every vertex back at its rest height.
    pub fn reset(&mut self) {
        self.surface.set_heights(&self.rest);
        self.surface.recompute_normals();
    }

    pub fn heightfield(&self) -> &Heightfield {
        &self.surface
    }

    pub fn to_surface(&mut self) -> MeshSurface {
        self.surface.to_surface()
    }

    pub fn params(&self) -> &RippleParams {
        &self.params
    }
}
