use image::{Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

use crate::terrain::{Terrain, TerrainShape};

// Top-down preview of a terrain: heights sampled on a size x size raster,
// coloured water -> sand -> grass -> rock -> snow and lit by a simple hillshade.
// Pixels off the terrain footprint stay black.
pub fn render_preview(terrain: &Terrain, size: u32) -> RgbImage {
    let n = size as usize;
    let (half_x, half_z) = match *terrain.shape() {
        TerrainShape::Rectangular { width, height, .. } => (width / 2.0, height / 2.0),
        TerrainShape::Circular { radius, .. } => (radius, radius),
    };

    // Sample at pixel centres
    let mut heights = vec![None; n * n];
    for py in 0..n {
        for px in 0..n {
            let x = -half_x + (px as f64 + 0.5) / n as f64 * 2.0 * half_x;
            let z = -half_z + (py as f64 + 0.5) / n as f64 * 2.0 * half_z;
            heights[py * n + px] = terrain.height_at(x as f32, z as f32);
        }
    }

    let (min, max) = heights
        .iter()
        .flatten()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    let range = max - min;

    let gradient = Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.0, 0.0, 0.5)), // deep blue
        (0.30, LinSrgb::new(0.8, 0.8, 0.5)), // sand
        (0.50, LinSrgb::new(0.1, 0.6, 0.2)), // green
        (0.75, LinSrgb::new(0.5, 0.4, 0.3)), // rock
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)), // snow
    ]);

    let shade = hillshade(&heights, n, range.max(f32::EPSILON));

    let mut img = RgbImage::new(size, size);
    for py in 0..n {
        for px in 0..n {
            let Some(h) = heights[py * n + px] else {
                continue;
            };
            let norm = if range.abs() < f32::EPSILON {
                0.5
            } else {
                (h - min) / range
            };
            let col: LinSrgb = gradient.get(norm);
            let rgb = col.into_format::<u8>();
            let light = (shade[py * n + px] * 0.5 + 0.5).clamp(0.0, 1.0);
            img.put_pixel(
                px as u32,
                py as u32,
                Rgb([
                    (rgb.red as f32 * light) as u8,
                    (rgb.green as f32 * light) as u8,
                    (rgb.blue as f32 * light) as u8,
                ]),
            );
        }
    }
    img
}

// Lambertian shading of the normalized height raster, light from the north-west at 45°.
// Missing neighbours count as the centre height.
fn hillshade(heights: &[Option<f32>], n: usize, range: f32) -> Vec<f32> {
    let (sin_alt, cos_alt) = std::f32::consts::FRAC_PI_4.sin_cos();
    let azimuth = std::f32::consts::FRAC_PI_4;
    let light = (azimuth.cos() * cos_alt, azimuth.sin() * cos_alt, sin_alt);
    // vertical exaggeration relative to the raster size
    let z_scale = n as f32 / 8.0;

    let mut shade = vec![1.0; n * n];
    for y in 0..n {
        for x in 0..n {
            let Some(c) = heights[y * n + x] else {
                continue;
            };
            let at = |xx: usize, yy: usize| heights[yy * n + xx].unwrap_or(c) / range;
            let left = if x > 0 { at(x - 1, y) } else { c / range };
            let right = if x + 1 < n { at(x + 1, y) } else { c / range };
            let up = if y > 0 { at(x, y - 1) } else { c / range };
            let down = if y + 1 < n { at(x, y + 1) } else { c / range };

            let dzdx = (right - left) / 2.0 * z_scale;
            let dzdy = (down - up) / 2.0 * z_scale;
            let (nx, ny, nz) = (-dzdx, -dzdy, 1.0f32);
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            shade[y * n + x] = ((nx * light.0 + ny * light.1 + nz * light.2) / len).max(0.0);
        }
    }
    shade
}
