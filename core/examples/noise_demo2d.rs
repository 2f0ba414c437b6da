use std::sync::Arc;

use terrain_core::{
    Fbm2D, MaterialHandle, NoiseParams, OctaveParams, Perlin2D, Terrain, TerrainShape,
};

fn main() -> terrain_core::Result<()> {
    // 5-octave fBm over Perlin on a 64x64 unit grid
    let noise = Fbm2D::new(
        Perlin2D::new(2025, 1.0)?,
        OctaveParams {
            octaves: 5,
            ..Default::default()
        },
    )?;
    let terrain = Terrain::new(
        TerrainShape::Rectangular {
            width: 64.0,
            height: 64.0,
            width_segments: 64,
            height_segments: 64,
        },
        Arc::new(noise),
        NoiseParams {
            scale: 16.0,
            height_factor: 10.0,
            base_height: 0.0,
        },
        MaterialHandle::default(),
    )?;

    // Print the top-left 16×16 corner of the mesh heights
    let heights = terrain.heightfield().heights();
    for z in 0..16 {
        for x in 0..16 {
            print!("{:>6.2} ", heights[z * 65 + x]);
        }
        println!();
    }
    Ok(())
}
