use std::sync::Arc;

use glam::Vec2;
use terrain_core::{
    Basin, Constant2D, Falloff, Fbm2D, MaterialHandle, NoiseParams, OctaveParams, PatchRegion,
    Perlin2D, SharedNoise, Terrain, TerrainShape, TerrainState, apply_basins, apply_noise,
    build_circular, build_rectangular, extract,
};

fn perlin_fbm(seed: u64) -> SharedNoise {
    let base = Perlin2D::new(seed, 1.0).unwrap();
    Arc::new(Fbm2D::new(base, OctaveParams::default()).unwrap())
}

fn hills() -> Terrain {
    Terrain::new(
        TerrainShape::Rectangular {
            width: 64.0,
            height: 64.0,
            width_segments: 32,
            height_segments: 32,
        },
        perlin_fbm(42),
        NoiseParams {
            scale: 16.0,
            height_factor: 6.0,
            base_height: 1.0,
        },
        MaterialHandle(1),
    )
    .unwrap()
}

#[test]
fn rebuilds_are_bit_identical() {
    let noise = perlin_fbm(9);
    let params = NoiseParams {
        scale: 7.5,
        height_factor: 3.0,
        base_height: 0.5,
    };
    let mut a = build_circular(20.0, 24).unwrap();
    let mut b = build_circular(20.0, 24).unwrap();
    apply_noise(&mut a, &*noise, &params).unwrap();
    apply_noise(&mut b, &*noise, &params).unwrap();
    apply_noise(&mut b, &*noise, &params).unwrap();
    assert_eq!(a.heights(), b.heights());
    assert_eq!(a.normals(), b.normals());
}

#[test]
fn basin_minimum_law() {
    let mut terrain = hills();
    let basins = [
        Basin::new(Vec2::new(0.0, 0.0), 20.0, 4.0, Falloff::Linear).unwrap(),
        Basin::new(Vec2::new(8.0, 4.0), 14.0, 7.0, Falloff::Smooth).unwrap(),
        Basin::new(Vec2::new(-6.0, 2.0), 10.0, 2.0, Falloff::Linear).unwrap(),
    ];
    for b in basins {
        terrain.add_basin(b).unwrap();
    }

    let hf = terrain.heightfield();
    for (p, &base) in hf.positions().iter().zip(terrain.base_heights()) {
        let xz = Vec2::new(p.x, p.z);
        let mut expected = base;
        for b in &basins {
            if let Some(d) = b.depression(xz) {
                assert!(p.y <= d);
                expected = expected.min(d);
            }
        }
        assert!(p.y <= base);
        assert_eq!(p.y, expected);
    }
}

#[test]
fn basin_update_does_not_compound() {
    let mut terrain = hills();
    let basin = Basin::new(Vec2::new(4.0, -4.0), 18.0, 5.0, Falloff::Smooth).unwrap();
    terrain.add_basin(basin).unwrap();

    terrain.update_basin(0, basin).unwrap();
    let once = terrain.heightfield().heights();
    terrain.update_basin(0, basin).unwrap();
    assert_eq!(terrain.heightfield().heights(), once);
    assert_eq!(terrain.state(), TerrainState::Built);
}

#[test]
fn noise_edit_restarts_from_fresh_snapshot() {
    let mut terrain = hills();
    terrain
        .add_basin(Basin::new(Vec2::ZERO, 20.0, 5.0, Falloff::Linear).unwrap())
        .unwrap();
    let original = terrain.heightfield().heights();

    terrain.set_noise_scale(4.0).unwrap();
    terrain.set_noise_scale(16.0).unwrap();
    assert_eq!(terrain.heightfield().heights(), original);
}

#[test]
fn height_query_matches_vertices() {
    let mut terrain = hills();
    terrain
        .add_basin(Basin::new(Vec2::new(3.0, 3.0), 12.0, 6.0, Falloff::Smooth).unwrap())
        .unwrap();
    for p in terrain.heightfield().positions() {
        assert_eq!(terrain.height_at(p.x, p.z), Some(p.y));
    }
    assert_eq!(terrain.height_at(40.0, 0.0), None);
}

#[test]
fn extraction_containment_and_integrity() {
    let mut source = build_rectangular(40.0, 40.0, 40, 40).unwrap();
    apply_noise(&mut source, &*perlin_fbm(3), &NoiseParams::default()).unwrap();

    for smoothing in [None, Some(2.0)] {
        let center = Vec2::new(3.3, -2.1);
        let part = extract(&source, center, 9.5, smoothing);
        assert!(part.triangle_count() > 0);
        for p in part.positions() {
            assert!(Vec2::new(p.x, p.z).distance(center) <= 9.5 + 1e-4);
        }
        for [a, b, c] in part.triangles() {
            for i in [a, b, c] {
                assert!((i as usize) < part.vertex_count());
            }
        }
    }
}

#[test]
fn extraction_is_a_snapshot() {
    let mut terrain = hills();
    terrain
        .add_patch(PatchRegion::new(Vec2::ZERO, 10.0, MaterialHandle(5)).with_smoothing(1.5))
        .unwrap();
    let patch = terrain.patches()[0].geometry.clone();
    terrain.set_height_factor(20.0).unwrap();
    // re-materialized patch follows the new surface, the old copy does not
    assert_ne!(terrain.patches()[0].geometry.heights(), patch.heights());
}

#[test]
fn empty_region_yields_empty_geometry() {
    let source = build_rectangular(10.0, 10.0, 4, 4).unwrap();
    let part = extract(&source, Vec2::new(1000.0, 0.0), 3.0, None);
    assert_eq!(part.vertex_count(), 0);
    assert_eq!(part.indices().len(), 0);
}

#[test]
fn zero_noise_gives_flat_surface() {
    let mut hf = build_rectangular(100.0, 100.0, 2, 2).unwrap();
    assert_eq!(hf.vertex_count(), 9);
    assert_eq!(hf.triangle_count(), 8);

    let params = NoiseParams {
        height_factor: 10.0,
        ..Default::default()
    };
    apply_noise(&mut hf, &Constant2D(0.0), &params).unwrap();
    for p in hf.positions() {
        assert!(!p.y.is_nan());
        assert_eq!(p.y, params.base_height as f32);
    }
}

#[test]
fn single_linear_basin_profile() {
    // vertices every 5 units from -10 to 10
    let mut hf = build_rectangular(20.0, 20.0, 4, 4).unwrap();
    let base = hf.heights();
    let basin = Basin::new(Vec2::ZERO, 10.0, 5.0, Falloff::Linear).unwrap();
    apply_basins(&mut hf, &base, &[basin]);

    let height_at = |x: f32, z: f32| {
        hf.positions()
            .iter()
            .find(|p| p.x == x && p.z == z)
            .map(|p| p.y)
            .unwrap()
    };
    assert_eq!(height_at(0.0, 0.0), -5.0);
    assert_eq!(height_at(5.0, 0.0), -2.5);
    assert_eq!(height_at(0.0, -5.0), -2.5);
    assert_eq!(height_at(10.0, 0.0), 0.0);
    assert_eq!(height_at(10.0, 10.0), 0.0);
}

#[test]
fn patches_follow_rebuilds() {
    let mut terrain = Terrain::new(
        TerrainShape::Circular {
            radius: 30.0,
            segments: 30,
        },
        Arc::new(Constant2D(0.0)),
        NoiseParams::default(),
        MaterialHandle(1),
    )
    .unwrap();
    terrain
        .add_patch(PatchRegion::new(Vec2::new(10.0, 0.0), 5.0, MaterialHandle(2)))
        .unwrap();
    terrain
        .add_basin(Basin::new(Vec2::new(10.0, 0.0), 6.0, 3.0, Falloff::Linear).unwrap())
        .unwrap();

    let patch = &terrain.patches()[0].geometry;
    let lowest = patch.positions().iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    assert_eq!(lowest, -3.0);

    terrain.set_radius(8.0).unwrap();
    // the region now lies mostly outside the shrunken disc but still touches it
    assert_eq!(terrain.patches().len(), 1);
    terrain.set_radius(4.0).unwrap();
    assert!(terrain.patches().is_empty());
    assert_eq!(terrain.regions().len(), 1);
}

#[test]
fn failed_setters_leave_terrain_untouched() {
    let mut terrain = Terrain::new(
        TerrainShape::Circular {
            radius: 24.0,
            segments: 24,
        },
        perlin_fbm(5),
        NoiseParams {
            scale: 10.0,
            height_factor: 4.0,
            base_height: 0.0,
        },
        MaterialHandle(1),
    )
    .unwrap();
    terrain
        .add_basin(Basin::new(Vec2::new(2.0, 2.0), 8.0, 3.0, Falloff::Smooth).unwrap())
        .unwrap();
    let heights = terrain.heightfield().heights();
    let generation = terrain.generation();

    assert!(terrain.set_radius(-1.0).is_err());
    assert!(terrain.set_noise_scale(0.0).is_err());
    assert!(terrain.set_dimensions(10.0, 10.0).is_err());

    assert_eq!(terrain.heightfield().heights(), heights);
    assert_eq!(terrain.generation(), generation);
    assert_eq!(terrain.params().scale, 10.0);
    assert_eq!(terrain.state(), TerrainState::Built);
    assert_eq!(
        *terrain.shape(),
        TerrainShape::Circular {
            radius: 24.0,
            segments: 24
        }
    );
}
