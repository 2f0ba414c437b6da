use std::path::{Path, PathBuf};

use terrain_core::{TerrainConfig, render_preview};
use tracing::info;
use tracing_subscriber::EnvFilter;

// usage: terrain_preview [preset-name | path/to/config.ron]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "island".to_string());
    let config = if arg.ends_with(".ron") {
        TerrainConfig::load(Path::new(&arg))?
    } else {
        TerrainConfig::preset(&arg)?
    };

    let terrain = config.build()?;
    let img = render_preview(&terrain, 512);

    let name = Path::new(&arg)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "terrain".to_string());
    let path = PathBuf::from(format!("{name}_preview.png"));
    img.save(&path)?;
    info!(path = %path.display(), "saved preview");
    Ok(())
}
