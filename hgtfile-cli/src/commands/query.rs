use anyhow::{bail, Context, Result};
use hgtfile::{filename::lat_lon_to_filename, HgtFile, NO_DATA_THRESHOLD};
use serde::Serialize;
use std::path::PathBuf;

use super::{require_data_dir, resolve_tile};

#[derive(Serialize)]
struct ElevationResponse {
    tile: String,
    x: usize,
    y: usize,
    lat: f64,
    lon: f64,
    elevation: Option<f32>,
}

pub fn run(
    data_dir: Option<PathBuf>,
    tile: Option<String>,
    coords: Option<(f64, f64)>,
    pixel: Option<(usize, usize)>,
    json: bool,
) -> Result<()> {
    let tile_path = match (tile, coords) {
        (Some(tile), _) => resolve_tile(data_dir.as_deref(), &tile)?,
        (None, Some((lat, lon))) => {
            let path = require_data_dir(data_dir.as_deref())?.join(lat_lon_to_filename(lat, lon));
            if !path.exists() {
                bail!("Tile not found: {}", path.display());
            }
            path
        }
        (None, None) => bail!("Specify a tile, or --lat and --lon"),
    };

    let mut hgt = HgtFile::open(&tile_path).context("Failed to open tile")?;
    let metadata = hgt.parse_metadata().context("Failed to read tile metadata")?;

    let (x, y) = match (pixel, coords) {
        (Some(pixel), _) => pixel,
        (None, Some((lat, lon))) => metadata
            .pixel_at(lat, lon)
            .context("Coordinates are not inside this tile")?,
        (None, None) => bail!("Specify --lat/--lon or -x/-y"),
    };

    let value = hgt
        .elevation_at_point(&metadata, x, y)
        .context("Failed to read elevation")?;
    let elevation = (value < NO_DATA_THRESHOLD).then_some(value);

    if json {
        let response = ElevationResponse {
            tile: metadata.filename.clone(),
            x,
            y,
            lat: metadata.latitude_at(y),
            lon: metadata.longitude_at(x),
            elevation,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else if let Some(elev) = elevation {
        println!("{}", elev);
    } else {
        println!("void");
    }

    Ok(())
}
