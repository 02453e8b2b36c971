use anyhow::{Context, Result};
use hgtfile::{BoundingBox, HeightMap, HgtFile};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::resolve_tile;

#[derive(Serialize)]
struct SampleRow {
    lat: f64,
    lon: f64,
    elevation: f32,
}

#[derive(Serialize)]
struct Bounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

#[derive(Serialize)]
struct HeightMapDocument {
    width: usize,
    height: usize,
    count: usize,
    bounds: Bounds,
    minimum: Option<f32>,
    maximum: Option<f32>,
    /// `[lon, lat, elevation]` triples in scan order
    coordinates: Vec<[f64; 3]>,
}

impl From<&HeightMap> for HeightMapDocument {
    fn from(map: &HeightMap) -> Self {
        let valid = map.has_valid_samples();
        Self {
            width: map.width,
            height: map.height,
            count: map.count,
            bounds: Bounds {
                min_lat: map.bounding_box.y_min,
                max_lat: map.bounding_box.y_max,
                min_lon: map.bounding_box.x_min,
                max_lon: map.bounding_box.x_max,
            },
            minimum: valid.then_some(map.minimum),
            maximum: valid.then_some(map.maximum),
            coordinates: map
                .coordinates
                .iter()
                .map(|p| [p.longitude, p.latitude, f64::from(p.elevation)])
                .collect(),
        }
    }
}

pub fn run(
    data_dir: Option<PathBuf>,
    tile: String,
    bbox: BoundingBox,
    no_data: f32,
    output: Option<PathBuf>,
) -> Result<()> {
    let tile_path = resolve_tile(data_dir.as_deref(), &tile)?;

    let mut hgt = HgtFile::open(&tile_path).context("Failed to open tile")?;
    let metadata = hgt.parse_metadata().context("Failed to read tile metadata")?;
    let map = hgt
        .height_map_in_bbox(&bbox, &metadata, no_data)
        .context("Failed to decode bounding box")?;

    match output {
        Some(path) if is_json(&path) => {
            let file = File::create(&path).context("Failed to create output file")?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, &HeightMapDocument::from(&map))?;
            writer.flush()?;
            eprintln!("Wrote {}x{} samples to {}", map.width, map.height, path.display());
        }
        Some(path) => {
            let file = File::create(&path).context("Failed to create output file")?;
            write_csv(&map, BufWriter::new(file))?;
            eprintln!("Wrote {}x{} samples to {}", map.width, map.height, path.display());
        }
        None => write_csv(&map, io::stdout().lock())?,
    }

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json") || e.eq_ignore_ascii_case("geojson"))
        .unwrap_or(false)
}

fn write_csv<W: Write>(map: &HeightMap, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for point in &map.coordinates {
        writer.serialize(SampleRow {
            lat: point.latitude,
            lon: point.longitude,
            elevation: point.elevation,
        })?;
    }
    writer.flush()?;
    Ok(())
}
