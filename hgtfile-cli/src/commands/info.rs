use anyhow::{Context, Result};
use hgtfile::{HgtFile, HgtResolution};
use serde::Serialize;
use std::path::PathBuf;

use super::resolve_tile;

#[derive(Serialize)]
struct TileInfo {
    tile: String,
    path: String,
    resolution: &'static str,
    width: usize,
    height: usize,
    origin_lat: i32,
    origin_lon: i32,
    pixel_scale: f64,
    scanline_size: usize,
    file_size: u64,
    min_elevation: Option<f32>,
    max_elevation: Option<f32>,
    void_samples: usize,
}

pub fn run(data_dir: Option<PathBuf>, tile: String, json: bool) -> Result<()> {
    let tile_path = resolve_tile(data_dir.as_deref(), &tile)?;

    let mut hgt = HgtFile::open(&tile_path).context("Failed to open tile")?;
    let metadata = hgt.parse_metadata().context("Failed to read tile metadata")?;
    let map = hgt.height_map(&metadata).context("Failed to decode tile")?;

    // Voids are stored as -32768 in signed HGT tiles
    let void_value: f32 = metadata.no_data_value.parse().unwrap_or(f32::MIN);
    let void_samples = map.elevations().filter(|&e| e == void_value).count();

    // Extrema without void samples
    let (mut min_elev, mut max_elev) = (f32::MAX, f32::MIN);
    for elev in map.elevations().filter(|&e| e != void_value) {
        min_elev = min_elev.min(elev);
        max_elev = max_elev.max(elev);
    }
    let has_range = min_elev <= max_elev;

    let info = TileInfo {
        tile: tile_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(tile),
        path: tile_path.display().to_string(),
        resolution: match metadata.resolution {
            HgtResolution::Srtm1 => "SRTM1 (~30m)",
            HgtResolution::Srtm3 => "SRTM3 (~90m)",
        },
        width: metadata.width,
        height: metadata.height,
        origin_lat: metadata.origin_latitude,
        origin_lon: metadata.origin_longitude,
        pixel_scale: metadata.pixel_scale_x,
        scanline_size: metadata.scanline_size,
        file_size: hgt.byte_len(),
        min_elevation: has_range.then_some(min_elev),
        max_elevation: has_range.then_some(max_elev),
        void_samples,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let extent = metadata.extent();
    println!("Tile: {}", info.tile);
    println!("Path: {}", info.path);
    println!();
    println!(
        "Resolution: {} ({}x{} samples)",
        info.resolution, info.width, info.height
    );
    println!(
        "Coverage: lat {} to {}, lon {} to {}",
        extent.y_min, extent.y_max, extent.x_min, extent.x_max
    );
    println!("Pixel scale: {:.8} deg", info.pixel_scale);
    println!("File size: {}", format_size(info.file_size));
    println!();

    if let (Some(min), Some(max)) = (info.min_elevation, info.max_elevation) {
        println!("Min elevation: {}m", min);
        println!("Max elevation: {}m", max);
    }

    if void_samples > 0 {
        let void_pct = (void_samples as f64 / map.count as f64) * 100.0;
        println!("Void samples: {} ({:.1}%)", void_samples, void_pct);
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
