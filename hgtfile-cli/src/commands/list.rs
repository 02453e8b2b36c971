use anyhow::{bail, Context, Result};
use hgtfile::{FileMetadata, HgtResolution};
use std::fs;
use std::path::PathBuf;

use super::require_data_dir;

pub fn run(data_dir: Option<PathBuf>) -> Result<()> {
    let dir = require_data_dir(data_dir.as_deref())?;

    if !dir.exists() {
        bail!("Data directory does not exist: {}", dir.display());
    }

    let mut tiles: Vec<_> = fs::read_dir(dir)
        .context("Failed to read data directory")?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|e| e.eq_ignore_ascii_case("hgt"))
                .unwrap_or(false)
        })
        .collect();

    if tiles.is_empty() {
        println!("No .hgt files found in: {}", dir.display());
        return Ok(());
    }

    tiles.sort_by_key(|e| e.file_name());

    let mut srtm1_count = 0;
    let mut srtm3_count = 0;
    let mut invalid_count = 0;

    println!("{:<12} {:>8} {:>26}", "TILE", "TYPE", "COVERAGE");
    println!("{}", "-".repeat(48));

    for entry in &tiles {
        let filename = entry.file_name().to_string_lossy().into_owned();
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        match FileMetadata::derive(&filename, size) {
            Ok(metadata) => {
                let kind = match metadata.resolution {
                    HgtResolution::Srtm1 => {
                        srtm1_count += 1;
                        "SRTM1"
                    }
                    HgtResolution::Srtm3 => {
                        srtm3_count += 1;
                        "SRTM3"
                    }
                };
                let extent = metadata.extent();
                let coverage = format!(
                    "lat {}..{}, lon {}..{}",
                    extent.y_min, extent.y_max, extent.x_min, extent.x_max
                );
                println!("{:<12} {:>8} {:>26}", filename, kind, coverage);
            }
            Err(e) => {
                invalid_count += 1;
                tracing::debug!(file = %filename, error = %e, "skipping invalid tile");
                println!("{:<12} {:>8} {:>26}", filename, "invalid", e);
            }
        }
    }

    println!();
    println!("Summary:");
    println!("  Total files: {}", tiles.len());
    if srtm1_count > 0 {
        println!("  SRTM1 (30m): {}", srtm1_count);
    }
    if srtm3_count > 0 {
        println!("  SRTM3 (90m): {}", srtm3_count);
    }
    if invalid_count > 0 {
        println!("  Invalid: {}", invalid_count);
    }
    println!("  Data directory: {}", dir.display());

    Ok(())
}
