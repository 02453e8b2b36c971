use anyhow::{Context, Result};
use hgtfile::{filename::lat_lon_to_filename, HgtFile, NO_DATA_THRESHOLD};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::require_data_dir;

pub fn run(
    data_dir: Option<PathBuf>,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
) -> Result<()> {
    let dir = require_data_dir(data_dir.as_deref())?;

    let file = File::open(&input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let mut coords = Vec::with_capacity(records.len());
    for record in &records {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .parse()
            .context("Invalid latitude")?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .parse()
            .context("Invalid longitude")?;
        coords.push((lat, lon));
    }

    let pb = ProgressBar::new(coords.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let elevations = lookup_grouped_by_tile(dir, &coords, || pb.inc(1));
    pb.finish_with_message("done");

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    for (record, elevation) in records.iter().zip(&elevations) {
        let elevation = elevation
            .map(|e| e.to_string())
            .unwrap_or_else(|| "void".to_string());
        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;
    }
    writer.flush()?;

    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_elevation.csv", stem))
}

/// Look up every coordinate, opening each tile only once.
///
/// Results keep input order; missing tiles, unreadable tiles, and no-data
/// samples yield `None`.
fn lookup_grouped_by_tile(
    dir: &Path,
    coords: &[(f64, f64)],
    mut on_done: impl FnMut(),
) -> Vec<Option<f32>> {
    let mut results = vec![None; coords.len()];

    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, &(lat, lon)) in coords.iter().enumerate() {
        groups
            .entry(lat_lon_to_filename(lat, lon))
            .or_default()
            .push(i);
    }

    for (filename, indices) in groups {
        let opened = HgtFile::open(dir.join(&filename)).and_then(|tile| {
            let metadata = tile.parse_metadata()?;
            Ok((tile, metadata))
        });
        let (mut tile, metadata) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                tracing::warn!(tile = %filename, error = %e, "tile unavailable");
                for _ in &indices {
                    on_done();
                }
                continue;
            }
        };

        for i in indices {
            let (lat, lon) = coords[i];
            match tile.elevation_at(&metadata, lat, lon) {
                Ok(v) if v < NO_DATA_THRESHOLD => results[i] = Some(v),
                Ok(_) => {}
                Err(e) => tracing::debug!(lat, lon, error = %e, "lookup failed"),
            }
            on_done();
        }
    }

    results
}
