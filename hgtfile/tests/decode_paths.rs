use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use hgtfile::filename::tile_name;
use hgtfile::{BoundingBox, HgtError, HgtFile, HgtResolution};
use tempfile::TempDir;

/// Write a synthetic tile of `samples`² where each sample is `f(row, col)`.
fn create_tile(
    dir: &Path,
    name: &str,
    samples: usize,
    f: impl Fn(usize, usize) -> i16,
) -> PathBuf {
    let mut data = Vec::with_capacity(samples * samples * 2);
    for row in 0..samples {
        for col in 0..samples {
            data.extend_from_slice(&f(row, col).to_be_bytes());
        }
    }
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(&data).unwrap();
    path
}

fn terrain(row: usize, col: usize) -> i16 {
    // Includes negative depths and a void every 97 samples
    let idx = row * 1201 + col;
    if idx % 97 == 0 {
        -32768
    } else {
        ((row as i32 * 7 - col as i32 * 3) % 3000) as i16
    }
}

#[test]
fn full_extent_window_matches_full_grid() {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "N08E003.hgt", 1201, terrain);

    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();

    let full = tile.height_map(&metadata).unwrap();
    let window = tile
        .height_map_in_bbox(&metadata.extent(), &metadata, f32::MIN)
        .unwrap();

    assert_eq!(window.width, full.width);
    assert_eq!(window.height, full.height);
    assert_eq!(window.coordinates, full.coordinates);
    assert_eq!(window.minimum, full.minimum);
    assert_eq!(window.maximum, full.maximum);
}

#[test]
fn sub_window_matches_full_grid_region() {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "S12W077.hgt", 1201, terrain);

    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();
    let full = tile.height_map(&metadata).unwrap();

    let bbox = BoundingBox::new(-76.7, -76.45, -11.6, -11.3);
    let pixels = metadata.pixel_window(&bbox);
    let window = tile.height_map_in_bbox(&bbox, &metadata, f32::MIN).unwrap();

    assert_eq!(window.width, pixels.width());
    assert_eq!(window.height, pixels.height());
    for row in 0..window.height {
        for col in 0..window.width {
            let expected = full
                .get(pixels.y_start + row, pixels.x_start + col)
                .unwrap();
            assert_eq!(window.get(row, col).unwrap(), expected);
        }
    }
}

#[test]
fn point_lookup_matches_grid() {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "N08E003.hgt", 1201, terrain);

    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();
    let full = tile.height_map(&metadata).unwrap();

    for (x, y) in [(1, 0), (1200, 1200), (333, 777), (1200, 1)] {
        let point = tile.elevation_at_point(&metadata, x, y).unwrap();
        assert_eq!(point, full.get(y, x).unwrap().elevation);
    }
}

#[test]
fn srtm1_tile() {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "N35E138.hgt", 3601, |row, col| {
        ((row + col) % 4000) as i16
    });

    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();
    assert_eq!(metadata.resolution, HgtResolution::Srtm1);
    assert_eq!(metadata.scanline_size, 7202);

    assert_eq!(tile.elevation_at_point(&metadata, 3600, 3600).unwrap(), 3200.0);

    let bbox = BoundingBox::new(138.5, 138.51, 35.5, 35.51);
    let map = tile.height_map_in_bbox(&bbox, &metadata, f32::MIN).unwrap();
    assert_eq!(map.count, map.width * map.height);
    assert!(map.width > 30 && map.width < 40);
}

#[test]
fn independent_tiles_decode_in_parallel() {
    let tmp = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..4)
        .map(|i| {
            create_tile(tmp.path(), &tile_name(8, 3 + i), 1201, move |_, _| {
                (i * 100) as i16
            })
        })
        .collect();

    let handles: Vec<_> = paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| {
            thread::spawn(move || {
                let mut tile = HgtFile::open(&path).unwrap();
                let metadata = tile.parse_metadata().unwrap();
                let map = tile
                    .height_map_in_bbox(
                        &BoundingBox::new(
                            metadata.origin_longitude as f64 + 0.2,
                            metadata.origin_longitude as f64 + 0.4,
                            8.2,
                            8.4,
                        ),
                        &metadata,
                        f32::MIN,
                    )
                    .unwrap();
                (i, map.minimum, map.maximum)
            })
        })
        .collect();

    for handle in handles {
        let (i, min, max) = handle.join().unwrap();
        assert_eq!(min, (i * 100) as f32);
        assert_eq!(max, (i * 100) as f32);
    }
}

#[test]
fn malformed_tile_name_on_disk() {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "elevation.hgt", 1201, terrain);

    let tile = HgtFile::open(&path).unwrap();
    assert!(matches!(
        tile.parse_metadata(),
        Err(HgtError::MalformedTileName { .. })
    ));
}
