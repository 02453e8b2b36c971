use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hgtfile::{BoundingBox, HgtFile};
use tempfile::TempDir;

const SRTM3_SAMPLES: usize = 1201;
const SRTM3_SIZE: usize = SRTM3_SAMPLES * SRTM3_SAMPLES * 2;

/// Create a synthetic SRTM3 tile with a simple elevation gradient.
fn create_tile(dir: &std::path::Path, filename: &str) -> std::path::PathBuf {
    let mut data = vec![0u8; SRTM3_SIZE];
    for row in 0..SRTM3_SAMPLES {
        for col in 0..SRTM3_SAMPLES {
            let elev = ((row + col) % 4000) as i16;
            let offset = (row * SRTM3_SAMPLES + col) * 2;
            data[offset..offset + 2].copy_from_slice(&elev.to_be_bytes());
        }
    }
    let path = dir.join(filename);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&data).unwrap();
    path
}

fn bench_point(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "N08E003.hgt");
    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();

    c.bench_function("point_lookup", |b| {
        b.iter(|| {
            black_box(
                tile.elevation_at_point(&metadata, black_box(600), black_box(600))
                    .unwrap(),
            );
        });
    });
}

fn bench_window(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "N08E003.hgt");
    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();
    let bbox = BoundingBox::new(3.1, 3.2, 8.1, 8.2);

    c.bench_function("window_0.1deg", |b| {
        b.iter(|| {
            black_box(
                tile.height_map_in_bbox(black_box(&bbox), &metadata, f32::MIN)
                    .unwrap(),
            );
        });
    });
}

fn bench_full_grid(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let path = create_tile(tmp.path(), "N08E003.hgt");
    let mut tile = HgtFile::open(&path).unwrap();
    let metadata = tile.parse_metadata().unwrap();

    let mut group = c.benchmark_group("full_grid");
    group.sample_size(10);
    group.bench_function("srtm3", |b| {
        b.iter(|| {
            black_box(tile.height_map(&metadata).unwrap());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_point, bench_window, bench_full_grid);
criterion_main!(benches);
