//! Geo-referencing and layout of an HGT tile.
//!
//! Everything about a tile's layout follows from two inputs: its file name
//! (which encodes the southwest corner) and its byte length (which selects
//! the grid size). [`FileMetadata::derive`] is a pure function of both.

use tracing::debug;

use crate::error::{HgtError, Result};
use crate::filename::parse_tile_name;
use crate::heightmap::BoundingBox;
use crate::sample::SampleFormat;

/// File size for SRTM1 (1 arc-second, ~30m resolution): 3601 × 3601 × 2 bytes
pub const SRTM1_SIZE: u64 = 3601 * 3601 * 2; // 25,934,402 bytes

/// File size for SRTM3 (3 arc-second, ~90m resolution): 1201 × 1201 × 2 bytes
pub const SRTM3_SIZE: u64 = 1201 * 1201 * 2; // 2,884,802 bytes

/// Number of samples per row/column for SRTM1
const SRTM1_SAMPLES: usize = 3601;

/// Number of samples per row/column for SRTM3
const SRTM3_SAMPLES: usize = 1201;

/// No-data sentinel written into HGT voids
pub const HGT_NO_DATA: &str = "-32768";

/// Resolution type of an HGT tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HgtResolution {
    /// SRTM1: 1 arc-second (~30m) resolution
    Srtm1,
    /// SRTM3: 3 arc-second (~90m) resolution
    Srtm3,
}

impl HgtResolution {
    /// Detect the resolution from a file's byte length.
    pub fn from_file_size(size: u64) -> Option<Self> {
        match size {
            SRTM1_SIZE => Some(HgtResolution::Srtm1),
            SRTM3_SIZE => Some(HgtResolution::Srtm3),
            _ => None,
        }
    }

    /// Returns the number of samples per row/column for this resolution.
    pub fn samples(&self) -> usize {
        match self {
            HgtResolution::Srtm1 => SRTM1_SAMPLES,
            HgtResolution::Srtm3 => SRTM3_SAMPLES,
        }
    }

    /// Returns the approximate resolution in meters.
    pub fn meters(&self) -> f64 {
        match self {
            HgtResolution::Srtm1 => 30.0,
            HgtResolution::Srtm3 => 90.0,
        }
    }
}

/// Inclusive pixel range selected from a tile.
///
/// A window whose start exceeds its end in either axis is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub x_start: usize,
    pub x_end: usize,
    pub y_start: usize,
    pub y_end: usize,
}

impl PixelWindow {
    pub fn is_empty(&self) -> bool {
        self.x_start > self.x_end || self.y_start > self.y_end
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.x_end - self.x_start + 1
        }
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.y_end - self.y_start + 1
        }
    }
}

/// Layout and geo-referencing of one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    /// File name the metadata was derived from.
    pub filename: String,
    pub resolution: HgtResolution,
    /// Columns per scanline.
    pub width: usize,
    /// Number of scanlines.
    pub height: usize,
    pub pixel_scale_x: f64,
    pub pixel_scale_y: f64,
    /// Signed step between columns (positive, west to east).
    pub pixel_size_x: f64,
    /// Signed step between rows (negative, north to south).
    pub pixel_size_y: f64,
    pub origin_longitude: i32,
    /// Northern edge of the tile (southwest corner latitude + 1).
    pub origin_latitude: i32,
    /// Latitude of the center of pixel (0, 0).
    pub start_lat: f64,
    /// Longitude of the center of pixel (0, 0).
    pub start_lon: f64,
    /// Bytes per row.
    pub scanline_size: usize,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    pub no_data_value: String,
}

impl FileMetadata {
    /// Derive the metadata of a tile from its name and byte length.
    ///
    /// # Errors
    ///
    /// - [`HgtError::UnsupportedGridSize`] if `file_len` is neither
    ///   [`SRTM3_SIZE`] nor [`SRTM1_SIZE`].
    /// - [`HgtError::MalformedTileName`] if the name is not `[NS]DD[EW]DDD`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtfile::metadata::{FileMetadata, SRTM3_SIZE};
    ///
    /// let metadata = FileMetadata::derive("N08E003.hgt", SRTM3_SIZE).unwrap();
    /// assert_eq!(metadata.width, 1201);
    /// assert_eq!(metadata.origin_latitude, 9);
    /// assert_eq!(metadata.origin_longitude, 3);
    /// assert_eq!(metadata.scanline_size, 2402);
    /// ```
    pub fn derive(filename: &str, file_len: u64) -> Result<Self> {
        let resolution = HgtResolution::from_file_size(file_len)
            .ok_or(HgtError::UnsupportedGridSize { size: file_len })?;
        let (sw_lat, sw_lon) = parse_tile_name(filename)?;

        let samples = resolution.samples();
        let pixel_scale_x = 1.0 / samples as f64;
        let pixel_scale_y = 1.0 / samples as f64;
        let pixel_size_x = pixel_scale_x;
        let pixel_size_y = -pixel_scale_y;

        // Row 0 is the north edge, one degree above the named corner
        let origin_latitude = sw_lat + 1;
        let origin_longitude = sw_lon;

        let bits_per_sample = 16;
        let metadata = Self {
            filename: filename.to_string(),
            resolution,
            width: samples,
            height: samples,
            pixel_scale_x,
            pixel_scale_y,
            pixel_size_x,
            pixel_size_y,
            origin_longitude,
            origin_latitude,
            start_lat: origin_latitude as f64 + pixel_size_y / 2.0,
            start_lon: origin_longitude as f64 + pixel_size_x / 2.0,
            scanline_size: samples * usize::from(bits_per_sample / 8),
            bits_per_sample,
            sample_format: SampleFormat::Integer,
            no_data_value: HGT_NO_DATA.to_string(),
        };

        debug!(
            filename,
            samples,
            origin_lat = metadata.origin_latitude,
            origin_lon = metadata.origin_longitude,
            "derived tile metadata"
        );

        Ok(metadata)
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    /// Latitude of the center of row `y`.
    pub fn latitude_at(&self, y: usize) -> f64 {
        self.start_lat + self.pixel_size_y * y as f64
    }

    /// Longitude of the center of column `x`.
    pub fn longitude_at(&self, x: usize) -> f64 {
        self.start_lon + self.pixel_size_x * x as f64
    }

    /// The one-degree cell this tile covers.
    pub fn extent(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin_longitude as f64,
            (self.origin_longitude + 1) as f64,
            (self.origin_latitude - 1) as f64,
            self.origin_latitude as f64,
        )
    }

    /// Pixel range covering `bbox`, clamped to the grid.
    ///
    /// The start of each axis is floored and the end ceiled, so the window
    /// always covers the requested area where it overlaps the tile. A box
    /// entirely off one side of the tile collapses onto the nearest edge.
    pub fn pixel_window(&self, bbox: &BoundingBox) -> PixelWindow {
        let y_start = ((bbox.y_max - self.start_lat) / self.pixel_size_y).floor();
        let y_end = ((bbox.y_min - self.start_lat) / self.pixel_size_y).ceil();
        let x_start = ((bbox.x_min - self.start_lon) / self.pixel_size_x).floor();
        let x_end = ((bbox.x_max - self.start_lon) / self.pixel_size_x).ceil();

        PixelWindow {
            x_start: clamp_index(x_start, self.width),
            x_end: clamp_index(x_end, self.width),
            y_start: clamp_index(y_start, self.height),
            y_end: clamp_index(y_end, self.height),
        }
    }

    /// Nearest pixel `(x, y)` to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`HgtError::OutOfBounds`] if the coordinate lies outside the
    /// tile's one-degree cell.
    pub fn pixel_at(&self, lat: f64, lon: f64) -> Result<(usize, usize)> {
        if !self.extent().contains(lat, lon) {
            return Err(HgtError::OutOfBounds { lat, lon });
        }

        let x = ((lon - self.start_lon) / self.pixel_size_x).round();
        let y = ((lat - self.start_lat) / self.pixel_size_y).round();

        Ok((clamp_index(x, self.width), clamp_index(y, self.height)))
    }
}

/// Clamp a floating pixel index to `[0, dimension - 1]`.
fn clamp_index(index: f64, dimension: usize) -> usize {
    let max = dimension.saturating_sub(1);
    if index.is_nan() || index <= 0.0 {
        0
    } else if index >= max as f64 {
        max
    } else {
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srtm3() -> FileMetadata {
        FileMetadata::derive("N08E003.hgt", SRTM3_SIZE).unwrap()
    }

    #[test]
    fn test_derive_srtm3() {
        let metadata = srtm3();

        assert_eq!(metadata.resolution, HgtResolution::Srtm3);
        assert_eq!(metadata.width, 1201);
        assert_eq!(metadata.height, 1201);
        assert_eq!(metadata.origin_latitude, 9);
        assert_eq!(metadata.origin_longitude, 3);
        assert_eq!(metadata.pixel_scale_x, 1.0 / 1201.0);
        assert_eq!(metadata.pixel_scale_y, 1.0 / 1201.0);
        assert_eq!(metadata.pixel_size_y, -1.0 / 1201.0);
        assert_eq!(metadata.scanline_size, 2402);
        assert_eq!(metadata.bits_per_sample, 16);
        assert_eq!(metadata.bytes_per_sample(), 2);
        assert_eq!(metadata.sample_format, SampleFormat::Integer);
        assert_eq!(metadata.no_data_value, "-32768");
        assert!((metadata.start_lat - (9.0 - 0.5 / 1201.0)).abs() < 1e-12);
        assert!((metadata.start_lon - (3.0 + 0.5 / 1201.0)).abs() < 1e-12);
    }

    #[test]
    fn test_derive_srtm1() {
        let metadata = FileMetadata::derive("S12W077.hgt", SRTM1_SIZE).unwrap();

        assert_eq!(metadata.resolution, HgtResolution::Srtm1);
        assert_eq!(metadata.width, 3601);
        assert_eq!(metadata.scanline_size, 7202);
        assert_eq!(metadata.origin_latitude, -11);
        assert_eq!(metadata.origin_longitude, -77);
        assert!(metadata.scanline_size as u64 * metadata.height as u64 <= SRTM1_SIZE);
    }

    #[test]
    fn test_derive_rejects_grid_size() {
        for size in [0, 1000, SRTM3_SIZE - 2, SRTM3_SIZE + 2, SRTM1_SIZE + 1] {
            match FileMetadata::derive("N08E003.hgt", size) {
                Err(HgtError::UnsupportedGridSize { size: s }) => assert_eq!(s, size),
                other => panic!("expected UnsupportedGridSize, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_derive_rejects_name() {
        let result = FileMetadata::derive("elevation.hgt", SRTM3_SIZE);
        assert!(matches!(result, Err(HgtError::MalformedTileName { .. })));
    }

    #[test]
    fn test_extent() {
        let extent = srtm3().extent();
        assert_eq!(extent, BoundingBox::new(3.0, 4.0, 8.0, 9.0));
    }

    #[test]
    fn test_pixel_window_inside_tile() {
        let metadata = srtm3();
        let window = metadata.pixel_window(&BoundingBox::new(3.1, 3.2, 8.1, 8.2));

        let expected_x_start = ((3.1 - metadata.start_lon) / metadata.pixel_size_x).floor() as usize;
        let expected_x_end = ((3.2 - metadata.start_lon) / metadata.pixel_size_x).ceil() as usize;
        let expected_y_start = ((8.2 - metadata.start_lat) / metadata.pixel_size_y).floor() as usize;
        let expected_y_end = ((8.1 - metadata.start_lat) / metadata.pixel_size_y).ceil() as usize;

        assert_eq!(window.x_start, expected_x_start);
        assert_eq!(window.x_end, expected_x_end);
        assert_eq!(window.y_start, expected_y_start);
        assert_eq!(window.y_end, expected_y_end);
        assert_eq!((window.x_start, window.x_end), (119, 240));
        assert_eq!((window.y_start, window.y_end), (960, 1081));
        assert_eq!(window.width(), 122);
        assert_eq!(window.height(), 122);
    }

    #[test]
    fn test_pixel_window_full_extent() {
        let metadata = srtm3();
        let window = metadata.pixel_window(&metadata.extent());
        assert_eq!(
            window,
            PixelWindow {
                x_start: 0,
                x_end: 1200,
                y_start: 0,
                y_end: 1200
            }
        );
    }

    #[test]
    fn test_pixel_window_outside_tile() {
        let metadata = srtm3();

        // East of the tile collapses onto the last column
        let east = metadata.pixel_window(&BoundingBox::new(5.0, 5.5, 8.2, 8.4));
        assert_eq!((east.x_start, east.x_end), (1200, 1200));
        assert_eq!(east.width(), 1);

        // North-west of the tile collapses onto the first row and column
        let north_west = metadata.pixel_window(&BoundingBox::new(1.0, 2.0, 10.0, 11.0));
        assert_eq!(north_west.width(), 1);
        assert_eq!(north_west.height(), 1);
        assert_eq!((north_west.x_start, north_west.y_start), (0, 0));
    }

    #[test]
    fn test_pixel_window_inverted_box_is_empty() {
        let metadata = srtm3();
        let window = metadata.pixel_window(&BoundingBox::new(3.6, 3.4, 8.5, 8.6));
        assert!(window.is_empty());
        assert_eq!(window.width(), 0);
    }

    #[test]
    fn test_pixel_at() {
        let metadata = srtm3();
        assert_eq!(metadata.pixel_at(9.0, 3.0).unwrap(), (0, 0));
        assert_eq!(metadata.pixel_at(8.0, 4.0).unwrap(), (1200, 1200));
        assert_eq!(
            metadata.pixel_at(metadata.latitude_at(600), metadata.longitude_at(300)).unwrap(),
            (300, 600)
        );
        assert!(matches!(
            metadata.pixel_at(7.5, 3.5),
            Err(HgtError::OutOfBounds { .. })
        ));
    }
}
