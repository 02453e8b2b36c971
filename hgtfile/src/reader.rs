//! Random-access reading of HGT tiles.
//!
//! This module provides [`HgtFile`], which owns the byte stream of one tile
//! and decodes points, whole grids, or bounding-box windows from it.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{HgtError, Result};
use crate::heightmap::{BoundingBox, HeightMap, HeightMapBuilder};
use crate::metadata::{FileMetadata, PixelWindow};
use crate::sample::decode_sample;

/// No-data fallback used by [`HgtFile::height_map`].
pub const FULL_GRID_NO_DATA: f32 = 0.0;

const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// An open HGT tile.
///
/// Every decode call seeks explicitly before reading, so calls are
/// independent of each other. They take `&mut self` because they move the
/// stream position; share a tile between threads behind a mutex or open one
/// `HgtFile` per worker. The stream is closed when the value is dropped.
///
/// # Example
///
/// ```no_run
/// use hgtfile::{BoundingBox, HgtFile};
///
/// # fn main() -> hgtfile::Result<()> {
/// let mut tile = HgtFile::open("/data/N08E003.hgt")?;
/// let metadata = tile.parse_metadata()?;
///
/// let corner = tile.elevation_at_point(&metadata, 0, 0)?;
/// println!("north-west corner: {corner}m");
/// let window = tile.height_map_in_bbox(
///     &BoundingBox::new(3.1, 3.2, 8.1, 8.2),
///     &metadata,
///     f32::MIN,
/// )?;
/// println!("{} samples, {}..{}m", window.count, window.minimum, window.maximum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HgtFile<R = File> {
    /// Tile file name, used to derive geo-referencing
    name: String,
    /// Byte stream over the tile body
    reader: R,
    /// Total length of the stream in bytes
    byte_len: u64,
}

impl HgtFile<File> {
    /// Open a `.hgt` file read-only.
    ///
    /// # Errors
    ///
    /// Returns [`HgtError::FileNotFound`] if the file does not exist, or
    /// [`HgtError::Io`] for any other failure to open or stat it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => HgtError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => HgtError::Io(e),
        })?;
        let byte_len = file.metadata()?.len();

        debug!(path = %path.display(), byte_len, "opened hgt file");

        Ok(Self {
            name: path.to_string_lossy().into_owned(),
            reader: file,
            byte_len,
        })
    }
}

impl<R: Read + Seek> HgtFile<R> {
    /// Wrap an arbitrary seekable stream holding a tile body.
    ///
    /// `name` must follow the tile naming convention; it is only used for
    /// metadata derivation.
    pub fn from_reader(name: impl Into<String>, mut reader: R) -> Result<Self> {
        let byte_len = reader.seek(SeekFrom::End(0))?;
        reader.rewind()?;

        Ok(Self {
            name: name.into(),
            reader,
            byte_len,
        })
    }

    /// Tile name this file was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the underlying stream in bytes.
    pub fn byte_len(&self) -> u64 {
        self.byte_len
    }

    /// Derive the tile's [`FileMetadata`] from its name and length.
    pub fn parse_metadata(&self) -> Result<FileMetadata> {
        FileMetadata::derive(&self.name, self.byte_len)
    }

    /// Read the raw sample at column `x` of scanline `y`.
    ///
    /// Nothing is cached: each call seeks and reads the whole scanline.
    ///
    /// # Errors
    ///
    /// - [`HgtError::Io`] if scanline `y` lies past the end of the stream.
    /// - [`HgtError::BufferUnderrun`] if column `x` lies past the scanline.
    /// - [`HgtError::UnsupportedSampleFormat`] for formats the decoder lacks.
    pub fn elevation_at_point(
        &mut self,
        metadata: &FileMetadata,
        x: usize,
        y: usize,
    ) -> Result<f32> {
        let mut scanline = vec![0u8; metadata.scanline_size];
        self.seek_scanline(metadata, y)?;
        self.reader.read_exact(&mut scanline)?;

        decode_sample(
            &scanline,
            x,
            metadata.bytes_per_sample(),
            metadata.sample_format,
            HOST_IS_LITTLE_ENDIAN,
        )
    }

    /// Elevation of the pixel nearest to a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`HgtError::OutOfBounds`] if the coordinate is not inside this
    /// tile, otherwise the errors of [`Self::elevation_at_point`].
    pub fn elevation_at(&mut self, metadata: &FileMetadata, lat: f64, lon: f64) -> Result<f32> {
        let (x, y) = metadata.pixel_at(lat, lon)?;
        self.elevation_at_point(metadata, x, y)
    }

    /// Decode the whole grid.
    ///
    /// No-data samples are stored as [`FULL_GRID_NO_DATA`].
    pub fn height_map(&mut self, metadata: &FileMetadata) -> Result<HeightMap> {
        let window = PixelWindow {
            x_start: 0,
            x_end: metadata.width.saturating_sub(1),
            y_start: 0,
            y_end: metadata.height.saturating_sub(1),
        };
        self.decode_window(metadata, window, FULL_GRID_NO_DATA)
    }

    /// Decode the pixels covering `bbox`.
    ///
    /// The window is computed by [`FileMetadata::pixel_window`] and clamped to
    /// the grid, so the returned map's `bounding_box` describes the pixels
    /// actually decoded rather than echoing `bbox`. No-data samples are
    /// stored as `no_data_fallback`.
    pub fn height_map_in_bbox(
        &mut self,
        bbox: &BoundingBox,
        metadata: &FileMetadata,
        no_data_fallback: f32,
    ) -> Result<HeightMap> {
        let window = metadata.pixel_window(bbox);
        self.decode_window(metadata, window, no_data_fallback)
    }

    /// Consume the tile and return the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn seek_scanline(&mut self, metadata: &FileMetadata, y: usize) -> Result<()> {
        let offset = (y as u64)
            .checked_mul(metadata.scanline_size as u64)
            .ok_or_else(|| {
                io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("scanline {y} is beyond any addressable offset"),
                )
            })?;
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn decode_window(
        &mut self,
        metadata: &FileMetadata,
        window: PixelWindow,
        no_data_fallback: f32,
    ) -> Result<HeightMap> {
        let mut builder = HeightMapBuilder::new(window.width(), window.height(), no_data_fallback);
        if window.is_empty() {
            debug!(?window, "empty pixel window, nothing to decode");
            return Ok(builder.finish());
        }

        debug!(
            tile = %self.name,
            x_start = window.x_start,
            x_end = window.x_end,
            y_start = window.y_start,
            y_end = window.y_end,
            "decoding pixel window"
        );

        builder.set_bounding_box(BoundingBox::new(
            metadata.longitude_at(window.x_start),
            metadata.longitude_at(window.x_end),
            metadata.latitude_at(window.y_end),
            metadata.latitude_at(window.y_start),
        ));

        let bytes_per_sample = metadata.bytes_per_sample();
        let mut scanline = vec![0u8; metadata.scanline_size];

        // One seek, then scanlines are consecutive
        self.seek_scanline(metadata, window.y_start)?;
        for y in window.y_start..=window.y_end {
            self.reader.read_exact(&mut scanline)?;

            let latitude = metadata.latitude_at(y);
            for x in window.x_start..=window.x_end {
                let value = decode_sample(
                    &scanline,
                    x,
                    bytes_per_sample,
                    metadata.sample_format,
                    HOST_IS_LITTLE_ENDIAN,
                )?;
                builder.add_sample(latitude, metadata.longitude_at(x), value);
            }
        }
        trace!(samples = builder.len(), "pixel window decoded");

        Ok(builder.finish())
    }
}
