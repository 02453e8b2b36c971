//! # hgtfile - SRTM HGT raster decoding
//!
//! Random-access decoder for SRTM (Shuttle Radar Topography Mission) `.hgt`
//! tiles. It reads single points, whole grids, or only the scanlines that a
//! geographic bounding box needs, and returns geo-referenced height maps.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hgtfile::{BoundingBox, HgtFile};
//!
//! # fn main() -> hgtfile::Result<()> {
//! let mut tile = HgtFile::open("/data/N08E003.hgt")?;
//! let metadata = tile.parse_metadata()?;
//!
//! // Raw sample at column 0, row 0 (north-west corner)
//! let corner = tile.elevation_at_point(&metadata, 0, 0)?;
//! println!("north-west corner: {corner}m");
//!
//! // Only the scanlines covering the box are read
//! let bbox = BoundingBox::new(3.1, 3.2, 8.1, 8.2);
//! let map = tile.height_map_in_bbox(&bbox, &metadata, f32::MIN)?;
//! println!("{}x{} samples, {}..{}m", map.width, map.height, map.minimum, map.maximum);
//! # Ok(())
//! # }
//! ```
//!
//! ## HGT Data Format
//!
//! - **SRTM1**: 3601×3601 samples, 1 arc-second (~30m) resolution
//! - **SRTM3**: 1201×1201 samples, 3 arc-second (~90m) resolution
//!
//! Each sample is a 16-bit big-endian signed integer, rows run north to
//! south. There is no header; the grid size follows from the file size and
//! the position from the file name (`N08E003.hgt` is the tile whose
//! southwest corner is 8°N 3°E).
//!
//! ## No-data
//!
//! Samples at or above [`NO_DATA_THRESHOLD`] are replaced by a fallback
//! value and left out of a height map's minimum and maximum.

pub mod error;
pub mod filename;
pub mod heightmap;
pub mod metadata;
pub mod reader;
pub mod sample;

// Re-export main types at crate root for convenience
pub use error::{HgtError, Result};
pub use heightmap::{BoundingBox, GeoPoint, HeightMap, HeightMapBuilder, NO_DATA_THRESHOLD};
pub use metadata::{FileMetadata, HgtResolution, PixelWindow};
pub use reader::{HgtFile, FULL_GRID_NO_DATA};
pub use sample::SampleFormat;
