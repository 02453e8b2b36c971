//! Error types for the hgtfile library.

use std::path::PathBuf;
use thiserror::Error;

use crate::sample::SampleFormat;

/// Errors that can occur when decoding HGT tiles.
#[derive(Error, Debug)]
pub enum HgtError {
    /// IO error when reading the tile stream (short read, failed seek).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File name does not follow the `[N|S]DD[E|W]DDD` tile convention.
    #[error("Malformed tile name: {name} (expected e.g. N35E138.hgt)")]
    MalformedTileName { name: String },

    /// File size doesn't match a 1201×1201 or 3601×3601 grid of 16-bit samples.
    #[error("Unsupported grid size: {size} bytes (expected 2884802 for 1201x1201 or 25934402 for 3601x3601)")]
    UnsupportedGridSize { size: u64 },

    /// The decoder has no implementation for this sample encoding.
    #[error("Unsupported sample format: {format:?} with {bits_per_sample} bits per sample")]
    UnsupportedSampleFormat {
        format: SampleFormat,
        bits_per_sample: u16,
    },

    /// A read of `len` bytes at `offset` would run past the end of the buffer.
    #[error("Buffer underrun: {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
    BufferUnderrun {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// Coordinates fall outside the tile's geographic extent.
    #[error("Coordinates out of tile bounds: lat={lat}, lon={lon}")]
    OutOfBounds { lat: f64, lon: f64 },

    /// The tile file was not found.
    #[error("HGT file not found: {path}")]
    FileNotFound { path: PathBuf },
}

/// Result type alias using [`HgtError`].
pub type Result<T> = std::result::Result<T, HgtError>;
