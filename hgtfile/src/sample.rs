//! Sample extraction from raw scanline bytes.
//!
//! HGT files store every sample big-endian. The decoder works on one
//! scanline buffer at a time and never indexes it directly: all access goes
//! through [`read_bytes`], which fails instead of panicking when a sample
//! would run past the end of the buffer.

use crate::error::{HgtError, Result};

/// Numeric encoding of a raster sample.
///
/// Discriminants match the TIFF `SampleFormat` tag so metadata coming from
/// other raster containers can be mapped with [`SampleFormat::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned integer samples
    UnsignedInteger = 1,
    /// Two's complement signed integer samples (HGT)
    Integer = 2,
    /// IEEE floating point samples
    FloatingPoint = 3,
    /// Undefined data format
    Undefined = 4,
    /// Complex signed integer samples
    ComplexInteger = 5,
    /// Complex IEEE floating point samples
    ComplexFloatingPoint = 6,
}

impl SampleFormat {
    /// Map a TIFF `SampleFormat` tag value. Unknown values map to `None`.
    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(SampleFormat::UnsignedInteger),
            2 => Some(SampleFormat::Integer),
            3 => Some(SampleFormat::FloatingPoint),
            4 => Some(SampleFormat::Undefined),
            5 => Some(SampleFormat::ComplexInteger),
            6 => Some(SampleFormat::ComplexFloatingPoint),
            _ => None,
        }
    }
}

/// Borrow `len` bytes starting at `offset`.
///
/// # Errors
///
/// Returns [`HgtError::BufferUnderrun`] if `offset + len` exceeds `buf.len()`.
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let underrun = || HgtError::BufferUnderrun {
        offset,
        len,
        available: buf.len(),
    };
    let end = offset.checked_add(len).ok_or_else(underrun)?;
    buf.get(offset..end).ok_or_else(underrun)
}

/// Decode sample `sample_index` of a big-endian scanline.
///
/// When `host_is_little_endian` is set the sample bytes are reversed and
/// interpreted little-endian, otherwise they are interpreted as stored. Both
/// paths yield the same value for the same on-disk bytes.
///
/// # Errors
///
/// - [`HgtError::UnsupportedSampleFormat`] unless the format is 16-bit signed,
///   16-bit unsigned, or 32-bit floating point.
/// - [`HgtError::BufferUnderrun`] if the sample lies outside `scanline`.
///
/// # Examples
///
/// ```
/// use hgtfile::sample::{decode_sample, SampleFormat};
///
/// let scanline = [0x00, 0x0A, 0xFF, 0x9C];
/// assert_eq!(decode_sample(&scanline, 0, 2, SampleFormat::Integer, true).unwrap(), 10.0);
/// assert_eq!(decode_sample(&scanline, 1, 2, SampleFormat::Integer, false).unwrap(), -100.0);
/// ```
pub fn decode_sample(
    scanline: &[u8],
    sample_index: usize,
    bytes_per_sample: usize,
    sample_format: SampleFormat,
    host_is_little_endian: bool,
) -> Result<f32> {
    let unsupported = || HgtError::UnsupportedSampleFormat {
        format: sample_format,
        bits_per_sample: bytes_per_sample
            .checked_mul(8)
            .and_then(|bits| u16::try_from(bits).ok())
            .unwrap_or(u16::MAX),
    };

    match (sample_format, bytes_per_sample) {
        (SampleFormat::Integer, 2) => {
            let raw = sample_bytes::<2>(scanline, sample_index, host_is_little_endian)?;
            let value = if host_is_little_endian {
                i16::from_le_bytes(raw)
            } else {
                i16::from_be_bytes(raw)
            };
            Ok(f32::from(value))
        }
        (SampleFormat::UnsignedInteger, 2) => {
            let raw = sample_bytes::<2>(scanline, sample_index, host_is_little_endian)?;
            let value = if host_is_little_endian {
                u16::from_le_bytes(raw)
            } else {
                u16::from_be_bytes(raw)
            };
            Ok(f32::from(value))
        }
        (SampleFormat::FloatingPoint, 4) => {
            let raw = sample_bytes::<4>(scanline, sample_index, host_is_little_endian)?;
            Ok(if host_is_little_endian {
                f32::from_le_bytes(raw)
            } else {
                f32::from_be_bytes(raw)
            })
        }
        _ => Err(unsupported()),
    }
}

/// Copy out the `N` bytes of one sample, reversed when `reverse` is set.
fn sample_bytes<const N: usize>(
    scanline: &[u8],
    sample_index: usize,
    reverse: bool,
) -> Result<[u8; N]> {
    let offset = sample_index
        .checked_mul(N)
        .ok_or(HgtError::BufferUnderrun {
            offset: usize::MAX,
            len: N,
            available: scanline.len(),
        })?;
    let mut raw = [0u8; N];
    raw.copy_from_slice(read_bytes(scanline, offset, N)?);
    if reverse {
        raw.reverse();
    }
    Ok(raw)
}
