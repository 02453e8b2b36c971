//! HGT tile naming.
//!
//! Tiles follow the naming convention `{N|S}{lat}{E|W}{lon}.hgt`:
//!
//! - Latitude: 2 digits with N/S prefix (e.g., N08, S12)
//! - Longitude: 3 digits with E/W prefix (e.g., E003, W077)
//!
//! The name encodes the **southwest corner** of the 1° × 1° tile.

use std::path::Path;

use crate::error::{HgtError, Result};

/// Build the tile filename for a southwest corner given in whole degrees.
///
/// # Examples
///
/// ```
/// use hgtfile::filename::tile_name;
///
/// assert_eq!(tile_name(8, 3), "N08E003.hgt");
/// assert_eq!(tile_name(-13, -78), "S13W078.hgt");
/// ```
pub fn tile_name(lat: i32, lon: i32) -> String {
    let lat_prefix = if lat >= 0 { 'N' } else { 'S' };
    let lon_prefix = if lon >= 0 { 'E' } else { 'W' };

    format!(
        "{}{:02}{}{:03}.hgt",
        lat_prefix,
        lat.abs(),
        lon_prefix,
        lon.abs()
    )
}

/// Name of the tile containing a coordinate in decimal degrees.
///
/// # Examples
///
/// ```
/// use hgtfile::filename::lat_lon_to_filename;
///
/// assert_eq!(lat_lon_to_filename(8.15, 3.15), "N08E003.hgt");
/// assert_eq!(lat_lon_to_filename(-12.3, -77.1), "S13W078.hgt");
/// assert_eq!(lat_lon_to_filename(0.5, -0.5), "N00W001.hgt");
/// ```
pub fn lat_lon_to_filename(lat: f64, lon: f64) -> String {
    tile_name(lat.floor() as i32, lon.floor() as i32)
}

/// Parse a tile name into the (latitude, longitude) of its southwest corner.
///
/// Directory components and the extension are ignored; the remaining stem
/// must be exactly `[NS]DD[EW]DDD` (letters in either case).
///
/// # Errors
///
/// Returns [`HgtError::MalformedTileName`] when the stem does not match.
///
/// # Examples
///
/// ```
/// use hgtfile::filename::parse_tile_name;
///
/// assert_eq!(parse_tile_name("N08E003.hgt").unwrap(), (8, 3));
/// assert_eq!(parse_tile_name("/data/S12W077.hgt").unwrap(), (-12, -77));
/// assert!(parse_tile_name("invalid.hgt").is_err());
/// ```
pub fn parse_tile_name(filename: &str) -> Result<(i32, i32)> {
    let malformed = || HgtError::MalformedTileName {
        name: filename.to_string(),
    };

    // Windows separators are not path separators on unix hosts
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(malformed)?;

    let bytes = stem.as_bytes();
    if bytes.len() != 7 {
        return Err(malformed());
    }

    let lat_sign = match bytes[0] {
        b'N' | b'n' => 1,
        b'S' | b's' => -1,
        _ => return Err(malformed()),
    };
    let lon_sign = match bytes[3] {
        b'E' | b'e' => 1,
        b'W' | b'w' => -1,
        _ => return Err(malformed()),
    };

    let lat = parse_degrees(&bytes[1..3]).ok_or_else(malformed)?;
    let lon = parse_degrees(&bytes[4..7]).ok_or_else(malformed)?;
    if lat > 90 || lon > 180 {
        return Err(malformed());
    }

    Ok((lat * lat_sign, lon * lon_sign))
}

fn parse_degrees(digits: &[u8]) -> Option<i32> {
    digits.iter().try_fold(0i32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + i32::from(b - b'0'))
    })
}
