pub mod batch;
pub mod extract;
pub mod info;
pub mod list;
pub mod query;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve a tile argument to a file path.
///
/// Anything ending in `.hgt` is taken as a path; a bare tile name such as
/// `N08E003` is looked up in the data directory.
pub fn resolve_tile(data_dir: Option<&Path>, tile: &str) -> Result<PathBuf> {
    let path = if tile.to_ascii_lowercase().ends_with(".hgt") {
        PathBuf::from(tile)
    } else {
        require_data_dir(data_dir)?.join(format!("{}.hgt", tile))
    };

    if !path.exists() {
        bail!("Tile not found: {}", path.display());
    }
    Ok(path)
}

/// The configured data directory, or an error explaining how to set it.
pub fn require_data_dir(data_dir: Option<&Path>) -> Result<&Path> {
    data_dir.context("No data directory configured. Use --data-dir or set HGT_DATA_DIR")
}
