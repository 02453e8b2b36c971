use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// SRTM .hgt tile inspection and extraction tool
#[derive(Parser)]
#[command(name = "hgtfile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing .hgt files
    #[arg(short, long, env = "HGT_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Value written for no-data samples in extracts
    #[arg(
        long,
        env = "HGT_NO_DATA",
        default_value_t = -32768.0,
        allow_negative_numbers = true,
        global = true
    )]
    no_data: f32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display metadata and elevation range of a tile
    Info {
        /// Path to .hgt file, or tile name (e.g., N08E003)
        tile: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Query the elevation of a single sample
    Query {
        /// Path to .hgt file or tile name; derived from --lat/--lon if omitted
        tile: Option<String>,

        /// Latitude in decimal degrees
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Column index (0 = west edge)
        #[arg(short, long, requires = "y", conflicts_with_all = ["lat", "lon"])]
        x: Option<usize>,

        /// Row index (0 = north edge)
        #[arg(short, long, requires = "x", conflicts_with_all = ["lat", "lon"])]
        y: Option<usize>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Extract the height map covering a bounding box
    Extract {
        /// Path to .hgt file, or tile name (e.g., N08E003)
        tile: String,

        /// Southern boundary latitude
        #[arg(long, allow_negative_numbers = true)]
        min_lat: f64,

        /// Northern boundary latitude
        #[arg(long, allow_negative_numbers = true)]
        max_lat: f64,

        /// Western boundary longitude
        #[arg(long, allow_negative_numbers = true)]
        min_lon: f64,

        /// Eastern boundary longitude
        #[arg(long, allow_negative_numbers = true)]
        max_lon: f64,

        /// Output file (.csv or .json); CSV on stdout if not specified
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up elevations for coordinates in a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (<input>_elevation.csv if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },

    /// List available .hgt tiles
    List,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hgtfile=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { tile, json } => commands::info::run(cli.data_dir, tile, json),
        Commands::Query {
            tile,
            lat,
            lon,
            x,
            y,
            json,
        } => commands::query::run(cli.data_dir, tile, lat.zip(lon), x.zip(y), json),
        Commands::Extract {
            tile,
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            output,
        } => commands::extract::run(
            cli.data_dir,
            tile,
            hgtfile::BoundingBox::new(min_lon, max_lon, min_lat, max_lat),
            cli.no_data,
            output,
        ),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(cli.data_dir, input, output, lat_col, lon_col),
        Commands::List => commands::list::run(cli.data_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_extract_with_negative_coords() {
        let cli = Cli::try_parse_from([
            "hgtfile",
            "extract",
            "S12W077",
            "--min-lat",
            "-11.6",
            "--max-lat",
            "-11.3",
            "--min-lon",
            "-76.7",
            "--max-lon",
            "-76.45",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract {
                min_lat, max_lon, ..
            } => {
                assert_eq!(min_lat, -11.6);
                assert_eq!(max_lon, -76.45);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn query_pixel_conflicts_with_coordinates() {
        let result = Cli::try_parse_from([
            "hgtfile", "query", "N08E003", "--lat", "8.5", "--lon", "3.5", "-x", "1", "-y", "2",
        ]);
        assert!(result.is_err());
    }
}
