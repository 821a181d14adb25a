use clap::{Parser, Subcommand, ValueEnum};
use geoviz_core::config::{parse_tolerance, parse_wrap_samples};
use std::path::PathBuf;

/// GeoViz - Geometry conversion and extent reprojection for geographic plots
#[derive(Parser, Debug)]
#[command(name = "geoviz")]
#[command(about = "Geometry conversion and extent reprojection for geographic plots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to geoviz.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reproject a bounding box between coordinate reference systems
    Extent(ExtentArgs),

    /// Parse a proj4 string into a projection
    ParseProj(ParseProjArgs),

    /// Convert a columnar feature table into GeoJSON features
    Convert(ConvertArgs),

    /// Flatten a GeoJSON geometry into NaN-delimited coordinate rows
    ToArray(ToArrayArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Parser, Debug)]
pub struct ExtentArgs {
    #[arg(allow_negative_numbers = true)]
    pub min_x: f64,
    #[arg(allow_negative_numbers = true)]
    pub min_y: f64,
    #[arg(allow_negative_numbers = true)]
    pub max_x: f64,
    #[arg(allow_negative_numbers = true)]
    pub max_y: f64,

    /// Source CRS ("EPSG:<code>" or a proj4 string)
    #[arg(long)]
    pub src: Option<String>,

    /// Destination CRS ("EPSG:<code>" or a proj4 string)
    #[arg(long)]
    pub dest: Option<String>,

    /// Inward shrink applied to every side of the box
    #[arg(long, value_parser = parse_tolerance)]
    pub tolerance: Option<f64>,

    /// Number of samples when wrapping a cylindrical x range
    #[arg(long, value_parser = parse_wrap_samples)]
    pub wrap_samples: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct ParseProjArgs {
    /// The proj4 string, e.g. "+proj=tmerc +lon_0=3 +k=0.9996"
    #[arg(allow_hyphen_values = true)]
    pub proj4: String,
}

/// Element type the coordinates describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Element {
    /// Open paths, assembled into (Multi)LineStrings
    Path,
    /// Closed rings, assembled into (Multi)Polygons
    Polygons,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Path to the feature table JSON file
    pub path: PathBuf,

    /// Element type of the features
    #[arg(long, value_enum, default_value = "path")]
    pub element: Element,

    /// Keep rings with fewer than three vertices as lines
    #[arg(long)]
    pub degrade: bool,
}

#[derive(Parser, Debug)]
pub struct ToArrayArgs {
    /// Path to a GeoJSON geometry file
    pub path: PathBuf,
}
