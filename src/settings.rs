use clap::{Parser, ValueEnum};
use point_chunk_lib::{Bisection, ChunkerConfig, DEFAULT_LEAF_AREA_THRESHOLD};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Point Chunker - Split point-cloud extents into grid-aligned tiles
pub struct Settings {
    /// XYZ point files to chunk (one `x y [z]` point per line)
    #[clap(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Grid cell size, in source units
    #[clap(short, long, default_value = "1.0")]
    pub cell_size: f64,

    /// Target number of cells per leaf tile group
    #[clap(short, long, default_value = "16")]
    pub group_size: usize,

    /// Outer extent as `minx,miny,maxx,maxy` (default: bounding box of the points)
    #[clap(long, value_name = "MINX,MINY,MAXX,MAXY", value_parser = parse_extent)]
    pub bounds: Option<[f64; 4]>,

    /// Spatial reference WKT, copied to the output unchanged
    #[clap(long, default_value = "")]
    pub srs: String,

    /// Chunks with an area below this are tiled instead of split
    #[clap(long, default_value_t = DEFAULT_LEAF_AREA_THRESHOLD)]
    pub leaf_area_threshold: f64,

    /// How the y bisection point of a chunk is computed
    #[clap(long, value_enum, default_value_t = BisectionArg::YRange)]
    pub bisection: BisectionArg,

    /// Worker threads (0 = one per CPU, 1 = run inline)
    #[clap(short = 'j', long, default_value = "0")]
    pub threads: usize,

    /// What to write to stdout
    #[clap(long, value_enum, default_value_t = OutputMode::Tiles)]
    pub output: OutputMode,

    /// Write a Chrome trace of the run to this file
    #[cfg(feature = "profiling")]
    #[clap(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectionArg {
    /// Split the y axis at the middle of the y range
    YRange,
    /// Offset miny by half the x range (matches older tile layouts)
    LegacyXRange,
}

impl From<BisectionArg> for Bisection {
    fn from(arg: BisectionArg) -> Self {
        match arg {
            BisectionArg::YRange => Bisection::YRange,
            BisectionArg::LegacyXRange => Bisection::LegacyXRange,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One JSON tile extent per line
    Tiles,
    /// One JSON leaf record (extent and grid span) per line
    Leaves,
    /// Only a summary line
    Summary,
}

impl Settings {
    pub fn chunker_config(&self) -> ChunkerConfig {
        ChunkerConfig {
            leaf_area_threshold: self.leaf_area_threshold,
            bisection: self.bisection.into(),
        }
    }
}

fn parse_extent(value: &str) -> Result<[f64; 4], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [minx, miny, maxx, maxy] = parts.as_slice() else {
        return Err(format!("expected 4 comma-separated numbers, got {}", parts.len()));
    };

    let mut extent = [0.0; 4];
    for (slot, part) in extent.iter_mut().zip([minx, miny, maxx, maxy]) {
        *slot = part
            .parse()
            .map_err(|err| format!("invalid number {part:?}: {err}"))?;
    }
    Ok(extent)
}
