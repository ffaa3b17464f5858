mod logging;
mod settings;

use clap::Parser;
use geo::Point;
use point_chunk_lib::{
    Bounds, Chunk, Chunker, Extent, GridSpan, PointSetOracle, Scheduler, collect_leaves,
    flatten_once, source,
};
use serde::Serialize;
use settings::{OutputMode, Settings};
use std::error::Error;
use std::io::{BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

/// A leaf chunk as written to stdout
#[derive(Serialize)]
struct LeafRecord<'a> {
    extent: &'a Extent,
    span: &'a GridSpan,
}

/// Run summary, written to stdout in summary mode and logged otherwise
#[derive(Serialize)]
struct Summary<'a> {
    points: usize,
    bounds: &'a Extent,
    srs: &'a str,
    tiles: usize,
    depth: usize,
    elapsed_ms: u128,
}

fn main() -> ExitCode {
    let settings = Settings::parse();

    #[cfg(feature = "profiling")]
    let _guard = logging::setup_logging(settings.trace.as_deref());
    #[cfg(not(feature = "profiling"))]
    let _guard = logging::setup_logging();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let scheduler = match settings.threads {
        1 => Scheduler::inline(),
        threads => Scheduler::pool(threads)?,
    };

    // Read every input in parallel, keeping file order
    let reads = scheduler.join_all(
        settings
            .inputs
            .iter()
            .map(|path| move || source::read_xyz_file(path))
            .collect(),
    );
    let points: Vec<Point<f64>> =
        flatten_once(reads.into_iter().collect::<Result<Vec<_>, _>>()?);

    let bounds = match settings.bounds {
        Some([minx, miny, maxx, maxy]) => Bounds::new(
            minx,
            miny,
            maxx,
            maxy,
            settings.cell_size,
            settings.group_size,
            settings.srs.clone(),
        )?,
        None => Bounds::from_points(
            &points,
            settings.cell_size,
            settings.group_size,
            settings.srs.clone(),
        )?,
    };
    let bounds = Arc::new(bounds);
    tracing::info!(
        "Chunking {} points over {} on {} threads",
        points.len(),
        bounds.extent(),
        scheduler.parallelism()
    );

    let chunker = Chunker::new(
        PointSetOracle::with_limit(1),
        scheduler,
        settings.chunker_config(),
    )?;
    let tree = chunker.build(Chunk::root(bounds.clone()), points.as_slice())?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let tiles = match settings.output {
        OutputMode::Tiles => {
            let tiles = tree.tiles();
            for tile in &tiles {
                serde_json::to_writer(&mut out, tile)?;
                writeln!(out)?;
            }
            tiles.len()
        }
        OutputMode::Leaves => {
            let leaves = collect_leaves(&tree, chunker.scheduler());
            for leaf in &leaves {
                let record = LeafRecord {
                    extent: leaf.extent(),
                    span: leaf.span(),
                };
                serde_json::to_writer(&mut out, &record)?;
                writeln!(out)?;
            }
            leaves.len()
        }
        OutputMode::Summary => tree.tiles().len(),
    };

    let summary = Summary {
        points: points.len(),
        bounds: bounds.extent(),
        srs: bounds.srs(),
        tiles,
        depth: tree.depth(),
        elapsed_ms: start.elapsed().as_millis(),
    };
    if settings.output == OutputMode::Summary {
        serde_json::to_writer(&mut out, &summary)?;
        writeln!(out)?;
    }
    out.flush()?;

    tracing::info!(
        "Produced {} tiles (tree depth {}) in {} ms",
        summary.tiles,
        summary.depth,
        summary.elapsed_ms
    );
    Ok(())
}
