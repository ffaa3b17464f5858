//! Point Chunk Library - Adaptive Quadtree Chunking for Point Clouds
//!
//! This library splits the extent of a point cloud into grid-aligned tiles for downstream
//! tiled processing. Regions that hold no points are pruned early, and regions that are
//! small enough are cut into a regular sub-grid sized by the configured group size.
//!
//! # Architecture
//!
//! - **[`Bounds`]**: Immutable outer extent plus grid parameters, shared by every chunk
//! - **[`GridSpan`]**: Discrete cell-index span of a chunk relative to its [`Bounds`]
//! - **[`PointCountOracle`]**: Answers "how many points are in this region" for a source
//! - **[`Chunker`]**: Recursive subdivide-query-prune quadtree over a [`Chunk`]
//! - **[`partition`]**: Leaf sizing (`find_dims`) and tiling of a leaf's grid span
//! - **[`collect_leaves`]**: Flattens a [`ChunkNode`] tree into its leaf chunks
//! - **[`Scheduler`]**: Explicit executor handle for the parallel quadrant fan-out
//!
//! # Concurrency
//!
//! The four quadrants of a split chunk are evaluated as independent tasks and joined in
//! quadrant order (lower-left, lower-right, upper-left, upper-right), so the output order
//! is deterministic no matter which task finishes first.

mod bounds;
mod chunk;
mod chunker;
mod collect;
mod grid;
mod oracle;
pub mod partition;
mod scheduler;
pub mod source;

// Public API exports
pub use bounds::{Bounds, Extent};
pub use chunk::Chunk;
pub use chunker::{
    Bisection, ChunkNode, Chunker, ChunkerConfig, DEFAULT_LEAF_AREA_THRESHOLD,
};
pub use collect::{collect_leaves, flatten_once};
pub use grid::GridSpan;
pub use oracle::{BoxError, PointCountOracle, PointSetOracle};
pub use scheduler::Scheduler;

/// Error types for the chunking pipeline
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("Point count query failed for {region}: {source}")]
    OracleQuery { region: Extent, source: BoxError },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Degenerate extent: x [{minx}, {maxx}], y [{miny}, {maxy}]")]
    DegenerateExtent {
        minx: f64,
        miny: f64,
        maxx: f64,
        maxy: f64,
    },

    #[error("Point source is empty")]
    EmptySource,

    #[error("Malformed point on line {line}: {reason}")]
    ParsePoint { line: usize, reason: String },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
