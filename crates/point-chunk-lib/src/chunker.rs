//! Adaptive quadtree chunker
//!
//! Starting from a root [`Chunk`], the chunker asks its [`PointCountOracle`] whether the
//! chunk holds any points. Empty chunks are pruned. Non-empty chunks whose area is below
//! the leaf threshold are cut into grid tiles by [`crate::partition`]. Everything else is
//! split into four quadrants that are evaluated in parallel through the [`Scheduler`].

use crate::{
    Chunk, ChunkError, Extent, PointCountOracle, Result, Scheduler, collect::flatten_once,
    partition,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chunks with an area strictly below this (in squared source units) become leaves
///
/// One square kilometre when the source units are metres.
pub const DEFAULT_LEAF_AREA_THRESHOLD: f64 = 1_000_000.0;

/// How the y coordinate of a chunk's bisection point is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bisection {
    /// `midy = miny + (maxy - miny) / 2`
    #[default]
    YRange,
    /// `midy = miny + (maxx - minx) / 2`
    ///
    /// Reproduces layouts generated by older tooling. On non-square chunks the y split
    /// lands off-centre, or past `maxy`, in which case the upper quadrants are inverted
    /// and get pruned as empty.
    LegacyXRange,
}

/// Configuration for the chunker
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChunkerConfig {
    /// Area below which a chunk is tiled instead of split (default 1,000,000)
    pub leaf_area_threshold: f64,
    /// Bisection rule for the y axis
    pub bisection: Bisection,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            leaf_area_threshold: DEFAULT_LEAF_AREA_THRESHOLD,
            bisection: Bisection::default(),
        }
    }
}

impl ChunkerConfig {
    /// Check that the configuration lets the recursion terminate
    ///
    /// A threshold that no area can fall below (zero, negative or NaN) would keep
    /// splitting populated chunks until they collapse to zero width.
    ///
    /// # Errors
    /// [`ChunkError::InvalidConfiguration`] if `leaf_area_threshold` is not a positive
    /// finite number
    pub fn validate(&self) -> Result<()> {
        let threshold = self.leaf_area_threshold;
        if !(threshold > 0.0 && threshold.is_finite()) {
            return Err(ChunkError::InvalidConfiguration(format!(
                "leaf area threshold must be positive and finite, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Evaluated chunk tree
#[derive(Debug, Clone)]
pub enum ChunkNode {
    /// The oracle found no points; nothing below this chunk is produced
    Pruned(Chunk),
    /// Leaf-sized chunk cut into grid tiles (each tile is a leaf [`Chunk`])
    Tiled { chunk: Chunk, tiles: Vec<Chunk> },
    /// Chunk split into lower-left, lower-right, upper-left and upper-right quadrants
    Split {
        chunk: Chunk,
        children: Box<[ChunkNode; 4]>,
    },
}

impl ChunkNode {
    /// The chunk this node was evaluated for
    pub fn chunk(&self) -> &Chunk {
        match self {
            ChunkNode::Pruned(chunk)
            | ChunkNode::Tiled { chunk, .. }
            | ChunkNode::Split { chunk, .. } => chunk,
        }
    }

    pub fn is_pruned(&self) -> bool {
        matches!(self, ChunkNode::Pruned(_))
    }

    /// Tile extents of the whole subtree, in quadrant order
    pub fn tiles(&self) -> Vec<Extent> {
        match self {
            ChunkNode::Pruned(_) => Vec::new(),
            ChunkNode::Tiled { tiles, .. } => tiles.iter().map(|tile| *tile.extent()).collect(),
            ChunkNode::Split { children, .. } => {
                flatten_once(children.iter().map(ChunkNode::tiles))
            }
        }
    }

    /// Depth of the deepest node below this one (0 for a node without children)
    pub fn depth(&self) -> usize {
        match self {
            ChunkNode::Split { children, .. } => {
                1 + children.iter().map(ChunkNode::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

/// Recursive subdivide-query-prune chunker
#[derive(Debug, Clone)]
pub struct Chunker<O> {
    oracle: O,
    scheduler: Scheduler,
    config: ChunkerConfig,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<O: PointCountOracle> Chunker<O> {
    /// Create a chunker, rejecting configurations that cannot terminate
    pub fn new(oracle: O, scheduler: Scheduler, config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            oracle,
            scheduler,
            config,
        })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Query the oracle; `true` when the chunk holds no points
    ///
    /// An unknown count counts as empty. Oracle failures are returned, never retried.
    pub fn is_empty(&self, chunk: &Chunk, source: &O::Source) -> Result<bool> {
        let count = self
            .oracle
            .point_count(chunk.extent(), source)
            .map_err(|err| ChunkError::OracleQuery {
                region: *chunk.extent(),
                source: err,
            })?;
        Ok(count.unwrap_or(0) == 0)
    }

    fn is_leaf_sized(&self, chunk: &Chunk) -> bool {
        chunk.area() < self.config.leaf_area_threshold
    }

    /// Tile extents for every non-empty leaf region below `chunk`
    ///
    /// Tiles come out in quadrant order at every level (lower-left, lower-right,
    /// upper-left, upper-right), and row by row inside each leaf.
    pub fn filter(&self, chunk: &Chunk, source: &O::Source) -> Result<Vec<Extent>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("chunker::filter");

        if self.is_empty(chunk, source)? {
            tracing::debug!("Pruned empty chunk {}", chunk.extent());
            return Ok(Vec::new());
        }

        if self.is_leaf_sized(chunk) {
            let tiles = partition::leaf_tiles(chunk);
            tracing::debug!("Leaf chunk {} produced {} tiles", chunk.extent(), tiles.len());
            return Ok(tiles);
        }

        let results = self.scheduler.join4(
            chunk
                .quadrants(self.config.bisection)
                .map(|child| move || self.filter(&child, source)),
        );

        let children = results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(flatten_once(children))
    }

    /// Evaluate `chunk` into an explicit tree that keeps pruned and split nodes
    pub fn build(&self, chunk: Chunk, source: &O::Source) -> Result<ChunkNode> {
        #[cfg(feature = "profiling")]
        profiling::scope!("chunker::build");

        if self.is_empty(&chunk, source)? {
            tracing::debug!("Pruned empty chunk {}", chunk.extent());
            return Ok(ChunkNode::Pruned(chunk));
        }

        if self.is_leaf_sized(&chunk) {
            let tiles = partition::leaf_chunks(&chunk);
            tracing::debug!("Leaf chunk {} produced {} tiles", chunk.extent(), tiles.len());
            return Ok(ChunkNode::Tiled { chunk, tiles });
        }

        let [ll, lr, ul, ur] = self.scheduler.join4(
            chunk
                .quadrants(self.config.bisection)
                .map(|child| move || self.build(child, source)),
        );

        Ok(ChunkNode::Split {
            chunk,
            children: Box::new([ll?, lr?, ul?, ur?]),
        })
    }
}
