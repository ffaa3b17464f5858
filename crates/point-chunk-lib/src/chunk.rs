//! A rectangular region under evaluation, one node of the chunking recursion

use crate::{Bisection, Bounds, Extent, GridSpan};
use std::sync::Arc;

/// A chunk of the outer [`Bounds`]
///
/// Chunks are immutable. Whether a chunk holds points is not stored here: the answer is
/// part of the [`crate::ChunkNode`] produced when the chunk is evaluated.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Continuous extent of this chunk
    extent: Extent,
    /// Discrete grid span relative to the shared bounds
    span: GridSpan,
    /// Shared run-wide bounds
    bounds: Arc<Bounds>,
    /// True for tiles produced by the leaf grid partitioner
    leaf: bool,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Chunk {
    /// Create a chunk for `extent`, deriving its grid span from `bounds`
    pub fn new(extent: Extent, bounds: Arc<Bounds>) -> Self {
        let span = GridSpan::from_extent(&extent, &bounds);
        Self {
            extent,
            span,
            bounds,
            leaf: false,
        }
    }

    /// The chunk covering the whole of `bounds`
    pub fn root(bounds: Arc<Bounds>) -> Self {
        Self::new(*bounds.extent(), bounds)
    }

    /// A leaf tile whose span is already known exactly
    ///
    /// The span is not recomputed from the extent: converting grid indices to coordinates
    /// and back can drift by one cell for cell sizes that are not exactly representable.
    pub(crate) fn tile(span: GridSpan, bounds: Arc<Bounds>) -> Self {
        Self {
            extent: span.to_extent(&bounds),
            span,
            bounds,
            leaf: true,
        }
    }

    #[inline]
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    #[inline]
    pub fn span(&self) -> &GridSpan {
        &self.span
    }

    #[inline]
    pub fn bounds(&self) -> &Arc<Bounds> {
        &self.bounds
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.extent.area()
    }

    /// Bisection point `(midx, midy)`
    pub fn midpoint(&self, bisection: Bisection) -> (f64, f64) {
        let e = &self.extent;
        let midx = e.minx + e.width() / 2.0;
        let midy = match bisection {
            Bisection::YRange => e.miny + e.height() / 2.0,
            Bisection::LegacyXRange => e.miny + e.width() / 2.0,
        };
        (midx, midy)
    }

    /// Split into four quadrants: lower-left, lower-right, upper-left, upper-right
    pub fn quadrants(&self, bisection: Bisection) -> [Chunk; 4] {
        let (midx, midy) = self.midpoint(bisection);
        let Extent {
            minx,
            maxx,
            miny,
            maxy,
        } = self.extent;

        [
            Extent::new(minx, midx, miny, midy),
            Extent::new(midx, maxx, miny, midy),
            Extent::new(minx, midx, midy, maxy),
            Extent::new(midx, maxx, midy, maxy),
        ]
        .map(|extent| Chunk::new(extent, self.bounds.clone()))
    }
}
