//! Point-count oracles
//!
//! The chunker never reads point data itself. It asks a [`PointCountOracle`] how many
//! points a data source holds inside a region, and only cares whether the answer is zero.

use crate::Extent;
use geo::{Intersects, Point};

/// Error type returned by oracle implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Reports how many points of a data source fall inside a region
///
/// Implementations are queried concurrently from several threads and must answer the
/// same region the same way for an unchanged source.
pub trait PointCountOracle: Sync {
    /// Handle identifying the data to query (a file path, an in-memory buffer, ...)
    type Source: ?Sized + Sync;

    /// Count points of `source` inside `region` (boundaries included)
    ///
    /// `Ok(None)` means the count is unknown; the chunker treats it like zero.
    /// `Err` means the source could not be queried at all and aborts the run.
    fn point_count(
        &self,
        region: &Extent,
        source: &Self::Source,
    ) -> std::result::Result<Option<u64>, BoxError>;
}

/// Oracle over points already loaded into memory
#[derive(Debug, Clone, Copy, Default)]
pub struct PointSetOracle {
    /// Stop counting after this many hits
    limit: Option<u64>,
}

impl PointSetOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop scanning once `limit` points have been found
    ///
    /// The chunker only needs a presence signal, so a limit of 1 is enough for it.
    pub fn with_limit(limit: u64) -> Self {
        Self { limit: Some(limit) }
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PointCountOracle for PointSetOracle {
    type Source = [Point<f64>];

    fn point_count(
        &self,
        region: &Extent,
        source: &Self::Source,
    ) -> std::result::Result<Option<u64>, BoxError> {
        // Inverted regions contain nothing
        let Some(rect) = region.to_rect() else {
            return Ok(Some(0));
        };

        let hits = source.iter().filter(|point| rect.intersects(&point.0));
        let count = match self.limit {
            Some(limit) => hits.take(limit as usize).count(),
            None => hits.count(),
        };
        Ok(Some(count as u64))
    }
}
