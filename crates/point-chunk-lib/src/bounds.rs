//! Outer extent and grid configuration
//!
//! This module provides [`Bounds`], the read-only context shared by every chunk of a run,
//! and [`Extent`], the plain rectangle type used for chunk regions and output tiles.

use crate::{ChunkError, Result};
use geo::{Coord, Point, Rect};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in source coordinates
///
/// Fields follow the `[minx, maxx, miny, maxy]` order used for output tiles. No ordering
/// is enforced, so an inverted extent is representable and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extent {
    pub minx: f64,
    pub maxx: f64,
    pub miny: f64,
    pub maxy: f64,
}

impl Extent {
    /// Create an extent from `(minx, maxx, miny, maxy)`
    ///
    /// Note the x-pair-then-y-pair order. [`Bounds::new`] takes corners instead
    /// (`minx, miny, maxx, maxy`); use [`Bounds::from_extent`] to build bounds from an
    /// existing extent without restating coordinates.
    pub fn new(minx: f64, maxx: f64, miny: f64, maxy: f64) -> Self {
        Self {
            minx,
            maxx,
            miny,
            maxy,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    /// Signed area, negative when exactly one axis is inverted
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when both axes are ordered (`min <= max`)
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.minx <= self.maxx && self.miny <= self.maxy
    }

    /// The tile record layout: `[minx, maxx, miny, maxy]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.minx, self.maxx, self.miny, self.maxy]
    }

    /// Convert to a `geo` rectangle, or `None` for an inverted extent
    ///
    /// `Rect::new` normalizes its corners, which would turn an inverted extent into a
    /// valid one covering a different region.
    pub fn to_rect(&self) -> Option<Rect<f64>> {
        self.is_ordered().then(|| {
            Rect::new(
                Coord {
                    x: self.minx,
                    y: self.miny,
                },
                Coord {
                    x: self.maxx,
                    y: self.maxy,
                },
            )
        })
    }
}

/// Formats as a reader bounds string: `([minx, maxx], [miny, maxy])`
impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "([{}, {}], [{}, {}])",
            self.minx, self.maxx, self.miny, self.maxy
        )
    }
}

impl From<Rect<f64>> for Extent {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y)
    }
}

/// Overall extent of a point cloud together with the global grid parameters
///
/// Created once per run and shared (behind an `Arc`) by every [`crate::Chunk`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Outer extent in source coordinates
    extent: Extent,
    /// Resolution of the discrete grid, in source units
    cell_size: f64,
    /// Target number of cells per leaf tile group
    group_size: usize,
    /// Spatial reference as well-known text, passed through untouched
    srs: String,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Bounds {
    /// Create new bounds, validating the extent and grid parameters
    ///
    /// Coordinates are given as corners, `minx, miny, maxx, maxy`, unlike
    /// [`Extent::new`] which takes `minx, maxx, miny, maxy`.
    ///
    /// # Errors
    /// - [`ChunkError::InvalidConfiguration`] if `cell_size` is not a positive finite number
    ///   or `group_size` is zero
    /// - [`ChunkError::DegenerateExtent`] if `minx >= maxx` or `miny >= maxy`
    pub fn new(
        minx: f64,
        miny: f64,
        maxx: f64,
        maxy: f64,
        cell_size: f64,
        group_size: usize,
        srs: impl Into<String>,
    ) -> Result<Self> {
        if !(cell_size > 0.0 && cell_size.is_finite()) {
            return Err(ChunkError::InvalidConfiguration(format!(
                "cell size must be positive, got {cell_size}"
            )));
        }
        if group_size == 0 {
            return Err(ChunkError::InvalidConfiguration(
                "group size must be at least 1".to_string(),
            ));
        }
        // Negated comparisons so NaN coordinates are rejected too
        if !(minx < maxx) || !(miny < maxy) {
            return Err(ChunkError::DegenerateExtent {
                minx,
                miny,
                maxx,
                maxy,
            });
        }

        Ok(Self {
            extent: Extent::new(minx, maxx, miny, maxy),
            cell_size,
            group_size,
            srs: srs.into(),
        })
    }

    /// Create bounds covering `extent`, with the same validation as [`Bounds::new`]
    pub fn from_extent(
        extent: Extent,
        cell_size: f64,
        group_size: usize,
        srs: impl Into<String>,
    ) -> Result<Self> {
        Self::new(
            extent.minx,
            extent.miny,
            extent.maxx,
            extent.maxy,
            cell_size,
            group_size,
            srs,
        )
    }

    /// Derive bounds from the bounding box of a point set
    pub fn from_points(
        points: &[Point<f64>],
        cell_size: f64,
        group_size: usize,
        srs: impl Into<String>,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(ChunkError::EmptySource);
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for point in points {
            min_x = min_x.min(point.x());
            min_y = min_y.min(point.y());
            max_x = max_x.max(point.x());
            max_y = max_y.max(point.y());
        }

        Self::new(min_x, min_y, max_x, max_y, cell_size, group_size, srs)
    }

    #[inline]
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    #[inline]
    pub fn minx(&self) -> f64 {
        self.extent.minx
    }

    #[inline]
    pub fn miny(&self) -> f64 {
        self.extent.miny
    }

    #[inline]
    pub fn maxx(&self) -> f64 {
        self.extent.maxx
    }

    #[inline]
    pub fn maxy(&self) -> f64 {
        self.extent.maxy
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Spatial reference WKT, exactly as supplied
    pub fn srs(&self) -> &str {
        &self.srs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_creation() {
        let bounds = Bounds::new(0.0, 10.0, 100.0, 50.0, 0.5, 16, "EPSG:26912").unwrap();
        assert_eq!(bounds.minx(), 0.0);
        assert_eq!(bounds.miny(), 10.0);
        assert_eq!(bounds.maxx(), 100.0);
        assert_eq!(bounds.maxy(), 50.0);
        assert_eq!(bounds.cell_size(), 0.5);
        assert_eq!(bounds.group_size(), 16);
        assert_eq!(bounds.srs(), "EPSG:26912");
    }

    #[test]
    fn test_from_extent_keeps_axes() {
        let extent = Extent::new(0.0, 100.0, 10.0, 50.0);
        let bounds = Bounds::from_extent(extent, 0.5, 16, "").unwrap();
        assert_eq!(bounds.extent(), &extent);
        assert_eq!(bounds.minx(), 0.0);
        assert_eq!(bounds.maxx(), 100.0);
        assert_eq!(bounds.miny(), 10.0);
        assert_eq!(bounds.maxy(), 50.0);

        let corners = Bounds::new(0.0, 10.0, 100.0, 50.0, 0.5, 16, "").unwrap();
        assert_eq!(corners.extent(), bounds.extent());

        let inverted = Extent::new(100.0, 0.0, 10.0, 50.0);
        assert!(matches!(
            Bounds::from_extent(inverted, 0.5, 16, ""),
            Err(ChunkError::DegenerateExtent { .. })
        ));
    }

    #[test]
    fn test_srs_passthrough() {
        let wkt = r#"PROJCS["NAD83 / UTM zone 12N",GEOGCS["NAD83"]]"#;
        let bounds = Bounds::new(0.0, 0.0, 1.0, 1.0, 1.0, 1, wkt).unwrap();
        assert_eq!(bounds.srs(), wkt);
    }

    #[test]
    fn test_invalid_cell_size() {
        for cell_size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Bounds::new(0.0, 0.0, 1.0, 1.0, cell_size, 4, "").unwrap_err();
            assert!(
                matches!(err, ChunkError::InvalidConfiguration(_)),
                "cell_size={cell_size} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_invalid_group_size() {
        let err = Bounds::new(0.0, 0.0, 1.0, 1.0, 1.0, 0, "").unwrap_err();
        assert!(matches!(err, ChunkError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_degenerate_extent() {
        let flat_x = Bounds::new(5.0, 0.0, 5.0, 1.0, 1.0, 4, "").unwrap_err();
        assert!(matches!(flat_x, ChunkError::DegenerateExtent { .. }));

        let inverted_y = Bounds::new(0.0, 3.0, 1.0, 2.0, 1.0, 4, "").unwrap_err();
        assert!(matches!(inverted_y, ChunkError::DegenerateExtent { .. }));

        let nan = Bounds::new(f64::NAN, 0.0, 1.0, 1.0, 1.0, 4, "").unwrap_err();
        assert!(matches!(nan, ChunkError::DegenerateExtent { .. }));
    }

    #[test]
    fn test_from_points() {
        let points = vec![
            Point::new(3.0, -2.0),
            Point::new(-1.0, 4.0),
            Point::new(7.5, 1.0),
        ];
        let bounds = Bounds::from_points(&points, 1.0, 4, "").unwrap();
        assert_eq!(*bounds.extent(), Extent::new(-1.0, 7.5, -2.0, 4.0));
    }

    #[test]
    fn test_from_points_empty() {
        let err = Bounds::from_points(&[], 1.0, 4, "").unwrap_err();
        assert!(matches!(err, ChunkError::EmptySource));
    }

    #[test]
    fn test_extent_display() {
        let extent = Extent::new(1.5, 2.0, -3.0, 4.25);
        assert_eq!(extent.to_string(), "([1.5, 2], [-3, 4.25])");
    }

    #[test]
    fn test_extent_to_rect() {
        let extent = Extent::new(0.0, 2.0, 1.0, 3.0);
        let rect = extent.to_rect().unwrap();
        assert_eq!(Extent::from(rect), extent);

        let inverted = Extent::new(0.0, 2.0, 3.0, 1.0);
        assert!(inverted.to_rect().is_none());
        assert!(inverted.area() < 0.0);
    }
}
