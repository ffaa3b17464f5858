//! Mapping between continuous coordinates and the discrete cell grid

use crate::{Bounds, Extent};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Discrete cell-index span `[x1, x2) x [y1, y2)` relative to the origin of a [`Bounds`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridSpan {
    pub x1: i64,
    pub x2: i64,
    pub y1: i64,
    pub y2: i64,
}

impl GridSpan {
    /// Map a continuous extent onto the grid of `bounds`
    ///
    /// Lower edges are floored and upper edges ceiled, so the span always covers the extent.
    pub fn from_extent(extent: &Extent, bounds: &Bounds) -> Self {
        let cell_size = bounds.cell_size();
        Self {
            x1: lower_index(extent.minx, bounds.minx(), cell_size),
            x2: upper_index(extent.maxx, bounds.minx(), cell_size),
            y1: lower_index(extent.miny, bounds.miny(), cell_size),
            y2: upper_index(extent.maxy, bounds.miny(), cell_size),
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    /// Number of cells covered, zero for an empty or inverted span
    pub fn cell_count(&self) -> i64 {
        self.width().max(0) * self.height().max(0)
    }

    /// Convert back to continuous coordinates on the grid of `bounds`
    pub fn to_extent(&self, bounds: &Bounds) -> Extent {
        let cell_size = bounds.cell_size();
        Extent::new(
            index_to_coord(self.x1, bounds.minx(), cell_size),
            index_to_coord(self.x2, bounds.minx(), cell_size),
            index_to_coord(self.y1, bounds.miny(), cell_size),
            index_to_coord(self.y2, bounds.miny(), cell_size),
        )
    }
}

/// Index of the cell containing `coord` (floored)
#[inline]
pub fn lower_index(coord: f64, origin: f64, cell_size: f64) -> i64 {
    ((coord - origin) / cell_size).floor() as i64
}

/// Index of the first cell boundary at or past `coord` (ceiled)
#[inline]
pub fn upper_index(coord: f64, origin: f64, cell_size: f64) -> i64 {
    ((coord - origin) / cell_size).ceil() as i64
}

#[inline]
pub fn index_to_coord(index: i64, origin: f64, cell_size: f64) -> f64 {
    index as f64 * cell_size + origin
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(cell_size: f64) -> Bounds {
        Bounds::new(100.0, 200.0, 1100.0, 900.0, cell_size, 4, "").unwrap()
    }

    #[test]
    fn test_root_span() {
        let b = bounds(2.0);
        let span = GridSpan::from_extent(b.extent(), &b);
        assert_eq!(
            span,
            GridSpan {
                x1: 0,
                x2: 500,
                y1: 0,
                y2: 350
            }
        );
        assert_eq!(span.cell_count(), 500 * 350);
    }

    #[test]
    fn test_partial_cells_round_outwards() {
        let b = bounds(10.0);
        let extent = Extent::new(105.0, 131.0, 200.0, 219.5);
        let span = GridSpan::from_extent(&extent, &b);
        assert_eq!(span.x1, 0);
        assert_eq!(span.x2, 4);
        assert_eq!(span.y1, 0);
        assert_eq!(span.y2, 2);
    }

    #[test]
    fn test_span_brackets_extent() {
        let b = bounds(3.7);
        let extents = [
            Extent::new(100.0, 1100.0, 200.0, 900.0),
            Extent::new(123.4, 456.7, 201.1, 250.0),
            Extent::new(600.0, 600.5, 899.0, 900.0),
            Extent::new(100.0, 100.0, 200.0, 200.0),
        ];

        for extent in extents {
            let span = GridSpan::from_extent(&extent, &b);
            assert!(span.x1 <= span.x2, "{extent} -> {span:?}");
            assert!(span.y1 <= span.y2, "{extent} -> {span:?}");

            let back = span.to_extent(&b);
            assert!(back.minx <= extent.minx + 1e-9, "{back} vs {extent}");
            assert!(back.maxx >= extent.maxx - 1e-9, "{back} vs {extent}");
            assert!(back.miny <= extent.miny + 1e-9, "{back} vs {extent}");
            assert!(back.maxy >= extent.maxy - 1e-9, "{back} vs {extent}");
        }
    }

    #[test]
    fn test_index_to_coord() {
        assert_eq!(index_to_coord(0, 100.0, 2.5), 100.0);
        assert_eq!(index_to_coord(4, 100.0, 2.5), 110.0);
        assert_eq!(index_to_coord(-2, 100.0, 2.5), 95.0);
    }

    #[test]
    fn test_inverted_span_has_no_cells() {
        let span = GridSpan {
            x1: 5,
            x2: 2,
            y1: 0,
            y2: 3,
        };
        assert_eq!(span.cell_count(), 0);
    }
}
