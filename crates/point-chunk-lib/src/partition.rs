//! Leaf grid partitioning
//!
//! Once a chunk is small enough to stop recursing, its grid span is cut into a regular
//! sub-grid of tiles. Each tile covers `xnum x ynum` cells, where `(xnum, ynum)` is a
//! factorization of the group size found by [`find_dims`]. Tiles on the upper edges are
//! clipped to the chunk's span and may be smaller.

use crate::{Chunk, Extent, GridSpan};

/// Factor `group_size` into `(xnum, ynum)` with `xnum * ynum == group_size`
///
/// Perfect squares split evenly. Otherwise the divisors of `group_size` are listed in
/// ascending order and the one at index `count / 2 - 1` is taken as `xnum`. This is not
/// always the pair closest to a square, and the rule is kept as is so tile layouts stay
/// stable across versions.
///
/// `group_size` must be positive, which [`crate::Bounds`] guarantees. Zero yields
/// `(0, 0)`, which [`tile_spans`] rejects.
pub fn find_dims(group_size: usize) -> (usize, usize) {
    let root = group_size.isqrt();
    if root * root == group_size {
        return (root, root);
    }

    // A non-square has an even number of divisors, at least two
    let divisors: Vec<usize> = (1..=group_size).filter(|d| group_size % d == 0).collect();
    let x = divisors[divisors.len() / 2 - 1];
    (x, group_size / x)
}

/// Cut `span` into tiles of `xnum x ynum` cells, rows of x-ranges ordered by y
///
/// # Panics
/// If `xnum` or `ynum` is zero.
pub fn tile_spans(span: &GridSpan, xnum: usize, ynum: usize) -> Vec<GridSpan> {
    assert!(
        xnum > 0 && ynum > 0,
        "tile dimensions must be positive, got {xnum} x {ynum}"
    );

    let x_ranges = axis_ranges(span.x1, span.x2, xnum);
    let y_ranges = axis_ranges(span.y1, span.y2, ynum);

    y_ranges
        .iter()
        .flat_map(|&(y1, y2)| {
            x_ranges
                .iter()
                .map(move |&(x1, x2)| GridSpan { x1, x2, y1, y2 })
        })
        .collect()
}

/// `[start, min(start + step, end)]` for every `start` in `begin..end` stepping by `step`
fn axis_ranges(begin: i64, end: i64, step: usize) -> Vec<(i64, i64)> {
    (begin..end)
        .step_by(step)
        .map(|start| (start, (start + step as i64).min(end)))
        .collect()
}

/// Tile extents for a leaf chunk, in the order produced by [`tile_spans`]
pub fn leaf_tiles(chunk: &Chunk) -> Vec<Extent> {
    let bounds = chunk.bounds();
    let (xnum, ynum) = find_dims(bounds.group_size());
    tile_spans(chunk.span(), xnum, ynum)
        .iter()
        .map(|span| span.to_extent(bounds))
        .collect()
}

/// Same tiles as [`leaf_tiles`], as leaf chunks
pub fn leaf_chunks(chunk: &Chunk) -> Vec<Chunk> {
    let bounds = chunk.bounds();
    let (xnum, ynum) = find_dims(bounds.group_size());
    tile_spans(chunk.span(), xnum, ynum)
        .into_iter()
        .map(|span| Chunk::tile(span, bounds.clone()))
        .collect()
}
