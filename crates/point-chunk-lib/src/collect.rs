//! Leaf collection over an evaluated chunk tree

use crate::{Chunk, ChunkNode, Scheduler};

/// Flatten exactly one level of nesting, keeping order
pub fn flatten_once<I>(nested: I) -> Vec<<I::Item as IntoIterator>::Item>
where
    I: IntoIterator,
    I::Item: IntoIterator,
{
    nested.into_iter().flatten().collect()
}

/// Gather every leaf chunk below `node`
///
/// Quadrants are visited in parallel through `scheduler` and their leaves concatenated in
/// quadrant order. Pruned subtrees contribute nothing.
pub fn collect_leaves(node: &ChunkNode, scheduler: &Scheduler) -> Vec<Chunk> {
    match node {
        ChunkNode::Pruned(_) => Vec::new(),
        ChunkNode::Tiled { tiles, .. } => {
            tiles.iter().filter(|tile| tile.is_leaf()).cloned().collect()
        }
        ChunkNode::Split { children, .. } => {
            let gathered = scheduler.join4(
                children
                    .each_ref()
                    .map(|child| move || collect_leaves(child, scheduler)),
            );
            flatten_once(gathered)
                .into_iter()
                .filter(Chunk::is_leaf)
                .collect()
        }
    }
}
