//! Layering for nested shapes.
//!
//! Root containers sit on [`ZLayer::CONTAINER`], root devices on
//! [`ZLayer::DEVICE`], and every nested node one [`ZLayer::NESTING_STEP`]
//! above its parent, so a child always outranks its whole ancestor chain.

use canvas::Canvas;
use node::{NodeId, ZLayer};
use smallvec::SmallVec;

/// Layer a node should sit on given its place in the hierarchy.
pub fn z_index_for(canvas: &Canvas, id: NodeId) -> i32 {
    let mut depth = 0;
    let mut current = id;
    while let Some(parent) = canvas.parent(current) {
        depth += 1;
        current = parent;
    }

    let base = match canvas.node(current) {
        Some(root) if root.is_container() => ZLayer::CONTAINER,
        Some(_) => ZLayer::DEVICE,
        None => ZLayer::CONTAINER,
    };
    base + depth * ZLayer::NESTING_STEP
}

/// Writes [`z_index_for`] onto the node.
pub fn apply_z_index(canvas: &mut Canvas, id: NodeId) -> Option<i32> {
    let z = z_index_for(canvas, id);
    canvas.set_z_index(id, z).then_some(z)
}

/// Restacks everything below `id` relative to its current layer.
///
/// A missing layer on `id` counts as the container base.
pub fn update_subtree(canvas: &mut Canvas, id: NodeId) {
    let mut stack: SmallVec<[NodeId; 8]> = SmallVec::new();
    stack.push(id);
    while let Some(parent) = stack.pop() {
        let base = canvas
            .node(parent)
            .and_then(|n| n.z_index)
            .unwrap_or(ZLayer::CONTAINER);
        let children: SmallVec<[NodeId; 8]> = canvas.children(parent).iter().copied().collect();
        for child in children {
            canvas.set_z_index(child, base + ZLayer::NESTING_STEP);
            stack.push(child);
        }
    }
}

/// Recomputes a node's layer and restacks its subtree.
pub fn restack(canvas: &mut Canvas, id: NodeId) {
    apply_z_index(canvas, id);
    update_subtree(canvas, id);
}

/// Recomputes layers for the whole canvas.
pub fn reset_all(canvas: &mut Canvas) {
    let roots: Vec<NodeId> = canvas
        .nodes()
        .filter(|n| n.parent.is_none())
        .map(|n| n.id)
        .collect();
    for root in roots {
        restack(canvas, root);
    }
    log::debug!("z-order reset for {} node(s)", canvas.len());
}
