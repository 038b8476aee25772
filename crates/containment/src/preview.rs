//! Speculative container resize while an unparented node is dragged.
//!
//! A preview only ever resizes. Nothing is reparented until the drop, and
//! an uncommitted preview is rolled back to the size saved before it.

use canvas::{Canvas, Origin};
use glam::Vec2;
use node::{Bounds, CanvasSize, NodeId};
use std::collections::HashMap;

/// Size `container` needs to hold `child` with `padding` on every side.
///
/// Per axis: the larger of the minimum, the child plus padding on both
/// sides, and the distance from the container's origin to the child's far
/// edge plus padding.
pub fn required_size(child: Bounds, container: Bounds, padding: f32, min: CanvasSize) -> CanvasSize {
    let own = child.size().0 + Vec2::splat(padding * 2.0);
    let reach = child.max - container.min + Vec2::splat(padding);
    CanvasSize(own.max(reach).max(min.0))
}

/// Preview bookkeeping for the single active drag.
#[derive(Debug)]
pub struct PreviewSession {
    enabled: bool,
    /// Sizes to roll back to, keyed by container.
    original_sizes: HashMap<NodeId, CanvasSize>,
    previewing: Option<NodeId>,
}

impl PreviewSession {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            original_sizes: HashMap::new(),
            previewing: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling rolls back whatever is currently previewed.
    pub fn set_enabled(&mut self, enabled: bool, canvas: &mut Canvas) {
        self.enabled = enabled;
        if !enabled {
            self.restore_all(canvas);
        }
    }

    pub fn previewing(&self) -> Option<NodeId> {
        self.previewing
    }

    pub fn saved_size(&self, container: NodeId) -> Option<CanvasSize> {
        self.original_sizes.get(&container).copied()
    }

    pub fn has_saved_sizes(&self) -> bool {
        !self.original_sizes.is_empty()
    }

    /// Runs one preview step for `dragged` and returns the container it
    /// previews into, if any.
    pub fn check_and_preview(&mut self, canvas: &mut Canvas, dragged: NodeId) -> Option<NodeId> {
        if !self.enabled {
            return None;
        }
        let dragged_box = canvas.bounds(dragged)?;

        let target = canvas
            .nodes()
            .filter(|n| n.is_container() && n.children.is_empty() && n.id != dragged)
            .filter(|n| !canvas.is_ancestor(dragged, n.id))
            .find(|n| n.bounds().intersects(&dragged_box))
            .and_then(|n| {
                n.container_data()
                    .map(|data| (n.id, n.bounds(), data.padding, data.min_size()))
            });

        let Some((target, target_box, padding, min)) = target else {
            if let Some(previous) = self.previewing {
                self.restore(canvas, previous);
            }
            return None;
        };

        if let Some(previous) = self.previewing.filter(|p| *p != target) {
            self.restore(canvas, previous);
        }

        let current = target_box.size();
        let required = required_size(dragged_box, target_box, padding, min);
        if required.width() > current.width() || required.height() > current.height() {
            self.original_sizes.entry(target).or_insert(current);
            canvas.resize(target, current.max(required), Origin::Preview);
            log::trace!("previewing {} at {:?}", target, current.max(required).0);
        }
        self.previewing = Some(target);
        Some(target)
    }

    /// Rolls `container` back to its saved size.
    pub fn restore(&mut self, canvas: &mut Canvas, container: NodeId) -> bool {
        if self.previewing == Some(container) {
            self.previewing = None;
        }
        match self.original_sizes.remove(&container) {
            Some(size) => {
                canvas.resize(container, size, Origin::Preview);
                log::trace!("restored preview of {}", container);
                true
            }
            None => false,
        }
    }

    pub fn restore_all(&mut self, canvas: &mut Canvas) {
        for (container, size) in self.original_sizes.drain() {
            canvas.resize(container, size, Origin::Preview);
        }
        self.previewing = None;
    }

    /// The dragged node was embedded into `container`; its preview size
    /// becomes permanent.
    pub fn on_embedded(&mut self, container: NodeId) {
        self.original_sizes.remove(&container);
        self.previewing = None;
    }

    /// Drag ended. The preview marker goes; saved sizes stay until the
    /// restore timer runs.
    pub fn on_drag_end(&mut self) {
        self.previewing = None;
    }

    /// Drops bookkeeping for a removed node.
    pub fn forget(&mut self, id: NodeId) {
        self.original_sizes.remove(&id);
        if self.previewing == Some(id) {
            self.previewing = None;
        }
    }
}
