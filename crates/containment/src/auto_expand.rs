//! Containers grow to keep their children inside.
//!
//! Growth is monotonic: a container only ever moves its top-left corner
//! up/left and its bottom-right corner down/right. Nothing here shrinks a
//! container, not even when a child is removed.

use crate::config::ExpandConfig;
use crate::timer::{Scheduler, Throttle, TimerTask};
use canvas::{Canvas, Origin};
use glam::Vec2;
use node::{Bounds, CanvasPoint, CanvasSize, NodeId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Box a container needs so that `children`, grown by `padding`, fit.
///
/// Without a usable child box the container keeps its place and is only
/// floored at `min`.
pub fn compute_expansion(
    current: Bounds,
    children: Option<Bounds>,
    padding: f32,
    min: CanvasSize,
) -> Bounds {
    let Some(children) = children.filter(Bounds::is_valid) else {
        return Bounds::from_origin_size(current.origin(), current.size().max(min));
    };

    let padding = Vec2::splat(padding);
    let top_left = current.min.min(children.min - padding);
    let bottom_right = current.max.max(children.max + padding);
    let size = CanvasSize(bottom_right - top_left).max(min);
    Bounds::from_origin_size(CanvasPoint(top_left), size)
}

/// Union of the direct children's boxes, leaving out `except`.
pub fn children_bounds(
    canvas: &Canvas,
    container: NodeId,
    except: Option<NodeId>,
) -> Option<Bounds> {
    Bounds::union_all(
        canvas
            .children(container)
            .iter()
            .filter(|child| Some(**child) != except)
            .filter_map(|child| canvas.bounds(*child)),
    )
}

/// The auto-expand engine.
#[derive(Debug)]
pub struct AutoExpand {
    enabled: bool,
    interval: Duration,
    /// Reentrancy guard.
    expanding: bool,
    /// Container being moved by the user. Expansion requests from inside
    /// its subtree are ignored until the move ends.
    moving: Option<NodeId>,
    /// Node under the pointer. Its parent does not grow around it until
    /// the drag ends, so it can be pulled out.
    held: Option<NodeId>,
    throttles: HashMap<NodeId, Throttle>,
}

impl AutoExpand {
    pub fn new(config: &ExpandConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: config.throttle,
            expanding: false,
            moving: None,
            held: None,
            throttles: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling drops every pending trailing run.
    pub fn set_enabled(&mut self, enabled: bool, scheduler: &mut Scheduler) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_all(scheduler);
        }
    }

    pub fn is_expanding(&self) -> bool {
        self.expanding
    }

    pub fn begin_move(&mut self, container: NodeId) {
        self.moving = Some(container);
    }

    pub fn end_move(&mut self) {
        self.moving = None;
    }

    pub fn moving(&self) -> Option<NodeId> {
        self.moving
    }

    pub fn hold(&mut self, node: NodeId) {
        self.held = Some(node);
    }

    /// Ends the hold and returns the node that was held.
    pub fn release(&mut self) -> Option<NodeId> {
        self.held.take()
    }

    pub fn held(&self) -> Option<NodeId> {
        self.held
    }

    /// A child of `container` changed. Runs the expansion now or leaves a
    /// trailing run on the scheduler. Returns true when it ran and changed
    /// the container.
    pub fn request(
        &mut self,
        canvas: &mut Canvas,
        scheduler: &mut Scheduler,
        container: NodeId,
        now: Instant,
        suspended: bool,
    ) -> bool {
        if self.should_skip(canvas, container, suspended) {
            return false;
        }
        let interval = self.interval;
        let throttle = self
            .throttles
            .entry(container)
            .or_insert_with(|| Throttle::new(interval));
        if throttle.call(now, scheduler, TimerTask::Expand(container)) {
            self.expand(canvas, container)
        } else {
            false
        }
    }

    /// Trailing run scheduled by [`AutoExpand::request`].
    pub fn on_timer(
        &mut self,
        canvas: &mut Canvas,
        container: NodeId,
        now: Instant,
        suspended: bool,
    ) -> bool {
        if let Some(throttle) = self.throttles.get_mut(&container) {
            throttle.fired(now);
        }
        if self.should_skip(canvas, container, suspended) {
            return false;
        }
        self.expand(canvas, container)
    }

    /// Expands immediately, ignoring throttle, suspension and the
    /// container's own auto-expand flag.
    pub fn manual_expand(
        &mut self,
        canvas: &mut Canvas,
        scheduler: &mut Scheduler,
        container: NodeId,
    ) -> bool {
        self.cancel(container, scheduler);
        if self.expanding {
            log::debug!("manual expand of {} skipped: already expanding", container);
            return false;
        }
        self.expand(canvas, container)
    }

    pub fn cancel(&mut self, container: NodeId, scheduler: &mut Scheduler) {
        if let Some(throttle) = self.throttles.get_mut(&container) {
            throttle.cancel(scheduler);
        }
    }

    pub fn cancel_all(&mut self, scheduler: &mut Scheduler) {
        for throttle in self.throttles.values_mut() {
            throttle.cancel(scheduler);
        }
    }

    /// Drops all state kept for a removed node.
    pub fn forget(&mut self, id: NodeId, scheduler: &mut Scheduler) {
        if let Some(mut throttle) = self.throttles.remove(&id) {
            throttle.cancel(scheduler);
        }
        if self.moving == Some(id) {
            self.moving = None;
        }
        if self.held == Some(id) {
            self.held = None;
        }
    }

    fn should_skip(&self, canvas: &Canvas, container: NodeId, suspended: bool) -> bool {
        if !self.enabled || self.expanding || suspended {
            return true;
        }
        let auto = canvas
            .node(container)
            .and_then(|n| n.container_data())
            .map(|data| data.auto_expand);
        if auto != Some(true) {
            return true;
        }
        match self.moving {
            Some(moving) => moving == container || canvas.is_ancestor(moving, container),
            None => false,
        }
    }

    fn expand(&mut self, canvas: &mut Canvas, container: NodeId) -> bool {
        let Some((current, padding, min)) = canvas.node(container).and_then(|n| {
            n.container_data()
                .map(|data| (n.bounds(), data.padding, data.min_size()))
        }) else {
            return false;
        };

        self.expanding = true;
        let children = children_bounds(canvas, container, self.held);
        let target = compute_expansion(current, children, padding, min);
        let moved = canvas.set_position(container, target.origin(), Origin::Expand);
        let resized = canvas.resize(container, target.size(), Origin::Expand);
        self.expanding = false;

        if moved || resized {
            log::debug!(
                "expanded {} to {:?} {:?}",
                container,
                target.origin().0,
                target.size().0
            );
        }
        moved || resized
    }
}
