//! The editor: one entry point for pointer input, UI controls and timers.
//!
//! Every operation mutates the canvas, then drains the canvas event queue
//! and routes each event to the engines that care. Engine writes are
//! tagged with their [`Origin`], which is what keeps a preview resize from
//! kicking off an expansion of the previewed container.

use crate::align::{self, AlignMode, DistributeMode};
use crate::auto_expand::AutoExpand;
use crate::config::EditorConfig;
use crate::keyboard::ModifierKey;
use crate::preview::PreviewSession;
use crate::session::{InteractionSession, SessionState};
use crate::timer::{Scheduler, TimerId, TimerTask};
use crate::transition::ContainmentManager;
use crate::visual::DragVisual;
use canvas::{Canvas, CanvasEvent, Origin};
use node::{
    create_container, create_device, CanvasPoint, CanvasSize, ContainerSpec, DeviceSpec, Node,
    NodeId,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use strum_macros::{Display, EnumString};

/// Engines the UI can switch on and off.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Engine {
    AutoExpand,
    Preview,
    AutoExit,
    DragVisual,
    EmbedOnDrop,
}

pub struct Editor {
    config: EditorConfig,
    canvas: Canvas,
    scheduler: Scheduler,
    expand: AutoExpand,
    preview: PreviewSession,
    containment: ContainmentManager,
    session: InteractionSession,
    visual: DragVisual,
    restore_timer: Option<TimerId>,
    /// Routed events not yet handed out by [`Editor::take_events`].
    events: Vec<CanvasEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.validated();
        Self {
            expand: AutoExpand::new(&config.expand),
            preview: PreviewSession::new(config.preview.enabled),
            visual: DragVisual::new(&config.visual),
            config,
            canvas: Canvas::new(),
            scheduler: Scheduler::new(),
            containment: ContainmentManager::new(),
            session: InteractionSession::new(),
            restore_timer: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.canvas.node(id)
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &InteractionSession {
        &self.session
    }

    pub fn previewing(&self) -> Option<NodeId> {
        self.preview.previewing()
    }

    pub fn pending_exit(&self, child: NodeId) -> Option<NodeId> {
        self.containment.pending_exit(child)
    }

    // === Structure ===

    /// Creates a device from the factory defaults. `None` when the id is
    /// already taken.
    pub fn create_device(
        &mut self,
        position: CanvasPoint,
        spec: DeviceSpec,
        now: Instant,
    ) -> Option<NodeId> {
        let device = create_device(position, spec);
        let id = device.id;
        self.add_node(device, now).then_some(id)
    }

    /// Creates a container. Unset limits come from [`crate::ExpandConfig`].
    /// `None` when the id is already taken.
    pub fn create_container(
        &mut self,
        position: CanvasPoint,
        size: Option<CanvasSize>,
        spec: ContainerSpec,
        now: Instant,
    ) -> Option<NodeId> {
        let defaults = &self.config.expand;
        let size = size.unwrap_or(CanvasSize::new(defaults.min_width, defaults.min_height));
        let spec = spec.or_limits(defaults.min_width, defaults.min_height, defaults.padding);
        let container = create_container(position, size, spec);
        let id = container.id;
        self.add_node(container, now).then_some(id)
    }

    /// Adds a node. A parent reference on the node is applied as an
    /// attach.
    pub fn add_node(&mut self, mut node: Node, now: Instant) -> bool {
        let id = node.id;
        let parent = node.parent.take();
        if !self.canvas.add_node(node) {
            return false;
        }
        if let Some(parent) = parent {
            self.containment.add_to_container(&mut self.canvas, id, parent);
        }
        self.pump(now);
        true
    }

    /// Removes a node and its subtree. The former parent keeps its size.
    pub fn remove_node(&mut self, id: NodeId, now: Instant) -> bool {
        let removed = !self.canvas.remove_node(id).is_empty();
        self.pump(now);
        removed
    }

    /// Programmatic move. Children follow, parents grow.
    pub fn move_node(&mut self, id: NodeId, position: CanvasPoint, now: Instant) -> bool {
        let moved = self.move_to(id, position);
        self.pump(now);
        moved
    }

    fn move_to(&mut self, id: NodeId, position: CanvasPoint) -> bool {
        match self.canvas.node(id).map(|n| n.position) {
            Some(current) => self.canvas.translate(id, position - current, Origin::User),
            None => false,
        }
    }

    pub fn add_to_container(&mut self, child: NodeId, container: NodeId, now: Instant) -> bool {
        let added = self
            .containment
            .add_to_container(&mut self.canvas, child, container);
        self.pump(now);
        added
    }

    pub fn remove_from_container(&mut self, child: NodeId, container: NodeId, now: Instant) -> bool {
        let removed = self
            .containment
            .remove_from_container(&mut self.canvas, child, container);
        self.pump(now);
        removed
    }

    pub fn is_in_container(&self, child: NodeId, container: NodeId) -> bool {
        ContainmentManager::is_in_container(&self.canvas, child, container)
    }

    pub fn clear_container(&mut self, container: NodeId, now: Instant) -> usize {
        let count = self.containment.clear_container(&mut self.canvas, container);
        self.pump(now);
        count
    }

    pub fn align(&mut self, ids: &[NodeId], mode: AlignMode, now: Instant) -> usize {
        let plan = align::plan_align(&self.canvas, ids, mode);
        self.apply_plan(plan, now)
    }

    pub fn distribute(&mut self, ids: &[NodeId], mode: DistributeMode, now: Instant) -> usize {
        let plan = align::plan_distribute(&self.canvas, ids, mode);
        self.apply_plan(plan, now)
    }

    fn apply_plan(&mut self, plan: Vec<(NodeId, CanvasPoint)>, now: Instant) -> usize {
        let moved = plan
            .into_iter()
            .filter(|(id, position)| self.move_to(*id, *position))
            .count();
        self.pump(now);
        moved
    }

    // === Pointer and keyboard ===

    pub fn drag_start(&mut self, node: NodeId, now: Instant) -> bool {
        if !self.canvas.contains(node) {
            return false;
        }
        self.flush_restore();
        if !self.session.begin_drag(node) {
            return false;
        }
        if self.canvas.node(node).is_some_and(Node::is_container) {
            self.expand.begin_move(node);
        }
        self.expand.hold(node);
        self.visual.begin(&mut self.canvas, node);
        log::debug!("drag start {}", node);
        self.pump(now);
        true
    }

    /// Moves the dragged node so its top-left lands on `position`.
    pub fn drag_move(&mut self, node: NodeId, position: CanvasPoint, now: Instant) -> bool {
        if self.session.dragged() != Some(node) {
            return false;
        }
        self.move_to(node, position);

        if self.canvas.parent(node).is_some() {
            self.containment.check_exit(
                &self.canvas,
                &mut self.scheduler,
                &self.config.exit,
                node,
                now,
                self.session.exit_suppressed(),
            );
            self.session.set_embed_target(None);
            self.visual.highlight(&mut self.canvas, None);
        } else {
            let previewed = if self.session.preview_suppressed() {
                None
            } else {
                self.preview.check_and_preview(&mut self.canvas, node)
            };
            let candidate = previewed.or_else(|| {
                (self.config.drop.embed_on_drop && !self.session.is_locked())
                    .then(|| self.find_drop_target(node))
                    .flatten()
            });
            self.session.set_embed_target(candidate);
            self.visual.highlight(&mut self.canvas, candidate);
        }

        self.pump(now);
        true
    }

    pub fn drag_end(&mut self, node: NodeId, now: Instant) -> bool {
        if self.session.dragged() != Some(node) {
            return false;
        }
        let target = self.session.end_drag().and_then(|(_, target)| target);
        if self.expand.moving() == Some(node) {
            self.expand.end_move();
        }
        self.expand.release();
        // The parent catches up with a child that stayed, unless it is
        // still on its way out.
        if let Some(parent) = self.canvas.parent(node) {
            if self.containment.pending_exit(node) != Some(parent) {
                self.request_expand(parent, now);
            }
        }
        self.visual.end(&mut self.canvas);

        let droppable = self.config.drop.embed_on_drop
            && !self.session.is_locked()
            && self.canvas.parent(node).is_none();
        if droppable {
            let target = target
                .filter(|t| self.is_drop_candidate(node, *t))
                .or_else(|| self.find_drop_target(node));
            if let Some(target) = target {
                self.commit_embed(node, target);
            }
        }

        self.preview.on_drag_end();
        if self.preview.has_saved_sizes() {
            let deadline = now + self.config.preview.restore_delay;
            self.restore_timer = Some(self.scheduler.schedule(deadline, TimerTask::RestorePreviews));
        }
        log::debug!("drag end {}", node);
        self.pump(now);
        true
    }

    /// The canvas reports that `child` was dropped into `parent`.
    pub fn embed_commit(&mut self, child: NodeId, parent: NodeId, now: Instant) -> bool {
        let committed = self.commit_embed(child, parent);
        if committed && self.session.dragged() == Some(child) {
            self.session.set_embed_target(None);
            self.visual.highlight(&mut self.canvas, None);
            self.visual.relift(&mut self.canvas);
        }
        self.pump(now);
        committed
    }

    fn commit_embed(&mut self, child: NodeId, parent: NodeId) -> bool {
        let committed = self
            .containment
            .add_to_container(&mut self.canvas, child, parent);
        if committed {
            self.preview.on_embedded(parent);
        }
        committed
    }

    pub fn resize_start(&mut self, node: NodeId, now: Instant) -> bool {
        if !self.canvas.contains(node) || !self.session.begin_resize(node) {
            return false;
        }
        self.pump(now);
        true
    }

    /// Manual resize. Containers never go below their minimum.
    pub fn resize(&mut self, node: NodeId, size: CanvasSize, now: Instant) -> bool {
        let Some(min) = self.canvas.node(node).map(Node::min_size) else {
            return false;
        };
        let resized = self.canvas.resize(node, size.max(min), Origin::User);
        self.pump(now);
        resized
    }

    pub fn resize_end(&mut self, node: NodeId, now: Instant) -> bool {
        if self.session.resizing() != Some(node) {
            return false;
        }
        self.session.end_resize();
        if let Some(parent) = self.canvas.parent(node) {
            self.request_expand(parent, now);
        }
        self.pump(now);
        true
    }

    pub fn modifier_pressed(&mut self, key: ModifierKey, now: Instant) {
        if self.session.modifier_pressed(key) {
            log::debug!("modifier held: containment paused");
            self.containment.cancel_all_exits(&mut self.scheduler);
        }
        self.pump(now);
    }

    pub fn modifier_released(&mut self, key: ModifierKey, now: Instant) {
        if self.session.modifier_released(key) {
            log::debug!("modifier released");
        }
        self.pump(now);
    }

    /// Focus lost: a held modifier counts as released.
    pub fn window_blurred(&mut self, now: Instant) {
        if self.session.window_blurred() {
            log::debug!("focus lost: modifier released");
        }
        self.pump(now);
    }

    pub fn set_locked(&mut self, locked: bool, now: Instant) {
        self.session.set_locked(locked);
        if locked {
            self.containment.cancel_all_exits(&mut self.scheduler);
            self.cancel_restore();
            self.preview.restore_all(&mut self.canvas);
            self.visual.highlight(&mut self.canvas, None);
            self.session.set_embed_target(None);
        }
        self.pump(now);
    }

    // === UI controls ===

    pub fn set_engine_enabled(&mut self, engine: Engine, enabled: bool, now: Instant) {
        match engine {
            Engine::AutoExpand => self.expand.set_enabled(enabled, &mut self.scheduler),
            Engine::Preview => {
                if !enabled {
                    self.cancel_restore();
                }
                self.preview.set_enabled(enabled, &mut self.canvas);
            }
            Engine::AutoExit => {
                self.config.exit.enabled = enabled;
                if !enabled {
                    self.containment.cancel_all_exits(&mut self.scheduler);
                }
            }
            Engine::DragVisual => self.visual.set_enabled(enabled, &mut self.canvas),
            Engine::EmbedOnDrop => self.config.drop.embed_on_drop = enabled,
        }
        log::debug!("{} {}", engine, if enabled { "enabled" } else { "disabled" });
        self.pump(now);
    }

    pub fn is_engine_enabled(&self, engine: Engine) -> bool {
        match engine {
            Engine::AutoExpand => self.expand.is_enabled(),
            Engine::Preview => self.preview.is_enabled(),
            Engine::AutoExit => self.config.exit.enabled,
            Engine::DragVisual => self.visual.is_enabled(),
            Engine::EmbedOnDrop => self.config.drop.embed_on_drop,
        }
    }

    pub fn pause_auto_expand(&mut self) {
        self.session.pause_expand();
    }

    pub fn resume_auto_expand(&mut self) {
        self.session.resume_expand();
    }

    /// Expands `container` right now, whatever the throttle or pause state.
    pub fn manual_expand(&mut self, container: NodeId, now: Instant) -> bool {
        let expanded = self
            .expand
            .manual_expand(&mut self.canvas, &mut self.scheduler, container);
        self.pump(now);
        expanded
    }

    // === Time ===

    /// Runs every timer due at `now`.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((id, task)) = self.scheduler.pop_due(now) {
            fired += 1;
            match task {
                TimerTask::Expand(container) => {
                    let suspended = self.session.expand_suspended();
                    self.expand
                        .on_timer(&mut self.canvas, container, now, suspended);
                }
                TimerTask::ExitGroup { child, parent } => {
                    let suppressed = self.session.exit_suppressed();
                    let exited = self.containment.on_exit_timer(
                        &mut self.canvas,
                        &self.config.exit,
                        child,
                        parent,
                        suppressed,
                    );
                    if exited && self.session.dragged() == Some(child) {
                        self.visual.relift(&mut self.canvas);
                    } else if !exited && self.canvas.parent(child) == Some(parent) {
                        self.request_expand(parent, now);
                    }
                }
                TimerTask::RestorePreviews => {
                    if self.restore_timer == Some(id) {
                        self.restore_timer = None;
                    }
                    self.preview.restore_all(&mut self.canvas);
                }
            }
            self.pump(now);
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Every canvas event produced since the last call.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // === Internals ===

    fn request_expand(&mut self, container: NodeId, now: Instant) {
        let suspended = self.session.expand_suspended();
        self.expand
            .request(&mut self.canvas, &mut self.scheduler, container, now, suspended);
    }

    /// Drains canvas events until the canvas goes quiet.
    fn pump(&mut self, now: Instant) {
        loop {
            let batch = self.canvas.drain_events();
            if batch.is_empty() {
                break;
            }
            for event in batch {
                self.route(&event, now);
                self.events.push(event);
            }
        }
    }

    fn route(&mut self, event: &CanvasEvent, now: Instant) {
        match *event {
            CanvasEvent::NodeMoved { id, origin } | CanvasEvent::NodeResized { id, origin } => {
                if origin == Origin::Preview {
                    return;
                }
                let Some(parent) = self.canvas.parent(id) else {
                    return;
                };
                // Neither a held child nor one on its way out is chased.
                if self.expand.held() == Some(id)
                    || self.containment.pending_exit(id) == Some(parent)
                {
                    return;
                }
                self.request_expand(parent, now);
            }
            CanvasEvent::Embedded { parent, .. } => self.request_expand(parent, now),
            CanvasEvent::NodeRemoved { id, parent } => {
                self.forget(id);
                if let Some(parent) = parent.filter(|p| self.canvas.contains(*p)) {
                    self.canvas
                        .update_container_data(parent, |data| data.forget_child(id));
                    self.request_expand(parent, now);
                }
            }
            CanvasEvent::NodeAdded { .. }
            | CanvasEvent::Unembedded { .. }
            | CanvasEvent::DataChanged { .. } => {}
        }
    }

    fn forget(&mut self, id: NodeId) {
        self.expand.forget(id, &mut self.scheduler);
        self.preview.forget(id);
        self.containment.forget(&mut self.scheduler, id);
        self.session.forget(id);
        self.visual.forget(id);
        self.scheduler.cancel_where(|task| match *task {
            TimerTask::Expand(container) => container == id,
            TimerTask::ExitGroup { child, parent } => child == id || parent == id,
            TimerTask::RestorePreviews => false,
        });
    }

    /// A new drag rolls back leftovers of the previous one immediately.
    fn flush_restore(&mut self) {
        if self.restore_timer.take().is_some_and(|id| self.scheduler.cancel(id).is_some()) {
            self.preview.restore_all(&mut self.canvas);
        }
    }

    fn cancel_restore(&mut self) {
        if let Some(id) = self.restore_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn is_drop_candidate(&self, node: NodeId, target: NodeId) -> bool {
        target != node
            && self.canvas.node(target).is_some_and(Node::is_container)
            && !self.canvas.is_ancestor(node, target)
    }

    /// Topmost container holding the center of `node`, excluding the node
    /// and its own subtree. Later insertion wins between equal layers.
    pub fn find_drop_target(&self, node: NodeId) -> Option<NodeId> {
        let center = self.canvas.bounds(node)?.center();
        self.canvas
            .nodes()
            .enumerate()
            .filter(|(_, n)| self.is_drop_candidate(node, n.id))
            .filter(|(_, n)| n.bounds().contains_point(center))
            .max_by_key(|(index, n)| (n.z_index.unwrap_or_default(), *index))
            .map(|(_, n)| n.id)
    }
}
