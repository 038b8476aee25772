//! Attaching nodes to containers and detaching them again.
//!
//! Positions are absolute, so a transition must leave a node exactly where
//! it was. Both directions capture the position first and write it back
//! afterwards if the hierarchy change disturbed it.

use crate::config::ExitConfig;
use crate::timer::{Scheduler, TimerId, TimerTask};
use crate::z_order;
use canvas::{Canvas, Origin};
use node::NodeId;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Outcome of an exit check during a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCheck {
    /// No parent, suppressed or disabled.
    Idle,
    /// Child overlaps its parent enough to stay.
    Inside,
    /// A detach is scheduled (or already was).
    Pending,
}

#[derive(Debug)]
struct PendingExit {
    parent: NodeId,
    timer: TimerId,
}

#[derive(Debug, Default)]
pub struct ContainmentManager {
    /// Children with a transition underway.
    in_flight: HashSet<NodeId>,
    pending_exits: HashMap<NodeId, PendingExit>,
}

impl ContainmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_container(canvas: &Canvas, child: NodeId, container: NodeId) -> bool {
        canvas.parent(child) == Some(container)
    }

    /// Makes `child` a child of `container`, leaving a previous parent
    /// first. Returns false when nothing changed.
    pub fn add_to_container(&mut self, canvas: &mut Canvas, child: NodeId, container: NodeId) -> bool {
        if Self::is_in_container(canvas, child, container) {
            log::debug!("{} already in {}", child, container);
            return false;
        }
        let valid_target = canvas.node(container).is_some_and(|n| n.is_container());
        if child == container
            || !valid_target
            || !canvas.contains(child)
            || canvas.is_ancestor(child, container)
        {
            log::debug!("cannot add {} to {}", child, container);
            return false;
        }
        if !self.in_flight.insert(child) {
            log::debug!("transition already underway for {}", child);
            return false;
        }

        if let Some(previous) = canvas.parent(child) {
            self.detach(canvas, child, previous);
        }

        let attached = match canvas.node(child).map(|n| n.position) {
            Some(position) => {
                let attached = canvas.embed(container, child);
                if attached {
                    canvas.set_position(child, position, Origin::Transition);
                    z_order::restack(canvas, child);
                    canvas.update_container_data(container, |data| data.record_child(child));
                    log::debug!("added {} to {}", child, container);
                }
                attached
            }
            None => false,
        };

        self.in_flight.remove(&child);
        attached
    }

    /// Detaches `child` from `container`. Returns false when `container`
    /// is not its parent.
    pub fn remove_from_container(
        &mut self,
        canvas: &mut Canvas,
        child: NodeId,
        container: NodeId,
    ) -> bool {
        if !Self::is_in_container(canvas, child, container) {
            log::debug!("{} is not in {}", child, container);
            return false;
        }
        if !self.in_flight.insert(child) {
            log::debug!("transition already underway for {}", child);
            return false;
        }
        let detached = self.detach(canvas, child, container);
        self.in_flight.remove(&child);
        detached
    }

    fn detach(&mut self, canvas: &mut Canvas, child: NodeId, container: NodeId) -> bool {
        let Some(position) = canvas.node(child).map(|n| n.position) else {
            return false;
        };
        if canvas.unembed(child).is_none() {
            return false;
        }
        canvas.set_position(child, position, Origin::Transition);
        z_order::restack(canvas, child);
        canvas.update_container_data(container, |data| data.forget_child(child));
        log::debug!("removed {} from {}", child, container);
        true
    }

    /// Detaches every child of `container`. Returns how many left.
    pub fn clear_container(&mut self, canvas: &mut Canvas, container: NodeId) -> usize {
        let children = canvas.children(container).to_vec();
        children
            .into_iter()
            .filter(|child| self.remove_from_container(canvas, *child, container))
            .count()
    }

    /// Called while `child` is dragged. Schedules a detach when the child
    /// has mostly left its parent and cancels it when it comes back.
    pub fn check_exit(
        &mut self,
        canvas: &Canvas,
        scheduler: &mut Scheduler,
        config: &ExitConfig,
        child: NodeId,
        now: Instant,
        suppressed: bool,
    ) -> ExitCheck {
        let Some(parent) = canvas.parent(child) else {
            self.cancel_exit(scheduler, child);
            return ExitCheck::Idle;
        };
        if suppressed || !config.enabled {
            self.cancel_exit(scheduler, child);
            return ExitCheck::Idle;
        }

        if !Self::is_leaving(canvas, config, child, parent) {
            self.cancel_exit(scheduler, child);
            return ExitCheck::Inside;
        }

        match self.pending_exits.get(&child) {
            Some(pending) if pending.parent == parent && scheduler.is_pending(pending.timer) => {}
            _ => {
                self.cancel_exit(scheduler, child);
                let timer = scheduler.schedule(
                    now + config.grace_delay,
                    TimerTask::ExitGroup { child, parent },
                );
                self.pending_exits
                    .insert(child, PendingExit { parent, timer });
                log::trace!("{} leaving {}", child, parent);
            }
        }
        ExitCheck::Pending
    }

    /// Grace delay elapsed. Re-checks before detaching.
    pub fn on_exit_timer(
        &mut self,
        canvas: &mut Canvas,
        config: &ExitConfig,
        child: NodeId,
        parent: NodeId,
        suppressed: bool,
    ) -> bool {
        self.pending_exits.remove(&child);
        if suppressed || !config.enabled || canvas.parent(child) != Some(parent) {
            return false;
        }
        if !Self::is_leaving(canvas, config, child, parent) {
            return false;
        }
        self.remove_from_container(canvas, child, parent)
    }

    fn is_leaving(canvas: &Canvas, config: &ExitConfig, child: NodeId, parent: NodeId) -> bool {
        match (canvas.bounds(child), canvas.bounds(parent)) {
            (Some(child_box), Some(parent_box)) => {
                child_box.overlap_ratio(&parent_box) < config.overlap_threshold
            }
            _ => false,
        }
    }

    pub fn pending_exit(&self, child: NodeId) -> Option<NodeId> {
        self.pending_exits.get(&child).map(|pending| pending.parent)
    }

    pub fn cancel_exit(&mut self, scheduler: &mut Scheduler, child: NodeId) -> bool {
        match self.pending_exits.remove(&child) {
            Some(pending) => scheduler.cancel(pending.timer).is_some(),
            None => false,
        }
    }

    pub fn cancel_all_exits(&mut self, scheduler: &mut Scheduler) {
        for (_, pending) in self.pending_exits.drain() {
            scheduler.cancel(pending.timer);
        }
    }

    /// Drops bookkeeping for a removed node.
    pub fn forget(&mut self, scheduler: &mut Scheduler, id: NodeId) {
        self.cancel_exit(scheduler, id);
        let stale: Vec<NodeId> = self
            .pending_exits
            .iter()
            .filter(|(_, pending)| pending.parent == id)
            .map(|(child, _)| *child)
            .collect();
        for child in stale {
            self.cancel_exit(scheduler, child);
        }
        self.in_flight.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{
        create_container, create_device, CanvasPoint, CanvasSize, ContainerSpec, DeviceSpec,
    };
    use std::time::Duration;

    fn setup() -> (Canvas, ContainmentManager, NodeId, NodeId) {
        let mut canvas = Canvas::new();
        let zone = create_container(
            CanvasPoint::new(0.0, 0.0),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named("zone"),
        );
        let router = create_device(CanvasPoint::new(50.0, 50.0), DeviceSpec::named("router"));
        let (zone_id, router_id) = (zone.id, router.id);
        canvas.add_node(zone);
        canvas.add_node(router);
        (canvas, ContainmentManager::new(), zone_id, router_id)
    }

    #[test]
    fn add_is_idempotent_and_keeps_position() {
        let (mut canvas, mut manager, zone, router) = setup();
        let before = canvas.node(router).unwrap().position;

        assert!(manager.add_to_container(&mut canvas, router, zone));
        assert_eq!(canvas.node(router).unwrap().position, before);
        assert_eq!(canvas.node(router).unwrap().z_index, Some(10));
        assert_eq!(
            canvas.node(zone).unwrap().container_data().unwrap().children_ids,
            vec![router]
        );

        assert!(!manager.add_to_container(&mut canvas, router, zone));
        assert_eq!(canvas.children(zone), &[router]);
    }

    #[test]
    fn remove_requires_matching_parent() {
        let (mut canvas, mut manager, zone, router) = setup();
        assert!(!manager.remove_from_container(&mut canvas, router, zone));

        manager.add_to_container(&mut canvas, router, zone);
        let before = canvas.node(router).unwrap().position;
        assert!(manager.remove_from_container(&mut canvas, router, zone));
        assert_eq!(canvas.node(router).unwrap().position, before);
        assert_eq!(canvas.parent(router), None);
        assert_eq!(canvas.node(router).unwrap().z_index, Some(10));
        assert!(canvas
            .node(zone)
            .unwrap()
            .container_data()
            .unwrap()
            .children_ids
            .is_empty());

        assert!(!manager.remove_from_container(&mut canvas, router, zone));
    }

    #[test]
    fn add_moves_between_containers() {
        let (mut canvas, mut manager, zone, router) = setup();
        let other = create_container(
            CanvasPoint::new(0.0, 0.0),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named("other"),
        );
        let other_id = other.id;
        canvas.add_node(other);

        manager.add_to_container(&mut canvas, router, zone);
        assert!(manager.add_to_container(&mut canvas, router, other_id));
        assert!(canvas.children(zone).is_empty());
        assert_eq!(canvas.parent(router), Some(other_id));
    }

    #[test]
    fn clear_container_detaches_all() {
        let (mut canvas, mut manager, zone, router) = setup();
        let switch = create_device(CanvasPoint::new(150.0, 50.0), DeviceSpec::named("switch"));
        let switch_id = switch.id;
        canvas.add_node(switch);
        manager.add_to_container(&mut canvas, router, zone);
        manager.add_to_container(&mut canvas, switch_id, zone);

        assert_eq!(manager.clear_container(&mut canvas, zone), 2);
        assert!(canvas.children(zone).is_empty());
        assert_eq!(canvas.node(switch_id).unwrap().position, CanvasPoint::new(150.0, 50.0));
    }

    #[test]
    fn exit_waits_for_grace_delay_and_can_be_cancelled() {
        let (mut canvas, mut manager, zone, router) = setup();
        let mut scheduler = Scheduler::new();
        let config = ExitConfig::default();
        let t = Instant::now();
        manager.add_to_container(&mut canvas, router, zone);

        // 80 of 120 px outside: ratio 1/3.
        canvas.set_position(router, CanvasPoint::new(260.0, 50.0), Origin::User);
        let check = manager.check_exit(&canvas, &mut scheduler, &config, router, t, false);
        assert_eq!(check, ExitCheck::Pending);
        assert_eq!(manager.pending_exit(router), Some(zone));

        // Still out: no second timer.
        manager.check_exit(&canvas, &mut scheduler, &config, router, t, false);
        assert_eq!(scheduler.len(), 1);

        // Back inside before the deadline.
        canvas.set_position(router, CanvasPoint::new(100.0, 50.0), Origin::User);
        let check = manager.check_exit(&canvas, &mut scheduler, &config, router, t, false);
        assert_eq!(check, ExitCheck::Inside);
        assert!(scheduler.is_empty());
        assert_eq!(canvas.parent(router), Some(zone));
    }

    #[test]
    fn exit_fires_after_grace_delay() {
        let (mut canvas, mut manager, zone, router) = setup();
        let mut scheduler = Scheduler::new();
        let config = ExitConfig::default();
        let t = Instant::now();
        manager.add_to_container(&mut canvas, router, zone);

        canvas.set_position(router, CanvasPoint::new(400.0, 50.0), Origin::User);
        manager.check_exit(&canvas, &mut scheduler, &config, router, t, false);
        assert!(scheduler.pop_due(t + Duration::from_millis(99)).is_none());

        let (_, task) = scheduler.pop_due(t + Duration::from_millis(100)).unwrap();
        assert_eq!(task, TimerTask::ExitGroup { child: router, parent: zone });
        assert!(manager.on_exit_timer(&mut canvas, &config, router, zone, false));
        assert_eq!(canvas.parent(router), None);
        assert_eq!(canvas.node(router).unwrap().position, CanvasPoint::new(400.0, 50.0));
    }

    #[test]
    fn suppressed_exit_cancels_pending() {
        let (mut canvas, mut manager, zone, router) = setup();
        let mut scheduler = Scheduler::new();
        let config = ExitConfig::default();
        let t = Instant::now();
        manager.add_to_container(&mut canvas, router, zone);

        canvas.set_position(router, CanvasPoint::new(400.0, 50.0), Origin::User);
        manager.check_exit(&canvas, &mut scheduler, &config, router, t, false);
        let check = manager.check_exit(&canvas, &mut scheduler, &config, router, t, true);
        assert_eq!(check, ExitCheck::Idle);
        assert!(scheduler.is_empty());
        assert!(!manager.on_exit_timer(&mut canvas, &config, router, zone, true));
        assert_eq!(canvas.parent(router), Some(zone));
    }
}
