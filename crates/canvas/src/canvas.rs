use crate::event::{CanvasEvent, Origin};
use node::{Bounds, CanvasDelta, CanvasPoint, CanvasSize, ContainerData, Node, NodeId, NodeStyle};
use smallvec::SmallVec;

/// The canvas state.
#[derive(Debug, Default)]
pub struct Canvas {
    /// All nodes on the canvas, in insertion order.
    nodes: Vec<Node>,
    /// Mutations not yet drained by the owner.
    events: Vec<CanvasEvent>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the canvas.
    ///
    /// Any children listed on the incoming node are dropped; hierarchy is
    /// built through [`Canvas::embed`]. A parent reference is honored only
    /// when it names a container already on the canvas.
    pub fn add_node(&mut self, mut node: Node) -> bool {
        let id = node.id;
        if self.contains(id) {
            log::warn!("node {} already on canvas", id);
            return false;
        }

        let parent = node.parent.take();
        node.children.clear();
        self.nodes.push(node);
        self.events.push(CanvasEvent::NodeAdded { id });

        if let Some(parent) = parent {
            self.embed(parent, id);
        }
        true
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns the removed nodes, the requested node first.
    pub fn remove_node(&mut self, id: NodeId) -> Vec<Node> {
        if !self.contains(id) {
            return Vec::new();
        }

        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }

        let mut doomed = vec![id];
        doomed.extend(self.descendants(id));

        let mut removed = Vec::with_capacity(doomed.len());
        for target in doomed {
            if let Some(index) = self.nodes.iter().position(|n| n.id == target) {
                let node = self.nodes.remove(index);
                self.events.push(CanvasEvent::NodeRemoved {
                    id: target,
                    parent: node.parent,
                });
                removed.push(node);
            }
        }
        log::trace!("removed {} node(s) rooted at {}", removed.len(), id);
        removed
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.node(id).map(Node::bounds)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Every node below `id`, depth first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[NodeId; 8]> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// True when `ancestor` is somewhere above `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Moves a single node. Children stay where they are.
    pub fn set_position(&mut self, id: NodeId, position: CanvasPoint, origin: Origin) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.position == position {
            return false;
        }
        node.position = position;
        self.events.push(CanvasEvent::NodeMoved { id, origin });
        true
    }

    /// Moves a node and every descendant by `delta`.
    pub fn translate(&mut self, id: NodeId, delta: CanvasDelta, origin: Origin) -> bool {
        if delta.is_zero() || !self.contains(id) {
            return false;
        }
        let mut moved = vec![id];
        moved.extend(self.descendants(id));
        for target in moved {
            if let Some(node) = self.get_mut(target) {
                node.position = node.position + delta;
                self.events.push(CanvasEvent::NodeMoved { id: target, origin });
            }
        }
        true
    }

    pub fn resize(&mut self, id: NodeId, size: CanvasSize, origin: Origin) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.size == size {
            return false;
        }
        node.size = size;
        self.events.push(CanvasEvent::NodeResized { id, origin });
        true
    }

    /// Makes `child` a child of `parent`.
    ///
    /// Fails when the parent is not a container, when the child already has
    /// a parent, or when the link would create a cycle. Positions are not
    /// touched.
    pub fn embed(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(child) {
            return false;
        }
        match self.node(parent) {
            Some(p) if p.is_container() => {}
            _ => {
                log::debug!("embed: {} is not a container", parent);
                return false;
            }
        }
        if self.parent(child).is_some() || self.is_ancestor(child, parent) {
            log::debug!("embed: {} cannot be placed in {}", child, parent);
            return false;
        }

        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        self.events.push(CanvasEvent::Embedded { child, parent });
        true
    }

    /// Detaches `child` from its parent, returning the former parent.
    pub fn unembed(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.get_mut(child)?.parent.take()?;
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        self.events.push(CanvasEvent::Unembedded { child, parent });
        Some(parent)
    }

    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.z_index = Some(z_index);
                true
            }
            None => false,
        }
    }

    pub fn set_style(&mut self, id: NodeId, style: NodeStyle) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.style = style;
                true
            }
            None => false,
        }
    }

    /// Edits a container's payload in place and records a data change.
    pub fn update_container_data<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ContainerData) -> R,
    ) -> Option<R> {
        let data = self.get_mut(id)?.container_data_mut()?;
        let result = f(data);
        self.events.push(CanvasEvent::DataChanged { id });
        Some(result)
    }

    /// Takes every event recorded so far.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{create_container, create_device, ContainerSpec, DeviceSpec};

    fn container(name: &str, x: f32, y: f32) -> Node {
        create_container(
            CanvasPoint::new(x, y),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named(name),
        )
    }

    fn device(name: &str, x: f32, y: f32) -> Node {
        create_device(CanvasPoint::new(x, y), DeviceSpec::named(name))
    }

    #[test]
    fn embed_keeps_positions() {
        let mut canvas = Canvas::new();
        let zone = container("zone", 0.0, 0.0);
        let router = device("router", 50.0, 50.0);
        let (zone_id, router_id) = (zone.id, router.id);
        canvas.add_node(zone);
        canvas.add_node(router);
        canvas.drain_events();

        assert!(canvas.embed(zone_id, router_id));
        assert_eq!(canvas.parent(router_id), Some(zone_id));
        assert_eq!(canvas.children(zone_id), &[router_id]);
        assert_eq!(
            canvas.node(router_id).unwrap().position,
            CanvasPoint::new(50.0, 50.0)
        );
        assert_eq!(
            canvas.drain_events(),
            vec![CanvasEvent::Embedded {
                child: router_id,
                parent: zone_id
            }]
        );

        // already parented
        assert!(!canvas.embed(zone_id, router_id));
    }

    #[test]
    fn embed_rejects_devices_and_cycles() {
        let mut canvas = Canvas::new();
        let outer = container("outer", 0.0, 0.0);
        let inner = container("inner", 10.0, 10.0);
        let router = device("router", 50.0, 50.0);
        let (outer_id, inner_id, router_id) = (outer.id, inner.id, router.id);
        canvas.add_node(outer);
        canvas.add_node(inner);
        canvas.add_node(router);

        assert!(!canvas.embed(router_id, inner_id));
        assert!(canvas.embed(outer_id, inner_id));
        assert!(!canvas.embed(inner_id, outer_id));
        assert!(!canvas.embed(outer_id, outer_id));
    }

    #[test]
    fn translate_moves_subtree_set_position_does_not() {
        let mut canvas = Canvas::new();
        let zone = container("zone", 0.0, 0.0);
        let router = device("router", 50.0, 50.0);
        let (zone_id, router_id) = (zone.id, router.id);
        canvas.add_node(zone);
        canvas.add_node(router);
        canvas.embed(zone_id, router_id);

        canvas.translate(zone_id, CanvasDelta::new(10.0, 20.0), Origin::User);
        assert_eq!(canvas.node(zone_id).unwrap().position, CanvasPoint::new(10.0, 20.0));
        assert_eq!(canvas.node(router_id).unwrap().position, CanvasPoint::new(60.0, 70.0));

        canvas.set_position(zone_id, CanvasPoint::new(-5.0, -5.0), Origin::Expand);
        assert_eq!(canvas.node(router_id).unwrap().position, CanvasPoint::new(60.0, 70.0));
    }

    #[test]
    fn remove_takes_subtree() {
        let mut canvas = Canvas::new();
        let outer = container("outer", 0.0, 0.0);
        let inner = container("inner", 10.0, 10.0);
        let router = device("router", 50.0, 50.0);
        let (outer_id, inner_id, router_id) = (outer.id, inner.id, router.id);
        canvas.add_node(outer);
        canvas.add_node(inner);
        canvas.add_node(router);
        canvas.embed(outer_id, inner_id);
        canvas.embed(inner_id, router_id);
        assert_eq!(canvas.descendants(outer_id), vec![inner_id, router_id]);
        assert!(canvas.is_ancestor(outer_id, router_id));
        canvas.drain_events();

        let removed = canvas.remove_node(inner_id);
        assert_eq!(removed.len(), 2);
        assert_eq!(canvas.len(), 1);
        assert!(canvas.children(outer_id).is_empty());
        assert!(canvas
            .drain_events()
            .contains(&CanvasEvent::NodeRemoved {
                id: inner_id,
                parent: Some(outer_id)
            }));
    }

    #[test]
    fn unchanged_geometry_records_nothing() {
        let mut canvas = Canvas::new();
        let router = device("router", 0.0, 0.0);
        let id = router.id;
        canvas.add_node(router);
        canvas.drain_events();

        assert!(!canvas.set_position(id, CanvasPoint::new(0.0, 0.0), Origin::User));
        assert!(!canvas.resize(id, CanvasSize::new(120.0, 80.0), Origin::User));
        assert!(!canvas.translate(id, CanvasDelta::default(), Origin::User));
        assert!(!canvas.has_pending_events());
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = CanvasEvent::NodeMoved {
            id: NodeId::named("router"),
            origin: Origin::Expand,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "node_moved");
        assert_eq!(json["origin"], "expand");
    }
}
