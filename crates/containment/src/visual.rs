//! Drag feedback: translucent dragged node, highlighted drop target.

use crate::config::VisualConfig;
use crate::z_order;
use canvas::Canvas;
use node::{Highlight, NodeId, NodeStyle};

#[derive(Debug)]
pub struct DragVisual {
    enabled: bool,
    opacity: f32,
    z_index: i32,
    dragging: Option<NodeId>,
    highlighted: Option<NodeId>,
}

impl DragVisual {
    pub fn new(config: &VisualConfig) -> Self {
        Self {
            enabled: config.enabled,
            opacity: config.dragging_opacity,
            z_index: config.dragging_z_index,
            dragging: None,
            highlighted: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling clears any feedback currently shown.
    pub fn set_enabled(&mut self, enabled: bool, canvas: &mut Canvas) {
        if !enabled {
            self.end(canvas);
        }
        self.enabled = enabled;
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    /// Lifts `node` onto the dragging layer with its subtree above it.
    pub fn begin(&mut self, canvas: &mut Canvas, node: NodeId) {
        if !self.enabled {
            return;
        }
        let Some(style) = canvas.node(node).map(|n| n.style) else {
            return;
        };
        canvas.set_style(
            node,
            NodeStyle {
                opacity: self.opacity,
                shadow: true,
                ..style
            },
        );
        canvas.set_z_index(node, self.z_index);
        z_order::update_subtree(canvas, node);
        self.dragging = Some(node);
    }

    /// Puts the dragged node back on the dragging layer after a transition
    /// restacked it.
    pub fn relift(&mut self, canvas: &mut Canvas) {
        if let Some(node) = self.dragging {
            canvas.set_z_index(node, self.z_index);
            z_order::update_subtree(canvas, node);
        }
    }

    /// Drops the feedback and puts the node back on its regular layer.
    pub fn end(&mut self, canvas: &mut Canvas) {
        self.highlight(canvas, None);
        if let Some(node) = self.dragging.take() {
            if let Some(style) = canvas.node(node).map(|n| n.style) {
                canvas.set_style(
                    node,
                    NodeStyle {
                        opacity: 1.0,
                        shadow: false,
                        ..style
                    },
                );
                z_order::restack(canvas, node);
            }
        }
    }

    /// Moves the drop-target highlight to `target`.
    pub fn highlight(&mut self, canvas: &mut Canvas, target: Option<NodeId>) {
        if self.highlighted == target {
            return;
        }
        if let Some(previous) = self.highlighted.take() {
            set_highlight(canvas, previous, Highlight::None);
        }
        if !self.enabled {
            return;
        }
        if let Some(target) = target {
            if set_highlight(canvas, target, Highlight::EmbedTarget) {
                self.highlighted = Some(target);
            }
        }
    }

    pub fn forget(&mut self, id: NodeId) {
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
    }
}

fn set_highlight(canvas: &mut Canvas, id: NodeId, highlight: Highlight) -> bool {
    match canvas.node(id).map(|n| n.style) {
        Some(style) => canvas.set_style(id, NodeStyle { highlight, ..style }),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{
        create_container, create_device, CanvasPoint, CanvasSize, ContainerSpec, DeviceSpec,
        ZLayer,
    };

    #[test]
    fn begin_and_end_restore_style_and_layer() {
        let mut canvas = Canvas::new();
        let zone = create_container(
            CanvasPoint::default(),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named("zone"),
        );
        let router = create_device(CanvasPoint::new(10.0, 10.0), DeviceSpec::named("router"));
        let (zone_id, router_id) = (zone.id, router.id);
        canvas.add_node(zone);
        canvas.add_node(router);
        canvas.embed(zone_id, router_id);

        let mut visual = DragVisual::new(&VisualConfig::default());
        visual.begin(&mut canvas, zone_id);
        let zone_node = canvas.node(zone_id).unwrap();
        assert_eq!(zone_node.z_index, Some(ZLayer::DRAGGING));
        assert_eq!(zone_node.style.opacity, 0.7);
        assert!(zone_node.style.shadow);
        assert_eq!(canvas.node(router_id).unwrap().z_index, Some(1010));

        visual.end(&mut canvas);
        let zone_node = canvas.node(zone_id).unwrap();
        assert_eq!(zone_node.z_index, Some(ZLayer::CONTAINER));
        assert_eq!(zone_node.style, NodeStyle::default());
        assert_eq!(canvas.node(router_id).unwrap().z_index, Some(10));
    }

    #[test]
    fn highlight_follows_candidate() {
        let mut canvas = Canvas::new();
        let a = create_container(
            CanvasPoint::default(),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named("a"),
        );
        let b = create_container(
            CanvasPoint::new(400.0, 0.0),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named("b"),
        );
        let (a_id, b_id) = (a.id, b.id);
        canvas.add_node(a);
        canvas.add_node(b);

        let mut visual = DragVisual::new(&VisualConfig::default());
        visual.highlight(&mut canvas, Some(a_id));
        assert_eq!(canvas.node(a_id).unwrap().style.highlight, Highlight::EmbedTarget);

        visual.highlight(&mut canvas, Some(b_id));
        assert_eq!(canvas.node(a_id).unwrap().style.highlight, Highlight::None);
        assert_eq!(canvas.node(b_id).unwrap().style.highlight, Highlight::EmbedTarget);

        visual.end(&mut canvas);
        assert_eq!(canvas.node(b_id).unwrap().style.highlight, Highlight::None);
        assert_eq!(visual.highlighted(), None);
    }
}
