//! Command targets.
//!
//! Commands that operate on several nodes at once (remove, align,
//! distribute) name them through a [`Target`].

use canvas::Canvas;
use node::NodeId;
use serde::{Deserialize, Serialize};

/// Specifies which nodes a command targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// A single node.
    Node(NodeId),

    /// Several nodes, in the given order.
    Nodes(Vec<NodeId>),

    /// Direct children of a container.
    ChildrenOf(NodeId),

    /// Every node without a parent.
    Roots,

    /// Every node on the canvas.
    All,
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Vec<NodeId>> for Target {
    fn from(ids: Vec<NodeId>) -> Self {
        Self::Nodes(ids)
    }
}

impl Target {
    /// Ids currently matched by this target. Unknown ids are dropped.
    pub fn resolve(&self, canvas: &Canvas) -> Vec<NodeId> {
        match self {
            Target::Node(id) => canvas.contains(*id).then_some(*id).into_iter().collect(),
            Target::Nodes(ids) => ids.iter().copied().filter(|id| canvas.contains(*id)).collect(),
            Target::ChildrenOf(id) => canvas.children(*id).to_vec(),
            Target::Roots => canvas
                .nodes()
                .filter(|n| n.parent.is_none())
                .map(|n| n.id)
                .collect(),
            Target::All => canvas.nodes().map(|n| n.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{create_container, create_device, CanvasPoint, CanvasSize, ContainerSpec, DeviceSpec};

    #[test]
    fn target_serializes_externally_tagged() {
        let id = NodeId::named("edge");
        let json = serde_json::to_value(Target::Node(id)).unwrap();
        assert_eq!(json["node"], id.to_uuid_string());
        assert_eq!(serde_json::to_value(Target::All).unwrap(), "all");
    }

    #[test]
    fn node_ids_accept_names() {
        let target: Target = serde_json::from_str(r#"{"children_of": "dc"}"#).unwrap();
        assert_eq!(target, Target::ChildrenOf(NodeId::named("dc")));
    }

    #[test]
    fn resolve_drops_unknown_ids_and_filters_roots() {
        let mut canvas = Canvas::new();
        let zone = create_container(
            CanvasPoint::default(),
            CanvasSize::new(300.0, 200.0),
            ContainerSpec::named("zone"),
        );
        let mut router = create_device(CanvasPoint::new(20.0, 20.0), DeviceSpec::named("router"));
        router.parent = Some(zone.id);
        let (zone_id, router_id) = (zone.id, router.id);
        canvas.add_node(zone);
        canvas.add_node(router);

        let ghost = NodeId::named("ghost");
        assert_eq!(
            Target::Nodes(vec![router_id, ghost]).resolve(&canvas),
            vec![router_id]
        );
        assert_eq!(Target::Roots.resolve(&canvas), vec![zone_id]);
        assert_eq!(Target::ChildrenOf(zone_id).resolve(&canvas), vec![router_id]);
        assert_eq!(Target::All.resolve(&canvas).len(), 2);
    }
}
